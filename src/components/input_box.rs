use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::theme;

pub struct InputBox;

impl InputBox {
    /// Text field with a cursor when focused and a placeholder when empty.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        value: &str,
        placeholder: &str,
        focused: bool,
    ) {
        let border_style = if focused {
            theme::current().focused_border
        } else {
            theme::BORDER_STYLE
        };

        let block = Block::default()
            .title(format!(" {} ", title))
            .title_style(if focused {
                theme::current().title
            } else {
                theme::HEADER_STYLE
            })
            .borders(Borders::ALL)
            .border_style(border_style);

        let text: Vec<Line> = if value.is_empty() {
            let mut spans = vec![Span::styled(placeholder.to_string(), theme::DIM_STYLE)];
            if focused {
                spans.insert(0, Span::raw("_"));
            }
            vec![Line::from(spans)]
        } else {
            let cursor = if focused { "_" } else { "" };
            let mut lines: Vec<Line> = value.split('\n').map(|l| Line::from(l.to_string())).collect();
            if let Some(last) = lines.last_mut() {
                last.push_span(Span::raw(cursor));
            }
            lines
        };

        let para = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(para, area);
    }
}
