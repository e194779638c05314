use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme;

const BINDINGS: &[(&str, &str)] = &[
    ("Enter", "Send the request"),
    ("Alt+Enter", "New line"),
    ("Tab", "Cycle Auto / Add / Delete hint"),
    ("Ctrl+L", "Clear input and messages"),
    ("Ctrl+F", "Search upcoming events"),
    ("Ctrl+R", "Reload events from calendar"),
    ("Esc", "Leave search / quit"),
    ("Ctrl+C", "Quit"),
];

pub struct Help;

impl Help {
    pub fn render(frame: &mut Frame, area: Rect) {
        let popup_w = area.width.clamp(30, 52);
        let popup_h = area.height.clamp(8, 16);
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h).intersection(area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keybindings ")
            .title_style(theme::current().title)
            .borders(Borders::ALL)
            .border_style(theme::current().focused_border);

        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let key_style = Style::default()
            .fg(theme::current().accent)
            .add_modifier(Modifier::BOLD);

        let mut lines: Vec<Line> = BINDINGS
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(format!("  {:<11}", key), key_style),
                    Span::raw(*desc),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  F1 / Esc to close", theme::DIM_STYLE)));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
