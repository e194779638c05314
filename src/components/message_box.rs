use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::theme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct MessageBox;

impl MessageBox {
    /// Loading indicator, error with retry hint, or success notice.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        loading: bool,
        error: Option<&str>,
        success: Option<&str>,
        tick: usize,
    ) {
        let mut lines = Vec::new();

        if loading {
            lines.push(Line::from(vec![
                Span::styled(SPINNER[tick % SPINNER.len()], theme::current().title),
                Span::raw(" Parsing your request..."),
            ]));
        }

        if let Some(msg) = success {
            lines.push(Line::from(Span::styled(
                format!("\u{2705} {}", msg),
                theme::SUCCESS_STYLE,
            )));
        }

        if let Some(msg) = error {
            lines.push(Line::from(Span::styled(
                format!("\u{274c} {}", msg),
                theme::ERROR_STYLE,
            )));
            lines.push(Line::from(Span::styled("Please try again.", theme::DIM_STYLE)));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }
}
