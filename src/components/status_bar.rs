use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::InputMode;
use crate::config::CommandType;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, mode: InputMode, command_type: CommandType) {
        let w = area.width as usize;

        let left = match mode {
            InputMode::Compose => format!(" [{}] ", command_type.label()),
            InputMode::Search => " [Search] ".to_string(),
        };

        let hints = match mode {
            InputMode::Compose if w >= 80 => {
                " Enter:Go Tab:Type ^L:Clear ^F:Search ^R:Refresh F1:Help Esc:Quit "
            }
            InputMode::Compose if w >= 45 => " Enter:Go Tab:Type ^L:Clear Esc:Quit ",
            InputMode::Search if w >= 45 => " ^L:Clear ^F/Esc:Back ^R:Refresh ",
            _ => " F1:Help ",
        };

        let padding = " ".repeat(w.saturating_sub(left.len() + hints.len()));

        let line = Line::from(vec![
            Span::styled(left, theme::STATUS_STYLE),
            Span::styled(padding, theme::STATUS_STYLE),
            Span::styled(hints, theme::STATUS_STYLE),
        ]);

        frame.render_widget(Paragraph::new(line).style(theme::STATUS_STYLE), area);
    }
}
