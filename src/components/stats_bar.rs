use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::insights::EventStats;
use crate::theme;

pub struct StatsBar;

impl StatsBar {
    pub fn render(frame: &mut Frame, area: Rect, stats: &EventStats) {
        let w = area.width as usize;
        let accent = theme::current().title;

        let (scheduled, upcoming, completed) = if w >= 50 {
            ("Scheduled ", "Upcoming ", "Completed ")
        } else {
            ("S:", "U:", "C:")
        };

        let line = Line::from(vec![
            Span::styled(" \u{1f5d3}\u{fe0f} Event Parser  ", accent),
            Span::styled(scheduled, theme::DIM_STYLE),
            Span::styled(stats.scheduled.to_string(), theme::HEADER_STYLE),
            Span::styled("  ", theme::DIM_STYLE),
            Span::styled(upcoming, theme::DIM_STYLE),
            Span::styled(stats.upcoming.to_string(), theme::HEADER_STYLE),
            Span::styled("  ", theme::DIM_STYLE),
            Span::styled(completed, theme::DIM_STYLE),
            Span::styled(stats.completed.to_string(), theme::HEADER_STYLE),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
