use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::calendar::CalendarEvent;
use crate::insights;
use crate::theme;

pub struct UpcomingList;

impl UpcomingList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        events: &[&CalendarEvent],
        empty_message: &str,
    ) {
        let n = events.len();
        let count_str = if n == 0 {
            String::new()
        } else {
            format!(" {} event{} ", n, if n == 1 { "" } else { "s" })
        };

        let block = Block::default()
            .title(format!(" {} ", title))
            .title_style(theme::HEADER_STYLE)
            .title_bottom(Line::from(Span::styled(count_str, theme::DIM_STYLE)))
            .borders(Borders::ALL)
            .border_style(theme::BORDER_STYLE);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(Paragraph::new(empty_message).style(theme::DIM_STYLE), inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = events.iter().map(|ev| format_event(ev, inner_w)).collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn format_event(ev: &CalendarEvent, max_width: usize) -> ListItem<'static> {
    let when = if ev.is_all_day {
        format!("{} ", ev.start.format("%a %b %d"))
    } else {
        format!("{} {} ", ev.start.format("%a %b %d"), ev.duration_display())
    };

    let mut spans = vec![
        Span::raw(format!("{} ", insights::emoji_for(&ev.title))),
        Span::styled(when.clone(), Style::default().add_modifier(Modifier::DIM)),
        Span::raw(ev.title.clone()),
    ];

    // Only show location if there's room
    let used = 3 + when.len() + ev.title.len();
    if let Some(ref loc) = ev.location {
        if !loc.is_empty() && used + 3 + loc.len() <= max_width {
            spans.push(Span::styled(format!(" @ {}", loc), theme::DIM_STYLE));
        }
    }

    ListItem::new(Line::from(spans))
}
