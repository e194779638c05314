use chrono::{DateTime, Local};

use crate::calendar::CalendarEvent;

pub const SEARCH_LIMIT: usize = 5;

const DEFAULT_EMOJI: &str = "\u{1f5d3}\u{fe0f}";

// First match wins, so more specific keywords go first.
const EMOJI_KEYWORDS: &[(&[&str], &str)] = &[
    (&["birthday", "bday"], "\u{1f382}"),
    (&["doctor", "dentist", "appointment"], "\u{1fa7a}"),
    (&["flight", "trip", "travel"], "\u{2708}\u{fe0f}"),
    (&["lunch", "dinner", "breakfast", "brunch"], "\u{1f37d}\u{fe0f}"),
    (&["coffee"], "\u{2615}"),
    (&["gym", "workout", "run", "yoga"], "\u{1f3cb}\u{fe0f}"),
    (&["call", "phone"], "\u{1f4de}"),
    (&["class", "study", "exam", "lecture"], "\u{1f4da}"),
    (&["party", "celebration"], "\u{1f389}"),
    (&["meeting", "sync", "standup", "interview"], "\u{1f465}"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventStats {
    pub scheduled: usize,
    pub upcoming: usize,
    pub completed: usize,
}

impl EventStats {
    pub fn from_events(events: &[CalendarEvent], now: DateTime<Local>) -> Self {
        let upcoming = events.iter().filter(|e| e.is_future(now)).count();
        Self {
            scheduled: events.len(),
            upcoming,
            completed: events.len() - upcoming,
        }
    }
}

/// Future events whose title contains `query`, soonest first.
pub fn search_upcoming<'a>(
    events: &'a [CalendarEvent],
    query: &str,
    now: DateTime<Local>,
) -> Vec<&'a CalendarEvent> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<&CalendarEvent> = events
        .iter()
        .filter(|e| e.is_future(now) && e.title.to_lowercase().contains(&query))
        .collect();
    matches.sort_by_key(|e| e.start);
    matches.truncate(SEARCH_LIMIT);
    matches
}

/// Emoji for the first keyword group with a whole word in `title`.
/// Simple plurals ("meetings", "classes") count as the keyword.
pub fn emoji_for(title: &str) -> &'static str {
    let title = title.to_lowercase();
    let words: Vec<&str> = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    EMOJI_KEYWORDS
        .iter()
        .find(|(keywords, _)| {
            keywords
                .iter()
                .any(|k| words.iter().any(|w| is_keyword(w, k)))
        })
        .map(|(_, emoji)| *emoji)
        .unwrap_or(DEFAULT_EMOJI)
}

fn is_keyword(word: &str, keyword: &str) -> bool {
    word == keyword
        || word.strip_suffix('s') == Some(keyword)
        || word.strip_suffix("es") == Some(keyword)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    fn event(title: &str, offset_hours: i64) -> CalendarEvent {
        let start = now() + Duration::hours(offset_hours);
        CalendarEvent {
            id: format!("{title}-{offset_hours}"),
            title: title.to_string(),
            start,
            end: start + Duration::hours(1),
            is_all_day: false,
            calendar_id: "personal".to_string(),
            calendar_name: "Personal".to_string(),
            location: None,
            notes: None,
        }
    }

    #[test]
    fn stats_partition_by_start_time() {
        let events = vec![
            event("Past", -3),
            event("Starts now", 0),
            event("Later", 2),
            event("Tomorrow", 24),
        ];

        let stats = EventStats::from_events(&events, now());

        assert_eq!(stats.upcoming, 2);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.scheduled, stats.upcoming + stats.completed);
    }

    #[test]
    fn stats_hold_for_many_lists() {
        for n in 0..20 {
            let events: Vec<_> = (0..n).map(|i| event("E", i * 7 - 50)).collect();
            let stats = EventStats::from_events(&events, now());
            assert_eq!(stats.scheduled, stats.upcoming + stats.completed);
            assert_eq!(stats.scheduled, events.len());
        }
    }

    #[test]
    fn search_is_case_insensitive_and_future_only() {
        let events = vec![
            event("Team Meeting", -5),
            event("team meeting", 5),
            event("Lunch", 6),
            event("MEETING notes", 1),
        ];

        let found = search_upcoming(&events, "Meeting", now());
        let titles: Vec<_> = found.iter().map(|e| e.title.as_str()).collect();

        assert_eq!(titles, vec!["MEETING notes", "team meeting"]);
    }

    #[test]
    fn search_returns_at_most_five() {
        let events: Vec<_> = (1..=9).map(|i| event("Standup", i)).collect();
        let found = search_upcoming(&events, "stand", now());
        assert_eq!(found.len(), SEARCH_LIMIT);
        assert_eq!(found[0].start, now() + Duration::hours(1));
    }

    #[test]
    fn blank_query_finds_nothing() {
        let events = vec![event("Lunch", 1)];
        assert!(search_upcoming(&events, "   ", now()).is_empty());
    }

    #[test]
    fn emoji_follows_keywords() {
        assert_eq!(emoji_for("Lunch with Sam"), "\u{1f37d}\u{fe0f}");
        assert_eq!(emoji_for("Weekly MEETING"), "\u{1f465}");
        assert_eq!(emoji_for("Mom's birthday dinner"), "\u{1f382}");
        assert_eq!(emoji_for("Pick up laundry"), DEFAULT_EMOJI);
        assert_eq!(emoji_for("Team meetings"), "\u{1f465}");
    }

    #[test]
    fn keywords_inside_other_words_do_not_match() {
        assert_eq!(emoji_for("Product recall review"), DEFAULT_EMOJI);
        assert_eq!(emoji_for("Async code walkthrough"), DEFAULT_EMOJI);
        assert_eq!(emoji_for("Truncate logs"), DEFAULT_EMOJI);
        assert_eq!(emoji_for("Rerun backups"), DEFAULT_EMOJI);
    }
}
