//! Display-ready view of a contest record: IST start time and calendar link.

use serde::Serialize;

use crate::calendar::{calendar_link, event_window};
use crate::dates::format_display;
use crate::ingest::types::{ContestRecord, Platform};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContestView {
    pub title: String,
    pub link: String,
    pub platform: Platform,
    /// Start in IST, e.g. `28/03/2025, 12:00:00 pm`.
    pub starts_at: String,
    pub calendar_url: String,
}

impl ContestView {
    pub fn from_record(rec: &ContestRecord) -> Self {
        let (start, _) = event_window(rec);
        Self {
            title: rec.name.clone(),
            link: rec.link.clone(),
            platform: rec.platform,
            starts_at: format_display(start),
            calendar_url: calendar_link(rec),
        }
    }
}

pub fn views(records: &[ContestRecord]) -> Vec<ContestView> {
    records.iter().map(ContestView::from_record).collect()
}

/// Plain-text list, one block per contest.
pub fn render_list(views: &[ContestView]) -> String {
    if views.is_empty() {
        return "No upcoming contests.\n".to_string();
    }
    let mut out = String::new();
    for v in views {
        out.push_str(&format!(
            "{} [{}]\n  📅 {}\n  {}\n  + {}\n",
            v.title, v.platform, v.starts_at, v.link, v.calendar_url
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::StartTime;

    fn record() -> ContestRecord {
        ContestRecord {
            name: "Starters 180".into(),
            link: "https://www.codechef.com/START180".into(),
            platform: Platform::CodeChef,
            start: StartTime::Iso {
                start_time: "2025-04-09T20:00:00+05:30".into(),
                end_time: Some("2025-04-09T22:00:00+05:30".into()),
            },
            duration_seconds: 7200,
        }
    }

    #[test]
    fn view_shows_ist_start_and_calendar_link() {
        let v = ContestView::from_record(&record());
        assert_eq!(v.title, "Starters 180");
        assert_eq!(v.starts_at, "09/04/2025, 08:00:00 pm");
        assert!(v
            .calendar_url
            .ends_with("text=Starters%20180&dates=20250409T143000Z/20250409T163000Z"));
    }

    #[test]
    fn render_lists_every_contest() {
        let out = render_list(&views(&[record(), record()]));
        assert_eq!(out.matches("Starters 180 [CodeChef]").count(), 2);
        assert_eq!(render_list(&[]), "No upcoming contests.\n");
    }
}
