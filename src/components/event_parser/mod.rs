pub mod models;

pub use models::{EventDefaults, EventRecord, Reminder, ReminderMethod};

use crate::utils::time::at_local_time;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Format of the date line, e.g. `25/12/2024`
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Header that starts every event description
pub const LINKS_HEADER: &str = "Links:";

lazy_static! {
    static ref LINK_PATTERN: Regex = Regex::new(r"https?://\S+").unwrap();
    // chrono alone also takes short or signed years and inner spaces
    static ref DATE_LINE_PATTERN: Regex = Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap();
}

/// Why a message could not be turned into an event
#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum ParseError {
    #[error("message has {0} line(s), expected a title line and a date line")]
    #[diagnostic(
        code(kalenteribotti::parse::too_few_lines),
        help("write the title on the first line and the date (DD/MM/YYYY) on the second")
    )]
    TooFewLines(usize),

    #[error("invalid date '{line}': {reason}")]
    #[diagnostic(
        code(kalenteribotti::parse::invalid_date),
        help("dates are written as DD/MM/YYYY, e.g. 25/12/2024")
    )]
    InvalidDate { line: String, reason: String },

    #[error("{date} at {hour:02}:{minute:02} does not exist in {timezone}")]
    #[diagnostic(code(kalenteribotti::parse::invalid_local_time))]
    InvalidLocalTime {
        date: NaiveDate,
        hour: u32,
        minute: u32,
        timezone: String,
    },
}

/// Turns chat messages into calendar events.
///
/// The expected message shape is
///
/// ```text
/// Team Sync
/// 25/12/2024
/// Agenda: https://example.com/agenda
/// ```
///
/// The first line is the title, the second the date. Every http(s) link
/// anywhere in the message ends up in the event description.
#[derive(Debug, Clone, Default)]
pub struct EventParser {
    defaults: EventDefaults,
}

impl EventParser {
    pub fn new(defaults: EventDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &EventDefaults {
        &self.defaults
    }

    /// Parse a message into an event record
    pub fn parse(&self, text: &str) -> Result<EventRecord, ParseError> {
        let text = text.trim();
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() < 2 {
            return Err(ParseError::TooFewLines(lines.len()));
        }

        let title = lines[0].to_string();
        let date_line = lines[1].trim();

        if !DATE_LINE_PATTERN.is_match(date_line) {
            return Err(ParseError::InvalidDate {
                line: date_line.to_string(),
                reason: "expected DD/MM/YYYY".to_string(),
            });
        }

        let date = NaiveDate::parse_from_str(date_line, DATE_FORMAT).map_err(|e| {
            ParseError::InvalidDate {
                line: date_line.to_string(),
                reason: e.to_string(),
            }
        })?;

        let (hour, minute) = self.defaults.start_time;
        let start = at_local_time(date, self.defaults.start_time, &self.defaults.timezone)
            .ok_or_else(|| ParseError::InvalidLocalTime {
                date,
                hour,
                minute,
                timezone: self.defaults.timezone.name().to_string(),
            })?;
        let end = start + self.defaults.duration;

        let links = extract_links(text);
        let description = describe_links(&links);

        let record = EventRecord {
            title,
            start,
            end,
            description,
            links,
            reminders: self.defaults.reminders.clone(),
        };
        debug!("Event details parsed: {:?}", record);

        Ok(record)
    }
}

/// All http(s) links in the text, in order of appearance
pub fn extract_links(text: &str) -> Vec<String> {
    LINK_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Description body listing the links under a header line
pub fn describe_links(links: &[String]) -> String {
    format!("{}\n{}", LINKS_HEADER, links.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn parse(text: &str) -> Result<EventRecord, ParseError> {
        EventParser::default().parse(text)
    }

    #[test]
    fn parses_title_and_date() {
        let record = parse("Team Sync\n25/12/2024").unwrap();

        assert_eq!(record.title, "Team Sync");
        assert_eq!(record.start.to_rfc3339(), "2024-12-25T08:00:00+05:30");
        assert_eq!(record.end - record.start, Duration::hours(1));
        assert_eq!(record.description, "Links:\n");
        assert!(record.links.is_empty());
        assert_eq!(record.timezone_name(), "Asia/Kolkata");
    }

    #[test]
    fn collects_links_from_every_line() {
        let record =
            parse("Launch\n01/01/2025\nSee https://example.com/a and https://example.com/b")
                .unwrap();

        assert_eq!(
            record.description,
            "Links:\nhttps://example.com/a\nhttps://example.com/b"
        );
    }

    #[test]
    fn keeps_duplicate_links_in_order() {
        let record = parse(
            "Demo https://first.example\n02/02/2025\nhttp://x.test/1 http://x.test/1\nhttps://first.example",
        )
        .unwrap();

        assert_eq!(
            record.links,
            vec![
                "https://first.example",
                "http://x.test/1",
                "http://x.test/1",
                "https://first.example",
            ]
        );
    }

    #[test]
    fn rejects_single_line() {
        assert_eq!(parse("Just a title"), Err(ParseError::TooFewLines(1)));
        assert_eq!(parse(""), Err(ParseError::TooFewLines(0)));
        // Surrounding blank lines are trimmed away before counting
        assert_eq!(parse("\n\nTitle\n\n"), Err(ParseError::TooFewLines(1)));
    }

    #[test]
    fn rejects_other_date_formats() {
        for date in [
            "2024-12-25",
            "25.12.2024",
            "12/25/2024",
            "tomorrow",
            "31/02/2024",
            "25/12/24",
            "25/12/+2024",
            "25/ 12/2024",
            "25/12/20245",
        ] {
            let result = parse(&format!("Title\n{}", date));
            assert!(
                matches!(result, Err(ParseError::InvalidDate { .. })),
                "{} should be rejected, got {:?}",
                date,
                result
            );
        }
    }

    #[test]
    fn accepts_single_digit_day_and_month() {
        let record = parse("Title\n1/2/2025").unwrap();
        assert_eq!(record.start.to_rfc3339(), "2025-02-01T08:00:00+05:30");
    }

    #[test]
    fn date_line_is_trimmed() {
        let record = parse("Title\n   25/12/2024  \t").unwrap();
        assert_eq!(record.start.to_rfc3339(), "2024-12-25T08:00:00+05:30");

        let record = parse("Title\r\n25/12/2024\r\n").unwrap();
        assert_eq!(record.title, "Title");
    }

    #[test]
    fn empty_second_line_is_an_invalid_date() {
        assert!(matches!(
            parse("Title\n\n25/12/2024"),
            Err(ParseError::InvalidDate { .. })
        ));
    }

    #[test]
    fn attaches_reminder_policy() {
        let record = parse("Title\n25/12/2024").unwrap();
        assert_eq!(
            record.reminders,
            vec![
                Reminder {
                    method: ReminderMethod::Email,
                    minutes: 1440
                },
                Reminder {
                    method: ReminderMethod::Popup,
                    minutes: 10
                },
            ]
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = "Launch\n01/01/2025\nhttps://example.com";
        assert_eq!(parse(text).unwrap(), parse(text).unwrap());
    }

    #[test]
    fn honours_configured_zone_and_start_time() {
        let parser = EventParser::new(EventDefaults {
            timezone: chrono_tz::Europe::Helsinki,
            start_time: (9, 30),
            ..EventDefaults::default()
        });

        let record = parser.parse("Sauna\n15/06/2024").unwrap();
        assert_eq!(record.start.to_rfc3339(), "2024-06-15T09:30:00+03:00");
        assert_eq!(record.end.to_rfc3339(), "2024-06-15T10:30:00+03:00");
    }

    #[test]
    fn nonexistent_local_time_is_rejected() {
        let parser = EventParser::new(EventDefaults {
            timezone: chrono_tz::Europe::Helsinki,
            start_time: (3, 30),
            ..EventDefaults::default()
        });

        assert!(matches!(
            parser.parse("Title\n31/03/2024"),
            Err(ParseError::InvalidLocalTime { .. })
        ));
    }

    #[test]
    fn repeated_local_time_uses_standard_time() {
        let parser = EventParser::new(EventDefaults {
            timezone: chrono_tz::Europe::Helsinki,
            start_time: (3, 30),
            ..EventDefaults::default()
        });

        let record = parser.parse("Title\n27/10/2024").unwrap();
        assert_eq!(record.start.to_rfc3339(), "2024-10-27T03:30:00+02:00");
        assert_eq!(record.end.to_rfc3339(), "2024-10-27T04:30:00+02:00");
    }
}
