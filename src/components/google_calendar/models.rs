use crate::components::event_parser::{EventRecord, Reminder};
use serde::{Deserialize, Serialize};

/// Request body for `events.insert`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub reminders: EventReminders,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventReminders {
    pub use_default: bool,
    pub overrides: Vec<Reminder>,
}

impl From<&EventRecord> for NewCalendarEvent {
    fn from(record: &EventRecord) -> Self {
        let time_zone = record.timezone_name().to_string();
        Self {
            summary: record.title.clone(),
            description: record.description.clone(),
            start: EventDateTime {
                date_time: record.start.to_rfc3339(),
                time_zone: time_zone.clone(),
            },
            end: EventDateTime {
                date_time: record.end.to_rfc3339(),
                time_zone,
            },
            reminders: EventReminders {
                use_default: false,
                overrides: record.reminders.clone(),
            },
        }
    }
}

/// The parts of the `events.insert` response the bot reads
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub id: Option<String>,
    pub html_link: Option<String>,
}
