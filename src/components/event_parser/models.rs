use crate::config::{
    Config, DEFAULT_EVENT_START_TIME, DEFAULT_TIMEZONE, EMAIL_REMINDER_MINUTES,
    EVENT_DURATION_MINUTES, POPUP_REMINDER_MINUTES,
};
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::Serialize;

/// How a reminder is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

/// A reminder override attached to every created event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub method: ReminderMethod,
    pub minutes: u32,
}

/// Fixed policy applied to every parsed event
#[derive(Debug, Clone, PartialEq)]
pub struct EventDefaults {
    pub timezone: Tz,
    pub start_time: (u32, u32),
    pub duration: Duration,
    pub reminders: Vec<Reminder>,
}

impl Default for EventDefaults {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            start_time: DEFAULT_EVENT_START_TIME,
            duration: Duration::minutes(EVENT_DURATION_MINUTES),
            reminders: default_reminders(),
        }
    }
}

impl EventDefaults {
    /// Take the zone and start time from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            timezone: config.timezone,
            start_time: config.event_start_time,
            ..Self::default()
        }
    }
}

/// One email reminder a day ahead and one popup shortly before
pub fn default_reminders() -> Vec<Reminder> {
    vec![
        Reminder {
            method: ReminderMethod::Email,
            minutes: EMAIL_REMINDER_MINUTES,
        },
        Reminder {
            method: ReminderMethod::Popup,
            minutes: POPUP_REMINDER_MINUTES,
        },
    ]
}

/// An event parsed from a chat message, ready to be submitted
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub description: String,
    pub links: Vec<String>,
    pub reminders: Vec<Reminder>,
}

impl EventRecord {
    /// IANA name of the zone the event is placed in
    pub fn timezone_name(&self) -> &'static str {
        self.start.timezone().name()
    }
}
