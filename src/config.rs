use crate::error::{config_error, env_error, BotResult};
use crate::utils::time::parse_time;
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Default activity text for the bot
pub const DEFAULT_ACTIVITY: &str = "Kuuntelee tapahtumia";

/// Time zone every event is created in
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

/// Time of day every event starts at, as (hour, minute)
pub const DEFAULT_EVENT_START_TIME: (u32, u32) = (8, 0);

/// Length of every created event
pub const EVENT_DURATION_MINUTES: i64 = 60;

/// Email reminder sent a day before the event
pub const EMAIL_REMINDER_MINUTES: u32 = 24 * 60;

/// Popup reminder shown shortly before the event
pub const POPUP_REMINDER_MINUTES: u32 = 10;

/// Locale used for replies when none is configured
pub const DEFAULT_LOCALE: &str = "en";

/// The Discord channel the bot listens to.
///
/// A numeric value is matched against the channel id, anything else against
/// the channel name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelTarget {
    Id(u64),
    Name(String),
}

impl ChannelTarget {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.parse::<u64>() {
            Ok(id) => ChannelTarget::Id(id),
            Err(_) => ChannelTarget::Name(value.trim_start_matches('#').to_string()),
        }
    }

    /// Decide by id alone; `None` means the channel name is needed
    pub fn matches_id(&self, channel_id: u64) -> Option<bool> {
        match self {
            ChannelTarget::Id(id) => Some(*id == channel_id),
            ChannelTarget::Name(_) => None,
        }
    }

    pub fn matches_name(&self, channel_name: Option<&str>) -> bool {
        match self {
            ChannelTarget::Name(name) => channel_name == Some(name.as_str()),
            ChannelTarget::Id(_) => false,
        }
    }
}

/// Main configuration structure for the bot
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token
    pub discord_token: String,
    /// Google Calendar ID events are inserted into
    pub google_calendar_id: String,
    /// Path to the Google service account key file
    pub service_account_file: PathBuf,
    /// Discord channel to read event messages from
    pub channel: ChannelTarget,
    /// Time zone for created events
    pub timezone: Tz,
    /// Start time of created events as (hour, minute)
    pub event_start_time: (u32, u32),
    /// Bot activity status text
    pub activity: String,
    /// Locale for reply messages
    pub bot_locale: String,
}

impl Config {
    /// Load configuration from the environment and an optional `.env` file
    pub fn load() -> BotResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| env_error(key));

        let discord_token = required("DISCORD_TOKEN")?;
        let google_calendar_id = required("CALENDAR_ID")?;
        let channel = ChannelTarget::parse(&required("DISCORD_CHANNEL_ID")?);
        let service_account_file = PathBuf::from(required("SERVICE_ACCOUNT_FILE")?);

        let timezone = match lookup("TIMEZONE") {
            Some(value) => value
                .parse::<Tz>()
                .map_err(|_| config_error(&format!("Invalid TIMEZONE: {}", value)))?,
            None => DEFAULT_TIMEZONE,
        };

        let event_start_time = match lookup("EVENT_START_TIME") {
            Some(value) => parse_time(&value)
                .ok_or_else(|| config_error(&format!("Invalid EVENT_START_TIME: {}", value)))?,
            None => DEFAULT_EVENT_START_TIME,
        };

        // Bot activity status
        let activity = lookup("BOT_ACTIVITY").unwrap_or_else(|| DEFAULT_ACTIVITY.to_string());

        let bot_locale = lookup("BOT_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Ok(Config {
            discord_token,
            google_calendar_id,
            service_account_file,
            channel,
            timezone,
            event_start_time,
            activity,
            bot_locale,
        })
    }
}
