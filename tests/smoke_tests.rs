use kalenteribotti::components::event_parser::{EventDefaults, EventParser};
use kalenteribotti::components::google_calendar::EventSubmitter;
use kalenteribotti::config::{ChannelTarget, Config};
use kalenteribotti::handlers::BotData;
use std::collections::HashMap;
use std::sync::Arc;

mod common;

fn test_config() -> Config {
    let env: HashMap<&str, &str> = [
        ("DISCORD_TOKEN", "test_token"),
        ("CALENDAR_ID", "test_calendar_id"),
        ("DISCORD_CHANNEL_ID", "987654321"),
        ("SERVICE_ACCOUNT_FILE", "service-account.json"),
        ("TIMEZONE", "Europe/Helsinki"),
        ("EVENT_START_TIME", "09:15"),
        ("BOT_LOCALE", "fi"),
    ]
    .into_iter()
    .collect();

    Config::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap()
}

/// Smoke test to verify that the config can be loaded
#[test]
fn test_config_loads() {
    let config = test_config();

    assert_eq!(config.discord_token, "test_token");
    assert_eq!(config.google_calendar_id, "test_calendar_id");
    assert_eq!(config.channel, ChannelTarget::Id(987654321));
    assert_eq!(config.timezone, chrono_tz::Europe::Helsinki);
    assert_eq!(config.bot_locale, "fi");
}

/// Configured zone and start time flow through to parsed events
#[test]
fn test_parser_uses_config() {
    let config = test_config();
    let parser = EventParser::new(EventDefaults::from_config(&config));

    let record = parser.parse("Sauna\n15/06/2024").unwrap();
    assert_eq!(record.start.to_rfc3339(), "2024-06-15T09:15:00+03:00");
    assert_eq!(record.timezone_name(), "Europe/Helsinki");
}

/// Bot data can be assembled from its parts
#[tokio::test]
async fn test_bot_data_creation() {
    let config = Arc::new(test_config());
    let calendar = Arc::new(common::MockGoogleCalendar::new());

    let data = BotData::new(Arc::clone(&config), EventParser::default(), calendar.clone());

    let record = data.parser.parse("Team Sync\n25/12/2024").unwrap();
    let link = data.calendar.submit(&record).await.unwrap();

    assert!(link.ends_with("20241225"));
    assert_eq!(calendar.submitted().await.len(), 1);
    assert!(format!("{:?}", data).contains("987654321"));
}
