// Test doubles shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use kalenteribotti::components::event_parser::EventRecord;
use kalenteribotti::components::google_calendar::EventSubmitter;
use kalenteribotti::error::{google_calendar_error, BotResult};
use kalenteribotti::handlers::Responder;
use tokio::sync::Mutex;

/// Mock implementation of the Google Calendar submitter for testing
#[derive(Debug, Default)]
pub struct MockGoogleCalendar {
    fail: bool,
    submitted: Mutex<Vec<EventRecord>>,
}

impl MockGoogleCalendar {
    /// Create a mock that accepts every event
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that rejects every event
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn submitted(&self) -> Vec<EventRecord> {
        self.submitted.lock().await.clone()
    }
}

#[async_trait]
impl EventSubmitter for MockGoogleCalendar {
    async fn submit(&self, record: &EventRecord) -> BotResult<String> {
        self.submitted.lock().await.push(record.clone());
        if self.fail {
            return Err(google_calendar_error("quota exceeded"));
        }
        Ok(format!(
            "https://www.google.com/calendar/event?eid={}",
            record.start.format("%Y%m%d")
        ))
    }
}

/// Records replies instead of sending them to Discord
#[derive(Debug, Default)]
pub struct MockResponder {
    replies: Mutex<Vec<String>>,
}

impl MockResponder {
    pub async fn replies(&self) -> Vec<String> {
        self.replies.lock().await.clone()
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn say(&self, content: &str) -> BotResult<()> {
        self.replies.lock().await.push(content.to_string());
        Ok(())
    }
}

