pub mod models;
pub mod token;

pub use models::{CreatedEvent, NewCalendarEvent};
pub use token::{ServiceAccountKey, TokenManager};

use crate::components::event_parser::EventRecord;
use crate::config::Config;
use crate::error::{google_calendar_error, BotResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};
use url::Url;

/// Base URL of the Calendar v3 REST API
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Something that can turn an event record into a calendar entry
#[async_trait]
pub trait EventSubmitter: Send + Sync {
    /// Create the event and return a shareable link to it
    async fn submit(&self, record: &EventRecord) -> BotResult<String>;
}

/// Google Calendar client authenticated as a service account
#[derive(Debug, Clone)]
pub struct GoogleCalendar {
    calendar_id: String,
    api_base: Url,
    token_manager: TokenManager,
    client: Client,
}

impl GoogleCalendar {
    /// Create a client from a parsed service account key
    pub fn new(key: ServiceAccountKey, calendar_id: impl Into<String>) -> BotResult<Self> {
        let client = Client::new();
        let token_manager = TokenManager::new(key, client.clone())?;
        let api_base = Url::parse(DEFAULT_API_BASE)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        Ok(Self {
            calendar_id: calendar_id.into(),
            api_base,
            token_manager,
            client,
        })
    }

    /// Create a client from the configured key file and calendar
    pub fn from_config(config: &Config) -> BotResult<Self> {
        let key = ServiceAccountKey::from_file(&config.service_account_file)?;
        let calendar = Self::new(key, config.google_calendar_id.clone())?;
        info!(
            "Google Calendar client ready for {} as {}",
            calendar.calendar_id,
            calendar.token_manager.service_account_email()
        );
        Ok(calendar)
    }

    /// Point the client at a different API root
    pub fn with_api_base(mut self, api_base: &str) -> BotResult<Self> {
        self.api_base = Url::parse(api_base)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;
        Ok(self)
    }

    fn events_url(&self) -> BotResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("API base URL cannot be a base"))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }

    /// Insert the event and return its `htmlLink`
    pub async fn insert_event(&self, record: &EventRecord) -> BotResult<String> {
        let token = self.token_manager.get_token().await?;
        let url = self.events_url()?;
        let body = NewCalendarEvent::from(record);
        debug!("Inserting event into {}: {:?}", self.calendar_id, body);

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to insert event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to insert event: HTTP {} - {}",
                status, error_body
            )));
        }

        let created: CreatedEvent = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse insert response: {}", e)))?;

        debug!(
            "Created event {} in {}",
            created.id.as_deref().unwrap_or("<no id>"),
            self.calendar_id
        );

        created
            .html_link
            .ok_or_else(|| google_calendar_error("Insert response has no htmlLink"))
    }
}

#[async_trait]
impl EventSubmitter for GoogleCalendar {
    async fn submit(&self, record: &EventRecord) -> BotResult<String> {
        match self.insert_event(record).await {
            Ok(link) => {
                info!("Event added to calendar: {}", link);
                Ok(link)
            }
            Err(e) => {
                error!("Failed to add event to calendar: {}", e);
                Err(e)
            }
        }
    }
}
