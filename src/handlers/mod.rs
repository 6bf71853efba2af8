use crate::components::{EventParser, EventSubmitter};
use crate::config::Config;
use crate::error::Error;
use poise::serenity_prelude as serenity;
use std::fmt;
use std::sync::Arc;

pub mod message;

pub use message::{dispatch, should_handle, DispatchOutcome, Responder};

/// Shared, read-only state handed to every event
pub struct BotData {
    pub config: Arc<Config>,
    pub parser: EventParser,
    pub calendar: Arc<dyn EventSubmitter>,
}

impl fmt::Debug for BotData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotData")
            .field("channel", &self.config.channel)
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

impl BotData {
    pub fn new(config: Arc<Config>, parser: EventParser, calendar: Arc<dyn EventSubmitter>) -> Self {
        Self {
            config,
            parser,
            calendar,
        }
    }
}

/// Type alias for the poise framework context
pub type FrameworkContext<'a> = poise::FrameworkContext<'a, BotData, Error>;

/// Route gateway events to their handlers
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: FrameworkContext<'_>,
    data: &BotData,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        message::on_message(ctx, new_message, framework.bot_id, data).await;
    }
    Ok(())
}
