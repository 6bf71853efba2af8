use super::BotData;
use crate::components::{EventParser, EventSubmitter, ParseError};
use crate::config::ChannelTarget;
use crate::error::{BotResult, Error};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use rust_i18n::t;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Where dispatch sends its replies
#[async_trait]
pub trait Responder: Send + Sync {
    async fn say(&self, content: &str) -> BotResult<()>;
}

/// Replies into the channel the event message came from
pub struct ChannelResponder {
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
}

impl ChannelResponder {
    pub fn new(http: Arc<serenity::Http>, channel_id: serenity::ChannelId) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl Responder for ChannelResponder {
    async fn say(&self, content: &str) -> BotResult<()> {
        self.channel_id
            .send_message(&self.http, serenity::CreateMessage::new().content(content))
            .await?;
        Ok(())
    }
}

/// What happened to one event message
#[derive(Debug)]
pub enum DispatchOutcome {
    Created { link: String },
    ParseFailed(ParseError),
    SubmitFailed(Error),
}

impl DispatchOutcome {
    /// The messages sent back to the channel, in order
    pub fn replies(&self) -> Vec<String> {
        match self {
            DispatchOutcome::Created { link } => {
                vec![t!("event_added").into_owned(), link.clone()]
            }
            DispatchOutcome::ParseFailed(_) => vec![t!("event_parse_failed").into_owned()],
            DispatchOutcome::SubmitFailed(_) => vec![t!("event_submit_failed").into_owned()],
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, DispatchOutcome::Created { .. })
    }
}

/// Parse a message, submit the event and reply with the result
pub async fn dispatch(
    parser: &EventParser,
    submitter: &dyn EventSubmitter,
    responder: &dyn Responder,
    content: &str,
) -> DispatchOutcome {
    let outcome = match parser.parse(content) {
        Ok(record) => match submitter.submit(&record).await {
            Ok(link) => DispatchOutcome::Created { link },
            Err(e) => DispatchOutcome::SubmitFailed(e),
        },
        Err(e) => {
            warn!("Failed to parse event details: {}", e);
            DispatchOutcome::ParseFailed(e)
        }
    };

    for reply in outcome.replies() {
        if let Err(e) = responder.say(&reply).await {
            error!("Error while sending reply: {:?}", e);
            break;
        }
    }

    outcome
}

/// Decide whether a message is an event message for this bot.
///
/// `channel_name` is only consulted when the target is a channel name.
pub fn should_handle(
    author: serenity::UserId,
    bot_id: serenity::UserId,
    channel_id: serenity::ChannelId,
    channel_name: Option<&str>,
    target: &ChannelTarget,
) -> bool {
    if author == bot_id {
        return false;
    }

    target
        .matches_id(channel_id.get())
        .unwrap_or_else(|| target.matches_name(channel_name))
}

/// Name of a guild channel, if it can be looked up
async fn channel_name(ctx: &serenity::Context, channel_id: serenity::ChannelId) -> Option<String> {
    match channel_id.to_channel(ctx).await {
        Ok(channel) => channel.guild().map(|c| c.name),
        Err(e) => {
            warn!("Could not look up channel {}: {:?}", channel_id, e);
            None
        }
    }
}

/// Handle a message delivered by the gateway
pub async fn on_message(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    bot_id: serenity::UserId,
    data: &BotData,
) {
    if msg.author.id == bot_id {
        return;
    }

    let target = &data.config.channel;
    let name = match target.matches_id(msg.channel_id.get()) {
        Some(_) => None,
        None => channel_name(ctx, msg.channel_id).await,
    };

    if !should_handle(msg.author.id, bot_id, msg.channel_id, name.as_deref(), target) {
        debug!("Ignoring message in channel {}", msg.channel_id);
        return;
    }

    info!("Received message from {}: {}", msg.author.name, msg.content);

    let responder = ChannelResponder::new(Arc::clone(&ctx.http), msg.channel_id);
    let outcome = dispatch(&data.parser, data.calendar.as_ref(), &responder, &msg.content).await;

    debug!("Message {} handled: created = {}", msg.id, outcome.is_created());
}
