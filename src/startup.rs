use crate::components::event_parser::{EventDefaults, EventParser};
use crate::components::{EventSubmitter, GoogleCalendar};
use crate::config::Config;
use crate::error::Error;
use crate::handlers::{event_handler, BotData};
use crate::shutdown;
use poise::serenity_prelude as serenity;
use serenity::model::user::OnlineStatus;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,serenity=warn,poise=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(config)),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the Google Calendar client; the bot cannot run without one
pub fn init_calendar(config: &Config) -> miette::Result<Arc<GoogleCalendar>> {
    match GoogleCalendar::from_config(config) {
        Ok(calendar) => {
            info!("Google Calendar API client built successfully");
            Ok(Arc::new(calendar))
        }
        Err(e) => {
            error!("Failed to create Google Calendar API client: {:?}", e);
            Err(e.into())
        }
    }
}

/// Initialize and start the Discord bot
pub async fn start_bot(
    config: Arc<Config>,
    calendar: Arc<dyn EventSubmitter>,
) -> miette::Result<()> {
    let token = config.discord_token.clone();
    let activity = config.activity.clone();

    // Set locale from config
    rust_i18n::set_locale(&config.bot_locale);
    info!("Setting locale to {}", config.bot_locale);

    let parser = EventParser::new(EventDefaults::from_config(&config));
    info!(
        "Events start at {:02}:{:02} {}",
        parser.defaults().start_time.0,
        parser.defaults().start_time.1,
        parser.defaults().timezone
    );
    let data = BotData::new(Arc::clone(&config), parser, calendar);

    // Set up framework options
    let options = poise::FrameworkOptions {
        event_handler: |ctx, event, framework, data| {
            Box::pin(event_handler(ctx, event, framework, data))
        },
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    };

    // Message content is needed to read event descriptions
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let client_result = serenity::ClientBuilder::new(token, intents)
        .framework(poise::Framework::new(options, move |ctx, ready, _framework| {
            Box::pin(async move {
                info!("{} is connected!", ready.user.name);

                // Set the bot's status
                ctx.set_presence(
                    Some(serenity::ActivityData::watching(&activity)),
                    OnlineStatus::Online,
                );
                info!("Setting activity to {}", activity);

                Ok(data)
            })
        }))
        .await;

    // Start the bot
    info!("Starting bot...");
    let mut client = client_result.map_err(Error::from)?;

    // Create shutdown channel
    let (shutdown_send, shutdown_recv) = oneshot::channel();
    let shard_manager = Arc::clone(&client.shard_manager);

    // Spawn signal handler task
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shard_manager).await;
    });

    // Create a separate task to handle the client
    let client_handle = tokio::spawn(async move {
        if let Err(e) = client.start().await {
            Err(Error::from(e))
        } else {
            Ok(())
        }
    });

    // Wait for either the client to end or a shutdown signal
    tokio::select! {
        result = client_handle => {
            info!("Bot process ended");
            match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.into()),
                Err(e) => {
                    error!("Client task error: {:?}", e);
                    Err(Error::Other(format!("Client task error: {}", e)).into())
                }
            }
        }
        Ok(()) = shutdown_recv => {
            info!("Received shutdown signal, shutting down bot...");
            Ok(())
        }
    }
}

/// Handle errors raised inside the framework
async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Error during setup: {:?}", error);
        }
        poise::FrameworkError::EventHandler { error, .. } => {
            error!("Error in event handler: {:?}", error);
        }
        error => {
            error!("Other error: {:?}", error);
        }
    }
}
