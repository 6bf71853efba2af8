use kalenteribotti::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting Kalenteribotti");

    // Load configuration
    let config = startup::load_config()?;

    // The process exits here if the calendar client cannot be built
    let calendar = startup::init_calendar(&config)?;

    // Start the bot
    startup::start_bot(config, calendar).await
}
