use std::error::Error;

use ai_embedding_service::telemetry;
use tracing::{Level, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file when one is present.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::DEBUG))
        .with(telemetry::layer())
        .try_init()?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env file, using process environment"),
    }

    info!("starting support chat backend");
    if let Err(e) = api::start().await {
        error!(error = %e, code = e.error_code(), "support chat backend stopped with an error");
        return Err(e.into());
    }

    Ok(())
}
