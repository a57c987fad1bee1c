use std::error::Error;

use ai_llm_service::telemetry;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; variables may come from the environment.
    let dotenv = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,advisor=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(telemetry::layer())
        .try_init()?;

    if let Err(e) = dotenv {
        warn!(error = %e, "no .env loaded");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "product advisor starting");

    api::start().await?;

    Ok(())
}
