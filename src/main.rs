use anyhow::{Context, Result};
use std::sync::Arc;
use tempo_rates::config::Config;
use tempo_rates::logging::init_logging;
use tempo_rates::tempo::{PriceTable, RateService, UpstreamClient};
use tempo_rates::web::{AppState, serve};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Missing or invalid configuration is fatal
    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config.logging).context("Failed to initialize logging")?;
    info!(
        "Tempo rates {} starting up ({})",
        env!("APP_VERSION"),
        config.summary()
    );

    let prices = PriceTable::from_config(&config.prices).context("Invalid price table")?;
    let tz = config.tz()?;
    let client = UpstreamClient::from_config(&config).context("Failed to build HTTP client")?;

    let state = AppState::new(RateService::new(Arc::new(client), prices, tz));
    serve(state, &config.web.host, config.web.port)
        .await
        .context("Web server failed")
}
