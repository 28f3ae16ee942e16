mod config;
mod error;
mod logging;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tickercast_core::{
    AlphaVantageAdapter, DiscordPublisher, HttpClient, NewsCycle, OptionsFlow, PolygonAdapter,
    PriceCycle, ReqwestHttpClient, Scheduler, SignalPublisher,
};

use crate::config::{BotConfig, Cli};
use crate::error::BotError;
use crate::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "tickercast failed to start");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), BotError> {
    let config = BotConfig::from_cli(Cli::parse())?;
    tracing::debug!(?config, "configuration loaded");

    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    let discord = DiscordPublisher::new(
        Arc::clone(&http_client),
        config.discord_token.clone(),
        config.channel_id,
    );
    discord.verify_channel().await?;
    let publisher: Arc<dyn SignalPublisher> = Arc::new(discord);

    let market =
        AlphaVantageAdapter::new(Arc::clone(&http_client), config.alphavantage_key.clone());
    let options_flow = match &config.polygon_key {
        Some(key) => {
            OptionsFlow::Enabled(PolygonAdapter::new(Arc::clone(&http_client), key.clone()))
        }
        None => OptionsFlow::Disabled,
    };

    tracing::info!(
        channel_id = config.channel_id,
        symbols = %config
            .symbols
            .iter()
            .map(|symbol| symbol.as_str())
            .collect::<Vec<_>>()
            .join(","),
        options_flow = options_flow.is_enabled(),
        "tickercast ready"
    );

    let mut price = PriceCycle::new(
        market.clone(),
        options_flow,
        Arc::clone(&publisher),
        config.symbols.clone(),
    );
    let mut news = NewsCycle::new(market, publisher, config.symbols.clone());

    Scheduler::new(config.price_every, config.news_every)
        .run(&mut price, &mut news, shutdown_signal())
        .await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
