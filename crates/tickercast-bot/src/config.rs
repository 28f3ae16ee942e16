//! Command-line and environment configuration.
//!
//! Every option can be passed as a flag or through the environment variable
//! shown in `--help`:
//!
//! | Variable | Default | Required |
//! |----------|---------|----------|
//! | `DISCORD_BOT_TOKEN` | | yes |
//! | `DISCORD_CHANNEL_ID` | | yes |
//! | `ALPHAVANTAGE_API_KEY` | | yes |
//! | `POLYGON_API_KEY` | | no, enables options flow |
//! | `TICKERS` | `AAPL,MSFT,SPY,TSLA,QQQ` | no |
//! | `PRICE_LOOP_SECONDS` | `60` | no |
//! | `NEWS_LOOP_SECONDS` | `300` | no |

use std::time::Duration;

use clap::Parser;
use tickercast_core::{Symbol, ValidationError};

use crate::error::ConfigError;

pub const DEFAULT_TICKERS: &str = "AAPL,MSFT,SPY,TSLA,QQQ";

/// Posts intraday price signals and market news to a Discord channel.
#[derive(Debug, Parser)]
#[command(name = "tickercast", version, about)]
pub struct Cli {
    /// Discord bot token.
    #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    pub discord_token: Option<String>,

    /// Numeric id of the destination text channel.
    #[arg(long, env = "DISCORD_CHANNEL_ID")]
    pub discord_channel_id: Option<String>,

    /// Alpha Vantage API key (intraday bars and news).
    #[arg(long, env = "ALPHAVANTAGE_API_KEY", hide_env_values = true)]
    pub alphavantage_key: Option<String>,

    /// Polygon.io API key; options flow is disabled when absent or blank.
    #[arg(long, env = "POLYGON_API_KEY", hide_env_values = true)]
    pub polygon_key: Option<String>,

    /// Comma-separated tickers to follow.
    #[arg(long, env = "TICKERS", default_value = DEFAULT_TICKERS)]
    pub tickers: String,

    /// Seconds between price cycles.
    #[arg(long, env = "PRICE_LOOP_SECONDS", default_value_t = 60)]
    pub price_loop_seconds: u64,

    /// Seconds between news cycles.
    #[arg(long, env = "NEWS_LOOP_SECONDS", default_value_t = 300)]
    pub news_loop_seconds: u64,
}

/// Validated runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub discord_token: String,
    pub channel_id: u64,
    pub alphavantage_key: String,
    pub polygon_key: Option<String>,
    pub symbols: Vec<Symbol>,
    pub price_every: Duration,
    pub news_every: Duration,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("channel_id", &self.channel_id)
            .field("options_flow", &self.polygon_key.is_some())
            .field("symbols", &self.symbols)
            .field("price_every", &self.price_every)
            .field("news_every", &self.news_every)
            .finish_non_exhaustive()
    }
}

impl BotConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let discord_token = required(cli.discord_token, "DISCORD_BOT_TOKEN")?;
        let raw_channel = required(cli.discord_channel_id, "DISCORD_CHANNEL_ID")?;
        let alphavantage_key = required(cli.alphavantage_key, "ALPHAVANTAGE_API_KEY")?;

        let channel_id = raw_channel
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(ConfigError::InvalidChannelId(raw_channel))?;

        Ok(Self {
            discord_token,
            channel_id,
            alphavantage_key,
            polygon_key: non_blank(cli.polygon_key),
            symbols: Symbol::parse_list(&cli.tickers)?,
            price_every: interval(cli.price_loop_seconds, "PRICE_LOOP_SECONDS")?,
            news_every: interval(cli.news_loop_seconds, "NEWS_LOOP_SECONDS")?,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    non_blank(value).ok_or(ConfigError::Missing(name))
}

fn interval(seconds: u64, field: &'static str) -> Result<Duration, ValidationError> {
    if seconds == 0 {
        return Err(ValidationError::ZeroInterval { field });
    }
    Ok(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> Cli {
        Cli {
            discord_token: Some(String::from("token")),
            discord_channel_id: Some(String::from("1429934034095706203")),
            alphavantage_key: Some(String::from("alpha")),
            polygon_key: None,
            tickers: String::from(DEFAULT_TICKERS),
            price_loop_seconds: 60,
            news_loop_seconds: 300,
        }
    }

    #[test]
    fn defaults_produce_five_symbols_and_standard_intervals() {
        let config = BotConfig::from_cli(cli()).expect("valid config");

        assert_eq!(config.channel_id, 1_429_934_034_095_706_203);
        assert_eq!(config.symbols.len(), 5);
        assert_eq!(config.symbols[2].as_str(), "SPY");
        assert_eq!(config.price_every, Duration::from_secs(60));
        assert_eq!(config.news_every, Duration::from_secs(300));
        assert_eq!(config.polygon_key, None);
    }

    #[test]
    fn blank_required_value_is_missing() {
        let mut input = cli();
        input.discord_token = Some(String::from("   "));

        assert_eq!(
            BotConfig::from_cli(input),
            Err(ConfigError::Missing("DISCORD_BOT_TOKEN"))
        );
    }

    #[test]
    fn absent_alphavantage_key_is_missing() {
        let mut input = cli();
        input.alphavantage_key = None;

        assert_eq!(
            BotConfig::from_cli(input),
            Err(ConfigError::Missing("ALPHAVANTAGE_API_KEY"))
        );
    }

    #[test]
    fn non_numeric_channel_id_is_rejected() {
        let mut input = cli();
        input.discord_channel_id = Some(String::from("general"));

        assert_eq!(
            BotConfig::from_cli(input),
            Err(ConfigError::InvalidChannelId(String::from("general")))
        );
    }

    #[test]
    fn blank_polygon_key_disables_options_flow() {
        let mut input = cli();
        input.polygon_key = Some(String::from(" "));
        assert_eq!(BotConfig::from_cli(input).expect("valid").polygon_key, None);

        let mut input = cli();
        input.polygon_key = Some(String::from("poly"));
        assert_eq!(
            BotConfig::from_cli(input).expect("valid").polygon_key.as_deref(),
            Some("poly")
        );
    }

    #[test]
    fn tickers_are_normalized() {
        let mut input = cli();
        input.tickers = String::from(" nvda, ,amd ");

        let config = BotConfig::from_cli(input).expect("valid");
        let names: Vec<_> = config.symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, ["NVDA", "AMD"]);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut input = cli();
        input.news_loop_seconds = 0;

        assert_eq!(
            BotConfig::from_cli(input),
            Err(ConfigError::Validation(ValidationError::ZeroInterval {
                field: "NEWS_LOOP_SECONDS"
            }))
        );
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = BotConfig::from_cli(cli()).expect("valid");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("token"));
        assert!(!rendered.contains("alpha"));
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
