use thiserror::Error;

/// Startup failures. Everything after startup is logged and survived.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("destination channel check failed: {0}")]
    Destination(#[from] tickercast_core::PublishError),
}

impl BotError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Destination(_) => 3,
        }
    }
}

/// Invalid or missing configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("DISCORD_CHANNEL_ID must be a positive integer, got '{0}'")]
    InvalidChannelId(String),

    #[error(transparent)]
    Validation(#[from] tickercast_core::ValidationError),
}
