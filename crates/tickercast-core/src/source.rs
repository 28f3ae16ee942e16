use std::fmt::{Display, Formatter};

use crate::ParseError;

/// Upstream services the bot talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Alphavantage,
    Polygon,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alphavantage => "alphavantage",
            Self::Polygon => "polygon",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetch failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Network error or timeout before a response arrived.
    Transport,
    /// The provider answered with a non-2xx status.
    UpstreamStatus,
    /// The body was not valid JSON or lacked the expected shape.
    Malformed,
    /// The provider answered 200 with an advisory body instead of data
    /// (quota notes, invalid-call messages).
    ProviderNotice,
}

/// Structured fetch error. Every variant means "skip this cycle"; none is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    provider: ProviderId,
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn transport(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::Transport, message)
    }

    pub fn upstream_status(provider: ProviderId, status: u16) -> Self {
        Self::new(
            provider,
            SourceErrorKind::UpstreamStatus,
            format!("{provider} returned status {status}"),
        )
    }

    pub fn malformed(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::Malformed, message)
    }

    pub fn notice(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, SourceErrorKind::ProviderNotice, message)
    }

    fn new(provider: ProviderId, kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            message: message.into(),
        }
    }

    pub const fn provider(&self) -> ProviderId {
        self.provider
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Transport => "source.transport",
            SourceErrorKind::UpstreamStatus => "source.upstream_status",
            SourceErrorKind::Malformed => "source.malformed",
            SourceErrorKind::ProviderNotice => "source.provider_notice",
        }
    }

    pub(crate) fn from_parse(provider: ProviderId, error: ParseError) -> Self {
        Self::malformed(provider, format!("{provider} payload rejected: {error}"))
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}
