//! # Tickercast Core
//!
//! Market-signal derivation for the tickercast chat bot.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`parser`] | Raw intraday payload → chronological bar series |
//! | [`indicators`] | EMA, rolling VWAP, volume spike, price delta |
//! | [`news`] | News feed decoding and deduplication |
//! | [`options_flow`] | Optional call/put volume summary |
//! | [`adapters`] | Alpha Vantage and Polygon HTTP adapters |
//! | [`publisher`] | Publisher contract and the Discord implementation |
//! | [`pipeline`] | Price and news cycles |
//! | [`scheduler`] | Fixed-interval driver for both cycles |
//!
//! ## Flow
//!
//! ```text
//! Scheduler ──▶ PriceCycle ──▶ AlphaVantageAdapter::intraday ──▶ parser
//!                    │                                            │
//!                    │        OptionsFlow::summary (optional)     ▼
//!                    └───────────────▶ derive_signal ◀──── IndicatorSet::compute
//!                                           │
//!                                           ▼
//!                                    SignalPublisher
//!
//! Scheduler ──▶ NewsCycle ──▶ AlphaVantageAdapter::news ──▶ NewsDeduplicator ──▶ SignalPublisher
//! ```
//!
//! ## Error Handling
//!
//! Fetch failures are [`SourceError`]s, classified by [`SourceErrorKind`].
//! Missing history is never an error: indicators come back as `None` and are
//! left out of the published line.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod indicators;
pub mod news;
pub mod options_flow;
pub mod parser;
pub mod pipeline;
pub mod publisher;
pub mod retry;
pub mod scheduler;
pub mod source;
pub mod throttling;

pub use adapters::{AlphaVantageAdapter, PolygonAdapter};

pub use domain::{
    Bar, Direction, Hlc, IndicatorSet, IntradaySeries, NewsItem, OptionsFlowSummary, PriceSignal,
    Symbol, VolumeSpike,
};

pub use error::{ParseError, PublishError, ValidationError};

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpErrorKind, HttpMethod, HttpRequest, HttpResponse,
    ReqwestHttpClient,
};

pub use news::{FeedItem, NewsDeduplicator, SeenNewsRegistry};

pub use options_flow::OptionsFlow;

pub use pipeline::{derive_signal, CycleReport, NewsCycle, PeriodicTask, PriceCycle};

pub use publisher::{DiscordPublisher, SignalPublisher};

pub use retry::{Backoff, RetryPolicy};

pub use scheduler::Scheduler;

pub use source::{ProviderId, SourceError, SourceErrorKind};

pub use throttling::SendThrottle;
