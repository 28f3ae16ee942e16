//! Outbound signal delivery.
//!
//! The pipeline hands fully resolved values ([`PriceSignal`], [`NewsItem`]) to
//! a [`SignalPublisher`]; composing text and getting it to the channel,
//! including rate limiting and per-send retries, is the publisher's job.

mod discord;
mod format;

pub use discord::{DiscordPublisher, DISCORD_API_BASE, NEWS_FOOTER};
pub use format::{direction_dot, format_price_line, trend_arrow};

use std::future::Future;
use std::pin::Pin;

use crate::{NewsItem, PriceSignal, PublishError};

/// Boxed future returned by [`SignalPublisher`] methods.
pub type PublishFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + 'a>>;

/// Destination for derived signals.
pub trait SignalPublisher: Send + Sync {
    /// Publishes one price line for one symbol.
    fn publish_price<'a>(&'a self, signal: &'a PriceSignal) -> PublishFuture<'a>;

    /// Publishes one news headline.
    fn publish_news<'a>(&'a self, item: &'a NewsItem) -> PublishFuture<'a>;
}
