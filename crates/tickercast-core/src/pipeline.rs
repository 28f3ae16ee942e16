//! Price and news cycles.
//!
//! A cycle never fails as a whole: every fetch, parse and publish error is
//! logged, counted in the [`CycleReport`] and the cycle moves on to the next
//! symbol or headline.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::AlphaVantageAdapter;
use crate::indicators::{delta_direction, price_delta};
use crate::news::{NewsDeduplicator, SeenNewsRegistry};
use crate::options_flow::OptionsFlow;
use crate::publisher::SignalPublisher;
use crate::{IndicatorSet, IntradaySeries, OptionsFlowSummary, PriceSignal, Symbol};

/// Pause after each price line.
pub const PRICE_PUBLISH_PAUSE: Duration = Duration::from_millis(1_200);
/// Pause after each news item.
pub const NEWS_PUBLISH_PAUSE: Duration = Duration::from_millis(1_000);

/// Outcome counters for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub published: usize,
    /// Symbols or batches dropped because the fetch or parse failed.
    pub skipped: usize,
    pub publish_failures: usize,
}

/// A unit of work driven by the [`Scheduler`](crate::scheduler::Scheduler).
pub trait PeriodicTask: Send {
    fn name(&self) -> &'static str;

    fn run_once(&mut self) -> Pin<Box<dyn Future<Output = CycleReport> + Send + '_>>;
}

/// Combines a parsed series and optional options flow into a publishable value.
pub fn derive_signal(
    symbol: Symbol,
    series: &IntradaySeries,
    options_flow: Option<OptionsFlowSummary>,
) -> PriceSignal {
    let delta = price_delta(&series.closes());
    PriceSignal {
        symbol,
        last_close: series.last_close(),
        delta,
        direction: delta_direction(delta),
        indicators: IndicatorSet::compute(series),
        options_flow,
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Fetches, derives and publishes one price line per symbol.
pub struct PriceCycle {
    market: AlphaVantageAdapter,
    options_flow: OptionsFlow,
    publisher: Arc<dyn SignalPublisher>,
    symbols: Vec<Symbol>,
    publish_pause: Duration,
}

impl PriceCycle {
    pub fn new(
        market: AlphaVantageAdapter,
        options_flow: OptionsFlow,
        publisher: Arc<dyn SignalPublisher>,
        symbols: Vec<Symbol>,
    ) -> Self {
        Self {
            market,
            options_flow,
            publisher,
            symbols,
            publish_pause: PRICE_PUBLISH_PAUSE,
        }
    }

    pub fn with_publish_pause(mut self, publish_pause: Duration) -> Self {
        self.publish_pause = publish_pause;
        self
    }

    /// Processes every symbol in order; one symbol's failure never stops the rest.
    pub async fn run(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for symbol in &self.symbols {
            let series = match self.market.intraday(symbol).await {
                Ok(series) => series,
                Err(error) => {
                    tracing::warn!(
                        %symbol,
                        provider = %error.provider(),
                        %error,
                        "skipping symbol: intraday fetch failed"
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            let options_flow = self.options_flow.summary(symbol).await;
            let signal = derive_signal(symbol.clone(), &series, options_flow);
            tracing::debug!(
                %symbol,
                bars = series.len(),
                last = signal.last_close,
                delta = signal.delta,
                spike = signal.indicators.spike.is_some(),
                "derived price signal"
            );

            match self.publisher.publish_price(&signal).await {
                Ok(()) => report.published += 1,
                Err(error) => {
                    tracing::warn!(%symbol, %error, "price publish failed");
                    report.publish_failures += 1;
                }
            }
            pause(self.publish_pause).await;
        }

        report
    }
}

impl PeriodicTask for PriceCycle {
    fn name(&self) -> &'static str {
        "price"
    }

    fn run_once(&mut self) -> Pin<Box<dyn Future<Output = CycleReport> + Send + '_>> {
        Box::pin(self.run())
    }
}

/// Fetches the news feed, drops already-seen items and publishes the rest.
///
/// Owns the process-lifetime [`SeenNewsRegistry`].
pub struct NewsCycle {
    market: AlphaVantageAdapter,
    publisher: Arc<dyn SignalPublisher>,
    symbols: Vec<Symbol>,
    dedup: NewsDeduplicator,
    registry: SeenNewsRegistry,
    publish_pause: Duration,
}

impl NewsCycle {
    pub fn new(
        market: AlphaVantageAdapter,
        publisher: Arc<dyn SignalPublisher>,
        symbols: Vec<Symbol>,
    ) -> Self {
        Self {
            market,
            publisher,
            symbols,
            dedup: NewsDeduplicator::default(),
            registry: SeenNewsRegistry::new(),
            publish_pause: NEWS_PUBLISH_PAUSE,
        }
    }

    pub fn with_publish_pause(mut self, publish_pause: Duration) -> Self {
        self.publish_pause = publish_pause;
        self
    }

    pub fn with_deduplicator(mut self, dedup: NewsDeduplicator) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn registry(&self) -> &SeenNewsRegistry {
        &self.registry
    }

    pub async fn run(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        let feed = match self.market.news(&self.symbols).await {
            Ok(feed) => feed,
            Err(error) => {
                tracing::warn!(
                    provider = %error.provider(),
                    %error,
                    "skipping news cycle: feed fetch failed"
                );
                report.skipped += 1;
                return report;
            }
        };

        let fresh = self.dedup.select(feed, &mut self.registry);
        tracing::debug!(
            fresh = fresh.len(),
            seen_total = self.registry.len(),
            "selected unseen news"
        );

        for item in &fresh {
            match self.publisher.publish_news(item).await {
                Ok(()) => report.published += 1,
                Err(error) => {
                    tracing::warn!(news_id = %item.id, %error, "news publish failed");
                    report.publish_failures += 1;
                }
            }
            pause(self.publish_pause).await;
        }

        report
    }
}

impl PeriodicTask for NewsCycle {
    fn name(&self) -> &'static str {
        "news"
    }

    fn run_once(&mut self) -> Pin<Box<dyn Future<Output = CycleReport> + Send + '_>> {
        Box::pin(self.run())
    }
}
