//! Two fixed-interval loops multiplexed on the current task.
//!
//! The price and news loops are polled from the same task, so they interleave
//! only where a cycle awaits (fetch, publish, pacing sleep). Each loop holds
//! exclusive `&mut` access to its own task, so no state is shared between them.

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::pipeline::PeriodicTask;

pub const DEFAULT_PRICE_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_NEWS_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    price_every: Duration,
    news_every: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_INTERVAL, DEFAULT_NEWS_INTERVAL)
    }
}

impl Scheduler {
    /// Both intervals must be non-zero; configuration validates this upstream.
    pub const fn new(price_every: Duration, news_every: Duration) -> Self {
        Self {
            price_every,
            news_every,
        }
    }

    /// Runs both loops until `shutdown` resolves. The first cycle of each loop
    /// starts immediately. A cycle that overruns its interval delays the next
    /// tick instead of triggering a burst of catch-up runs.
    pub async fn run<P, N, S>(&self, price: &mut P, news: &mut N, shutdown: S)
    where
        P: PeriodicTask,
        N: PeriodicTask,
        S: Future<Output = ()>,
    {
        tracing::info!(
            price_every_s = self.price_every.as_secs(),
            news_every_s = self.news_every.as_secs(),
            "scheduler started"
        );

        tokio::select! {
            () = shutdown => tracing::info!("shutdown requested; stopping scheduler"),
            _ = async {
                tokio::join!(
                    run_periodic(self.price_every, price),
                    run_periodic(self.news_every, news),
                )
            } => {}
        }
    }
}

async fn run_periodic<T: PeriodicTask>(every: Duration, task: &mut T) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let report = task.run_once().await;
        tracing::info!(
            task = task.name(),
            published = report.published,
            skipped = report.skipped,
            publish_failures = report.publish_failures,
            "cycle complete"
        );
    }
}
