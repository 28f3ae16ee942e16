//! News deduplication.
//!
//! [`SeenNewsRegistry`] is created once at process start and handed to the
//! news loop, which owns it for the life of the process. It is never persisted
//! and never evicted, so a restart may re-post recent headlines.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::NewsItem;

/// Upper bound on headlines published per news cycle.
pub const MAX_NEWS_PER_CYCLE: usize = 10;

const DEFAULT_HEADLINE: &str = "News";

/// Ids of every news item selected for publishing so far.
#[derive(Debug, Default)]
pub struct SeenNewsRegistry {
    ids: HashSet<String>,
}

impl SeenNewsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `false` if the id was already present.
    pub fn mark_seen(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One entry of the provider news feed, before identity resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ticker_sentiment: Vec<TickerSentiment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TickerSentiment {
    #[serde(default)]
    pub ticker: Option<String>,
}

impl FeedItem {
    /// Stable identity: the uuid, else the url. Blank strings do not count.
    pub fn identity(&self) -> Option<&str> {
        non_blank(self.uuid.as_deref()).or_else(|| non_blank(self.url.as_deref()))
    }

    fn into_news_item(self, id: String) -> NewsItem {
        let headline = non_blank(self.title.as_deref())
            .unwrap_or(DEFAULT_HEADLINE)
            .to_owned();
        let url = non_blank(self.url.as_deref()).map(str::to_owned);
        let related_tickers = self
            .ticker_sentiment
            .into_iter()
            .filter_map(|entry| entry.ticker)
            .filter(|ticker| !ticker.trim().is_empty())
            .collect();

        NewsItem {
            id,
            headline,
            url,
            related_tickers,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Decodes the `feed` array of a news response, skipping entries that do not
/// have the expected shape instead of failing the whole batch.
pub fn decode_feed(payload: &Value) -> Vec<FeedItem> {
    let Some(entries) = payload.get("feed").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match FeedItem::deserialize(entry) {
            Ok(item) => Some(item),
            Err(error) => {
                tracing::debug!(%error, "skipping malformed news feed entry");
                None
            }
        })
        .collect()
}

/// Selects unseen news items and records them in the registry.
#[derive(Debug, Clone, Copy)]
pub struct NewsDeduplicator {
    max_per_cycle: usize,
}

impl Default for NewsDeduplicator {
    fn default() -> Self {
        Self::new(MAX_NEWS_PER_CYCLE)
    }
}

impl NewsDeduplicator {
    pub const fn new(max_per_cycle: usize) -> Self {
        Self { max_per_cycle }
    }

    pub const fn max_per_cycle(&self) -> usize {
        self.max_per_cycle
    }

    /// Returns at most `max_per_cycle` unseen items in feed order.
    ///
    /// Selected ids are registered immediately, before anything is published,
    /// so a later delivery failure is never retried. Items past the cap are
    /// left unregistered and stay eligible for the next cycle. Items without
    /// a uuid or url are dropped and never registered. Repeats of one id
    /// inside a single batch are selected once.
    pub fn select(
        &self,
        feed: impl IntoIterator<Item = FeedItem>,
        registry: &mut SeenNewsRegistry,
    ) -> Vec<NewsItem> {
        let mut selected = Vec::new();

        for item in feed {
            if selected.len() >= self.max_per_cycle {
                break;
            }

            let Some(id) = item.identity().map(str::to_owned) else {
                continue;
            };
            if !registry.mark_seen(id.clone()) {
                continue;
            }

            selected.push(item.into_news_item(id));
        }

        selected
    }
}
