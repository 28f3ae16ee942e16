use std::sync::Arc;

use serde_json::Value;

use super::fetch_json;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::news::{decode_feed, FeedItem};
use crate::parser::{parse_intraday, SERIES_KEY_PREFIX};
use crate::{IntradaySeries, ProviderId, SourceError, Symbol};

pub const ALPHAVANTAGE_ENDPOINT: &str = "https://www.alphavantage.co/query";

/// The news endpoint accepts a bounded ticker filter; extra symbols are dropped.
pub const NEWS_TICKER_LIMIT: usize = 10;
const NEWS_FEED_LIMIT: &str = "30";

/// Keys Alpha Vantage uses for advisory bodies returned with HTTP 200.
const NOTICE_KEYS: [&str; 3] = ["Note", "Information", "Error Message"];

/// Alpha Vantage adapter for intraday bars and news sentiment.
#[derive(Clone)]
pub struct AlphaVantageAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    endpoint: String,
}

impl AlphaVantageAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            auth: HttpAuth::QueryKey {
                name: "apikey",
                value: api_key.into(),
            },
            endpoint: String::from(ALPHAVANTAGE_ENDPOINT),
        }
    }

    /// Points the adapter at a different base URL (local fakes, proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Fetches the compact 1-minute series for `symbol` and parses it.
    pub async fn intraday(&self, symbol: &Symbol) -> Result<IntradaySeries, SourceError> {
        let request = HttpRequest::get(&self.endpoint)
            .with_query("function", "TIME_SERIES_INTRADAY")
            .with_query("symbol", symbol.as_str())
            .with_query("interval", "1min")
            .with_query("outputsize", "compact")
            .with_auth(&self.auth);

        tracing::debug!(%symbol, "fetching intraday series");
        let payload = self.fetch(request, has_time_series).await?;
        parse_intraday(&payload).map_err(|e| SourceError::from_parse(ProviderId::Alphavantage, e))
    }

    /// Fetches the latest news for up to [`NEWS_TICKER_LIMIT`] symbols.
    pub async fn news(&self, symbols: &[Symbol]) -> Result<Vec<FeedItem>, SourceError> {
        let tickers = symbols
            .iter()
            .take(NEWS_TICKER_LIMIT)
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let request = HttpRequest::get(&self.endpoint)
            .with_query("function", "NEWS_SENTIMENT")
            .with_query("tickers", &tickers)
            .with_query("limit", NEWS_FEED_LIMIT)
            .with_query("sort", "LATEST")
            .with_auth(&self.auth);

        tracing::debug!(%tickers, "fetching news feed");
        let payload = self.fetch(request, has_feed).await?;
        Ok(decode_feed(&payload))
    }

    /// An advisory notice only fails the call when the expected data is
    /// missing; a body carrying both is used as data.
    async fn fetch(
        &self,
        request: HttpRequest,
        has_data: fn(&Value) -> bool,
    ) -> Result<Value, SourceError> {
        let provider = ProviderId::Alphavantage;
        let payload = fetch_json(self.http_client.as_ref(), provider, request).await?;

        if !has_data(&payload) {
            if let Some(notice) = provider_notice(&payload) {
                return Err(SourceError::notice(
                    provider,
                    format!("alphavantage notice: {notice}"),
                ));
            }
        }
        Ok(payload)
    }
}

fn provider_notice(payload: &Value) -> Option<&str> {
    NOTICE_KEYS
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
}

fn has_time_series(payload: &Value) -> bool {
    payload
        .as_object()
        .is_some_and(|object| object.keys().any(|key| key.starts_with(SERIES_KEY_PREFIX)))
}

fn has_feed(payload: &Value) -> bool {
    payload.get("feed").is_some_and(Value::is_array)
}
