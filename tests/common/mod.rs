//! Shared fakes for the behavior tests.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};
use tickercast_core::publisher::PublishFuture;
use tickercast_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NewsItem, PriceSignal, PublishError,
    SignalPublisher,
};

/// Answers each request with the first route whose fragment occurs in the URL.
/// Unrouted requests get a 404.
#[derive(Default)]
pub struct RoutedHttpClient {
    routes: Vec<(String, Result<HttpResponse, HttpError>)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RoutedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url_fragment: &str, response: Result<HttpResponse, HttpError>) -> Self {
        self.routes.push((url_fragment.to_owned(), response));
        self
    }

    pub fn ok_json(self, url_fragment: &str, body: &Value) -> Self {
        self.route(url_fragment, Ok(HttpResponse::ok_json(body.to_string())))
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

impl HttpClient for RoutedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .iter()
            .find(|(fragment, _)| request.url.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "not found")));

        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);

        Box::pin(async move { response })
    }
}

/// Records everything published; can be told to fail specific news ids.
#[derive(Default)]
pub struct RecordingPublisher {
    prices: Mutex<Vec<PriceSignal>>,
    news: Mutex<Vec<NewsItem>>,
    failing_news_ids: Vec<String>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_news(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            failing_news_ids: ids.iter().map(|id| (*id).to_owned()).collect(),
            ..Self::default()
        })
    }

    pub fn prices(&self) -> Vec<PriceSignal> {
        self.prices.lock().expect("price store").clone()
    }

    pub fn price_symbols(&self) -> Vec<String> {
        self.prices()
            .iter()
            .map(|signal| signal.symbol.as_str().to_owned())
            .collect()
    }

    pub fn news(&self) -> Vec<NewsItem> {
        self.news.lock().expect("news store").clone()
    }

    pub fn news_ids(&self) -> Vec<String> {
        self.news().into_iter().map(|item| item.id).collect()
    }
}

impl SignalPublisher for RecordingPublisher {
    fn publish_price<'a>(&'a self, signal: &'a PriceSignal) -> PublishFuture<'a> {
        Box::pin(async move {
            self.prices.lock().expect("price store").push(signal.clone());
            Ok(())
        })
    }

    fn publish_news<'a>(&'a self, item: &'a NewsItem) -> PublishFuture<'a> {
        Box::pin(async move {
            if self.failing_news_ids.contains(&item.id) {
                return Err(PublishError::Rejected {
                    status: 403,
                    body: String::from("missing access"),
                });
            }
            self.news.lock().expect("news store").push(item.clone());
            Ok(())
        })
    }
}

/// Minute timestamp `index` minutes after 09:30 on a fixed session day.
pub fn minute_timestamp(index: usize) -> String {
    let minutes = 9 * 60 + 30 + index;
    format!("2024-05-01 {:02}:{:02}:00", minutes / 60, minutes % 60)
}

/// Alpha Vantage-shaped intraday payload, one bar per `(close, volume)` pair,
/// with high/low half a dollar around the close.
pub fn intraday_payload(bars: &[(f64, u64)]) -> Value {
    let mut series = Map::new();
    for (index, (close, volume)) in bars.iter().enumerate() {
        series.insert(
            minute_timestamp(index),
            json!({
                "1. open": format!("{close:.4}"),
                "2. high": format!("{:.4}", close + 0.5),
                "3. low": format!("{:.4}", close - 0.5),
                "4. close": format!("{close:.4}"),
                "5. volume": volume.to_string(),
            }),
        );
    }
    json!({
        "Meta Data": { "2. Symbol": "TEST" },
        "Time Series (1min)": Value::Object(series),
    })
}

pub fn news_entry(uuid: &str, title: &str, tickers: &[&str]) -> Value {
    json!({
        "uuid": uuid,
        "title": title,
        "url": format!("https://news.example/{uuid}"),
        "ticker_sentiment": tickers
            .iter()
            .map(|ticker| json!({ "ticker": ticker }))
            .collect::<Vec<_>>(),
    })
}

pub fn news_payload(entries: Vec<Value>) -> Value {
    json!({ "items": entries.len().to_string(), "feed": entries })
}
