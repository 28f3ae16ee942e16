//! Behavior tests for the price and news cycles.
//!
//! These verify HOW a cycle degrades: which failures skip a symbol, which
//! skip a whole batch, and that nothing is ever published twice.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{intraday_payload, news_entry, news_payload, RecordingPublisher, RoutedHttpClient};
use serde_json::json;
use tickercast_core::publisher::format_price_line;
use tickercast_core::{
    AlphaVantageAdapter, CycleReport, Direction, HttpClient, HttpResponse, NewsCycle,
    NewsDeduplicator, OptionsFlow, OptionsFlowSummary, PolygonAdapter, PriceCycle, Symbol,
};

fn symbols(list: &str) -> Vec<Symbol> {
    Symbol::parse_list(list).expect("valid symbols")
}

/// `count` bars with closes rising by one dollar from 100 and flat volume.
fn rising_bars(count: usize) -> Vec<(f64, u64)> {
    (0..count).map(|i| (100.0 + i as f64, 1_000)).collect()
}

fn price_cycle(
    client: Arc<dyn HttpClient>,
    options_flow: OptionsFlow,
    publisher: Arc<RecordingPublisher>,
    tickers: &str,
) -> PriceCycle {
    PriceCycle::new(
        AlphaVantageAdapter::new(client, "av-key"),
        options_flow,
        publisher,
        symbols(tickers),
    )
    .with_publish_pause(Duration::ZERO)
}

fn news_cycle(client: Arc<dyn HttpClient>, publisher: Arc<RecordingPublisher>) -> NewsCycle {
    NewsCycle::new(
        AlphaVantageAdapter::new(client, "av-key"),
        publisher,
        symbols("AAPL,MSFT"),
    )
    .with_publish_pause(Duration::ZERO)
}

// =============================================================================
// Price cycle
// =============================================================================

#[tokio::test]
async fn when_one_symbol_fails_later_symbols_are_still_published() {
    // Given: AAPL is down, MSFT is healthy, SPY hits the quota note
    let client = Arc::new(
        RoutedHttpClient::new()
            .route("symbol=AAPL", Ok(HttpResponse::with_status(503, "down")))
            .ok_json("symbol=MSFT", &intraday_payload(&rising_bars(30)))
            .ok_json("symbol=SPY", &json!({ "Note": "call frequency exceeded" })),
    );
    let publisher = RecordingPublisher::new();
    let cycle = price_cycle(
        client.clone(),
        OptionsFlow::Disabled,
        publisher.clone(),
        "AAPL,MSFT,SPY",
    );

    // When: One price cycle runs
    let report = cycle.run().await;

    // Then: Every symbol was attempted, in order
    let urls = client.urls();
    assert_eq!(urls.len(), 3);
    assert!(urls[0].contains("symbol=AAPL"));
    assert!(urls[2].contains("symbol=SPY"));

    // And: Only the healthy symbol was published
    assert_eq!(publisher.price_symbols(), ["MSFT"]);
    assert_eq!(
        report,
        CycleReport {
            published: 1,
            skipped: 2,
            publish_failures: 0,
        }
    );
}

#[tokio::test]
async fn when_history_is_long_enough_signal_carries_every_indicator() {
    // Given: Thirty rising bars with a volume burst on the last one
    let mut bars = rising_bars(30);
    bars[29].1 = 5_000;
    let client = Arc::new(RoutedHttpClient::new().ok_json("symbol=NVDA", &intraday_payload(&bars)));
    let publisher = RecordingPublisher::new();
    let cycle = price_cycle(client, OptionsFlow::Disabled, publisher.clone(), "NVDA");

    // When: The cycle runs
    cycle.run().await;

    // Then: The signal has a delta, both EMAs trending up, a VWAP and a spike
    let prices = publisher.prices();
    let signal = &prices[0];
    assert_eq!(signal.last_close, 129.0);
    assert!((signal.delta - 1.0).abs() < 1e-9);
    assert_eq!(signal.direction, Direction::Up);

    let indicators = &signal.indicators;
    let fast = indicators.ema_fast.expect("fast ema");
    let slow = indicators.ema_slow.expect("slow ema");
    assert!(fast > slow, "rising closes should put the fast EMA above the slow one");
    assert_eq!(signal.trend(), Some(Direction::Up));
    assert!(indicators.vwap.is_some());

    let spike = indicators.spike.expect("spike");
    assert!((spike.ratio - 5.0).abs() < 1e-9);
    assert_eq!(spike.current_volume, 5_000);
    assert_eq!(signal.options_flow, None);

    // And: The rendered line shows each segment
    let line = format_price_line(signal);
    assert!(line.starts_with("🟢 **NVDA** 129.00 (+1.00)"), "got {line}");
    assert!(line.contains(" • Vol spike 5.0×"));
    assert!(line.contains(" • EMA9/21: "));
    assert!(line.contains(" • VWAP: "));
    assert!(!line.contains("Opts flow"));
}

#[tokio::test]
async fn when_only_one_bar_exists_signal_has_no_indicators_and_reads_up() {
    let client = Arc::new(
        RoutedHttpClient::new().ok_json("symbol=QQQ", &intraday_payload(&[(440.25, 0)])),
    );
    let publisher = RecordingPublisher::new();
    let cycle = price_cycle(client, OptionsFlow::Disabled, publisher.clone(), "QQQ");

    cycle.run().await;

    let prices = publisher.prices();
    let signal = &prices[0];
    assert_eq!(signal.delta, 0.0);
    assert_eq!(signal.direction, Direction::Up);
    assert_eq!(signal.indicators.ema_fast, None);
    assert_eq!(signal.indicators.ema_slow, None);
    assert_eq!(signal.indicators.vwap, None, "zero volume has no VWAP");
    assert_eq!(signal.indicators.spike, None);
    assert_eq!(format_price_line(signal), "🟢 **QQQ** 440.25 (+0.00)");
}

#[tokio::test]
async fn when_options_flow_is_enabled_signal_includes_call_put_totals() {
    // Given: Both providers answer
    let client = Arc::new(
        RoutedHttpClient::new()
            .ok_json("symbol=TSLA", &intraday_payload(&rising_bars(3)))
            .ok_json(
                "/v3/snapshot/options/TSLA",
                &json!({
                    "status": "OK",
                    "results": [
                        { "details": { "contract_type": "call" }, "day": { "volume": 900 } },
                        { "details": { "contract_type": "put" }, "day": { "volume": 300 } },
                    ]
                }),
            ),
    );
    let options_flow = OptionsFlow::Enabled(PolygonAdapter::new(client.clone(), "poly-key"));
    let publisher = RecordingPublisher::new();
    let cycle = price_cycle(client, options_flow, publisher.clone(), "TSLA");

    // When: The cycle runs
    cycle.run().await;

    // Then: The summary rides along with the price signal
    let prices = publisher.prices();
    let signal = &prices[0];
    assert_eq!(
        signal.options_flow,
        Some(OptionsFlowSummary {
            call_volume: 900,
            put_volume: 300,
        })
    );
    assert!(format_price_line(signal).ends_with(" • Opts flow C/P: 900/300"));
}

#[tokio::test]
async fn when_options_provider_fails_price_line_is_still_published() {
    let client = Arc::new(
        RoutedHttpClient::new()
            .ok_json("symbol=TSLA", &intraday_payload(&rising_bars(3)))
            .route("/v3/snapshot/options/", Ok(HttpResponse::with_status(403, "forbidden"))),
    );
    let options_flow = OptionsFlow::Enabled(PolygonAdapter::new(client.clone(), "poly-key"));
    let publisher = RecordingPublisher::new();
    let cycle = price_cycle(client, options_flow, publisher.clone(), "TSLA");

    let report = cycle.run().await;

    assert_eq!(report.published, 1);
    assert_eq!(publisher.prices()[0].options_flow, None);
}

// =============================================================================
// News cycle
// =============================================================================

#[tokio::test]
async fn when_same_story_appears_in_two_cycles_it_is_published_once() {
    // Given: A feed that returns the same two stories every time
    let client = Arc::new(RoutedHttpClient::new().ok_json(
        "NEWS_SENTIMENT",
        &news_payload(vec![
            news_entry("n-1", "Apple unveils new chip", &["AAPL"]),
            news_entry("n-2", "Microsoft cloud revenue climbs", &["MSFT"]),
        ]),
    ));
    let publisher = RecordingPublisher::new();
    let mut cycle = news_cycle(client, publisher.clone());

    // When: Two cycles run
    let first = cycle.run().await;
    let second = cycle.run().await;

    // Then: Each story went out exactly once
    assert_eq!(publisher.news_ids(), ["n-1", "n-2"]);
    assert_eq!(first.published, 2);
    assert_eq!(second.published, 0);
    assert_eq!(cycle.registry().len(), 2);
}

#[tokio::test]
async fn when_story_has_no_uuid_or_url_it_is_never_published() {
    let client = Arc::new(RoutedHttpClient::new().ok_json(
        "NEWS_SENTIMENT",
        &news_payload(vec![
            json!({ "title": "Anonymous rumor" }),
            json!({ "title": "Linked only", "url": "https://news.example/linked" }),
        ]),
    ));
    let publisher = RecordingPublisher::new();
    let mut cycle = news_cycle(client, publisher.clone());

    cycle.run().await;

    assert_eq!(publisher.news_ids(), ["https://news.example/linked"]);
    assert_eq!(cycle.registry().len(), 1);
}

#[tokio::test]
async fn when_a_news_publish_fails_cycle_continues_and_story_is_not_retried() {
    // Given: The destination rejects n-1
    let client = Arc::new(RoutedHttpClient::new().ok_json(
        "NEWS_SENTIMENT",
        &news_payload(vec![
            news_entry("n-1", "Rejected story", &[]),
            news_entry("n-2", "Accepted story", &[]),
        ]),
    ));
    let publisher = RecordingPublisher::failing_news(&["n-1"]);
    let mut cycle = news_cycle(client, publisher.clone());

    // When: Two cycles run
    let first = cycle.run().await;
    let second = cycle.run().await;

    // Then: The failure was counted, n-2 still went out, and n-1 stays seen
    assert_eq!(first.publish_failures, 1);
    assert_eq!(first.published, 1);
    assert_eq!(second, CycleReport::default());
    assert_eq!(publisher.news_ids(), ["n-2"]);
}

#[tokio::test]
async fn when_batch_exceeds_cap_overflow_waits_for_next_cycle() {
    // Given: Twelve fresh stories and the standard cap of ten
    let entries = (1..=12)
        .map(|i| news_entry(&format!("n-{i}"), "Story", &[]))
        .collect();
    let client =
        Arc::new(RoutedHttpClient::new().ok_json("NEWS_SENTIMENT", &news_payload(entries)));
    let publisher = RecordingPublisher::new();
    let mut cycle =
        news_cycle(client, publisher.clone()).with_deduplicator(NewsDeduplicator::default());

    // When: The first cycle runs
    let first = cycle.run().await;

    // Then: Only ten are published and only those ten are remembered
    assert_eq!(first.published, 10);
    assert_eq!(cycle.registry().len(), 10);

    // When: The same feed comes back
    let second = cycle.run().await;

    // Then: The two held-back stories go out now
    assert_eq!(second.published, 2);
    let ids = publisher.news_ids();
    assert_eq!(&ids[10..], ["n-11", "n-12"]);
}

#[tokio::test]
async fn when_news_fetch_fails_cycle_is_skipped_without_side_effects() {
    let client = Arc::new(RoutedHttpClient::new().ok_json(
        "NEWS_SENTIMENT",
        &json!({ "Note": "call frequency exceeded" }),
    ));
    let publisher = RecordingPublisher::new();
    let mut cycle = news_cycle(client, publisher.clone());

    let report = cycle.run().await;

    assert_eq!(report.skipped, 1);
    assert!(publisher.news_ids().is_empty());
    assert!(cycle.registry().is_empty());
}

#[tokio::test]
async fn when_story_lacks_title_headline_falls_back_to_news() {
    let client = Arc::new(RoutedHttpClient::new().ok_json(
        "NEWS_SENTIMENT",
        &news_payload(vec![json!({ "uuid": "n-9", "title": "  " })]),
    ));
    let publisher = RecordingPublisher::new();
    let mut cycle = news_cycle(client, publisher.clone());

    cycle.run().await;

    let published = publisher.news();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].id, "n-9");
    assert_eq!(published[0].headline, "News");
    assert_eq!(published[0].url, None);
}
