use crate::{Direction, PriceSignal};

pub const fn direction_dot(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "🟢",
        Direction::Down => "🔴",
    }
}

pub const fn trend_arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "↑",
        Direction::Down => "↓",
    }
}

/// Renders the one-line channel message for a price signal (wrapped below):
///
/// ```text
/// 🟢 **AAPL** 189.12 (+0.34) • Vol spike 2.4× • EMA9/21: 189.01/188.70 ↑
///     • VWAP: 188.95 • Opts flow C/P: 1200/800
/// ```
///
/// Every segment after the delta is omitted when its value is absent.
pub fn format_price_line(signal: &PriceSignal) -> String {
    let mut line = format!(
        "{} **{}** {:.2} ({:+.2})",
        direction_dot(signal.direction),
        signal.symbol,
        signal.last_close,
        signal.delta
    );

    let indicators = &signal.indicators;
    if let Some(spike) = indicators.spike {
        line.push_str(&format!(" • Vol spike {:.1}×", spike.ratio));
    }
    if let (Some(fast), Some(slow), Some(trend)) =
        (indicators.ema_fast, indicators.ema_slow, indicators.trend())
    {
        line.push_str(&format!(
            " • EMA9/21: {fast:.2}/{slow:.2} {}",
            trend_arrow(trend)
        ));
    }
    if let Some(vwap) = indicators.vwap {
        line.push_str(&format!(" • VWAP: {vwap:.2}"));
    }
    if let Some(flow) = signal.options_flow {
        line.push_str(&format!(
            " • Opts flow C/P: {}/{}",
            flow.call_volume, flow.put_volume
        ));
    }
    line
}
