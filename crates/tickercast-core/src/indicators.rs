//! Indicator math over a chronological bar series.
//!
//! All functions here are pure and synchronous. "Not enough data" is always
//! reported as `None`, never as zero.

use crate::domain::{Direction, Hlc, IndicatorSet, IntradaySeries, VolumeSpike};

pub const EMA_FAST_PERIOD: usize = 9;
pub const EMA_SLOW_PERIOD: usize = 21;
/// Number of most recent closes fed to both EMAs.
pub const EMA_LOOKBACK: usize = 50;
/// Trailing window for the rolling VWAP.
pub const VWAP_WINDOW: usize = 120;

pub const SPIKE_MIN_SAMPLES: usize = 25;
pub const SPIKE_BASELINE_LEN: usize = 20;
/// Most recent bars kept out of the baseline so a spike cannot inflate it.
pub const SPIKE_EXCLUDED_RECENT: usize = 5;
pub const SPIKE_THRESHOLD: f64 = 2.0;

/// Exponential moving average seeded with the first element (no SMA warm-up).
///
/// Returns `None` when `series.len() < period` or `period == 0`.
pub fn ema(series: &[f64], period: usize) -> Option<f64> {
    if period == 0 || series.len() < period {
        return None;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let (&seed, rest) = series.split_first()?;
    Some(rest.iter().fold(seed, |prev, &x| x * k + prev * (1.0 - k)))
}

/// Volume-weighted average price over aligned `(high, low, close)` and volume
/// slices, using the typical price `(h + l + c) / 3`.
///
/// Callers pass a trailing window (see [`VWAP_WINDOW`]); this is a rolling
/// VWAP and does not reset at the session open.
pub fn vwap(hlc: &[Hlc], volumes: &[u64]) -> Option<f64> {
    if hlc.is_empty() || volumes.is_empty() || hlc.len() != volumes.len() {
        return None;
    }

    let (weighted, total_volume) = hlc.iter().zip(volumes).fold(
        (0.0_f64, 0_u64),
        |(weighted, total), (&(high, low, close), &volume)| {
            let typical = (high + low + close) / 3.0;
            (
                weighted + typical * volume as f64,
                total.saturating_add(volume),
            )
        },
    );

    if total_volume == 0 {
        return None;
    }
    Some(weighted / total_volume as f64)
}

/// Flags the latest volume when it is at least [`SPIKE_THRESHOLD`] times the
/// mean of the [`SPIKE_BASELINE_LEN`] samples that end
/// [`SPIKE_EXCLUDED_RECENT`] positions before it.
pub fn volume_spike(volumes: &[u64]) -> Option<VolumeSpike> {
    let len = volumes.len();
    if len < SPIKE_MIN_SAMPLES {
        return None;
    }

    let baseline_end = len - SPIKE_EXCLUDED_RECENT;
    let baseline_window = &volumes[baseline_end - SPIKE_BASELINE_LEN..baseline_end];
    let baseline =
        baseline_window.iter().map(|&v| v as f64).sum::<f64>() / SPIKE_BASELINE_LEN as f64;
    if baseline <= 0.0 {
        return None;
    }

    let current_volume = volumes[len - 1];
    let ratio = current_volume as f64 / baseline;
    (ratio >= SPIKE_THRESHOLD).then_some(VolumeSpike {
        ratio,
        current_volume,
    })
}

/// Latest close minus the previous one; `0.0` with fewer than two closes.
pub fn price_delta(closes: &[f64]) -> f64 {
    match closes {
        [.., previous, latest] => latest - previous,
        _ => 0.0,
    }
}

/// Non-negative deltas count as up.
pub fn delta_direction(delta: f64) -> Direction {
    if delta >= 0.0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

fn tail<T>(values: &[T], n: usize) -> &[T] {
    &values[values.len().saturating_sub(n)..]
}

impl IndicatorSet {
    /// Derives every indicator from one series using the standard windows.
    pub fn compute(series: &IntradaySeries) -> Self {
        let closes = series.closes();
        let hlc = series.hlc();
        let volumes = series.volumes();

        let recent_closes = tail(&closes, EMA_LOOKBACK);

        Self {
            ema_fast: ema(recent_closes, EMA_FAST_PERIOD),
            ema_slow: ema(recent_closes, EMA_SLOW_PERIOD),
            vwap: vwap(tail(&hlc, VWAP_WINDOW), tail(&volumes, VWAP_WINDOW)),
            spike: volume_spike(&volumes),
        }
    }
}
