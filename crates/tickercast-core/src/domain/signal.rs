use crate::Symbol;

/// Up/down marker shared by the price delta and the EMA crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Latest-bar volume compared with its trailing baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSpike {
    pub ratio: f64,
    pub current_volume: u64,
}

/// Indicators derived from one intraday series. Each field is `None` when the
/// series is too short (or otherwise unsuitable) for that indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorSet {
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub vwap: Option<f64>,
    pub spike: Option<VolumeSpike>,
}

impl IndicatorSet {
    /// Fast/slow EMA crossover; `None` unless both EMAs are present.
    pub fn trend(&self) -> Option<Direction> {
        match (self.ema_fast, self.ema_slow) {
            (Some(fast), Some(slow)) if fast > slow => Some(Direction::Up),
            (Some(_), Some(_)) => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Traded option volume for the current session, split by contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionsFlowSummary {
    pub call_volume: u64,
    pub put_volume: u64,
}

/// Everything the publisher needs to compose one price line.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSignal {
    pub symbol: Symbol,
    pub last_close: f64,
    pub delta: f64,
    pub direction: Direction,
    pub indicators: IndicatorSet,
    pub options_flow: Option<OptionsFlowSummary>,
}

impl PriceSignal {
    pub fn trend(&self) -> Option<Direction> {
        self.indicators.trend()
    }
}
