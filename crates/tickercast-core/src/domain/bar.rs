use time::PrimitiveDateTime;

/// `(high, low, close)` triple used for typical-price calculations.
pub type Hlc = (f64, f64, f64);

/// One per-minute bar. Provider timestamps carry no offset (exchange local time).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub ts: PrimitiveDateTime,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Bars sorted strictly ascending by timestamp.
///
/// Only the parser constructs this, so the ordering and non-emptiness hold for
/// every value in circulation.
#[derive(Debug, Clone, PartialEq)]
pub struct IntradaySeries {
    bars: Vec<Bar>,
}

impl IntradaySeries {
    pub(crate) fn from_sorted(bars: Vec<Bar>) -> Self {
        debug_assert!(!bars.is_empty());
        debug_assert!(bars.windows(2).all(|pair| pair[0].ts < pair[1].ts));
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn hlc(&self) -> Vec<Hlc> {
        self.bars
            .iter()
            .map(|bar| (bar.high, bar.low, bar.close))
            .collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.bars.iter().map(|bar| bar.volume).collect()
    }

    pub fn last_close(&self) -> f64 {
        self.bars.last().map_or(0.0, |bar| bar.close)
    }
}
