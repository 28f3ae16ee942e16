//! # Domain Models
//!
//! Value types that flow through one price or news cycle.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, upper-cased ticker |
//! | [`Bar`] | One per-minute bar (timestamp, high, low, close, volume) |
//! | [`IntradaySeries`] | Chronological, duplicate-free bar sequence |
//! | [`IndicatorSet`] | EMAs, VWAP and volume spike derived from a series |
//! | [`PriceSignal`] | Fully resolved value set handed to the publisher |
//! | [`NewsItem`] | Normalized headline with a stable identity |
//! | [`OptionsFlowSummary`] | Call/put traded-volume totals |
//!
//! Nothing here is persisted; every value is rebuilt on each cycle.

mod bar;
mod news;
mod signal;
mod symbol;

pub use bar::{Bar, Hlc, IntradaySeries};
pub use news::NewsItem;
pub use signal::{Direction, IndicatorSet, OptionsFlowSummary, PriceSignal, VolumeSpike};
pub use symbol::Symbol;
