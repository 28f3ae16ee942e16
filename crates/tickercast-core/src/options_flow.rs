//! Options-flow summary from a per-contract snapshot.
//!
//! The integration is optional: it is resolved once at startup into
//! [`OptionsFlow::Disabled`] or [`OptionsFlow::Enabled`], and every failure on
//! the enabled path degrades to "no summary".

use serde_json::Value;

use crate::adapters::PolygonAdapter;
use crate::domain::OptionsFlowSummary;
use crate::parser::numeric_like;
use crate::Symbol;

/// Options-flow capability chosen at startup.
#[derive(Clone)]
pub enum OptionsFlow {
    Disabled,
    Enabled(PolygonAdapter),
}

impl OptionsFlow {
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Fetches and summarizes today's flow; `None` when disabled, on any
    /// fetch/decode failure, or when no volume traded.
    pub async fn summary(&self, symbol: &Symbol) -> Option<OptionsFlowSummary> {
        let Self::Enabled(adapter) = self else {
            return None;
        };

        match adapter.options_snapshot(symbol).await {
            Ok(snapshot) => summarize_snapshot(&snapshot),
            Err(error) => {
                tracing::warn!(
                    %symbol,
                    provider = %error.provider(),
                    %error,
                    "options snapshot unavailable"
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for OptionsFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => f.write_str("OptionsFlow::Disabled"),
            Self::Enabled(_) => f.write_str("OptionsFlow::Enabled"),
        }
    }
}

/// Sums `day.volume` across `results`, split by `details.contract_type`.
///
/// Contracts with a missing or unknown type, or a missing, negative or
/// non-numeric volume, contribute nothing.
pub fn summarize_snapshot(snapshot: &Value) -> Option<OptionsFlowSummary> {
    let contracts = snapshot.get("results").and_then(Value::as_array)?;

    let mut summary = OptionsFlowSummary {
        call_volume: 0,
        put_volume: 0,
    };

    for contract in contracts {
        let volume = contract_volume(contract);
        match contract
            .pointer("/details/contract_type")
            .and_then(Value::as_str)
        {
            Some("call") => summary.call_volume = summary.call_volume.saturating_add(volume),
            Some("put") => summary.put_volume = summary.put_volume.saturating_add(volume),
            _ => {}
        }
    }

    (summary.call_volume > 0 || summary.put_volume > 0).then_some(summary)
}

fn contract_volume(contract: &Value) -> u64 {
    contract
        .pointer("/day/volume")
        .and_then(numeric_like)
        .filter(|volume| volume.is_finite() && *volume >= 0.0)
        .map_or(0, |volume| volume as u64)
}
