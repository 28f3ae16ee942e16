//! Provider adapters.
//!
//! | Adapter | Provider | Endpoints |
//! |---------|----------|-----------|
//! | [`AlphaVantageAdapter`] | Alpha Vantage | intraday bars, news sentiment |
//! | [`PolygonAdapter`] | Polygon.io | options chain snapshot |

mod alphavantage;
mod polygon;

pub use alphavantage::{AlphaVantageAdapter, ALPHAVANTAGE_ENDPOINT, NEWS_TICKER_LIMIT};
pub use polygon::{PolygonAdapter, POLYGON_ENDPOINT};

use serde_json::Value;

use crate::http_client::{HttpClient, HttpRequest};
use crate::{ProviderId, SourceError};

/// Executes a GET and decodes the body as JSON, classifying every failure.
async fn fetch_json(
    http_client: &dyn HttpClient,
    provider: ProviderId,
    request: HttpRequest,
) -> Result<Value, SourceError> {
    let response = http_client
        .execute(request)
        .await
        .map_err(|e| {
            SourceError::transport(provider, format!("{provider} transport error: {}", e.message()))
        })?;

    if !response.is_success() {
        return Err(SourceError::upstream_status(provider, response.status));
    }

    serde_json::from_str(&response.body).map_err(|e| {
        SourceError::malformed(provider, format!("{provider} returned invalid json: {e}"))
    })
}
