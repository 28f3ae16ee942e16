use std::sync::Arc;

use serde_json::Value;

use super::fetch_json;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::{ProviderId, SourceError, Symbol};

pub const POLYGON_ENDPOINT: &str = "https://api.polygon.io";

/// Polygon.io adapter for the per-underlying options chain snapshot.
#[derive(Clone)]
pub struct PolygonAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    endpoint: String,
}

impl PolygonAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            auth: HttpAuth::QueryKey {
                name: "apiKey",
                value: api_key.into(),
            },
            endpoint: String::from(POLYGON_ENDPOINT),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Raw `/v3/snapshot/options/{underlying}` payload.
    pub async fn options_snapshot(&self, symbol: &Symbol) -> Result<Value, SourceError> {
        let url = format!(
            "{}/v3/snapshot/options/{}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(symbol.as_str())
        );
        let request = HttpRequest::get(url).with_auth(&self.auth);

        tracing::debug!(%symbol, "fetching options snapshot");
        let payload = fetch_json(self.http_client.as_ref(), ProviderId::Polygon, request).await?;

        if payload.get("status").and_then(Value::as_str) == Some("ERROR") {
            let message = payload
                .get("error")
                .or_else(|| payload.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("unspecified error");
            return Err(SourceError::notice(
                ProviderId::Polygon,
                format!("polygon notice: {message}"),
            ));
        }
        Ok(payload)
    }
}
