use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::format::format_price_line;
use super::{PublishFuture, SignalPublisher};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, HttpResponse};
use crate::retry::RetryPolicy;
use crate::throttling::SendThrottle;
use crate::{NewsItem, PriceSignal, PublishError};

pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";
pub const NEWS_FOOTER: &str = "Alpha Vantage News";

const SEND_TIMEOUT: Duration = Duration::from_secs(15);
const EMBED_TITLE_MAX: usize = 256;
const EMBED_DESCRIPTION_MAX: usize = 4096;
const ERROR_BODY_MAX: usize = 200;

/// Discord channel types that accept plain text messages (guild text, announcement).
const TEXT_CHANNEL_TYPES: [u64; 2] = [0, 5];

/// Posts signals to one Discord channel through the bot REST API.
#[derive(Clone)]
pub struct DiscordPublisher {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    channel_id: u64,
    api_base: String,
    throttle: SendThrottle,
    retry: RetryPolicy,
}

impl DiscordPublisher {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        bot_token: impl Into<String>,
        channel_id: u64,
    ) -> Self {
        Self {
            http_client,
            auth: HttpAuth::BotToken(bot_token.into()),
            channel_id,
            api_base: String::from(DISCORD_API_BASE),
            throttle: SendThrottle::discord_channel_default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_throttle(mut self, throttle: SendThrottle) -> Self {
        self.throttle = throttle;
        self
    }

    pub const fn channel_id(&self) -> u64 {
        self.channel_id
    }

    fn channel_url(&self) -> String {
        format!("{}/channels/{}", self.api_base.trim_end_matches('/'), self.channel_id)
    }

    /// Resolves the destination once and checks it is a text channel.
    pub async fn verify_channel(&self) -> Result<(), PublishError> {
        let request = HttpRequest::get(self.channel_url())
            .with_auth(&self.auth)
            .with_timeout(SEND_TIMEOUT);
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| PublishError::Transport(e.message().to_owned()))?;

        if !response.is_success() {
            return Err(PublishError::Destination(format!(
                "channel {} lookup returned status {}",
                self.channel_id, response.status
            )));
        }

        let channel: ChannelInfo = serde_json::from_str(&response.body)?;
        if !TEXT_CHANNEL_TYPES.contains(&channel.kind) {
            return Err(PublishError::Destination(format!(
                "channel {} is not a text channel (type {})",
                self.channel_id, channel.kind
            )));
        }
        Ok(())
    }

    /// Posts one message. A resend happens only when Discord certainly did
    /// not store the previous attempt: 429, 408/503, or a connection that was
    /// never established. Timeouts and other failures are returned as is.
    async fn send(&self, message: &MessageBody<'_>) -> Result<(), PublishError> {
        let payload = serde_json::to_string(message)?;
        let url = format!("{}/messages", self.channel_url());
        let mut attempt = 0_u32;

        loop {
            self.throttle.acquire().await;
            let request = HttpRequest::post(&url)
                .with_auth(&self.auth)
                .with_json_body(payload.clone())
                .with_timeout(SEND_TIMEOUT);

            let retries_left = attempt < self.retry.max_retries;
            let delay = match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => return Ok(()),
                Ok(response) if response.status == 429 => {
                    if !retries_left {
                        return Err(PublishError::RateLimited {
                            attempts: attempt + 1,
                        });
                    }
                    self.retry
                        .rate_limit_delay(retry_after_hint(&response), attempt)
                }
                Ok(response)
                    if retries_left && RetryPolicy::is_resendable_status(response.status) =>
                {
                    self.retry.backoff.delay(attempt)
                }
                Ok(response) => {
                    return Err(PublishError::Rejected {
                        status: response.status,
                        body: response.body.chars().take(ERROR_BODY_MAX).collect(),
                    })
                }
                Err(error) if retries_left && error.is_unsent() => {
                    tracing::debug!(error = %error, "discord connection failed; retrying");
                    self.retry.backoff.delay(attempt)
                }
                Err(error) => {
                    if error.timed_out() {
                        tracing::warn!(%error, "discord send timed out; not resending");
                    }
                    return Err(PublishError::Transport(error.message().to_owned()));
                }
            };

            tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying discord send");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl SignalPublisher for DiscordPublisher {
    fn publish_price<'a>(&'a self, signal: &'a PriceSignal) -> PublishFuture<'a> {
        Box::pin(async move {
            let content = format_price_line(signal);
            self.send(&MessageBody::text(&content)).await
        })
    }

    fn publish_news<'a>(&'a self, item: &'a NewsItem) -> PublishFuture<'a> {
        Box::pin(async move {
            let embed = news_embed(item, OffsetDateTime::now_utc());
            self.send(&MessageBody::embed(embed)).await
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChannelInfo {
    #[serde(rename = "type")]
    kind: u64,
}

#[derive(Debug, Deserialize)]
struct RateLimitBody {
    retry_after: f64,
}

fn retry_after_hint(response: &HttpResponse) -> Option<Duration> {
    serde_json::from_str::<RateLimitBody>(&response.body)
        .ok()
        .filter(|body| body.retry_after.is_finite() && body.retry_after >= 0.0)
        .map(|body| Duration::from_secs_f64(body.retry_after))
}

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<Embed>,
}

impl<'a> MessageBody<'a> {
    fn text(content: &'a str) -> Self {
        Self {
            content: Some(content),
            embeds: Vec::new(),
        }
    }

    fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Embed {
    title: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    timestamp: String,
    footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct EmbedFooter {
    text: &'static str,
}

fn news_embed(item: &NewsItem, now: OffsetDateTime) -> Embed {
    Embed {
        title: item.headline.chars().take(EMBED_TITLE_MAX).collect(),
        description: item
            .related_tickers
            .join(", ")
            .chars()
            .take(EMBED_DESCRIPTION_MAX)
            .collect(),
        url: item.url.clone().filter(|url| !url.is_empty()),
        timestamp: now.format(&Rfc3339).unwrap_or_default(),
        footer: EmbedFooter { text: NEWS_FOOTER },
    }
}
