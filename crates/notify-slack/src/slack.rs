use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::attachment::Attachment;

pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Upper bound for a whole post/update round trip.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("slack returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("{0}")]
    Api(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posted {
    pub channel: String,
    pub ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Updated {
    pub channel: String,
    pub ts: String,
    pub text: String,
}

/// The two Slack operations a notification needs.
#[async_trait]
pub trait MessageClient: Send + Sync {
    async fn post_message(
        &self,
        channel: &str,
        attachments: &[Attachment],
    ) -> Result<Posted, ClientError>;

    async fn update_message(
        &self,
        channel: &str,
        ts: &str,
        attachments: &[Attachment],
    ) -> Result<Updated, ClientError>;
}

#[derive(Serialize)]
struct MessageBody<'a> {
    channel: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ts: Option<&'a str>,
    attachments: &'a [Attachment],
}

/// Slack Web API client authenticated with a bot token.
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl SlackClient {
    pub fn new(token: impl Into<String>, api_url: Option<&str>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_url: api_url
                .unwrap_or(DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            token: token.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn call(&self, method: &str, body: &MessageBody<'_>) -> Result<Value, ClientError> {
        let url = format!("{}/{method}", self.api_url);
        tracing::debug!(%url, channel = body.channel, "Calling Slack API");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let reply: Value = resp.json().await?;
        check_reply(reply)
    }
}

/// Slack answers HTTP 200 even for API errors; the verdict is the `ok` flag.
fn check_reply(reply: Value) -> Result<Value, ClientError> {
    if reply.get("ok").and_then(Value::as_bool) == Some(true) {
        return Ok(reply);
    }
    let err = reply
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown_error");
    Err(ClientError::Api(err.to_string()))
}

fn str_field(reply: &Value, key: &str) -> String {
    reply
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl MessageClient for SlackClient {
    async fn post_message(
        &self,
        channel: &str,
        attachments: &[Attachment],
    ) -> Result<Posted, ClientError> {
        let body = MessageBody {
            channel,
            ts: None,
            attachments,
        };
        let reply = self.call("chat.postMessage", &body).await?;
        Ok(Posted {
            channel: str_field(&reply, "channel"),
            ts: str_field(&reply, "ts"),
        })
    }

    async fn update_message(
        &self,
        channel: &str,
        ts: &str,
        attachments: &[Attachment],
    ) -> Result<Updated, ClientError> {
        let body = MessageBody {
            channel,
            ts: Some(ts),
            attachments,
        };
        let reply = self.call("chat.update", &body).await?;
        Ok(Updated {
            channel: str_field(&reply, "channel"),
            ts: str_field(&reply, "ts"),
            text: str_field(&reply, "text"),
        })
    }
}
