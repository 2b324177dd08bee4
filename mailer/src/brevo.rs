use std::time::Duration;

use common::{env_config::EmailConfig, error::Res};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::SendFailure;

#[derive(Debug, Clone, Serialize)]
pub struct Sender {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipient {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub name: String,
    /// Base64 of the file bytes.
    pub content: String,
}

/// Body of `POST /smtp/email`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPayload {
    pub sender: Sender,
    pub to: Vec<Recipient>,
    pub subject: String,
    pub html_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Vec<Attachment>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message_id: Option<String>,
}

/// Thin client over the transactional email endpoint. One call is one attempt.
pub struct BrevoClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl BrevoClient {
    pub fn new(config: &EmailConfig) -> Res<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/smtp/email", config.api_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }

    /// Returns the provider's message id when it reports one.
    pub async fn send(&self, payload: &EmailPayload) -> Result<Option<String>, SendFailure> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| SendFailure::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let message_id = match response.json::<SendResponse>().await {
                Ok(body) => body.message_id,
                Err(e) => {
                    log::warn!("Unreadable Brevo response body: {}", e);
                    None
                }
            };
            return Ok(message_id);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED => SendFailure::InvalidApiKey,
            StatusCode::TOO_MANY_REQUESTS => SendFailure::RateLimited,
            _ => SendFailure::Upstream {
                status: status.as_u16(),
                body,
            },
        })
    }
}
