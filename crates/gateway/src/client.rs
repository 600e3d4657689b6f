//! Z-API `send-text` client with bounded retry.
//!
//! [`ZApiClient::deliver`] posts `{"phone", "message"}` to
//! `/instances/{instance}/token/{token}/send-text` up to [`MAX_ATTEMPTS`]
//! times, stopping early on success or on a response that retrying cannot
//! fix (see [`Verdict::is_final`]).

use std::time::Duration;

use greeter_core::config::{DEFAULT_MESSAGE_TEMPLATE, NAME_PLACEHOLDER};
use greeter_core::GatewayConfig;
use serde::Serialize;

use crate::classify::{body_snippet, classify_response, Verdict};

/// Total attempts per message, including the first.
pub const MAX_ATTEMPTS: u32 = 2;

/// HTTP request timeout for a single attempt.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Reasons a message was not delivered.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error(
        "Client-Token is not configured; enable it in the gateway security panel and set ZAPI_CLIENT_TOKEN"
    )]
    ClientTokenNotConfigured,

    #[error("Gateway required the Client-Token header and did not receive it")]
    ClientTokenNotReceived,

    #[error("Client-Token is not valid for this account/instance; check it in the security panel")]
    ClientTokenRejected,

    #[error("Gateway returned HTTP {status}; the endpoint must be called with POST")]
    WrongMethod { status: u16 },

    #[error("No successful response after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SendTextPayload<'a> {
    phone: &'a str,
    message: &'a str,
}

/// Fill the contact's name into a message template.
pub fn render_message(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name)
}

// ---------------------------------------------------------------------------
// ZApiClient
// ---------------------------------------------------------------------------

/// HTTP client for the Z-API messaging gateway.
pub struct ZApiClient {
    client: reqwest::Client,
    base_url: String,
    message_template: String,
}

impl ZApiClient {
    /// Create a client for `base_url` (e.g. `https://api.z-api.io`) with the
    /// default timeout and greeting.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SendError> {
        Self::with_timeout(base_url, SEND_TIMEOUT)
    }

    /// Create a client with a custom per-attempt timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
        })
    }

    /// Create a client from the gateway section of the run configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, SendError> {
        Ok(Self::new(config.base_url.as_str())?.with_message_template(&config.message_template))
    }

    /// Replace the greeting template. `{name}` is substituted per contact.
    pub fn with_message_template(mut self, template: impl Into<String>) -> Self {
        self.message_template = template.into();
        self
    }

    /// Send the greeting to one contact. Returns `true` only if the gateway
    /// answered HTTP 200 to some attempt.
    pub async fn send_message(
        &self,
        instance_id: &str,
        api_token: &str,
        client_token: &str,
        number: &str,
        name: &str,
    ) -> bool {
        match self
            .deliver(instance_id, api_token, client_token, number, name)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(name, number, error = %e, "Message not delivered");
                false
            }
        }
    }

    /// Send the greeting to one contact, reporting why delivery failed.
    ///
    /// Every diagnostic is logged here before the error is returned.
    pub async fn deliver(
        &self,
        instance_id: &str,
        api_token: &str,
        client_token: &str,
        number: &str,
        name: &str,
    ) -> Result<(), SendError> {
        if client_token.is_empty() {
            let err = SendError::ClientTokenNotConfigured;
            tracing::error!("{err}");
            return Err(err);
        }

        let url = format!(
            "{}/instances/{instance_id}/token/{api_token}/send-text",
            self.base_url
        );
        let message = render_message(&self.message_template, name);
        let payload = SendTextPayload {
            phone: number,
            message: &message,
        };

        for attempt in 1..=MAX_ATTEMPTS {
            let response = match self
                .client
                .post(&url)
                .header("Client-Token", client_token)
                .json(&payload)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Gateway request failed with a network error");
                    continue;
                }
            };

            let status = response.status().as_u16();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(attempt, status, error = %e, "Gateway request failed with a network error");
                    continue;
                }
            };
            tracing::info!(
                attempt,
                status,
                body = body_snippet(&body),
                "Gateway response received"
            );

            let err = match classify_response(status, &body) {
                Verdict::Delivered => {
                    tracing::info!(name, number, "Message sent");
                    return Ok(());
                }
                Verdict::ClientTokenMissing => SendError::ClientTokenNotReceived,
                Verdict::ClientTokenInvalid => SendError::ClientTokenRejected,
                Verdict::WrongMethod => SendError::WrongMethod { status },
                // TODO: back off before the next attempt once the gateway's
                // rate-limit and 5xx semantics are documented.
                Verdict::Retry => continue,
            };
            tracing::error!(attempt, "{err}");
            return Err(err);
        }

        Err(SendError::AttemptsExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }
}
