use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Status and body text of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Common fields every DocScan JSON response may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
}

impl ApiEnvelope {
    /// Lenient decode: empty or non-object bodies read as an empty envelope.
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
    }

    pub fn message_text(&self) -> Option<&str> {
        non_blank(self.message.as_deref())
    }

    pub fn error_text(&self) -> Option<&str> {
        non_blank(self.error.as_deref()).or_else(|| self.message_text())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Turns a non-2xx response into [`ClientError::Http`], keeping the server's message.
pub fn http_error(response: &RawResponse) -> ClientError {
    let envelope = ApiEnvelope::from_body(&response.body);
    ClientError::Http {
        status: response.status,
        message: envelope.error_text().map(ToString::to_string),
    }
}

/// Decodes a typed payload from a 2xx response, or maps the failure.
pub fn decode_json<T: DeserializeOwned>(response: &RawResponse) -> Result<T, ClientError> {
    if !response.is_success() {
        return Err(http_error(response));
    }
    serde_json::from_str(&response.body).map_err(|error| ClientError::Decode(error.to_string()))
}
