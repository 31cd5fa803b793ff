use serde::Deserialize;
use thiserror::Error;

/// Failure talking to the Supabase REST or Storage API.
///
/// The display text is the upstream message, ready to show to an admin.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("{0}")]
    Decode(String),
}

/// Error body shape shared by PostgREST (`message`, `code`, `hint`) and
/// Storage (`statusCode`, `error`, `message`)
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl StoreError {
    /// Build an error from a non-success response, preferring the upstream message
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::from_status_and_body(status.as_u16(), &body)
    }

    pub fn from_status_and_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<UpstreamErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| format!("HTTP {}", status));

        StoreError::Upstream { status, message }
    }

    /// HTTP status of an upstream rejection, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}
