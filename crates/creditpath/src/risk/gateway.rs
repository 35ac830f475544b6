use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::normalizer::PredictionRequest;
use super::prediction::{MalformedResponse, PredictionResult};
use crate::config::PredictionServiceConfig;

/// Failure talking to the prediction service. The display text is the user-facing banner.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    #[error("Prediction failed: {0}")]
    Transport(String),
    #[error(
        "Prediction failed (HTTP {status}){}",
        .detail.as_deref().map(|detail| format!(": {detail}")).unwrap_or_default()
    )]
    Status { status: u16, detail: Option<String> },
    #[error("Prediction failed: {0}")]
    Malformed(#[from] MalformedResponse),
}

/// External collaborator that scores a normalized request.
#[async_trait]
pub trait PredictionGateway: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, GatewayError>;
}

/// Health payload served at the prediction service root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub models: Vec<String>,
}

/// `reqwest` backed gateway calling `POST {base_url}/predict`.
#[derive(Debug, Clone)]
pub struct HttpPredictionGateway {
    client: Client,
    base_url: String,
}

impl HttpPredictionGateway {
    pub fn new(config: &PredictionServiceConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<ServiceHealth, GatewayError> {
        let response = self
            .client
            .get(self.endpoint("/"))
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        serde_json::from_slice(&body).map_err(|err| {
            GatewayError::Malformed(MalformedResponse(format!(
                "health payload is not valid JSON: {err}"
            )))
        })
    }
}

#[async_trait]
impl PredictionGateway for HttpPredictionGateway {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, GatewayError> {
        let url = self.endpoint("/predict");
        debug!(%url, "dispatching prediction request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                warn!(?err, "prediction transport failed");
                GatewayError::Transport(err.to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        if !status.is_success() {
            warn!(status = %status, "prediction service returned an error status");
            return Err(status_error(status.as_u16(), &body));
        }

        PredictionResult::from_response_body(&body).map_err(|err| {
            warn!(%err, "prediction response rejected");
            GatewayError::from(err)
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

fn status_error(status: u16, body: &[u8]) -> GatewayError {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|error| match error.detail {
            Value::String(text) => text,
            other => other.to_string(),
        });

    GatewayError::Status { status, detail }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_surfaces_service_detail() {
        let err = status_error(500, br#"{"detail": "Prediction failed: model not loaded"}"#);
        assert_eq!(
            err.to_string(),
            "Prediction failed (HTTP 500): Prediction failed: model not loaded"
        );

        let bare = status_error(502, b"Bad Gateway");
        assert_eq!(bare.to_string(), "Prediction failed (HTTP 502)");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = PredictionServiceConfig {
            base_url: "http://127.0.0.1:8000/".to_string(),
            timeout: None,
        };
        let gateway = HttpPredictionGateway::new(&config).expect("client builds");
        assert_eq!(gateway.endpoint("/predict"), "http://127.0.0.1:8000/predict");
    }
}
