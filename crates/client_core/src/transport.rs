use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{RawSimulationResponse, SimulationRequest};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000/simulate";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("simulation service unreachable: {0}")]
    Network(String),
    #[error("simulation service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("simulation service response is not valid: {reason}")]
    Malformed { reason: String, body: String },
    #[error("simulation service did not answer within {0} ms")]
    Timeout(u128),
    #[error("simulation request was cancelled")]
    Cancelled,
}

#[async_trait]
pub trait SimulationTransport: Send + Sync {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<RawSimulationResponse, TransportError>;
}

pub struct MissingSimulationTransport;

#[async_trait]
impl SimulationTransport for MissingSimulationTransport {
    async fn simulate(
        &self,
        _request: &SimulationRequest,
    ) -> Result<RawSimulationResponse, TransportError> {
        Err(TransportError::Network(
            "no simulation service configured".to_string(),
        ))
    }
}

/// Posts requests as JSON to a fixed endpoint.
pub struct HttpSimulationTransport {
    http: Client,
    endpoint: Url,
}

impl HttpSimulationTransport {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid simulation service url '{endpoint}'"))?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SimulationTransport for HttpSimulationTransport {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<RawSimulationResponse, TransportError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "simulation response received");
        serde_json::from_str(&body).map_err(|err| TransportError::Malformed {
            reason: err.to_string(),
            body,
        })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
