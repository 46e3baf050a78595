//! HTTP client for the optimizer API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use dfs_common::PlayerProjection;
use dfs_common::api::{Lineup, OptimizeRequest, ProjectionsRequest};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// The only failure text shown to the user; details go to the log.
pub const OPTIMIZE_FAILED_MESSAGE: &str = "An error occurred while optimizing. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("API returned {status}: {message}")]
    Api {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    detail: Option<String>,
}

pub struct OptimizerClient {
    client: Client,
    base_url: String,
}

impl OptimizerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(ClientError::Http)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /optimize/`: one lineup per projection weighting.
    pub async fn optimize(&self, request: &OptimizeRequest) -> Result<Vec<Lineup>, ClientError> {
        self.post("/optimize/", request).await
    }

    /// `POST /projections/`: the stored projection table for a slate.
    pub async fn projections(
        &self,
        request: &ProjectionsRequest,
    ) -> Result<Vec<PlayerProjection>, ClientError> {
        self.post("/projections/", request).await
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "sending request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ClientError::Connection(format!("Cannot connect to {}", self.base_url))
                } else {
                    ClientError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status, &text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

fn api_error(status: StatusCode, text: &str) -> ClientError {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => ClientError::Api {
            status,
            code: body.code,
            message: body
                .message
                .or(body.detail)
                .unwrap_or_else(|| status.to_string()),
        },
        Err(_) => ClientError::Api {
            status,
            code: None,
            message: if text.trim().is_empty() {
                status.to_string()
            } else {
                text.trim().to_string()
            },
        },
    }
}
