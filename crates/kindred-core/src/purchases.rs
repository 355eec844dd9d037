//! In-app purchase subsystem startup.
//!
//! Only initialization lives here: configure the client with the public key
//! and warm it by fetching the offerings catalogue. Purchase flows are handled
//! elsewhere.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::api::ApiError;
use crate::bootstrap::PurchaseSubsystem;

/// Offerings fetch should not hold the splash for long
const REQUEST_TIMEOUT_SECS: u64 = 10;

const OFFERINGS_PATH: &str = "/v1/offerings";

#[derive(Error, Debug)]
pub enum PurchaseError {
    #[error("No purchases API key configured")]
    MissingApiKey,

    #[error("Purchases backend error: {0}")]
    Api(#[from] ApiError),
}

impl From<reqwest::Error> for PurchaseError {
    fn from(e: reqwest::Error) -> Self {
        PurchaseError::Api(ApiError::Network(e))
    }
}

#[derive(Debug, Deserialize)]
struct OfferingsResponse {
    #[serde(default)]
    current_offering_id: Option<String>,
    #[serde(default)]
    offerings: Vec<serde_json::Value>,
}

#[derive(Clone)]
pub struct PurchaseClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl PurchaseClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    fn offerings_url(&self) -> String {
        format!("{}{}", self.base_url, OFFERINGS_PATH)
    }
}

#[async_trait]
impl PurchaseSubsystem for PurchaseClient {
    async fn init(&self) -> Result<(), PurchaseError> {
        let key = self.api_key.as_deref().ok_or(PurchaseError::MissingApiKey)?;

        let response = self
            .client
            .get(self.offerings_url())
            .bearer_auth(key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &body).into());
        }

        let offerings: OfferingsResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        info!(
            count = offerings.offerings.len(),
            current = ?offerings.current_offering_id,
            "Purchase subsystem ready"
        );
        Ok(())
    }
}
