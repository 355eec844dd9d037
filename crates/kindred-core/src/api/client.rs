//! HTTP client for the hosted auth and REST endpoints.
//!
//! Implements `IdentityProvider` so the session gate can run against the real
//! backend. Every request carries the project `apikey` header; user-scoped
//! requests add the session token as a bearer credential.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::ApiError;
use crate::auth::{Identity, IdentityProvider, Profile};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Path of the "who am I" endpoint on the auth service
const USER_PATH: &str = "/auth/v1/user";

/// Path of the profiles table on the REST service
const PROFILES_PATH: &str = "/rest/v1/profiles";

/// Identity backend client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            token: None,
        })
    }

    /// Set the bearer token for user-scoped requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Filter pair selecting one profile row by user id.
    fn profile_query(user_id: &str) -> [(&'static str, String); 2] {
        [("id", format!("eq.{}", user_id)), ("select", "*".to_string())]
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: &str,
    ) -> Result<Response, ApiError> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .header("apikey", &self.api_key)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response)
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn into_error(response: Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ApiError::from_status(status, &body)
    }
}

#[async_trait]
impl IdentityProvider for ApiClient {
    async fn current_user(&self) -> Result<Option<Identity>, ApiError> {
        let Some(token) = self.token.as_deref() else {
            debug!("No session token, skipping user lookup");
            return Ok(None);
        };

        let response = self.get(USER_PATH, &[], token).await?;
        match response.status() {
            s if s.is_success() => Ok(Some(Self::parse_json(response).await?)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!(status = %response.status(), "Session no longer recognised");
                Ok(None)
            }
            _ => Err(Self::into_error(response).await),
        }
    }

    async fn user_profile(&self, user_id: &str) -> Result<Option<Profile>, ApiError> {
        let token = self.token.as_deref().unwrap_or(&self.api_key);
        let response = self
            .get(PROFILES_PATH, &Self::profile_query(user_id), token)
            .await?;
        match response.status() {
            s if s.is_success() => {
                let rows: Vec<Profile> = Self::parse_json(response).await?;
                Ok(rows.into_iter().next())
            }
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(Self::into_error(response).await),
        }
    }
}
