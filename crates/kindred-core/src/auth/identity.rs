use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// The user a live session belongs to, as reported by the identity backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A profile row. Only its existence matters to the session gate; the
/// remaining columns are carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Remote lookups the session gate is built on.
///
/// `Ok(None)` means "nothing there"; `Err` means the lookup itself failed.
/// The resolver treats both the same way.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Result<Option<Identity>, ApiError>;

    async fn user_profile(&self, user_id: &str) -> Result<Option<Profile>, ApiError>;
}
