use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Access tokens issued by the identity backend live for one hour.
const TOKEN_EXPIRY_MINUTES: i64 = 60;

/// Device session as written by the sign-in flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub access_token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.created_at + Duration::minutes(TOKEN_EXPIRY_MINUTES)
    }
}

/// Read side of the device session.
///
/// The core never creates sessions; it only loads what the sign-in flow left
/// behind and hands the token to the identity client.
pub struct Session {
    cache_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            data: None,
        }
    }

    /// Load session from disk. Returns false when there is no usable session.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if !path.exists() {
            debug!(?path, "No session file");
            return Ok(false);
        }

        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let data: SessionData =
            serde_json::from_str(&contents).context("Failed to parse session file")?;

        if data.is_expired() {
            debug!(created_at = %data.created_at, "Stored session expired");
            return Ok(false);
        }
        self.data = Some(data);
        Ok(true)
    }

    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.access_token.as_str())
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kindred-session-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_session(dir: &std::path::Path, created_at: DateTime<Utc>) {
        let json = format!(
            r#"{{"access_token":"tok","user_id":"user-1","created_at":"{}"}}"#,
            created_at.to_rfc3339()
        );
        std::fs::write(dir.join(SESSION_FILE), json).unwrap();
    }

    #[test]
    fn test_load_without_file() {
        let mut session = Session::new(scratch_dir("missing"));
        assert!(!session.load().unwrap());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_load_fresh_session() {
        let dir = scratch_dir("fresh");
        write_session(&dir, Utc::now());

        let mut session = Session::new(dir);
        assert!(session.load().unwrap());
        assert_eq!(session.token(), Some("tok"));
        assert_eq!(session.data.as_ref().map(|d| d.user_id.as_str()), Some("user-1"));
    }

    #[test]
    fn test_expired_session_is_ignored() {
        let dir = scratch_dir("expired");
        write_session(&dir, Utc::now() - Duration::minutes(TOKEN_EXPIRY_MINUTES + 1));

        let mut session = Session::new(dir);
        assert!(!session.load().unwrap());
        assert!(session.data.is_none());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_corrupt_session_file_is_an_error() {
        let dir = scratch_dir("corrupt");
        std::fs::write(dir.join(SESSION_FILE), "{").unwrap();

        assert!(Session::new(dir).load().is_err());
    }
}
