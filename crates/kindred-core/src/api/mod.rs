//! REST client for the hosted identity backend.
//!
//! `ApiClient` answers the two questions the session gate asks: who is the
//! current session user, and does that user have a profile row.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
