//! Core library for Kindred.
//!
//! Holds everything that decides what the client shows at startup:
//!
//! - `bootstrap`: splash hold while the purchase subsystem initializes
//! - `auth`: device session and the tri-state session verdict
//! - `navigation`: maps a verdict to exactly one redirect
//! - `screen`: entry-screen lifecycle that owns the in-flight resolution
//! - `shimmer`: opacity loop for skeleton placeholders
//!
//! The HTTP collaborators live in `api` and `purchases`.

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod navigation;
pub mod purchases;
pub mod screen;
pub mod shimmer;

pub use auth::{AuthVerdict, SessionResolver};
pub use bootstrap::{BootstrapOrchestrator, BootstrapOutcome, PurchaseStatus};
pub use config::Config;
pub use navigation::{Destination, Navigator, Router};
pub use screen::EntryScreen;
pub use shimmer::{ShimmerAnimator, ShimmerPhase};
