//! Session gate for the entry screen.
//!
//! This module provides:
//! - `AuthVerdict`: the tri-state answer a screen renders from
//! - `IdentityProvider`: the two remote lookups the gate depends on
//! - `SessionResolver`: turns those lookups into a verdict, failing closed
//! - `Session`: the device session written by the sign-in flow
//!
//! Persisted sessions expire after 60 minutes.

pub mod identity;
pub mod resolver;
pub mod session;
pub mod verdict;

pub use identity::{Identity, IdentityProvider, Profile};
pub use resolver::{attempt, SessionResolver};
pub use session::{Session, SessionData};
pub use verdict::AuthVerdict;
