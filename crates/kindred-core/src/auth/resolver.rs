//! Turns the two identity lookups into a single `AuthVerdict`.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{AuthVerdict, IdentityProvider};
use crate::api::ApiError;

/// Fail-closed step combinator.
///
/// A failed lookup is logged and folded into `None`, which the caller reads
/// exactly like an absent result. Nothing here ever surfaces an error.
pub fn attempt<T>(step: &'static str, result: Result<Option<T>, ApiError>) -> Option<T> {
    match result {
        Ok(value) => {
            debug!(step, found = value.is_some(), "Lookup finished");
            value
        }
        Err(e) => {
            warn!(step, error = %e, "Lookup failed, treating as absent");
            None
        }
    }
}

/// Resolves whether the device session maps to a user with a profile.
#[derive(Clone)]
pub struct SessionResolver {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Run the lookup chain. Always returns a settled verdict.
    ///
    /// The profile lookup needs the user id, so the two calls run in order and
    /// the second is skipped when the first yields nothing. A user without a
    /// profile is `Unauthenticated`, same as no user at all.
    pub async fn resolve(&self) -> AuthVerdict {
        let Some(user) = attempt("current_user", self.provider.current_user().await) else {
            return AuthVerdict::Unauthenticated;
        };

        let profile = attempt("user_profile", self.provider.user_profile(&user.id).await);
        let verdict = AuthVerdict::from_profile_found(profile.is_some());
        debug!(user_id = %user.id, ?verdict, "Session resolved");
        verdict
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::auth::{Identity, Profile};

    #[derive(Clone, Copy, Debug)]
    pub(crate) enum Outcome {
        Found,
        Absent,
        Failed,
    }

    /// Scripted identity backend that counts its calls.
    pub(crate) struct FakeProvider {
        user: Outcome,
        profile: Outcome,
        pub user_calls: AtomicUsize,
        pub profile_calls: AtomicUsize,
    }

    impl FakeProvider {
        pub(crate) fn new(user: Outcome, profile: Outcome) -> Self {
            Self {
                user,
                profile,
                user_calls: AtomicUsize::new(0),
                profile_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeProvider {
        async fn current_user(&self) -> Result<Option<Identity>, ApiError> {
            self.user_calls.fetch_add(1, Ordering::SeqCst);
            match self.user {
                Outcome::Found => Ok(Some(Identity {
                    id: "user-1".to_string(),
                    email: None,
                })),
                Outcome::Absent => Ok(None),
                Outcome::Failed => Err(ApiError::Server("boom".to_string())),
            }
        }

        async fn user_profile(&self, user_id: &str) -> Result<Option<Profile>, ApiError> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(user_id, "user-1");
            match self.profile {
                Outcome::Found => Ok(Some(Profile {
                    id: user_id.to_string(),
                    fields: Default::default(),
                })),
                Outcome::Absent => Ok(None),
                Outcome::Failed => Err(ApiError::RateLimited),
            }
        }
    }

    async fn resolve_with(user: Outcome, profile: Outcome) -> (AuthVerdict, Arc<FakeProvider>) {
        let provider = Arc::new(FakeProvider::new(user, profile));
        let resolver = SessionResolver::new(provider.clone());
        (resolver.resolve().await, provider)
    }

    #[test]
    fn test_attempt_folds_errors_into_none() {
        assert_eq!(attempt("step", Ok(Some(3))), Some(3));
        assert_eq!(attempt::<i32>("step", Ok(None)), None);
        assert_eq!(attempt::<i32>("step", Err(ApiError::Unauthorized)), None);
    }

    #[tokio::test]
    async fn test_no_user_short_circuits() {
        let (verdict, provider) = resolve_with(Outcome::Absent, Outcome::Found).await;
        assert_eq!(verdict, AuthVerdict::Unauthenticated);
        assert_eq!(provider.user_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.profile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_user_lookup_error_short_circuits() {
        let (verdict, provider) = resolve_with(Outcome::Failed, Outcome::Found).await;
        assert_eq!(verdict, AuthVerdict::Unauthenticated);
        assert_eq!(provider.profile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_profile_is_unauthenticated() {
        let (verdict, provider) = resolve_with(Outcome::Found, Outcome::Absent).await;
        assert_eq!(verdict, AuthVerdict::Unauthenticated);
        assert_eq!(provider.profile_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_profile_lookup_error_is_unauthenticated() {
        let (verdict, _) = resolve_with(Outcome::Found, Outcome::Failed).await;
        assert_eq!(verdict, AuthVerdict::Unauthenticated);
    }

    #[tokio::test]
    async fn test_user_with_profile_is_authenticated() {
        let (verdict, provider) = resolve_with(Outcome::Found, Outcome::Found).await;
        assert_eq!(verdict, AuthVerdict::Authenticated);
        assert_eq!(provider.user_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.profile_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_never_returns_checking() {
        let outcomes = [Outcome::Found, Outcome::Absent, Outcome::Failed];
        for user in outcomes {
            for profile in outcomes {
                let (verdict, _) = resolve_with(user, profile).await;
                assert!(verdict.is_settled(), "{user:?}/{profile:?} gave {verdict:?}");
            }
        }
    }
}
