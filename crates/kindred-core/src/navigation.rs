//! Maps a session verdict to the entry screen's single redirect.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::AuthVerdict;

/// Path of the authenticated tab area
pub const MAIN_PATH: &str = "/(tabs)";

/// Path of the pre-authentication welcome flow
pub const WELCOME_PATH: &str = "/(auth)/welcome";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Destination {
    /// Stay put and show a blocking indicator
    Loading,
    Main,
    Welcome,
}

impl Destination {
    /// Redirect target, or `None` when no redirect should be issued.
    pub fn path(self) -> Option<&'static str> {
        match self {
            Destination::Loading => None,
            Destination::Main => Some(MAIN_PATH),
            Destination::Welcome => Some(WELCOME_PATH),
        }
    }
}

pub fn route(verdict: AuthVerdict) -> Destination {
    match verdict {
        AuthVerdict::Checking => Destination::Loading,
        AuthVerdict::Authenticated => Destination::Main,
        AuthVerdict::Unauthenticated => Destination::Welcome,
    }
}

/// Redirect primitive: swaps the current stack entry so the user cannot
/// navigate back into the resolving screen.
pub trait Navigator {
    fn replace(&mut self, path: &str);
}

/// Issues at most one redirect per resolution cycle.
#[derive(Debug, Default)]
pub struct Router {
    issued: Option<Destination>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `verdict`, redirecting through `navigator` if this cycle has not
    /// redirected yet. Nothing is issued while the verdict is `Checking`.
    pub fn apply<N: Navigator + ?Sized>(&mut self, verdict: AuthVerdict, navigator: &mut N) -> Destination {
        if let Some(done) = self.issued {
            return done;
        }

        let destination = route(verdict);
        match destination.path() {
            Some(path) => {
                info!(?verdict, path, "Redirecting");
                navigator.replace(path);
                self.issued = Some(destination);
            }
            None => debug!("Verdict pending, holding on indicator"),
        }
        destination
    }

    pub fn issued(&self) -> Option<Destination> {
        self.issued
    }

    /// Start a new resolution cycle.
    pub fn reset(&mut self) {
        self.issued = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingNavigator {
        paths: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn replace(&mut self, path: &str) {
            self.paths.push(path.to_string());
        }
    }

    #[test]
    fn test_route_mapping() {
        assert_eq!(route(AuthVerdict::Checking), Destination::Loading);
        assert_eq!(route(AuthVerdict::Authenticated), Destination::Main);
        assert_eq!(route(AuthVerdict::Unauthenticated), Destination::Welcome);
        assert_eq!(Destination::Loading.path(), None);
    }

    #[test]
    fn test_no_redirect_while_checking() {
        let mut router = Router::new();
        let mut nav = RecordingNavigator::default();

        for _ in 0..3 {
            assert_eq!(router.apply(AuthVerdict::Checking, &mut nav), Destination::Loading);
        }
        assert!(nav.paths.is_empty());
        assert_eq!(router.issued(), None);
    }

    #[test]
    fn test_single_redirect_per_cycle() {
        let mut router = Router::new();
        let mut nav = RecordingNavigator::default();

        router.apply(AuthVerdict::Checking, &mut nav);
        assert_eq!(router.apply(AuthVerdict::Unauthenticated, &mut nav), Destination::Welcome);
        assert_eq!(router.apply(AuthVerdict::Unauthenticated, &mut nav), Destination::Welcome);
        assert_eq!(router.apply(AuthVerdict::Authenticated, &mut nav), Destination::Welcome);

        assert_eq!(nav.paths, vec![WELCOME_PATH.to_string()]);
    }

    #[test]
    fn test_reset_allows_next_cycle() {
        let mut router = Router::new();
        let mut nav = RecordingNavigator::default();

        router.apply(AuthVerdict::Unauthenticated, &mut nav);
        router.reset();
        router.apply(AuthVerdict::Authenticated, &mut nav);

        assert_eq!(nav.paths, vec![WELCOME_PATH.to_string(), MAIN_PATH.to_string()]);
    }
}
