//! Application state for the Kindred terminal client.
//!
//! `App` owns the splash surface, the screen stack, and the lifecycles of the
//! entry screen and the skeleton shimmer. The render loop calls `tick` once
//! per frame to advance them.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use kindred_core::api::ApiClient;
use kindred_core::auth::{AuthVerdict, IdentityProvider, Session, SessionResolver};
use kindred_core::bootstrap::{
    BootstrapOrchestrator, BootstrapOutcome, PurchaseStatus, PurchaseSubsystem, SplashScreen,
};
use kindred_core::navigation::{Navigator, MAIN_PATH, WELCOME_PATH};
use kindred_core::purchases::PurchaseClient;
use kindred_core::{Config, EntryScreen, ShimmerAnimator};

/// Number of placeholder cards on the main screen
pub const SKELETON_CARD_COUNT: usize = 4;

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

/// Screens reachable from the entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Resolving screen shown until the session gate redirects
    Entry,
    Welcome,
    Main,
}

impl Screen {
    fn from_path(path: &str) -> Option<Self> {
        match path {
            MAIN_PATH => Some(Screen::Main),
            WELCOME_PATH => Some(Screen::Welcome),
            _ => None,
        }
    }
}

/// Navigation stack. Redirects replace the top entry.
#[derive(Debug)]
pub struct ScreenStack {
    entries: Vec<Screen>,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self {
            entries: vec![Screen::Entry],
        }
    }

    pub fn current(&self) -> Screen {
        self.entries.last().copied().unwrap_or(Screen::Entry)
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

impl Default for ScreenStack {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for ScreenStack {
    fn replace(&mut self, path: &str) {
        let Some(screen) = Screen::from_path(path) else {
            warn!(path, "Redirect to unknown path ignored");
            return;
        };
        self.entries.pop();
        self.entries.push(screen);
        debug!(?screen, depth = self.entries.len(), "Screen replaced");
    }
}

/// Splash cover drawn over the whole terminal until the bootstrap hides it.
#[derive(Debug)]
pub struct TerminalSplash {
    visible: AtomicBool,
    held: AtomicBool,
    hides: AtomicUsize,
}

impl TerminalSplash {
    pub fn new() -> Self {
        Self {
            visible: AtomicBool::new(true),
            held: AtomicBool::new(false),
            hides: AtomicUsize::new(0),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    /// True once the bootstrap has taken hold of the splash
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub fn hide_count(&self) -> usize {
        self.hides.load(Ordering::Acquire)
    }
}

impl Default for TerminalSplash {
    fn default() -> Self {
        Self::new()
    }
}

impl SplashScreen for TerminalSplash {
    fn prevent_auto_hide(&self) {
        self.held.store(true, Ordering::Release);
    }

    fn hide(&self) {
        if !self.is_held() {
            warn!("Splash hidden without a hold");
        }
        self.hides.fetch_add(1, Ordering::AcqRel);
        self.visible.store(false, Ordering::Release);
    }
}

pub struct App {
    pub config: Config,
    pub state: AppState,
    pub splash: Arc<TerminalSplash>,
    pub stack: ScreenStack,
    pub purchases: Option<PurchaseStatus>,

    /// Last verdict seen from the entry screen; outlives the screen itself
    verdict: AuthVerdict,
    resolver: SessionResolver,
    entry: Option<EntryScreen>,
    shimmer: Option<ShimmerAnimator>,
    bootstrap: Option<JoinHandle<BootstrapOutcome>>,
}

impl App {
    /// Build the app against the configured backends and start the bootstrap.
    pub fn new(config: Config) -> Result<Self> {
        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        let mut session = Session::new(cache_dir);
        match session.load() {
            Ok(found) => debug!(found, "Device session loaded"),
            Err(e) => warn!(error = %e, "Failed to load device session"),
        }

        let mut api = ApiClient::new(&config.api_url, &config.api_key)?;
        if let Some(token) = session.token() {
            api.set_token(token.to_string());
        }
        let purchases = PurchaseClient::new(&config.purchases_url, config.purchases_api_key.clone())?;

        Ok(Self::with_collaborators(config, Arc::new(api), Arc::new(purchases)))
    }

    /// Build the app from explicit collaborators. Must run inside a runtime.
    pub fn with_collaborators(
        config: Config,
        identity: Arc<dyn IdentityProvider>,
        purchases: Arc<dyn PurchaseSubsystem>,
    ) -> Self {
        let splash = Arc::new(TerminalSplash::new());
        let bootstrap =
            BootstrapOrchestrator::new(splash.clone(), purchases, config.splash_min_delay()).spawn();
        let resolver = SessionResolver::new(identity);
        let entry = EntryScreen::mount(resolver.clone());

        Self {
            config,
            state: AppState::Running,
            splash,
            stack: ScreenStack::new(),
            purchases: None,
            verdict: AuthVerdict::Checking,
            resolver,
            entry: Some(entry),
            shimmer: None,
            bootstrap: Some(bootstrap),
        }
    }

    pub fn current_screen(&self) -> Screen {
        self.stack.current()
    }

    pub fn splash_visible(&self) -> bool {
        self.splash.is_visible()
    }

    pub fn verdict(&self) -> AuthVerdict {
        self.verdict
    }

    pub fn shimmer_opacity(&self) -> Option<f32> {
        self.shimmer.as_ref().map(|s| s.opacity())
    }

    #[cfg(test)]
    pub fn shimmer_running(&self) -> bool {
        self.shimmer.as_ref().is_some_and(|s| s.is_running())
    }

    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    /// Advance background lifecycles. Called once per frame.
    pub async fn tick(&mut self) {
        self.collect_bootstrap().await;

        if let Some(entry) = self.entry.as_mut() {
            let verdict = entry.verdict();
            if verdict.is_settled() {
                self.verdict = verdict;
            }
            entry.poll_route(&mut self.stack);
        }

        // Entry screen left the stack: release its resolution task
        if self.current_screen() != Screen::Entry {
            if let Some(mut entry) = self.entry.take() {
                entry.unmount();
            }
        }

        self.sync_skeleton();
    }

    /// Re-run the session gate from a fresh entry screen.
    pub fn restart_entry(&mut self) {
        self.stack = ScreenStack::new();
        self.verdict = AuthVerdict::Checking;
        self.entry = Some(EntryScreen::mount(self.resolver.clone()));
        self.sync_skeleton();
    }

    async fn collect_bootstrap(&mut self) {
        if !self.bootstrap.as_ref().is_some_and(|h| h.is_finished()) {
            return;
        }
        if let Some(handle) = self.bootstrap.take() {
            match handle.await {
                Ok(outcome) => {
                    info!(purchases = ?outcome.purchases, "Bootstrap finished");
                    self.purchases = Some(outcome.purchases);
                }
                Err(e) => warn!(error = %e, "Bootstrap task did not complete"),
            }
        }
    }

    /// Skeleton placeholders live on the main screen; the shimmer follows them.
    fn sync_skeleton(&mut self) {
        let mounted = self.current_screen() == Screen::Main;
        match (mounted, self.shimmer.as_mut()) {
            (true, None) => {
                let mut shimmer = ShimmerAnimator::new(self.config.shimmer);
                shimmer.start();
                self.shimmer = Some(shimmer);
            }
            (false, Some(shimmer)) => {
                shimmer.stop();
                self.shimmer = None;
            }
            _ => {}
        }
    }
}
