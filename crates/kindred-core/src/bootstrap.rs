//! One-shot startup sequence that gates removal of the splash surface.
//!
//! The splash is held while two things settle together: a minimum display
//! delay and the purchase subsystem's initialization. Whatever happens to the
//! initializer, the splash is hidden exactly once afterwards.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::purchases::PurchaseError;

/// Default minimum time the splash stays up
pub const DEFAULT_MIN_SPLASH_DELAY: Duration = Duration::from_millis(500);

/// Full-screen cover shown before the UI is ready.
pub trait SplashScreen: Send + Sync {
    /// Keep the splash up until `hide` is called.
    fn prevent_auto_hide(&self);

    fn hide(&self);
}

/// Startup hook of the in-app purchase subsystem.
#[async_trait]
pub trait PurchaseSubsystem: Send + Sync {
    async fn init(&self) -> Result<(), PurchaseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum PurchaseStatus {
    Ready,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub purchases: PurchaseStatus,
    pub elapsed: Duration,
}

/// Hides the splash when released or dropped, whichever comes first.
struct SplashGuard<'a> {
    splash: &'a dyn SplashScreen,
    hidden: bool,
}

impl<'a> SplashGuard<'a> {
    fn new(splash: &'a dyn SplashScreen) -> Self {
        Self {
            splash,
            hidden: false,
        }
    }

    fn release(mut self) {
        self.hide_once();
    }

    fn hide_once(&mut self) {
        if !self.hidden {
            self.hidden = true;
            self.splash.hide();
        }
    }
}

impl Drop for SplashGuard<'_> {
    fn drop(&mut self) {
        self.hide_once();
    }
}

pub struct BootstrapOrchestrator {
    splash: Arc<dyn SplashScreen>,
    purchases: Arc<dyn PurchaseSubsystem>,
    min_delay: Duration,
}

impl BootstrapOrchestrator {
    pub fn new(
        splash: Arc<dyn SplashScreen>,
        purchases: Arc<dyn PurchaseSubsystem>,
        min_delay: Duration,
    ) -> Self {
        Self {
            splash,
            purchases,
            min_delay,
        }
    }

    /// Run the startup sequence. Consumes the orchestrator so it can run once.
    ///
    /// The delay and the initializer are joined, not raced: the splash comes
    /// down only after both have settled. An initializer error is logged and
    /// reported as `PurchaseStatus::Unavailable`.
    pub async fn run(self) -> BootstrapOutcome {
        let started = Instant::now();
        self.splash.prevent_auto_hide();
        let guard = SplashGuard::new(self.splash.as_ref());

        debug!(min_delay_ms = self.min_delay.as_millis() as u64, "Bootstrap started");
        let ((), init) = tokio::join!(tokio::time::sleep(self.min_delay), self.purchases.init());

        let purchases = match init {
            Ok(()) => PurchaseStatus::Ready,
            Err(e) => {
                error!(error = %e, "Purchase subsystem failed to initialize");
                PurchaseStatus::Unavailable
            }
        };

        guard.release();
        let elapsed = started.elapsed();
        info!(?purchases, elapsed_ms = elapsed.as_millis() as u64, "Splash hidden");

        BootstrapOutcome { purchases, elapsed }
    }

    /// Run on the current runtime as an owned task.
    pub fn spawn(self) -> JoinHandle<BootstrapOutcome> {
        tokio::spawn(self.run())
    }
}
