//! Entry-screen lifecycle.
//!
//! Mounting the entry screen starts one session resolution as an owned task.
//! The verdict is published on a watch channel that starts at `Checking`.
//! Unmounting aborts the task, so a lookup that finishes after the screen is
//! gone can never publish into it.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::auth::{AuthVerdict, SessionResolver};
use crate::navigation::{Destination, Navigator, Router};

pub struct EntryScreen {
    verdict_rx: watch::Receiver<AuthVerdict>,
    task: Option<JoinHandle<()>>,
    router: Router,
}

impl EntryScreen {
    /// Mount the screen and start resolving. Must be called inside a runtime.
    pub fn mount(resolver: SessionResolver) -> Self {
        let (tx, verdict_rx) = watch::channel(AuthVerdict::Checking);

        let task = tokio::spawn(async move {
            let verdict = resolver.resolve().await;
            // Receiver gone means the screen was dropped mid-flight
            let _ = tx.send(verdict);
        });
        debug!("Entry screen mounted");

        Self {
            verdict_rx,
            task: Some(task),
            router: Router::new(),
        }
    }

    pub fn verdict(&self) -> AuthVerdict {
        *self.verdict_rx.borrow()
    }

    /// Wait for the resolution to settle.
    ///
    /// Returns `Checking` only if the screen was unmounted before a verdict
    /// arrived.
    pub async fn settled(&mut self) -> AuthVerdict {
        let settled = self
            .verdict_rx
            .wait_for(|v| v.is_settled())
            .await
            .map(|v| *v);
        settled.unwrap_or_else(|_| *self.verdict_rx.borrow())
    }

    /// Non-blocking routing step for a render loop.
    pub fn poll_route<N: Navigator + ?Sized>(&mut self, navigator: &mut N) -> Destination {
        let verdict = self.verdict();
        self.router.apply(verdict, navigator)
    }

    pub fn is_mounted(&self) -> bool {
        self.task.is_some()
    }

    /// Cancel any in-flight resolution and release the task handle.
    pub fn unmount(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Entry screen unmounted");
        }
    }
}

impl Drop for EntryScreen {
    fn drop(&mut self) {
        self.unmount();
    }
}
