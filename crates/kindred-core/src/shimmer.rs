//! Opacity loop for skeleton placeholders.
//!
//! The phase runs 0 -> 1 over one leg and back 1 -> 0 over another, forever,
//! for as long as the owning surface keeps the animator started. Opacity is a
//! linear map of the phase into a fixed output range.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

// ============================================================================
// Constants
// ============================================================================

pub const DEFAULT_LEG_MS: u64 = 1000;

/// Roughly one display refresh at 60Hz
pub const DEFAULT_FRAME_MS: u64 = 16;

pub const DEFAULT_MIN_OPACITY: f32 = 0.3;
pub const DEFAULT_MAX_OPACITY: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimmerSettings {
    pub leg_ms: u64,
    pub frame_ms: u64,
    pub min_opacity: f32,
    pub max_opacity: f32,
}

impl Default for ShimmerSettings {
    fn default() -> Self {
        Self {
            leg_ms: DEFAULT_LEG_MS,
            frame_ms: DEFAULT_FRAME_MS,
            min_opacity: DEFAULT_MIN_OPACITY,
            max_opacity: DEFAULT_MAX_OPACITY,
        }
    }
}

impl ShimmerSettings {
    /// Leg duration, never zero
    pub fn leg(&self) -> Duration {
        Duration::from_millis(self.leg_ms.max(1))
    }

    /// Frame interval, never zero
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Rising,
    Falling,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShimmerPhase {
    pub value: f32,
    pub direction: Direction,
}

impl Default for ShimmerPhase {
    fn default() -> Self {
        Self {
            value: 0.0,
            direction: Direction::Rising,
        }
    }
}

impl ShimmerPhase {
    /// Phase after `elapsed` of a loop whose legs each last `leg`.
    pub fn at(elapsed: Duration, leg: Duration) -> Self {
        let leg_ns = leg.as_nanos().max(1);
        let t = elapsed.as_nanos() % (2 * leg_ns);

        if t < leg_ns {
            Self {
                value: (t as f64 / leg_ns as f64) as f32,
                direction: Direction::Rising,
            }
        } else {
            Self {
                value: (1.0 - (t - leg_ns) as f64 / leg_ns as f64) as f32,
                direction: Direction::Falling,
            }
        }
    }

    pub fn opacity(&self, min: f32, max: f32) -> f32 {
        let t = self.value.clamp(0.0, 1.0);
        min + (max - min) * t
    }
}

/// Mount-scoped driver for a `ShimmerPhase`.
///
/// `start` on mount, `stop` on unmount; dropping the animator also stops it.
pub struct ShimmerAnimator {
    settings: ShimmerSettings,
    phase_rx: watch::Receiver<ShimmerPhase>,
    phase_tx: watch::Sender<ShimmerPhase>,
    task: Option<JoinHandle<()>>,
}

impl ShimmerAnimator {
    pub fn new(settings: ShimmerSettings) -> Self {
        let (phase_tx, phase_rx) = watch::channel(ShimmerPhase::default());
        Self {
            settings,
            phase_rx,
            phase_tx,
            task: None,
        }
    }

    /// Start the loop. Does nothing if it is already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let tx = self.phase_tx.clone();
        let leg = self.settings.leg();
        let frame = self.settings.frame();
        let started = Instant::now();

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(frame);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(ShimmerPhase::at(started.elapsed(), leg)).is_err() {
                    break;
                }
            }
        }));
        debug!(leg_ms = leg.as_millis() as u64, "Shimmer started");
    }

    /// Stop the loop and release its timer.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Shimmer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn phase(&self) -> ShimmerPhase {
        *self.phase_rx.borrow()
    }

    pub fn opacity(&self) -> f32 {
        self.phase()
            .opacity(self.settings.min_opacity, self.settings.max_opacity)
    }
}

impl Drop for ShimmerAnimator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEG: Duration = Duration::from_millis(100);

    #[test]
    fn test_phase_endpoints() {
        let start = ShimmerPhase::at(Duration::ZERO, LEG);
        assert_eq!(start.value, 0.0);
        assert_eq!(start.direction, Direction::Rising);

        let top = ShimmerPhase::at(LEG, LEG);
        assert_eq!(top.value, 1.0);
        assert_eq!(top.direction, Direction::Falling);

        let back = ShimmerPhase::at(LEG * 2, LEG);
        assert_eq!(back.value, 0.0);
        assert_eq!(back.direction, Direction::Rising);
    }

    #[test]
    fn test_phase_midpoints() {
        let rising = ShimmerPhase::at(Duration::from_millis(25), LEG);
        assert!((rising.value - 0.25).abs() < 1e-6);
        assert_eq!(rising.direction, Direction::Rising);

        let falling = ShimmerPhase::at(Duration::from_millis(175), LEG);
        assert!((falling.value - 0.25).abs() < 1e-6);
        assert_eq!(falling.direction, Direction::Falling);
    }

    #[test]
    fn test_phase_stays_in_range_and_visits_both_ends() {
        let mut saw_zero = false;
        let mut saw_one = false;
        for ms in 0..=1000u64 {
            let phase = ShimmerPhase::at(Duration::from_millis(ms), LEG);
            assert!((0.0..=1.0).contains(&phase.value), "{ms}ms gave {}", phase.value);
            saw_zero |= phase.value == 0.0;
            saw_one |= phase.value == 1.0;
        }
        assert!(saw_zero && saw_one);
    }

    #[test]
    fn test_opacity_interpolation() {
        let low = ShimmerPhase::at(Duration::ZERO, LEG);
        let high = ShimmerPhase::at(LEG, LEG);
        let mid = ShimmerPhase::at(LEG / 2, LEG);

        assert!((low.opacity(0.3, 0.7) - 0.3).abs() < 1e-6);
        assert!((high.opacity(0.3, 0.7) - 0.7).abs() < 1e-6);
        assert!((mid.opacity(0.3, 0.7) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_leg_is_clamped() {
        let settings = ShimmerSettings {
            leg_ms: 0,
            frame_ms: 0,
            ..Default::default()
        };
        assert_eq!(settings.leg(), Duration::from_millis(1));
        assert_eq!(settings.frame(), Duration::from_millis(1));
    }

    fn test_settings() -> ShimmerSettings {
        ShimmerSettings {
            leg_ms: 100,
            frame_ms: 10,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_animator_oscillates_while_running() {
        let mut animator = ShimmerAnimator::new(test_settings());
        animator.start();
        assert!(animator.is_running());

        tokio::time::sleep(Duration::from_millis(105)).await;
        let top = animator.phase();
        assert!(top.value > 0.99, "expected peak, got {top:?}");
        assert_eq!(top.direction, Direction::Falling);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let bottom = animator.phase();
        assert!(bottom.value < 0.01, "expected trough, got {bottom:?}");
        assert_eq!(bottom.direction, Direction::Rising);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_phase() {
        let mut animator = ShimmerAnimator::new(test_settings());
        animator.start();
        tokio::time::sleep(Duration::from_millis(55)).await;

        animator.stop();
        assert!(!animator.is_running());
        let frozen = animator.phase();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(animator.phase(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let mut animator = ShimmerAnimator::new(test_settings());
        animator.start();
        animator.start();
        tokio::time::sleep(Duration::from_millis(25)).await;

        let opacity = animator.opacity();
        assert!((DEFAULT_MIN_OPACITY..=DEFAULT_MAX_OPACITY).contains(&opacity));
        animator.stop();
        animator.start();
        assert!(animator.is_running());
    }
}
