// Timing scheduler - Drives the active session from the display refresh
//
// Each display refresh produces one tick carrying a timestamp in milliseconds.
// The scheduler turns the time since the previous tick into emulated time for
// the active session and hands finished frames to the presenter.
//
// Deltas outside [0, threshold) are timing anomalies (backgrounded window,
// debugger pause, clock jump). They are absorbed by moving the baseline
// forward instead of asking the core to catch up in one huge step.

mod requester;

pub use requester::{FrameHandle, FrameRequester, ManualRequester};

use crate::display::{FrameBufferPresenter, FrameBufferView, PresentError, PresentationSurface};
use crate::session::SessionManager;
use serde::{Deserialize, Serialize};

/// Default upper bound for a usable tick delta (milliseconds)
pub const DEFAULT_ANOMALY_THRESHOLD_MS: f64 = 35.0;

/// Largest threshold whose deltas still fit a `u32` microsecond count
pub const MAX_ANOMALY_THRESHOLD_MS: f64 = u32::MAX as f64 / 1000.0;

/// Timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Deltas at or above this many milliseconds are discarded
    pub anomaly_threshold_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            anomaly_threshold_ms: DEFAULT_ANOMALY_THRESHOLD_MS,
        }
    }
}

impl TimingConfig {
    /// Whether the threshold is finite, positive and within `u32` microseconds
    pub fn is_valid(&self) -> bool {
        self.anomaly_threshold_ms.is_finite()
            && self.anomaly_threshold_ms > 0.0
            && self.anomaly_threshold_ms <= MAX_ANOMALY_THRESHOLD_MS
    }

    /// This configuration, or the default threshold if it is unusable
    pub fn validated(self) -> Self {
        if self.is_valid() {
            self
        } else {
            log::warn!(
                "Invalid anomaly threshold {} ms, using {} ms",
                self.anomaly_threshold_ms,
                DEFAULT_ANOMALY_THRESHOLD_MS
            );
            Self::default()
        }
    }
}

/// Scheduler state, derived from whether a tick is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No tick requested
    Idle,
    /// A tick is requested; the loop keeps itself alive
    Running,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Stale or cancelled tick, or the scheduler is idle; nothing happened
    Ignored,
    /// First tick after start or resynchronization; baseline recorded
    Baseline,
    /// Delta outside the accepted range; baseline moved, session untouched
    Anomaly { delta_ms: f64 },
    /// Session advanced by `microseconds`
    Advanced {
        microseconds: u32,
        frame_presented: bool,
    },
    /// Running without an active session; baseline recorded
    NoSession,
}

/// Per-display-frame loop driving the active session
#[derive(Debug)]
pub struct TimingScheduler {
    previous_timestamp: Option<f64>,
    run_handle: Option<FrameHandle>,
    config: TimingConfig,
    anomalies: u64,
}

impl TimingScheduler {
    /// Create an idle scheduler
    ///
    /// An unusable threshold (NaN, infinite, zero or negative, or too large
    /// for a `u32` microsecond count) is replaced by the default.
    pub fn new(config: TimingConfig) -> Self {
        Self {
            previous_timestamp: None,
            run_handle: None,
            config: config.validated(),
            anomalies: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.run_handle.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    /// Timestamp of the last tick, `None` while waiting for a first tick
    pub fn previous_timestamp(&self) -> Option<f64> {
        self.previous_timestamp
    }

    /// Number of ticks discarded as timing anomalies
    pub fn anomalies(&self) -> u64 {
        self.anomalies
    }

    pub fn config(&self) -> TimingConfig {
        self.config
    }

    /// Enter `Running` with a cleared baseline
    ///
    /// Safe to call while already running: the pending request is replaced.
    pub fn start(&mut self, requester: &mut dyn FrameRequester) {
        if let Some(handle) = self.run_handle.take() {
            requester.cancel_frame(handle);
        }
        self.previous_timestamp = None;
        self.run_handle = Some(requester.request_frame());
        log::debug!("Scheduler started");
    }

    /// Enter `Idle`, cancelling the pending tick
    pub fn stop(&mut self, requester: &mut dyn FrameRequester) {
        if let Some(handle) = self.run_handle.take() {
            requester.cancel_frame(handle);
            log::debug!("Scheduler stopped");
        }
    }

    /// Forget the baseline so the next tick is treated as a first tick
    ///
    /// Called on focus gain and loss. Does not change the state.
    pub fn resynchronize(&mut self) {
        self.previous_timestamp = None;
    }

    /// Handle one display refresh
    ///
    /// `handle` identifies the request being served and `timestamp_ms` is the
    /// host's refresh timestamp. The current session is looked up from
    /// `sessions` on every tick, so a session swapped in between ticks is
    /// picked up immediately.
    ///
    /// # Errors
    /// Presentation failures are fatal: the error is returned and no further
    /// tick is requested.
    pub fn tick<S: PresentationSurface>(
        &mut self,
        handle: FrameHandle,
        timestamp_ms: f64,
        sessions: &mut SessionManager,
        presenter: &mut FrameBufferPresenter<S>,
        requester: &mut dyn FrameRequester,
    ) -> Result<TickOutcome, PresentError> {
        if self.run_handle != Some(handle) {
            return Ok(TickOutcome::Ignored);
        }
        self.run_handle = None;

        let outcome = match self.previous_timestamp {
            None => TickOutcome::Baseline,
            Some(previous) => {
                let delta_ms = timestamp_ms - previous;
                if delta_ms < 0.0 || delta_ms >= self.config.anomaly_threshold_ms {
                    self.anomalies += 1;
                    log::debug!(
                        "Timing anomaly: {:.3} ms delta discarded ({} so far)",
                        delta_ms,
                        self.anomalies
                    );
                    TickOutcome::Anomaly { delta_ms }
                } else {
                    let microseconds = (delta_ms * 1000.0).round() as u32;
                    let geometry = sessions.geometry();
                    match sessions.active_mut() {
                        Some(session) => {
                            let frame_ready = session.advance(microseconds);
                            if frame_ready {
                                let view = FrameBufferView::of_session(session, geometry)?;
                                presenter.present(view)?;
                            }
                            TickOutcome::Advanced {
                                microseconds,
                                frame_presented: frame_ready,
                            }
                        }
                        None => TickOutcome::NoSession,
                    }
                }
            }
        };

        self.previous_timestamp = Some(timestamp_ms);
        self.run_handle = Some(requester.request_frame());

        Ok(outcome)
    }
}

impl Default for TimingScheduler {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}
