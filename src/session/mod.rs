// Session manager - Owns the single active emulation session
//
// Replacing a session is the only way the running program changes. The
// manager never hands out long-lived references: the scheduler and the input
// bridge look the session up on every use.

use crate::machine::{CoreError, EmulationCore, FrameGeometry, Session};
use crate::timing::{FrameRequester, TimingScheduler};

/// Owner of at most one live [`Session`]
pub struct SessionManager {
    core: Box<dyn EmulationCore>,
    geometry: FrameGeometry,
    active: Option<Box<dyn Session>>,
    sessions_started: u64,
}

impl SessionManager {
    /// Create a manager for `core`, querying the frame geometry once
    pub fn new(core: Box<dyn EmulationCore>) -> Self {
        let geometry = FrameGeometry::new(core.frame_width(), core.frame_height());
        log::debug!("Core frame geometry {}x{}", geometry.width, geometry.height);

        Self {
            core,
            geometry,
            active: None,
            sessions_started: 0,
        }
    }

    /// Frame geometry of the core (constant)
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Replace the active session with one built from `image`, then start the scheduler
    ///
    /// On success the previous session is dropped before the scheduler is
    /// restarted with a cleared baseline.
    ///
    /// # Errors
    /// [`CoreError::InvalidImage`] if the core rejects `image`. The previous
    /// session stays active and the scheduler is left as it was.
    pub fn load_and_start(
        &mut self,
        image: &[u8],
        scheduler: &mut TimingScheduler,
        requester: &mut dyn FrameRequester,
    ) -> Result<(), CoreError> {
        let session = self.core.new_session(image)?;

        if self.active.replace(session).is_some() {
            log::debug!("Previous session released");
        }
        self.sessions_started += 1;
        log::info!(
            "Session #{} started ({} byte image)",
            self.sessions_started,
            image.len()
        );

        scheduler.start(requester);
        Ok(())
    }

    /// The active session, if any
    pub fn active(&self) -> Option<&dyn Session> {
        self.active.as_deref()
    }

    /// The active session, mutably
    pub fn active_mut(&mut self) -> Option<&mut dyn Session> {
        self.active
            .as_mut()
            .map(|session| session.as_mut() as &mut dyn Session)
    }

    pub fn has_session(&self) -> bool {
        self.active.is_some()
    }

    /// Number of sessions created so far
    pub fn sessions_started(&self) -> u64 {
        self.sessions_started
    }

    /// Drop the active session
    pub fn release(&mut self) {
        if self.active.take().is_some() {
            log::debug!("Session released");
        }
    }
}
