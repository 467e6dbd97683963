// Input module - Routes keyboard events into the active session
//
// The bridge forwards virtual key codes verbatim. It holds no reference to a
// session; the current one is looked up from the session manager on every
// event, so keys always reach the most recently loaded program.

pub mod config;
pub mod keycode;

pub use config::{HotkeyAction, HotkeyConfig, Hotkeys};
pub use keycode::virtual_key_code;

use crate::session::SessionManager;

/// Forwards key events to the active session
#[derive(Debug, Default)]
pub struct InputBridge {
    keys_forwarded: u64,
}

impl InputBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a key press
    ///
    /// Returns `false` (and does nothing) when no session is active.
    pub fn on_key_down(&mut self, sessions: &mut SessionManager, code: u32) -> bool {
        match sessions.active_mut() {
            Some(session) => {
                session.key_down(code);
                self.keys_forwarded += 1;
                true
            }
            None => false,
        }
    }

    /// Forward a key release
    ///
    /// Returns `false` (and does nothing) when no session is active.
    pub fn on_key_up(&mut self, sessions: &mut SessionManager, code: u32) -> bool {
        match sessions.active_mut() {
            Some(session) => {
                session.key_up(code);
                self.keys_forwarded += 1;
                true
            }
            None => false,
        }
    }

    /// Number of key events delivered to a session
    pub fn keys_forwarded(&self) -> u64 {
        self.keys_forwarded
    }
}
