// Emulator module - Front end coordinator
//
// Owns the session manager, timing scheduler, presenter, input bridge and
// catalog menu, and is the single entry point the host window calls into.
// Everything here runs on the event loop thread; the host is responsible for
// fetching bytes on worker threads and delivering them back.

pub mod config;
mod screenshot;

pub use config::{CatalogConfig, ConfigError, FrontendConfig, ScreenshotConfig, VideoConfig};
pub use screenshot::{save_screenshot, ScreenshotError};

use crate::catalog::{CatalogEntry, CatalogError, CatalogMenu, FetchError};
use crate::display::{FrameBufferPresenter, PresentError, PresentationSurface};
use crate::input::{HotkeyAction, Hotkeys, InputBridge};
use crate::machine::{CoreError, EmulationCore, FrameGeometry};
use crate::session::SessionManager;
use crate::timing::{FrameHandle, FrameRequester, TickOutcome, TimingScheduler};
use std::path::PathBuf;

/// What happened to a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Delivered to the active session
    Forwarded,
    /// No session is active; the key was dropped
    Ignored,
    /// Consumed by a front end hotkey
    Handled(HotkeyAction),
    /// The load hotkey was pressed; the host should fetch this entry
    LoadRequested(CatalogEntry),
}

/// Main front end structure
///
/// Generic over the presentation surface so the same coordinator drives a
/// real window and headless tests.
pub struct Emulator<S: PresentationSurface> {
    sessions: SessionManager,
    scheduler: TimingScheduler,
    presenter: FrameBufferPresenter<S>,
    input: InputBridge,
    menu: CatalogMenu,
    hotkeys: Hotkeys,
    screenshot_config: ScreenshotConfig,

    /// Name of the catalog entry the active session was built from
    running_program: Option<String>,

    /// Entry to load as soon as the catalog arrives
    autoload: Option<String>,

    /// Last user-visible message (load failures, screenshots)
    status: Option<String>,
}

impl<S: PresentationSurface> Emulator<S> {
    /// Create a front end for `core`
    ///
    /// Invalid hotkey names fall back to the default bindings with a warning.
    pub fn new(core: Box<dyn EmulationCore>, config: &FrontendConfig) -> Self {
        let sessions = SessionManager::new(core);
        let presenter = FrameBufferPresenter::new(sessions.geometry());
        let hotkeys = config.hotkeys.to_hotkeys().unwrap_or_else(|e| {
            log::warn!("Invalid hotkey configuration ({}), using defaults", e);
            Hotkeys::default()
        });

        Self {
            sessions,
            scheduler: TimingScheduler::new(config.timing),
            presenter,
            input: InputBridge::new(),
            menu: CatalogMenu::new(),
            hotkeys,
            screenshot_config: config.screenshot.clone(),
            running_program: None,
            autoload: None,
            status: None,
        }
    }

    /// Frame geometry of the core
    pub fn geometry(&self) -> FrameGeometry {
        self.sessions.geometry()
    }

    /// Attach the presentation surface once the host has created it
    pub fn attach_surface(&mut self, surface: S) {
        self.presenter.attach_surface(surface);
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn scheduler(&self) -> &TimingScheduler {
        &self.scheduler
    }

    pub fn presenter(&self) -> &FrameBufferPresenter<S> {
        &self.presenter
    }

    pub fn menu(&self) -> &CatalogMenu {
        &self.menu
    }

    /// Name of the running program, if any
    pub fn running_program(&self) -> Option<&str> {
        self.running_program.as_deref()
    }

    /// Load the entry named `name` once the catalog has been fetched
    pub fn request_autoload(&mut self, name: impl Into<String>) {
        self.autoload = Some(name.into());
    }

    /// Populate the menu with a freshly fetched catalog
    ///
    /// Returns the entry to fetch right away when an autoload was requested
    /// and the catalog contains it.
    pub fn set_catalog(&mut self, entries: Vec<CatalogEntry>) -> Option<CatalogEntry> {
        self.menu.set_entries(entries);
        self.status = None;

        let name = self.autoload.take()?;
        match self.menu.find(&name) {
            Some(entry) => Some(entry.clone()),
            None => {
                log::warn!("Program '{}' is not in the catalog", name);
                self.status = Some(format!("'{}' not found", name));
                None
            }
        }
    }

    /// Record a failed catalog fetch; the menu stays empty
    pub fn catalog_failed(&mut self, error: &CatalogError) {
        log::error!("{}", error);
        self.autoload = None;
        self.status = Some("Catalog unavailable".to_string());
    }

    /// Record a failed payload fetch
    pub fn program_fetch_failed(&mut self, entry: &CatalogEntry, error: &FetchError) {
        log::error!("Could not fetch '{}': {}", entry.name, error);
        self.status = Some(format!("Could not fetch '{}'", entry.name));
    }

    /// Start a new session from fetched program bytes
    ///
    /// On success the previous session is released and the scheduler is
    /// restarted with a fresh baseline. On failure nothing changes.
    pub fn load_program(
        &mut self,
        entry: &CatalogEntry,
        bytes: &[u8],
        requester: &mut dyn FrameRequester,
    ) -> Result<(), CoreError> {
        match self
            .sessions
            .load_and_start(bytes, &mut self.scheduler, requester)
        {
            Ok(()) => {
                log::info!("Running '{}'", entry.name);
                self.running_program = Some(entry.name.clone());
                self.status = None;
                Ok(())
            }
            Err(e) => {
                log::error!("Could not start '{}': {}", entry.name, e);
                self.status = Some(format!("'{}': {}", entry.name, e));
                Err(e)
            }
        }
    }

    /// Serve one display refresh
    ///
    /// # Errors
    /// Presentation failures are fatal; the scheduler stops requesting ticks.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        timestamp_ms: f64,
        requester: &mut dyn FrameRequester,
    ) -> Result<TickOutcome, PresentError> {
        self.scheduler.tick(
            handle,
            timestamp_ms,
            &mut self.sessions,
            &mut self.presenter,
            requester,
        )
    }

    /// The window gained or lost focus
    pub fn on_focus_changed(&mut self, focused: bool) {
        log::debug!("Focus {}", if focused { "gained" } else { "lost" });
        self.scheduler.resynchronize();
    }

    /// The window was resized
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        self.presenter.resize(width, height)
    }

    /// Redraw the last frame without advancing (e.g. window exposed)
    pub fn redraw(&mut self) -> Result<(), PresentError> {
        self.presenter.draw()
    }

    /// Route a key press
    pub fn key_down(&mut self, code: u32) -> KeyOutcome {
        if let Some(action) = self.hotkeys.action_for(code) {
            return self.run_hotkey(action);
        }

        if self.input.on_key_down(&mut self.sessions, code) {
            KeyOutcome::Forwarded
        } else {
            KeyOutcome::Ignored
        }
    }

    /// Route a key release
    pub fn key_up(&mut self, code: u32) -> KeyOutcome {
        if let Some(action) = self.hotkeys.action_for(code) {
            return KeyOutcome::Handled(action);
        }

        if self.input.on_key_up(&mut self.sessions, code) {
            KeyOutcome::Forwarded
        } else {
            KeyOutcome::Ignored
        }
    }

    fn run_hotkey(&mut self, action: HotkeyAction) -> KeyOutcome {
        match action {
            HotkeyAction::SelectNext => {
                self.menu.select_next();
            }
            HotkeyAction::SelectPrevious => {
                self.menu.select_previous();
            }
            HotkeyAction::LoadSelected => {
                if let Some(entry) = self.menu.selected() {
                    return KeyOutcome::LoadRequested(entry.clone());
                }
            }
            HotkeyAction::Screenshot => match self.screenshot() {
                Ok(path) => self.status = Some(format!("Saved {}", path.display())),
                Err(e) => {
                    log::warn!("Screenshot failed: {}", e);
                    self.status = Some("Screenshot failed".to_string());
                }
            },
        }
        KeyOutcome::Handled(action)
    }

    /// Save the last presented frame as PNG
    pub fn screenshot(&self) -> Result<PathBuf, ScreenshotError> {
        save_screenshot(
            self.presenter.last_frame(),
            self.geometry(),
            self.running_program.as_deref(),
            &self.screenshot_config,
        )
    }

    /// Stop the tick loop
    pub fn stop(&mut self, requester: &mut dyn FrameRequester) {
        self.scheduler.stop(requester);
    }

    /// Stop the scheduler and release the running session
    pub fn shutdown(&mut self, requester: &mut dyn FrameRequester) {
        self.scheduler.stop(requester);
        self.sessions.release();
        self.running_program = None;
    }

    /// Window title: running program, menu selection and last message
    pub fn title(&self) -> String {
        let mut title = String::from("NES Frontend");
        if let Some(program) = &self.running_program {
            title.push_str(" - ");
            title.push_str(program);
        }
        title.push_str(" | ");
        title.push_str(&self.menu.status_line());
        if let Some(status) = &self.status {
            title.push_str(" | ");
            title.push_str(status);
        }
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{MemorySurface, SurfaceOrigin};
    use crate::input::keycode::{KEY_F1, KEY_F9, KEY_PAGE_DOWN, KEY_PAGE_UP, KEY_X};
    use crate::machine::reference::image::build_image;
    use crate::machine::ReferenceCore;
    use crate::timing::{ManualRequester, SchedulerState};

    fn emulator() -> Emulator<MemorySurface> {
        let mut emulator: Emulator<MemorySurface> =
            Emulator::new(Box::new(ReferenceCore::new()), &FrontendConfig::default());
        let geometry = emulator.geometry();
        emulator.attach_surface(MemorySurface::new(geometry, SurfaceOrigin::TopLeft));
        emulator
    }

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("Game A", "a.bin"),
            CatalogEntry::new("Game B", "b.bin"),
        ]
    }

    #[test]
    fn test_keys_without_session_are_ignored() {
        let mut emulator = emulator();
        assert_eq!(emulator.key_down(KEY_X), KeyOutcome::Ignored);
        assert_eq!(emulator.key_up(KEY_X), KeyOutcome::Ignored);
    }

    #[test]
    fn test_menu_hotkeys() {
        let mut emulator = emulator();
        emulator.set_catalog(catalog());

        assert_eq!(
            emulator.key_down(KEY_PAGE_DOWN),
            KeyOutcome::Handled(HotkeyAction::SelectNext)
        );
        assert_eq!(emulator.menu().selected().unwrap().name, "Game B");

        assert_eq!(
            emulator.key_down(KEY_F1),
            KeyOutcome::LoadRequested(CatalogEntry::new("Game B", "b.bin"))
        );

        emulator.key_down(KEY_PAGE_UP);
        assert_eq!(emulator.menu().selected().unwrap().name, "Game A");
        assert!(emulator.title().contains("[1/2] Game A"));
    }

    #[test]
    fn test_load_hotkey_with_empty_menu() {
        let mut emulator = emulator();
        assert_eq!(
            emulator.key_down(KEY_F1),
            KeyOutcome::Handled(HotkeyAction::LoadSelected)
        );
    }

    #[test]
    fn test_hotkeys_are_not_forwarded() {
        let mut emulator = emulator();
        let mut requester = ManualRequester::new();
        emulator
            .load_program(&catalog()[0], &build_image(1, 1, 0x11), &mut requester)
            .unwrap();

        assert_eq!(
            emulator.key_up(KEY_PAGE_DOWN),
            KeyOutcome::Handled(HotkeyAction::SelectNext)
        );
        assert_eq!(emulator.key_down(KEY_X), KeyOutcome::Forwarded);
    }

    #[test]
    fn test_load_program_starts_scheduler() {
        let mut emulator = emulator();
        let mut requester = ManualRequester::new();

        emulator
            .load_program(&catalog()[0], &build_image(1, 1, 0x11), &mut requester)
            .unwrap();

        assert_eq!(emulator.scheduler().state(), SchedulerState::Running);
        assert_eq!(emulator.running_program(), Some("Game A"));
        assert!(emulator.title().starts_with("NES Frontend - Game A"));
    }

    #[test]
    fn test_invalid_program_keeps_running_session() {
        let mut emulator = emulator();
        let mut requester = ManualRequester::new();
        emulator
            .load_program(&catalog()[0], &build_image(1, 1, 0x11), &mut requester)
            .unwrap();

        let err = emulator
            .load_program(&catalog()[1], b"garbage", &mut requester)
            .unwrap_err();

        assert!(matches!(err, CoreError::InvalidImage(_)));
        assert_eq!(emulator.running_program(), Some("Game A"));
        assert_eq!(emulator.sessions().sessions_started(), 1);
        assert!(emulator.title().contains("'Game B'"));
    }

    #[test]
    fn test_frames_reach_the_surface() {
        let mut emulator = emulator();
        let mut requester = ManualRequester::new();
        emulator
            .load_program(&catalog()[0], &build_image(1, 1, 0x11), &mut requester)
            .unwrap();

        let mut t = 0.0;
        for _ in 0..4 {
            let handle = requester.take_pending().unwrap();
            emulator.on_frame(handle, t, &mut requester).unwrap();
            t += 16.7;
        }

        assert!(emulator.presenter().frames_presented() >= 2);
        let surface = emulator.presenter().surface().unwrap();
        assert_eq!(surface.pixels().len(), emulator.geometry().byte_len());
    }

    #[test]
    fn test_focus_change_resynchronizes() {
        let mut emulator = emulator();
        let mut requester = ManualRequester::new();
        emulator
            .load_program(&catalog()[0], &build_image(1, 1, 0x11), &mut requester)
            .unwrap();

        let handle = requester.take_pending().unwrap();
        emulator.on_frame(handle, 100.0, &mut requester).unwrap();
        emulator.on_focus_changed(false);

        let handle = requester.take_pending().unwrap();
        assert_eq!(
            emulator.on_frame(handle, 5_000.0, &mut requester).unwrap(),
            TickOutcome::Baseline
        );
        assert_eq!(emulator.scheduler().anomalies(), 0);
    }

    #[test]
    fn test_autoload() {
        let mut emulator = emulator();
        emulator.request_autoload("Game B");
        assert_eq!(
            emulator.set_catalog(catalog()),
            Some(CatalogEntry::new("Game B", "b.bin"))
        );
        assert_eq!(emulator.menu().cursor(), 1);

        emulator.request_autoload("Game Z");
        assert_eq!(emulator.set_catalog(catalog()), None);
        assert!(emulator.title().contains("'Game Z' not found"));
    }

    #[test]
    fn test_screenshot_before_any_frame() {
        let mut emulator = emulator();
        assert!(matches!(emulator.screenshot(), Err(ScreenshotError::NoFrame)));
        assert_eq!(
            emulator.key_down(KEY_F9),
            KeyOutcome::Handled(HotkeyAction::Screenshot)
        );
        assert!(emulator.title().contains("Screenshot failed"));
    }

    #[test]
    fn test_stop() {
        let mut emulator = emulator();
        let mut requester = ManualRequester::new();
        emulator
            .load_program(&catalog()[0], &build_image(1, 1, 0x11), &mut requester)
            .unwrap();

        emulator.stop(&mut requester);
        assert_eq!(emulator.scheduler().state(), SchedulerState::Idle);
        assert!(requester.pending().is_none());
    }

    #[test]
    fn test_shutdown_releases_session() {
        let mut emulator = emulator();
        let mut requester = ManualRequester::new();
        emulator
            .load_program(&catalog()[0], &build_image(1, 1, 0x11), &mut requester)
            .unwrap();

        emulator.shutdown(&mut requester);
        assert_eq!(emulator.scheduler().state(), SchedulerState::Idle);
        assert!(!emulator.sessions().has_session());
        assert!(emulator.running_program().is_none());
        assert_eq!(emulator.key_down(KEY_X), KeyOutcome::Ignored);
    }
}
