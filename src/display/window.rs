// Window module - Host window and event loop
//
// Creates the winit window and pixels surface, turns redraw requests into
// scheduler ticks, and routes focus, resize and keyboard events into the
// front end. Catalog and program fetches run on worker threads and report
// back through `FrontendEvent` user events, so sessions are only ever created
// on the event loop thread.

use super::surface::PixelsSurface;
use crate::catalog::{CatalogEntry, CatalogError, FetchError, RomCatalogLoader};
use crate::emulator::{Emulator, KeyOutcome};
use crate::input::virtual_key_code;
use crate::machine::FrameGeometry;
use crate::timing::{FrameHandle, FrameRequester};
use std::error::Error;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

/// Window configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Initial scale factor (1x, 2x, 3x, 4x, etc.)
    pub scale: u32,
    /// Whether to enable VSync
    pub vsync: bool,
}

impl WindowConfig {
    /// Create a new window configuration with default values
    ///
    /// Default: 3x scale, VSync enabled
    pub fn new() -> Self {
        Self {
            scale: 3,
            vsync: true,
        }
    }

    /// Set the scale factor
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(1, 8); // Clamp between 1x and 8x
        self
    }

    /// Set VSync enabled or disabled
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Initial window size in logical pixels for a core frame size
    pub fn window_size(&self, geometry: FrameGeometry) -> (u32, u32) {
        (geometry.width * self.scale, geometry.height * self.scale)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Completion events sent from worker threads to the event loop
#[derive(Debug)]
pub enum FrontendEvent {
    /// The catalog fetch finished
    CatalogLoaded(Result<Vec<CatalogEntry>, CatalogError>),

    /// A program payload fetch finished
    ProgramFetched {
        entry: CatalogEntry,
        result: Result<Vec<u8>, FetchError>,
    },
}

/// Frame requester backed by `Window::request_redraw`
///
/// winit coalesces redraw requests and cannot withdraw one, so cancelling
/// only forgets the handle; the redraw that still arrives carries no handle.
#[derive(Debug, Default)]
pub struct WindowFrameRequester {
    window: Option<Arc<Window>>,
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl WindowFrameRequester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to the window once it exists
    pub fn set_window(&mut self, window: Arc<Window>) {
        self.window = Some(window);
        if self.pending.is_some() {
            self.request_redraw();
        }
    }

    /// Handle of the request a redraw event is serving
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl FrameRequester for WindowFrameRequester {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle::new(self.next_id);
        self.pending = Some(handle);
        self.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Fetch the catalog on a worker thread
fn spawn_catalog_fetch(loader: RomCatalogLoader, proxy: EventLoopProxy<FrontendEvent>) {
    let spawned = thread::Builder::new()
        .name("catalog-fetch".to_string())
        .spawn(move || {
            let result = loader.fetch_catalog();
            if proxy.send_event(FrontendEvent::CatalogLoaded(result)).is_err() {
                log::debug!("Event loop closed before the catalog arrived");
            }
        });

    if let Err(e) = spawned {
        log::error!("Could not start catalog fetch: {}", e);
    }
}

/// Fetch a program payload on a worker thread
fn spawn_program_fetch(
    loader: RomCatalogLoader,
    proxy: EventLoopProxy<FrontendEvent>,
    entry: CatalogEntry,
) {
    log::info!("Fetching '{}' from {}", entry.name, entry.program_path());

    let spawned = thread::Builder::new()
        .name("program-fetch".to_string())
        .spawn(move || {
            let result = loader.fetch_program(&entry);
            if proxy
                .send_event(FrontendEvent::ProgramFetched { entry, result })
                .is_err()
            {
                log::debug!("Event loop closed before the program arrived");
            }
        });

    if let Err(e) = spawned {
        log::error!("Could not start program fetch: {}", e);
    }
}

/// The host application: window, surface and front end
pub struct FrontendWindow {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    emulator: Emulator<PixelsSurface>,
    requester: WindowFrameRequester,
    loader: RomCatalogLoader,
    proxy: EventLoopProxy<FrontendEvent>,
    /// Origin of tick timestamps
    started: Instant,
    /// Error that ended the event loop
    fatal: Option<Box<dyn Error>>,
}

impl FrontendWindow {
    pub fn new(
        config: WindowConfig,
        emulator: Emulator<PixelsSurface>,
        loader: RomCatalogLoader,
        proxy: EventLoopProxy<FrontendEvent>,
    ) -> Self {
        Self {
            config,
            window: None,
            emulator,
            requester: WindowFrameRequester::new(),
            loader,
            proxy,
            started: Instant::now(),
            fatal: None,
        }
    }

    /// Milliseconds since the window was created
    fn timestamp_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn refresh_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&self.emulator.title());
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Box<dyn Error>) {
        log::error!("{}", error);
        self.emulator.stop(&mut self.requester);
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let (width, height) = self.config.window_size(self.emulator.geometry());
        let window_attributes = Window::default_attributes()
            .with_title(self.emulator.title())
            .with_inner_size(LogicalSize::new(width, height))
            .with_min_inner_size(LogicalSize::new(
                self.emulator.geometry().width,
                self.emulator.geometry().height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let surface = PixelsSurface::new(
            Arc::clone(&window),
            self.emulator.geometry(),
            self.config.vsync,
        )?;

        self.emulator.attach_surface(surface);
        self.requester.set_window(Arc::clone(&window));
        self.window = Some(window);
        self.started = Instant::now();
        Ok(())
    }

    fn handle_key(&mut self, event: KeyEvent) {
        let Some(code) = virtual_key_code(event.physical_key) else {
            return;
        };

        let outcome = match event.state {
            ElementState::Pressed => self.emulator.key_down(code),
            ElementState::Released => self.emulator.key_up(code),
        };

        match outcome {
            KeyOutcome::LoadRequested(entry) => {
                spawn_program_fetch(self.loader.clone(), self.proxy.clone(), entry);
            }
            KeyOutcome::Handled(_) => self.refresh_title(),
            KeyOutcome::Forwarded | KeyOutcome::Ignored => {}
        }
    }
}

impl ApplicationHandler<FrontendEvent> for FrontendWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        log::info!(
            "Window created ({}x{} frame, {}x scale, vsync {})",
            self.emulator.geometry().width,
            self.emulator.geometry().height,
            self.config.scale,
            self.config.vsync
        );
        spawn_catalog_fetch(self.loader.clone(), self.proxy.clone());
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                self.emulator.shutdown(&mut self.requester);
                event_loop.exit();
            }
            WindowEvent::Focused(focused) => {
                self.emulator.on_focus_changed(focused);
            }
            WindowEvent::Resized(size) => {
                if let Err(e) = self.emulator.on_resize(size.width, size.height) {
                    self.fail(event_loop, e.into());
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event);
            }
            WindowEvent::RedrawRequested => {
                let result = match self.requester.take_pending() {
                    Some(handle) => {
                        let timestamp = self.timestamp_ms();
                        self.emulator
                            .on_frame(handle, timestamp, &mut self.requester)
                            .map(|_| ())
                    }
                    // Exposed or resized without a pending tick
                    None => self.emulator.redraw(),
                };

                if let Err(e) = result {
                    self.fail(event_loop, e.into());
                }
            }
            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FrontendEvent) {
        match event {
            FrontendEvent::CatalogLoaded(Ok(entries)) => {
                if let Some(entry) = self.emulator.set_catalog(entries) {
                    spawn_program_fetch(self.loader.clone(), self.proxy.clone(), entry);
                }
            }
            FrontendEvent::CatalogLoaded(Err(e)) => {
                self.emulator.catalog_failed(&e);
            }
            FrontendEvent::ProgramFetched {
                entry,
                result: Ok(bytes),
            } => {
                // The emulator puts the error in the title; the old session keeps running
                if let Err(e) = self
                    .emulator
                    .load_program(&entry, &bytes, &mut self.requester)
                {
                    log::debug!("Kept previous session after '{}' failed: {}", entry.name, e);
                }
            }
            FrontendEvent::ProgramFetched {
                entry,
                result: Err(e),
            } => {
                self.emulator.program_fetch_failed(&entry, &e);
            }
        }
        self.refresh_title();
    }
}

/// Run the front end until the window is closed
///
/// # Arguments
/// * `config` - Window configuration
/// * `emulator` - Front end coordinator (autoload already requested, if any)
/// * `loader` - Catalog and program source
///
/// # Returns
/// Result indicating success, or the error that ended the event loop
pub fn run_frontend(
    config: WindowConfig,
    emulator: Emulator<PixelsSurface>,
    loader: RomCatalogLoader,
) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::<FrontendEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let proxy = event_loop.create_proxy();
    let mut app = FrontendWindow::new(config, emulator, loader, proxy);

    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_config_defaults() {
        let config = WindowConfig::new();
        assert_eq!(config.scale, 3);
        assert!(config.vsync);
    }

    #[test]
    fn test_window_config_builder() {
        let config = WindowConfig::new().with_scale(2).with_vsync(false);

        assert_eq!(config.scale, 2);
        assert!(!config.vsync);
    }

    #[test]
    fn test_window_size() {
        let config = WindowConfig::new().with_scale(2);
        assert_eq!(config.window_size(FrameGeometry::new(256, 240)), (512, 480));
    }

    #[test]
    fn test_scale_clamping() {
        let config = WindowConfig::new().with_scale(100);
        assert_eq!(config.scale, 8); // Should be clamped to max 8x

        let config = WindowConfig::new().with_scale(0);
        assert_eq!(config.scale, 1); // Should be clamped to min 1x
    }

    #[test]
    fn test_requester_without_window() {
        let mut requester = WindowFrameRequester::new();
        let a = requester.request_frame();
        let b = requester.request_frame();
        assert_ne!(a, b);

        requester.cancel_frame(a);
        assert_eq!(requester.take_pending(), Some(b));
        assert_eq!(requester.take_pending(), None);
    }
}
