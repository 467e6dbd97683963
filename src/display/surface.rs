// Presentation surfaces
//
// The presenter writes RGBA8 frames into a surface-owned buffer and asks the
// surface to render it. `PixelsSurface` drives a real window through the
// pixels crate; `MemorySurface` keeps everything in memory for headless runs,
// tests and benchmarks.

use super::presenter::PresentError;
use crate::machine::FrameGeometry;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use std::sync::Arc;
use winit::window::Window;

/// Where row zero of the surface's buffer is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOrigin {
    /// Row zero is the top of the screen
    TopLeft,
    /// Row zero is the bottom of the screen (GL texture convention)
    BottomLeft,
}

/// A target the presenter can upload frames to
pub trait PresentationSurface {
    /// Row order convention of [`PresentationSurface::frame_mut`]
    fn origin(&self) -> SurfaceOrigin;

    /// Buffer of exactly `width * height * 4` bytes for the next render
    fn frame_mut(&mut self) -> &mut [u8];

    /// Display the buffer
    fn render(&mut self) -> Result<(), PresentError>;

    /// The window was resized to `width` x `height` physical pixels
    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError>;
}

/// Window surface backed by `pixels`
///
/// pixels scales the frame by the largest integer factor that fits the window
/// and letterboxes the rest, so the aspect ratio is preserved on resize.
pub struct PixelsSurface {
    pixels: Pixels<'static>,
}

impl PixelsSurface {
    /// Create a surface covering the whole window
    pub fn new(
        window: Arc<Window>,
        geometry: FrameGeometry,
        vsync: bool,
    ) -> Result<Self, PresentError> {
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, window);
        let pixels = PixelsBuilder::new(geometry.width, geometry.height, surface_texture)
            .enable_vsync(vsync)
            .build()
            .map_err(|e| PresentError::Surface(e.to_string()))?;

        Ok(Self { pixels })
    }
}

impl PresentationSurface for PixelsSurface {
    fn origin(&self) -> SurfaceOrigin {
        SurfaceOrigin::TopLeft
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        self.pixels.frame_mut()
    }

    fn render(&mut self) -> Result<(), PresentError> {
        self.pixels
            .render()
            .map_err(|e| PresentError::Render(e.to_string()))
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        self.pixels
            .resize_surface(width, height)
            .map_err(|e| PresentError::Surface(e.to_string()))
    }
}

/// In-memory surface
pub struct MemorySurface {
    origin: SurfaceOrigin,
    pixels: Vec<u8>,
    window_size: (u32, u32),
    render_count: u64,
}

impl MemorySurface {
    pub fn new(geometry: FrameGeometry, origin: SurfaceOrigin) -> Self {
        Self {
            origin,
            pixels: vec![0; geometry.byte_len()],
            window_size: (geometry.width, geometry.height),
            render_count: 0,
        }
    }

    /// Buffer contents as last uploaded
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Number of `render` calls
    pub fn render_count(&self) -> u64 {
        self.render_count
    }
}

impl PresentationSurface for MemorySurface {
    fn origin(&self) -> SurfaceOrigin {
        self.origin
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    fn render(&mut self) -> Result<(), PresentError> {
        self.render_count += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        self.window_size = (width, height);
        Ok(())
    }
}
