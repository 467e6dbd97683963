// Frame buffer presenter
//
// Copies a ready frame out of the session and onto the presentation surface.
// The copy finishes before `present` returns, so the session is free to
// overwrite its buffer on the next advance.

use super::surface::{PresentationSurface, SurfaceOrigin};
use super::view::FrameBufferView;
use crate::machine::FrameGeometry;
use std::fmt;

/// Errors raised while presenting a frame
#[derive(Debug)]
pub enum PresentError {
    /// The session's buffer is not `width * height * 4` bytes
    SizeMismatch { expected: usize, actual: usize },

    /// The surface failed to render
    Render(String),

    /// The surface could not be resized
    Surface(String),
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentError::SizeMismatch { expected, actual } => write!(
                f,
                "Frame buffer size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
            PresentError::Render(e) => write!(f, "Render error: {}", e),
            PresentError::Surface(e) => write!(f, "Surface error: {}", e),
        }
    }
}

impl std::error::Error for PresentError {}

/// Presents session frames on a [`PresentationSurface`]
pub struct FrameBufferPresenter<S: PresentationSurface> {
    geometry: FrameGeometry,
    surface: Option<S>,
    /// Copy of the last presented frame, top row first
    last_frame: Vec<u8>,
    frames_presented: u64,
}

impl<S: PresentationSurface> FrameBufferPresenter<S> {
    /// Create a presenter without a surface
    ///
    /// Windowed hosts attach the surface once the window exists.
    pub fn new(geometry: FrameGeometry) -> Self {
        Self {
            geometry,
            surface: None,
            last_frame: Vec::new(),
            frames_presented: 0,
        }
    }

    /// Create a presenter with a surface attached
    pub fn with_surface(geometry: FrameGeometry, surface: S) -> Self {
        let mut presenter = Self::new(geometry);
        presenter.surface = Some(surface);
        presenter
    }

    /// Attach (or replace) the presentation surface
    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Number of frames presented so far
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// The last presented frame (RGBA8, top row first), if any
    pub fn last_frame(&self) -> Option<&[u8]> {
        if self.last_frame.is_empty() {
            None
        } else {
            Some(&self.last_frame)
        }
    }

    /// Present one frame
    ///
    /// # Errors
    /// [`PresentError::SizeMismatch`] if the view does not match the core's
    /// geometry, or the surface's render error.
    pub fn present(&mut self, view: FrameBufferView<'_>) -> Result<(), PresentError> {
        if view.geometry() != self.geometry {
            return Err(PresentError::SizeMismatch {
                expected: self.geometry.byte_len(),
                actual: view.as_bytes().len(),
            });
        }

        self.last_frame.clear();
        self.last_frame.extend_from_slice(view.as_bytes());
        self.frames_presented += 1;

        self.draw()
    }

    /// Resize the surface and redraw the last frame
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentError> {
        if width == 0 || height == 0 {
            // Minimized
            return Ok(());
        }

        if let Some(surface) = &mut self.surface {
            surface.resize(width, height)?;
        }
        self.draw()
    }

    /// Upload the retained frame to the surface and render it
    pub fn draw(&mut self) -> Result<(), PresentError> {
        let Some(surface) = &mut self.surface else {
            return Ok(());
        };

        if self.last_frame.len() == self.geometry.byte_len() {
            let origin = surface.origin();
            upload_rows(
                &self.last_frame,
                surface.frame_mut(),
                self.geometry.row_len(),
                origin,
            )?;
        }

        surface.render()
    }
}

/// Copy `src` into `dst` row by row, reversing row order for bottom-left surfaces
pub fn upload_rows(
    src: &[u8],
    dst: &mut [u8],
    row_len: usize,
    origin: SurfaceOrigin,
) -> Result<(), PresentError> {
    if dst.len() != src.len() {
        return Err(PresentError::SizeMismatch {
            expected: src.len(),
            actual: dst.len(),
        });
    }

    match origin {
        SurfaceOrigin::TopLeft => dst.copy_from_slice(src),
        SurfaceOrigin::BottomLeft => {
            for (dst_row, src_row) in dst
                .chunks_exact_mut(row_len)
                .zip(src.chunks_exact(row_len).rev())
            {
                dst_row.copy_from_slice(src_row);
            }
        }
    }

    Ok(())
}
