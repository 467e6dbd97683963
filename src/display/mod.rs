// Display module - Presents session frames in a window
//
// This module provides:
// - Read-only views of a session's RGBA8 frame buffer
// - The frame presenter (copy, row-order fix-up, redraw on resize)
// - Presentation surfaces (pixels window, in-memory)
// - The winit host window and event loop

pub mod presenter;
pub mod surface;
pub mod view;
pub mod window;

pub use presenter::{FrameBufferPresenter, PresentError};
pub use surface::{MemorySurface, PixelsSurface, PresentationSurface, SurfaceOrigin};
pub use view::FrameBufferView;
pub use window::{run_frontend, FrontendEvent, FrontendWindow, WindowConfig, WindowFrameRequester};
