// Machine module - Interface to the emulation core
//
// The front end never looks inside the emulation core. It only constructs
// sessions from program images, advances them by wall-clock time, reads their
// pixel buffers and forwards key codes. Everything behind these two traits
// (CPU, PPU, APU, mappers, cycle timing) belongs to the core.

pub mod reference;

pub use reference::ReferenceCore;

use std::fmt;

/// Errors reported by an emulation core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The program bytes are not a well-formed image for this core
    InvalidImage(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidImage(reason) => write!(f, "Invalid program image: {}", reason),
        }
    }
}

impl std::error::Error for CoreError {}

/// Fixed output size of an emulation core
///
/// Queried once at start-up. It is a property of the core, not of a session,
/// and never changes for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl FrameGeometry {
    /// Bytes per RGBA8 pixel
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Create a new geometry
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels in one frame
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Exact byte length of one RGBA8 frame (`width * height * 4`)
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * Self::BYTES_PER_PIXEL
    }

    /// Byte length of one row of pixels
    pub fn row_len(&self) -> usize {
        self.width as usize * Self::BYTES_PER_PIXEL
    }
}

/// One running instance of the emulation core, bound to a program image
pub trait Session {
    /// Advance emulated time by `microseconds`
    ///
    /// Returns `true` if a new frame became ready during this call. The pixel
    /// buffer may be overwritten in place.
    fn advance(&mut self, microseconds: u32) -> bool;

    /// The current RGBA8 pixel buffer, `width * height * 4` bytes, top row first
    ///
    /// Valid until the next call to [`Session::advance`].
    fn frame_buffer(&self) -> &[u8];

    /// A key identified by its virtual key code was pressed
    fn key_down(&mut self, code: u32);

    /// A key identified by its virtual key code was released
    fn key_up(&mut self, code: u32);
}

/// Factory for sessions, plus the constant properties of the core
pub trait EmulationCore {
    /// Frame width in pixels
    fn frame_width(&self) -> u32;

    /// Frame height in pixels
    fn frame_height(&self) -> u32;

    /// Create a new session from a program image
    ///
    /// # Errors
    /// [`CoreError::InvalidImage`] if `image` cannot be parsed
    fn new_session(&self, image: &[u8]) -> Result<Box<dyn Session>, CoreError>;
}
