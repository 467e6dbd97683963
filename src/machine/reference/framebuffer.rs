// Indexed frame buffer for the reference core
//
// Pixels are stored as palette indices (0-63) and expanded to RGBA8 once per
// completed frame.

use super::palette;

/// Reference core screen width in pixels
pub const SCREEN_WIDTH: usize = 256;

/// Reference core screen height in pixels
pub const SCREEN_HEIGHT: usize = 240;

/// Total number of pixels
pub const SCREEN_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// Frame of palette indices
pub struct IndexedFrame {
    pixels: Vec<u8>,
}

impl IndexedFrame {
    /// Create a frame cleared to the background color
    pub fn new() -> Self {
        Self {
            pixels: vec![palette::BACKGROUND; SCREEN_SIZE],
        }
    }

    /// Set a pixel
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, palette_index: u8) {
        assert!(x < SCREEN_WIDTH, "X coordinate {} out of bounds", x);
        assert!(y < SCREEN_HEIGHT, "Y coordinate {} out of bounds", y);

        self.pixels[y * SCREEN_WIDTH + x] = palette_index & 0x3F;
    }

    /// Get a pixel
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    /// Expand into RGBA8
    ///
    /// # Panics
    /// Panics if `output` is not exactly `SCREEN_SIZE * 4` bytes
    pub fn write_rgba(&self, output: &mut [u8]) {
        assert_eq!(
            output.len(),
            SCREEN_SIZE * 4,
            "RGBA output must hold exactly one frame"
        );

        for (dst, &index) in output.chunks_exact_mut(4).zip(self.pixels.iter()) {
            dst.copy_from_slice(&palette::rgba(index));
        }
    }
}

impl Default for IndexedFrame {
    fn default() -> Self {
        Self::new()
    }
}
