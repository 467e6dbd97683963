// Reference core - a pattern table viewer behind the core interface
//
// Accepts iNES images and renders their 2bpp tile data as a scrolling
// 32x30 tile grid, paced by the NTSC CPU clock: a frame completes every
// 29,781 CPU cycles of emulated time. The controller pans the view and
// switches colors, so input routing is visible on screen.

pub mod framebuffer;
pub mod image;
pub mod palette;

pub use framebuffer::{IndexedFrame, SCREEN_HEIGHT, SCREEN_SIZE, SCREEN_WIDTH};
pub use image::ProgramImage;

use super::{CoreError, EmulationCore, Session};
use crate::input::keycode::{
    KEY_DOWN, KEY_ENTER, KEY_LEFT, KEY_RIGHT, KEY_SPACE, KEY_UP, KEY_X, KEY_Z,
};

/// NTSC CPU clock in Hz
pub const CPU_FREQUENCY_HZ: u64 = 1_789_773;

/// CPU cycles emulated per microsecond of wall-clock time (rounded up)
pub const CYCLES_PER_MICROSECOND: u64 = CPU_FREQUENCY_HZ / 1_000_000 + 1;

/// CPU cycles per video frame
pub const CYCLES_PER_FRAME: u64 = 29_781;

/// Bytes per 8x8 2bpp tile
const TILE_BYTES: usize = 16;

/// Tiles per pattern table
const TILES_PER_TABLE: usize = 256;

/// Tile grid columns
const GRID_COLUMNS: usize = SCREEN_WIDTH / 8;

/// Controller buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

impl Button {
    /// Default keyboard binding
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            KEY_X => Some(Button::A),
            KEY_Z => Some(Button::B),
            KEY_SPACE => Some(Button::Select),
            KEY_ENTER => Some(Button::Start),
            KEY_UP => Some(Button::Up),
            KEY_DOWN => Some(Button::Down),
            KEY_LEFT => Some(Button::Left),
            KEY_RIGHT => Some(Button::Right),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Button::A => 0x01,
            Button::B => 0x02,
            Button::Select => 0x04,
            Button::Start => 0x08,
            Button::Up => 0x10,
            Button::Down => 0x20,
            Button::Left => 0x40,
            Button::Right => 0x80,
        }
    }
}

/// Core that creates [`ReferenceSession`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceCore;

impl ReferenceCore {
    pub fn new() -> Self {
        Self
    }
}

impl EmulationCore for ReferenceCore {
    fn frame_width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn frame_height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn new_session(&self, image: &[u8]) -> Result<Box<dyn Session>, CoreError> {
        let image = ProgramImage::parse(image)?;
        if image.mapper != 0 {
            log::warn!("Mapper {} images are shown without bank switching", image.mapper);
        }
        Ok(Box::new(ReferenceSession::new(image)))
    }
}

/// One running pattern viewer
pub struct ReferenceSession {
    image: ProgramImage,
    emulated_cycles: u64,
    next_frame_at: u64,
    frame_count: u64,
    buttons: u8,
    scroll_x: usize,
    scroll_y: usize,
    hue: u8,
    table_offset: usize,
    frame: IndexedFrame,
    rgba: Vec<u8>,
}

impl ReferenceSession {
    /// Create a session for a parsed image
    pub fn new(image: ProgramImage) -> Self {
        let mut session = Self {
            image,
            emulated_cycles: 0,
            next_frame_at: CYCLES_PER_FRAME,
            frame_count: 0,
            buttons: 0,
            scroll_x: 0,
            scroll_y: 0,
            hue: 0,
            table_offset: 0,
            frame: IndexedFrame::new(),
            rgba: vec![0; SCREEN_SIZE * 4],
        };
        session.render();
        session
    }

    /// Total emulated CPU cycles
    pub fn emulated_cycles(&self) -> u64 {
        self.emulated_cycles
    }

    /// Number of completed frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Current scroll position in pixels
    pub fn scroll(&self) -> (usize, usize) {
        (self.scroll_x, self.scroll_y)
    }

    /// Whether a button is currently held
    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons & button.bit() != 0
    }

    /// Index of the current sub-palette hue
    pub fn hue(&self) -> u8 {
        self.hue
    }

    /// First tile shown in the top-left grid cell
    pub fn table_offset(&self) -> usize {
        self.table_offset
    }

    fn tile_count(&self) -> usize {
        (self.image.pattern_data().len() / TILE_BYTES).max(1)
    }

    /// Edge-triggered actions
    fn on_press(&mut self, button: Button) {
        match button {
            Button::A => self.hue = (self.hue + 1) % palette::HUE_COUNT,
            Button::B => {
                self.table_offset = (self.table_offset + TILES_PER_TABLE) % self.tile_count();
            }
            Button::Start => {
                self.scroll_x = 0;
                self.scroll_y = 0;
            }
            Button::Select => {
                self.hue = (self.hue + palette::HUE_COUNT - 1) % palette::HUE_COUNT;
            }
            Button::Up | Button::Down | Button::Left | Button::Right => {}
        }
    }

    /// Per-frame state update (held D-pad pans one pixel per frame)
    fn step_frame(&mut self) {
        if self.is_pressed(Button::Up) {
            self.scroll_y = (self.scroll_y + SCREEN_HEIGHT - 1) % SCREEN_HEIGHT;
        }
        if self.is_pressed(Button::Down) {
            self.scroll_y = (self.scroll_y + 1) % SCREEN_HEIGHT;
        }
        if self.is_pressed(Button::Left) {
            self.scroll_x = (self.scroll_x + SCREEN_WIDTH - 1) % SCREEN_WIDTH;
        }
        if self.is_pressed(Button::Right) {
            self.scroll_x = (self.scroll_x + 1) % SCREEN_WIDTH;
        }
        self.frame_count += 1;
    }

    fn render(&mut self) {
        let colors = palette::sub_palette(self.hue);
        let tiles = self.image.pattern_data();
        let tile_count = (tiles.len() / TILE_BYTES).max(1);

        for y in 0..SCREEN_HEIGHT {
            let ty = (y + self.scroll_y) % SCREEN_HEIGHT;
            for x in 0..SCREEN_WIDTH {
                let tx = (x + self.scroll_x) % SCREEN_WIDTH;
                let cell = (ty / 8) * GRID_COLUMNS + tx / 8;
                let tile = (cell + self.table_offset) % tile_count;
                let base = tile * TILE_BYTES + ty % 8;
                let bit = 7 - (tx % 8);

                let lo = tiles.get(base).copied().unwrap_or(0);
                let hi = tiles.get(base + 8).copied().unwrap_or(0);
                let value = ((hi >> bit) & 1) << 1 | ((lo >> bit) & 1);

                self.frame.set_pixel(x, y, colors[value as usize]);
            }
        }

        self.frame.write_rgba(&mut self.rgba);
    }
}

impl Session for ReferenceSession {
    fn advance(&mut self, microseconds: u32) -> bool {
        let target_cycles = self.emulated_cycles + microseconds as u64 * CYCLES_PER_MICROSECOND;

        let mut frame_rendered = false;
        while self.next_frame_at <= target_cycles {
            self.next_frame_at += CYCLES_PER_FRAME;
            self.step_frame();
            frame_rendered = true;
        }
        self.emulated_cycles = target_cycles;

        if frame_rendered {
            self.render();
        }

        frame_rendered
    }

    fn frame_buffer(&self) -> &[u8] {
        &self.rgba
    }

    fn key_down(&mut self, code: u32) {
        if let Some(button) = Button::from_key_code(code) {
            let was_pressed = self.is_pressed(button);
            self.buttons |= button.bit();
            if !was_pressed {
                self.on_press(button);
            }
        }
    }

    fn key_up(&mut self, code: u32) {
        if let Some(button) = Button::from_key_code(code) {
            self.buttons &= !button.bit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::image::build_image;
    use super::*;

    fn session() -> ReferenceSession {
        ReferenceSession::new(ProgramImage::parse(&build_image(1, 1, 0xFF)).unwrap())
    }

    #[test]
    fn test_core_geometry() {
        let core = ReferenceCore::new();
        assert_eq!(core.frame_width(), 256);
        assert_eq!(core.frame_height(), 240);
    }

    #[test]
    fn test_new_session_rejects_garbage() {
        let core = ReferenceCore::new();
        assert!(matches!(
            core.new_session(b"not a rom"),
            Err(CoreError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_frame_buffer_length() {
        let core = ReferenceCore::new();
        let session = core.new_session(&build_image(1, 0, 0)).unwrap();
        assert_eq!(session.frame_buffer().len(), 256 * 240 * 4);
    }

    #[test]
    fn test_cycles_per_microsecond() {
        assert_eq!(CYCLES_PER_MICROSECOND, 2);
    }

    #[test]
    fn test_short_advance_has_no_frame() {
        let mut session = session();
        assert!(!session.advance(1_000));
        assert_eq!(session.emulated_cycles(), 2_000);
        assert_eq!(session.frame_count(), 0);
    }

    #[test]
    fn test_frame_ready_after_frame_period() {
        let mut session = session();
        // 16,666 us = 33,332 cycles, past the first frame boundary
        assert!(session.advance(16_666));
        assert_eq!(session.frame_count(), 1);

        // Accumulates across calls
        assert!(!session.advance(10_000));
        assert!(session.advance(10_000));
        assert_eq!(session.frame_count(), 2);
    }

    #[test]
    fn test_long_advance_completes_several_frames() {
        let mut session = session();
        assert!(session.advance(34_999));
        assert_eq!(session.frame_count(), 2);
    }

    #[test]
    fn test_all_ones_tiles_use_darkest_shade() {
        let session = session();
        let expected = palette::rgba(palette::sub_palette(0)[3]);
        assert_eq!(&session.frame_buffer()[0..4], &expected);
    }

    #[test]
    fn test_dpad_scrolls_per_frame() {
        let mut session = session();
        session.key_down(KEY_RIGHT);
        session.key_down(KEY_DOWN);
        session.advance(16_666);
        assert_eq!(session.scroll(), (1, 1));

        session.key_up(KEY_RIGHT);
        session.key_up(KEY_DOWN);
        session.key_down(KEY_LEFT);
        session.key_down(KEY_UP);
        session.advance(16_666);
        session.advance(16_666);
        assert_eq!(session.scroll(), (255, 239));
    }

    #[test]
    fn test_start_resets_scroll() {
        let mut session = session();
        session.key_down(KEY_RIGHT);
        session.advance(16_666);
        session.key_down(KEY_ENTER);
        assert_eq!(session.scroll(), (0, 0));
    }

    #[test]
    fn test_key_repeat_is_edge_triggered() {
        let mut session = session();
        session.key_down(KEY_X);
        session.key_down(KEY_X);
        session.key_down(KEY_X);
        assert_eq!(session.hue(), 1);
        assert!(session.is_pressed(Button::A));

        session.key_up(KEY_X);
        assert!(!session.is_pressed(Button::A));
        session.key_down(KEY_X);
        assert_eq!(session.hue(), 2);
    }

    #[test]
    fn test_select_cycles_hue_backwards() {
        let mut session = session();
        session.key_down(KEY_SPACE);
        assert_eq!(session.hue(), palette::HUE_COUNT - 1);
    }

    #[test]
    fn test_b_switches_pattern_table() {
        let mut session = session();
        session.key_down(KEY_Z);
        assert_eq!(session.table_offset(), 256);
        session.key_up(KEY_Z);
        session.key_down(KEY_Z);
        // 8 KiB CHR = 512 tiles, wraps back to the first table
        assert_eq!(session.table_offset(), 0);
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        let mut session = session();
        session.key_down(0xFFFF);
        session.key_up(0xFFFF);
        assert_eq!(session.hue(), 0);
    }
}
