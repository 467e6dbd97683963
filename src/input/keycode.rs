// Key code translation
//
// Sessions receive integer virtual key codes (the classic Windows/DOM keyCode
// numbering: Enter = 13, Space = 32, arrows = 37-40, letters = 65-90).
// This module converts winit physical keys into those codes and parses key
// names used in the configuration file.

use winit::keyboard::{KeyCode, PhysicalKey};

pub const KEY_BACKSPACE: u32 = 8;
pub const KEY_TAB: u32 = 9;
pub const KEY_ENTER: u32 = 13;
pub const KEY_SHIFT: u32 = 16;
pub const KEY_CONTROL: u32 = 17;
pub const KEY_ALT: u32 = 18;
pub const KEY_ESCAPE: u32 = 27;
pub const KEY_SPACE: u32 = 32;
pub const KEY_PAGE_UP: u32 = 33;
pub const KEY_PAGE_DOWN: u32 = 34;
pub const KEY_END: u32 = 35;
pub const KEY_HOME: u32 = 36;
pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;
pub const KEY_INSERT: u32 = 45;
pub const KEY_DELETE: u32 = 46;
pub const KEY_0: u32 = 48;
pub const KEY_A: u32 = 65;
pub const KEY_X: u32 = 88;
pub const KEY_Z: u32 = 90;
pub const KEY_F1: u32 = 112;
pub const KEY_F9: u32 = 120;

/// Translate a physical key into a virtual key code
///
/// Returns `None` for keys without a code (media keys, unidentified keys).
pub fn virtual_key_code(physical_key: PhysicalKey) -> Option<u32> {
    match physical_key {
        PhysicalKey::Code(code) => key_code_to_virtual(code),
        PhysicalKey::Unidentified(_) => None,
    }
}

fn key_code_to_virtual(code: KeyCode) -> Option<u32> {
    let letter = |offset: u32| Some(KEY_A + offset);
    let digit = |offset: u32| Some(KEY_0 + offset);
    let function = |offset: u32| Some(KEY_F1 + offset);

    match code {
        KeyCode::Backspace => Some(KEY_BACKSPACE),
        KeyCode::Tab => Some(KEY_TAB),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(KEY_ENTER),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(KEY_SHIFT),
        KeyCode::ControlLeft | KeyCode::ControlRight => Some(KEY_CONTROL),
        KeyCode::AltLeft | KeyCode::AltRight => Some(KEY_ALT),
        KeyCode::Escape => Some(KEY_ESCAPE),
        KeyCode::Space => Some(KEY_SPACE),
        KeyCode::PageUp => Some(KEY_PAGE_UP),
        KeyCode::PageDown => Some(KEY_PAGE_DOWN),
        KeyCode::End => Some(KEY_END),
        KeyCode::Home => Some(KEY_HOME),
        KeyCode::ArrowLeft => Some(KEY_LEFT),
        KeyCode::ArrowUp => Some(KEY_UP),
        KeyCode::ArrowRight => Some(KEY_RIGHT),
        KeyCode::ArrowDown => Some(KEY_DOWN),
        KeyCode::Insert => Some(KEY_INSERT),
        KeyCode::Delete => Some(KEY_DELETE),
        KeyCode::Digit0 => digit(0),
        KeyCode::Digit1 => digit(1),
        KeyCode::Digit2 => digit(2),
        KeyCode::Digit3 => digit(3),
        KeyCode::Digit4 => digit(4),
        KeyCode::Digit5 => digit(5),
        KeyCode::Digit6 => digit(6),
        KeyCode::Digit7 => digit(7),
        KeyCode::Digit8 => digit(8),
        KeyCode::Digit9 => digit(9),
        KeyCode::KeyA => letter(0),
        KeyCode::KeyB => letter(1),
        KeyCode::KeyC => letter(2),
        KeyCode::KeyD => letter(3),
        KeyCode::KeyE => letter(4),
        KeyCode::KeyF => letter(5),
        KeyCode::KeyG => letter(6),
        KeyCode::KeyH => letter(7),
        KeyCode::KeyI => letter(8),
        KeyCode::KeyJ => letter(9),
        KeyCode::KeyK => letter(10),
        KeyCode::KeyL => letter(11),
        KeyCode::KeyM => letter(12),
        KeyCode::KeyN => letter(13),
        KeyCode::KeyO => letter(14),
        KeyCode::KeyP => letter(15),
        KeyCode::KeyQ => letter(16),
        KeyCode::KeyR => letter(17),
        KeyCode::KeyS => letter(18),
        KeyCode::KeyT => letter(19),
        KeyCode::KeyU => letter(20),
        KeyCode::KeyV => letter(21),
        KeyCode::KeyW => letter(22),
        KeyCode::KeyX => letter(23),
        KeyCode::KeyY => letter(24),
        KeyCode::KeyZ => letter(25),
        KeyCode::F1 => function(0),
        KeyCode::F2 => function(1),
        KeyCode::F3 => function(2),
        KeyCode::F4 => function(3),
        KeyCode::F5 => function(4),
        KeyCode::F6 => function(5),
        KeyCode::F7 => function(6),
        KeyCode::F8 => function(7),
        KeyCode::F9 => function(8),
        KeyCode::F10 => function(9),
        KeyCode::F11 => function(10),
        KeyCode::F12 => function(11),
        _ => None,
    }
}

/// Parse a key name as written in the configuration file (e.g. "F9", "PageDown")
///
/// Names follow winit's `KeyCode` variant names.
pub fn parse_key_name(name: &str) -> Result<KeyCode, String> {
    match name {
        "KeyA" => Ok(KeyCode::KeyA),
        "KeyB" => Ok(KeyCode::KeyB),
        "KeyC" => Ok(KeyCode::KeyC),
        "KeyD" => Ok(KeyCode::KeyD),
        "KeyE" => Ok(KeyCode::KeyE),
        "KeyF" => Ok(KeyCode::KeyF),
        "KeyG" => Ok(KeyCode::KeyG),
        "KeyH" => Ok(KeyCode::KeyH),
        "KeyI" => Ok(KeyCode::KeyI),
        "KeyJ" => Ok(KeyCode::KeyJ),
        "KeyK" => Ok(KeyCode::KeyK),
        "KeyL" => Ok(KeyCode::KeyL),
        "KeyM" => Ok(KeyCode::KeyM),
        "KeyN" => Ok(KeyCode::KeyN),
        "KeyO" => Ok(KeyCode::KeyO),
        "KeyP" => Ok(KeyCode::KeyP),
        "KeyQ" => Ok(KeyCode::KeyQ),
        "KeyR" => Ok(KeyCode::KeyR),
        "KeyS" => Ok(KeyCode::KeyS),
        "KeyT" => Ok(KeyCode::KeyT),
        "KeyU" => Ok(KeyCode::KeyU),
        "KeyV" => Ok(KeyCode::KeyV),
        "KeyW" => Ok(KeyCode::KeyW),
        "KeyX" => Ok(KeyCode::KeyX),
        "KeyY" => Ok(KeyCode::KeyY),
        "KeyZ" => Ok(KeyCode::KeyZ),
        "F1" => Ok(KeyCode::F1),
        "F2" => Ok(KeyCode::F2),
        "F3" => Ok(KeyCode::F3),
        "F4" => Ok(KeyCode::F4),
        "F5" => Ok(KeyCode::F5),
        "F6" => Ok(KeyCode::F6),
        "F7" => Ok(KeyCode::F7),
        "F8" => Ok(KeyCode::F8),
        "F9" => Ok(KeyCode::F9),
        "F10" => Ok(KeyCode::F10),
        "F11" => Ok(KeyCode::F11),
        "F12" => Ok(KeyCode::F12),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "Insert" => Ok(KeyCode::Insert),
        "Delete" => Ok(KeyCode::Delete),
        "Tab" => Ok(KeyCode::Tab),
        "Escape" => Ok(KeyCode::Escape),
        "Backspace" => Ok(KeyCode::Backspace),
        "Enter" => Ok(KeyCode::Enter),
        "Space" => Ok(KeyCode::Space),
        "ArrowUp" => Ok(KeyCode::ArrowUp),
        "ArrowDown" => Ok(KeyCode::ArrowDown),
        "ArrowLeft" => Ok(KeyCode::ArrowLeft),
        "ArrowRight" => Ok(KeyCode::ArrowRight),
        _ => Err(format!("Unknown key name: {}", name)),
    }
}
