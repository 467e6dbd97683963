// Hotkey configuration
//
// Frontend hotkeys are stored as winit `KeyCode` names (e.g. "PageDown") in
// the `[hotkeys]` section of the configuration file and resolved to virtual
// key codes at start-up.

use super::keycode::{parse_key_name, virtual_key_code};
use serde::{Deserialize, Serialize};
use winit::keyboard::PhysicalKey;

/// Action bound to a frontend hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Move the catalog cursor down
    SelectNext,
    /// Move the catalog cursor up
    SelectPrevious,
    /// Fetch and run the selected catalog entry
    LoadSelected,
    /// Save the last presented frame as PNG
    Screenshot,
}

/// Serializable hotkey bindings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Key for moving to the next catalog entry
    pub select_next: String,
    /// Key for moving to the previous catalog entry
    pub select_previous: String,
    /// Key for loading the selected entry
    pub load_selected: String,
    /// Key for taking a screenshot
    pub screenshot: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            select_next: "PageDown".to_string(),
            select_previous: "PageUp".to_string(),
            load_selected: "F1".to_string(),
            screenshot: "F9".to_string(),
        }
    }
}

impl HotkeyConfig {
    /// Resolve key names into virtual key codes
    ///
    /// # Returns
    /// Result containing Hotkeys or error message naming the bad key
    pub fn to_hotkeys(&self) -> Result<Hotkeys, String> {
        Ok(Hotkeys {
            select_next: resolve(&self.select_next)?,
            select_previous: resolve(&self.select_previous)?,
            load_selected: resolve(&self.load_selected)?,
            screenshot: resolve(&self.screenshot)?,
        })
    }
}

fn resolve(name: &str) -> Result<u32, String> {
    let key = parse_key_name(name)?;
    virtual_key_code(PhysicalKey::Code(key))
        .ok_or_else(|| format!("Key has no virtual key code: {}", name))
}

/// Resolved hotkey bindings (virtual key codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkeys {
    pub select_next: u32,
    pub select_previous: u32,
    pub load_selected: u32,
    pub screenshot: u32,
}

impl Hotkeys {
    /// Action bound to `code`, if any
    pub fn action_for(&self, code: u32) -> Option<HotkeyAction> {
        if code == self.select_next {
            Some(HotkeyAction::SelectNext)
        } else if code == self.select_previous {
            Some(HotkeyAction::SelectPrevious)
        } else if code == self.load_selected {
            Some(HotkeyAction::LoadSelected)
        } else if code == self.screenshot {
            Some(HotkeyAction::Screenshot)
        } else {
            None
        }
    }
}

impl Default for Hotkeys {
    fn default() -> Self {
        use super::keycode::{KEY_F1, KEY_F9, KEY_PAGE_DOWN, KEY_PAGE_UP};

        Self {
            select_next: KEY_PAGE_DOWN,
            select_previous: KEY_PAGE_UP,
            load_selected: KEY_F1,
            screenshot: KEY_F9,
        }
    }
}
