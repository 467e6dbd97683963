// Catalog menu - keyboard-driven program selection
//
// Holds the catalog entries and a cursor. The window title shows the status
// line; hotkeys move the cursor and load the selected entry.

use super::CatalogEntry;

/// Selectable list of catalog entries
#[derive(Debug, Clone, Default)]
pub struct CatalogMenu {
    entries: Vec<CatalogEntry>,
    cursor: usize,
}

impl CatalogMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entries and move the cursor to the first one
    pub fn set_entries(&mut self, entries: Vec<CatalogEntry>) {
        self.entries = entries;
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Index of the selected entry
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The entry under the cursor, if the menu is not empty
    pub fn selected(&self) -> Option<&CatalogEntry> {
        self.entries.get(self.cursor)
    }

    /// Move the cursor down, wrapping to the top
    pub fn select_next(&mut self) -> Option<&CatalogEntry> {
        if !self.entries.is_empty() {
            self.cursor = (self.cursor + 1) % self.entries.len();
        }
        self.selected()
    }

    /// Move the cursor up, wrapping to the bottom
    pub fn select_previous(&mut self) -> Option<&CatalogEntry> {
        if !self.entries.is_empty() {
            self.cursor = (self.cursor + self.entries.len() - 1) % self.entries.len();
        }
        self.selected()
    }

    /// Move the cursor to the entry named `name`
    pub fn find(&mut self, name: &str) -> Option<&CatalogEntry> {
        let index = self.entries.iter().position(|entry| entry.name == name)?;
        self.cursor = index;
        self.selected()
    }

    /// One-line description of the selection, e.g. `[2/5] Game B`
    pub fn status_line(&self) -> String {
        match self.selected() {
            Some(entry) => format!("[{}/{}] {}", self.cursor + 1, self.entries.len(), entry.name),
            None => "No programs".to_string(),
        }
    }
}
