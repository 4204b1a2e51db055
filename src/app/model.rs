//! Application model types: `App` and the import prompt.

use std::path::PathBuf;

use crate::library::Track;
use crate::lyrics::LyricSync;
use crate::theme::Palette;

/// Render seconds as `m:ss`. Negative or non-finite input shows `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// The main view model.
pub struct App {
    /// Catalog index under the playlist cursor.
    pub selected: usize,
    pub drawer_open: bool,
    pub filter_mode: bool,
    pub filter_query: String,
    /// Folder path being typed, while the import prompt is open.
    pub import_input: Option<String>,
    /// One-line message shown in the footer.
    pub status: Option<String>,
    pub lyrics: LyricSync,
    pub palette: Palette,
    pub current_dir: Option<PathBuf>,
    pub header_text: String,
    pub lyrics_placeholder: String,

    // Lowercased (title, artist) per catalog entry, rebuilt on import.
    search_keys: Vec<(String, String)>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            selected: 0,
            drawer_open: false,
            filter_mode: false,
            filter_query: String::new(),
            import_input: None,
            status: None,
            lyrics: LyricSync::default(),
            palette: Palette::default(),
            current_dir: None,
            header_text: String::new(),
            lyrics_placeholder: String::new(),
            search_keys: Vec::new(),
        }
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild search keys after the catalog was replaced.
    pub fn set_catalog(&mut self, tracks: &[Track]) {
        self.search_keys = tracks
            .iter()
            .map(|t| (t.title.to_lowercase(), t.artist.to_lowercase()))
            .collect();
        self.ensure_selected_visible();
    }

    pub fn track_count(&self) -> usize {
        self.search_keys.len()
    }

    /// Catalog indices that match the search query, in catalog order.
    pub fn visible_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim().to_lowercase();
        if query.is_empty() {
            return (0..self.search_keys.len()).collect();
        }
        self.search_keys
            .iter()
            .enumerate()
            .filter(|(_, (title, artist))| title.contains(&query) || artist.contains(&query))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn toggle_drawer(&mut self) {
        self.drawer_open = !self.drawer_open;
        if !self.drawer_open {
            self.filter_mode = false;
        }
    }

    /// Move the cursor onto `index` if it is visible, e.g. the playing track.
    pub fn follow(&mut self, index: usize) {
        if self.visible_indices().contains(&index) {
            self.selected = index;
        }
    }

    /// Enter filter mode: typing now edits the search query.
    pub fn enter_filter_mode(&mut self) {
        self.drawer_open = true;
        self.filter_mode = true;
        self.ensure_selected_visible();
    }

    /// Stop editing the query; the filter stays applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    /// Clear the active filter and restore selection visibility.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Ensure that `selected` is part of the filtered view, otherwise move
    /// the cursor to the first visible track.
    fn ensure_selected_visible(&mut self) {
        let display = self.visible_indices();
        match display.first() {
            None => self.selected = 0,
            Some(&first) if !display.contains(&self.selected) => self.selected = first,
            Some(_) => {}
        }
    }

    /// Move the cursor to the next visible track, wrapping.
    pub fn next(&mut self) {
        let display = self.visible_indices();
        if display.is_empty() {
            return;
        }
        self.selected = match display.iter().position(|&i| i == self.selected) {
            Some(p) => display[(p + 1) % display.len()],
            None => display[0],
        };
    }

    /// Move the cursor to the previous visible track, wrapping.
    pub fn prev(&mut self) {
        let display = self.visible_indices();
        if display.is_empty() {
            return;
        }
        self.selected = match display.iter().position(|&i| i == self.selected) {
            Some(0) | None => display[display.len() - 1],
            Some(p) => display[p - 1],
        };
    }

    /// Catalog index under the cursor, if any track is visible.
    pub fn selected_visible(&self) -> Option<usize> {
        self.visible_indices()
            .contains(&self.selected)
            .then_some(self.selected)
    }

    pub fn is_importing(&self) -> bool {
        self.import_input.is_some()
    }

    /// Open the import prompt, pre-filled with the current folder.
    pub fn open_import(&mut self) {
        let prefill = self
            .current_dir
            .as_ref()
            .map(|d| d.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.import_input = Some(prefill);
    }

    pub fn push_import_char(&mut self, c: char) {
        if let Some(input) = self.import_input.as_mut() {
            input.push(c);
        }
    }

    pub fn pop_import_char(&mut self) {
        if let Some(input) = self.import_input.as_mut() {
            input.pop();
        }
    }

    /// Close the prompt and return the chosen folder. A blank entry counts
    /// as cancelling.
    pub fn submit_import(&mut self) -> Option<PathBuf> {
        let input = self.import_input.take()?;
        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.status = Some("Import cancelled".to_string());
            return None;
        }
        Some(expand_home(trimmed))
    }

    pub fn cancel_import(&mut self) {
        if self.import_input.take().is_some() {
            self.status = Some("Import cancelled".to_string());
        }
    }

    /// Bring the main view back to front: close overlays and editing modes.
    pub fn reset_view(&mut self) {
        self.import_input = None;
        self.filter_mode = false;
        self.drawer_open = false;
    }
}

fn expand_home(input: &str) -> PathBuf {
    match input.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(input)),
        None => PathBuf::from(input),
    }
}
