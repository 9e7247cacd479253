//! Path widget: browse one directory level at a time and pick an entry.
//!
//! The listing comes from [`core::fs::list_dir`](crate::core::fs::list_dir).
//! A directory that cannot be read leaves the list empty and stores the
//! failure as the widget's error; construction never fails on I/O.

use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use glob::Pattern;

use super::options::Options;
use super::{pressed, EventResult, Field, Widget};
use crate::app::event::AppEvent;
use crate::core::fs::{list_dir, DirEntry, ListingConfig};
use crate::core::{ConstructionError, Value, ValueError, ValueKind};
use crate::descriptor::WidgetDescriptor;

const DEFAULT_HEIGHT: usize = 8;

#[derive(Debug)]
pub struct PathPicker {
    field: Field,
    listing: ListingConfig,
    dir: PathBuf,
    initial_dir: PathBuf,
    entries: Vec<DirEntry>,
    cursor: usize,
    offset: usize,
    /// Visible list rows.
    height: usize,
    selected: Option<PathBuf>,
    initial_selected: Option<PathBuf>,
}

impl PathPicker {
    pub fn from_descriptor(desc: &WidgetDescriptor) -> Result<Self, ConstructionError> {
        let opts = Options::new(desc);
        let filter = opts.str("filter")?.filter(|f| !f.is_empty()).unwrap_or("*");
        let filter = Pattern::new(filter).map_err(|err| {
            ConstructionError::invalid(&desc.name, format!("bad filter `{filter}`: {err}"))
        })?;
        let listing = ListingConfig {
            show_hidden: opts.bool("show_hidden")?.unwrap_or(false),
            filter,
        };
        let height = opts.usize("height")?.filter(|&h| h > 0).unwrap_or(DEFAULT_HEIGHT);

        // A directory default is where browsing starts; anything else is a
        // preselected path browsed from its parent.
        let (dir, selected) = match opts.default_str()?.filter(|s| !s.is_empty()) {
            Some(raw) => {
                let path = PathBuf::from(raw);
                if path.is_dir() {
                    (path, None)
                } else {
                    let parent = path
                        .parent()
                        .filter(|p| p.is_dir())
                        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
                    (parent, Some(path))
                }
            }
            None => (PathBuf::from("."), None),
        };
        let dir = dir.canonicalize().unwrap_or(dir);

        let mut picker = Self {
            field: Field::from_descriptor(desc),
            listing,
            initial_dir: dir.clone(),
            dir,
            entries: Vec::new(),
            cursor: 0,
            offset: 0,
            height,
            initial_selected: selected.clone(),
            selected,
        };
        picker.reload();
        Ok(picker)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    fn reload(&mut self) {
        match list_dir(&self.dir, &self.listing) {
            Ok(entries) => self.entries = entries,
            Err(err) => {
                tracing::debug!(dir = %self.dir.display(), %err, "listing failed");
                self.entries.clear();
                self.field.error = Some(format!("Cannot read {}: {err}", self.dir.display()));
            }
        }
        self.cursor = 0;
        self.offset = 0;
    }

    fn move_cursor(&mut self, to: usize) -> bool {
        let to = to.min(self.entries.len().saturating_sub(1));
        if to == self.cursor {
            return false;
        }
        self.cursor = to;
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.height {
            self.offset = self.cursor + 1 - self.height;
        }
        true
    }

    fn enter(&mut self, dir: PathBuf) {
        self.dir = dir;
        self.field.error = None;
        self.reload();
    }

    fn parent(&mut self) -> bool {
        let Some(parent) = self.dir.parent().map(Path::to_path_buf) else {
            return false;
        };
        let came_from = self.dir.clone();
        self.enter(parent);
        if let Some(pos) = self.entries.iter().position(|e| e.path == came_from) {
            self.move_cursor(pos);
        }
        true
    }

    fn select(&mut self, path: PathBuf) {
        self.selected = Some(path);
        self.field.error = None;
    }

    /// Open the entry under the cursor: directories are entered, files are
    /// selected.
    fn open(&mut self) -> bool {
        let Some(entry) = self.entries.get(self.cursor).cloned() else {
            return false;
        };
        if entry.is_dir {
            self.enter(entry.path);
        } else {
            self.select(entry.path);
        }
        true
    }
}

impl Widget for PathPicker {
    fn name(&self) -> &str {
        &self.field.name
    }

    fn is_focused(&self) -> bool {
        self.field.focused
    }

    fn set_focus(&mut self, focused: bool) {
        self.field.focused = focused;
    }

    fn handle_input(&mut self, event: &AppEvent) -> EventResult {
        if let AppEvent::Resize(_, h) = event {
            self.height = usize::from(*h / 3).clamp(3, 20);
            if self.cursor >= self.offset + self.height {
                self.offset = self.cursor + 1 - self.height;
            }
            return EventResult::Handled;
        }
        if !self.field.focused {
            return EventResult::Ignored;
        }
        let Some(key) = pressed(event) else {
            return EventResult::Ignored;
        };
        let handled = match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(self.cursor.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(self.cursor + 1),
            KeyCode::Home | KeyCode::Char('g') => self.move_cursor(0),
            KeyCode::End | KeyCode::Char('G') => self.move_cursor(usize::MAX),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => self.parent(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => self.open(),
            KeyCode::Char(' ') => match self.entries.get(self.cursor) {
                Some(entry) => {
                    let path = entry.path.clone();
                    self.select(path);
                    true
                }
                None => false,
            },
            _ => false,
        };
        if handled {
            EventResult::Handled
        } else {
            EventResult::Ignored
        }
    }

    fn is_valid(&mut self) -> bool {
        let outcome = match &self.selected {
            None if self.field.required => Err("A file must be selected".to_string()),
            Some(path) if !path.exists() => Err("Selected file does not exist".to_string()),
            _ => Ok(()),
        };
        self.field.settle(outcome)
    }

    fn error(&self) -> Option<&str> {
        self.field.error.as_deref()
    }

    fn set_error(&mut self, message: Option<String>) {
        self.field.error = message;
    }

    fn value(&self) -> Value {
        Value::Text(
            self.selected
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        )
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        let Value::Text(raw) = value else {
            return Err(ValueError::mismatch(ValueKind::Text, value.kind()));
        };
        self.selected = (!raw.is_empty()).then(|| PathBuf::from(raw));
        self.field.error = None;
        Ok(())
    }

    fn reset(&mut self) {
        self.field.reset();
        self.selected = self.initial_selected.clone();
        self.dir = self.initial_dir.clone();
        // After the field reset, so a listing failure stays visible.
        self.reload();
    }

    fn view(&self) -> String {
        let mut lines = vec![format!("{}/", self.dir.display())];
        if self.entries.is_empty() {
            lines.push("  (empty)".to_string());
        }
        for (i, entry) in self
            .entries
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(self.height)
        {
            let pointer = if self.field.focused && i == self.cursor { "›" } else { " " };
            let mark = if self.selected.as_ref() == Some(&entry.path) { "✓" } else { " " };
            let slash = if entry.is_dir { "/" } else { "" };
            lines.push(format!("{pointer}{mark} {}{slash}", entry.name));
        }
        if let Some(path) = &self.selected {
            lines.push(format!("= {}", path.display()));
        }
        self.field.frame(&lines.join("\n"))
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("↑/↓", "move"), ("→/Enter", "open"), ("←", "parent"), ("Space", "select")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("docs")).unwrap();
        std::fs::write(tmp.path().join("docs").join("guide.md"), "").unwrap();
        std::fs::write(tmp.path().join("config.yaml"), "").unwrap();
        std::fs::write(tmp.path().join("readme.txt"), "").unwrap();
        tmp
    }

    fn picker(tmp: &tempfile::TempDir, desc: WidgetDescriptor) -> PathPicker {
        let desc = desc.default_value(json!(tmp.path().display().to_string()));
        let mut w = PathPicker::from_descriptor(&desc).unwrap();
        w.set_focus(true);
        w
    }

    fn names(w: &PathPicker) -> Vec<&str> {
        w.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_filter_keeps_dirs() {
        let tmp = fixture();
        let w = picker(&tmp, WidgetDescriptor::new("filepicker", "cfg").option("filter", json!("*.yaml")));
        assert_eq!(names(&w), vec!["docs", "config.yaml"]);
    }

    #[test]
    fn test_enter_dir_select_file_and_go_back() {
        let tmp = fixture();
        let mut w = picker(&tmp, WidgetDescriptor::new("filepicker", "doc"));
        assert!(w.handle_input(&AppEvent::key(KeyCode::Enter)).is_handled());
        assert_eq!(names(&w), vec!["guide.md"]);
        w.handle_input(&AppEvent::key(KeyCode::Enter));
        assert!(w.value().as_text().unwrap().ends_with("guide.md"));
        assert!(w.is_valid());

        w.handle_input(&AppEvent::key(KeyCode::Left));
        assert_eq!(w.entries()[w.cursor].name, "docs");
    }

    #[test]
    fn test_required_and_missing_file() {
        let tmp = fixture();
        let mut w = picker(&tmp, WidgetDescriptor::new("filepicker", "f").required());
        assert!(!w.is_valid());
        assert_eq!(w.error(), Some("A file must be selected"));
        w.set_value(Value::from(tmp.path().join("gone.txt").display().to_string()))
            .unwrap();
        assert!(!w.is_valid());
        assert_eq!(w.error(), Some("Selected file does not exist"));
    }

    #[test]
    fn test_space_selects_and_reset_restores() {
        let tmp = fixture();
        let mut w = picker(&tmp, WidgetDescriptor::new("filepicker", "f"));
        w.handle_input(&AppEvent::key(KeyCode::End));
        w.handle_input(&AppEvent::key(KeyCode::Char(' ')));
        assert!(w.selected().unwrap().ends_with("readme.txt"));
        w.reset();
        assert_eq!(w.selected(), None);
        assert!(!w.is_focused());
    }

    #[test]
    fn test_file_default_preselects_and_browses_parent() {
        let tmp = fixture();
        let file = tmp.path().join("config.yaml");
        let desc = WidgetDescriptor::new("filepicker", "f")
            .default_value(json!(file.display().to_string()));
        let w = PathPicker::from_descriptor(&desc).unwrap();
        assert_eq!(w.selected(), Some(file.as_path()));
        assert_eq!(names(&w), vec!["docs", "config.yaml", "readme.txt"]);
    }

    #[test]
    fn test_bad_filter_rejected() {
        let desc = WidgetDescriptor::new("filepicker", "f").option("filter", json!("[unclosed"));
        assert!(PathPicker::from_descriptor(&desc).is_err());
    }

    #[test]
    fn test_listing_failure_is_widget_error() {
        let tmp = fixture();
        let docs = tmp.path().join("docs");
        let desc = WidgetDescriptor::new("filepicker", "f")
            .default_value(json!(docs.display().to_string()));
        let mut w = PathPicker::from_descriptor(&desc).unwrap();
        assert_eq!(w.error(), None);
        assert_eq!(names(&w), vec!["guide.md"]);

        std::fs::remove_dir_all(&docs).unwrap();
        w.reset();
        assert!(w.error().is_some_and(|e| e.starts_with("Cannot read")), "{:?}", w.error());
        assert!(w.entries().is_empty());
    }

    #[test]
    fn test_entering_vanished_dir_sets_error() {
        let tmp = fixture();
        let mut w = picker(&tmp, WidgetDescriptor::new("filepicker", "f"));
        assert_eq!(w.entries()[w.cursor].name, "docs");
        std::fs::remove_dir_all(tmp.path().join("docs")).unwrap();
        w.handle_input(&AppEvent::key(KeyCode::Enter));
        assert!(w.error().is_some_and(|e| e.starts_with("Cannot read")));
    }
}
