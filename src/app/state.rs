//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use crate::config::AppConfig;
use crate::widgets::Widget;

use super::screen::Screen;

/// Top-level application state.
pub struct AppState {
    /// The container being run.
    pub screen: Screen,
    /// User-configurable keybindings and loop timing.
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Set by the handler when the last event changed something visible.
    pub needs_redraw: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(screen: Screen, config: AppConfig) -> Self {
        Self {
            screen,
            config,
            should_quit: false,
            needs_redraw: true,
            status_message: None,
        }
    }

    /// Status-bar text: the pending message, or the key hints for the
    /// container and the focused widget.
    pub fn status_line(&self) -> String {
        if let Some(msg) = &self.status_message {
            return msg.clone();
        }
        let mut hint = self.config.keymap.hint(self.screen.actions());
        if let Some(widget) = self.screen.focused() {
            for (key, what) in widget.key_hints() {
                hint.push_str(&format!(" | {key}: {what}"));
            }
        }
        hint
    }
}
