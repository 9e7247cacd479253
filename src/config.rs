//! User configuration: container key bindings and persistence.
//!
//! Bindings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/formdeck/config.toml` (default `~/.config/formdeck/config.toml`).
//! Only container-level actions are configurable; widget editing keys are fixed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ───────────────────────────────────────── actions ───────────

/// Keys a container intercepts before the focused widget sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    FocusNext,
    FocusPrev,
    Submit,
    NextGroup,
    PrevGroup,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the config file and help line).
    pub const ALL: &[Action] = &[
        Action::FocusNext,
        Action::FocusPrev,
        Action::Submit,
        Action::NextGroup,
        Action::PrevGroup,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::FocusNext => "next field",
            Action::FocusPrev => "previous field",
            Action::Submit => "submit",
            Action::NextGroup => "next tab",
            Action::PrevGroup => "previous tab",
            Action::Quit => "quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::FocusNext => "focus_next",
            Action::FocusPrev => "focus_prev",
            Action::Submit => "submit",
            Action::NextGroup => "next_group",
            Action::PrevGroup => "prev_group",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Ctrl+→"`, `"Esc"`, `"Tab"`).
    pub fn display(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            KeyCode::BackTab => "Tab".into(),
            other => key_name(other),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Ctrl+Right"`, `"Shift+BackTab"`).
    fn to_config_string(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&key_name(self.code));
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn modifier_prefix(modifiers: KeyModifiers) -> String {
    let mut s = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        s.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        s.push_str("Shift+");
    }
    s
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::BackTab => "BackTab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── key map ───────────

/// Action → bindings table consulted by every container.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMap {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
}

impl Default for KeyMap {
    fn default() -> Self {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let shift = KeyModifiers::SHIFT;
        let mut m = HashMap::new();

        m.insert(FocusNext, vec![KeyBind::new(Tab, n)]);
        // Terminals report Shift+Tab as BackTab, with or without SHIFT set.
        m.insert(FocusPrev, vec![KeyBind::new(BackTab, shift), KeyBind::new(BackTab, n)]);
        m.insert(Submit, vec![KeyBind::new(Enter, n)]);
        m.insert(NextGroup, vec![KeyBind::new(Right, ctrl), KeyBind::new(PageDown, n)]);
        m.insert(PrevGroup, vec![KeyBind::new(Left, ctrl), KeyBind::new(PageUp, n)]);
        m.insert(Quit, vec![KeyBind::new(Esc, n), KeyBind::new(Char('c'), ctrl)]);

        Self { bindings: m }
    }
}

impl KeyMap {
    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    pub fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Status-bar hint for the given subset of actions.
    pub fn hint(&self, actions: &[Action]) -> String {
        actions
            .iter()
            .map(|&a| format!("{}: {}", self.short_binding(a), a.label()))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Jump-to-group digit: `Alt+1` … `Alt+9` → zero-based group index.
pub fn group_jump(event: KeyEvent) -> Option<usize> {
    if !event.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }
    match event.code {
        KeyCode::Char(c @ '1'..='9') => Some(c as usize - '1' as usize),
        _ => None,
    }
}

// ───────────────────────────────────────── config ────────────

pub const DEFAULT_TICK_RATE_MS: u64 = 250;

/// Application configuration: key bindings and event-loop timing.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub keymap: KeyMap,
    /// Idle tick interval for the terminal event reader.
    pub tick_rate_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            keymap: KeyMap::default(),
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
        }
    }
}

impl AppConfig {
    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(_) => Self::default(),
        }
    }

    pub fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key == "tick_rate_ms" {
                if let Ok(v) = value.parse::<u64>() {
                    // Keep this bounded for predictable UX.
                    config.tick_rate_ms = v.clamp(50, 1000);
                }
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "ignoring unknown config key");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.keymap.bindings.insert(action, parsed);
            }
        }

        config
    }

    pub fn serialise(&self) -> String {
        let mut lines = vec![
            "# formdeck configuration".to_string(),
            String::new(),
            format!("tick_rate_ms = {}", self.tick_rate_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab, BackTab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.keymap.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/formdeck/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join(env!("CARGO_PKG_NAME")).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_default_bindings() {
        let map = KeyMap::default();
        assert_eq!(map.match_key(key(KeyCode::Tab, KeyModifiers::NONE)), Some(Action::FocusNext));
        assert_eq!(
            map.match_key(key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Action::FocusPrev)
        );
        assert_eq!(
            map.match_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(map.match_key(key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(map.match_key(key(KeyCode::Right, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_parse_key_strings() {
        assert_eq!(
            KeyBind::parse("Ctrl+Right"),
            Some(KeyBind::new(KeyCode::Right, KeyModifiers::CONTROL))
        );
        assert_eq!(KeyBind::parse("Q"), Some(KeyBind::new(KeyCode::Char('Q'), KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("Banana"), None);
    }

    #[test]
    fn test_parse_config_overrides_and_keeps_defaults() {
        let config = AppConfig::parse_config(
            "# comment\nquit = q, Ctrl+q\ntick_rate_ms = 5\nnonsense = x\nsubmit = ???\n",
        );
        assert_eq!(
            config.keymap.match_key(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
        // Esc is no longer bound once quit is overridden.
        assert_eq!(config.keymap.match_key(key(KeyCode::Esc, KeyModifiers::NONE)), None);
        assert_eq!(config.tick_rate_ms, 50);
        assert_eq!(
            config.keymap.match_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::Submit)
        );
    }

    #[test]
    fn test_serialise_round_trips_through_parse() {
        let config = AppConfig::default();
        assert_eq!(AppConfig::parse_config(&config.serialise()), config);
    }

    #[test]
    fn test_load_from_file_or_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let mut config = AppConfig::default();
        config.tick_rate_ms = 400;
        std::fs::write(&path, config.serialise()).unwrap();
        assert_eq!(AppConfig::load_from(&path).tick_rate_ms, 400);
        assert_eq!(AppConfig::load_from(&tmp.path().join("missing")), AppConfig::default());
    }

    #[test]
    fn test_group_jump_digits() {
        assert_eq!(group_jump(key(KeyCode::Char('1'), KeyModifiers::ALT)), Some(0));
        assert_eq!(group_jump(key(KeyCode::Char('9'), KeyModifiers::ALT)), Some(8));
        assert_eq!(group_jump(key(KeyCode::Char('1'), KeyModifiers::NONE)), None);
        assert_eq!(group_jump(key(KeyCode::Char('0'), KeyModifiers::ALT)), None);
    }
}
