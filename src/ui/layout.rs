//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: header (title, description or tab bar), the
/// widget body, and a bottom status bar.
pub struct AppLayout {
    pub header_area: Rect,
    pub body_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect, header_height: u16) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_height),
                Constraint::Min(3),    // widgets (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            header_area: chunks[0],
            body_area: chunks[1],
            status_area: chunks[2],
        }
    }
}

/// Index of the first panel to draw so that panel `focus` ends inside a
/// viewport of `height` rows. Panels before it are scrolled off.
pub fn scroll_start(heights: &[u16], focus: Option<usize>, height: u16) -> usize {
    let Some(focus) = focus else {
        return 0;
    };
    let mut start = 0;
    let used = |start: usize| heights[start..=focus].iter().map(|&h| h as u32).sum::<u32>();
    while start < focus && used(start) > u32::from(height) {
        start += 1;
    }
    start
}
