//! Application orchestration: containers, focus, event loop plumbing, and
//! input handling.

pub mod event;
pub mod focus;
pub mod form;
pub mod handler;
pub mod layout;
pub mod screen;
pub mod state;
pub mod tabs;

use crate::widgets::EventResult;

/// What the owner of a container should do after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Nothing visible changed.
    Continue,
    /// State changed; redraw.
    Repaint,
    /// Stop the loop (quit or successful submit).
    Exit,
}

impl From<EventResult> for Flow {
    fn from(result: EventResult) -> Self {
        match result {
            EventResult::Handled => Flow::Repaint,
            EventResult::Ignored => Flow::Continue,
        }
    }
}
