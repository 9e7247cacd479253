//! Input handling: maps terminal events to state mutations.

use super::event::AppEvent;
use super::screen::Outcome;
use super::state::AppState;
use super::Flow;

/// Feed one event to the screen and update loop bookkeeping.
pub fn handle_event(state: &mut AppState, event: &AppEvent) {
    let had_errors = state.screen.pending_errors();
    let flow = state.screen.dispatch(event, &state.config.keymap);

    match flow {
        Flow::Exit => {
            state.should_quit = true;
            tracing::debug!(outcome = ?state.screen.outcome(), "leaving event loop");
        }
        Flow::Repaint => {
            state.needs_redraw = true;
            update_status(state, had_errors);
        }
        Flow::Continue => {}
    }

    // A resize always needs a full repaint, even if no widget cared.
    if event.is_resize() {
        state.needs_redraw = true;
    }
}

fn update_status(state: &mut AppState, had_errors: usize) {
    let pending = state.screen.pending_errors();
    state.status_message = match pending {
        0 => None,
        n if n > had_errors || state.status_message.is_some() => Some(format!(
            "{n} field{} need{} attention",
            if n == 1 { "" } else { "s" },
            if n == 1 { "s" } else { "" },
        )),
        _ => None,
    };
}

/// Whether the session ended with a successful submit.
pub fn submitted(state: &AppState) -> bool {
    state.screen.outcome() == Some(Outcome::Submitted)
}
