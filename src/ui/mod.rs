//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the containers and turns their widgets' text views into
//! cells on the terminal. It only reads state.

pub mod layout;
pub mod panel;
pub mod theme;
pub mod views;

pub use views::draw;
