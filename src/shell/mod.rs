//! Result emission.
//!
//! The binary communicates with its caller through **stdout**.
//! All TUI rendering goes to the alternate screen (stderr-backed), so stdout
//! is reserved for the result: the submitted values as JSON or YAML.

pub mod output;
