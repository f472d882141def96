//! Referee protocol handling.
//!
//! Reads the startup and per-turn input blocks and converts actions to and
//! from their one-line text form.

pub mod action;
pub mod parser;

pub use action::{format_action, parse_action, NotationError};
pub use parser::{InputReader, ProtocolError};
