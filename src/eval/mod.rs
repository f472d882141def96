//! Game evaluation.
//!
//! Final scores and the win/draw outcome used by playouts and self-play.

pub mod score;

pub use score::{final_score, outcome, Outcome, SUN_PER_POINT};
