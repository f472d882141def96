//! Canopy engine library.
//!
//! Exposes the board representation, rules simulator, move generation,
//! search, and protocol modules for use by integration tests, benchmarks,
//! and the binary entry points.

pub mod board;
pub mod engine;
pub mod eval;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod search;
pub mod selfplay;
