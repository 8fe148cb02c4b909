//! Sternhalma rules engine library.
//!
//! Exposes the star-board geometry, move generation, the turn state machine,
//! and the driver protocol for use by integration tests and the binary.

pub mod board;
pub mod engine;
pub mod game;
pub mod movegen;
pub mod protocol;
