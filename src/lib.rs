//! Conquest game engine library.
//!
//! Exposes the board model, order resolution, the command processor and the
//! phase-driven game engine for use by the binaries, integration tests and
//! benchmarks.

pub mod board;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod log;
pub mod resolve;
pub mod simulate;
pub mod strategy;
