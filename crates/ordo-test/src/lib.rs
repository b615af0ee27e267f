//! ORDO Test Harness - Differential fuzzing and property checks
//!
//! This crate provides:
//! - A seeded action fuzzer that drives a collection and a naive
//!   reference model side by side
//! - Property helpers for the engine's invariants

pub mod action_fuzzer;
pub mod model;

pub use action_fuzzer::*;
pub use model::*;
