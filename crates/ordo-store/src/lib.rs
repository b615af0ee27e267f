//! ORDO Store - Owner of the authoritative sequence
//!
//! This crate binds the engine to its callers:
//! - `Collection`: single-writer store that swaps in action results
//! - `SharedCollection`: serialized access from several threads
//! - Array and keyed views, rebuilt on every observation
//! - Tracing subscriber setup

pub mod collection;
pub mod shared;
pub mod telemetry;
pub mod view;

pub use collection::*;
pub use shared::*;
pub use telemetry::*;
pub use view::*;
