//! ORDO Engine - Ordered keyed-collection mutation engine
//!
//! This crate implements the pure transformations over a sequence snapshot:
//! - Copy-on-write sequence container
//! - Locator resolution
//! - Add, remove, reorder, move and update actions
//!
//! Every action takes a snapshot and returns a new one. Nothing here keeps
//! state between calls; the owning store swaps results in.

pub mod actions;
pub mod add;
pub mod relocate;
pub mod remove;
pub mod reorder;
pub mod resolve;
pub mod sequence;
pub mod update;

pub use actions::*;
pub use remove::*;
pub use reorder::*;
pub use resolve::*;
pub use sequence::*;
