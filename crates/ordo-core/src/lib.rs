//! ORDO Core - Fundamental types for ordered keyed collections
//!
//! This crate defines the types shared by the engine and the store:
//! - The record capability (`Record`) and the stock JSON `Document`
//! - Keys and field ordering
//! - Locators (absolute, keyed, anchored, boundary)
//! - Duplicate/missing recovery policies
//! - Collection configuration and the error taxonomy

pub mod config;
pub mod error;
pub mod field;
pub mod key;
pub mod locator;
pub mod policy;
pub mod record;

pub use config::*;
pub use error::*;
pub use field::*;
pub use key::*;
pub use locator::*;
pub use policy::*;
pub use record::*;
