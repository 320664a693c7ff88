//! # swiftida-core
//!
//! Core abstractions for swiftida. This crate defines the supported target
//! architectures, the Swift calling-convention register tables for each of
//! them, the entities whose declared types get edited, and the error type
//! shared by every edit.

pub mod arch;
pub mod entity;
pub mod error;
pub mod register;

pub use arch::{ArchProfile, Architecture, HiddenRole};
pub use entity::{EntityId, Selection};
pub use error::{Error, Result};
