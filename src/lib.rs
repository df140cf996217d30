//! EdgeOne Zone Copy Library
//!
//! Copies origin groups, acceleration domains, rule engine rules and zone
//! settings from a template EdgeOne zone onto a target zone, renaming
//! zone-qualified names and translating origin group identifiers on the way.

pub mod config;
pub mod copy;
pub mod error;
pub mod repository;
pub mod teo;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{CopyScope, ZoneCopyConfig};
pub use copy::{EntityKind, ImportReport, ZoneCopier};
pub use error::{Result, ZoneCopyError};
pub use teo::TeoClient;
