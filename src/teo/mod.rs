//! EdgeOne (TEO) Transport
//!
//! `TeoClient` signs and sends API actions and implements every zone
//! repository trait, so one client serves both the template and the target
//! zone.

mod client;
mod domain;
mod origin;
mod rule;
mod signer;
mod zone_setting;

pub use client::{TeoClient, API_VERSION};
pub use signer::Credential;
