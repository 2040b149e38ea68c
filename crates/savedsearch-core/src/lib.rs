//! Reconciliation of declaratively configured saved searches against a
//! remote management API.

pub mod actions;
pub mod client;
pub mod config;
pub mod diff;
pub mod error;
pub mod fields;
pub mod io;
pub mod migrations;
pub mod paths;
pub mod payload;
pub mod permissions;
pub mod priority;
pub mod reconciler;
pub mod store;
pub mod types;
pub mod validate;
pub mod wire;

pub use error::{ReconcileError, Result};
