//! `splunk-rest`: blocking client for the Splunk management REST API.
//!
//! Implements [`savedsearch_core::client::RemoteResourceClient`] on top of
//! `reqwest`, so the reconciler can drive a real instance:
//!
//! ```text
//! Reconciler<SplunkClient>
//!     │
//!     ▼
//! SplunkClient   ← form-encoded POST / GET / DELETE against
//!                  /servicesNS/{owner}/{app}/saved/searches[/{name}[/acl]]
//!     │
//!     ▼
//! RemoteResponse ← status + raw body, decoded by savedsearch-core
//! ```
//!
//! Transport failures surface as [`SplunkError`] and convert into
//! `ReconcileError::Transport`; non-success statuses are decoded from the
//! response envelope by the core crate.

pub mod client;
pub mod error;

pub use client::SplunkClient;
pub use error::SplunkError;
