//! Networking modules for the backend auth API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the HTTP calls, `types` defines the wire schema plus the
//! [`types::AuthBackend`] seam the session layer is written against.

pub mod api;
pub mod types;
