//! Session-state modules: token/user storage and the session service.
//!
//! SYSTEM CONTEXT
//! ==============
//! `store` is the key-value persistence analogue of browser `localStorage`;
//! `service` owns the authenticated-user state on top of it.

pub mod service;
pub mod store;
