//! # municipio-client
//!
//! Client-side core for the municipal administrative web application:
//! session/token lifecycle management and the user-management form
//! controller.
//!
//! This crate owns state, validation, and persistence bookkeeping only.
//! Rendering, routing, and the backend itself are external collaborators:
//! pages bind to [`session::service::SessionService`] and
//! [`forms::usuario::UsuarioForm`], and hand navigation in as a closure.

pub mod config;
pub mod forms;
pub mod net;
pub mod session;
