//! Form-controller modules for the user-management screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! `field` tracks per-control interaction state, `catalog` supplies the
//! organizational lookup tables, and `usuario` is the create/edit form
//! controller the page binds to.

pub mod catalog;
pub mod field;
pub mod usuario;
