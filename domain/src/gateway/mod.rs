//! Clients for the external services the domain layer talks to.

pub mod object_storage;
pub mod vertex_ai;
