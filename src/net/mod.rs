//! Networking modules for the link-shortener REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` is the backend seam, `transport` owns bearer injection and 401
//! invalidation, `api` names the endpoints, and `types` defines the wire
//! schema.

pub mod api;
pub mod http;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
