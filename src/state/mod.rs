//! Client state models.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` is the session snapshot, `session` owns its transitions, `links`
//! caches the user's short links, and `account` drives the delete-account
//! dialog. Pages read these through Leptos context.

pub mod account;
pub mod auth;
pub mod links;
pub mod session;
