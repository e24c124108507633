//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render dashboard chrome and dialogs while reading shared state
//! from Leptos context providers.

pub mod delete_account_modal;
pub mod link_card;
pub mod protected_route;
pub mod qr_modal;
