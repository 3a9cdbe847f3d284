//! HTTP request handlers.

pub mod health;
pub mod permission;
pub mod share;
