//! # coursehub-api
//!
//! HTTP API layer for the CourseHub sharing core, built on Axum. Routes,
//! handlers, DTOs, identity extraction, and the `AppError` → HTTP response
//! mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
