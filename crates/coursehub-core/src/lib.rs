//! # coursehub-core
//!
//! Core crate for the CourseHub sharing core. Contains configuration
//! schemas, pagination types, domain events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other CourseHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
