//! # coursehub-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for the sharing-core entities.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::create_pool;
