//! # coursehub-service
//!
//! Business logic service layer for the CourseHub sharing core. Each
//! service orchestrates repositories and the notification collaborator to
//! implement application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod notifier;
pub mod share;
pub mod token;

pub use context::RequestContext;
pub use notifier::{InviteNotification, InviteNotifier, LogNotifier, WebhookNotifier};
pub use share::{AccessService, InviteService, LinkService};
pub use token::TokenGenerator;
