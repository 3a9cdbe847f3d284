//! Share invitation domain entities.

pub mod model;

pub use model::{CreateInvite, InviteStatus, ShareInvite};
