//! # coursehub-entity
//!
//! Domain entity models for the CourseHub sharing core: permission grants,
//! share invitations, share links, and the resource registry rows they
//! reference.

pub mod invite;
pub mod link;
pub mod permission;
pub mod resource;

pub use invite::{CreateInvite, InviteStatus, ShareInvite};
pub use link::{CreateLink, ShareLink};
pub use permission::{Permission, PermissionGrant, PermissionSet, ResourceType};
pub use resource::Resource;
