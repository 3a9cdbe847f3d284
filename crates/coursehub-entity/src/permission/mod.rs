//! Permission domain entities.

pub mod model;
pub mod set;

pub use model::{PermissionGrant, ResourceType};
pub use set::{Permission, PermissionSet};
