//! Sharing services: invitations, links, and access evaluation.

pub mod access;
pub mod authority;
pub mod invite;
pub mod link;

pub use access::AccessService;
pub use authority::ShareAuthorizer;
pub use invite::InviteService;
pub use link::LinkService;
