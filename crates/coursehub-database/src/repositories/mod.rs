//! Concrete repository implementations.

pub mod grant;
pub mod invite;
pub mod link;
pub mod resource;

pub use grant::GrantRepository;
pub use invite::InviteRepository;
pub use link::LinkRepository;
pub use resource::ResourceRepository;
