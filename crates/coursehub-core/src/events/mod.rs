//! Domain events emitted by the sharing core.

pub mod share;

pub use share::ShareEvent;
