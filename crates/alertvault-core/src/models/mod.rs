//! Data models for AlertVault

mod event;
mod lenient;

pub use event::*;
