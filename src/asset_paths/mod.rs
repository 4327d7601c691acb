//! Path and URL construction for module files and static assets.
//!
//! Path arithmetic, host selection, and external reference filtering live in separate
//! submodules so each can be tested on its own.

mod builder;
mod filters;
mod hosts;
pub mod posix;

pub use builder::UrlBuilder;
pub use filters::is_external_reference;
pub use hosts::{HOST_SHARD_PLACEHOLDER, hashed_host, select_host};
