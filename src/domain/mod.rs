//! Domain logic - pure versioning rules independent of git operations

pub mod channel;
pub mod scope;
pub mod tagset;
pub mod version;

pub use channel::{Channel, PreRelease};
pub use scope::{Bump, Scope};
pub use tagset::{TagSet, TaggedVersion};
pub use version::Version;
