//! Domain logic - pure release rules independent of git operations

pub mod branch;
pub mod tag;
pub mod version;

pub use branch::ReleaseBranch;
pub use tag::{MessageTemplate, ReleaseTag};
pub use version::Version;
