//! Release rules that need repository data: series resolution and preflight

pub mod preflight;
pub mod resolver;

pub use preflight::check_tree_is_clean;
pub use resolver::{next_release, resolve_previous_release};
