pub mod orchestration;

pub use orchestration::{Orchestrator, RunOptions, TagOutcome};
