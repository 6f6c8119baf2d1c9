//! CLI command implementations

mod cleanup;
mod config_gen;
mod stats;

pub use cleanup::run_cleanup;
pub use config_gen::config_generate;
pub use stats::{TargetStats, collect_stats, show_stats};
