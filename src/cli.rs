//! CLI domain: parse, route, output and presentation only.
//! The synchronizer does the work; this layer loads configuration and formats results.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_changes_json, format_changes_text};
pub use route::{read_gitignore_patterns, RunContext};
