//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod convert;
mod methods;
mod reverse;
mod utils;

pub use completions::handle_completions;
pub use convert::handle_convert;
pub use methods::handle_methods;
pub use reverse::handle_reverse;
