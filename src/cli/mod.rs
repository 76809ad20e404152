pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::{abort_diagnostics, handle_outcome, run, setup_logging, Diagnostic};
