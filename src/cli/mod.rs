//! Command-line surface
//!
//! - Argument parsing structures
//! - Command execution

pub mod args;
pub mod router;

pub use args::Cli;
pub use router::execute;

/// Log filter for a `-v` count
pub fn get_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
