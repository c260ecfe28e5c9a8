//! Version command for the liftlog CLI.

/// The current version of liftlog, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_line() -> String {
    format!("liftlog {}", VERSION)
}
