//! Cribra CLI — file-driven filter/rank/explain/validate commands.
//!
//! # Modules
//!
//! - [`cli`]: clap argument and command definitions
//! - [`config`]: confyg-backed configuration loading
//! - [`app`]: the application shell and command handlers

pub mod app;
pub mod cli;
pub mod config;

// Re-export key types at crate root for convenience
pub use app::CribraApp;
pub use cli::{CliArgs, Command};
pub use config::CribraConfig;
