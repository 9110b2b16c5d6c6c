//! RepoLens Core - shared foundation for the RepoLens client
//!
//! Provides the error model, configuration loading, and logging setup used by
//! every other crate in the workspace

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
pub use logging::*;

// Re-export commonly used external types
pub use tracing;
