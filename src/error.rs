// src/error.rs

//! Error types for version parsing, target resolution and build planning

use thiserror::Error;

/// Errors raised while configuring a recipe
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed version string
    #[error("Invalid version '{input}': {reason}")]
    ParseError { input: String, reason: String },

    /// No target rule matched the queried platform triple
    #[error(
        "unsupported configuration: {query}. Set the {override_var} environment variable \
         to an OpenSSL target (run './Configure --help' for the list of targets)"
    )]
    UnsupportedConfiguration { query: String, override_var: String },

    /// Build type name the package manager does not define
    #[error("Invalid build type '{0}' (expected Debug, Release, RelWithDebInfo or MinSizeRel)")]
    InvalidBuildType(String),

    /// Settings rejected by the support policy
    #[error("Unsupported settings: {0}")]
    Unsupported(String),

    /// A rule or modulation glob failed to compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A required dependency was not described to the planner
    #[error("Missing dependency information for '{0}'")]
    MissingDependency(String),

    /// A build tool could not be located
    #[error("Could not find '{tool}' executable. Set the {hint} environment variable")]
    ToolNotFound { tool: String, hint: String },

    /// Configuration file could not be read or parsed
    #[error("Invalid configuration file {path}: {reason}")]
    Config { path: String, reason: String },

    /// A required source edit found nothing to replace
    #[error("Patch of {file} failed: '{search}' not found")]
    PatchNotApplied { file: String, search: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a parse error for the given input
    pub fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::ParseError {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for recipe configuration
pub type Result<T> = std::result::Result<T, Error>;
