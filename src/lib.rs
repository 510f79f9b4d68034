// src/lib.rs

//! OpenSSL target resolution for package recipes
//!
//! Building OpenSSL starts with picking one of the targets its Configure
//! script knows about. This crate maps a package manager's settings
//! (OS, architecture, compiler) onto that target and plans the rest of
//! the build around it.
//!
//! # Architecture
//!
//! - [`version`]: parsing and ordering of OpenSSL release strings
//!   (`1.0.2u`, `1.1.1j`, `3.0.0-beta1`)
//! - [`target`]: ordered glob rules, operator overrides and
//!   version-dependent target name modulations
//! - [`configure`]: Configure arguments, custom target definitions and
//!   make invocations
//! - [`config`]: optional TOML file replacing the built-in rules

pub mod config;
pub mod configure;
mod error;
pub mod settings;
pub mod target;
pub mod version;

pub use config::{Config, DEFAULT_CONFIG_PATH};
pub use configure::{BuildPlan, BuildPlanner, PlanRequest, SupportPolicy};
pub use error::{Error, Result};
pub use settings::{BuildType, Environment, RecipeOptions, Settings};
pub use target::{
    custom_target_name, PlatformPattern, Resolution, RuleTable, TargetResolver, TargetRule,
    DEFAULT_OVERRIDE_VAR,
};
pub use version::{OpenSslVersion, VersionConstraint};
