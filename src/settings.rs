// src/settings.rs

//! Package-manager settings consumed by the recipe configuration step
//!
//! The package manager hands every recipe a settings object (os, arch,
//! compiler, build type) plus recipe options. Process environment variables
//! are captured once into an [`Environment`] snapshot.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// CMake-style build type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    /// Get the build type name as the package manager spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, BuildType::Debug)
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Debug" => Ok(BuildType::Debug),
            "Release" => Ok(BuildType::Release),
            "RelWithDebInfo" => Ok(BuildType::RelWithDebInfo),
            "MinSizeRel" => Ok(BuildType::MinSizeRel),
            other => Err(Error::InvalidBuildType(other.to_string())),
        }
    }
}

/// Settings for one recipe configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub os: String,
    pub arch: String,
    /// Compiler identifier, e.g. "gcc", "clang", "Visual Studio"
    pub compiler: String,
    pub compiler_version: String,
    pub build_type: BuildType,
    /// Windows subsystem such as "cygwin" or "msys2"
    pub subsystem: Option<String>,
    /// MSVC runtime library flag without the slash: MD, MT, MDd or MTd
    pub runtime: Option<String>,
}

impl Settings {
    /// Create settings for a platform triple with a Release build
    pub fn new(
        os: impl Into<String>,
        arch: impl Into<String>,
        compiler: impl Into<String>,
    ) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
            compiler: compiler.into(),
            compiler_version: String::new(),
            build_type: BuildType::default(),
            subsystem: None,
            runtime: None,
        }
    }

    pub fn with_compiler_version(mut self, version: impl Into<String>) -> Self {
        self.compiler_version = version.into();
        self
    }

    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    pub fn with_subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.subsystem = Some(subsystem.into());
        self
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    pub fn is_windows(&self) -> bool {
        self.os == "Windows"
    }

    /// Microsoft Visual C++
    pub fn is_msvc(&self) -> bool {
        self.compiler == "Visual Studio"
    }

    /// clang driven through the MSVC-compatible clang-cl frontend
    pub fn is_clang_cl(&self) -> bool {
        self.compiler == "clang" && self.is_windows()
    }

    /// GCC targeting Windows
    pub fn is_mingw(&self) -> bool {
        self.is_windows() && self.compiler == "gcc"
    }

    /// Toolchains that build OpenSSL with nmake instead of make
    pub fn uses_nmake(&self) -> bool {
        self.is_msvc() || self.is_clang_cl()
    }

    pub fn is_cygwin(&self) -> bool {
        self.subsystem.as_deref() == Some("cygwin")
    }

    /// The `OS-ARCH-COMPILER` string used for target lookup and messages
    pub fn query(&self) -> String {
        format!("{}-{}-{}", self.os, self.arch, self.compiler)
    }
}

/// Recipe options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeOptions {
    pub shared: bool,
    /// Position independent code; ignored on Windows
    pub fpic: bool,
}

impl Default for RecipeOptions {
    fn default() -> Self {
        Self {
            shared: true,
            fpic: true,
        }
    }
}

/// Snapshot of process environment variables
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Build a snapshot from raw OS strings
    ///
    /// Entries whose name or value is not valid Unicode are skipped.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let vars = vars
            .into_iter()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    debug!("Skipping non-UTF-8 environment entry {:?}", key);
                    None
                }
            })
            .collect();
        Self { vars }
    }

    /// Add a variable
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Raw value of a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|s| s.as_str())
    }

    /// Value of a variable, treating an empty value as unset
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Whitespace-separated words of a variable (CFLAGS and friends)
    pub fn words(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| v.split_whitespace().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
