// src/configure/policy.rs

//! Support policy: which settings a recipe agrees to build

use crate::error::{Error, Result};
use crate::settings::Settings;
use serde::{Deserialize, Serialize};

/// Allowed operating systems and compilers
///
/// Empty lists allow everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportPolicy {
    #[serde(default)]
    pub os: Vec<String>,
    #[serde(default)]
    pub compilers: Vec<String>,
    /// Reject Windows subsystems (cygwin, msys2, wsl)
    #[serde(default)]
    pub reject_subsystems: bool,
}

impl SupportPolicy {
    /// Accept any settings
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Linux and Windows with gcc or MSVC, no Windows subsystems
    pub fn strict() -> Self {
        Self {
            os: vec!["Windows".to_string(), "Linux".to_string()],
            compilers: vec!["gcc".to_string(), "Visual Studio".to_string()],
            reject_subsystems: true,
        }
    }

    /// Reject settings outside the policy
    pub fn check(&self, settings: &Settings) -> Result<()> {
        if !self.os.is_empty() && !self.os.contains(&settings.os) {
            return Err(Error::Unsupported(format!(
                "OS '{}' is not supported (supported: {})",
                settings.os,
                self.os.join(", ")
            )));
        }

        if !self.compilers.is_empty() && !self.compilers.contains(&settings.compiler) {
            return Err(Error::Unsupported(format!(
                "compiler '{}' is not supported (supported: {})",
                settings.compiler,
                self.compilers.join(", ")
            )));
        }

        if self.reject_subsystems && settings.is_windows() {
            if let Some(subsystem) = &settings.subsystem {
                return Err(Error::Unsupported(format!(
                    "Windows subsystem '{}' is not supported",
                    subsystem
                )));
            }
        }

        Ok(())
    }
}
