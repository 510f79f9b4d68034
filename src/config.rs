// src/config.rs

//! Configuration file for target resolution and build planning
//!
//! The file is optional. Without it the built-in OpenSSL rule table and
//! modulations are used.
//!
//! ```toml
//! override_var = "OPENSSL_CONFIGURATION"
//!
//! [support]
//! os = ["Linux", "Windows"]
//! compilers = ["gcc", "Visual Studio"]
//!
//! [build]
//! perl = "/usr/bin/perl"
//! jobs = 8
//!
//! # Replaces the built-in table; order is significant
//! [[rule]]
//! pattern = "Linux-x86_64-*"
//! target = "linux-x86_64"
//!
//! # Replaces the built-in modulations
//! [[modulation]]
//! prefix = "debug-"
//! version = "< 1.1.0"
//! build_type = "Debug"
//! arch = ["x86", "x86_64"]
//! targets = ["linux-*"]
//! ```

use crate::configure::SupportPolicy;
use crate::error::{Error, Result};
use crate::settings::{BuildType, Settings};
use crate::target::{
    Condition, Modulation, ModulationChain, RuleTable, TargetResolver, DEFAULT_OVERRIDE_VAR,
};
use crate::version::{OpenSslVersion, VersionConstraint};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/recipe-target/targets.toml";

/// Parsed configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Environment variable carrying a target override
    #[serde(default = "default_override_var")]
    pub override_var: String,

    #[serde(default)]
    pub support: SupportPolicy,

    #[serde(default)]
    pub build: BuildSection,

    /// Ordered rules replacing the built-in table
    #[serde(default, rename = "rule", skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RuleEntry>>,

    /// Modulations replacing the built-in ones
    #[serde(default, rename = "modulation", skip_serializing_if = "Option::is_none")]
    pub modulations: Option<Vec<ModulationEntry>>,
}

fn default_override_var() -> String {
    DEFAULT_OVERRIDE_VAR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            override_var: default_override_var(),
            support: SupportPolicy::default(),
            build: BuildSection::default(),
            rules: None,
            modulations: None,
        }
    }
}

/// Build tool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Perl interpreter passed to Configure
    #[serde(default = "default_perl")]
    pub perl: String,

    /// Parallel jobs; defaults to the available parallelism
    #[serde(default)]
    pub jobs: Option<u32>,
}

fn default_perl() -> String {
    "perl".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            perl: default_perl(),
            jobs: None,
        }
    }
}

/// One `[[rule]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub pattern: String,
    pub target: String,
}

/// One `[[modulation]]` entry; every given condition must hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModulationEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub prefix: String,
    /// Version constraint such as "< 1.1.0"
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub build_type: Option<BuildType>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub compiler: Option<String>,
    #[serde(default)]
    pub mingw: bool,
    #[serde(default)]
    pub nmake: bool,
    /// Globs over the settings arch
    #[serde(default)]
    pub arch: Vec<String>,
    /// Globs over the identifier being modulated
    #[serde(default)]
    pub targets: Vec<String>,
}

impl ModulationEntry {
    /// Compile into a modulation
    pub fn to_modulation(&self) -> Result<Modulation> {
        let name = self.name.clone().unwrap_or_else(|| self.prefix.clone());
        let mut modulation = Modulation::prefix(name, self.prefix.clone());

        if let Some(version) = &self.version {
            modulation = modulation.when(Condition::Version(VersionConstraint::parse(version)?));
        }
        if let Some(build_type) = self.build_type {
            modulation = modulation.when(Condition::BuildType(build_type));
        }
        if let Some(os) = &self.os {
            modulation = modulation.when(Condition::Os(os.clone()));
        }
        if let Some(compiler) = &self.compiler {
            modulation = modulation.when(Condition::Compiler(compiler.clone()));
        }
        if self.mingw {
            modulation = modulation.when(Condition::MingwCompiler);
        }
        if self.nmake {
            modulation = modulation.when(Condition::NmakeToolchain);
        }
        if !self.arch.is_empty() {
            modulation = modulation.when(Condition::arch(&self.arch)?);
        }
        if !self.targets.is_empty() {
            modulation = modulation.when(Condition::target(&self.targets)?);
        }

        Ok(modulation)
    }
}

impl Config {
    /// Parse configuration from TOML; `origin` names the source in errors
    pub fn parse(content: &str, origin: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config {
            path: origin.to_string(),
            reason: e.to_string(),
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::parse(&content, &path.display().to_string())
    }

    /// Load an explicit file, or the default file when it exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Compile rules and modulations up front so bad globs surface at load
    fn validate(&self, origin: &str) -> Result<()> {
        let wrap = |e: Error| Error::Config {
            path: origin.to_string(),
            reason: e.to_string(),
        };
        if self.override_var.is_empty() {
            return Err(Error::Config {
                path: origin.to_string(),
                reason: "override_var must not be empty".to_string(),
            });
        }
        if let Some(rules) = &self.rules {
            rule_table(rules).map_err(wrap)?;
        }
        if let Some(entries) = &self.modulations {
            for entry in entries {
                entry.to_modulation().map_err(wrap)?;
            }
        }
        Ok(())
    }

    /// The rule table in effect for a release
    pub fn rule_table(&self, version: &OpenSslVersion, cygwin: bool) -> Result<RuleTable> {
        match &self.rules {
            Some(rules) => rule_table(rules),
            None => RuleTable::openssl(version, cygwin),
        }
    }

    /// Build the target resolver for a release
    pub fn resolver(
        &self,
        version: &OpenSslVersion,
        settings: &Settings,
    ) -> Result<TargetResolver> {
        let table = self.rule_table(version, settings.is_cygwin())?;
        let modulations = match &self.modulations {
            Some(entries) => {
                let mut chain = ModulationChain::new();
                for entry in entries {
                    chain.push(entry.to_modulation()?);
                }
                chain
            }
            None => ModulationChain::openssl_ancestor()?,
        };
        Ok(TargetResolver::new(table, modulations).with_override_var(self.override_var.clone()))
    }
}

fn rule_table(rules: &[RuleEntry]) -> Result<RuleTable> {
    RuleTable::from_pairs(rules.iter().map(|r| (r.pattern.as_str(), r.target.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("", "test").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.override_var, DEFAULT_OVERRIDE_VAR);
        assert_eq!(config.build.perl, "perl");
        assert!(config.rules.is_none());
    }

    #[test]
    fn test_full_config() {
        let content = r#"
override_var = "MY_SSL_TARGET"

[support]
os = ["Linux"]
compilers = ["gcc"]
reject_subsystems = true

[build]
perl = "/usr/bin/perl"
jobs = 2

[[rule]]
pattern = "Linux-aarch64-*"
target = "linux-aarch64"

[[rule]]
pattern = "Linux-*-*"
target = "linux-generic64"

[[modulation]]
name = "legacy-debug"
prefix = "debug-"
version = "< 1.1.0"
build_type = "Debug"
targets = ["linux-*"]
"#;
        let config = Config::parse(content, "test").unwrap();
        assert_eq!(config.override_var, "MY_SSL_TARGET");
        assert_eq!(config.support.os, vec!["Linux".to_string()]);
        assert_eq!(config.build.jobs, Some(2));
        let rules = config.rules.as_ref().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].target, "linux-aarch64");

        let modulation = config.modulations.as_ref().unwrap()[0].to_modulation().unwrap();
        assert_eq!(modulation.name(), "legacy-debug");
        assert_eq!(modulation.prefix_str(), "debug-");
    }

    #[test]
    fn test_config_rules_replace_builtin_table() {
        let content = r#"
[[rule]]
pattern = "Neutrino-*-*"
target = "nto-generic"
"#;
        let config = Config::parse(content, "test").unwrap();
        let version = OpenSslVersion::new(1, 1, 1);
        let settings = Settings::new("Neutrino", "armv7", "qcc");
        let resolver = config.resolver(&version, &settings).unwrap();
        assert_eq!(resolver.table().len(), 1);
        assert_eq!(
            resolver.resolve(&settings, &version, None).unwrap().target(),
            "nto-generic"
        );
        // Linux is no longer covered
        let linux = Settings::new("Linux", "x86_64", "gcc");
        assert!(resolver.resolve(&linux, &version, None).is_err());
    }

    #[test]
    fn test_empty_modulation_list_disables_builtin() {
        let content = "modulation = []\n";
        let config = Config::parse(content, "test").unwrap();
        let version = OpenSslVersion::parse("1.0.2u").unwrap();
        let settings = Settings::new("Linux", "x86_64", "gcc").with_build_type(BuildType::Debug);
        let resolver = config.resolver(&version, &settings).unwrap();
        assert_eq!(
            resolver.resolve(&settings, &version, None).unwrap().target(),
            "linux-x86_64"
        );
    }

    #[test]
    fn test_modulation_arch_condition() {
        let content = r#"
[[modulation]]
prefix = "debug-"
build_type = "Debug"
arch = ["x86*"]
targets = ["linux-*"]
"#;
        let config = Config::parse(content, "test").unwrap();
        let version = OpenSslVersion::parse("1.0.2u").unwrap();
        let x86 = Settings::new("Linux", "x86", "gcc").with_build_type(BuildType::Debug);
        let arm = Settings::new("Linux", "armv7", "gcc").with_build_type(BuildType::Debug);
        let resolver = config.resolver(&version, &x86).unwrap();
        assert_eq!(
            resolver.resolve(&x86, &version, None).unwrap().target(),
            "debug-linux-generic32"
        );
        assert_eq!(
            resolver.resolve(&arm, &version, None).unwrap().target(),
            "linux-generic32"
        );

        assert!(Config::parse("[[modulation]]\nprefix = \"p-\"\narch = [\"[x\"]\n", "t").is_err());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            Config::parse("bogus = 1", "bad.toml"),
            Err(Error::Config { ref path, .. }) if path == "bad.toml"
        ));
        assert!(Config::parse("[[rule]]\npattern = \"Linux\"\ntarget = \"x\"\n", "t").is_err());
        let bad_version = "[[modulation]]\nprefix = \"p-\"\nversion = \"< abc\"\n";
        assert!(Config::parse(bad_version, "t").is_err());
        assert!(Config::parse("override_var = \"\"", "t").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("targets.toml");
        std::fs::write(&path, "override_var = \"X_CONFIGURATION\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.override_var, "X_CONFIGURATION");

        let loaded = Config::load_or_default(Some(path.as_path())).unwrap();
        assert_eq!(loaded, config);

        assert!(Config::load(&temp.path().join("missing.toml")).is_err());
    }
}
