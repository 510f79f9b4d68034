// src/target/resolver.rs

//! Target resolution: override, table lookup, modulation

use super::modulation::{ModulationChain, ModulationContext};
use super::table::RuleTable;
use crate::error::{Error, Result};
use crate::settings::{Environment, Settings};
use crate::version::OpenSslVersion;
use std::fmt;
use tracing::{debug, info};

/// Environment variable consulted for an operator override
pub const DEFAULT_OVERRIDE_VAR: &str = "OPENSSL_CONFIGURATION";

/// Prefix of generated custom target names
pub const CUSTOM_TARGET_PREFIX: &str = "recipe";

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Operator-supplied identifier, used verbatim
    Override(String),
    /// Identifier from a table rule after modulation
    Rule { pattern: String, target: String },
}

impl Resolution {
    pub fn target(&self) -> &str {
        match self {
            Resolution::Override(target) => target,
            Resolution::Rule { target, .. } => target,
        }
    }

    pub fn into_target(self) -> String {
        match self {
            Resolution::Override(target) => target,
            Resolution::Rule { target, .. } => target,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Resolution::Override(_))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Override(target) => write!(f, "{} (override)", target),
            Resolution::Rule { pattern, target } => write!(f, "{} (rule {})", target, pattern),
        }
    }
}

/// Maps settings to an OpenSSL target identifier
#[derive(Debug, Clone)]
pub struct TargetResolver {
    table: RuleTable,
    modulations: ModulationChain,
    override_var: String,
}

impl TargetResolver {
    /// Create a resolver from a table and post-lookup modulations
    pub fn new(table: RuleTable, modulations: ModulationChain) -> Self {
        Self {
            table,
            modulations,
            override_var: DEFAULT_OVERRIDE_VAR.to_string(),
        }
    }

    /// The built-in OpenSSL table and modulations for a release
    pub fn openssl(version: &OpenSslVersion, settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            RuleTable::openssl(version, settings.is_cygwin())?,
            ModulationChain::openssl_ancestor()?,
        ))
    }

    /// Name the environment variable that carries overrides
    pub fn with_override_var(mut self, name: impl Into<String>) -> Self {
        self.override_var = name.into();
        self
    }

    pub fn override_var(&self) -> &str {
        &self.override_var
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn modulations(&self) -> &ModulationChain {
        &self.modulations
    }

    /// Resolve the target for a platform
    ///
    /// A non-empty override is returned unchanged without consulting the
    /// table. Otherwise the first matching rule supplies the identifier,
    /// which is then passed through the modulation chain.
    pub fn resolve(
        &self,
        settings: &Settings,
        version: &OpenSslVersion,
        override_value: Option<&str>,
    ) -> Result<Resolution> {
        if let Some(value) = override_value.filter(|v| !v.is_empty()) {
            info!("Using target override '{}' for {}", value, settings.query());
            return Ok(Resolution::Override(value.to_string()));
        }

        let query = settings.query();
        let rule = self.table.lookup(settings).ok_or_else(|| Error::UnsupportedConfiguration {
            query: query.clone(),
            override_var: self.override_var.clone(),
        })?;
        debug!("Query '{}' matched rule '{}' -> {}", query, rule.pattern, rule.target);

        let ctx = ModulationContext::new(settings, version);
        let target = self.modulations.apply(&ctx, rule.target.clone());

        Ok(Resolution::Rule {
            pattern: rule.pattern.to_string(),
            target,
        })
    }

    /// Resolve, taking the override from an environment snapshot
    ///
    /// An empty variable counts as unset.
    pub fn resolve_with_env(
        &self,
        settings: &Settings,
        version: &OpenSslVersion,
        env: &Environment,
    ) -> Result<Resolution> {
        self.resolve(settings, version, env.get_non_empty(&self.override_var))
    }

    /// Resolve with an explicit override, falling back to the environment
    ///
    /// An empty explicit override is ignored like an empty variable.
    pub fn resolve_with_override(
        &self,
        settings: &Settings,
        version: &OpenSslVersion,
        explicit: Option<&str>,
        env: &Environment,
    ) -> Result<Resolution> {
        match explicit.filter(|v| !v.is_empty()) {
            Some(value) => self.resolve(settings, version, Some(value)),
            None => self.resolve_with_env(settings, version, env),
        }
    }
}

/// Name of the custom target a 1.1.0+ build is configured with
///
/// The name encodes the full settings so distinct configurations never
/// collide, then carries the toolchain prefixes Configure expects.
pub fn custom_target_name(settings: &Settings, version: &OpenSslVersion) -> String {
    let base = format!(
        "{}-{}-{}-{}-{}-{}",
        CUSTOM_TARGET_PREFIX,
        settings.build_type,
        settings.os,
        settings.arch,
        settings.compiler,
        settings.compiler_version
    );
    let ctx = ModulationContext::new(settings, version);
    ModulationChain::openssl_target_name().apply(&ctx, base)
}
