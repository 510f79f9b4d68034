// src/target/table.rs

//! Ordered target rule tables
//!
//! A table maps platform patterns to OpenSSL target identifiers. Order is
//! significant: lookup walks the rules in declaration order and the first
//! match wins, so specific rules must precede general ones.

use super::pattern::PlatformPattern;
use crate::error::Result;
use crate::settings::Settings;
use crate::version::{OpenSslVersion, V1_1_0};

/// A single pattern → target mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRule {
    pub pattern: PlatformPattern,
    pub target: String,
}

impl TargetRule {
    /// Create a rule from a pattern string
    pub fn new(pattern: &str, target: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: PlatformPattern::parse(pattern)?,
            target: target.into(),
        })
    }
}

/// Ordered set of target rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<TargetRule>,
}

impl RuleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from (pattern, target) pairs, preserving their order
    pub fn from_pairs<P, T>(pairs: impl IntoIterator<Item = (P, T)>) -> Result<Self>
    where
        P: AsRef<str>,
        T: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .map(|(pattern, target)| TargetRule::new(pattern.as_ref(), target))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Append a rule after all existing ones
    pub fn push(&mut self, rule: TargetRule) {
        self.rules.push(rule);
    }

    /// First rule matching the settings' platform triple
    pub fn lookup(&self, settings: &Settings) -> Option<&TargetRule> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(&settings.os, &settings.arch, &settings.compiler))
    }

    pub fn rules(&self) -> &[TargetRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The built-in OpenSSL table for a release
    ///
    /// Releases before 1.1.0 lack the dedicated x86/clang targets and fall
    /// back to the generic ones. Cygwin builds use the Cygwin targets in
    /// place of the MinGW ones.
    pub fn openssl(version: &OpenSslVersion, cygwin: bool) -> Result<Self> {
        let legacy = *version < V1_1_0;
        let pick = |modern: &'static str, old: &'static str| if legacy { old } else { modern };
        let gcc = |cyg: &'static str, mingw: &'static str| if cygwin { cyg } else { mingw };

        let pairs = [
            ("Linux-x86-clang", pick("linux-x86-clang", "linux-generic32")),
            ("Linux-x86_64-clang", pick("linux-x86_64-clang", "linux-x86_64")),
            ("Linux-x86-*", pick("linux-x86", "linux-generic32")),
            ("Linux-x86_64-*", "linux-x86_64"),
            ("Linux-*-*", "linux-generic32"),
            ("Windows-x86-gcc", gcc("Cygwin-x86", "mingw")),
            ("Windows-x86_64-gcc", gcc("Cygwin-x86_64", "mingw64")),
            ("Windows-*-gcc", gcc("Cygwin-common", "mingw-common")),
            ("Windows-x86-Visual Studio", "VC-WIN32"),
            ("Windows-x86_64-Visual Studio", "VC-WIN64A"),
            ("Windows-*-Visual Studio", "VC-noCE-common"),
        ];

        Self::from_pairs(pairs)
    }
}
