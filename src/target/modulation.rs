// src/target/modulation.rs

//! Post-lookup modulation of target identifiers
//!
//! Some identifiers depend on more than the platform triple: legacy debug
//! builds use `debug-` targets, and custom target names carry toolchain
//! prefixes that OpenSSL's Configure keys on. Each modulation is a set of
//! conditions plus a prefix. A chain applies them in order, so a later
//! prefix ends up outermost.

use super::pattern::compile_segment;
use crate::error::Result;
use crate::settings::{BuildType, Settings};
use crate::version::{OpenSslVersion, VersionConstraint, V1_1_0};
use glob::Pattern;
use tracing::debug;

/// Inputs visible to modulation conditions
#[derive(Debug, Clone, Copy)]
pub struct ModulationContext<'a> {
    pub settings: &'a Settings,
    pub version: &'a OpenSslVersion,
}

impl<'a> ModulationContext<'a> {
    pub fn new(settings: &'a Settings, version: &'a OpenSslVersion) -> Self {
        Self { settings, version }
    }
}

/// A single predicate over the context and the identifier being modulated
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Recipe version satisfies the constraint
    Version(VersionConstraint),
    /// Build type equals
    BuildType(BuildType),
    /// Settings OS equals
    Os(String),
    /// Settings compiler equals
    Compiler(String),
    /// Settings arch matches any of the globs
    Arch(Vec<Pattern>),
    /// GCC targeting Windows
    MingwCompiler,
    /// MSVC or clang-cl
    NmakeToolchain,
    /// Identifier matches any of the globs
    Target(Vec<Pattern>),
}

impl Condition {
    /// Identifier glob condition from pattern strings
    pub fn target<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        Ok(Condition::Target(compile_all(patterns)?))
    }

    /// Arch glob condition from pattern strings
    pub fn arch<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        Ok(Condition::Arch(compile_all(patterns)?))
    }

    fn holds(&self, ctx: &ModulationContext<'_>, target: &str) -> bool {
        match self {
            Condition::Version(constraint) => constraint.satisfies(ctx.version),
            Condition::BuildType(bt) => ctx.settings.build_type == *bt,
            Condition::Os(os) => ctx.settings.os == *os,
            Condition::Compiler(compiler) => ctx.settings.compiler == *compiler,
            Condition::Arch(patterns) => patterns.iter().any(|p| p.matches(&ctx.settings.arch)),
            Condition::MingwCompiler => ctx.settings.is_mingw(),
            Condition::NmakeToolchain => ctx.settings.uses_nmake(),
            Condition::Target(patterns) => patterns.iter().any(|p| p.matches(target)),
        }
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| compile_segment(p.as_ref(), p.as_ref()))
        .collect()
}

/// Prefix applied when every condition holds
#[derive(Debug, Clone, PartialEq)]
pub struct Modulation {
    name: String,
    prefix: String,
    conditions: Vec<Condition>,
}

impl Modulation {
    /// Unconditional prefix; narrow it with [`Modulation::when`]
    pub fn prefix(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            conditions: Vec::new(),
        }
    }

    /// Add a condition
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix_str(&self) -> &str {
        &self.prefix
    }

    pub fn applies(&self, ctx: &ModulationContext<'_>, target: &str) -> bool {
        self.conditions.iter().all(|c| c.holds(ctx, target))
    }

    pub fn apply(&self, ctx: &ModulationContext<'_>, target: String) -> String {
        if self.applies(ctx, &target) {
            debug!("Modulation '{}' prefixes '{}' to {}", self.name, self.prefix, target);
            format!("{}{}", self.prefix, target)
        } else {
            target
        }
    }
}

/// Ordered modulations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModulationChain {
    modulations: Vec<Modulation>,
}

impl ModulationChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a modulation after the existing ones
    pub fn push(&mut self, modulation: Modulation) {
        self.modulations.push(modulation);
    }

    pub fn with(mut self, modulation: Modulation) -> Self {
        self.push(modulation);
        self
    }

    pub fn modulations(&self) -> &[Modulation] {
        &self.modulations
    }

    /// Run the identifier through every modulation in order
    pub fn apply(&self, ctx: &ModulationContext<'_>, target: String) -> String {
        self.modulations
            .iter()
            .fold(target, |acc, modulation| modulation.apply(ctx, acc))
    }

    /// Modulations for resolved OpenSSL targets
    ///
    /// Releases before 1.1.0 ship `debug-` variants only of the x86 and
    /// x86_64 Linux targets and of VC-WIN32/VC-WIN64A. The generic
    /// fallbacks other architectures land on have none.
    pub fn openssl_ancestor() -> Result<Self> {
        let debug = Modulation::prefix("legacy-debug", "debug-")
            .when(Condition::Version(VersionConstraint::below(V1_1_0)))
            .when(Condition::BuildType(BuildType::Debug))
            .when(Condition::arch(&["x86", "x86_64"])?)
            .when(Condition::target(&["linux-*", "VC-WIN32", "VC-WIN64A"])?);
        Ok(Self::new().with(debug))
    }

    /// Modulations for custom target names
    ///
    /// Configure only treats a target as MSVC-style when its name starts
    /// with `VC-`; MinGW targets are tagged with `mingw-`.
    pub fn openssl_target_name() -> Self {
        Self::new()
            .with(Modulation::prefix("nmake", "VC-").when(Condition::NmakeToolchain))
            .with(Modulation::prefix("mingw", "mingw-").when(Condition::MingwCompiler))
    }
}
