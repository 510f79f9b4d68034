// src/target/mod.rs

//! OpenSSL target resolution
//!
//! OpenSSL's Configure script needs a target identifier such as
//! `linux-x86_64`, `mingw64` or `VC-WIN64A`. The identifier is looked up
//! from the package manager's `OS-ARCH-COMPILER` triple:
//!
//! 1. An operator override (normally the `OPENSSL_CONFIGURATION`
//!    environment variable) wins outright and is never validated.
//! 2. Otherwise the first rule of an ordered [`RuleTable`] whose
//!    [`PlatformPattern`] matches supplies the identifier.
//! 3. The identifier is passed through a [`ModulationChain`] that adds
//!    version and build-type dependent prefixes such as `debug-`.
//!
//! No match is a fatal configuration error.

mod modulation;
mod pattern;
mod resolver;
mod table;

pub use modulation::{Condition, Modulation, ModulationChain, ModulationContext};
pub use pattern::PlatformPattern;
pub use resolver::{
    custom_target_name, Resolution, TargetResolver, CUSTOM_TARGET_PREFIX, DEFAULT_OVERRIDE_VAR,
};
pub use table::{RuleTable, TargetRule};
