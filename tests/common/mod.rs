// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use recipe_target::{BuildType, Environment, OpenSslVersion, Settings};
use std::path::PathBuf;
use tempfile::TempDir;

/// Release strings in ascending order
pub const ASCENDING_VERSIONS: &[&str] = &[
    "0.9.8",
    "0.9.8h",
    "1.0.0",
    "1.0.1u",
    "1.0.2",
    "1.0.2c",
    "1.0.2d",
    "1.0.2u",
    "1.1.0",
    "1.1.0l",
    "1.1.1",
    "1.1.1j",
    "3.0.0",
    "3.0.0-alpha1",
    "3.0.0-beta1",
    "3.0.1",
];

pub fn version(s: &str) -> OpenSslVersion {
    OpenSslVersion::parse(s).unwrap()
}

pub fn linux(arch: &str, compiler: &str) -> Settings {
    Settings::new("Linux", arch, compiler).with_compiler_version("11")
}

pub fn windows(arch: &str, compiler: &str) -> Settings {
    Settings::new("Windows", arch, compiler).with_compiler_version("16")
}

pub fn debug(settings: Settings) -> Settings {
    settings.with_build_type(BuildType::Debug)
}

/// Environment with a fixed make program so tests never search PATH
pub fn build_env() -> Environment {
    Environment::new().with_var("MAKE_PROGRAM", "make")
}

/// Write a configuration file into a fresh temp dir.
///
/// Returns (TempDir, path) - keep the TempDir alive to prevent cleanup.
pub fn write_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("targets.toml");
    std::fs::write(&path, content).unwrap();
    (temp_dir, path)
}
