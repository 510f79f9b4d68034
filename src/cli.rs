// src/cli.rs
//! CLI definitions for recipe-target
//!
//! Command implementations live in the `commands` module.

use clap::{Args, Parser, Subcommand};
use recipe_target::BuildType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipe-target")]
#[command(version)]
#[command(about = "Resolve OpenSSL Configure targets for package builds", long_about = None)]
pub struct Cli {
    /// Configuration file (default: /etc/recipe-target/targets.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Platform settings shared by the resolving commands
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Operating system, e.g. Linux, Windows, Macos
    #[arg(long)]
    pub os: String,

    /// Architecture, e.g. x86, x86_64, armv8
    #[arg(long)]
    pub arch: String,

    /// Compiler, e.g. gcc, clang, "Visual Studio"
    #[arg(long)]
    pub compiler: String,

    /// Compiler version
    #[arg(long, default_value = "")]
    pub compiler_version: String,

    /// Build type: Debug, Release, RelWithDebInfo, MinSizeRel
    #[arg(long, default_value = "Release")]
    pub build_type: BuildType,

    /// Windows subsystem (cygwin, msys2, wsl)
    #[arg(long)]
    pub subsystem: Option<String>,

    /// MSVC runtime library (MD, MT, MDd, MTd)
    #[arg(long)]
    pub runtime: Option<String>,

    /// OpenSSL version being built
    #[arg(long = "openssl-version")]
    pub version: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a version string and show its components
    Version {
        /// Version string, e.g. 1.1.1j
        version: String,
    },

    /// Compare two version strings
    Compare {
        left: String,
        right: String,
    },

    /// Resolve the Configure target for a platform
    Resolve {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Use this target verbatim instead of consulting the rules
        #[arg(long = "override")]
        override_target: Option<String>,

        /// Also print the custom target name used for 1.1.0 and later
        #[arg(long)]
        custom_name: bool,
    },

    /// List the rules in effect for a version
    Rules {
        /// OpenSSL version
        #[arg(long = "openssl-version", default_value = "1.1.1")]
        version: String,

        /// Show the Cygwin variant of the built-in table
        #[arg(long)]
        cygwin: bool,
    },

    /// Show the full build plan
    Plan {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Installation prefix
        #[arg(long, default_value = "/usr/local")]
        package_dir: PathBuf,

        /// Build static libraries
        #[arg(long)]
        no_shared: bool,

        /// Build without position independent code
        #[arg(long)]
        no_fpic: bool,

        /// zlib include directory (required before 1.1.0)
        #[arg(long)]
        zlib_include: Option<PathBuf>,

        /// zlib library directory (required before 1.1.0)
        #[arg(long)]
        zlib_lib: Option<PathBuf>,

        /// zlib library base name
        #[arg(long, default_value = "z")]
        zlib_name: String,

        /// Link against a shared zlib
        #[arg(long)]
        zlib_shared: bool,

        /// Write Configurations/20-recipe.conf into this source tree
        #[arg(long)]
        write_conf: Option<PathBuf>,
    },
}
