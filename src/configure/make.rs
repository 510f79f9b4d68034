// src/configure/make.rs

//! make / nmake invocations for building and installing OpenSSL

use crate::error::{Error, Result};
use crate::settings::{Environment, RecipeOptions, Settings};
use crate::version::{OpenSslVersion, V1_0_2D, V1_1_0};
use std::fmt;
use tracing::debug;

/// Environment variable naming the make program to use
pub const MAKE_PROGRAM_VAR: &str = "MAKE_PROGRAM";

/// A single make run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeInvocation {
    pub program: String,
    pub makefile: Option<String>,
    pub targets: Vec<String>,
    /// `-jN`; `None` for nmake, which has no job flag
    pub jobs: Option<u32>,
}

impl MakeInvocation {
    /// Arguments after the program name
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(makefile) = &self.makefile {
            args.push("-f".to_string());
            args.push(makefile.clone());
        }
        args.extend(self.targets.iter().cloned());
        if let Some(jobs) = self.jobs {
            args.push(format!("-j{}", jobs));
        }
        args
    }
}

impl fmt::Display for MakeInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in self.args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Locate the make program
///
/// nmake toolchains always use `nmake`. Otherwise the `MAKE_PROGRAM`
/// variable wins, then `make` or `mingw32-make` on the snapshot's PATH.
pub fn make_program(settings: &Settings, env: &Environment) -> Result<String> {
    if settings.uses_nmake() {
        return Ok("nmake".to_string());
    }
    if let Some(program) = env.get_non_empty(MAKE_PROGRAM_VAR) {
        return Ok(program.to_string());
    }

    let search_path = env.get_non_empty("PATH");
    let cwd = std::env::current_dir()?;
    let found = which::which_in("make", search_path, &cwd)
        .or_else(|_| which::which_in("mingw32-make", search_path, &cwd))
        .map_err(|_| Error::ToolNotFound {
            tool: "make".to_string(),
            hint: MAKE_PROGRAM_VAR.to_string(),
        })?;
    debug!("Found make program at {}", found.display());
    Ok(found.display().to_string())
}

/// Legacy nmake builds (before 1.1.0) go through the `ms\` makefiles
fn legacy_nmake(settings: &Settings, version: &OpenSslVersion) -> bool {
    settings.uses_nmake() && *version < V1_1_0
}

fn nmake_makefile(options: RecipeOptions) -> String {
    let makefile = if options.shared { r"ms\ntdll.mak" } else { r"ms\nt.mak" };
    makefile.to_string()
}

/// Script that generates the legacy nmake makefiles
pub fn legacy_prepare_script(settings: &Settings, version: &OpenSslVersion) -> Option<String> {
    if !legacy_nmake(settings, version) {
        return None;
    }
    let script = if settings.arch == "x86" { r"ms\do_ms" } else { r"ms\do_win64a" };
    Some(script.to_string())
}

/// Parallelism for the build step
///
/// Releases before 1.0.2d race in parallel builds, and macOS `ar` corrupts
/// archives on pre-1.1.0 parallel builds.
pub fn build_jobs(settings: &Settings, version: &OpenSslVersion, cpu_count: u32) -> Option<u32> {
    if settings.uses_nmake() {
        return None;
    }
    if *version < V1_0_2D || (settings.os == "Macos" && *version < V1_1_0) {
        debug!("Forcing serial build for OpenSSL {} on {}", version, settings.os);
        return Some(1);
    }
    Some(cpu_count.max(1))
}

/// The build invocation
pub fn build_invocation(
    program: &str,
    settings: &Settings,
    options: RecipeOptions,
    version: &OpenSslVersion,
    cpu_count: u32,
) -> MakeInvocation {
    MakeInvocation {
        program: program.to_string(),
        makefile: legacy_nmake(settings, version).then(|| nmake_makefile(options)),
        targets: Vec::new(),
        jobs: build_jobs(settings, version, cpu_count),
    }
}

/// The install invocation; always serial
pub fn install_invocation(
    program: &str,
    settings: &Settings,
    options: RecipeOptions,
    version: &OpenSslVersion,
) -> MakeInvocation {
    let legacy = legacy_nmake(settings, version);
    MakeInvocation {
        program: program.to_string(),
        makefile: legacy.then(|| nmake_makefile(options)),
        targets: vec![if legacy { "install" } else { "install_sw" }.to_string()],
        jobs: (!settings.uses_nmake()).then_some(1),
    }
}
