// src/configure/patch.rs

//! In-place source edits and the build environment
//!
//! Releases before 1.1.0 have no `Configurations/` mechanism, so the
//! package manager's compiler, flags and tools are pushed in by editing
//! `Makefile.org` and by setting `CC` for the Configure run. nmake builds
//! additionally get their MSVC runtime flag rewritten in whichever file
//! carries it for the release. Each edit is a plain string substitution
//! tied to the build stage it has to run before.

use crate::error::{Error, Result};
use crate::settings::{Environment, RecipeOptions, Settings};
use crate::version::{OpenSslVersion, V1_1_0, V1_1_1};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runtime flags that may appear in shipped nmake files
const MSVC_RUNTIMES: [&str; 4] = ["MDd", "MTd", "MD", "MT"];

/// When an edit has to happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchStage {
    /// On the pristine source tree
    BeforeConfigure,
    /// On the makefiles Configure generated
    AfterConfigure,
    /// On the makefiles the legacy nmake prepare script generated
    AfterPrepare,
}

impl PatchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchStage::BeforeConfigure => "before-configure",
            PatchStage::AfterConfigure => "after-configure",
            PatchStage::AfterPrepare => "after-prepare",
        }
    }
}

impl fmt::Display for PatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replace every occurrence of `search` in one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePatch {
    pub stage: PatchStage,
    /// Path relative to the source directory
    pub file: PathBuf,
    pub search: String,
    pub replace: String,
    /// Fail when `search` is absent instead of skipping
    pub required: bool,
}

impl SourcePatch {
    pub fn required(
        stage: PatchStage,
        file: impl Into<PathBuf>,
        search: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            file: file.into(),
            search: search.into(),
            replace: replace.into(),
            required: true,
        }
    }

    pub fn optional(
        stage: PatchStage,
        file: impl Into<PathBuf>,
        search: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(stage, file, search, replace)
        }
    }

    /// Apply to a source tree; returns whether the file changed
    pub fn apply(&self, source_dir: &Path) -> Result<bool> {
        let path = source_dir.join(&self.file);
        let content = std::fs::read_to_string(&path)?;
        if !content.contains(&self.search) {
            if self.required {
                return Err(Error::PatchNotApplied {
                    file: self.file.display().to_string(),
                    search: self.search.clone(),
                });
            }
            debug!("'{}' not in {}, skipping", self.search.escape_debug(), path.display());
            return Ok(false);
        }
        std::fs::write(&path, content.replace(&self.search, &self.replace))?;
        debug!("Patched {}", path.display());
        Ok(true)
    }
}

impl fmt::Display for SourcePatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: \"{}\" -> \"{}\"",
            self.stage,
            self.file.display(),
            self.search.escape_debug(),
            self.replace.escape_debug()
        )
    }
}

/// Apply the patches of one stage in order; returns how many changed a file
pub fn apply_patches(
    patches: &[SourcePatch],
    stage: PatchStage,
    source_dir: &Path,
) -> Result<usize> {
    let mut changed = 0;
    for patch in patches.iter().filter(|p| p.stage == stage) {
        if patch.apply(source_dir)? {
            changed += 1;
        }
    }
    info!("Applied {} {} patch(es) in {}", changed, stage, source_dir.display());
    Ok(changed)
}

/// C compiler for releases before 1.1.0
///
/// A cross build always drives `gcc` through CROSS_COMPILE. Otherwise CC
/// wins, then `gcc` for gcc settings, then `cc`.
pub fn legacy_cc(settings: &Settings, env: &Environment) -> String {
    if env.get("CROSS_COMPILE").is_some() {
        return "gcc".to_string();
    }
    if let Some(cc) = env.get("CC") {
        return cc.to_string();
    }
    let fallback = if settings.compiler == "gcc" { "gcc" } else { "cc" };
    fallback.to_string()
}

/// Variables set for the Configure and make runs
pub fn build_environment(
    settings: &Settings,
    version: &OpenSslVersion,
    env: &Environment,
    perl: &str,
) -> Vec<(String, String)> {
    let mut vars = vec![("PERL".to_string(), perl.to_string())];
    if *version < V1_1_0 {
        vars.push(("CC".to_string(), compiler_line(settings, env)));
    }
    vars
}

/// `<cc> <CFLAGS>`, or just the compiler without flags
fn compiler_line(settings: &Settings, env: &Environment) -> String {
    let mut words = vec![legacy_cc(settings, env)];
    words.extend(env.words("CFLAGS"));
    words.join(" ")
}

/// All source edits a build needs, in application order
pub fn source_patches(
    settings: &Settings,
    options: RecipeOptions,
    version: &OpenSslVersion,
    env: &Environment,
) -> Vec<SourcePatch> {
    let mut patches = Vec::new();
    let legacy = *version < V1_1_0;

    if legacy {
        // Only a bare `ar` is replaced, not tool names starting with it
        patches.push(SourcePatch::required(
            PatchStage::BeforeConfigure,
            "Configure",
            r"s/^AR=\s*ar/AR= $ar/;",
            r"s/^AR=\s*ar\b/AR= $ar/;",
        ));
        if env.get("CROSS_COMPILE").is_none() {
            patches.extend(makefile_org_patches(settings, env));
        }
    }

    if settings.uses_nmake() && !legacy {
        if let Some(runtime) = &settings.runtime {
            patches.extend(runtime_patches(
                PatchStage::BeforeConfigure,
                Path::new("Configurations").join("10-main.conf"),
                runtime,
            ));
        }
    }

    if settings.os == "Macos" && options.shared {
        let makefile = if *version >= V1_1_1 { "Makefile" } else { "Makefile.shared" };
        patches.push(SourcePatch::optional(
            PatchStage::AfterConfigure,
            makefile,
            "-install_name $(INSTALLTOP)/$(LIBDIR)/",
            "-install_name ",
        ));
    }

    if settings.uses_nmake() && legacy {
        let makefiles = [Path::new("ms").join("nt.mak"), Path::new("ms").join("ntdll.mak")];
        if let Some(runtime) = &settings.runtime {
            for makefile in &makefiles {
                patches.extend(runtime_patches(PatchStage::AfterPrepare, makefile, runtime));
            }
        }
        if settings.arch == "x86" {
            for makefile in makefiles {
                patches.push(SourcePatch::required(PatchStage::AfterPrepare, makefile, "-WX", ""));
            }
        }
    }

    patches
}

/// Hard-wire the environment's compiler and tools into `Makefile.org`
fn makefile_org_patches(settings: &Settings, env: &Environment) -> Vec<SourcePatch> {
    let windows = settings.is_windows();
    let tool_path = |value: &str| {
        if windows { value.replace('\\', "/") } else { value.to_string() }
    };
    let makefile = |search: &str, replace: String| {
        SourcePatch::required(PatchStage::BeforeConfigure, "Makefile.org", search, replace)
    };

    let mut patches = vec![makefile(
        "CC= cc\n",
        format!("CC= {}\n", tool_path(&compiler_line(settings, env))),
    )];
    if let Some(ar) = env.get_non_empty("AR") {
        patches.push(makefile(
            "AR=ar $(ARFLAGS) r\n",
            format!("AR={} $(ARFLAGS) r\n", tool_path(ar)),
        ));
    }
    if let Some(ranlib) = env.get_non_empty("RANLIB") {
        patches.push(makefile("RANLIB= ranlib\n", format!("RANLIB= {}\n", tool_path(ranlib))));
    }
    if let Some(rc) = env.get_non_empty("WINDRES").or_else(|| env.get_non_empty("RC")) {
        patches.push(makefile("RC= windres\n", format!("RC= {}\n", tool_path(rc))));
    }
    if let Some(nm) = env.get_non_empty("NM") {
        patches.push(makefile("NM= nm\n", format!("NM= {}\n", tool_path(nm))));
    }
    if let Some(assembler) = env.get_non_empty("AS") {
        patches.push(makefile("AS=$(CC) -c\n", format!("AS={}\n", tool_path(assembler))));
    }
    patches
}

/// Swap every MSVC runtime flag in a file for the configured one
fn runtime_patches(
    stage: PatchStage,
    file: impl Into<PathBuf>,
    runtime: &str,
) -> Vec<SourcePatch> {
    let file = file.into();
    MSVC_RUNTIMES
        .iter()
        .filter(|flag| **flag != runtime)
        .flat_map(|flag| {
            [
                SourcePatch::optional(
                    stage,
                    file.clone(),
                    format!("/{} ", flag),
                    format!("/{} ", runtime),
                ),
                SourcePatch::optional(
                    stage,
                    file.clone(),
                    format!("/{}\"", flag),
                    format!("/{}\"", runtime),
                ),
            ]
        })
        .collect()
}
