// src/configure/plan.rs

//! Build planning: everything needed to configure, build and install
//! one OpenSSL release for one set of settings.

use super::args::{configure_args, ConfigureInputs, ZlibInfo};
use super::conf::{BuildFlags, TargetConfig, ToolOverrides};
use super::make::{
    build_invocation, install_invocation, legacy_prepare_script, make_program, MakeInvocation,
};
use super::patch::{apply_patches, build_environment, source_patches, PatchStage, SourcePatch};
use crate::config::Config;
use crate::error::Result;
use crate::settings::{Environment, RecipeOptions, Settings};
use crate::target::{custom_target_name, Resolution};
use crate::version::{OpenSslVersion, V1_1_0};
use std::path::{Path, PathBuf};
use tracing::info;

/// What to plan for
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub settings: &'a Settings,
    pub options: RecipeOptions,
    pub version: &'a OpenSslVersion,
    pub package_dir: &'a Path,
    pub zlib: Option<&'a ZlibInfo>,
}

/// A complete build plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub version: OpenSslVersion,
    /// Target resolved from the rule table or the override
    pub ancestor: Resolution,
    /// Target passed to Configure
    pub configure_target: String,
    pub configure_args: Vec<String>,
    /// Custom target definition, 1.1.0 and later only
    pub target_config: Option<TargetConfig>,
    /// Variables to set for the Configure and make runs
    pub build_env: Vec<(String, String)>,
    /// Source edits, each tagged with the stage it belongs to
    pub patches: Vec<SourcePatch>,
    /// Makefile generation script for legacy nmake builds
    pub prepare_script: Option<String>,
    pub build: MakeInvocation,
    pub install: MakeInvocation,
}

impl BuildPlan {
    /// Write the custom target definition into an unpacked source tree
    ///
    /// Returns `None` when the release needs no definition.
    pub fn write_target_config(&self, source_dir: &Path) -> Result<Option<PathBuf>> {
        self.target_config
            .as_ref()
            .map(|config| config.write_to(source_dir))
            .transpose()
    }

    /// Apply this plan's edits for one stage to an unpacked source tree
    pub fn apply_patches(&self, stage: PatchStage, source_dir: &Path) -> Result<usize> {
        apply_patches(&self.patches, stage, source_dir)
    }
}

/// Produces build plans from a configuration
#[derive(Debug, Clone)]
pub struct BuildPlanner<'c> {
    config: &'c Config,
    cpu_count: u32,
}

impl<'c> BuildPlanner<'c> {
    pub fn new(config: &'c Config) -> Self {
        let cpu_count = config.build.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get() as u32)
                .unwrap_or(1)
        });
        Self { config, cpu_count }
    }

    /// Fix the parallelism instead of probing the host
    pub fn with_cpu_count(mut self, cpu_count: u32) -> Self {
        self.cpu_count = cpu_count;
        self
    }

    pub fn cpu_count(&self) -> u32 {
        self.cpu_count
    }

    /// Plan a build
    pub fn plan(&self, request: &PlanRequest<'_>, env: &Environment) -> Result<BuildPlan> {
        let PlanRequest {
            settings,
            options,
            version,
            package_dir,
            zlib,
        } = *request;

        self.config.support.check(settings)?;

        let resolver = self.config.resolver(version, settings)?;
        let ancestor = resolver.resolve_with_env(settings, version, env)?;

        let (configure_target, target_config) = if *version >= V1_1_0 {
            let name = custom_target_name(settings, version);
            let config = TargetConfig::new(
                settings,
                options,
                version,
                name.clone(),
                ancestor.target(),
                BuildFlags::from_env(env),
                ToolOverrides::from_env(env),
            );
            (name, Some(config))
        } else {
            (ancestor.target().to_string(), None)
        };
        info!("Configuring OpenSSL {} with target {}", version, configure_target);

        let configure_args = configure_args(&ConfigureInputs {
            settings,
            options,
            version,
            target: &configure_target,
            package_dir,
            perl: &self.config.build.perl,
            zlib,
        })?;

        let build_env = build_environment(settings, version, env, &self.config.build.perl);
        let patches = source_patches(settings, options, version, env);

        let program = make_program(settings, env)?;
        let build = build_invocation(&program, settings, options, version, self.cpu_count);
        let install = install_invocation(&program, settings, options, version);

        Ok(BuildPlan {
            version: version.clone(),
            ancestor,
            configure_target,
            configure_args,
            target_config,
            build_env,
            patches,
            prepare_script: legacy_prepare_script(settings, version),
            build,
            install,
        })
    }
}
