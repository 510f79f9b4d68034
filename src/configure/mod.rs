// src/configure/mod.rs

//! Configure, build and install steps for an OpenSSL recipe
//!
//! Target resolution only names an ancestor. This module turns it into
//! concrete work:
//!
//! - [`SupportPolicy`] rejects settings a recipe refuses to build
//! - [`configure_args`] produces the argv for `./Configure`
//! - [`TargetConfig`] renders `Configurations/20-recipe.conf` on 1.1.0+
//! - [`SourcePatch`] edits the source tree where a release has no such file
//! - [`MakeInvocation`] describes the make or nmake runs
//! - [`BuildPlanner`] ties it together into a [`BuildPlan`]

mod args;
mod conf;
mod make;
mod patch;
mod plan;
mod policy;

pub use args::{configure_args, ConfigureInputs, ZlibInfo};
pub use conf::{BuildFlags, TargetConfig, ToolOverrides, CONF_FILE_NAME};
pub use make::{
    build_invocation, build_jobs, install_invocation, legacy_prepare_script, make_program,
    MakeInvocation, MAKE_PROGRAM_VAR,
};
pub use patch::{
    apply_patches, build_environment, legacy_cc, source_patches, PatchStage, SourcePatch,
};
pub use plan::{BuildPlan, BuildPlanner, PlanRequest};
pub use policy::SupportPolicy;
