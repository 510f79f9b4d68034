// src/commands.rs
//! Command handlers for the recipe-target CLI

use crate::cli::SettingsArgs;
use anyhow::{Context, Result};
use recipe_target::configure::ZlibInfo;
use recipe_target::{
    custom_target_name, BuildPlanner, Config, Environment, OpenSslVersion, PlanRequest,
    RecipeOptions, Settings,
};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::info;

fn settings_from_args(args: &SettingsArgs) -> Settings {
    let mut settings = Settings::new(&args.os, &args.arch, &args.compiler)
        .with_compiler_version(&args.compiler_version)
        .with_build_type(args.build_type);
    if let Some(subsystem) = &args.subsystem {
        settings = settings.with_subsystem(subsystem);
    }
    if let Some(runtime) = &args.runtime {
        settings = settings.with_runtime(runtime);
    }
    settings
}

fn parse_version(s: &str) -> Result<OpenSslVersion> {
    OpenSslVersion::parse(s).with_context(|| format!("Invalid OpenSSL version '{}'", s))
}

/// Show the components of a version string
pub fn cmd_version(version: &str) -> Result<()> {
    let parsed = parse_version(version)?;

    println!("Version: {}", parsed);
    println!("  Major: {}", parsed.major());
    println!("  Minor: {}", parsed.minor());
    println!("  Patch: {}", parsed.patch());
    if let Some(letter) = parsed.build_letter() {
        println!("  Build letter: {}", letter);
    }
    if let Some(pre) = parsed.pre_release() {
        println!("  Pre-release: {}", pre);
    }

    Ok(())
}

/// Compare two version strings
pub fn cmd_compare(left: &str, right: &str) -> Result<()> {
    let left = parse_version(left)?;
    let right = parse_version(right)?;

    let symbol = match left.cmp(&right) {
        Ordering::Less => "<",
        Ordering::Equal => "==",
        Ordering::Greater => ">",
    };
    println!("{} {} {}", left, symbol, right);

    Ok(())
}

/// Resolve and print the Configure target
pub fn cmd_resolve(
    config_path: Option<&Path>,
    args: &SettingsArgs,
    override_target: Option<&str>,
    custom_name: bool,
) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let settings = settings_from_args(args);
    let version = parse_version(&args.version)?;

    let resolver = config.resolver(&version, &settings)?;
    let env = Environment::from_process();
    let resolution = resolver.resolve_with_override(&settings, &version, override_target, &env)?;

    println!("{}", resolution.target());
    if custom_name {
        println!("{}", custom_target_name(&settings, &version));
    }

    Ok(())
}

/// List the rules that apply to a version
pub fn cmd_rules(config_path: Option<&Path>, version: &str, cygwin: bool) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let version = parse_version(version)?;

    let table = config.rule_table(&version, cygwin)?;

    println!("Rules for OpenSSL {} ({}):", version, table.len());
    for rule in table.rules() {
        println!("  {:<32} {}", rule.pattern.as_str(), rule.target);
    }
    println!("\nOverride with the {} environment variable.", config.override_var);

    Ok(())
}

/// Options for `plan`
pub struct PlanArgs<'a> {
    pub settings: &'a SettingsArgs,
    pub package_dir: &'a Path,
    pub shared: bool,
    pub fpic: bool,
    pub zlib: Option<ZlibInfo>,
    pub write_conf: Option<&'a Path>,
}

/// Print the full build plan
pub fn cmd_plan(config_path: Option<&Path>, args: PlanArgs<'_>) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let settings = settings_from_args(args.settings);
    let version = parse_version(&args.settings.version)?;
    let env = Environment::from_process();

    let request = PlanRequest {
        settings: &settings,
        options: RecipeOptions {
            shared: args.shared,
            fpic: args.fpic,
        },
        version: &version,
        package_dir: args.package_dir,
        zlib: args.zlib.as_ref(),
    };
    let plan = BuildPlanner::new(&config).plan(&request, &env)?;

    println!("OpenSSL {} for {}", plan.version, settings.query());
    println!("  Ancestor target:  {}", plan.ancestor);
    println!("  Configure target: {}", plan.configure_target);
    if !plan.build_env.is_empty() {
        println!("\nEnvironment:");
        for (name, value) in &plan.build_env {
            println!("  {}={}", name, value);
        }
    }
    if !plan.patches.is_empty() {
        println!("\nSource edits:");
        for patch in &plan.patches {
            println!("  {}", patch);
        }
    }
    println!("\nConfigure:");
    println!("  perl ./Configure {}", plan.configure_args.join(" "));
    if let Some(script) = &plan.prepare_script {
        println!("\nPrepare:");
        println!("  {}", script);
    }
    println!("\nBuild:");
    println!("  {}", plan.build);
    println!("\nInstall:");
    println!("  {}", plan.install);

    if let Some(target_config) = &plan.target_config {
        println!("\nConfigurations/{}:", recipe_target::configure::CONF_FILE_NAME);
        print!("{}", target_config.render());
    }

    if let Some(source_dir) = args.write_conf {
        match plan.write_target_config(source_dir)? {
            Some(path) => info!("Wrote {}", path.display()),
            None => println!("\nOpenSSL {} uses no custom target; nothing written.", version),
        }
    }

    Ok(())
}

/// Assemble zlib information from the `plan` flags
pub fn zlib_from_args(
    include: Option<PathBuf>,
    lib: Option<PathBuf>,
    name: String,
    shared: bool,
) -> Option<ZlibInfo> {
    match (include, lib) {
        (Some(include_dir), Some(lib_dir)) => Some(ZlibInfo {
            include_dir,
            lib_dir,
            lib_name: name,
            shared,
        }),
        _ => None,
    }
}
