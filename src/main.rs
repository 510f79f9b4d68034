// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Version { version } => commands::cmd_version(&version),
        Commands::Compare { left, right } => commands::cmd_compare(&left, &right),
        Commands::Resolve {
            settings,
            override_target,
            custom_name,
        } => commands::cmd_resolve(config, &settings, override_target.as_deref(), custom_name),
        Commands::Rules { version, cygwin } => commands::cmd_rules(config, &version, cygwin),
        Commands::Plan {
            settings,
            package_dir,
            no_shared,
            no_fpic,
            zlib_include,
            zlib_lib,
            zlib_name,
            zlib_shared,
            write_conf,
        } => commands::cmd_plan(
            config,
            commands::PlanArgs {
                settings: &settings,
                package_dir: &package_dir,
                shared: !no_shared,
                fpic: !no_fpic,
                zlib: commands::zlib_from_args(zlib_include, zlib_lib, zlib_name, zlib_shared),
                write_conf: write_conf.as_deref(),
            },
        ),
    }
}
