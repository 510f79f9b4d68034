// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Platform arguments shared by `resolve` and `plan`
fn settings_args() -> Vec<Arg> {
    vec![
        Arg::new("os")
            .long("os")
            .required(true)
            .help("Operating system, e.g. Linux, Windows, Macos"),
        Arg::new("arch")
            .long("arch")
            .required(true)
            .help("Architecture, e.g. x86, x86_64, armv8"),
        Arg::new("compiler")
            .long("compiler")
            .required(true)
            .help("Compiler, e.g. gcc, clang, \"Visual Studio\""),
        Arg::new("compiler_version")
            .long("compiler-version")
            .default_value("")
            .help("Compiler version"),
        Arg::new("build_type")
            .long("build-type")
            .default_value("Release")
            .help("Build type: Debug, Release, RelWithDebInfo, MinSizeRel"),
        Arg::new("subsystem").long("subsystem").help("Windows subsystem (cygwin, msys2, wsl)"),
        Arg::new("runtime").long("runtime").help("MSVC runtime library (MD, MT, MDd, MTd)"),
        Arg::new("version")
            .long("openssl-version")
            .required(true)
            .help("OpenSSL version being built"),
    ]
}

fn build_cli() -> Command {
    Command::new("recipe-target")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve OpenSSL Configure targets for package builds")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .global(true)
                .help("Configuration file (default: /etc/recipe-target/targets.toml if present)"),
        )
        .subcommand(
            Command::new("version")
                .about("Parse a version string and show its components")
                .arg(Arg::new("version").required(true).help("Version string, e.g. 1.1.1j")),
        )
        .subcommand(
            Command::new("compare")
                .about("Compare two version strings")
                .arg(Arg::new("left").required(true))
                .arg(Arg::new("right").required(true)),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve the Configure target for a platform")
                .args(settings_args())
                .arg(
                    Arg::new("override")
                        .long("override")
                        .help("Use this target verbatim instead of consulting the rules"),
                )
                .arg(
                    Arg::new("custom_name")
                        .long("custom-name")
                        .action(ArgAction::SetTrue)
                        .help("Also print the custom target name used for 1.1.0 and later"),
                ),
        )
        .subcommand(
            Command::new("rules")
                .about("List the rules in effect for a version")
                .arg(
                    Arg::new("version")
                        .long("openssl-version")
                        .default_value("1.1.1")
                        .help("OpenSSL version"),
                )
                .arg(
                    Arg::new("cygwin")
                        .long("cygwin")
                        .action(ArgAction::SetTrue)
                        .help("Show the Cygwin variant of the built-in table"),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Show the full build plan")
                .args(settings_args())
                .arg(
                    Arg::new("package_dir")
                        .long("package-dir")
                        .default_value("/usr/local")
                        .help("Installation prefix"),
                )
                .arg(
                    Arg::new("no_shared")
                        .long("no-shared")
                        .action(ArgAction::SetTrue)
                        .help("Build static libraries"),
                )
                .arg(
                    Arg::new("no_fpic")
                        .long("no-fpic")
                        .action(ArgAction::SetTrue)
                        .help("Build without position independent code"),
                )
                .arg(
                    Arg::new("zlib_include")
                        .long("zlib-include")
                        .help("zlib include directory (required before 1.1.0)"),
                )
                .arg(
                    Arg::new("zlib_lib")
                        .long("zlib-lib")
                        .help("zlib library directory (required before 1.1.0)"),
                )
                .arg(
                    Arg::new("zlib_name")
                        .long("zlib-name")
                        .default_value("z")
                        .help("zlib library base name"),
                )
                .arg(
                    Arg::new("zlib_shared")
                        .long("zlib-shared")
                        .action(ArgAction::SetTrue)
                        .help("Link against a shared zlib"),
                )
                .arg(
                    Arg::new("write_conf")
                        .long("write-conf")
                        .value_name("SOURCE_DIR")
                        .help("Write Configurations/20-recipe.conf into this source tree"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("recipe-target.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
