// tests/config_file.rs

//! Loading configuration files and resolving through them.

mod common;

use common::{debug, linux, version, write_config};
use recipe_target::{Config, Error, Settings};

const LEGACY_QNX: &str = r#"
override_var = "QNX_SSL_TARGET"

[[rule]]
pattern = "Neutrino-*-qcc"
target = "nto-generic"

[[rule]]
pattern = "Linux-*-*"
target = "linux-generic64"

[[modulation]]
name = "legacy-debug"
prefix = "debug-"
version = "< 1.1.0"
build_type = "Debug"
targets = ["linux-*"]

[[modulation]]
name = "qnx"
prefix = "qnx-"
os = "Neutrino"
"#;

#[test]
fn test_configured_rules_and_modulations() {
    let (_temp, path) = write_config(LEGACY_QNX);
    let config = Config::load_or_default(Some(path.as_path())).unwrap();

    let qnx = Settings::new("Neutrino", "armv7", "qcc");
    let v = version("1.1.1j");
    let resolver = config.resolver(&v, &qnx).unwrap();
    assert_eq!(resolver.override_var(), "QNX_SSL_TARGET");
    assert_eq!(resolver.resolve(&qnx, &v, None).unwrap().target(), "qnx-nto-generic");

    let legacy = version("1.0.2u");
    let settings = debug(linux("x86_64", "gcc"));
    let resolver = config.resolver(&legacy, &settings).unwrap();
    assert_eq!(
        resolver.resolve(&settings, &legacy, None).unwrap().target(),
        "debug-linux-generic64"
    );
}

#[test]
fn test_rule_table_listing() {
    let (_temp, path) = write_config(LEGACY_QNX);
    let config = Config::load(&path).unwrap();
    let table = config.rule_table(&version("3.0.0"), false).unwrap();
    let patterns: Vec<&str> = table.rules().iter().map(|r| r.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["Neutrino-*-qcc", "Linux-*-*"]);

    let builtin = Config::default().rule_table(&version("3.0.0"), false).unwrap();
    assert_eq!(builtin.len(), 11);
}

#[test]
fn test_bad_config_names_file() {
    let (_temp, path) = write_config("[[rule]]\npattern = \"Linux-[x86-*\"\ntarget = \"t\"\n");
    let err = Config::load(&path).unwrap_err();
    match err {
        Error::Config { path: reported, .. } => assert_eq!(reported, path.display().to_string()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("nope.toml");
    assert!(Config::load_or_default(Some(missing.as_path())).is_err());
}
