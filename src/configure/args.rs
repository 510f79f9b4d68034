// src/configure/args.rs

//! Command-line arguments for OpenSSL's Configure script
//!
//! Arguments are produced in argv form. Callers hand them to the process
//! spawner directly, so nothing here is shell-quoted.

use crate::error::{Error, Result};
use crate::settings::{RecipeOptions, Settings};
use crate::version::{OpenSslVersion, V1_1_0, V1_1_1};
use std::path::{Path, PathBuf};

/// Location of the zlib dependency, needed by releases before 1.1.0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZlibInfo {
    pub include_dir: PathBuf,
    pub lib_dir: PathBuf,
    /// Library base name, e.g. "zlib" or "z"
    pub lib_name: String,
    pub shared: bool,
}

/// Everything Configure arguments depend on
#[derive(Debug, Clone, Copy)]
pub struct ConfigureInputs<'a> {
    pub settings: &'a Settings,
    pub options: RecipeOptions,
    pub version: &'a OpenSslVersion,
    /// Target handed to Configure: the custom target on 1.1.0+, the
    /// resolved ancestor otherwise
    pub target: &'a str,
    pub package_dir: &'a Path,
    pub perl: &'a str,
    pub zlib: Option<&'a ZlibInfo>,
}

/// Build the Configure argument list
pub fn configure_args(inputs: &ConfigureInputs<'_>) -> Result<Vec<String>> {
    let ConfigureInputs {
        settings,
        options,
        version,
        target,
        package_dir,
        perl,
        zlib,
    } = *inputs;

    let mut args = vec![
        target.to_string(),
        if options.shared { "shared" } else { "no-shared" }.to_string(),
        format!("--prefix={}", package_dir.display()),
        format!("--openssldir={}", package_dir.join("res").display()),
        "no-unit-test".to_string(),
        "no-threads".to_string(),
    ];

    if *version >= V1_1_1 {
        args.push(format!("PERL={}", perl));
    }
    if *version < V1_1_0 || *version >= V1_1_1 {
        args.push("no-tests".to_string());
    }
    if *version >= V1_1_0 {
        let mode = if settings.build_type.is_debug() { "--debug" } else { "--release" };
        args.push(mode.to_string());
    }

    if settings.is_windows() {
        args.push("enable-capieng".to_string());
        args.push("-DOPENSSL_CAPIENG_DIALOG=1".to_string());
    } else {
        args.push(if options.fpic { "-fPIC" } else { "no-pic" }.to_string());
    }

    if *version < V1_1_0 {
        let zlib = zlib.ok_or_else(|| Error::MissingDependency("zlib".to_string()))?;
        args.extend(zlib_args(settings, zlib));
    }

    Ok(args)
}

fn zlib_args(settings: &Settings, zlib: &ZlibInfo) -> Vec<String> {
    let mut include_path = zlib.include_dir.display().to_string();
    let mut lib_path = if settings.is_windows() {
        format!("{}/{}.lib", zlib.lib_dir.display(), zlib.lib_name)
    } else {
        // The linker finds the right file from the directory
        zlib.lib_dir.display().to_string()
    };
    if settings.is_windows() {
        // cl chokes on backslashes inside the generated CFLAGS define
        include_path = include_path.replace('\\', "/");
        lib_path = lib_path.replace('\\', "/");
    }

    vec![
        if zlib.shared { "zlib-dynamic" } else { "zlib" }.to_string(),
        format!("--with-zlib-include={}", include_path),
        format!("--with-zlib-lib={}", lib_path),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BuildType;

    fn zlib() -> ZlibInfo {
        ZlibInfo {
            include_dir: PathBuf::from("/deps/zlib/include"),
            lib_dir: PathBuf::from("/deps/zlib/lib"),
            lib_name: "z".to_string(),
            shared: true,
        }
    }

    fn args_for(
        settings: &Settings,
        options: RecipeOptions,
        version: &str,
        zlib: Option<&ZlibInfo>,
    ) -> Result<Vec<String>> {
        let version = OpenSslVersion::parse(version).unwrap();
        configure_args(&ConfigureInputs {
            settings,
            options,
            version: &version,
            target: "some-target",
            package_dir: Path::new("/pkg"),
            perl: "perl",
            zlib,
        })
    }

    #[test]
    fn test_modern_linux_args() {
        let settings = Settings::new("Linux", "x86_64", "gcc");
        let args = args_for(&settings, RecipeOptions::default(), "1.1.1j", None).unwrap();
        assert_eq!(
            args,
            vec![
                "some-target",
                "shared",
                "--prefix=/pkg",
                "--openssldir=/pkg/res",
                "no-unit-test",
                "no-threads",
                "PERL=perl",
                "no-tests",
                "--release",
                "-fPIC",
            ]
        );
    }

    #[test]
    fn test_1_1_0_has_no_perl_or_no_tests() {
        let settings = Settings::new("Linux", "x86_64", "gcc").with_build_type(BuildType::Debug);
        let options = RecipeOptions { shared: false, fpic: false };
        let args = args_for(&settings, options, "1.1.0l", None).unwrap();
        assert!(args.contains(&"no-shared".to_string()));
        assert!(args.contains(&"--debug".to_string()));
        assert!(args.contains(&"no-pic".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("PERL=")));
        assert!(!args.contains(&"no-tests".to_string()));
    }

    #[test]
    fn test_windows_args() {
        let settings = Settings::new("Windows", "x86_64", "Visual Studio");
        let args = args_for(&settings, RecipeOptions::default(), "3.0.0", None).unwrap();
        assert!(args.contains(&"enable-capieng".to_string()));
        assert!(args.contains(&"-DOPENSSL_CAPIENG_DIALOG=1".to_string()));
        assert!(!args.contains(&"-fPIC".to_string()));
    }

    #[test]
    fn test_legacy_requires_zlib() {
        let settings = Settings::new("Linux", "x86_64", "gcc");
        let err = args_for(&settings, RecipeOptions::default(), "1.0.2u", None).unwrap_err();
        assert!(matches!(err, Error::MissingDependency(ref dep) if dep == "zlib"));
    }

    #[test]
    fn test_legacy_zlib_args() {
        let settings = Settings::new("Linux", "x86_64", "gcc");
        let zlib = zlib();
        let args = args_for(&settings, RecipeOptions::default(), "1.0.2u", Some(&zlib)).unwrap();
        assert!(args.contains(&"no-tests".to_string()));
        assert!(!args.contains(&"--release".to_string()));
        assert!(args.ends_with(&[
            "zlib-dynamic".to_string(),
            "--with-zlib-include=/deps/zlib/include".to_string(),
            "--with-zlib-lib=/deps/zlib/lib".to_string(),
        ]));
    }

    #[test]
    fn test_legacy_windows_zlib_args() {
        let settings = Settings::new("Windows", "x86", "Visual Studio");
        let zlib = ZlibInfo {
            include_dir: PathBuf::from(r"C:\deps\zlib\include"),
            lib_dir: PathBuf::from(r"C:\deps\zlib\lib"),
            lib_name: "zlib".to_string(),
            shared: false,
        };
        let args = args_for(&settings, RecipeOptions::default(), "1.0.2u", Some(&zlib)).unwrap();
        assert!(args.contains(&"zlib".to_string()));
        assert!(args.contains(&"--with-zlib-include=C:/deps/zlib/include".to_string()));
        assert!(args.contains(&"--with-zlib-lib=C:/deps/zlib/lib/zlib.lib".to_string()));
    }
}
