// src/configure/conf.rs

//! Custom target definitions for OpenSSL 1.1.0+
//!
//! Newer releases read target definitions from `Configurations/*.conf`
//! Perl snippets. Rather than patching the shipped targets, the recipe
//! writes one extra file defining a custom target that inherits from the
//! resolved ancestor and layers the package manager's flags and tools on
//! top.

use crate::error::Result;
use crate::settings::{Environment, RecipeOptions, Settings};
use crate::version::{OpenSslVersion, V1_1_1};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name written under `Configurations/`
pub const CONF_FILE_NAME: &str = "20-recipe.conf";

/// Compiler and linker flags supplied by the build environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFlags {
    pub cflags: Vec<String>,
    pub cxxflags: Vec<String>,
    pub defines: Vec<String>,
    pub include_paths: Vec<String>,
    pub link_flags: Vec<String>,
}

impl BuildFlags {
    /// Collect flags from the usual autotools variables
    ///
    /// `-D` and `-I` words of CPPFLAGS become defines and include paths.
    pub fn from_env(env: &Environment) -> Self {
        let mut flags = Self {
            cflags: env.words("CFLAGS"),
            cxxflags: env.words("CXXFLAGS"),
            link_flags: env.words("LDFLAGS"),
            ..Self::default()
        };
        for word in env.words("CPPFLAGS") {
            if let Some(define) = word.strip_prefix("-D") {
                flags.defines.push(define.to_string());
            } else if let Some(include) = word.strip_prefix("-I") {
                flags.include_paths.push(include.to_string());
            }
        }
        flags
    }
}

/// Tools taken from the environment when set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOverrides {
    pub cc: Option<String>,
    pub cxx: Option<String>,
    pub ar: Option<String>,
    pub ranlib: Option<String>,
}

impl ToolOverrides {
    pub fn from_env(env: &Environment) -> Self {
        let tool = |name: &str| env.get_non_empty(name).map(|s| s.to_string());
        Self {
            cc: tool("CC"),
            cxx: tool("CXX"),
            ar: tool("AR"),
            ranlib: tool("RANLIB"),
        }
    }
}

/// One custom target definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    /// `my %targets` from 1.1.1 on, `%targets` before
    pub declaration: &'static str,
    pub name: String,
    pub ancestor: String,
    pub flags: BuildFlags,
    pub tools: ToolOverrides,
    pub windows: bool,
    pub shared_target: Option<&'static str>,
    pub shared_cflag: Option<&'static str>,
    pub shared_extension: Option<&'static str>,
}

impl TargetConfig {
    pub fn new(
        settings: &Settings,
        options: RecipeOptions,
        version: &OpenSslVersion,
        name: impl Into<String>,
        ancestor: impl Into<String>,
        flags: BuildFlags,
        tools: ToolOverrides,
    ) -> Self {
        let declaration = if *version >= V1_1_1 { "my %targets" } else { "%targets" };

        // Neutrino's ancestor targets carry no shared library settings
        let neutrino = settings.os == "Neutrino";
        let shared = neutrino && options.shared;
        Self {
            declaration,
            name: name.into(),
            ancestor: ancestor.into(),
            flags,
            tools,
            windows: settings.is_windows(),
            shared_target: shared.then_some("gnu-shared"),
            shared_cflag: (neutrino && options.fpic).then_some("-fPIC"),
            shared_extension: shared.then_some(".so.\\$(SHLIB_VERSION_NUMBER)"),
        }
    }

    /// Render the Perl snippet
    pub fn render(&self) -> String {
        let mut includes = self
            .flags
            .include_paths
            .iter()
            .map(|p| format!("\"{}\"", p))
            .collect::<Vec<_>>()
            .join(", ");
        if self.windows {
            // Configure mangles backslashes
            includes = includes.replace('\\', "/");
        }

        let mut body = String::new();
        let mut field = |line: String| {
            let _ = writeln!(body, "        {}", line);
        };

        field(format!("inherit_from => [ \"{}\" ],", self.ancestor));
        field(format!("cflags => add(\"{}\"),", self.flags.cflags.join(" ")));
        field(format!("cxxflags => add(\"{}\"),", self.flags.cxxflags.join(" ")));
        if !self.flags.defines.is_empty() {
            field(format!("defines => add(\"{}\"),", self.flags.defines.join(" ")));
        }
        field(format!("includes => add({}),", includes));
        field(format!("lflags => add(\"{}\"),", self.flags.link_flags.join(" ")));
        if let Some(v) = self.shared_target {
            field(format!("shared_target  => \"{}\",", v));
        }
        if let Some(v) = self.shared_cflag {
            field(format!("shared_cflag => \"{}\",", v));
        }
        if let Some(v) = self.shared_extension {
            field(format!("shared_extension => \"{}\",", v));
        }
        for (key, value) in [
            ("cc", &self.tools.cc),
            ("cxx", &self.tools.cxx),
            ("ar", &self.tools.ar),
            ("ranlib", &self.tools.ranlib),
        ] {
            if let Some(value) = value {
                field(format!("{} => \"{}\",", key, value));
            }
        }

        format!(
            "{} = (\n    \"{}\" => {{\n{}    }},\n);\n",
            self.declaration, self.name, body
        )
    }

    /// Write the snippet into `<source_dir>/Configurations/`
    pub fn write_to(&self, source_dir: &Path) -> Result<PathBuf> {
        let dir = source_dir.join("Configurations");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(CONF_FILE_NAME);
        std::fs::write(&path, self.render())?;
        info!("Using target: {} -> {}", self.name, self.ancestor);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux_config(version: &str) -> TargetConfig {
        let settings = Settings::new("Linux", "x86_64", "gcc");
        let version = OpenSslVersion::parse(version).unwrap();
        let flags = BuildFlags {
            cflags: vec!["-O2".to_string(), "-g".to_string()],
            include_paths: vec!["/deps/zlib/include".to_string()],
            ..BuildFlags::default()
        };
        TargetConfig::new(
            &settings,
            RecipeOptions::default(),
            &version,
            "recipe-Release-Linux-x86_64-gcc-9",
            "linux-x86_64",
            flags,
            ToolOverrides::default(),
        )
    }

    #[test]
    fn test_render_linux() {
        let rendered = linux_config("1.1.1j").render();
        let expected = concat!(
            "my %targets = (\n",
            "    \"recipe-Release-Linux-x86_64-gcc-9\" => {\n",
            "        inherit_from => [ \"linux-x86_64\" ],\n",
            "        cflags => add(\"-O2 -g\"),\n",
            "        cxxflags => add(\"\"),\n",
            "        includes => add(\"/deps/zlib/include\"),\n",
            "        lflags => add(\"\"),\n",
            "    },\n",
            ");\n",
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_declaration_before_1_1_1() {
        assert!(linux_config("1.1.0l").render().starts_with("%targets = ("));
    }

    #[test]
    fn test_tools_and_defines() {
        let env = Environment::new()
            .with_var("CC", "clang")
            .with_var("AR", "llvm-ar")
            .with_var("CPPFLAGS", "-DNDEBUG -I/opt/include -Wall");
        let mut config = linux_config("1.1.1j");
        config.flags = BuildFlags::from_env(&env);
        config.tools = ToolOverrides::from_env(&env);

        let rendered = config.render();
        assert!(rendered.contains("defines => add(\"NDEBUG\"),"));
        assert!(rendered.contains("includes => add(\"/opt/include\"),"));
        assert!(rendered.contains("cc => \"clang\","));
        assert!(rendered.contains("ar => \"llvm-ar\","));
        assert!(!rendered.contains("cxx =>"));
        assert!(!rendered.contains("ranlib =>"));
    }

    #[test]
    fn test_windows_includes_use_forward_slashes() {
        let settings = Settings::new("Windows", "x86_64", "Visual Studio");
        let version = OpenSslVersion::parse("1.1.1j").unwrap();
        let flags = BuildFlags {
            include_paths: vec![r"C:\deps\include".to_string()],
            ..BuildFlags::default()
        };
        let config = TargetConfig::new(
            &settings,
            RecipeOptions::default(),
            &version,
            "VC-recipe",
            "VC-WIN64A",
            flags,
            ToolOverrides::default(),
        );
        assert!(config.render().contains("includes => add(\"C:/deps/include\"),"));
    }

    #[test]
    fn test_neutrino_shared_settings() {
        let settings = Settings::new("Neutrino", "armv7", "qcc");
        let version = OpenSslVersion::parse("1.1.1j").unwrap();
        let config = TargetConfig::new(
            &settings,
            RecipeOptions::default(),
            &version,
            "recipe",
            "linux-generic32",
            BuildFlags::default(),
            ToolOverrides::default(),
        );
        let rendered = config.render();
        assert!(rendered.contains("shared_target  => \"gnu-shared\","));
        assert!(rendered.contains("shared_cflag => \"-fPIC\","));
        assert!(rendered.contains("shared_extension => \".so.\\$(SHLIB_VERSION_NUMBER)\","));

        assert!(!linux_config("1.1.1j").render().contains("shared_target"));
    }

    #[test]
    fn test_write_to_source_dir() {
        let temp = tempfile::tempdir().unwrap();
        let path = linux_config("1.1.1j").write_to(temp.path()).unwrap();
        assert_eq!(path, temp.path().join("Configurations").join(CONF_FILE_NAME));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("inherit_from => [ \"linux-x86_64\" ]"));
    }
}
