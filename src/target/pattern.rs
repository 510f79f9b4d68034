// src/target/pattern.rs

//! Platform patterns of the form `OS-ARCH-COMPILER`
//!
//! Each segment is an independent glob, so `*` stands for exactly one
//! segment value. The pattern is split on the first two hyphens only, which
//! keeps hyphenated compiler names such as "apple-clang" intact.

use crate::error::{Error, Result};
use glob::Pattern;
use std::fmt;

/// A compiled `OS-ARCH-COMPILER` glob
#[derive(Debug, Clone)]
pub struct PlatformPattern {
    source: String,
    os: Pattern,
    arch: Pattern,
    compiler: Pattern,
}

impl PlatformPattern {
    /// Compile a pattern such as "Linux-x86_64-*" or "Windows-*-Visual Studio"
    pub fn parse(s: &str) -> Result<Self> {
        let segments: Vec<&str> = s.splitn(3, '-').collect();
        if segments.len() != 3 || segments.iter().any(|seg| seg.is_empty()) {
            return Err(Error::InvalidPattern {
                pattern: s.to_string(),
                reason: "expected OS-ARCH-COMPILER".to_string(),
            });
        }

        Ok(Self {
            source: s.to_string(),
            os: compile_segment(s, segments[0])?,
            arch: compile_segment(s, segments[1])?,
            compiler: compile_segment(s, segments[2])?,
        })
    }

    /// Check a platform triple against this pattern
    pub fn matches(&self, os: &str, arch: &str, compiler: &str) -> bool {
        self.os.matches(os) && self.arch.matches(arch) && self.compiler.matches(compiler)
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

pub(crate) fn compile_segment(pattern: &str, segment: &str) -> Result<Pattern> {
    Pattern::new(segment).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

impl fmt::Display for PlatformPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for PlatformPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PlatformPattern {}
