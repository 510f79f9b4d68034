// src/version/mod.rs

//! OpenSSL version parsing and ordering
//!
//! Release strings look like `MAJOR[.MINOR[.PATCH[LETTER]]][-PRERELEASE]`,
//! e.g. "1.0.2d", "1.1.1j" or "3.0.0-beta1". Versions are ordered by the
//! tuple (major, minor, patch, letter, pre-release); an absent letter or
//! pre-release sorts below any present one, so "1.1.1" < "1.1.1j" and
//! "3.0.0" < "3.0.0-beta1".

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// First release using the `Configurations/*.conf` target mechanism
pub const V1_1_0: OpenSslVersion = OpenSslVersion::new(1, 1, 0);

/// First release that needs `PERL=` on the Configure line
pub const V1_1_1: OpenSslVersion = OpenSslVersion::new(1, 1, 1);

/// First release that builds reliably with parallel make
pub const V1_0_2D: OpenSslVersion = OpenSslVersion::new(1, 0, 2).with_build_letter('d');

/// A parsed OpenSSL release identifier
///
/// Field order matters: the derived ordering compares fields top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpenSslVersion {
    major: u64,
    minor: u64,
    patch: u64,
    build: Option<char>,
    pre: Option<String>,
}

impl OpenSslVersion {
    /// Create a plain `major.minor.patch` version
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            build: None,
            pre: None,
        }
    }

    /// Attach a patch letter, as in "1.0.2d"
    pub const fn with_build_letter(mut self, letter: char) -> Self {
        self.build = Some(letter);
        self
    }

    /// Parse a version string
    ///
    /// Examples:
    /// - "1" → 1.0.0
    /// - "1.1" → 1.1.0
    /// - "1.1.1j" → 1.1.1, letter 'j'
    /// - "3.0.0-beta1" → 3.0.0, pre-release "beta1"
    pub fn parse(s: &str) -> Result<Self> {
        let (release, pre) = match s.split_once('-') {
            Some((_, "")) => return Err(Error::parse(s, "empty pre-release tag")),
            Some((release, pre)) => (release, Some(pre.to_string())),
            None => (s, None),
        };

        let tokens: Vec<&str> = release.split('.').collect();
        if tokens.len() > 3 {
            return Err(Error::parse(s, "expected at most three dotted components"));
        }

        let major = parse_number(s, tokens[0], "major")?;
        let minor = match tokens.get(1) {
            Some(token) => parse_number(s, token, "minor")?,
            None => 0,
        };

        let (patch, build) = match tokens.get(2) {
            Some(segment) => split_patch(s, segment)?,
            None => (0, None),
        };

        Ok(Self {
            major,
            minor,
            patch,
            build,
            pre,
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Trailing patch letter ("j" in "1.1.1j")
    pub fn build_letter(&self) -> Option<char> {
        self.build
    }

    /// Pre-release tag ("beta1" in "3.0.0-beta1")
    pub fn pre_release(&self) -> Option<&str> {
        self.pre.as_deref()
    }

    /// The numeric `major.minor.patch` part, without letter or pre-release
    pub fn base(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }

    /// Compare against a raw version string, parsing it first
    pub fn compare_str(&self, other: &str) -> Result<Ordering> {
        let other = Self::parse(other)?;
        Ok(self.cmp(&other))
    }
}

fn parse_number(input: &str, token: &str, what: &str) -> Result<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::parse(
            input,
            format!("{} component '{}' is not numeric", what, token),
        ));
    }
    token
        .parse::<u64>()
        .map_err(|e| Error::parse(input, format!("{} component '{}': {}", what, token, e)))
}

fn split_patch(input: &str, segment: &str) -> Result<(u64, Option<char>)> {
    match segment.chars().last() {
        Some(last) if last.is_alphabetic() => {
            let digits = &segment[..segment.len() - last.len_utf8()];
            Ok((parse_number(input, digits, "patch")?, Some(last)))
        }
        _ => Ok((parse_number(input, segment, "patch")?, None)),
    }
}

impl fmt::Display for OpenSslVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base())?;
        if let Some(letter) = self.build {
            write!(f, "{}", letter)?;
        }
        if let Some(ref pre) = self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

impl FromStr for OpenSslVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// Comparisons against raw strings. An unparseable right-hand side is never
// equal and has no ordering.
impl PartialEq<&str> for OpenSslVersion {
    fn eq(&self, other: &&str) -> bool {
        Self::parse(other).is_ok_and(|other| *self == other)
    }
}

impl PartialOrd<&str> for OpenSslVersion {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        Self::parse(other).ok().map(|other| self.cmp(&other))
    }
}

/// How a release is compared against a bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Below,
    AtMost,
    Exactly,
    AtLeast,
    Above,
}

impl Comparison {
    fn symbol(self) -> &'static str {
        match self {
            Comparison::Below => "<",
            Comparison::AtMost => "<=",
            Comparison::Exactly => "=",
            Comparison::AtLeast => ">=",
            Comparison::Above => ">",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparison::Below => ordering == Ordering::Less,
            Comparison::AtMost => ordering != Ordering::Greater,
            Comparison::Exactly => ordering == Ordering::Equal,
            Comparison::AtLeast => ordering != Ordering::Less,
            Comparison::Above => ordering == Ordering::Greater,
        }
    }
}

/// A single bound such as `< 1.1.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBound {
    pub comparison: Comparison,
    pub version: OpenSslVersion,
}

impl VersionBound {
    fn parse(input: &str, text: &str) -> Result<Self> {
        let text = text.trim();
        // Two-character operators first so "<=" is not read as "<"
        let (comparison, rest) = [
            ("<=", Comparison::AtMost),
            (">=", Comparison::AtLeast),
            ("==", Comparison::Exactly),
            ("<", Comparison::Below),
            (">", Comparison::Above),
            ("=", Comparison::Exactly),
        ]
        .iter()
        .find_map(|(op, cmp)| text.strip_prefix(op).map(|rest| (*cmp, rest)))
        .unwrap_or((Comparison::Exactly, text));

        let version = OpenSslVersion::parse(rest.trim())
            .map_err(|e| Error::parse(input, format!("bad bound '{}': {}", text, e)))?;
        Ok(Self {
            comparison,
            version,
        })
    }

    pub fn admits(&self, version: &OpenSslVersion) -> bool {
        self.comparison.holds(version.cmp(&self.version))
    }
}

impl fmt::Display for VersionBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.comparison.symbol(), self.version)
    }
}

/// A release range written as comma-separated bounds, e.g. ">= 1.0.2d, < 1.1.0"
///
/// Every bound must admit a release for the constraint to hold. A constraint
/// without bounds (written "" or "*") admits every release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionConstraint {
    bounds: Vec<VersionBound>,
}

impl VersionConstraint {
    /// Releases strictly older than `version`
    pub fn below(version: OpenSslVersion) -> Self {
        Self::from_bound(Comparison::Below, version)
    }

    /// Releases at `version` or newer
    pub fn at_least(version: OpenSslVersion) -> Self {
        Self::from_bound(Comparison::AtLeast, version)
    }

    fn from_bound(comparison: Comparison, version: OpenSslVersion) -> Self {
        Self {
            bounds: vec![VersionBound {
                comparison,
                version,
            }],
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Self::default());
        }
        let bounds = trimmed
            .split(',')
            .map(|part| VersionBound::parse(s, part))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bounds })
    }

    pub fn bounds(&self) -> &[VersionBound] {
        &self.bounds
    }

    pub fn satisfies(&self, version: &OpenSslVersion) -> bool {
        self.bounds.iter().all(|bound| bound.admits(version))
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bounds.is_empty() {
            return write!(f, "*");
        }
        for (i, bound) in self.bounds.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", bound)?;
        }
        Ok(())
    }
}

impl FromStr for VersionConstraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn v(s: &str) -> OpenSslVersion {
        OpenSslVersion::parse(s).unwrap()
    }

    #[test]
    fn test_parse_full() {
        let version = v("1.1.1j-pre3");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 1);
        assert_eq!(version.patch(), 1);
        assert_eq!(version.build_letter(), Some('j'));
        assert_eq!(version.pre_release(), Some("pre3"));
    }

    #[test]
    fn test_parse_defaults_missing_components() {
        assert_eq!(v("3"), OpenSslVersion::new(3, 0, 0));
        assert_eq!(v("1.1"), OpenSslVersion::new(1, 1, 0));
    }

    #[test]
    fn test_parse_multi_digit_patch_with_letter() {
        let version = v("1.0.12a");
        assert_eq!(version.patch(), 12);
        assert_eq!(version.build_letter(), Some('a'));
        assert!(OpenSslVersion::parse("1.0.12za").is_err());
    }

    #[test]
    fn test_parse_keeps_whole_pre_release() {
        assert_eq!(v("3.0.0-alpha-2").pre_release(), Some("alpha-2"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(OpenSslVersion::parse("abc").is_err());
        assert!(OpenSslVersion::parse("").is_err());
        assert!(OpenSslVersion::parse("-beta1").is_err());
        assert!(OpenSslVersion::parse("1.x").is_err());
        assert!(OpenSslVersion::parse("1.1.j").is_err());
        assert!(OpenSslVersion::parse("1.1.1.1").is_err());
        assert!(OpenSslVersion::parse("1.1.1-").is_err());
        assert!(OpenSslVersion::parse("+1.0").is_err());
    }

    #[test]
    fn test_parse_error_names_input() {
        let err = OpenSslVersion::parse("abc").unwrap_err();
        assert!(matches!(err, Error::ParseError { ref input, .. } if input == "abc"));
    }

    #[test]
    fn test_letter_sorts_after_plain_patch() {
        assert!(v("1.1.1") < v("1.1.1j"));
        assert!(v("1.0.2d") < v("1.0.2k"));
        assert!(v("1.0.2") < v("1.0.2d"));
    }

    #[test]
    fn test_numeric_components_dominate() {
        assert!(v("1.0.2") < v("1.1.0"));
        assert!(v("3.0.0") > v("1.1.1j"));
        assert!(v("1.0.10") > v("1.0.9z"));
    }

    #[test]
    fn test_pre_release_sorts_after_plain() {
        assert!(v("3.0.0") < v("3.0.0-beta1"));
        assert!(v("3.0.0-alpha1") < v("3.0.0-beta1"));
    }

    #[test]
    fn test_compare_against_str() {
        let version = v("1.0.2u");
        assert!(version < "1.1.0");
        assert!(version >= "1.0.2d");
        assert!(version == "1.0.2u");
        assert!(version != "1.0.2");
        assert_eq!(version.compare_str("1.0.2u").unwrap(), Ordering::Equal);
        assert!(version.compare_str("garbage").is_err());
    }

    #[test]
    fn test_unparseable_str_has_no_ordering() {
        let version = v("1.1.1");
        assert_eq!(version.partial_cmp(&"nope"), None);
        assert!(version != "nope");
    }

    #[test]
    fn test_hash_equality() {
        let mut set = HashSet::new();
        set.insert(v("1.1"));
        assert!(set.contains(&v("1.1.0")));
        assert!(!set.contains(&v("1.1.0a")));
    }

    #[test]
    fn test_display_and_base() {
        assert_eq!(v("1.1.1j-beta").to_string(), "1.1.1j-beta");
        assert_eq!(v("1.1").to_string(), "1.1.0");
        assert_eq!(v("1.1.1j").base(), "1.1.1");
    }

    #[test]
    fn test_constants() {
        assert_eq!(V1_0_2D, v("1.0.2d"));
        assert_eq!(V1_1_0, v("1.1.0"));
        assert_eq!(V1_1_1, v("1.1.1"));
    }

    #[test]
    fn test_non_ascii_patch_letter() {
        let version = v("1.1.1\u{e9}");
        assert_eq!(version.patch(), 1);
        assert_eq!(version.build_letter(), Some('\u{e9}'));
        assert_eq!(version.to_string(), "1.1.1\u{e9}");
        assert!(version > v("1.1.1z"));
    }

    #[test]
    fn test_constraint_parse_and_satisfy() {
        let c = VersionConstraint::parse("< 1.1.0").unwrap();
        assert_eq!(c, VersionConstraint::below(V1_1_0));
        assert!(c.satisfies(&v("1.0.2u")));
        assert!(!c.satisfies(&v("1.1.0")));

        let range = VersionConstraint::parse(">= 1.0.2d, < 1.1.0").unwrap();
        assert_eq!(range.bounds().len(), 2);
        assert!(range.satisfies(&v("1.0.2k")));
        assert!(!range.satisfies(&v("1.0.2")));
        assert!(!range.satisfies(&v("1.1.1")));

        assert!(VersionConstraint::parse("*").unwrap().satisfies(&v("9.9.9")));
        assert!(VersionConstraint::parse("1.1.1j").unwrap().satisfies(&v("1.1.1j")));
        assert!(VersionConstraint::parse("== 1.1.1j").unwrap().satisfies(&v("1.1.1j")));
        assert!(VersionConstraint::parse("<= 1.1.1").unwrap().satisfies(&v("1.1.1")));
        assert!(!VersionConstraint::parse("> 1.1.1").unwrap().satisfies(&v("1.1.1")));
        assert!(VersionConstraint::at_least(V1_1_1).satisfies(&v("3.0.0")));
    }

    #[test]
    fn test_constraint_display() {
        let c = VersionConstraint::parse(">=1.0.2d,<1.1.0").unwrap();
        assert_eq!(c.to_string(), ">= 1.0.2d, < 1.1.0");
        assert_eq!(VersionConstraint::default().to_string(), "*");
    }

    #[test]
    fn test_constraint_parse_error() {
        assert!(VersionConstraint::parse(">= abc").is_err());
        assert!(VersionConstraint::parse("< 1.1.0,").is_err());
        assert!(matches!(
            VersionConstraint::parse("!= 1.1.0"),
            Err(Error::ParseError { ref input, .. }) if input == "!= 1.1.0"
        ));
    }
}
