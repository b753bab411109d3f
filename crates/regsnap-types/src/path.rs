//! Hive names and `HIVE\subpath` registry paths.
//!
//! Paths follow the native registry conventions:
//! - The backslash is the only separator; `/` is a legal key-name character.
//! - Hive names are case-insensitive and may use the short `HKxx` forms.
//! - Empty segments (leading, trailing, or doubled separators) are dropped.

use std::fmt;
use std::str::FromStr;

use crate::error::{TypeError, TypeResult};

/// Separator between key names in a registry path.
pub const SEPARATOR: char = '\\';

/// A top-level root of the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hive {
    ClassesRoot,
    CurrentUser,
    LocalMachine,
    Users,
    CurrentConfig,
}

impl Hive {
    /// Every hive, in the order the native API numbers them.
    pub const ALL: [Hive; 5] = [
        Hive::ClassesRoot,
        Hive::CurrentUser,
        Hive::LocalMachine,
        Hive::Users,
        Hive::CurrentConfig,
    ];

    /// Canonical long name (`HKEY_CURRENT_USER`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClassesRoot => "HKEY_CLASSES_ROOT",
            Self::CurrentUser => "HKEY_CURRENT_USER",
            Self::LocalMachine => "HKEY_LOCAL_MACHINE",
            Self::Users => "HKEY_USERS",
            Self::CurrentConfig => "HKEY_CURRENT_CONFIG",
        }
    }

    /// Short name (`HKCU`, ...).
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::ClassesRoot => "HKCR",
            Self::CurrentUser => "HKCU",
            Self::LocalMachine => "HKLM",
            Self::Users => "HKU",
            Self::CurrentConfig => "HKCC",
        }
    }
}

impl fmt::Display for Hive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Hive {
    type Err = TypeError;

    fn from_str(s: &str) -> TypeResult<Self> {
        Hive::ALL
            .into_iter()
            .find(|h| s.eq_ignore_ascii_case(h.name()) || s.eq_ignore_ascii_case(h.abbreviation()))
            .ok_or_else(|| TypeError::UnknownHive(s.to_string()))
    }
}

/// A registry location: a hive plus a (possibly empty) subpath beneath it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegistryPath {
    hive: Hive,
    subpath: String,
}

impl RegistryPath {
    /// Path to the root of `hive`.
    pub fn hive_root(hive: Hive) -> Self {
        Self {
            hive,
            subpath: String::new(),
        }
    }

    /// Build a path from a hive and a subpath, normalizing separators.
    pub fn new(hive: Hive, subpath: &str) -> Self {
        Self {
            hive,
            subpath: normalize(subpath),
        }
    }

    /// Parse a `HIVE\subpath` string.
    ///
    /// The string is split on the first separator; the left side must name a
    /// hive and the remainder (possibly empty) is the subpath.
    pub fn parse(path: &str) -> TypeResult<Self> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(TypeError::InvalidPath {
                path: path.to_string(),
                reason: "path must not be empty".into(),
            });
        }

        let (hive, subpath) = match trimmed.split_once(SEPARATOR) {
            Some((hive, rest)) => (hive, rest),
            None => (trimmed, ""),
        };

        let hive = hive.parse::<Hive>().map_err(|_| TypeError::InvalidPath {
            path: path.to_string(),
            reason: format!("unrecognized hive {hive:?}"),
        })?;

        Ok(Self::new(hive, subpath))
    }

    pub fn hive(&self) -> Hive {
        self.hive
    }

    /// Subpath below the hive, without leading or trailing separators.
    pub fn subpath(&self) -> &str {
        &self.subpath
    }

    /// Returns `true` if this path names the hive root itself.
    pub fn is_hive_root(&self) -> bool {
        self.subpath.is_empty()
    }

    /// Path of the child key `name` below this one.
    pub fn child(&self, name: &str) -> Self {
        let subpath = if self.subpath.is_empty() {
            name.to_string()
        } else {
            format!("{}{SEPARATOR}{name}", self.subpath)
        };
        Self {
            hive: self.hive,
            subpath,
        }
    }

    /// Number of key names below the hive.
    pub fn depth(&self) -> usize {
        if self.subpath.is_empty() {
            0
        } else {
            self.subpath.split(SEPARATOR).count()
        }
    }
}

impl fmt::Display for RegistryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subpath.is_empty() {
            write!(f, "{}", self.hive)
        } else {
            write!(f, "{}{SEPARATOR}{}", self.hive, self.subpath)
        }
    }
}

impl FromStr for RegistryPath {
    type Err = TypeError;

    fn from_str(s: &str) -> TypeResult<Self> {
        Self::parse(s)
    }
}

fn normalize(subpath: &str) -> String {
    subpath
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}
