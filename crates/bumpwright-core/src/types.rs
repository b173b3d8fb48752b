use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifier of an independently versioned package or plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyPackageId`] for an empty id, or
    /// [`CoreError::InvalidPackageId`] if the id contains whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::EmptyPackageId);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidPackageId(id));
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PackageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PackageId {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Location of a string value inside a structured manifest document.
///
/// Configuration accepts either a dotted string (`"version"`,
/// `"dependencies.core"`) or an explicit list of segments for keys that
/// contain dots themselves (`["dependencies", "@scope/core.js"]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FieldPathRepr", into = "Vec<String>")]
pub struct FieldPath(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldPathRepr {
    Dotted(String),
    Segments(Vec<String>),
}

impl TryFrom<FieldPathRepr> for FieldPath {
    type Error = CoreError;

    fn try_from(value: FieldPathRepr) -> Result<Self, Self::Error> {
        match value {
            FieldPathRepr::Dotted(s) => Self::parse(&s),
            FieldPathRepr::Segments(segments) => Self::from_segments(segments),
        }
    }
}

impl From<FieldPath> for Vec<String> {
    fn from(value: FieldPath) -> Self {
        value.0
    }
}

impl FieldPath {
    /// The top-level `version` key.
    #[must_use]
    pub fn version() -> Self {
        Self(vec!["version".to_string()])
    }

    /// Parses a dot-separated path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or has an empty segment.
    pub fn parse(dotted: &str) -> Result<Self, CoreError> {
        if dotted.is_empty() {
            return Err(CoreError::EmptyFieldPath);
        }
        if dotted.split('.').any(str::is_empty) {
            return Err(CoreError::EmptyFieldSegment(dotted.to_string()));
        }
        Ok(Self(dotted.split('.').map(str::to_string).collect()))
    }

    /// # Errors
    ///
    /// Returns an error if there are no segments or any segment is empty.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(CoreError::EmptyFieldPath);
        }
        if segments.iter().any(String::is_empty) {
            return Err(CoreError::EmptyFieldSegment(segments.join(".")));
        }
        Ok(Self(segments))
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Ordered list of changed paths, relative to the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: Vec<String>,
}

impl ChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

impl<S: Into<String>> FromIterator<S> for ChangeSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BumpReason {
    /// A file inside the package's source directories changed.
    SourceChanged,
    /// A package this one references was bumped.
    DependencyChanged,
    /// The package's version file was already edited in the same change set.
    AlreadyBumped,
}

impl fmt::Display for BumpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SourceChanged => "source changed",
            Self::DependencyChanged => "dependency changed",
            Self::AlreadyBumped => "already bumped",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBump {
    pub old_version: Version,
    pub new_version: Version,
    pub reason: BumpReason,
}

impl VersionBump {
    /// Whether the package's own version fields need rewriting.
    #[must_use]
    pub fn writes_own_version(&self) -> bool {
        self.reason != BumpReason::AlreadyBumped && self.old_version != self.new_version
    }
}

/// Version transitions computed for one run, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BumpPlan {
    bumps: IndexMap<PackageId, VersionBump>,
}

impl BumpPlan {
    #[must_use]
    pub fn new(bumps: IndexMap<PackageId, VersionBump>) -> Self {
        Self { bumps }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bumps.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bumps.len()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&VersionBump> {
        self.bumps.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.bumps.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PackageId, &VersionBump)> {
        self.bumps.iter()
    }

    pub fn packages(&self) -> impl Iterator<Item = &PackageId> {
        self.bumps.keys()
    }

    /// Bumps that still need to be written, excluding already-bumped packages.
    pub fn pending(&self) -> impl Iterator<Item = (&PackageId, &VersionBump)> {
        self.bumps.iter().filter(|(_, b)| b.writes_own_version())
    }
}
