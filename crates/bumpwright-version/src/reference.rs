use std::fmt;

use semver::Version;

use crate::arithmetic::parse_core;
use crate::error::VersionError;

/// A dependency version string split into its range prefix and version text,
/// e.g. `^1.2.3` → (`^`, `1.2.3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReference {
    prefix: String,
    version: String,
}

impl VersionReference {
    /// # Errors
    ///
    /// Returns [`VersionError::UnpinnedReference`] when the reference has no
    /// version after its prefix (`*`, `latest`, `workspace:*`), or
    /// [`VersionError::Parse`] when the version text is malformed.
    pub fn parse(reference: &str) -> Result<Self, VersionError> {
        let split_at = reference
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| VersionError::UnpinnedReference {
                reference: reference.to_string(),
            })?;

        let (prefix, version) = reference.split_at(split_at);
        parse_core(version)?;

        Ok(Self {
            prefix: prefix.to_string(),
            version: version.to_string(),
        })
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Renders the reference with `version` in place of the current one,
    /// keeping the prefix as written.
    #[must_use]
    pub fn with_version(&self, version: &Version) -> String {
        format!("{}{version}", self.prefix)
    }
}

impl fmt::Display for VersionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.version)
    }
}
