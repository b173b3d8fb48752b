use semver::Version;

use crate::error::VersionError;

struct Core<'a> {
    major: &'a str,
    minor: &'a str,
    patch: &'a str,
}

fn split_core(version: &str) -> Option<Core<'_>> {
    let mut parts = version.splitn(3, '.');
    let major = parts.next()?;
    let minor = parts.next()?;
    let rest = parts.next()?;

    let patch_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let patch = &rest[..patch_len];

    let is_numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_numeric(major) || !is_numeric(minor) || patch.is_empty() {
        return None;
    }

    Some(Core {
        major,
        minor,
        patch,
    })
}

fn parse_err(version: &str) -> VersionError {
    VersionError::Parse {
        version: version.to_string(),
    }
}

/// Parses the leading `major.minor.patch` core, ignoring any suffix.
///
/// # Errors
///
/// Returns [`VersionError::Parse`] when the input does not start with three
/// dot-separated numeric components.
pub fn parse_core(version: &str) -> Result<Version, VersionError> {
    let core = split_core(version).ok_or_else(|| parse_err(version))?;

    let number = |s: &str| s.parse::<u64>().map_err(|_| parse_err(version));

    Ok(Version::new(
        number(core.major)?,
        number(core.minor)?,
        number(core.patch)?,
    ))
}

/// Increments the patch component. Pre-release and build suffixes are not
/// carried into the result.
///
/// # Errors
///
/// Returns [`VersionError::Parse`] for a malformed version, or
/// [`VersionError::Overflow`] if the patch number cannot grow.
pub fn bump_patch(version: &str) -> Result<Version, VersionError> {
    let mut bumped = parse_core(version)?;
    bumped.patch = bumped
        .patch
        .checked_add(1)
        .ok_or_else(|| VersionError::Overflow {
            version: version.to_string(),
        })?;
    Ok(bumped)
}

/// Returns the `major.minor` prefix exactly as written.
///
/// # Errors
///
/// Returns [`VersionError::Parse`] for a malformed version.
pub fn major_minor(version: &str) -> Result<String, VersionError> {
    let core = split_core(version).ok_or_else(|| parse_err(version))?;
    Ok(format!("{}.{}", core.major, core.minor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_patch_increments_patch() {
        assert_eq!(bump_patch("1.0.0").expect("valid version").to_string(), "1.0.1");
    }

    #[test]
    fn bump_patch_handles_multi_digit_rollover() {
        assert_eq!(bump_patch("0.4.9").expect("valid version").to_string(), "0.4.10");
    }

    #[test]
    fn bump_patch_handles_large_patch_numbers() {
        assert_eq!(bump_patch("3.1.99").expect("valid version").to_string(), "3.1.100");
    }

    #[test]
    fn bump_patch_drops_prerelease_suffix() {
        assert_eq!(bump_patch("1.2.3-beta.1").expect("valid version").to_string(), "1.2.4");
    }

    #[test]
    fn bump_patch_drops_build_metadata() {
        assert_eq!(bump_patch("1.2.3+build.7").expect("valid version").to_string(), "1.2.4");
    }

    #[test]
    fn bump_patch_rejects_two_components() {
        assert_eq!(
            bump_patch("1.2"),
            Err(VersionError::Parse {
                version: "1.2".to_string()
            })
        );
    }

    #[test]
    fn bump_patch_rejects_non_numeric() {
        assert!(matches!(bump_patch("v1.2.3"), Err(VersionError::Parse { .. })));
        assert!(matches!(bump_patch("1.x.3"), Err(VersionError::Parse { .. })));
        assert!(matches!(bump_patch("1.2.beta"), Err(VersionError::Parse { .. })));
        assert!(matches!(bump_patch(""), Err(VersionError::Parse { .. })));
    }

    #[test]
    fn bump_patch_reports_overflow() {
        let version = format!("1.0.{}", u64::MAX);

        assert!(matches!(
            bump_patch(&version),
            Err(VersionError::Overflow { .. })
        ));
    }

    #[test]
    fn major_minor_extracts_first_two_components() {
        assert_eq!(major_minor("1.2.3").expect("valid version"), "1.2");
    }

    #[test]
    fn major_minor_ignores_prerelease() {
        assert_eq!(major_minor("0.4.0-beta").expect("valid version"), "0.4");
    }

    #[test]
    fn major_minor_rejects_malformed() {
        assert!(major_minor("1").is_err());
        assert!(major_minor("a.b.c").is_err());
    }

    #[test]
    fn parse_core_ignores_suffix() {
        assert_eq!(parse_core("2.5.7-rc.2").expect("valid version"), Version::new(2, 5, 7));
    }
}
