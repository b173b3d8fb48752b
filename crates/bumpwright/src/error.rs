use std::path::PathBuf;

use bumpwright_operations::OperationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("source changed but version not bumped in {count} package(s)")]
    VersionsNotBumped { count: usize },
}

impl CliError {
    /// Manifests written before a write failed.
    #[must_use]
    pub fn written_paths(&self) -> &[PathBuf] {
        match self {
            Self::Operation(OperationError::PartialWrite { written, .. }) => written,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::CliError;
    use bumpwright_operations::OperationError;
    use bumpwright_registry::RegistryError;

    #[test]
    fn operation_error_converts_via_from() {
        let err = OperationError::Registry(RegistryError::NoPackages);

        let cli_err: CliError = err.into();

        assert!(matches!(cli_err, CliError::Operation(_)));
    }

    #[test]
    fn operation_error_keeps_message_and_source_chain() {
        let err = OperationError::PartialWrite {
            written: vec![PathBuf::from("/repo/sdk/js/package.json")],
            failed: PathBuf::from("/repo/cli/package.json"),
            source: Box::new(OperationError::Registry(RegistryError::NoPackages)),
        };
        let cli_err: CliError = err.into();

        assert!(cli_err.to_string().contains("/repo/cli/package.json"));
        assert!(std::error::Error::source(&cli_err).is_some());
    }

    #[test]
    fn partial_write_exposes_written_paths() {
        let err: CliError = OperationError::PartialWrite {
            written: vec![
                PathBuf::from("/repo/sdk/js/package.json"),
                PathBuf::from("/repo/cli/package.json"),
            ],
            failed: PathBuf::from("/repo/mcp/server/package.json"),
            source: Box::new(OperationError::Registry(RegistryError::NoPackages)),
        }
        .into();

        assert_eq!(
            err.written_paths(),
            [
                PathBuf::from("/repo/sdk/js/package.json"),
                PathBuf::from("/repo/cli/package.json"),
            ]
        );
    }

    #[test]
    fn other_errors_have_no_written_paths() {
        let err = CliError::VersionsNotBumped { count: 1 };

        assert!(err.written_paths().is_empty());
    }

    #[test]
    fn registry_not_found_names_start_dir() {
        let err = OperationError::Registry(RegistryError::NotFound {
            start_dir: PathBuf::from("/work/elsewhere"),
        });
        let cli_err: CliError = err.into();

        assert!(cli_err.to_string().contains("/work/elsewhere"));
    }

    #[test]
    fn versions_not_bumped_message_includes_count() {
        let err = CliError::VersionsNotBumped { count: 3 };

        let msg = err.to_string();

        assert!(msg.contains("version not bumped"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn current_dir_error_has_source() {
        let err = CliError::CurrentDir(std::io::Error::other("gone"));

        assert!(std::error::Error::source(&err).is_some());
    }
}
