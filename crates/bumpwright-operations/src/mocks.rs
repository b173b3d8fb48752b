use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use bumpwright_manifest::{ManifestDocument, ManifestError};
use bumpwright_registry::{Registry, RegistryError, parse_registry};
use indexmap::IndexMap;

use crate::Result;
use crate::traits::{GitProvider, ManifestStore, RegistryProvider};

pub const MOCK_ROOT: &str = "/repo";

const FRACTARY_PACKAGES: &str = r#"
[packages.sdk]
source-dirs = ["sdk/js/src/"]
exclude = ["**/__fixtures__/**"]
manifests = [{ path = "sdk/js/package.json" }]

[packages.cli]
source-dirs = ["cli/src/"]
manifests = [{ path = "cli/package.json", dependencies = { sdk = ["dependencies", "@fractary/core"] } }]

[packages.mcp]
source-dirs = ["mcp/server/src/"]
manifests = [{ path = "mcp/server/package.json", dependencies = { sdk = ["dependencies", "@fractary/core"] } }]

[packages.plugin-core]
source-dirs = ["plugins/core/agents/", "plugins/core/commands/", "plugins/core/skills/"]
manifests = [{ path = "plugins/core/.claude-plugin/plugin.json" }]

[packages.plugin-work]
source-dirs = ["plugins/work/agents/", "plugins/work/commands/", "plugins/work/skills/"]
depends-on = ["plugin-core"]
manifests = [{ path = "plugins/work/.claude-plugin/plugin.json" }]
"#;

const FRACTARY_MANIFESTS: [(&str, &str); 5] = [
    (
        "/repo/sdk/js/package.json",
        r#"{
  "name": "@fractary/core",
  "version": "1.4.2"
}
"#,
    ),
    (
        "/repo/cli/package.json",
        r#"{
  "name": "@fractary/cli",
  "version": "0.9.0",
  "dependencies": {
    "@fractary/core": "^1.4.2"
  }
}
"#,
    ),
    (
        "/repo/mcp/server/package.json",
        r#"{
  "name": "@fractary/mcp",
  "version": "0.3.1",
  "dependencies": {
    "@fractary/core": "~1.4.2"
  }
}
"#,
    ),
    (
        "/repo/plugins/core/.claude-plugin/plugin.json",
        r#"{
  "name": "fractary-core",
  "version": "2.0.0"
}
"#,
    ),
    (
        "/repo/plugins/work/.claude-plugin/plugin.json",
        r#"{
  "name": "fractary-work",
  "version": "2.1.0"
}
"#,
    ),
];

/// The SDK, CLI, MCP server and two plugins, rooted at [`MOCK_ROOT`].
///
/// # Panics
///
/// Panics if the built-in registry fails validation.
#[must_use]
pub fn fractary_registry() -> Registry {
    fractary_registry_with_settings(r#"ignored-files = ["**/*.snap"]"#)
}

/// # Panics
///
/// Panics if `settings` does not form a valid `[settings]` table.
#[must_use]
pub fn fractary_registry_with_settings(settings: &str) -> Registry {
    let content = format!("[settings]\n{settings}\n{FRACTARY_PACKAGES}");
    parse_registry(MOCK_ROOT, &content).expect("valid mock registry")
}

pub struct MockRegistryProvider {
    registry: Option<Registry>,
}

impl MockRegistryProvider {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    #[must_use]
    pub fn fractary() -> Self {
        Self::new(fractary_registry())
    }

    /// A provider that behaves as if no `bumpwright.toml` exists.
    #[must_use]
    pub fn missing() -> Self {
        Self { registry: None }
    }
}

impl RegistryProvider for Arc<MockRegistryProvider> {
    fn load_registry(&self, start_path: &Path) -> Result<Registry> {
        self.registry.clone().ok_or_else(|| {
            RegistryError::NotFound {
                start_dir: start_path.to_path_buf(),
            }
            .into()
        })
    }
}

#[derive(Default)]
pub struct MockGitProvider {
    staged: Vec<PathBuf>,
    since: Vec<PathBuf>,
    requested_bases: Mutex<Vec<String>>,
}

impl MockGitProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_staged<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        self.staged = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_since<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        self.since = paths.into_iter().map(Into::into).collect();
        self
    }

    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn requested_bases(&self) -> Vec<String> {
        self.requested_bases.lock().expect("lock poisoned").clone()
    }
}

impl GitProvider for Arc<MockGitProvider> {
    fn staged_files(&self, _project_root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.staged.clone())
    }

    fn files_since(&self, _project_root: &Path, base: &str) -> Result<Vec<PathBuf>> {
        self.requested_bases
            .lock()
            .expect("lock poisoned")
            .push(base.to_string());
        Ok(self.since.clone())
    }
}

/// In-memory manifests keyed by absolute path.
#[derive(Default)]
pub struct MockManifestStore {
    files: RwLock<IndexMap<PathBuf, String>>,
    writes: Mutex<Vec<PathBuf>>,
    fail_on: Option<PathBuf>,
}

impl MockManifestStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The manifests referenced by [`fractary_registry`].
    #[must_use]
    pub fn fractary() -> Self {
        FRACTARY_MANIFESTS
            .iter()
            .fold(Self::new(), |store, &(path, content)| {
                store.with_file(path, content)
            })
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.into(), content.to_string());
        self
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn without_file(self, path: impl AsRef<Path>) -> Self {
        self.files
            .write()
            .expect("lock poisoned")
            .shift_remove(path.as_ref());
        self
    }

    /// Makes every write to `path` fail.
    #[must_use]
    pub fn fail_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_on = Some(path.into());
        self
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .read()
            .expect("lock poisoned")
            .get(path.as_ref())
            .cloned()
    }

    /// Paths written so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().expect("lock poisoned").clone()
    }
}

impl ManifestStore for MockManifestStore {
    fn read(&self, path: &Path) -> Result<ManifestDocument> {
        let content = self.content(path).ok_or_else(|| ManifestError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })?;
        Ok(ManifestDocument::parse(path, &content)?)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(ManifestError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::other("simulated write failure"),
            }
            .into());
        }
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.to_path_buf(), content.to_string());
        self.writes
            .lock()
            .expect("lock poisoned")
            .push(path.to_path_buf());
        Ok(())
    }
}

impl ManifestStore for Arc<MockManifestStore> {
    fn read(&self, path: &Path) -> Result<ManifestDocument> {
        self.as_ref().read(path)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.as_ref().write(path, content)
    }
}
