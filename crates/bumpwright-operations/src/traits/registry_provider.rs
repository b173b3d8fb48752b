use std::path::Path;

use bumpwright_registry::Registry;

use crate::Result;

pub trait RegistryProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if no registry can be found from the given path or if
    /// it fails validation.
    fn load_registry(&self, start_path: &Path) -> Result<Registry>;
}
