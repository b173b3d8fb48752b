use std::path::Path;

use bumpwright_core::PackageId;
use bumpwright_registry::{DependencyGraph, Registry};
use tracing::warn;

use crate::Result;
use crate::traits::RegistryProvider;

#[derive(Debug)]
pub struct ValidateOutput {
    pub registry: Registry,
    pub graph: DependencyGraph,
    pub cycle: Option<Vec<PackageId>>,
}

/// Loads the registry, which runs every completeness check, and derives
/// its dependency graph.
pub struct ValidateOperation<P> {
    registry_provider: P,
}

impl<P: RegistryProvider> ValidateOperation<P> {
    pub fn new(registry_provider: P) -> Self {
        Self { registry_provider }
    }

    /// # Errors
    ///
    /// Returns an error if no registry is found or it fails validation.
    pub fn execute(&self, start_path: &Path) -> Result<ValidateOutput> {
        let registry = self.registry_provider.load_registry(start_path)?;
        let graph = DependencyGraph::from_registry(&registry);
        let cycle = graph.find_cycle();

        if let Some(cycle) = &cycle {
            let members: Vec<&str> = cycle.iter().map(PackageId::as_str).collect();
            warn!(cycle = %members.join(" -> "), "dependency cycle between packages");
        }

        Ok(ValidateOutput {
            registry,
            graph,
            cycle,
        })
    }
}
