use std::collections::VecDeque;

use bumpwright_core::PackageId;
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::registry::Registry;

/// Directed `dependent → dependency` edges between registered packages.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependencies: IndexMap<PackageId, IndexSet<PackageId>>,
    dependents: IndexMap<PackageId, IndexSet<PackageId>>,
}

impl DependencyGraph {
    /// Collects edges from every manifest dependency field and every
    /// `depends-on` entry.
    #[must_use]
    pub fn from_registry(registry: &Registry) -> Self {
        let edges = registry
            .references()
            .map(|r| (r.owner.clone(), r.dependency.clone()))
            .chain(registry.packages().flat_map(|spec| {
                spec.depends_on()
                    .iter()
                    .map(|dep| (spec.id().clone(), dep.clone()))
            }));

        Self::from_edges(registry.ids().cloned(), edges)
    }

    /// Builds a graph over `packages`; the package order is kept in every
    /// result.
    pub fn from_edges<P, E>(packages: P, edges: E) -> Self
    where
        P: IntoIterator<Item = PackageId>,
        E: IntoIterator<Item = (PackageId, PackageId)>,
    {
        let mut graph = Self::default();
        for id in packages {
            graph.add_node(id);
        }
        for (dependent, dependency) in edges {
            graph.add_node(dependent.clone());
            graph.add_node(dependency.clone());
            graph
                .dependents
                .entry(dependency.clone())
                .or_default()
                .insert(dependent.clone());
            graph
                .dependencies
                .entry(dependent)
                .or_default()
                .insert(dependency);
        }
        graph
    }

    fn position(&self, id: &PackageId) -> usize {
        self.dependencies
            .get_index_of(id.as_str())
            .unwrap_or(usize::MAX)
    }

    fn add_node(&mut self, id: PackageId) {
        self.dependents.entry(id.clone()).or_default();
        self.dependencies.entry(id).or_default();
    }

    pub fn dependencies_of(&self, id: &str) -> impl Iterator<Item = &PackageId> {
        self.dependencies.get(id).into_iter().flatten()
    }

    pub fn dependents_of(&self, id: &str) -> impl Iterator<Item = &PackageId> {
        self.dependents.get(id).into_iter().flatten()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&PackageId, &PackageId)> {
        self.dependencies
            .iter()
            .flat_map(|(dependent, deps)| deps.iter().map(move |dep| (dependent, dep)))
    }

    /// The changed packages together with every package that depends on any
    /// of them, directly or through other packages.
    ///
    /// Each package is expanded at most once, so the traversal terminates even
    /// when the edges contain a cycle.
    pub fn transitive_dependents<'a, I>(&self, changed: I) -> IndexSet<PackageId>
    where
        I: IntoIterator<Item = &'a PackageId>,
    {
        let mut visited: IndexSet<PackageId> = IndexSet::new();
        let mut queue: VecDeque<&PackageId> = VecDeque::new();

        for id in changed {
            if visited.insert(id.clone()) {
                queue.push_back(id);
            }
        }

        while let Some(current) = queue.pop_front() {
            for dependent in self.dependents_of(current.as_str()) {
                if visited.insert(dependent.clone()) {
                    debug!(%dependent, dependency = %current, "dependent pulled into closure");
                    queue.push_back(dependent);
                }
            }
        }

        visited.sort_by(|a, b| self.position(a).cmp(&self.position(b)));
        visited
    }

    /// Returns the packages of one dependency cycle, if any exists.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<PackageId>> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.dependencies.len()];

        for start in 0..self.dependencies.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }

            let mut path: Vec<usize> = vec![start];
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            marks[start] = Mark::InProgress;

            while let Some((node, next_edge)) = stack.pop() {
                let Some((_, deps)) = self.dependencies.get_index(node) else {
                    continue;
                };

                if let Some(dep) = deps.get_index(next_edge) {
                    stack.push((node, next_edge + 1));
                    let Some(dep_index) = self.dependencies.get_index_of(dep.as_str()) else {
                        continue;
                    };
                    match marks[dep_index] {
                        Mark::Unvisited => {
                            marks[dep_index] = Mark::InProgress;
                            path.push(dep_index);
                            stack.push((dep_index, 0));
                        }
                        Mark::InProgress => {
                            let from = path.iter().position(|&n| n == dep_index).unwrap_or(0);
                            return Some(
                                path[from..]
                                    .iter()
                                    .filter_map(|&n| self.dependencies.get_index(n))
                                    .map(|(id, _)| id.clone())
                                    .collect(),
                            );
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node] = Mark::Done;
                    path.pop();
                }
            }
        }

        None
    }
}
