use std::{
    any::TypeId,
    collections::{BTreeMap, HashSet},
};

use thiserror::Error;

use crate::{registry::RegistrationTable, types::TypeInfo};

/// Information about a constructor dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyInfo {
    /// The required service
    pub type_info: TypeInfo,
    /// The constructor parameter it is injected into
    pub parameter: &'static str,
    /// If the parameter has a default and may stay unresolved
    pub optional: bool,
}

/// Snapshot of all registrations and their dependencies
/// Used to check circular dependencies and enables inspection of the wiring
#[derive(Debug)]
pub struct DependencyGraph {
    map: BTreeMap<TypeId, DependencyGraphEntry>,
}
impl DependencyGraph {
    pub(crate) fn new(registry: &RegistrationTable) -> Self {
        let map = registry
            .recipes()
            .map(|recipe| {
                (
                    recipe.service.type_id,
                    DependencyGraphEntry {
                        info: recipe.service,
                        dependencies: recipe.dependencies(),
                    },
                )
            })
            .collect();

        Self { map }
    }

    /// Dependencies of a service, `None` if it is not registered
    pub fn dependencies_of(&self, service: &TypeInfo) -> Option<&[DependencyInfo]> {
        self.map
            .get(&service.type_id)
            .map(|entry| entry.dependencies.as_slice())
    }

    /// All services in the graph
    pub fn services(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.map.values().map(|entry| entry.info)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Validate the graph
    ///
    /// Returns a list of all issues
    pub fn check(&self) -> Result<(), DependencyGraphErrors> {
        let mut checked = HashSet::new();
        let mut errors = Vec::new();
        for entry in self.map.values() {
            let mut dependency_chain = Vec::new();
            check_recurse(
                self,
                &mut checked,
                &mut errors,
                &mut dependency_chain,
                entry,
            );
        }

        if !errors.is_empty() {
            return Err(DependencyGraphErrors { errors });
        }

        return Ok(());

        fn check_recurse(
            graph: &DependencyGraph,
            checked: &mut HashSet<TypeId>,
            errors: &mut Vec<DependencyGraphError>,
            dependency_chain: &mut Vec<TypeInfo>,
            entry: &DependencyGraphEntry,
        ) {
            // Circular Dependency Check
            if let Some(&from) = dependency_chain.first() {
                if dependency_chain.contains(&entry.info) {
                    let mut chain = dependency_chain.clone();
                    chain.push(entry.info); // Add current so chain is complete

                    errors.push(DependencyGraphError::CircularDependency {
                        from,
                        to: entry.info,
                        chain,
                    });
                    return;
                }
            }

            // Skip other checks if already checked
            if !checked.insert(entry.info.type_id) {
                return;
            };

            dependency_chain.push(entry.info);

            for dependency in &entry.dependencies {
                // Unregistered dependencies are optional, registration rejects the others
                let Some(next_entry) = graph.map.get(&dependency.type_info.type_id) else {
                    continue;
                };

                check_recurse(graph, checked, errors, dependency_chain, next_entry);
            }

            dependency_chain.pop();
        }
    }
}

#[derive(Debug)]
struct DependencyGraphEntry {
    info: TypeInfo,
    dependencies: Vec<DependencyInfo>,
}

#[derive(Error, Debug, Clone)]
pub enum DependencyGraphError {
    #[error("A Circular Dependency exists between '{from}' and '{to}' through {chain:?}")]
    CircularDependency {
        from: TypeInfo,
        to: TypeInfo,
        chain: Vec<TypeInfo>,
    },
}
impl std::fmt::Display for DependencyGraphErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("The dependency graph had one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}

#[derive(Error, Debug, Clone)]
pub struct DependencyGraphErrors {
    pub errors: Vec<DependencyGraphError>,
}
