//! Graph - Dependency analysis over declared resources

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::resource::{Resource, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("{resource} references undeclared binding '{binding}'")]
    DanglingReference { resource: String, binding: String },

    #[error("Binding '{0}' is declared more than once")]
    DuplicateBinding(String),

    #[error("Circular dependency: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
}

/// Bindings a resource depends on, through references or explicit `depends_on`
pub fn dependencies(resource: &Resource) -> BTreeSet<String> {
    let mut deps = BTreeSet::new();
    for value in resource.attributes.values() {
        collect_dependencies(value, &mut deps);
    }
    deps.extend(resource.depends_on.iter().cloned());
    deps
}

fn collect_dependencies(value: &Value, deps: &mut BTreeSet<String>) {
    match value {
        Value::ResourceRef(binding_name, _) => {
            deps.insert(binding_name.clone());
        }
        Value::List(items) => {
            for item in items {
                collect_dependencies(item, deps);
            }
        }
        Value::Map(map) => {
            for v in map.values() {
                collect_dependencies(v, deps);
            }
        }
        _ => {}
    }
}

/// Check that bindings are unique, every reference resolves and there are no cycles
pub fn check(resources: &[Resource]) -> Result<(), GraphError> {
    let mut bindings: HashMap<&str, &Resource> = HashMap::new();
    for resource in resources {
        if bindings.insert(resource.binding(), resource).is_some() {
            return Err(GraphError::DuplicateBinding(resource.binding().to_string()));
        }
    }

    for resource in resources {
        for dep in dependencies(resource) {
            if !bindings.contains_key(dep.as_str()) {
                return Err(GraphError::DanglingReference {
                    resource: resource.id.to_string(),
                    binding: dep,
                });
            }
        }
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut path: Vec<String> = Vec::new();

    fn visit(
        binding: &str,
        bindings: &HashMap<&str, &Resource>,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Result<(), GraphError> {
        if visited.contains(binding) {
            return Ok(());
        }
        if let Some(start) = path.iter().position(|b| b == binding) {
            let mut cycle = path[start..].to_vec();
            cycle.push(binding.to_string());
            return Err(GraphError::Cycle(cycle));
        }

        path.push(binding.to_string());
        if let Some(resource) = bindings.get(binding) {
            for dep in dependencies(resource) {
                visit(&dep, bindings, visited, path)?;
            }
        }
        path.pop();
        visited.insert(binding.to_string());
        Ok(())
    }

    for resource in resources {
        visit(resource.binding(), &bindings, &mut visited, &mut path)?;
    }
    Ok(())
}

/// Sort resources topologically based on dependencies.
///
/// Declaration order is kept wherever dependencies allow. Unknown bindings
/// and back edges of a cycle are ignored; run [`check`] first to reject them.
pub fn sort_by_dependencies(resources: &[Resource]) -> Vec<Resource> {
    let binding_to_resource: HashMap<&str, &Resource> =
        resources.iter().map(|r| (r.binding(), r)).collect();

    let mut sorted = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut visiting: HashSet<String> = HashSet::new();

    fn visit(
        resource: &Resource,
        binding_to_resource: &HashMap<&str, &Resource>,
        visited: &mut HashSet<String>,
        visiting: &mut HashSet<String>,
        sorted: &mut Vec<Resource>,
    ) {
        let binding_name = resource.binding().to_string();
        if visited.contains(&binding_name) || visiting.contains(&binding_name) {
            return;
        }

        visiting.insert(binding_name.clone());

        for dep in dependencies(resource) {
            if let Some(dep_resource) = binding_to_resource.get(dep.as_str()) {
                visit(dep_resource, binding_to_resource, visited, visiting, sorted);
            }
        }

        visiting.remove(&binding_name);
        visited.insert(binding_name);
        sorted.push(resource.clone());
    }

    for resource in resources {
        visit(
            resource,
            &binding_to_resource,
            &mut visited,
            &mut visiting,
            &mut sorted,
        );
    }

    sorted
}
