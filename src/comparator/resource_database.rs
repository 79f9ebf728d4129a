use crate::comparator::wrappers::WithLocation;
use crate::descriptor::annotations::ResourceDescriptor;
use std::collections::BTreeMap;

/// Every resource definition known to one version of the API.
///
/// Holds both file-level `google.api.resource_definition` entries and
/// message-level `google.api.resource` options, indexed by resource type and
/// by pattern. Field comparisons consult it to decide whether a changed
/// `google.api.resource_reference` still resolves to the same resource.
#[derive(Debug, Default, Clone)]
pub struct ResourceDatabase {
    /// Resource type (e.g. `example.googleapis.com/Foo`) to its definition.
    pub types: BTreeMap<String, WithLocation<ResourceDescriptor>>,
    /// Pattern (e.g. `foo/{foo}/bar/{bar}`) to every resource declaring it.
    pub patterns: BTreeMap<String, Vec<WithLocation<ResourceDescriptor>>>,
}

impl ResourceDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource. Resources without a type are ignored; for duplicated
    /// types the first registration wins.
    pub fn register_resource(&mut self, resource: WithLocation<ResourceDescriptor>) {
        let resource_type = resource.value.r#type.clone();
        if resource_type.is_empty() {
            log::warn!(
                "Ignoring a resource definition without type in {}",
                resource.proto_file_name
            );
            return;
        }
        if self.types.contains_key(&resource_type) {
            log::debug!("Resource `{}` is already registered", resource_type);
            return;
        }
        for pattern in &resource.value.pattern {
            self.patterns
                .entry(pattern.clone())
                .or_default()
                .push(resource.clone());
        }
        self.types.insert(resource_type, resource);
    }

    pub fn get_resource_by_type(
        &self,
        resource_type: &str,
    ) -> Option<&WithLocation<ResourceDescriptor>> {
        self.types.get(resource_type)
    }

    pub fn get_resources_by_pattern(&self, pattern: &str) -> &[WithLocation<ResourceDescriptor>] {
        self.patterns.get(pattern).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resources whose patterns are the parents of the patterns of `child_type`.
    ///
    /// The parent of `foo/{foo}/bar/{bar}` is `foo/{foo}`; a trailing singleton
    /// segment (`foo/{foo}/settings`) is stripped on its own.
    pub fn get_parent_resources_by_child_type(
        &self,
        child_type: &str,
    ) -> Vec<&WithLocation<ResourceDescriptor>> {
        let Some(child) = self.get_resource_by_type(child_type) else {
            return Vec::new();
        };
        let mut parents: Vec<&WithLocation<ResourceDescriptor>> = Vec::new();
        for pattern in &child.value.pattern {
            let Some(parent_pattern) = parent_pattern(pattern) else {
                continue;
            };
            for parent in self.get_resources_by_pattern(&parent_pattern) {
                let parent_type = &parent.value.r#type;
                if !parents.iter().any(|p| &p.value.r#type == parent_type) {
                    parents.push(parent);
                }
            }
        }
        parents
    }
}

fn parent_pattern(pattern: &str) -> Option<String> {
    let mut segments: Vec<&str> = pattern.split('/').collect();
    let strip = match segments.last() {
        Some(last) if last.starts_with('{') => 2,
        _ => 1,
    };
    if segments.len() <= strip {
        return None;
    }
    segments.truncate(segments.len() - strip);
    Some(segments.join("/"))
}
