use crate::comparator::compare_resource_patterns;
use crate::comparator::enum_comparator::EnumComparator;
use crate::comparator::message_comparator::MessageComparator;
use crate::comparator::service_comparator::ServiceComparator;
use crate::comparator::wrappers::{FileSet, WithLocation};
use crate::error::Result;
use crate::findings::{ChangeType, FindingCategory, FindingContainer};
use crate::utils::transform_api_version;
use std::collections::{BTreeMap, BTreeSet};

/// Compares two versions of a whole API.
///
/// Messages and enums are looked up across API versions: `.example.v1.Foo`
/// in the original is compared against `.example.v1beta1.Foo` in an update
/// whose package moved to `v1beta1`.
pub struct FileSetComparator<'a> {
    file_set_original: &'a FileSet,
    file_set_update: &'a FileSet,
    finding_container: &'a mut FindingContainer,
}

impl<'a> FileSetComparator<'a> {
    pub fn new(
        file_set_original: &'a FileSet,
        file_set_update: &'a FileSet,
        finding_container: &'a mut FindingContainer,
    ) -> Self {
        Self {
            file_set_original,
            file_set_update,
            finding_container,
        }
    }

    pub fn compare(&mut self) -> Result<()> {
        self.compare_services()?;
        self.compare_messages()?;
        self.compare_enums();
        self.compare_file_resources();
        self.compare_packaging_options();
        Ok(())
    }

    fn original_version(&self) -> Option<&'a str> {
        self.file_set_original.api_version.as_deref()
    }

    fn update_version(&self) -> Option<&'a str> {
        self.file_set_update.api_version.as_deref()
    }

    /// The name `name` of the original would have in the update.
    fn forward(&self, name: &str) -> String {
        transform_api_version(name, self.original_version(), self.update_version())
            .unwrap_or_else(|| name.to_string())
    }

    /// The name `name` of the update would have had in the original.
    fn backward(&self, name: &str) -> String {
        transform_api_version(name, self.update_version(), self.original_version())
            .unwrap_or_else(|| name.to_string())
    }

    /// The update's counterpart of the original type `name`.
    ///
    /// Types from packages that did not move (`.google.iam.v1.Policy` while the
    /// API goes from `v1` to `v1beta1`) keep their name, so the exact name is
    /// tried before the version-moved one.
    fn counterpart<'m, T>(&self, updates: &'m BTreeMap<String, T>, name: &str) -> Option<&'m T> {
        updates
            .get(name)
            .or_else(|| updates.get(&self.forward(name)))
    }

    fn compare_services(&mut self) -> Result<()> {
        let (original, update) = (self.file_set_original, self.file_set_update);
        let names: BTreeSet<&String> = original
            .services_map
            .keys()
            .chain(update.services_map.keys())
            .collect();
        for name in names {
            ServiceComparator::new(
                original.services_map.get(name),
                update.services_map.get(name),
                self.finding_container,
            )
            .compare()?;
        }
        Ok(())
    }

    fn compare_messages(&mut self) -> Result<()> {
        let (original, update) = (self.file_set_original, self.file_set_update);
        for (name, message) in &original.messages_map {
            let message_update = self.counterpart(&update.global_messages_map, name);
            MessageComparator::new(Some(message), message_update, self.finding_container)
                .compare()?;
        }
        // An update-only message is new unless the original has it under either name.
        let original_messages = &original.global_messages_map;
        for (name, message) in &update.messages_map {
            let known = original_messages.contains_key(&self.backward(name))
                || original_messages.contains_key(name);
            if !known {
                MessageComparator::new(None, Some(message), self.finding_container).compare()?;
            }
        }
        Ok(())
    }

    fn compare_enums(&mut self) {
        let (original, update) = (self.file_set_original, self.file_set_update);
        for (name, enum_original) in &original.enums_map {
            let enum_update = self.counterpart(&update.global_enums_map, name);
            EnumComparator::new(Some(enum_original), enum_update, self.finding_container)
                .compare();
        }
        let original_enums = &original.global_enums_map;
        for (name, enum_update) in &update.enums_map {
            let known = original_enums.contains_key(&self.backward(name))
                || original_enums.contains_key(name);
            if !known {
                EnumComparator::new(None, Some(enum_update), self.finding_container).compare();
            }
        }
    }

    fn compare_file_resources(&mut self) {
        let (original, update) = (self.file_set_original, self.file_set_update);
        for (resource_type, resource) in &original.file_resources {
            // A definition moved into a message option is still defined.
            match update.resources_database.get_resource_by_type(resource_type) {
                Some(resource_update) => {
                    compare_resource_patterns(resource, resource_update, self.finding_container)
                }
                None => self.finding_container.add_finding(
                    FindingCategory::ResourceDefinitionRemoval,
                    &resource.proto_file_name,
                    resource.source_code_line,
                    format!(
                        "An existing file-level resource definition `{}` has been removed.",
                        resource_type
                    ),
                    ChangeType::Major,
                ),
            }
        }
        for (resource_type, resource) in &update.file_resources {
            if original
                .resources_database
                .get_resource_by_type(resource_type)
                .is_none()
            {
                self.finding_container.add_finding(
                    FindingCategory::ResourceDefinitionAddition,
                    &resource.proto_file_name,
                    resource.source_code_line,
                    format!(
                        "A file-level resource definition `{}` has been added.",
                        resource_type
                    ),
                    ChangeType::Minor,
                );
            }
        }
    }

    fn compare_packaging_options(&mut self) {
        let (original, update) = (self.file_set_original, self.file_set_update);
        let (ov, uv) = (self.original_version(), self.update_version());
        let empty = BTreeMap::new();
        // Values are matched across versions, `v1` and `V1` alike.
        for (option, values) in &original.packaging_options_map {
            let values_update = update.packaging_options_map.get(option).unwrap_or(&empty);
            for (value, located) in values {
                if !contains_versioned(values_update, value, ov, uv) {
                    let fallback = values_update.values().next();
                    self.finding_container.add_finding(
                        FindingCategory::PackagingOptionRemoval,
                        fallback.map_or(&located.proto_file_name, |l| &l.proto_file_name),
                        fallback.map_or(located.source_code_line, |l| l.source_code_line),
                        format!(
                            "An existing packaging option `{}` for `{}` is removed.",
                            value, option
                        ),
                        ChangeType::Major,
                    );
                }
            }
        }
        for (option, values) in &update.packaging_options_map {
            let values_original = original.packaging_options_map.get(option).unwrap_or(&empty);
            for (value, located) in values {
                if !contains_versioned(values_original, value, uv, ov) {
                    self.finding_container.add_finding(
                        FindingCategory::PackagingOptionAddition,
                        &located.proto_file_name,
                        located.source_code_line,
                        format!(
                            "A new packaging option `{}` for `{}` is added.",
                            value, option
                        ),
                        ChangeType::Minor,
                    );
                }
            }
        }
    }
}

/// Whether `candidates` holds `value` after moving it from version `from` to
/// `to`. Both the package form (`v1`) and the capitalized form used by C# and
/// PHP namespaces (`V1`) are moved.
fn contains_versioned(
    candidates: &BTreeMap<String, WithLocation<String>>,
    value: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> bool {
    if candidates.contains_key(value) {
        return true;
    }
    if let Some(moved) = transform_api_version(value, from, to) {
        if candidates.contains_key(&moved) {
            return true;
        }
    }
    let (Some(from), Some(to)) = (from, to) else {
        return false;
    };
    let moved = value.replace(&capitalize(from), &capitalize(to));
    candidates.contains_key(&moved)
}

fn capitalize(version: &str) -> String {
    let mut chars = version.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
