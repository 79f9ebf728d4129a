use crate::comparator::resource_database::ResourceDatabase;
use crate::comparator::wrappers::Field;
use crate::descriptor::annotations::ResourceReference;
use crate::error::{DetectorError, Result};
use crate::findings::{ChangeType, FindingCategory, FindingContainer};
use crate::utils::same_versioned_name;
use std::sync::Arc;

/// Compares two versions of a field with the same number.
pub struct FieldComparator<'a> {
    field_original: Option<&'a Field>,
    field_update: Option<&'a Field>,
    finding_container: &'a mut FindingContainer,
}

impl<'a> FieldComparator<'a> {
    pub fn new(
        field_original: Option<&'a Field>,
        field_update: Option<&'a Field>,
        finding_container: &'a mut FindingContainer,
    ) -> Self {
        Self {
            field_original,
            field_update,
            finding_container,
        }
    }

    /// Runs the checks in order: presence, name, repeated state, field
    /// behavior, type, oneof membership, proto3 optional, resource reference.
    /// A renamed field is reported once and not examined further.
    pub fn compare(&mut self) -> Result<()> {
        let (original, update) = match (self.field_original, self.field_update) {
            (None, None) => return Ok(()),
            (None, Some(update)) => {
                self.finding_container.add_finding(
                    FindingCategory::FieldAddition,
                    &update.proto_file_name,
                    update.source_code_line,
                    format!("A new field `{}` is added.", update.name),
                    ChangeType::Minor,
                );
                return Ok(());
            }
            (Some(original), None) => {
                self.finding_container.add_finding(
                    FindingCategory::FieldRemoval,
                    &original.proto_file_name,
                    original.source_code_line,
                    format!("An existing field `{}` is removed.", original.name),
                    ChangeType::Major,
                );
                return Ok(());
            }
            (Some(original), Some(update)) => (original, update),
        };

        // A renamed field is reported once and not examined further.
        if original.name != update.name {
            self.finding_container.add_finding(
                FindingCategory::FieldNameChange,
                &update.proto_file_name,
                update.source_code_line,
                format!(
                    "Name of an existing field is changed from `{}` to `{}`.",
                    original.name, update.name
                ),
                ChangeType::Major,
            );
            return Ok(());
        }

        if original.repeated.value != update.repeated.value {
            self.finding_container.add_finding(
                FindingCategory::FieldRepeatedChange,
                &update.proto_file_name,
                update.repeated.source_code_line,
                format!(
                    "Repeated state of an existing field `{}` is changed.",
                    original.name
                ),
                ChangeType::Major,
            );
        }
        // Optional to required breaks callers that never set the field.
        if !original.required.value && update.required.value {
            self.finding_container.add_finding(
                FindingCategory::FieldBehaviorChange,
                &update.proto_file_name,
                update.required.source_code_line,
                format!(
                    "Field behavior of an existing field `{}` is changed.",
                    original.name
                ),
                ChangeType::Major,
            );
        }

        self.compare_type(original, update);
        self.compare_oneof(original, update);
        self.compare_resource_reference(original, update)
    }

    fn compare_type(&mut self, original: &Field, update: &Field) {
        if original.proto_type.value != update.proto_type.value {
            self.finding_container.add_finding(
                FindingCategory::FieldTypeChange,
                &update.proto_file_name,
                update.proto_type.source_code_line,
                format!(
                    "Type of an existing field `{}` is changed from `{}` to `{}`.",
                    original.name, original.proto_type.value, update.proto_type.value
                ),
                ChangeType::Major,
            );
            return;
        }
        // Scalars stop here; message and enum fields also compare type names.
        let Some(original_type_name) = &original.type_name else {
            return;
        };
        let original_type_name = original_type_name.value.as_str();
        let update_type_name = update.type_name.as_ref().map_or("", |t| t.value.as_str());
        let update_line = update
            .type_name
            .as_ref()
            .and_then(|t| t.source_code_line)
            .or(update.source_code_line);

        // A move to another API version keeps the type, e.g. `.example.v1.Enum`
        // to `.example.v1beta1.Enum`; `.example.v2.EnumUpdate` does not.
        if !self.same_type(original, update, original_type_name, update_type_name) {
            self.finding_container.add_finding(
                FindingCategory::FieldTypeChange,
                &update.proto_file_name,
                update_line,
                format!(
                    "Type of an existing field `{}` is changed from `{}` to `{}`.",
                    original.name, original_type_name, update_type_name
                ),
                ChangeType::Major,
            );
            return;
        }

        // Map fields share the entry type name, so compare key and value.
        match (&original.map_entry_type, &update.map_entry_type) {
            (None, None) => {}
            (Some(_), None) => self.finding_container.add_finding(
                FindingCategory::FieldTypeChange,
                &update.proto_file_name,
                update_line,
                format!(
                    "Type of an existing field `{}` is changed from a map to `{}`.",
                    original.name, update_type_name
                ),
                ChangeType::Major,
            ),
            (None, Some(_)) => self.finding_container.add_finding(
                FindingCategory::FieldTypeChange,
                &update.proto_file_name,
                update_line,
                format!(
                    "Type of an existing field `{}` is changed from `{}` to a map.",
                    original.name, original_type_name
                ),
                ChangeType::Major,
            ),
            (Some(original_entry), Some(update_entry)) => {
                let (original_key, update_key) = (&original_entry.key, &update_entry.key);
                let (original_value, update_value) = (&original_entry.value, &update_entry.value);
                let same_key = self.same_type(original, update, original_key, update_key);
                let same_value = self.same_type(original, update, original_value, update_value);
                if !(same_key && same_value) {
                    self.finding_container.add_finding(
                        FindingCategory::FieldTypeChange,
                        &update.proto_file_name,
                        update_line,
                        format!(
                            "Type of an existing field `{}` is changed from `map<{}, {}>` to `map<{}, {}>`.",
                            original.name, original_key, original_value, update_key, update_value
                        ),
                        ChangeType::Major,
                    );
                }
            }
        }
    }

    fn same_type(
        &self,
        original: &Field,
        update: &Field,
        original_type: &str,
        update_type: &str,
    ) -> bool {
        same_versioned_name(
            original_type,
            update_type,
            original.api_version.as_deref(),
            update.api_version.as_deref(),
        )
    }

    fn compare_oneof(&mut self, original: &Field, update: &Field) {
        if original.oneof() != update.oneof() {
            let (category, message) = if original.oneof() {
                (
                    FindingCategory::FieldOneofRemoval,
                    format!(
                        "An existing field `{}` is moved out of One-of.",
                        original.name
                    ),
                )
            } else {
                (
                    FindingCategory::FieldOneofAddition,
                    format!(
                        "An existing field `{}` is moved into One-of.",
                        original.name
                    ),
                )
            };
            self.finding_container.add_finding(
                category,
                &update.proto_file_name,
                update.source_code_line,
                message,
                ChangeType::Major,
            );
        } else if original.proto3_optional && !update.proto3_optional {
            self.finding_container.add_finding(
                FindingCategory::FieldProto3OptionalChange,
                &update.proto_file_name,
                update.source_code_line,
                format!(
                    "Proto3 optional state of an existing field `{}` is changed to required.",
                    original.name
                ),
                ChangeType::Major,
            );
        } else if !original.proto3_optional && update.proto3_optional {
            self.finding_container.add_finding(
                FindingCategory::FieldProto3OptionalChange,
                &update.proto_file_name,
                update.source_code_line,
                format!(
                    "An existing field `{}` is changed to proto3 optional.",
                    original.name
                ),
                ChangeType::Minor,
            );
        }
    }

    fn compare_resource_reference(&mut self, original: &Field, update: &Field) -> Result<()> {
        match (&original.resource_reference, &update.resource_reference) {
            (None, None) => {}
            (None, Some(reference)) => {
                // Adding a reference is only safe if the resource is defined somewhere.
                if resource_in_database(update, &reference.value) {
                    self.finding_container.add_finding(
                        FindingCategory::ResourceReferenceAddition,
                        &update.proto_file_name,
                        reference.source_code_line,
                        format!(
                            "A resource reference option is added to the field `{}`.",
                            original.name
                        ),
                        ChangeType::Minor,
                    );
                } else {
                    self.finding_container.add_finding(
                        FindingCategory::ResourceReferenceAddition,
                        &update.proto_file_name,
                        reference.source_code_line,
                        format!(
                            "A resource reference option is added to the field `{}`, but it is not defined anywhere",
                            original.name
                        ),
                        ChangeType::Major,
                    );
                }
            }
            (Some(reference), None) => {
                // Removal is fine when the message now declares the resource itself.
                if resource_ref_in_local(original, update, &reference.value)? {
                    self.finding_container.add_finding(
                        FindingCategory::ResourceReferenceRemoval,
                        &original.proto_file_name,
                        reference.source_code_line,
                        format!(
                            "A resource reference option of the field `{}` is removed, but added back to the message options.",
                            original.name
                        ),
                        ChangeType::Minor,
                    );
                } else {
                    self.finding_container.add_finding(
                        FindingCategory::ResourceReferenceRemoval,
                        &original.proto_file_name,
                        reference.source_code_line,
                        format!(
                            "A resource reference option of the field `{}` is removed.",
                            original.name
                        ),
                        ChangeType::Major,
                    );
                }
            }
            (Some(reference_original), Some(reference_update)) => {
                if original.child_type() == update.child_type() {
                    // Same kind of reference on both sides: the named type must match.
                    let original_type = reference_original.value.resource_type();
                    let original_type = original_type.unwrap_or_default();
                    let update_type = reference_update.value.resource_type();
                    let update_type = update_type.unwrap_or_default();
                    if original_type != update_type {
                        self.finding_container.add_finding(
                            FindingCategory::ResourceReferenceChange,
                            &update.proto_file_name,
                            reference_update.source_code_line,
                            format!(
                                "The type of resource reference option of the field `{}` is changed from `{}` to `{}`.",
                                original.name, original_type, update_type
                            ),
                            ChangeType::Major,
                        );
                    }
                } else if original.child_type() {
                    // `child_type` became `type`: fine if `type` is a parent of the old child.
                    self.check_parent_type(
                        original,
                        &reference_original.value.child_type,
                        &reference_update.value.r#type,
                        original.resource_database.as_ref(),
                        &update.proto_file_name,
                        reference_update.source_code_line,
                    );
                } else {
                    // `type` became `child_type`: the old type must be a parent of the new child.
                    self.check_parent_type(
                        original,
                        &reference_update.value.child_type,
                        &reference_original.value.r#type,
                        update.resource_database.as_ref(),
                        &update.proto_file_name,
                        reference_update.source_code_line,
                    );
                }
            }
        }
        Ok(())
    }

    fn check_parent_type(
        &mut self,
        original: &Field,
        child_type: &str,
        parent_type: &str,
        resource_database: Option<&Arc<ResourceDatabase>>,
        proto_file_name: &str,
        source_code_line: Option<usize>,
    ) {
        let resolved = resource_database.map_or(false, |database| {
            database
                .get_parent_resources_by_child_type(child_type)
                .iter()
                .any(|parent| parent.value.r#type == parent_type)
        });
        if !resolved {
            self.finding_container.add_finding(
                FindingCategory::ResourceReferenceChange,
                proto_file_name,
                source_code_line,
                format!(
                    "The child_type `{}` and type `{}` of resource reference option in field `{}` cannot be resolved to the identical resource.",
                    child_type, parent_type, original.name
                ),
                ChangeType::Major,
            );
        }
    }
}

/// Whether the resource a newly added reference points at is defined in the update.
fn resource_in_database(update: &Field, reference: &ResourceReference) -> bool {
    let Some(database) = &update.resource_database else {
        return false;
    };
    if update.child_type() {
        !database
            .get_parent_resources_by_child_type(&reference.child_type)
            .is_empty()
    } else {
        database.get_resource_by_type(&reference.r#type).is_some()
    }
}

/// Whether a removed reference is now covered by the enclosing message's own resource.
fn resource_ref_in_local(
    original: &Field,
    update: &Field,
    reference: &ResourceReference,
) -> Result<bool> {
    let Some(message_resource) = &update.message_resource else {
        return Ok(false);
    };
    let checked_type = reference
        .resource_type()
        .ok_or_else(|| DetectorError::EmptyResourceReference {
            field: original.name.clone(),
        })?;
    let local_type = &message_resource.value.r#type;
    if original.child_type() {
        // The message resource has to be one of the child type's parents.
        let Some(database) = &update.resource_database else {
            return Ok(false);
        };
        Ok(database
            .get_parent_resources_by_child_type(&reference.child_type)
            .iter()
            .any(|parent| &parent.value.r#type == local_type))
    } else {
        Ok(*local_type == checked_type)
    }
}
