use crate::comparator::compare_resource_patterns;
use crate::comparator::enum_comparator::EnumComparator;
use crate::comparator::field_comparator::FieldComparator;
use crate::comparator::wrappers::Message;
use crate::error::Result;
use crate::findings::{ChangeType, FindingCategory, FindingContainer};
use std::collections::BTreeSet;

/// Compares two versions of a message: its fields by number, its nested
/// messages and enums by name, and its `google.api.resource` option.
pub struct MessageComparator<'a> {
    message_original: Option<&'a Message>,
    message_update: Option<&'a Message>,
    finding_container: &'a mut FindingContainer,
}

impl<'a> MessageComparator<'a> {
    pub fn new(
        message_original: Option<&'a Message>,
        message_update: Option<&'a Message>,
        finding_container: &'a mut FindingContainer,
    ) -> Self {
        Self {
            message_original,
            message_update,
            finding_container,
        }
    }

    pub fn compare(&mut self) -> Result<()> {
        let (original, update) = match (self.message_original, self.message_update) {
            (None, None) => return Ok(()),
            (None, Some(update)) => {
                self.finding_container.add_finding(
                    FindingCategory::MessageAddition,
                    &update.proto_file_name,
                    update.source_code_line,
                    format!("A new message `{}` is added.", update.name),
                    ChangeType::Minor,
                );
                return Ok(());
            }
            (Some(original), None) => {
                self.finding_container.add_finding(
                    FindingCategory::MessageRemoval,
                    &original.proto_file_name,
                    original.source_code_line,
                    format!("An existing message `{}` is removed.", original.name),
                    ChangeType::Major,
                );
                return Ok(());
            }
            (Some(original), Some(update)) => (original, update),
        };

        self.compare_fields(original, update)?;
        self.compare_nested(original, update)?;
        self.compare_resources(original, update);
        Ok(())
    }

    fn compare_fields(&mut self, original: &Message, update: &Message) -> Result<()> {
        // Fields pair up by number, so a renamed field is still the same field.
        let numbers: BTreeSet<i32> = original
            .fields
            .keys()
            .chain(update.fields.keys())
            .copied()
            .collect();
        for number in numbers {
            FieldComparator::new(
                original.fields.get(&number),
                update.fields.get(&number),
                self.finding_container,
            )
            .compare()?;
        }
        Ok(())
    }

    fn compare_nested(&mut self, original: &Message, update: &Message) -> Result<()> {
        // Nested types pair up by name.
        let names: BTreeSet<&String> = original
            .nested_messages
            .keys()
            .chain(update.nested_messages.keys())
            .collect();
        for name in names {
            MessageComparator::new(
                original.nested_messages.get(name),
                update.nested_messages.get(name),
                self.finding_container,
            )
            .compare()?;
        }

        let names: BTreeSet<&String> = original
            .nested_enums
            .keys()
            .chain(update.nested_enums.keys())
            .collect();
        for name in names {
            EnumComparator::new(
                original.nested_enums.get(name),
                update.nested_enums.get(name),
                self.finding_container,
            )
            .compare();
        }
        Ok(())
    }

    fn compare_resources(&mut self, original: &Message, update: &Message) {
        match (&original.resource, &update.resource) {
            (None, None) => {}
            (None, Some(added)) => self.finding_container.add_finding(
                FindingCategory::ResourceDefinitionAddition,
                &added.proto_file_name,
                added.source_code_line,
                format!(
                    "A message-level resource definition `{}` has been added.",
                    added.value.r#type
                ),
                ChangeType::Minor,
            ),
            (Some(removed), None) => {
                // Moving the definition to the file level keeps the resource.
                let moved = update
                    .resource_database
                    .as_ref()
                    .and_then(|db| db.get_resource_by_type(&removed.value.r#type));
                match moved {
                    Some(moved) => {
                        compare_resource_patterns(removed, moved, self.finding_container)
                    }
                    None => self.finding_container.add_finding(
                        FindingCategory::ResourceDefinitionRemoval,
                        &update.proto_file_name,
                        update.source_code_line,
                        format!(
                            "A message-level resource definition `{}` has been removed.",
                            removed.value.r#type
                        ),
                        ChangeType::Major,
                    ),
                }
            }
            (Some(resource_original), Some(resource_update)) => {
                if resource_original.value.r#type != resource_update.value.r#type {
                    self.finding_container.add_finding(
                        FindingCategory::ResourceDefinitionChange,
                        &resource_update.proto_file_name,
                        resource_update.source_code_line,
                        format!(
                            "The type of the message-level resource definition is changed from `{}` to `{}`.",
                            resource_original.value.r#type, resource_update.value.r#type
                        ),
                        ChangeType::Major,
                    );
                    return;
                }
                compare_resource_patterns(
                    resource_original,
                    resource_update,
                    self.finding_container,
                );
            }
        }
    }
}
