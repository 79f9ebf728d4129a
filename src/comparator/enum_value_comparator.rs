use crate::comparator::wrappers::EnumValue;
use crate::findings::{ChangeType, FindingCategory, FindingContainer};

/// Compares two versions of an enum value with the same number.
pub struct EnumValueComparator<'a> {
    enum_value_original: Option<&'a EnumValue>,
    enum_value_update: Option<&'a EnumValue>,
    finding_container: &'a mut FindingContainer,
}

impl<'a> EnumValueComparator<'a> {
    pub fn new(
        enum_value_original: Option<&'a EnumValue>,
        enum_value_update: Option<&'a EnumValue>,
        finding_container: &'a mut FindingContainer,
    ) -> Self {
        Self {
            enum_value_original,
            enum_value_update,
            finding_container,
        }
    }

    pub fn compare(&mut self) {
        match (self.enum_value_original, self.enum_value_update) {
            (None, Some(update)) => self.finding_container.add_finding(
                FindingCategory::EnumValueAddition,
                &update.proto_file_name,
                update.source_code_line,
                format!("A new EnumValue `{}` is added.", update.name),
                ChangeType::Minor,
            ),
            (Some(original), None) => self.finding_container.add_finding(
                FindingCategory::EnumValueRemoval,
                &original.proto_file_name,
                original.source_code_line,
                format!("An existing EnumValue `{}` is removed.", original.name),
                ChangeType::Major,
            ),
            (Some(original), Some(update)) if original.name != update.name => {
                self.finding_container.add_finding(
                    FindingCategory::EnumValueNameChange,
                    &update.proto_file_name,
                    update.source_code_line,
                    format!(
                        "Name of the EnumValue is changed from `{}` to `{}`.",
                        original.name, update.name
                    ),
                    ChangeType::Major,
                )
            }
            _ => {}
        }
    }
}
