use crate::comparator::enum_value_comparator::EnumValueComparator;
use crate::comparator::wrappers::Enum;
use crate::findings::{ChangeType, FindingCategory, FindingContainer};
use std::collections::BTreeSet;

/// Compares two versions of an enum. Values are matched by number.
pub struct EnumComparator<'a> {
    enum_original: Option<&'a Enum>,
    enum_update: Option<&'a Enum>,
    finding_container: &'a mut FindingContainer,
}

impl<'a> EnumComparator<'a> {
    pub fn new(
        enum_original: Option<&'a Enum>,
        enum_update: Option<&'a Enum>,
        finding_container: &'a mut FindingContainer,
    ) -> Self {
        Self {
            enum_original,
            enum_update,
            finding_container,
        }
    }

    pub fn compare(&mut self) {
        let (original, update) = match (self.enum_original, self.enum_update) {
            (None, None) => return,
            (None, Some(update)) => {
                self.finding_container.add_finding(
                    FindingCategory::EnumAddition,
                    &update.proto_file_name,
                    update.source_code_line,
                    format!("A new Enum `{}` is added.", update.name),
                    ChangeType::Minor,
                );
                return;
            }
            (Some(original), None) => {
                self.finding_container.add_finding(
                    FindingCategory::EnumRemoval,
                    &original.proto_file_name,
                    original.source_code_line,
                    format!("An existing Enum `{}` is removed.", original.name),
                    ChangeType::Major,
                );
                return;
            }
            (Some(original), Some(update)) => (original, update),
        };

        let numbers: BTreeSet<i32> = original
            .values
            .keys()
            .chain(update.values.keys())
            .copied()
            .collect();
        for number in numbers {
            EnumValueComparator::new(
                original.values.get(&number),
                update.values.get(&number),
                self.finding_container,
            )
            .compare();
        }
    }
}
