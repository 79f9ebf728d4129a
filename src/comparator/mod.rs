//! Comparators for each level of an API definition.
//!
//! Each comparator takes the original and the updated version of one element
//! (either may be absent) and records the differences in a shared
//! `FindingContainer`. Parents drive their children: the file set comparator
//! runs the service, message and enum comparators, which in turn run the
//! method, field and enum value checks.

pub mod enum_comparator;
pub mod enum_value_comparator;
pub mod field_comparator;
pub mod file_set_comparator;
pub mod message_comparator;
pub mod resource_database;
pub mod service_comparator;
pub mod wrappers;

pub use enum_comparator::EnumComparator;
pub use enum_value_comparator::EnumValueComparator;
pub use field_comparator::FieldComparator;
pub use file_set_comparator::FileSetComparator;
pub use message_comparator::MessageComparator;
pub use service_comparator::ServiceComparator;

use crate::comparator::wrappers::WithLocation;
use crate::descriptor::annotations::ResourceDescriptor;
use crate::findings::{ChangeType, FindingCategory, FindingContainer};

/// Compares the patterns of two definitions of the same resource type.
///
/// Patterns are positional: a pattern removed or rewritten in place is
/// breaking, patterns appended at the end are not.
pub(crate) fn compare_resource_patterns(
    original: &WithLocation<ResourceDescriptor>,
    update: &WithLocation<ResourceDescriptor>,
    finding_container: &mut FindingContainer,
) {
    let resource_type = &original.value.r#type;
    let update_patterns = &update.value.pattern;
    for (i, pattern) in original.value.pattern.iter().enumerate() {
        match update_patterns.get(i) {
            None => finding_container.add_finding(
                FindingCategory::ResourcePatternRemoval,
                &update.proto_file_name,
                update.source_code_line,
                format!(
                    "A pattern `{}` of the resource definition `{}` is removed.",
                    pattern, resource_type
                ),
                ChangeType::Major,
            ),
            Some(update_pattern) if update_pattern != pattern => finding_container.add_finding(
                FindingCategory::ResourcePatternChange,
                &update.proto_file_name,
                update.source_code_line,
                format!(
                    "Pattern value of the resource definition `{}` is updated from `{}` to `{}`.",
                    resource_type, pattern, update_pattern
                ),
                ChangeType::Major,
            ),
            Some(_) => {}
        }
    }
    for added in update_patterns.iter().skip(original.value.pattern.len()) {
        finding_container.add_finding(
            FindingCategory::ResourcePatternAddition,
            &update.proto_file_name,
            update.source_code_line,
            format!(
                "A new pattern `{}` is added to the resource definition `{}`.",
                added, resource_type
            ),
            ChangeType::Minor,
        );
    }
}
