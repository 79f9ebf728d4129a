use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of change a finding describes.
///
/// Serialized in SCREAMING_SNAKE_CASE, e.g. `FIELD_TYPE_CHANGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCategory {
    EnumValueAddition,
    EnumValueRemoval,
    EnumValueNameChange,
    EnumAddition,
    EnumRemoval,
    FieldAddition,
    FieldRemoval,
    FieldNameChange,
    FieldRepeatedChange,
    FieldTypeChange,
    FieldBehaviorChange,
    FieldOneofRemoval,
    FieldOneofAddition,
    FieldProto3OptionalChange,
    MessageAddition,
    MessageRemoval,
    ResourceDefinitionAddition,
    ResourceDefinitionRemoval,
    ResourceDefinitionChange,
    ResourcePatternAddition,
    ResourcePatternRemoval,
    ResourcePatternChange,
    ResourceReferenceAddition,
    ResourceReferenceRemoval,
    ResourceReferenceChange,
    ServiceAddition,
    ServiceRemoval,
    ServiceHostAddition,
    ServiceHostRemoval,
    ServiceHostChange,
    OauthScopeAddition,
    OauthScopeRemoval,
    MethodAddition,
    MethodRemoval,
    MethodInputTypeChange,
    MethodResponseTypeChange,
    MethodClientStreamingChange,
    MethodServerStreamingChange,
    MethodPaginatedResponseChange,
    MethodSignatureChange,
    LroAnnotationAddition,
    LroAnnotationRemoval,
    LroResponseChange,
    LroMetadataChange,
    HttpAnnotationAddition,
    HttpAnnotationRemoval,
    HttpAnnotationChange,
    PackagingOptionAddition,
    PackagingOptionRemoval,
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reuse the serde name so the text and JSON forms never drift apart.
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => f.write_str(&name),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// Whether a change breaks existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    /// Breaking change; needs a major version bump.
    Major,
    /// Backwards compatible change.
    Minor,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeType::Major => f.write_str("MAJOR"),
            ChangeType::Minor => f.write_str("MINOR"),
        }
    }
}
