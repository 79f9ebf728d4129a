//! Messages of the Google API annotation extensions
//! (`google/api/*.proto`, `google/longrunning/operations.proto`).

/// `google.api.FieldBehavior`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum FieldBehavior {
    Unspecified = 0,
    Optional = 1,
    Required = 2,
    OutputOnly = 3,
    InputOnly = 4,
    Immutable = 5,
    UnorderedList = 6,
    NonEmptyDefault = 7,
    Identifier = 8,
}

/// `google.api.ResourceDescriptor`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResourceDescriptor {
    #[prost(string, tag = "1")]
    pub r#type: String,
    #[prost(string, repeated, tag = "2")]
    pub pattern: Vec<String>,
    #[prost(string, tag = "3")]
    pub name_field: String,
    #[prost(string, tag = "5")]
    pub plural: String,
    #[prost(string, tag = "6")]
    pub singular: String,
}

/// `google.api.ResourceReference`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResourceReference {
    #[prost(string, tag = "1")]
    pub r#type: String,
    #[prost(string, tag = "2")]
    pub child_type: String,
}

impl ResourceReference {
    /// The referenced resource type, whichever of `type` / `child_type` is set.
    pub fn resource_type(&self) -> Option<&str> {
        if !self.r#type.is_empty() {
            Some(&self.r#type)
        } else if !self.child_type.is_empty() {
            Some(&self.child_type)
        } else {
            None
        }
    }
}

/// `google.longrunning.OperationInfo`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OperationInfo {
    #[prost(string, tag = "1")]
    pub response_type: String,
    #[prost(string, tag = "2")]
    pub metadata_type: String,
}

/// `google.api.HttpRule`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HttpRule {
    #[prost(string, tag = "1")]
    pub selector: String,
    #[prost(oneof = "http_rule::Pattern", tags = "2, 3, 4, 5, 6, 8")]
    pub pattern: Option<http_rule::Pattern>,
    #[prost(string, tag = "7")]
    pub body: String,
    #[prost(string, tag = "12")]
    pub response_body: String,
    #[prost(message, repeated, tag = "11")]
    pub additional_bindings: Vec<HttpRule>,
}

pub mod http_rule {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Pattern {
        #[prost(string, tag = "2")]
        Get(String),
        #[prost(string, tag = "3")]
        Put(String),
        #[prost(string, tag = "4")]
        Post(String),
        #[prost(string, tag = "5")]
        Delete(String),
        #[prost(string, tag = "6")]
        Patch(String),
        #[prost(message, tag = "8")]
        Custom(super::CustomHttpPattern),
    }

    impl Pattern {
        /// The HTTP verb and URI template of the binding.
        pub fn method_and_uri(&self) -> (&str, &str) {
            match self {
                Pattern::Get(uri) => ("get", uri),
                Pattern::Put(uri) => ("put", uri),
                Pattern::Post(uri) => ("post", uri),
                Pattern::Delete(uri) => ("delete", uri),
                Pattern::Patch(uri) => ("patch", uri),
                Pattern::Custom(custom) => (&custom.kind, &custom.path),
            }
        }
    }
}

/// `google.api.CustomHttpPattern`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomHttpPattern {
    #[prost(string, tag = "1")]
    pub kind: String,
    #[prost(string, tag = "2")]
    pub path: String,
}
