mod common;

use common::*;
use proto_breaking_change_detector::comparator::wrappers::{paged_result_field, FileSet};
use proto_breaking_change_detector::descriptor::annotations::{
    http_rule, FieldBehavior, HttpRule, OperationInfo, ResourceDescriptor, ResourceReference,
};
use proto_breaking_change_detector::descriptor::field_descriptor_proto::Type;
use proto_breaking_change_detector::descriptor::{
    DescriptorProto, FieldOptions, FileDescriptorProto, FileOptions, MessageOptions, MethodOptions,
    OneofDescriptorProto, ServiceOptions,
};

const OPERATIONS_PROTO: &str = "google/longrunning/operations.proto";
const STATUS_PROTO: &str = "google/rpc/status.proto";

fn status_file() -> FileDescriptorProto {
    let mut file = file_proto(STATUS_PROTO, "google.rpc");
    file.message_type = vec![message_proto(
        "Status",
        vec![
            field_proto("code", 1, Type::Int32),
            field_proto("message", 2, Type::String),
        ],
    )];
    file
}

fn operations_file() -> FileDescriptorProto {
    let mut file = file_proto(OPERATIONS_PROTO, "google.longrunning");
    file.dependency = vec![STATUS_PROTO.to_string()];
    file.message_type = vec![message_proto(
        "Operation",
        vec![
            field_proto("name", 1, Type::String),
            typed_field_proto("metadata", 2, Type::Message, ".google.protobuf.Any"),
            typed_field_proto("error", 4, Type::Message, ".google.rpc.Status"),
        ],
    )];
    file.service = vec![service_proto(
        "Operations",
        vec![method_proto(
            "GetOperation",
            ".google.longrunning.GetOperationRequest",
            ".google.longrunning.Operation",
        )],
    )];
    file
}

/// An API exercising every wrapper: a service with plain and long-running
/// methods, oneofs, nested types, maps, resources and field behaviors.
fn wrappers_file() -> FileDescriptorProto {
    let mut file = file_proto("wrappers.proto", "example.v1alpha");
    file.dependency = vec![OPERATIONS_PROTO.to_string()];
    file.options = Some(FileOptions {
        java_package: Some("com.example.v1alpha".to_string()),
        csharp_namespace: Some("Example.V1alpha".to_string()),
        resource_definition: vec![ResourceDescriptor {
            r#type: "example.googleapis.com/t1".to_string(),
            pattern: vec![
                "foo/{foo}".to_string(),
                "foo/{foo}/bar/{bar}/t1".to_string(),
            ],
            ..Default::default()
        }],
        ..Default::default()
    });

    let mut foo = method_proto(
        "Foo",
        ".example.v1alpha.FooRequest",
        ".example.v1alpha.FooResponse",
    );
    foo.options = Some(MethodOptions {
        method_signature: vec!["content".to_string(), "error".to_string()],
        http: Some(HttpRule {
            pattern: Some(http_rule::Pattern::Post("/v1/example:foo".to_string())),
            body: "*".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    });
    let mut bar = method_proto(
        "Bar",
        ".example.v1alpha.FooRequest",
        ".google.longrunning.Operation",
    );
    bar.options = Some(MethodOptions {
        operation_info: Some(OperationInfo {
            response_type: "FooResponse".to_string(),
            metadata_type: "FooMetadata".to_string(),
        }),
        http: Some(HttpRule {
            pattern: Some(http_rule::Pattern::Get("/v1/example:bar".to_string())),
            ..Default::default()
        }),
        ..Default::default()
    });
    let mut service = service_proto("Example", vec![foo, bar]);
    service.options = Some(ServiceOptions {
        default_host: Some("example.googleapis.com".to_string()),
        oauth_scopes: Some("https://www.googleapis.com/auth/cloud-platform".to_string()),
    });
    file.service = vec![service];

    let mut content = field_proto("content", 1, Type::String);
    content.oneof_index = Some(0);
    let mut error = field_proto("error", 2, Type::String);
    error.oneof_index = Some(0);
    let mut foo_request = message_proto("FooRequest", vec![content, error]);
    foo_request.oneof_decl = vec![OneofDescriptorProto {
        name: Some("response".to_string()),
    }];
    foo_request.nested_type = vec![message_proto("NestedMessage", Vec::new())];
    foo_request.enum_type = vec![enum_proto("NestedEnum", &[("NESTED_UNSPECIFIED", 0)])];
    foo_request.options = Some(MessageOptions {
        resource: Some(ResourceDescriptor {
            r#type: "example.googleapis.com/Foo".to_string(),
            pattern: vec!["foo/{foo}/bar/{bar}".to_string()],
            ..Default::default()
        }),
        ..Default::default()
    });

    let mut enum_field = typed_field_proto("enum_field", 1, Type::Enum, ".example.v1alpha.Enum1");
    enum_field.options = Some(FieldOptions {
        resource_reference: Some(ResourceReference {
            child_type: "example.googleapis.com/t1".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    });
    let foo_response = message_proto("FooResponse", vec![enum_field]);

    let mut name = field_proto("name", 1, Type::String);
    name.options = Some(FieldOptions {
        field_behavior: vec![FieldBehavior::Required as i32],
        ..Default::default()
    });
    let foo_metadata = message_proto("FooMetadata", vec![name]);

    let mut map_message = message_proto(
        "MapMessage",
        vec![repeated(typed_field_proto(
            "first_field",
            1,
            Type::Message,
            ".example.v1alpha.MapMessage.FirstFieldEntry",
        ))],
    );
    map_message.nested_type = vec![DescriptorProto {
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..message_proto(
            "FirstFieldEntry",
            vec![
                field_proto("key", 1, Type::String),
                typed_field_proto("value", 2, Type::Message, ".example.v1alpha.FooMetadata"),
            ],
        )
    }];

    file.message_type = vec![foo_request, foo_response, foo_metadata, map_message];
    file.enum_type = vec![enum_proto("Enum1", &[("a", 0), ("b", 1)])];
    file.source_code_info = Some(source_info(vec![
        (vec![8, 1], 8),
        (vec![6, 0], 20),
        (vec![6, 0, 3, 1050], 21),
        (vec![6, 0, 2, 0], 23),
        (vec![6, 0, 2, 1], 31),
        (vec![4, 0], 43),
        (vec![4, 0, 2, 0], 49),
        (vec![4, 0, 2, 1], 50),
        (vec![4, 0, 3, 0], 52),
        (vec![4, 0, 4, 0], 53),
        (vec![4, 1, 2, 0], 59),
        (vec![5, 0, 2, 0], 71),
        (vec![5, 0, 2, 1], 72),
    ]));
    file
}

fn file_set() -> FileSet {
    let set = descriptor_set(vec![status_file(), operations_file(), wrappers_file()]);
    FileSet::new(&set, None)
}

#[test]
fn test_file_set_wrapper() {
    let file_set = file_set();

    // Imported files are not definition files, so their services are skipped.
    assert_eq!(
        file_set.services_map.keys().collect::<Vec<_>>(),
        vec!["Example"]
    );
    assert_eq!(file_set.root_package, "example.v1alpha");
    assert_eq!(file_set.definition_files.len(), 1);
    assert_eq!(file_set.definition_files[0].name(), "wrappers.proto");
    assert_eq!(file_set.api_version.as_deref(), Some("v1alpha"));

    let resource = file_set
        .resources_database
        .get_resource_by_type("example.googleapis.com/t1")
        .unwrap();
    assert_eq!(
        resource.value.pattern,
        vec!["foo/{foo}", "foo/{foo}/bar/{bar}/t1"]
    );
    assert!(file_set
        .resources_database
        .get_resource_by_type("example.googleapis.com/Foo")
        .is_some());
    assert_eq!(
        file_set.file_resources.keys().collect::<Vec<_>>(),
        vec!["example.googleapis.com/t1"]
    );

    let local_messages: Vec<&String> = file_set
        .global_messages_map
        .keys()
        .filter(|name| name.starts_with(".example.v1alpha"))
        .collect();
    assert_eq!(
        local_messages,
        vec![
            ".example.v1alpha.FooMetadata",
            ".example.v1alpha.FooRequest",
            ".example.v1alpha.FooRequest.NestedMessage",
            ".example.v1alpha.FooResponse",
            ".example.v1alpha.MapMessage",
        ]
    );
    assert_eq!(
        file_set.global_enums_map.keys().collect::<Vec<_>>(),
        vec![
            ".example.v1alpha.Enum1",
            ".example.v1alpha.FooRequest.NestedEnum",
        ]
    );

    // Used types: the definitions, their LRO types and everything they reference.
    assert_eq!(
        file_set.messages_map.keys().collect::<Vec<_>>(),
        vec![
            ".example.v1alpha.FooMetadata",
            ".example.v1alpha.FooRequest",
            ".example.v1alpha.FooResponse",
            ".example.v1alpha.MapMessage",
            ".google.longrunning.Operation",
            ".google.rpc.Status",
        ]
    );
    assert!(file_set
        .messages_map
        .keys()
        .all(|name| file_set.global_messages_map.contains_key(name)));
    assert_eq!(
        file_set.enums_map.keys().collect::<Vec<_>>(),
        vec![".example.v1alpha.Enum1"]
    );
}

#[test]
fn test_service_wrapper() {
    let file_set = file_set();
    let service = &file_set.services_map["Example"];
    assert_eq!(service.source_code_line, Some(20));
    assert_eq!(service.api_version.as_deref(), Some("v1alpha"));
    assert_eq!(service.proto_file_name, "wrappers.proto");
    assert_eq!(
        service.default_host.as_ref().map(|h| h.value.as_str()),
        Some("example.googleapis.com")
    );
    assert_eq!(service.oauth_scopes.len(), 1);
    assert_eq!(
        service.oauth_scopes[0].value,
        "https://www.googleapis.com/auth/cloud-platform"
    );
    assert_eq!(service.oauth_scopes[0].source_code_line, Some(21));

    let foo = &service.methods["Foo"];
    assert_eq!(foo.input.value, ".example.v1alpha.FooRequest");
    assert_eq!(foo.output.value, ".example.v1alpha.FooResponse");
    assert!(foo.paged_result_field.is_none());
    assert!(!foo.longrunning);
    assert_eq!(foo.method_signatures.value, vec!["content", "error"]);
    let http = &foo.http_annotation.as_ref().unwrap().value;
    assert_eq!(http.http_method, "post");
    assert_eq!(http.http_uri, "/v1/example:foo");
    assert_eq!(http.http_body.as_deref(), Some("*"));
    assert_eq!(foo.source_code_line, Some(23));
    assert_eq!(foo.proto_file_name, "wrappers.proto");

    let bar = &service.methods["Bar"];
    assert_eq!(bar.output.value, ".google.longrunning.Operation");
    assert!(bar.longrunning);
    let lro = &bar.lro_annotation.as_ref().unwrap().value;
    assert_eq!(lro.response_type, "FooResponse");
    assert_eq!(lro.metadata_type, "FooMetadata");
    let http = &bar.http_annotation.as_ref().unwrap().value;
    assert_eq!(http.http_method, "get");
    assert_eq!(http.http_uri, "/v1/example:bar");
    assert_eq!(http.http_body, None);
    assert_eq!(bar.source_code_line, Some(31));
}

#[test]
fn test_message_wrapper() {
    let file_set = file_set();
    let foo_request = &file_set.messages_map[".example.v1alpha.FooRequest"];
    assert_eq!(foo_request.source_code_line, Some(43));
    assert_eq!(foo_request.api_version.as_deref(), Some("v1alpha"));
    assert_eq!(foo_request.proto_file_name, "wrappers.proto");
    assert_eq!(
        foo_request.oneofs.keys().collect::<Vec<_>>(),
        vec!["response"]
    );
    assert_eq!(
        foo_request.nested_messages["NestedMessage"].source_code_line,
        Some(52)
    );
    let nested_enum = &foo_request.nested_enums["NestedEnum"];
    assert_eq!(nested_enum.source_code_line, Some(53));
    let resource = foo_request.resource.as_ref().unwrap();
    assert_eq!(resource.value.pattern, vec!["foo/{foo}/bar/{bar}"]);
    assert_eq!(resource.value.r#type, "example.googleapis.com/Foo");
    // Without its own span the option points at the message.
    assert_eq!(resource.source_code_line, Some(43));

    // Map entries are kept apart from the nested messages.
    let map_message = &file_set.messages_map[".example.v1alpha.MapMessage"];
    assert_eq!(map_message.fields.len(), 1);
    assert_eq!(map_message.fields[&1].name, "first_field");
    assert_eq!(
        map_message.map_entries.keys().collect::<Vec<_>>(),
        vec!["FirstFieldEntry"]
    );
    let entry = &map_message.map_entries["FirstFieldEntry"];
    assert_eq!(entry.key.name, "key");
    assert_eq!(entry.value.name, "value");
    assert!(map_message.nested_messages.is_empty());
}

#[test]
fn test_field_wrapper() {
    let file_set = file_set();
    let foo_request = &file_set.messages_map[".example.v1alpha.FooRequest"];
    let content = &foo_request.fields[&1];
    let error = &foo_request.fields[&2];
    assert_eq!(content.oneof_name.as_deref(), Some("response"));
    assert_eq!(error.oneof_name.as_deref(), Some("response"));
    assert_eq!(content.source_code_line, Some(49));
    assert_eq!(error.source_code_line, Some(50));
    // Fields of a message with a resource know it.
    assert!(content.message_resource.is_some());

    let enum_field = &file_set.messages_map[".example.v1alpha.FooResponse"].fields[&1];
    assert_eq!(enum_field.api_version.as_deref(), Some("v1alpha"));
    assert!(!enum_field.repeated.value);
    assert!(!enum_field.required.value);
    assert_eq!(enum_field.proto_type.value, "enum");
    assert_eq!(
        enum_field.type_name.as_ref().map(|t| t.value.as_str()),
        Some(".example.v1alpha.Enum1")
    );
    assert!(!enum_field.is_primitive_type());
    assert!(!enum_field.oneof());
    assert!(enum_field.child_type());
    let reference = enum_field.resource_reference.as_ref().unwrap();
    assert_eq!(reference.value.child_type, "example.googleapis.com/t1");
    assert_eq!(enum_field.source_code_line, Some(59));
    assert_eq!(enum_field.proto_file_name, "wrappers.proto");

    let name = &file_set.messages_map[".example.v1alpha.FooMetadata"].fields[&1];
    assert_eq!(name.name, "name");
    assert!(!name.repeated.value);
    assert!(name.required.value);

    let map_field = &file_set.messages_map[".example.v1alpha.MapMessage"].fields[&1];
    assert!(map_field.is_map_type());
    let entry_type = map_field.map_entry_type.as_ref().unwrap();
    assert_eq!(entry_type.key, "string");
    assert_eq!(entry_type.value, ".example.v1alpha.FooMetadata");
}

#[test]
fn test_enum_wrapper() {
    let file_set = file_set();
    let enum_type = &file_set.enums_map[".example.v1alpha.Enum1"];
    assert_eq!(enum_type.values[&0].name, "a");
    assert_eq!(enum_type.values[&1].name, "b");
    assert_eq!(enum_type.values[&0].source_code_line, Some(71));
    assert_eq!(enum_type.values[&1].source_code_line, Some(72));
    assert_eq!(enum_type.values[&0].proto_file_name, "wrappers.proto");
}

#[test]
fn test_packaging_options() {
    let file_set = file_set();
    let java = &file_set.packaging_options_map["java_package"];
    let located = &java["com.example.v1alpha"];
    assert_eq!(located.proto_file_name, "wrappers.proto");
    assert_eq!(located.source_code_line, Some(8));
    let csharp = &file_set.packaging_options_map["csharp_namespace"];
    assert!(csharp.contains_key("Example.V1alpha"));
    assert!(!file_set.packaging_options_map.contains_key("go_package"));
}

#[test]
fn test_package_prefixes_select_definition_files() {
    let set = descriptor_set(vec![status_file(), operations_file(), wrappers_file()]);
    let file_set = FileSet::new(&set, Some(&["google.longrunning".to_string()]));
    assert_eq!(file_set.root_package, "google.longrunning");
    assert_eq!(file_set.definition_files.len(), 1);
    assert_eq!(
        file_set.services_map.keys().collect::<Vec<_>>(),
        vec!["Operations"]
    );
    assert!(file_set.file_resources.is_empty());
}

#[test]
fn test_proto3_optional_is_not_a_oneof() {
    let mut nickname = field_proto("nickname", 1, Type::String);
    nickname.oneof_index = Some(0);
    nickname.proto3_optional = Some(true);
    let mut message = message_proto("Person", vec![nickname]);
    message.oneof_decl = vec![OneofDescriptorProto {
        name: Some("_nickname".to_string()),
    }];
    let mut file = file_proto("person.proto", "example.v1");
    file.message_type = vec![message];

    let file_set = FileSet::new(&descriptor_set(vec![file]), None);
    let person = &file_set.messages_map[".example.v1.Person"];
    assert!(person.oneofs.is_empty());
    let field = &person.fields[&1];
    assert!(field.proto3_optional);
    assert!(!field.oneof());
}

#[test]
fn test_paged_result_field() {
    let request = vec![
        field_proto("parent", 1, Type::String),
        field_proto("page_size", 2, Type::Int32),
        field_proto("page_token", 3, Type::String),
    ];
    let books = typed_field_proto("books", 1, Type::Message, ".example.v1.Book");
    let response = vec![
        repeated(books),
        field_proto("next_page_token", 2, Type::String),
        repeated(field_proto("unreachable", 3, Type::String)),
    ];
    let book = vec![field_proto("name", 1, Type::String)];
    let mut file = file_proto("library.proto", "example.v1");
    file.message_type = vec![
        message_proto("ListBooksRequest", request),
        message_proto("ListBooksResponse", response),
        message_proto("Book", book),
    ];

    let list_books = method_proto(
        "ListBooks",
        ".example.v1.ListBooksRequest",
        ".example.v1.ListBooksResponse",
    );
    let get_book = method_proto(
        "GetBook",
        ".example.v1.ListBooksRequest",
        ".example.v1.Book",
    );
    file.service = vec![service_proto("Library", vec![list_books, get_book])];

    let file_set = FileSet::new(&descriptor_set(vec![file]), None);
    let methods = &file_set.services_map["Library"].methods;
    let paged = methods["ListBooks"].paged_result_field.as_ref().unwrap();
    assert_eq!(paged.name, "books");
    assert!(methods["GetBook"].paged_result_field.is_none());

    let request = &file_set.messages_map[".example.v1.ListBooksRequest"];
    assert!(paged_result_field(Some(request), None).is_none());
    assert!(paged_result_field(Some(request), Some(request)).is_none());
}

#[test]
fn test_malformed_span_has_no_line() {
    let mut file = library_file("v1");
    if let Some(info) = file.source_code_info.as_mut() {
        for location in &mut info.location {
            if location.path == [4, 0] {
                location.span = vec![-1, 0, 1];
            }
        }
    }

    let file_set = FileSet::new(&descriptor_set(vec![file]), None);
    let messages = &file_set.messages_map;
    let request = &messages[".example.v1.GetBookRequest"];
    assert_eq!(request.source_code_line, None);
    assert_eq!(messages[".example.v1.Book"].source_code_line, Some(14));
}

#[test]
fn test_empty_resource_reference_is_kept() {
    let mut file = library_file("v1");
    let mut shelf = field_proto("shelf", 4, Type::String);
    shelf.options = Some(FieldOptions {
        resource_reference: Some(ResourceReference::default()),
        ..Default::default()
    });
    file.message_type[1].field.push(shelf);

    let file_set = FileSet::new(&descriptor_set(vec![file]), None);
    let field = &file_set.messages_map[".example.v1.Book"].fields[&4];
    let reference = field.resource_reference.as_ref().unwrap();
    assert_eq!(reference.value.resource_type(), None);
    assert!(!field.child_type());
}
