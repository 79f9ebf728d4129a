// Shared builders for the integration suites. Each suite uses a subset.
#![allow(dead_code)]

use proto_breaking_change_detector::comparator::wrappers::{
    Enum, EnumValue, Field, HttpAnnotation, LroAnnotation, Message, Method, Service, WithLocation,
    LRO_OPERATION,
};
use proto_breaking_change_detector::descriptor::field_descriptor_proto::{Label, Type};
use proto_breaking_change_detector::descriptor::source_code_info::Location;
use proto_breaking_change_detector::descriptor::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto, ServiceDescriptorProto,
    SourceCodeInfo,
};
use std::collections::BTreeMap;

/// File name every wrapper built here claims to come from.
pub const PROTO_FILE: &str = "foo";

pub fn located<T>(value: T) -> WithLocation<T> {
    WithLocation {
        value,
        proto_file_name: PROTO_FILE.to_string(),
        source_code_line: None,
    }
}

/// A singular, optional field; tests tweak the public fields they care about.
pub fn make_field(name: &str, number: i32, proto_type: &str) -> Field {
    Field {
        name: name.to_string(),
        number,
        repeated: located(false),
        required: located(false),
        proto_type: located(proto_type.to_string()),
        type_name: None,
        oneof_name: None,
        proto3_optional: false,
        resource_reference: None,
        message_resource: None,
        resource_database: None,
        map_entry_type: None,
        api_version: None,
        proto_file_name: PROTO_FILE.to_string(),
        source_code_line: None,
    }
}

/// A message or enum field pointing at `type_name`.
pub fn make_typed_field(name: &str, number: i32, proto_type: &str, type_name: &str) -> Field {
    let mut field = make_field(name, number, proto_type);
    field.type_name = Some(located(type_name.to_string()));
    field
}

pub fn make_message(name: &str, full_name: &str, fields: Vec<Field>) -> Message {
    Message {
        name: name.to_string(),
        full_name: full_name.to_string(),
        fields: fields.into_iter().map(|f| (f.number, f)).collect(),
        nested_messages: BTreeMap::new(),
        nested_enums: BTreeMap::new(),
        map_entries: BTreeMap::new(),
        oneofs: BTreeMap::new(),
        resource: None,
        resource_database: None,
        api_version: None,
        proto_file_name: PROTO_FILE.to_string(),
        source_code_line: None,
    }
}

pub fn make_enum_value(name: &str, number: i32) -> EnumValue {
    EnumValue {
        name: name.to_string(),
        number,
        proto_file_name: PROTO_FILE.to_string(),
        source_code_line: None,
    }
}

pub fn make_enum(name: &str, values: &[(&str, i32)]) -> Enum {
    Enum {
        name: name.to_string(),
        full_name: format!(".example.v1.{}", name),
        values: values
            .iter()
            .map(|(value, number)| (*number, make_enum_value(value, *number)))
            .collect(),
        api_version: None,
        proto_file_name: PROTO_FILE.to_string(),
        source_code_line: None,
    }
}

/// A unary method from `.example.v1.{name}Request` to `.example.v1.{name}Response`.
pub fn make_method(name: &str) -> Method {
    Method {
        name: name.to_string(),
        input: located(format!(".example.v1.{}Request", name)),
        output: located(format!(".example.v1.{}Response", name)),
        client_streaming: located(false),
        server_streaming: located(false),
        paged_result_field: None,
        method_signatures: located(Vec::new()),
        longrunning: false,
        lro_annotation: None,
        http_annotation: None,
        proto_file_name: PROTO_FILE.to_string(),
        source_code_line: None,
    }
}

/// A long-running method with its `operation_info` annotation.
pub fn make_lro_method(name: &str, response_type: &str, metadata_type: &str) -> Method {
    let mut method = make_method(name);
    method.output = located(LRO_OPERATION.to_string());
    method.longrunning = true;
    method.lro_annotation = Some(located(LroAnnotation {
        response_type: response_type.to_string(),
        metadata_type: metadata_type.to_string(),
    }));
    method
}

pub fn make_http_annotation(
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> WithLocation<HttpAnnotation> {
    located(HttpAnnotation {
        http_method: method.to_string(),
        http_uri: uri.to_string(),
        http_body: body.map(str::to_string),
    })
}

pub fn make_service(name: &str, methods: Vec<Method>) -> Service {
    Service {
        name: name.to_string(),
        methods: methods.into_iter().map(|m| (m.name.clone(), m)).collect(),
        default_host: None,
        oauth_scopes: Vec::new(),
        api_version: None,
        proto_file_name: PROTO_FILE.to_string(),
        source_code_line: None,
    }
}

// Descriptor-level builders, standing in for protoc output.

pub fn field_proto(name: &str, number: i32, proto_type: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(proto_type as i32),
        ..Default::default()
    }
}

pub fn typed_field_proto(
    name: &str,
    number: i32,
    proto_type: Type,
    type_name: &str,
) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field_proto(name, number, proto_type)
    }
}

pub fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
    field.label = Some(Label::Repeated as i32);
    field
}

pub fn message_proto(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

pub fn enum_proto(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .map(|(value, number)| EnumValueDescriptorProto {
                name: Some(value.to_string()),
                number: Some(*number),
            })
            .collect(),
    }
}

pub fn method_proto(name: &str, input_type: &str, output_type: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input_type.to_string()),
        output_type: Some(output_type.to_string()),
        ..Default::default()
    }
}

pub fn service_proto(name: &str, methods: Vec<MethodDescriptorProto>) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(name.to_string()),
        method: methods,
        options: None,
    }
}

pub fn file_proto(name: &str, package: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// Source info placing each path on the given 1-based line.
pub fn source_info(lines: Vec<(Vec<i32>, i32)>) -> SourceCodeInfo {
    SourceCodeInfo {
        location: lines
            .into_iter()
            .map(|(path, line)| Location {
                path,
                span: vec![line - 1, 0, 10],
                ..Default::default()
            })
            .collect(),
    }
}

/// A small API in package `example.{version}`: a `Library` service with a
/// `GetBook` method, a `Book` message and a `Genre` enum.
pub fn library_file(version: &str) -> FileDescriptorProto {
    let package = format!("example.{}", version);
    let book = format!(".{}.Book", package);
    let genre = format!(".{}.Genre", package);
    let mut file = file_proto(&format!("example/{}/library.proto", version), &package);

    let request = vec![field_proto("name", 1, Type::String)];
    let book_fields = vec![
        field_proto("name", 1, Type::String),
        typed_field_proto("genre", 2, Type::Enum, &genre),
        repeated(field_proto("authors", 3, Type::String)),
    ];
    file.message_type = vec![
        message_proto("GetBookRequest", request),
        message_proto("Book", book_fields),
    ];

    let genre_values = [("GENRE_UNSPECIFIED", 0), ("FICTION", 1), ("POETRY", 2)];
    file.enum_type = vec![enum_proto("Genre", &genre_values)];

    let request_type = format!(".{}.GetBookRequest", package);
    let get_book = method_proto("GetBook", &request_type, &book);
    file.service = vec![service_proto("Library", vec![get_book])];
    file.source_code_info = Some(source_info(vec![
        (vec![4, 0], 10),
        (vec![4, 1], 14),
        (vec![4, 1, 2, 0], 15),
        (vec![4, 1, 2, 1], 16),
        (vec![4, 1, 2, 2], 17),
        (vec![5, 0], 20),
        (vec![5, 0, 2, 2], 23),
        (vec![6, 0], 5),
        (vec![6, 0, 2, 0], 6),
    ]));
    file
}

pub fn descriptor_set(files: Vec<FileDescriptorProto>) -> FileDescriptorSet {
    FileDescriptorSet { file: files }
}
