use crate::comparator::resource_database::ResourceDatabase;
use crate::descriptor::annotations::{FieldBehavior, ResourceDescriptor, ResourceReference};
use crate::descriptor::field_descriptor_proto::{Label, Type};
use crate::descriptor::{
    path, DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet, FileOptions, MethodDescriptorProto, ServiceDescriptorProto,
};
use crate::utils::{api_version_of, SourceIndex};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// The output type of every long-running method.
pub const LRO_OPERATION: &str = ".google.longrunning.Operation";

const WELL_KNOWN_PREFIX: &str = ".google.protobuf.";

/// A value together with where it is declared.
#[derive(Debug, Clone, PartialEq)]
pub struct WithLocation<T> {
    pub value: T,
    pub proto_file_name: String,
    /// 1-based line, `None` without source info.
    pub source_code_line: Option<usize>,
}

/// Both sides of a map field: `map<key, value>`.
///
/// Primitive types are named by their proto type (`string`), others by their
/// fully-qualified type name (`.example.v1.Foo`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntryType {
    pub key: String,
    pub value: String,
}

/// The key and value fields of an auto-generated map entry message.
#[derive(Debug, Clone)]
pub struct MapEntry {
    pub key: Field,
    pub value: Field,
}

/// A field of a message.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub number: i32,
    pub repeated: WithLocation<bool>,
    /// `google.api.field_behavior = REQUIRED`
    pub required: WithLocation<bool>,
    /// Lower-case proto type, e.g. `string`, `enum`, `message`.
    pub proto_type: WithLocation<String>,
    /// Set for message and enum fields.
    pub type_name: Option<WithLocation<String>>,
    /// Name of the enclosing oneof. Synthetic proto3 optional oneofs are not reported.
    pub oneof_name: Option<String>,
    pub proto3_optional: bool,
    pub resource_reference: Option<WithLocation<ResourceReference>>,
    /// The `google.api.resource` of the message declaring this field.
    pub message_resource: Option<WithLocation<ResourceDescriptor>>,
    pub resource_database: Option<Arc<ResourceDatabase>>,
    pub map_entry_type: Option<MapEntryType>,
    pub api_version: Option<String>,
    pub proto_file_name: String,
    pub source_code_line: Option<usize>,
}

impl Field {
    pub fn is_primitive_type(&self) -> bool {
        !matches!(self.proto_type.value.as_str(), "message" | "enum" | "group")
    }

    pub fn is_map_type(&self) -> bool {
        self.map_entry_type.is_some()
    }

    pub fn oneof(&self) -> bool {
        self.oneof_name.is_some()
    }

    /// The resource reference uses `child_type` rather than `type`.
    pub fn child_type(&self) -> bool {
        self.resource_reference
            .as_ref()
            .map_or(false, |r| !r.value.child_type.is_empty())
    }

    /// The type as written in a map entry: proto type for primitives, type name otherwise.
    fn entry_type(&self) -> String {
        match &self.type_name {
            Some(type_name) if !self.is_primitive_type() => type_name.value.clone(),
            _ => self.proto_type.value.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub name: String,
    /// Fully-qualified, with a leading dot.
    pub full_name: String,
    pub fields: BTreeMap<i32, Field>,
    pub nested_messages: BTreeMap<String, Message>,
    pub nested_enums: BTreeMap<String, Enum>,
    /// Auto-generated map entries, kept out of `nested_messages`.
    pub map_entries: BTreeMap<String, MapEntry>,
    pub oneofs: BTreeMap<String, WithLocation<String>>,
    pub resource: Option<WithLocation<ResourceDescriptor>>,
    pub resource_database: Option<Arc<ResourceDatabase>>,
    pub api_version: Option<String>,
    pub proto_file_name: String,
    pub source_code_line: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Enum {
    pub name: String,
    pub full_name: String,
    pub values: BTreeMap<i32, EnumValue>,
    pub api_version: Option<String>,
    pub proto_file_name: String,
    pub source_code_line: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
    pub proto_file_name: String,
    pub source_code_line: Option<usize>,
}

/// `google.longrunning.operation_info`, types as written in the annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LroAnnotation {
    pub response_type: String,
    pub metadata_type: String,
}

/// The primary binding of a `google.api.http` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpAnnotation {
    pub http_method: String,
    pub http_uri: String,
    pub http_body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub input: WithLocation<String>,
    pub output: WithLocation<String>,
    pub client_streaming: WithLocation<bool>,
    pub server_streaming: WithLocation<bool>,
    /// The repeated field carrying page results, for paginated methods.
    pub paged_result_field: Option<Field>,
    pub method_signatures: WithLocation<Vec<String>>,
    pub longrunning: bool,
    pub lro_annotation: Option<WithLocation<LroAnnotation>>,
    pub http_annotation: Option<WithLocation<HttpAnnotation>>,
    pub proto_file_name: String,
    pub source_code_line: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Service {
    pub name: String,
    pub methods: BTreeMap<String, Method>,
    pub default_host: Option<WithLocation<String>>,
    pub oauth_scopes: Vec<WithLocation<String>>,
    pub api_version: Option<String>,
    pub proto_file_name: String,
    pub source_code_line: Option<usize>,
}

/// One version of an API: the definition files of a descriptor set plus
/// everything they depend on.
#[derive(Debug, Clone)]
pub struct FileSet {
    /// Files that belong to the API itself, as opposed to its imports.
    pub definition_files: Vec<FileDescriptorProto>,
    pub root_package: String,
    pub api_version: Option<String>,
    /// Services of the definition files, by name.
    pub services_map: BTreeMap<String, Service>,
    /// Top-level messages the definition files declare or use, by full name.
    pub messages_map: BTreeMap<String, Message>,
    /// Top-level enums the definition files declare or use, by full name.
    pub enums_map: BTreeMap<String, Enum>,
    /// Every message of every file, nested ones included.
    pub global_messages_map: BTreeMap<String, Message>,
    pub global_enums_map: BTreeMap<String, Enum>,
    pub resources_database: Arc<ResourceDatabase>,
    /// File-level resource definitions of the definition files, by type.
    pub file_resources: BTreeMap<String, WithLocation<ResourceDescriptor>>,
    /// Packaging option name (e.g. `java_package`) to its values.
    pub packaging_options_map: BTreeMap<String, BTreeMap<String, WithLocation<String>>>,
}

/// Per-file state needed while wrapping descriptors.
struct FileContext {
    file_name: String,
    package: String,
    api_version: Option<String>,
    source: SourceIndex,
    resource_database: Arc<ResourceDatabase>,
}

impl FileContext {
    fn new(file: &FileDescriptorProto, resource_database: Arc<ResourceDatabase>) -> Self {
        let package = file.package().to_string();
        Self {
            file_name: file.name().to_string(),
            api_version: api_version_of(&package),
            package,
            source: SourceIndex::new(file.source_code_info.as_ref()),
            resource_database,
        }
    }

    fn scope(&self) -> String {
        if self.package.is_empty() {
            String::new()
        } else {
            format!(".{}", self.package)
        }
    }

    fn locate<T>(&self, value: T, path: &[i32]) -> WithLocation<T> {
        WithLocation {
            value,
            proto_file_name: self.file_name.clone(),
            source_code_line: self.source.line(path),
        }
    }

    /// Location of an option, falling back to its owner when the option has no span.
    fn locate_option<T>(&self, value: T, path: &[i32], owner: &[i32]) -> WithLocation<T> {
        WithLocation {
            value,
            proto_file_name: self.file_name.clone(),
            source_code_line: self.source.line(path).or_else(|| self.source.line(owner)),
        }
    }
}

fn child_path(parent: &[i32], field: i32, index: usize) -> Vec<i32> {
    let mut path = parent.to_vec();
    path.push(field);
    path.push(index as i32);
    path
}

fn sub_path(parent: &[i32], tail: &[i32]) -> Vec<i32> {
    let mut path = parent.to_vec();
    path.extend_from_slice(tail);
    path
}

impl FileSet {
    /// Wraps a descriptor set.
    ///
    /// With `package_prefixes`, definition files are the files whose package
    /// starts with one of the prefixes. Without, the files no other file
    /// imports determine the root package.
    pub fn new(descriptor_set: &FileDescriptorSet, package_prefixes: Option<&[String]>) -> Self {
        let files = &descriptor_set.file;
        let (definition_files, root_package) = select_definition_files(files, package_prefixes);
        let definition_names: HashSet<&str> = definition_files.iter().map(|f| f.name()).collect();
        log::debug!(
            "Root package `{}` with {} definition file(s)",
            root_package,
            definition_files.len()
        );

        // Resources first: every field and message wrapper shares the database.
        let mut database = ResourceDatabase::new();
        let mut file_resources = BTreeMap::new();
        for file in files {
            let source = SourceIndex::new(file.source_code_info.as_ref());
            let is_definition = definition_names.contains(file.name());
            if let Some(options) = &file.options {
                for (i, resource) in options.resource_definition.iter().enumerate() {
                    let resource_path = [path::FILE_OPTIONS, path::RESOURCE_DEFINITION, i as i32];
                    let located = WithLocation {
                        value: resource.clone(),
                        proto_file_name: file.name().to_string(),
                        source_code_line: source.line(&resource_path),
                    };
                    if is_definition && !resource.r#type.is_empty() {
                        file_resources
                            .entry(resource.r#type.clone())
                            .or_insert_with(|| located.clone());
                    }
                    database.register_resource(located);
                }
            }
            for (i, message) in file.message_type.iter().enumerate() {
                let message_path = [path::FILE_MESSAGE_TYPE, i as i32];
                register_message_resources(
                    &mut database,
                    message,
                    &message_path,
                    file.name(),
                    &source,
                );
            }
        }
        let resources_database = Arc::new(database);

        let mut builder = GlobalBuilder::default();
        for file in files {
            let ctx = FileContext::new(file, resources_database.clone());
            let scope = ctx.scope();
            for (i, message) in file.message_type.iter().enumerate() {
                let message_path = [path::FILE_MESSAGE_TYPE, i as i32];
                let wrapped = build_message(&ctx, message, &message_path, &scope);
                builder.add_message(wrapped, None);
            }
            for (i, enum_type) in file.enum_type.iter().enumerate() {
                let enum_path = [path::FILE_ENUM_TYPE, i as i32];
                let wrapped = build_enum(&ctx, enum_type, &enum_path, &scope);
                builder.add_enum(wrapped);
            }
        }

        // Services only come from the definition files, but their types
        // resolve against every file.
        let mut services_map = BTreeMap::new();
        for file in &definition_files {
            let ctx = FileContext::new(file, resources_database.clone());
            for (i, service) in file.service.iter().enumerate() {
                let wrapped = build_service(&ctx, service, i, &builder.global_messages);
                services_map.insert(wrapped.name.clone(), wrapped);
            }
        }

        let (messages_map, enums_map) = builder.used_types(&definition_files);
        let packaging_options_map = packaging_options(&definition_files);

        FileSet {
            api_version: api_version_of(&root_package),
            root_package,
            definition_files: definition_files.into_iter().cloned().collect(),
            services_map,
            messages_map,
            enums_map,
            global_messages_map: builder.global_messages,
            global_enums_map: builder.global_enums,
            resources_database,
            file_resources,
            packaging_options_map,
        }
    }
}

fn select_definition_files<'a>(
    files: &'a [FileDescriptorProto],
    package_prefixes: Option<&[String]>,
) -> (Vec<&'a FileDescriptorProto>, String) {
    if let Some(prefixes) = package_prefixes.filter(|p| !p.is_empty()) {
        let definitions: Vec<_> = files
            .iter()
            .filter(|f| prefixes.iter().any(|p| f.package().starts_with(p.as_str())))
            .collect();
        let root = common_package(definitions.iter().map(|f| f.package()));
        return (definitions, root);
    }

    let imported: HashSet<&str> = files
        .iter()
        .flat_map(|f| f.dependency.iter().map(String::as_str))
        .collect();
    let top_level: Vec<_> = files
        .iter()
        .filter(|f| !imported.contains(f.name()))
        .collect();
    let root = common_package(top_level.iter().map(|f| f.package()));
    if root.is_empty() {
        return (top_level, root);
    }
    let nested_prefix = format!("{}.", root);
    let definitions = files
        .iter()
        .filter(|f| f.package() == root || f.package().starts_with(&nested_prefix))
        .collect();
    (definitions, root)
}

/// Longest common dotted prefix: `a.b.v1` and `a.b.v2` give `a.b`.
fn common_package<'a>(packages: impl Iterator<Item = &'a str>) -> String {
    let mut common: Option<Vec<&str>> = None;
    for package in packages {
        let parts: Vec<&str> = package.split('.').filter(|p| !p.is_empty()).collect();
        common = Some(match common {
            None => parts,
            Some(current) => current
                .into_iter()
                .zip(parts)
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect(),
        });
    }
    common.unwrap_or_default().join(".")
}

fn register_message_resources(
    database: &mut ResourceDatabase,
    message: &DescriptorProto,
    message_path: &[i32],
    file_name: &str,
    source: &SourceIndex,
) {
    if let Some(resource) = message.options.as_ref().and_then(|o| o.resource.as_ref()) {
        let resource_path = sub_path(message_path, &[path::MESSAGE_OPTIONS, path::RESOURCE]);
        let line = source
            .line(&resource_path)
            .or_else(|| source.line(message_path));
        database.register_resource(WithLocation {
            value: resource.clone(),
            proto_file_name: file_name.to_string(),
            source_code_line: line,
        });
    }
    for (i, nested) in message.nested_type.iter().enumerate() {
        let nested_path = child_path(message_path, path::MESSAGE_NESTED_TYPE, i);
        register_message_resources(database, nested, &nested_path, file_name, source);
    }
}

fn build_message(
    ctx: &FileContext,
    proto: &DescriptorProto,
    message_path: &[i32],
    scope: &str,
) -> Message {
    let name = proto.name().to_string();
    let full_name = format!("{}.{}", scope, name);
    let resource_path = sub_path(message_path, &[path::MESSAGE_OPTIONS, path::RESOURCE]);
    let resource = proto
        .options
        .as_ref()
        .and_then(|o| o.resource.clone())
        .map(|r| ctx.locate_option(r, &resource_path, message_path));

    // Oneofs synthesized for proto3 `optional` fields are not real oneofs.

    let synthetic_oneofs: HashSet<i32> = proto
        .field
        .iter()
        .filter(|f| f.proto3_optional())
        .filter_map(|f| f.oneof_index)
        .collect();
    let oneof_names: Vec<String> = proto
        .oneof_decl
        .iter()
        .map(|o| o.name().to_string())
        .collect();
    let mut oneofs = BTreeMap::new();
    for (i, oneof) in proto.oneof_decl.iter().enumerate() {
        if synthetic_oneofs.contains(&(i as i32)) {
            continue;
        }
        let oneof_path = child_path(message_path, path::MESSAGE_ONEOF_DECL, i);
        let oneof_name = oneof.name().to_string();
        oneofs.insert(oneof_name.clone(), ctx.locate(oneof_name, &oneof_path));
    }

    // Map entry messages become key/value pairs; the rest are nested messages.

    let mut map_entries = BTreeMap::new();
    let mut map_types = HashMap::new();
    let mut nested_messages = BTreeMap::new();
    for (i, nested) in proto.nested_type.iter().enumerate() {
        let nested_path = child_path(message_path, path::MESSAGE_NESTED_TYPE, i);
        let is_map_entry = nested.options.as_ref().map_or(false, |o| o.map_entry());
        if is_map_entry {
            let entry_fields: Vec<Field> = nested
                .field
                .iter()
                .enumerate()
                .map(|(j, f)| {
                    let field_path = child_path(&nested_path, path::MESSAGE_FIELD, j);
                    build_field(ctx, f, &field_path, &[], &HashMap::new(), None)
                })
                .collect();
            let key = entry_fields.iter().find(|f| f.number == 1).cloned();
            let value = entry_fields.iter().find(|f| f.number == 2).cloned();
            if let (Some(key), Some(value)) = (key, value) {
                map_types.insert(
                    format!("{}.{}", full_name, nested.name()),
                    MapEntryType {
                        key: key.entry_type(),
                        value: value.entry_type(),
                    },
                );
                map_entries.insert(nested.name().to_string(), MapEntry { key, value });
            }
        } else {
            let wrapped = build_message(ctx, nested, &nested_path, &full_name);
            nested_messages.insert(wrapped.name.clone(), wrapped);
        }
    }

    let mut nested_enums = BTreeMap::new();
    for (i, enum_type) in proto.enum_type.iter().enumerate() {
        let enum_path = child_path(message_path, path::MESSAGE_ENUM_TYPE, i);
        let wrapped = build_enum(ctx, enum_type, &enum_path, &full_name);
        nested_enums.insert(wrapped.name.clone(), wrapped);
    }

    let mut fields = BTreeMap::new();
    for (i, field) in proto.field.iter().enumerate() {
        let field_path = child_path(message_path, path::MESSAGE_FIELD, i);
        let wrapped = build_field(
            ctx,
            field,
            &field_path,
            &oneof_names,
            &map_types,
            resource.clone(),
        );
        fields.insert(wrapped.number, wrapped);
    }

    Message {
        name,
        full_name,
        fields,
        nested_messages,
        nested_enums,
        map_entries,
        oneofs,
        resource,
        resource_database: Some(ctx.resource_database.clone()),
        api_version: ctx.api_version.clone(),
        proto_file_name: ctx.file_name.clone(),
        source_code_line: ctx.source.line(message_path),
    }
}

fn build_field(
    ctx: &FileContext,
    proto: &FieldDescriptorProto,
    field_path: &[i32],
    oneof_names: &[String],
    map_types: &HashMap<String, MapEntryType>,
    message_resource: Option<WithLocation<ResourceDescriptor>>,
) -> Field {
    let options = proto.options.as_ref();
    let required = options.map_or(false, |o| {
        o.field_behavior.contains(&(FieldBehavior::Required as i32))
    });
    let proto3_optional = proto.proto3_optional();
    let type_name = proto
        .type_name
        .as_ref()
        .filter(|t| !t.is_empty())
        .map(|t| ctx.locate(t.clone(), &sub_path(field_path, &[path::FIELD_TYPE_NAME])));
    let oneof_name = if proto3_optional {
        None
    } else {
        proto
            .oneof_index
            .and_then(|i| oneof_names.get(i as usize))
            .cloned()
    };
    // An empty reference is kept; comparing it against a message resource fails.
    let reference_path = sub_path(field_path, &[path::FIELD_OPTIONS, path::RESOURCE_REFERENCE]);
    let resource_reference = options
        .and_then(|o| o.resource_reference.clone())
        .map(|r| ctx.locate_option(r, &reference_path, field_path));
    let map_entry_type = type_name
        .as_ref()
        .and_then(|t| map_types.get(&t.value))
        .cloned();

    Field {
        name: proto.name().to_string(),
        number: proto.number(),
        repeated: ctx.locate_option(
            proto.label() == Label::Repeated,
            &sub_path(field_path, &[path::FIELD_LABEL]),
            field_path,
        ),
        required: ctx.locate_option(
            required,
            &sub_path(field_path, &[path::FIELD_OPTIONS, path::FIELD_BEHAVIOR]),
            field_path,
        ),
        proto_type: ctx.locate_option(
            proto_type_name(proto),
            &sub_path(field_path, &[path::FIELD_TYPE]),
            field_path,
        ),
        type_name,
        oneof_name,
        proto3_optional,
        resource_reference,
        message_resource,
        resource_database: Some(ctx.resource_database.clone()),
        map_entry_type,
        api_version: ctx.api_version.clone(),
        proto_file_name: ctx.file_name.clone(),
        source_code_line: ctx.source.line(field_path),
    }
}

fn proto_type_name(proto: &FieldDescriptorProto) -> String {
    // protoc always resolves the type; a bare type_name only appears in
    // hand-built descriptors and names a message or an enum.
    match proto.r#type {
        Some(_) => proto.r#type().as_str_name().to_string(),
        None if proto.type_name.is_some() => Type::Message.as_str_name().to_string(),
        None => String::new(),
    }
}

fn build_enum(
    ctx: &FileContext,
    proto: &EnumDescriptorProto,
    enum_path: &[i32],
    scope: &str,
) -> Enum {
    let name = proto.name().to_string();
    let values = proto
        .value
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let value_path = child_path(enum_path, path::ENUM_VALUE, i);
            let wrapped = EnumValue {
                name: value.name().to_string(),
                number: value.number(),
                proto_file_name: ctx.file_name.clone(),
                source_code_line: ctx.source.line(&value_path),
            };
            (wrapped.number, wrapped)
        })
        .collect();
    Enum {
        full_name: format!("{}.{}", scope, name),
        name,
        values,
        api_version: ctx.api_version.clone(),
        proto_file_name: ctx.file_name.clone(),
        source_code_line: ctx.source.line(enum_path),
    }
}

fn build_service(
    ctx: &FileContext,
    proto: &ServiceDescriptorProto,
    index: usize,
    global_messages: &BTreeMap<String, Message>,
) -> Service {
    let service_path = [path::FILE_SERVICE, index as i32];
    let options = proto.options.as_ref();
    let host_path = sub_path(&service_path, &[path::SERVICE_OPTIONS, path::DEFAULT_HOST]);
    let default_host = options
        .and_then(|o| o.default_host.clone())
        .filter(|h| !h.is_empty())
        .map(|h| ctx.locate_option(h, &host_path, &service_path));
    // Every scope points at the one `oauth_scopes` option.
    let scopes_path = sub_path(&service_path, &[path::SERVICE_OPTIONS, path::OAUTH_SCOPES]);
    let oauth_scopes = options
        .and_then(|o| o.oauth_scopes.as_deref())
        .map(|scopes| {
            scopes
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| ctx.locate_option(s.to_string(), &scopes_path, &service_path))
                .collect()
        })
        .unwrap_or_default();

    let methods = proto
        .method
        .iter()
        .enumerate()
        .map(|(i, method)| {
            let method_path = child_path(&service_path, path::SERVICE_METHOD, i);
            let wrapped = build_method(ctx, method, &method_path, global_messages);
            (wrapped.name.clone(), wrapped)
        })
        .collect();

    Service {
        name: proto.name().to_string(),
        methods,
        default_host,
        oauth_scopes,
        api_version: ctx.api_version.clone(),
        proto_file_name: ctx.file_name.clone(),
        source_code_line: ctx.source.line(&service_path),
    }
}

fn build_method(
    ctx: &FileContext,
    proto: &MethodDescriptorProto,
    method_path: &[i32],
    global_messages: &BTreeMap<String, Message>,
) -> Method {
    let options = proto.options.as_ref();
    let at = |tail: &[i32]| sub_path(method_path, tail);
    let option_at = |ext: i32| sub_path(method_path, &[path::METHOD_OPTIONS, ext]);

    // Request and response resolve against every file, so paging can look inside them.
    let input = proto.input_type().to_string();
    let output = proto.output_type().to_string();
    let input_message = global_messages.get(&input);
    let output_message = global_messages.get(&output);
    let paged_result_field = paged_result_field(input_message, output_message);

    // Options fall back to the method's own line.
    let signatures = options.map(|o| o.method_signature.clone());
    let method_signatures = ctx.locate_option(
        signatures.unwrap_or_default(),
        &option_at(path::METHOD_SIGNATURE),
        method_path,
    );
    let operation_info = options.and_then(|o| o.operation_info.as_ref());
    let lro_annotation = operation_info.map(|info| {
        let annotation = LroAnnotation {
            response_type: info.response_type.clone(),
            metadata_type: info.metadata_type.clone(),
        };
        ctx.locate_option(annotation, &option_at(path::OPERATION_INFO), method_path)
    });
    let http_annotation = options
        .and_then(|o| o.http.as_ref())
        .and_then(|rule| {
            let (http_method, http_uri) = rule.pattern.as_ref()?.method_and_uri();
            Some(HttpAnnotation {
                http_method: http_method.to_string(),
                http_uri: http_uri.to_string(),
                http_body: Some(rule.body.clone()).filter(|b| !b.is_empty()),
            })
        })
        .map(|annotation| ctx.locate_option(annotation, &option_at(path::HTTP), method_path));

    Method {
        name: proto.name().to_string(),
        longrunning: output == LRO_OPERATION,
        input: ctx.locate_option(input, &at(&[path::METHOD_INPUT_TYPE]), method_path),
        output: ctx.locate_option(output, &at(&[path::METHOD_OUTPUT_TYPE]), method_path),
        client_streaming: ctx.locate_option(
            proto.client_streaming(),
            &at(&[path::METHOD_CLIENT_STREAMING]),
            method_path,
        ),
        server_streaming: ctx.locate_option(
            proto.server_streaming(),
            &at(&[path::METHOD_SERVER_STREAMING]),
            method_path,
        ),
        paged_result_field,
        method_signatures,
        lro_annotation,
        http_annotation,
        proto_file_name: ctx.file_name.clone(),
        source_code_line: ctx.source.line(method_path),
    }
}

/// The page result field of a paginated method, if the method follows AIP-158:
/// the request carries `page_size` (or `max_results`) and `page_token`, the
/// response carries `next_page_token`, and the results are the lowest-numbered
/// repeated field of the response.
pub fn paged_result_field(input: Option<&Message>, output: Option<&Message>) -> Option<Field> {
    let (input, output) = (input?, output?);
    let has_field = |message: &Message, name: &str, proto_type: &str| {
        message
            .fields
            .values()
            .any(|f| f.name == name && f.proto_type.value == proto_type && !f.repeated.value)
    };
    let has_page_size =
        has_field(input, "page_size", "int32") || has_field(input, "max_results", "int32");
    if !has_page_size
        || !has_field(input, "page_token", "string")
        || !has_field(output, "next_page_token", "string")
    {
        return None;
    }
    output
        .fields
        .values()
        .filter(|f| f.repeated.value)
        .min_by_key(|f| f.number)
        .cloned()
}

/// Packaging options and their `FileOptions` field numbers.
const PACKAGING_OPTIONS: [(&str, i32); 11] = [
    ("java_package", 1),
    ("java_outer_classname", 8),
    ("java_multiple_files", 10),
    ("go_package", 11),
    ("objc_class_prefix", 36),
    ("csharp_namespace", 37),
    ("swift_prefix", 39),
    ("php_class_prefix", 40),
    ("php_namespace", 41),
    ("php_metadata_namespace", 44),
    ("ruby_package", 45),
];

fn packaging_option(options: &FileOptions, number: i32) -> Option<String> {
    match number {
        1 => options.java_package.clone(),
        8 => options.java_outer_classname.clone(),
        10 => options.java_multiple_files.map(|b| b.to_string()),
        11 => options.go_package.clone(),
        36 => options.objc_class_prefix.clone(),
        37 => options.csharp_namespace.clone(),
        39 => options.swift_prefix.clone(),
        40 => options.php_class_prefix.clone(),
        41 => options.php_namespace.clone(),
        44 => options.php_metadata_namespace.clone(),
        45 => options.ruby_package.clone(),
        _ => None,
    }
}

fn packaging_options(
    definition_files: &[&FileDescriptorProto],
) -> BTreeMap<String, BTreeMap<String, WithLocation<String>>> {
    let mut map: BTreeMap<String, BTreeMap<String, WithLocation<String>>> = BTreeMap::new();
    for file in definition_files {
        let Some(options) = &file.options else {
            continue;
        };
        let source = SourceIndex::new(file.source_code_info.as_ref());
        for (option, number) in PACKAGING_OPTIONS {
            let value = packaging_option(options, number);
            let Some(value) = value.filter(|v| !v.is_empty()) else {
                continue;
            };
            map.entry(option.to_string())
                .or_default()
                .entry(value.clone())
                .or_insert_with(|| WithLocation {
                    value,
                    proto_file_name: file.name().to_string(),
                    source_code_line: source.line(&[path::FILE_OPTIONS, number]),
                });
        }
    }
    map
}

/// Collects the global maps and works out which top-level types are used.
#[derive(Default)]
struct GlobalBuilder {
    global_messages: BTreeMap<String, Message>,
    global_enums: BTreeMap<String, Enum>,
    /// Nested message or enum full name to its outermost message.
    outermost: HashMap<String, String>,
}

impl GlobalBuilder {
    fn add_message(&mut self, message: Message, outermost: Option<&str>) {
        let top = outermost.unwrap_or(&message.full_name).to_string();
        for nested in message.nested_messages.values() {
            self.outermost.insert(nested.full_name.clone(), top.clone());
            self.add_message(nested.clone(), Some(top.as_str()));
        }
        for nested in message.nested_enums.values() {
            self.outermost.insert(nested.full_name.clone(), top.clone());
            self.add_enum(nested.clone());
        }
        for entry in message.map_entries.keys() {
            let entry_name = format!("{}.{}", message.full_name, entry);
            self.outermost.insert(entry_name, top.clone());
        }
        let full_name = message.full_name.clone();
        self.global_messages.insert(full_name, message);
    }

    fn add_enum(&mut self, wrapped: Enum) {
        let full_name = wrapped.full_name.clone();
        self.global_enums.insert(full_name, wrapped);
    }

    fn used_types(
        &self,
        definition_files: &[&FileDescriptorProto],
    ) -> (BTreeMap<String, Message>, BTreeMap<String, Enum>) {
        let mut queue: VecDeque<String> = VecDeque::new();
        let mut enums = BTreeMap::new();

        // Seed with what the definition files declare and what their methods name.

        for file in definition_files {
            let scope = if file.package().is_empty() {
                String::new()
            } else {
                format!(".{}", file.package())
            };
            for message in &file.message_type {
                queue.push_back(format!("{}.{}", scope, message.name()));
            }
            for enum_type in &file.enum_type {
                let full_name = format!("{}.{}", scope, enum_type.name());
                if let Some(wrapped) = self.global_enums.get(&full_name) {
                    enums.insert(full_name, wrapped.clone());
                }
            }
            for service in &file.service {
                for method in &service.method {
                    queue.push_back(method.input_type().to_string());
                    queue.push_back(method.output_type().to_string());
                    let options = method.options.as_ref();
                    if let Some(info) = options.and_then(|o| o.operation_info.as_ref()) {
                        for type_name in [&info.response_type, &info.metadata_type] {
                            if !type_name.is_empty() {
                                queue.push_back(self.resolve_type_name(type_name, file.package()));
                            }
                        }
                    }
                }
            }
        }

        // Walk field references; nested types pull in their outermost message.
        let mut messages = BTreeMap::new();
        while let Some(name) = queue.pop_front() {
            if name.starts_with(WELL_KNOWN_PREFIX) {
                continue;
            }
            let top = self.outermost.get(&name).cloned().unwrap_or(name);
            if messages.contains_key(&top) {
                continue;
            }
            let Some(message) = self.global_messages.get(&top) else {
                continue;
            };
            let mut referenced = Vec::new();
            collect_references(message, &mut referenced);
            for (type_name, is_enum) in referenced {
                if type_name.starts_with(WELL_KNOWN_PREFIX) {
                    continue;
                }
                match self.outermost.get(&type_name) {
                    Some(outer) => queue.push_back(outer.clone()),
                    None if is_enum => {
                        if let Some(wrapped) = self.global_enums.get(&type_name) {
                            enums.insert(type_name, wrapped.clone());
                        }
                    }
                    None => queue.push_back(type_name),
                }
            }
            messages.insert(top, message.clone());
        }
        (messages, enums)
    }

    /// Resolves a possibly unqualified LRO type against the package.
    fn resolve_type_name(&self, type_name: &str, package: &str) -> String {
        if type_name.starts_with('.') {
            return type_name.to_string();
        }
        let absolute = format!(".{}", type_name);
        if type_name.contains('.') && self.global_messages.contains_key(&absolute) {
            return absolute;
        }
        if package.is_empty() {
            absolute
        } else {
            format!(".{}.{}", package, type_name)
        }
    }
}

/// Type names referenced by the fields of a message and its nested types,
/// paired with whether they name an enum.
fn collect_references(message: &Message, out: &mut Vec<(String, bool)>) {
    let fields = message
        .fields
        .values()
        .chain(message.map_entries.values().map(|e| &e.value));
    for field in fields {
        if let Some(type_name) = &field.type_name {
            if field.map_entry_type.is_none() {
                out.push((type_name.value.clone(), field.proto_type.value == "enum"));
            }
        }
    }
    for nested in message.nested_messages.values() {
        collect_references(nested, out);
    }
}
