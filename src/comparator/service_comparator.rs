use crate::comparator::wrappers::{Method, Service};
use crate::error::{DetectorError, Result};
use crate::findings::{ChangeType, FindingCategory, FindingContainer};
use crate::utils::same_versioned_name;
use std::collections::BTreeSet;

/// Compares two versions of a service, its options and its methods.
pub struct ServiceComparator<'a> {
    service_original: Option<&'a Service>,
    service_update: Option<&'a Service>,
    finding_container: &'a mut FindingContainer,
}

impl<'a> ServiceComparator<'a> {
    pub fn new(
        service_original: Option<&'a Service>,
        service_update: Option<&'a Service>,
        finding_container: &'a mut FindingContainer,
    ) -> Self {
        Self {
            service_original,
            service_update,
            finding_container,
        }
    }

    pub fn compare(&mut self) -> Result<()> {
        let (original, update) = match (self.service_original, self.service_update) {
            (None, None) => return Ok(()),
            (None, Some(update)) => {
                self.finding_container.add_finding(
                    FindingCategory::ServiceAddition,
                    &update.proto_file_name,
                    update.source_code_line,
                    format!("A new service `{}` is added.", update.name),
                    ChangeType::Minor,
                );
                return Ok(());
            }
            (Some(original), None) => {
                self.finding_container.add_finding(
                    FindingCategory::ServiceRemoval,
                    &original.proto_file_name,
                    original.source_code_line,
                    format!("An existing service `{}` is removed.", original.name),
                    ChangeType::Major,
                );
                return Ok(());
            }
            (Some(original), Some(update)) => (original, update),
        };

        // Service-level options first, then every method.
        self.compare_host(original, update);
        self.compare_oauth_scopes(original, update);
        self.compare_methods(original, update)
    }

    fn compare_host(&mut self, original: &Service, update: &Service) {
        match (&original.default_host, &update.default_host) {
            (None, None) => {}
            (None, Some(host)) => self.finding_container.add_finding(
                FindingCategory::ServiceHostAddition,
                &host.proto_file_name,
                host.source_code_line,
                format!("A new default host `{}` is added.", host.value),
                ChangeType::Minor,
            ),
            (Some(host), None) => self.finding_container.add_finding(
                FindingCategory::ServiceHostRemoval,
                &update.proto_file_name,
                update.source_code_line,
                format!("An existing default host `{}` is removed.", host.value),
                ChangeType::Major,
            ),
            (Some(host_original), Some(host_update)) => {
                if host_original.value != host_update.value {
                    self.finding_container.add_finding(
                        FindingCategory::ServiceHostChange,
                        &host_update.proto_file_name,
                        host_update.source_code_line,
                        format!(
                            "An existing default host is updated from `{}` to `{}`.",
                            host_original.value, host_update.value
                        ),
                        ChangeType::Major,
                    );
                }
            }
        }
    }

    fn compare_oauth_scopes(&mut self, original: &Service, update: &Service) {
        // Scopes are matched by value; their order does not matter.
        for scope in &original.oauth_scopes {
            if !update.oauth_scopes.iter().any(|s| s.value == scope.value) {
                self.finding_container.add_finding(
                    FindingCategory::OauthScopeRemoval,
                    &update.proto_file_name,
                    update.source_code_line,
                    format!("An existing oauth_scope `{}` is removed.", scope.value),
                    ChangeType::Major,
                );
            }
        }
        for scope in &update.oauth_scopes {
            if !original.oauth_scopes.iter().any(|s| s.value == scope.value) {
                self.finding_container.add_finding(
                    FindingCategory::OauthScopeAddition,
                    &scope.proto_file_name,
                    scope.source_code_line,
                    format!("A new oauth_scope `{}` is added.", scope.value),
                    ChangeType::Minor,
                );
            }
        }
    }

    fn compare_methods(&mut self, original: &Service, update: &Service) -> Result<()> {
        // Every method name from either side, in sorted order.
        let original_names = original.methods.keys();
        let names: BTreeSet<&String> = original_names.chain(update.methods.keys()).collect();
        for name in names {
            match (original.methods.get(name), update.methods.get(name)) {
                (Some(method), None) => self.finding_container.add_finding(
                    FindingCategory::MethodRemoval,
                    &method.proto_file_name,
                    method.source_code_line,
                    format!("An existing rpc method `{}` is removed.", method.name),
                    ChangeType::Major,
                ),
                (None, Some(method)) => self.finding_container.add_finding(
                    FindingCategory::MethodAddition,
                    &method.proto_file_name,
                    method.source_code_line,
                    format!("A new rpc method `{}` is added.", method.name),
                    ChangeType::Minor,
                ),
                (Some(method_original), Some(method_update)) => {
                    // Type names inside the method may move with the service's version.
                    let versions = Versions {
                        original: original.api_version.as_deref(),
                        update: update.api_version.as_deref(),
                    };
                    MethodComparator {
                        original: method_original,
                        update: method_update,
                        versions,
                        finding_container: self.finding_container,
                    }
                    .compare()?;
                }
                (None, None) => {}
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
struct Versions<'v> {
    original: Option<&'v str>,
    update: Option<&'v str>,
}

impl Versions<'_> {
    fn same(&self, original: &str, update: &str) -> bool {
        same_versioned_name(original, update, self.original, self.update)
    }
}

struct MethodComparator<'a, 'v> {
    original: &'a Method,
    update: &'a Method,
    versions: Versions<'v>,
    finding_container: &'a mut FindingContainer,
}

impl MethodComparator<'_, '_> {
    fn compare(&mut self) -> Result<()> {
        // An incomplete LRO annotation aborts the whole comparison.
        validate_lro(self.original)?;
        validate_lro(self.update)?;

        // Request and response types.
        let (original, update) = (self.original, self.update);
        if !self.versions.same(&original.input.value, &update.input.value) {
            self.add(
                FindingCategory::MethodInputTypeChange,
                update.input.source_code_line,
                format!(
                    "Input type of an existing method `{}` is changed from `{}` to `{}`.",
                    original.name, original.input.value, update.input.value
                ),
            );
        }
        if !self.versions.same(&original.output.value, &update.output.value) {
            self.add(
                FindingCategory::MethodResponseTypeChange,
                update.output.source_code_line,
                format!(
                    "Output type of an existing method `{}` is changed from `{}` to `{}`.",
                    original.name, original.output.value, update.output.value
                ),
            );
        }
        // Streaming on either end.
        if original.client_streaming.value != update.client_streaming.value {
            self.add(
                FindingCategory::MethodClientStreamingChange,
                update.client_streaming.source_code_line,
                format!(
                    "The request streaming type of an existing method `{}` is changed.",
                    original.name
                ),
            );
        }
        if original.server_streaming.value != update.server_streaming.value {
            self.add(
                FindingCategory::MethodServerStreamingChange,
                update.server_streaming.source_code_line,
                format!(
                    "The response streaming type of an existing method `{}` is changed.",
                    original.name
                ),
            );
        }
        // AIP-158 pagination, through the resolved page field.
        if !self.same_paged_result(original, update) {
            self.add(
                FindingCategory::MethodPaginatedResponseChange,
                update.source_code_line,
                format!(
                    "The paginated response of an existing method `{}` is changed.",
                    original.name
                ),
            );
        }

        // Method options.
        self.compare_signatures();
        self.compare_lro();
        self.compare_http();
        Ok(())
    }

    /// Records a breaking change against the updated method.
    fn add(&mut self, category: FindingCategory, line: Option<usize>, message: String) {
        self.finding_container.add_finding(
            category,
            &self.update.proto_file_name,
            line.or(self.update.source_code_line),
            message,
            ChangeType::Major,
        );
    }

    fn same_paged_result(&self, original: &Method, update: &Method) -> bool {
        match (&original.paged_result_field, &update.paged_result_field) {
            (None, None) => true,
            (Some(field_original), Some(field_update)) => {
                let same_type_name = match (&field_original.type_name, &field_update.type_name) {
                    (None, None) => true,
                    (Some(a), Some(b)) => self.versions.same(&a.value, &b.value),
                    _ => false,
                };
                field_original.proto_type.value == field_update.proto_type.value && same_type_name
            }
            _ => false,
        }
    }

    /// Signatures are positional; appending one is fine.
    fn compare_signatures(&mut self) {
        let (original, update) = (self.original, self.update);
        let updated = &update.method_signatures.value;
        for (i, signature) in original.method_signatures.value.iter().enumerate() {
            match updated.get(i) {
                None => self.add(
                    FindingCategory::MethodSignatureChange,
                    update.method_signatures.source_code_line,
                    format!(
                        "An existing method_signature is removed from method `{}`.",
                        original.name
                    ),
                ),
                Some(signature_update) if signature_update != signature => self.add(
                    FindingCategory::MethodSignatureChange,
                    update.method_signatures.source_code_line,
                    format!(
                        "An existing method_signature for method `{}` is changed from `{}` to `{}`.",
                        original.name, signature, signature_update
                    ),
                ),
                Some(_) => {}
            }
        }
    }

    fn compare_lro(&mut self) {
        let (original, update) = (self.original, self.update);
        match (&original.lro_annotation, &update.lro_annotation) {
            (None, None) => {}
            (None, Some(annotation)) => self.finding_container.add_finding(
                FindingCategory::LroAnnotationAddition,
                &annotation.proto_file_name,
                annotation.source_code_line,
                format!(
                    "A new LRO operation_info annotation is added to method `{}`.",
                    original.name
                ),
                ChangeType::Minor,
            ),
            (Some(_), None) => self.add(
                FindingCategory::LroAnnotationRemoval,
                None,
                format!(
                    "An existing LRO operation_info annotation is removed from method `{}`.",
                    original.name
                ),
            ),
            (Some(lro_original), Some(lro_update)) => {
                let (a, b) = (&lro_original.value, &lro_update.value);
                if !self.versions.same(&a.response_type, &b.response_type) {
                    self.add(
                        FindingCategory::LroResponseChange,
                        lro_update.source_code_line,
                        format!(
                            "The response_type of an existing LRO operation_info annotation for method `{}` is changed from `{}` to `{}`.",
                            original.name, a.response_type, b.response_type
                        ),
                    );
                }
                if !self.versions.same(&a.metadata_type, &b.metadata_type) {
                    self.add(
                        FindingCategory::LroMetadataChange,
                        lro_update.source_code_line,
                        format!(
                            "The metadata_type of an existing LRO operation_info annotation for method `{}` is changed from `{}` to `{}`.",
                            original.name, a.metadata_type, b.metadata_type
                        ),
                    );
                }
            }
        }
    }

    fn compare_http(&mut self) {
        let (original, update) = (self.original, self.update);
        match (&original.http_annotation, &update.http_annotation) {
            (None, None) => {}
            (None, Some(annotation)) => self.finding_container.add_finding(
                FindingCategory::HttpAnnotationAddition,
                &annotation.proto_file_name,
                annotation.source_code_line,
                format!(
                    "A google.api.http annotation is added to method `{}`.",
                    original.name
                ),
                ChangeType::Minor,
            ),
            (Some(_), None) => self.add(
                FindingCategory::HttpAnnotationRemoval,
                None,
                format!(
                    "The google.api.http annotation for existing method `{}` is removed.",
                    original.name
                ),
            ),
            (Some(http_original), Some(http_update)) => {
                let (a, b) = (&http_original.value, &http_update.value);
                let line = http_update.source_code_line;
                if a.http_method != b.http_method {
                    self.add(
                        FindingCategory::HttpAnnotationChange,
                        line,
                        format!(
                            "An existing http method of google.api.http annotation is changed for method `{}`.",
                            original.name
                        ),
                    );
                }
                // `/v1/{name=projects/*}` and `/v1alpha/{name=projects/*}` are the same binding.
                if !self.versions.same(&a.http_uri, &b.http_uri) {
                    self.add(
                        FindingCategory::HttpAnnotationChange,
                        line,
                        format!(
                            "An existing http method URI of google.api.http annotation is changed for method `{}`.",
                            original.name
                        ),
                    );
                }
                if a.http_body != b.http_body {
                    self.add(
                        FindingCategory::HttpAnnotationChange,
                        line,
                        format!(
                            "An existing http method body of google.api.http annotation is changed for method `{}`.",
                            original.name
                        ),
                    );
                }
            }
        }
    }
}

/// A method returning `google.longrunning.Operation` must say what the
/// operation resolves to.
fn validate_lro(method: &Method) -> Result<()> {
    if !method.longrunning {
        return Ok(());
    }
    let complete = match &method.lro_annotation {
        Some(lro) => !lro.value.response_type.is_empty() && !lro.value.metadata_type.is_empty(),
        None => false,
    };
    if complete {
        Ok(())
    } else {
        Err(DetectorError::IncompleteLroAnnotation {
            method: method.name.clone(),
        })
    }
}
