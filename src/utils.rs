use crate::descriptor::SourceCodeInfo;
use regex::Regex;
use std::collections::HashMap;

lazy_static::lazy_static! {
    // Matches API version package components: v1, v2beta, v1alpha3, v1p1beta1.
    static ref API_VERSION_RE: Regex =
        Regex::new(r"^v\d+(?:p\d+)?(?:(?:alpha|beta)\d*)?$").unwrap();
}

/// Maps descriptor paths to source lines.
///
/// `protoc --include_source_info` records a `Location` for every element, keyed
/// by its path of field numbers and indexes from the `FileDescriptorProto` root.
/// Spans are zero-based; lines returned here are 1-based.
#[derive(Debug, Default, Clone)]
pub struct SourceIndex {
    lines: HashMap<Vec<i32>, usize>,
}

impl SourceIndex {
    /// Creates a new `SourceIndex` from the file's source code info, if any.
    pub fn new(source_code_info: Option<&SourceCodeInfo>) -> Self {
        let mut lines = HashMap::new();
        if let Some(info) = source_code_info {
            for location in &info.location {
                // Malformed spans (negative start) are skipped.
                let line = location.span.first().and_then(|&l| usize::try_from(l).ok());
                if let Some(line) = line {
                    // Keep the first location recorded for a path.
                    lines.entry(location.path.clone()).or_insert(line + 1);
                }
            }
        }
        Self { lines }
    }

    /// Line of the element at `path`, if the descriptor carries source info for it.
    pub fn line(&self, path: &[i32]) -> Option<usize> {
        self.lines.get(path).copied()
    }
}

/// Extracts the API version from a package name, e.g. `v1beta1` from
/// `google.cloud.example.v1beta1`. The last matching component wins.
pub fn api_version_of(package: &str) -> Option<String> {
    package
        .split('.')
        .rev()
        .find(|part| API_VERSION_RE.is_match(part))
        .map(str::to_string)
}

/// Rewrites the API version inside `name` from `original_version` to
/// `update_version`, so that `.example.v1.Enum` can be matched against
/// `.example.v1beta1.Enum`. Returns `None` when the original has no version.
pub fn transform_api_version(
    name: &str,
    original_version: Option<&str>,
    update_version: Option<&str>,
) -> Option<String> {
    let original_version = original_version?;
    let update_version = update_version.unwrap_or(original_version);
    Some(name.replace(original_version, update_version))
}

/// True when `original` and `update` name the same thing, allowing a move
/// between API versions.
pub fn same_versioned_name(
    original: &str,
    update: &str,
    original_version: Option<&str>,
    update_version: Option<&str>,
) -> bool {
    original == update
        || transform_api_version(original, original_version, update_version).as_deref()
            == Some(update)
}
