use crate::error::{DetectorError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// File name used for the findings when no output path is given.
pub const DEFAULT_OUTPUT_JSON: &str = "detected_breaking_changes.json";

/// Which version of the API a setting applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Original,
    Update,
}

/// Validated configuration of one detection run.
#[derive(Debug, Clone)]
pub struct Options {
    pub original_api_definition_dirs: Vec<PathBuf>,
    pub update_api_definition_dirs: Vec<PathBuf>,
    /// Proto files passed to protoc, relative to the definition dirs.
    /// Empty means every `.proto` under the dirs.
    pub original_proto_files: Vec<String>,
    pub update_proto_files: Vec<String>,
    /// A prebuilt descriptor set replaces the protoc invocation for its side.
    pub original_descriptor_set_file_path: Option<PathBuf>,
    pub update_descriptor_set_file_path: Option<PathBuf>,
    /// Extra `--proto_path` entries for imported protos.
    pub include_dirs: Vec<PathBuf>,
    pub package_prefixes: Option<Vec<String>>,
    pub human_readable_message: bool,
    pub output_json_path: PathBuf,
    pub protoc: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            original_api_definition_dirs: Vec::new(),
            update_api_definition_dirs: Vec::new(),
            original_proto_files: Vec::new(),
            update_proto_files: Vec::new(),
            original_descriptor_set_file_path: None,
            update_descriptor_set_file_path: None,
            include_dirs: Vec::new(),
            package_prefixes: None,
            human_readable_message: false,
            output_json_path: default_output_json_path(),
            protoc: PathBuf::from("protoc"),
        }
    }
}

impl Options {
    /// Checks that every directory exists and that each side has something to load.
    pub fn validate(self) -> Result<Self> {
        let dirs = self
            .original_api_definition_dirs
            .iter()
            .chain(&self.update_api_definition_dirs)
            .chain(&self.include_dirs);
        for dir in dirs {
            if !dir.is_dir() {
                return Err(DetectorError::MissingDirectory(dir.clone()));
            }
        }
        for side in [Side::Original, Side::Update] {
            let (dirs, descriptor_set) = match side {
                Side::Original => (
                    &self.original_api_definition_dirs,
                    &self.original_descriptor_set_file_path,
                ),
                Side::Update => (
                    &self.update_api_definition_dirs,
                    &self.update_descriptor_set_file_path,
                ),
            };
            let option = match side {
                Side::Original => "original_api_definition_dirs",
                Side::Update => "update_api_definition_dirs",
            };
            match descriptor_set {
                Some(path) if !path.is_file() => {
                    return Err(DetectorError::invalid_option(
                        option,
                        format!("descriptor set file `{}` does not exist", path.display()),
                    ));
                }
                None if dirs.is_empty() => {
                    return Err(DetectorError::invalid_option(
                        option,
                        "either definition directories or a descriptor set file is required",
                    ));
                }
                _ => {}
            }
        }
        Ok(self)
    }

    pub fn api_definition_dirs(&self, side: Side) -> &[PathBuf] {
        match side {
            Side::Original => &self.original_api_definition_dirs,
            Side::Update => &self.update_api_definition_dirs,
        }
    }

    pub fn proto_files(&self, side: Side) -> &[String] {
        match side {
            Side::Original => &self.original_proto_files,
            Side::Update => &self.update_proto_files,
        }
    }

    pub fn descriptor_set_file_path(&self, side: Side) -> Option<&Path> {
        match side {
            Side::Original => self.original_descriptor_set_file_path.as_deref(),
            Side::Update => self.update_descriptor_set_file_path.as_deref(),
        }
    }
}

/// Splits a comma separated list, trimming entries and dropping empty ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `None` for a missing or blank list, so that the root package is inferred.
pub fn parse_package_prefixes(value: Option<&str>) -> Option<Vec<String>> {
    let prefixes = split_list(value?);
    if prefixes.is_empty() {
        None
    } else {
        Some(prefixes)
    }
}

fn default_output_json_path() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(DEFAULT_OUTPUT_JSON)
}
