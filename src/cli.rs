//! Command line interface of the detector binary.

use crate::detector::options::{parse_package_prefixes, split_list};
use crate::detector::{Detector, Loader, Options, Side};
use crate::error::Result;
use crate::findings::FindingContainer;
use clap::Parser;
use std::path::PathBuf;

/// Detects breaking changes between two versions of a protobuf API.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Comma separated directories of the original API definition files.
    #[arg(long = "original_api_definition_dirs", default_value = "")]
    pub original_api_definition_dirs: String,

    /// Comma separated directories of the updated API definition files.
    #[arg(long = "update_api_definition_dirs", default_value = "")]
    pub update_api_definition_dirs: String,

    /// Comma separated proto files of the original version. Defaults to
    /// every `.proto` under the original directories.
    #[arg(long = "original_proto_files", default_value = "")]
    pub original_proto_files: String,

    /// Comma separated proto files of the updated version.
    #[arg(long = "update_proto_files", default_value = "")]
    pub update_proto_files: String,

    /// Prebuilt descriptor set of the original version, used instead of protoc.
    #[arg(long = "original_descriptor_set_file_path")]
    pub original_descriptor_set_file_path: Option<PathBuf>,

    /// Prebuilt descriptor set of the updated version, used instead of protoc.
    #[arg(long = "update_descriptor_set_file_path")]
    pub update_descriptor_set_file_path: Option<PathBuf>,

    /// Comma separated package prefixes of the API definition files, so that
    /// imported dependencies are not compared.
    #[arg(long = "package_prefixes")]
    pub package_prefixes: Option<String>,

    /// Comma separated directories of imported protos.
    #[arg(long = "include_dirs", default_value = "")]
    pub include_dirs: String,

    /// Print the breaking changes.
    #[arg(long = "human_readable_message")]
    pub human_readable_message: bool,

    /// Where to write the findings. Defaults to
    /// `detected_breaking_changes.json` in the current directory.
    #[arg(long = "output_json_path")]
    pub output_json_path: Option<PathBuf>,

    /// The protoc binary.
    #[arg(long, env = "PROTOC", default_value = "protoc")]
    pub protoc: PathBuf,
}

impl Cli {
    /// Builds validated options from the flags.
    pub fn options(&self) -> Result<Options> {
        let dirs = |value: &str| -> Vec<PathBuf> {
            split_list(value).into_iter().map(PathBuf::from).collect()
        };
        let mut options = Options {
            original_api_definition_dirs: dirs(&self.original_api_definition_dirs),
            update_api_definition_dirs: dirs(&self.update_api_definition_dirs),
            original_proto_files: split_list(&self.original_proto_files),
            update_proto_files: split_list(&self.update_proto_files),
            original_descriptor_set_file_path: self.original_descriptor_set_file_path.clone(),
            update_descriptor_set_file_path: self.update_descriptor_set_file_path.clone(),
            include_dirs: dirs(&self.include_dirs),
            package_prefixes: parse_package_prefixes(self.package_prefixes.as_deref()),
            human_readable_message: self.human_readable_message,
            protoc: self.protoc.clone(),
            ..Default::default()
        };
        if let Some(path) = &self.output_json_path {
            options.output_json_path = path.clone();
        }
        options.validate()
    }
}

/// Loads both versions in parallel and runs the detector.
pub fn run(cli: &Cli) -> Result<FindingContainer> {
    let options = cli.options()?;
    let (original, update) = rayon::join(
        || Loader::from_options(&options, Side::Original).get_descriptor_set(),
        || Loader::from_options(&options, Side::Update).get_descriptor_set(),
    );
    let (original, update) = (original?, update?);
    Detector::new(&original, &update, &options).detect_breaking_changes()
}
