use crate::descriptor::FileDescriptorSet;
use crate::detector::options::{Options, Side};
use crate::error::{DetectorError, Result};
use prost::Message;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Checkouts of the common protos, picked up from the working directory when present.
const COMMON_PROTOS_DIRS: [&str; 2] = ["api-common-protos", "protobuf/src"];

/// Loads the `FileDescriptorSet` of one side of the comparison, either by
/// running protoc over the definition directories or by decoding a prebuilt
/// descriptor set.
#[derive(Debug, Clone)]
pub struct Loader {
    proto_dirs: Vec<PathBuf>,
    proto_files: Vec<String>,
    include_dirs: Vec<PathBuf>,
    descriptor_set_file: Option<PathBuf>,
    protoc: PathBuf,
}

impl Loader {
    pub fn new(proto_dirs: Vec<PathBuf>, proto_files: Vec<String>) -> Self {
        Self {
            proto_dirs,
            proto_files,
            include_dirs: Vec::new(),
            descriptor_set_file: None,
            protoc: PathBuf::from("protoc"),
        }
    }

    pub fn from_options(options: &Options, side: Side) -> Self {
        let descriptor_set_file = options.descriptor_set_file_path(side);
        Self {
            proto_dirs: options.api_definition_dirs(side).to_vec(),
            proto_files: options.proto_files(side).to_vec(),
            include_dirs: options.include_dirs.clone(),
            descriptor_set_file: descriptor_set_file.map(Path::to_path_buf),
            protoc: options.protoc.clone(),
        }
    }

    pub fn with_descriptor_set_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.descriptor_set_file = Some(path.into());
        self
    }

    pub fn with_protoc(mut self, protoc: impl Into<PathBuf>) -> Self {
        self.protoc = protoc.into();
        self
    }

    pub fn get_descriptor_set(&self) -> Result<FileDescriptorSet> {
        if let Some(path) = &self.descriptor_set_file {
            log::info!("Decoding descriptor set {}", path.display());
            return decode_descriptor_set(path);
        }
        self.run_protoc()
    }

    /// Every `.proto` under the definition dirs, relative to its dir.
    pub fn proto_files(&self) -> Vec<String> {
        if !self.proto_files.is_empty() {
            return self.proto_files.clone();
        }
        let mut files = Vec::new();
        for dir in &self.proto_dirs {
            let protos = WalkDir::new(dir)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().map_or(false, |ext| ext == "proto"));
            for entry in protos {
                if let Ok(relative) = entry.path().strip_prefix(dir) {
                    // protoc wants forward slashes in import paths.
                    let name = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");
                    files.push(name);
                }
            }
        }
        files
    }

    fn run_protoc(&self) -> Result<FileDescriptorSet> {
        let output = tempfile::Builder::new()
            .prefix("descriptor_set")
            .suffix(".pb")
            .tempfile()?;

        let mut command = Command::new(&self.protoc);
        for dir in self.proto_path() {
            command.arg(format!("--proto_path={}", dir.display()));
        }
        command
            .arg(format!("-o{}", output.path().display()))
            .arg("--include_source_info")
            .arg("--include_imports")
            .args(self.proto_files());
        log::debug!("Running {:?}", command);

        let result = command.output()?;
        if !result.status.success() {
            return Err(DetectorError::Protoc {
                command: format!("{:?}", command),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }
        // The temp file is removed when `output` drops.
        decode_descriptor_set(output.path())
    }

    fn proto_path(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .proto_dirs
            .iter()
            .chain(&self.include_dirs)
            .cloned()
            .collect();
        for common in COMMON_PROTOS_DIRS {
            let path = PathBuf::from(common);
            if path.is_dir() && !dirs.contains(&path) {
                dirs.push(path);
            }
        }
        dirs
    }
}

fn decode_descriptor_set(path: &Path) -> Result<FileDescriptorSet> {
    let bytes = fs::read(path)?;
    let descriptor_set = FileDescriptorSet::decode(bytes.as_slice())?;
    log::debug!(
        "Loaded {} file(s) from {}",
        descriptor_set.file.len(),
        path.display()
    );
    Ok(descriptor_set)
}
