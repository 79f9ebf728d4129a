//! Runs a detection: wraps both descriptor sets, compares them and reports.

pub mod loader;
pub mod options;

pub use loader::Loader;
pub use options::{Options, Side};

use crate::comparator::wrappers::FileSet;
use crate::comparator::FileSetComparator;
use crate::descriptor::FileDescriptorSet;
use crate::error::Result;
use crate::findings::FindingContainer;
use colored::*;
use std::fs;

/// Detects the breaking changes between two versions of an API.
pub struct Detector<'a> {
    descriptor_set_original: &'a FileDescriptorSet,
    descriptor_set_update: &'a FileDescriptorSet,
    opts: &'a Options,
}

impl<'a> Detector<'a> {
    pub fn new(
        descriptor_set_original: &'a FileDescriptorSet,
        descriptor_set_update: &'a FileDescriptorSet,
        opts: &'a Options,
    ) -> Self {
        Self {
            descriptor_set_original,
            descriptor_set_update,
            opts,
        }
    }

    /// Compares the two versions without writing anything.
    pub fn compare(&self) -> Result<FindingContainer> {
        let prefixes = self.opts.package_prefixes.as_deref();
        let (original, update) = rayon::join(
            || FileSet::new(self.descriptor_set_original, prefixes),
            || FileSet::new(self.descriptor_set_update, prefixes),
        );
        let mut finding_container = FindingContainer::new();
        FileSetComparator::new(&original, &update, &mut finding_container).compare()?;
        Ok(finding_container)
    }

    /// Compares, writes every finding to the output JSON file (replacing any
    /// previous file) and prints the breaking ones when requested.
    pub fn detect_breaking_changes(&self) -> Result<FindingContainer> {
        let finding_container = self.compare()?;
        let breaking = finding_container.get_breaking_findings().len();
        log::info!(
            "Detected {} finding(s), {} breaking",
            finding_container.len(),
            breaking
        );

        fs::write(&self.opts.output_json_path, finding_container.to_json()?)?;
        let output = self.opts.output_json_path.display();
        log::info!("Findings written to {}", output);

        if self.opts.human_readable_message {
            if breaking == 0 {
                println!("{}", "No breaking changes detected.".green().bold());
            } else {
                let header = format!("{} breaking change(s) detected:", breaking);
                println!("{}", header.red().bold());
                print!("{}", finding_container.to_human_readable_message());
            }
        }
        Ok(finding_container)
    }
}
