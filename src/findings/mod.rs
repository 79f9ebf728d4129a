//! Findings produced by the comparators, and their JSON and text renderings.

mod category;

pub use category::{ChangeType, FindingCategory};

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Where a finding was detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// The proto file, relative to its proto path (e.g. `google/example/v1/foo.proto`).
    pub proto_file_name: String,
    /// 1-based line, if the descriptor set carried source info.
    pub source_code_line: Option<usize>,
}

/// A single detected difference between the two API versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub location: Location,
    pub message: String,
    pub change_type: ChangeType,
}

impl Finding {
    pub fn is_breaking(&self) -> bool {
        self.change_type == ChangeType::Major
    }
}

/// Collects the findings of one detection run.
///
/// Every comparator writes into the same container, so the order of findings
/// follows the order of the comparisons.
#[derive(Debug, Default, Clone)]
pub struct FindingContainer {
    findings: Vec<Finding>,
}

impl FindingContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding.
    pub fn add_finding(
        &mut self,
        category: FindingCategory,
        proto_file_name: &str,
        source_code_line: Option<usize>,
        message: String,
        change_type: ChangeType,
    ) {
        log::debug!("{} [{}] {}", change_type, category, message);
        self.findings.push(Finding {
            category,
            location: Location {
                proto_file_name: proto_file_name.to_string(),
                source_code_line,
            },
            message,
            change_type,
        });
    }

    pub fn get_all_findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Only the findings that break existing clients.
    pub fn get_breaking_findings(&self) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.is_breaking()).collect()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Serializes every finding as a JSON array.
    ///
    /// Each element carries `category`, `location.proto_file_name`,
    /// `location.source_code_line`, `message` and `change_type`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.findings)
    }

    /// One line per breaking finding, `file Lnn: message`, sorted by file then line.
    pub fn to_human_readable_message(&self) -> String {
        let mut breaking = self.get_breaking_findings();
        breaking.sort_by(|a, b| {
            let (a, b) = (&a.location, &b.location);
            a.proto_file_name
                .cmp(&b.proto_file_name)
                .then(a.source_code_line.cmp(&b.source_code_line))
        });

        let mut output = String::new();
        for finding in breaking {
            let location = &finding.location;
            match location.source_code_line {
                Some(line) => {
                    let _ = writeln!(
                        output,
                        "{} L{}: {}",
                        location.proto_file_name, line, finding.message
                    );
                }
                None => {
                    let _ = writeln!(output, "{}: {}", location.proto_file_name, finding.message);
                }
            }
        }
        output
    }
}
