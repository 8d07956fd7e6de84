// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Labeled test cases, grouped by what they exercise.
//!
//! A corpus directory holds one JSON file per group. Each file is an object
//! with a single array under the group's key:
//!
//! ```json
//! { "edge_cases": [ { "id": "E1", "query": "APT-12345", "expected_agent": "order_status" } ] }
//! ```
//!
//! `id` and `reason` are optional. A missing file yields an empty group.

use std::path::Path;

use helpdesk_core::HelpdeskError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use tracing::{debug, warn};

/// What a group of test cases exercises.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    Basic,
    EdgeCases,
    ClinicalSafety,
    Hallucination,
    Uncertainty,
}

impl CategoryGroup {
    /// Fixed report order.
    pub const ALL: [CategoryGroup; 5] = [
        CategoryGroup::Basic,
        CategoryGroup::EdgeCases,
        CategoryGroup::ClinicalSafety,
        CategoryGroup::Hallucination,
        CategoryGroup::Uncertainty,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            CategoryGroup::Basic => "Basic Routing",
            CategoryGroup::EdgeCases => "Edge Cases",
            CategoryGroup::ClinicalSafety => "Clinical Safety",
            CategoryGroup::Hallucination => "Hallucination Detection",
            CategoryGroup::Uncertainty => "Uncertainty Handling",
        }
    }

    /// File name inside a corpus directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            CategoryGroup::Basic => "test_queries.json",
            CategoryGroup::EdgeCases => "edge_cases.json",
            CategoryGroup::ClinicalSafety => "clinical_safety.json",
            CategoryGroup::Hallucination => "hallucination_tests.json",
            CategoryGroup::Uncertainty => "uncertainty_tests.json",
        }
    }

    /// Top-level key holding the case array.
    pub fn json_key(&self) -> &'static str {
        match self {
            CategoryGroup::Basic => "test_queries",
            CategoryGroup::EdgeCases => "edge_cases",
            CategoryGroup::ClinicalSafety => "clinical_safety",
            CategoryGroup::Hallucination => "hallucination_tests",
            CategoryGroup::Uncertainty => "uncertainty_tests",
        }
    }

    fn builtin_json(&self) -> &'static str {
        match self {
            CategoryGroup::Basic => include_str!("../corpus/test_queries.json"),
            CategoryGroup::EdgeCases => include_str!("../corpus/edge_cases.json"),
            CategoryGroup::ClinicalSafety => include_str!("../corpus/clinical_safety.json"),
            CategoryGroup::Hallucination => include_str!("../corpus/hallucination_tests.json"),
            CategoryGroup::Uncertainty => include_str!("../corpus/uncertainty_tests.json"),
        }
    }
}

/// One labeled query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub id: String,
    pub query: String,
    /// Expected category label. Kept as text so that a bad label is scored
    /// as incorrect instead of rejecting the whole file.
    pub expected_category: String,
    pub group: CategoryGroup,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCase {
    #[serde(default)]
    id: Option<serde_json::Value>,
    query: String,
    expected_agent: String,
    #[serde(default)]
    reason: Option<String>,
}

impl RawCase {
    fn into_case(self, group: CategoryGroup, index: usize) -> TestCase {
        let id = match self.id {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => format!("{group}-{}", index + 1),
            Some(other) => other.to_string(),
        };
        TestCase {
            id,
            query: self.query,
            expected_category: self.expected_agent,
            group,
            reason: self.reason,
        }
    }
}

/// An ordered, read-only set of test cases.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    cases: Vec<TestCase>,
}

impl Corpus {
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    /// The corpus compiled into the binary.
    pub fn builtin() -> Result<Self, HelpdeskError> {
        let mut cases = Vec::new();
        for group in CategoryGroup::ALL {
            let origin = Path::new("<built-in corpus>").join(group.file_name());
            cases.extend(parse_group(group, group.builtin_json(), &origin)?);
        }
        Ok(Self::new(cases))
    }

    /// Loads every group file found in `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, HelpdeskError> {
        let mut cases = Vec::new();
        for group in CategoryGroup::ALL {
            let path = dir.join(group.file_name());
            let json = match std::fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(path = %path.display(), group = %group, "corpus file not found, skipping group");
                    continue;
                }
                Err(e) => {
                    return Err(HelpdeskError::Data {
                        path,
                        source: Box::new(e),
                    });
                }
            };
            let group_cases = parse_group(group, &json, &path)?;
            debug!(group = %group, count = group_cases.len(), "loaded corpus group");
            cases.extend(group_cases);
        }
        Ok(Self::new(cases))
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Non-empty groups in [`CategoryGroup::ALL`] order, each in file order.
    pub fn partition(&self) -> Vec<(CategoryGroup, Vec<&TestCase>)> {
        CategoryGroup::ALL
            .iter()
            .map(|&group| {
                let cases: Vec<&TestCase> =
                    self.cases.iter().filter(|c| c.group == group).collect();
                (group, cases)
            })
            .filter(|(_, cases)| !cases.is_empty())
            .collect()
    }

    /// Number of cases in `group`.
    pub fn group_len(&self, group: CategoryGroup) -> usize {
        self.cases.iter().filter(|c| c.group == group).count()
    }
}

/// Parses one group file.
pub fn parse_group(
    group: CategoryGroup,
    json: &str,
    origin: &Path,
) -> Result<Vec<TestCase>, HelpdeskError> {
    let data_err = |source: Box<dyn std::error::Error + Send + Sync>| HelpdeskError::Data {
        path: origin.to_path_buf(),
        source,
    };

    let mut doc: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(json).map_err(|e| data_err(Box::new(e)))?;
    let raw = doc
        .remove(group.json_key())
        .ok_or_else(|| data_err(format!("missing \"{}\" array", group.json_key()).into()))?;
    let raw: Vec<RawCase> = serde_json::from_value(raw).map_err(|e| data_err(Box::new(e)))?;

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(i, case)| case.into_case(group, i))
        .collect())
}
