//! Summary counts over a set of findings

use crate::model::{Bug, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Finding counts by severity and category
///
/// Keys are the serialized severity/category names; only tags that occur
/// at least once are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_bugs: usize,
    pub by_severity: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
}

impl Summary {
    /// Counts the given findings
    pub fn from_bugs(bugs: &[Bug]) -> Self {
        let mut summary = Self {
            total_bugs: bugs.len(),
            ..Self::default()
        };

        for bug in bugs {
            *summary
                .by_severity
                .entry(bug.severity().as_str().to_string())
                .or_insert(0) += 1;
            *summary
                .by_category
                .entry(bug.category().as_str().to_string())
                .or_insert(0) += 1;
        }

        summary
    }

    /// Returns the count for one severity (zero when absent)
    pub fn severity_count(&self, severity: Severity) -> usize {
        self.by_severity
            .get(severity.as_str())
            .copied()
            .unwrap_or(0)
    }

    /// Returns the number of critical and high findings
    pub fn urgent_count(&self) -> usize {
        Severity::all()
            .into_iter()
            .filter(Severity::is_urgent)
            .map(|severity| self.severity_count(severity))
            .sum()
    }

    /// Categories sorted by descending count, then by name
    pub fn categories_by_count(&self) -> Vec<(&str, usize)> {
        let mut categories: Vec<(&str, usize)> = self
            .by_category
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        categories
    }
}
