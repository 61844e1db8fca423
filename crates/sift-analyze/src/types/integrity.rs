use serde::{Deserialize, Serialize};
use sift_core::types::Finding;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub security_issues: Vec<Finding>,
    pub integrity_issues: Vec<Finding>,
    pub best_practice_violations: Vec<Finding>,
    /// Set when the source could not be parsed; the lists are then empty.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl IntegrityReport {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// All findings, security first.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.security_issues
            .iter()
            .chain(&self.integrity_issues)
            .chain(&self.best_practice_violations)
    }

    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.findings().next().is_none()
    }
}
