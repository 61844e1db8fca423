use serde::{Deserialize, Serialize};
use sift_core::types::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotspotKind {
    NestedLoop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    #[serde(rename = "type")]
    pub kind: HotspotKind,
    pub line: u32,
    pub severity: Severity,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    pub hotspots: Vec<Hotspot>,
    /// Always empty; kept so the serialized shape stays stable.
    pub memory_leaks: Vec<String>,
    pub optimization_suggestions: Vec<String>,
    pub performance_score: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl PerformanceProfile {
    /// Profile for source that could not be parsed.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// `100 - 10 per hotspot - 5 per suggestion`, floored at 0.
pub fn performance_score(hotspots: usize, suggestions: usize) -> u32 {
    let penalty = hotspots.saturating_mul(10).saturating_add(suggestions.saturating_mul(5));
    100usize.saturating_sub(penalty) as u32
}
