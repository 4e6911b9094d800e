use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted analysis for a product. At most one row per product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub product_name: String,
    pub positive_opinions: String,
    pub negative_opinions: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// What the analyzer hands back from one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewAnalysis {
    pub ad_analysis: String,
    pub positive: String,
    pub negative: String,
    pub summary: String,
    /// The input exceeded the character budget and only its prefix was sent.
    pub truncated: bool,
}

impl ReviewAnalysis {
    pub fn into_result(self, product_name: &str) -> AnalysisResult {
        AnalysisResult {
            product_name: product_name.to_string(),
            positive_opinions: self.positive,
            negative_opinions: self.negative,
            summary: self.summary,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    #[default]
    NotGenerated,
    Cached,
    Fresh,
    Failed,
    NoApiKey,
}
