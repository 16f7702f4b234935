// src/analysis/mod.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod score;
pub mod sections;

pub use score::extract_match_score;
pub use sections::{parse_analysis_sections, strip_markup};

/// Named sections split out of the analysis markup. Sections the service did
/// not produce stay empty; `overall` always holds the full text as received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSections {
    pub skills: String,
    pub experience: String,
    pub recommendations: String,
    pub strengths: String,
    pub weaknesses: String,
    pub overall: String,
}

/// One completed analysis. Replaced wholesale by the next submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub match_score: u8,
    pub analysis: AnalysisSections,
    pub raw_analysis: String,
    pub analyzed_at: DateTime<Utc>,
}
