//! Terminal client for a remote resume-analysis service: validate a resume
//! PDF and a job description locally, submit them for analysis, then parse,
//! render, export and share the scored result.

pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod pdf_validator;
pub mod report;
pub mod session;

pub use analysis::{AnalysisResult, AnalysisSections};
pub use api::{AnalyzeResponse, ApiClient, ApiError};
pub use config::Config;
pub use pdf_validator::{ResumeFile, ResumeValidator, MAX_RESUME_BYTES};
pub use report::ScoreBand;
pub use session::{AnalysisSession, ApiStatus, SubmitError, MIN_DESCRIPTION_CHARS};
