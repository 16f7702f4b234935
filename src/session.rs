// src/session.rs
//! Client-side state for one analysis session
//!
//! Owns the upload form, the service reachability status, the in-flight
//! flag, the transient error banner and the latest result. Submission runs
//! its precondition checks in a fixed order so the user always sees the
//! first unmet requirement, never a generic failure.

use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::analysis::{extract_match_score, parse_analysis_sections, AnalysisResult};
use crate::api::{AnalyzeResponse, ApiClient, ApiError};
use crate::config::Config;
use crate::pdf_validator::{ResumeFile, ResumeValidationError, ResumeValidator};

/// Minimum length of the trimmed job description
pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// Seconds a raised error banner stays visible
const ERROR_BANNER_TTL_SECS: i64 = 8;

/// Reachability of the analysis service as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Checking,
    Connected,
    Error,
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checking => write!(f, "checking"),
            Self::Connected => write!(f, "connected"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Transient user-facing error. Expires on its own; raising a new one
/// replaces it and restarts the clock.
#[derive(Debug, Clone)]
pub struct ErrorBanner {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl ErrorBanner {
    pub fn is_active(&self, at: DateTime<Utc>) -> bool {
        at - self.raised_at < Duration::seconds(ERROR_BANNER_TTL_SECS)
    }
}

/// Why a submission was refused or failed
#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("Please upload a resume")]
    MissingResume,
    #[error("Please enter a job description")]
    EmptyDescription,
    #[error("Job description must be at least 20 characters long")]
    DescriptionTooShort,
    #[error("API server is not available. Please try again later.")]
    ServerUnavailable,
    #[error("An analysis is already in progress")]
    AlreadyRunning,
    #[error("Cannot connect to the analysis server. Please check your connection and try again.")]
    ConnectionFailed,
    #[error("{0}")]
    Analysis(String),
}

pub struct AnalysisSession {
    api: ApiClient,
    status: ApiStatus,
    resume: Option<ResumeFile>,
    job_description: String,
    loading: bool,
    result: Option<AnalysisResult>,
    banner: Option<ErrorBanner>,
}

impl AnalysisSession {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            status: ApiStatus::Checking,
            resume: None,
            job_description: String::new(),
            loading: false,
            result: None,
            banner: None,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(ApiClient::from_config(config)?))
    }

    pub fn api_status(&self) -> ApiStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn resume(&self) -> Option<&ResumeFile> {
        self.resume.as_ref()
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Re-probe the health endpoint. Also the manual retry path after a
    /// connection loss: the status passes through Checking either way.
    pub async fn refresh_health(&mut self) -> ApiStatus {
        self.status = ApiStatus::Checking;

        self.status = match self.api.check_health().await {
            Ok(()) => {
                info!("Analysis service is reachable");
                ApiStatus::Connected
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                ApiStatus::Error
            }
        };

        self.status
    }

    /// Validate a resume candidate and store it on success. Both intake
    /// paths end up here. A stored resume is only replaced by a valid one.
    pub async fn accept_file(&mut self, path: &Path) -> Result<(), ResumeValidationError> {
        match ResumeValidator::load_resume(path).await {
            Ok(resume) => {
                info!(
                    "Accepted resume: {} ({} bytes)",
                    resume.file_name,
                    resume.size()
                );
                self.resume = Some(resume);
                self.banner = None;
                Ok(())
            }
            Err(e) => {
                error!("Resume validation failed: {}", e.message);
                self.raise_error(e.message.clone());
                Err(e)
            }
        }
    }

    /// Stored untrimmed; trimming happens in the submit preconditions
    pub fn set_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    /// Live character count shown while the description is being typed
    pub fn description_chars(&self) -> usize {
        self.job_description.chars().count()
    }

    /// Mirror of the submit preconditions, for disabling the submit control
    pub fn can_submit(&self) -> bool {
        !self.loading
            && self.resume.is_some()
            && self.job_description.trim().chars().count() >= MIN_DESCRIPTION_CHARS
            && self.status != ApiStatus::Error
    }

    /// Run the precondition checks and, if all pass, submit to the service.
    ///
    /// Check order is fixed: in-flight guard, resume, description presence,
    /// description length, service reachability. The first failure raises
    /// the banner and aborts before any request is made. A transport-level
    /// failure flips the status to Error; a failure the server reported
    /// leaves it unchanged.
    pub async fn submit(&mut self) -> Result<&AnalysisResult, SubmitError> {
        if self.loading {
            return Err(self.reject(SubmitError::AlreadyRunning));
        }

        let resume = match self.resume.clone() {
            Some(resume) => resume,
            None => return Err(self.reject(SubmitError::MissingResume)),
        };

        let trimmed = self.job_description.trim();
        if trimmed.is_empty() {
            return Err(self.reject(SubmitError::EmptyDescription));
        }
        if trimmed.chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(self.reject(SubmitError::DescriptionTooShort));
        }

        if self.status == ApiStatus::Error {
            return Err(self.reject(SubmitError::ServerUnavailable));
        }

        self.loading = true;
        self.result = None;
        self.banner = None;

        let outcome = self.api.analyze(&resume, &self.job_description).await;
        self.loading = false;

        match outcome {
            Ok(response) => Ok(self.store_result(response)),
            Err(ApiError::Unreachable(detail)) => {
                error!("Analysis request could not reach the server: {}", detail);
                self.status = ApiStatus::Error;
                Err(self.reject(SubmitError::ConnectionFailed))
            }
            Err(ApiError::Server(message)) | Err(ApiError::Request(message)) => {
                error!("Analysis failed: {}", message);
                Err(self.reject(SubmitError::Analysis(message)))
            }
        }
    }

    /// The server's score wins when it is present and within range; 0 is a
    /// legitimate score. Anything else falls back to text extraction.
    fn store_result(&mut self, response: AnalyzeResponse) -> &AnalysisResult {
        let raw = response.result.unwrap_or_default();

        let match_score = match response.match_score {
            Some(score) if (0..=100).contains(&score) => score as u8,
            _ => extract_match_score(&raw),
        };

        let result = AnalysisResult {
            match_score,
            analysis: parse_analysis_sections(&raw),
            raw_analysis: raw,
            analyzed_at: response.analyzed_at.unwrap_or_else(Utc::now),
        };

        info!("Analysis stored with match score {}", result.match_score);
        self.result.insert(result)
    }

    fn reject(&mut self, err: SubmitError) -> SubmitError {
        self.raise_error(err.to_string());
        err
    }

    fn raise_error(&mut self, message: String) {
        warn!("Session error: {}", message);
        self.banner = Some(ErrorBanner {
            message,
            raised_at: Utc::now(),
        });
    }

    /// The banner message if one is active at `at`, None once expired
    pub fn active_error(&self, at: DateTime<Utc>) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|banner| banner.is_active(at))
            .map(|banner| banner.message.as_str())
    }

    pub fn clear_error(&mut self) {
        self.banner = None;
    }

    /// Back to a blank form. The observed service status survives a reset.
    pub fn reset(&mut self) {
        self.resume = None;
        self.job_description.clear();
        self.result = None;
        self.banner = None;
        self.loading = false;
    }
}
