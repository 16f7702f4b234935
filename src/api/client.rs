// src/api/client.rs
//! HTTP client for the resume analysis service

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use tracing::{info, warn};

use super::{AnalyzeResponse, ApiError};
use crate::config::Config;
use crate::pdf_validator::ResumeFile;

const HEALTH_ENDPOINT: &str = "/api/health";
const ANALYZE_ENDPOINT: &str = "/api/analyze";

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with a request timeout
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_url.clone(), config.timeout_seconds)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe GET /api/health. Any success status counts as reachable; the
    /// body carries no contract and is ignored.
    pub async fn check_health(&self) -> Result<(), ApiError> {
        let url = format!("{}{}", self.base_url, HEALTH_ENDPOINT);
        info!("Checking analysis service health: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Server(format!(
                "Health endpoint returned {}",
                status
            )))
        }
    }

    /// Submit resume and job description as multipart form data.
    ///
    /// Returns Ok only for a 2xx response whose body reports success. A
    /// non-2xx status or `success: false` surfaces the server's error string
    /// when one is present.
    pub async fn analyze(
        &self,
        resume: &ResumeFile,
        job_description: &str,
    ) -> Result<AnalyzeResponse, ApiError> {
        let url = format!("{}{}", self.base_url, ANALYZE_ENDPOINT);

        let resume_part = Part::bytes(resume.bytes.clone())
            .file_name(resume.file_name.clone())
            .mime_str(resume.content_type())
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let form = Form::new()
            .part("resume", resume_part)
            .text("jobDescription", job_description.to_string());

        info!(
            "Submitting analysis request: {} ({} bytes)",
            resume.file_name,
            resume.size()
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Unreachable(e.to_string()))?;

        if status.is_success() {
            match serde_json::from_str::<AnalyzeResponse>(&body) {
                Ok(parsed) if parsed.success => {
                    info!("Analysis service returned a successful result");
                    Ok(parsed)
                }
                Ok(parsed) => Err(ApiError::Server(parsed.error.unwrap_or_else(|| {
                    "Analysis failed. Please try again.".to_string()
                }))),
                Err(e) => {
                    warn!("Unparseable analysis response body: {}", e);
                    Err(ApiError::Server(
                        "Analysis service returned an unreadable response".to_string(),
                    ))
                }
            }
        } else {
            let message = serde_json::from_str::<AnalyzeResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .unwrap_or_else(|| format!("Analysis service returned {}: {}", status, body));
            Err(ApiError::Server(message))
        }
    }
}
