// src/pdf_validator.rs
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// Upload ceiling enforced before any request is made
pub const MAX_RESUME_BYTES: u64 = 5_242_880;

const PDF_MAGIC: &[u8] = b"%PDF";

/// A resume that passed validation, with its bytes loaded for upload
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn content_type(&self) -> &'static str {
        "application/pdf"
    }
}

#[derive(Debug, Clone)]
pub struct ResumeValidationError {
    pub path: PathBuf,
    pub error_type: ResumeErrorType,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone)]
pub enum ResumeErrorType {
    FileNotFound,
    UnreadableFile,
    EmptyFile,
    NotAPdf,
    CorruptedPdf,
    TooLarge,
}

impl ResumeErrorType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound => "RESUME_NOT_FOUND",
            Self::UnreadableFile => "RESUME_UNREADABLE",
            Self::EmptyFile => "RESUME_EMPTY",
            Self::NotAPdf => "RESUME_NOT_PDF",
            Self::CorruptedPdf => "RESUME_CORRUPTED",
            Self::TooLarge => "RESUME_TOO_LARGE",
        }
    }
}

pub struct ResumeValidator;

impl ResumeValidator {
    /// Validate a resume candidate and load its bytes for upload.
    ///
    /// Checks run in order: existence, readability, emptiness, the size cap,
    /// then the format. A `.pdf` extension must be backed by the `%PDF`
    /// header; a correct header without the extension is accepted as-is.
    pub async fn load_resume(path: &Path) -> Result<ResumeFile, ResumeValidationError> {
        if !path.exists() {
            return Err(ResumeValidationError {
                path: path.to_path_buf(),
                error_type: ResumeErrorType::FileNotFound,
                message: format!("Resume file not found: {}", path.display()),
                suggestion: "Check the path, or drop the file onto the prompt again".to_string(),
            });
        }

        let metadata = fs::metadata(path).await.map_err(|_| ResumeValidationError {
            path: path.to_path_buf(),
            error_type: ResumeErrorType::UnreadableFile,
            message: "Cannot read resume file metadata".to_string(),
            suggestion: "Check file permissions and try again".to_string(),
        })?;

        if metadata.len() == 0 {
            return Err(ResumeValidationError {
                path: path.to_path_buf(),
                error_type: ResumeErrorType::EmptyFile,
                message: "Resume file is empty".to_string(),
                suggestion: "Please upload a valid PDF file".to_string(),
            });
        }

        // Size cap checked on metadata so oversized files are never read in
        if metadata.len() > MAX_RESUME_BYTES {
            return Err(ResumeValidationError {
                path: path.to_path_buf(),
                error_type: ResumeErrorType::TooLarge,
                message: format!(
                    "Resume file too large: {:.1}MB (max 5MB)",
                    metadata.len() as f64 / 1024.0 / 1024.0
                ),
                suggestion: "File size must be under 5MB. Please compress the PDF and try again"
                    .to_string(),
            });
        }

        let bytes = fs::read(path).await.map_err(|e| ResumeValidationError {
            path: path.to_path_buf(),
            error_type: ResumeErrorType::UnreadableFile,
            message: format!("Cannot read resume file: {}", e),
            suggestion: "Check file permissions and try again".to_string(),
        })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume.pdf")
            .to_string();

        let has_pdf_extension = file_name.to_lowercase().ends_with(".pdf");
        let has_pdf_header = bytes.starts_with(PDF_MAGIC);

        if has_pdf_extension && !has_pdf_header {
            return Err(ResumeValidationError {
                path: path.to_path_buf(),
                error_type: ResumeErrorType::CorruptedPdf,
                message: "File has a .pdf extension but is not a valid PDF".to_string(),
                suggestion: "Re-export the resume as PDF and try again".to_string(),
            });
        }

        if !has_pdf_extension {
            if !has_pdf_header {
                return Err(ResumeValidationError {
                    path: path.to_path_buf(),
                    error_type: ResumeErrorType::NotAPdf,
                    message: format!("Unsupported file type: {}", file_name),
                    suggestion: "Only PDF resumes are accepted. Please upload a PDF file"
                        .to_string(),
                });
            }
            warn!(
                "Accepting {} without .pdf extension (PDF header present)",
                file_name
            );
        }

        Ok(ResumeFile {
            path: path.to_path_buf(),
            file_name,
            bytes,
        })
    }
}
