// src/report.rs
//! Score banding, terminal rendering, report export and share links

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::analysis::{strip_markup, AnalysisResult};

/// Presentation tier for a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Strong,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        if score >= 90 {
            Self::Excellent
        } else if score >= 80 {
            Self::Strong
        } else if score >= 70 {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent Match",
            Self::Strong => "Strong Match",
            Self::Good => "Good Match",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Excellent => "🎉",
            Self::Strong => "✅",
            Self::Good => "👍",
            Self::NeedsImprovement => "⚠️",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Excellent => "green",
            Self::Strong => "blue",
            Self::Good => "orange",
            Self::NeedsImprovement => "red",
        }
    }
}

/// Print the analysis to the terminal: banded score first, then the named
/// sections, then the full text when no section was recognized.
pub fn render_result(result: &AnalysisResult) {
    let band = ScoreBand::for_score(result.match_score);

    println!();
    println!(
        "{} Match Score: {}% ({})",
        band.icon(),
        result.match_score,
        band.label()
    );
    println!(
        "   Analyzed: {}",
        result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("{}", "-".repeat(60));

    let sections = &result.analysis;
    let named = [
        ("Skills", &sections.skills),
        ("Experience", &sections.experience),
        ("Strengths", &sections.strengths),
        ("Weaknesses", &sections.weaknesses),
        ("Recommendations", &sections.recommendations),
    ];

    let mut printed_any = false;
    for (title, body) in named {
        if !body.is_empty() {
            println!("{}:", title);
            println!("{}", body);
            println!();
            printed_any = true;
        }
    }

    if !printed_any {
        println!("{}", strip_markup(&result.raw_analysis));
        println!();
    }
}

/// Plain-text report with the markup stripped out
pub fn build_report(result: &AnalysisResult) -> String {
    let band = ScoreBand::for_score(result.match_score);

    let mut report = String::new();
    report.push_str("Resume Analysis Report\n");
    report.push_str(&"=".repeat(60));
    report.push('\n');
    report.push_str(&format!(
        "Match Score: {}% ({})\n",
        result.match_score,
        band.label()
    ));
    report.push_str(&format!(
        "Analyzed: {}\n\n",
        result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&strip_markup(&result.raw_analysis));
    report.push('\n');
    report
}

/// Write the report to `resume-analysis-<epoch-millis>.txt` in `dir`
pub async fn export_report(result: &AnalysisResult, dir: &Path) -> Result<PathBuf> {
    let file_name = format!("resume-analysis-{}.txt", Utc::now().timestamp_millis());
    let path = dir.join(file_name);

    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    tokio::fs::write(&path, build_report(result))
        .await
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    Ok(path)
}

/// Share link carrying only the score
pub fn share_url(origin: &str, score: u8) -> String {
    format!("{}?score={}", origin.trim_end_matches('/'), score)
}
