// src/cli.rs
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::analysis::{extract_match_score, parse_analysis_sections, AnalysisResult};
use crate::api::ApiClient;
use crate::config::Config;
use crate::report::{self, ScoreBand};
use crate::session::{AnalysisSession, ApiStatus, SubmitError};

#[derive(Parser)]
#[command(name = "fitcheck")]
#[command(about = "Check how well a resume fits a job description")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a resume against a job description
    Analyze(AnalyzeArgs),
    /// Probe the analysis service and exit non-zero when it is down
    Health,
    /// Re-run score extraction and section parsing over saved analysis text
    Inspect {
        /// File holding analysis text (markup allowed)
        file: PathBuf,
    },
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to the resume PDF (prompted for when omitted)
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Job description text
    #[arg(long)]
    pub job_description: Option<String>,

    /// Read the job description from a file
    #[arg(long, conflicts_with = "job_description")]
    pub job_description_file: Option<PathBuf>,

    /// Write a plain-text report next to the results
    #[arg(long)]
    pub export: bool,

    /// Directory for the exported report (defaults to the configured one)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Print a share link for the score
    #[arg(long)]
    pub share: bool,

    /// Emit the result as JSON instead of the rendered report
    #[arg(long)]
    pub json: bool,

    /// Skip the initial health probe
    #[arg(long)]
    pub skip_health_check: bool,
}

pub async fn handle_command(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Command::Analyze(args) => run_analyze(config, args).await,

        Command::Health => {
            let client = ApiClient::from_config(&config)?;
            println!("🔍 Checking {} ...", client.base_url());
            match client.check_health().await {
                Ok(()) => {
                    println!("✅ Analysis service is up");
                    Ok(())
                }
                Err(e) => {
                    println!("❌ {}", e);
                    anyhow::bail!("health check failed")
                }
            }
        }

        Command::Inspect { file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read analysis file: {}", file.display()))?;

            report::render_result(&reparse_analysis(text));
            Ok(())
        }
    }
}

async fn run_analyze(config: Config, args: AnalyzeArgs) -> Result<()> {
    let mut session = AnalysisSession::from_config(&config)?;

    if !args.skip_health_check {
        print!("🔍 Checking analysis service... ");
        std::io::stdout().flush().context("Failed to flush stdout")?;
        match session.refresh_health().await {
            ApiStatus::Connected => println!("✅ connected"),
            _ => {
                println!("❌ not responding");
                println!("   Submissions are rejected until the server is reachable again.");
            }
        }
    }

    match args.resume {
        Some(path) => {
            if let Err(e) = session.accept_file(&path).await {
                println!("❌ {}", e.message);
                println!("   💡 {}", e.suggestion);
                anyhow::bail!("resume validation failed");
            }
        }
        None => prompt_resume(&mut session).await?,
    }

    let description = if let Some(text) = args.job_description {
        text
    } else if let Some(path) = args.job_description_file {
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read job description: {}", path.display()))?
    } else {
        prompt_job_description().await?
    };
    session.set_description(description);
    println!(
        "📝 Job description: {} characters",
        session.description_chars()
    );

    println!("⏳ Analyzing resume fit...");
    let result = match session.submit().await {
        Ok(result) => result.clone(),
        Err(err) => {
            println!("❌ {}", err);
            if err == SubmitError::ConnectionFailed {
                println!("   Run 'fitcheck health' to re-check the server.");
            }
            anyhow::bail!("analysis failed");
        }
    };

    if args.json {
        let band = ScoreBand::for_score(result.match_score);
        let payload = serde_json::json!({
            "matchScore": result.match_score,
            "band": {
                "label": band.label(),
                "color": band.color(),
            },
            "analysis": &result.analysis,
            "rawAnalysis": &result.raw_analysis,
            "analyzedAt": result.analyzed_at.to_rfc3339(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        report::render_result(&result);
    }

    if args.export {
        let dir = args.output_dir.unwrap_or_else(|| config.export_dir.clone());
        let path = report::export_report(&result, &dir).await?;
        println!("💾 Report saved: {}", path.display());
    }

    if args.share {
        println!(
            "🔗 Share: {}",
            report::share_url(&config.share_origin(), result.match_score)
        );
    }

    Ok(())
}

/// Keep asking until a file passes validation. Terminals paste a dropped
/// file as a (possibly quoted) path, so dropping onto the prompt works.
async fn prompt_resume(session: &mut AnalysisSession) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("Resume PDF (drop the file here or type its path): ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        match lines
            .next_line()
            .await
            .context("Failed to read resume path")?
        {
            Some(line) => {
                let cleaned = trim_dropped_path(&line);
                if cleaned.is_empty() {
                    continue;
                }
                match session.accept_file(Path::new(&cleaned)).await {
                    Ok(()) => return Ok(()),
                    Err(e) => {
                        println!("❌ {}", e.message);
                        println!("   💡 {}", e.suggestion);
                    }
                }
            }
            None => anyhow::bail!("no resume provided"),
        }
    }
}

async fn prompt_job_description() -> Result<String> {
    println!("Paste the job description. Finish with an empty line (or Ctrl-D):");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut collected: Vec<String> = Vec::new();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read job description")?
    {
        if line.trim().is_empty() {
            if collected.is_empty() {
                continue;
            }
            break;
        }
        collected.push(line);
    }

    Ok(collected.join("\n"))
}

/// Rebuild a result from saved analysis text, scored and sectioned the same
/// way a fresh server response would be.
fn reparse_analysis(text: String) -> AnalysisResult {
    AnalysisResult {
        match_score: extract_match_score(&text),
        analysis: parse_analysis_sections(&text),
        raw_analysis: text,
        analyzed_at: Utc::now(),
    }
}

/// Normalize a path pasted by a terminal drag-and-drop: surrounding quotes
/// stripped, backslash-escaped spaces unescaped.
fn trim_dropped_path(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(trimmed);
    unquoted.replace("\\ ", " ")
}
