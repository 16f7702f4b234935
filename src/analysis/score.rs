// src/analysis/score.rs
//! Match score extraction from free-form analysis text
//!
//! The analysis service embeds the score in prose rather than a dedicated
//! field, and the phrasing drifts between model versions. Extraction runs a
//! fixed ladder of patterns from most to least specific and falls back to
//! sentiment keywords when no usable percentage appears. The ladder order is
//! load-bearing: a later pattern must never steal a match from an earlier one.

use once_cell::sync::Lazy;
use regex::Regex;

// Pre-compiled patterns, one per ladder rung
static RE_MATCH_PERCENTAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)match\s+percentage:?\s*(\d{1,3})\s*%").unwrap());
static RE_PERCENT_THEN_MATCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)(\d{1,3})\s*%.*?\bmatch\b").unwrap());
static RE_SCORE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)score:?\s*(\d{1,3})\s*%").unwrap());
static RE_ANY_PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,3})\s*%").unwrap());

/// Derive a 0-100 match score from analysis text.
///
/// Tried in order: an explicit "Match Percentage: NN%", a percentage later
/// qualified by the word "match", a labelled "score: NN%", then any bare
/// percentage. Out-of-range numbers fall through to the next candidate.
/// Without a usable percentage, sentiment keywords decide the bucket.
pub fn extract_match_score(text: &str) -> u8 {
    let patterns = [
        &*RE_MATCH_PERCENTAGE,
        &*RE_PERCENT_THEN_MATCH,
        &*RE_SCORE_LABEL,
        &*RE_ANY_PERCENT,
    ];

    for pattern in patterns {
        if let Some(score) = first_valid_percentage(pattern, text) {
            return score;
        }
    }

    keyword_score(text)
}

/// First capture of `pattern` in `text` that parses to a value within 0-100.
fn first_valid_percentage(pattern: &Regex, text: &str) -> Option<u8> {
    for caps in pattern.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            if let Ok(value) = m.as_str().parse::<u16>() {
                if value <= 100 {
                    return Some(value as u8);
                }
            }
        }
    }
    None
}

/// Sentiment bucket for analyses that never state a percentage.
fn keyword_score(text: &str) -> u8 {
    let lower = text.to_lowercase();

    if lower.contains("excellent") || lower.contains("strong match") {
        85
    } else if lower.contains("good") || lower.contains("suitable") {
        75
    } else if lower.contains("fair") || lower.contains("potential") {
        65
    } else {
        60
    }
}
