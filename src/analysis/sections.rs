// src/analysis/sections.rs
//! Splits the service's markup-bearing analysis into named sections

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use super::AnalysisSections;

static RE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h[1-6][^>]*>(.*?)</h[1-6]\s*>").unwrap());
static RE_BLOCK_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|ul|ol|h[1-6]|blockquote|tr|table)\s*>").unwrap()
});

/// Split analysis text on h1-h6 headings and assign each block to the section
/// its heading names.
///
/// A heading claims everything up to the next heading or the end of input.
/// The first heading matching a section keyword wins; later ones are ignored.
/// Headings that match nothing are skipped. `overall` always carries the full
/// input verbatim, markup included.
pub fn parse_analysis_sections(text: &str) -> AnalysisSections {
    let mut sections = AnalysisSections {
        overall: text.to_string(),
        ..Default::default()
    };

    let headings: Vec<(usize, usize, String)> = RE_HEADING
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let title = strip_markup(caps.get(1)?.as_str()).to_lowercase();
            Some((whole.start(), whole.end(), title))
        })
        .collect();

    for (idx, (_, body_start, title)) in headings.iter().enumerate() {
        let body_end = headings.get(idx + 1).map(|next| next.0).unwrap_or(text.len());
        let body = strip_markup(&text[*body_start..body_end]);

        // Keyword order decides ownership when a heading names several sections
        let slot = if title.contains("skills") {
            &mut sections.skills
        } else if title.contains("experience") {
            &mut sections.experience
        } else if title.contains("recommendation") {
            &mut sections.recommendations
        } else if title.contains("strength") {
            &mut sections.strengths
        } else if title.contains("weakness") {
            &mut sections.weaknesses
        } else {
            continue;
        };

        if slot.is_empty() {
            *slot = body;
        }
    }

    sections
}

/// Remove markup from text: tags dropped, entities decoded, block-level
/// boundaries turned into line breaks, whitespace collapsed per line.
pub fn strip_markup(text: &str) -> String {
    let with_breaks = RE_BLOCK_BREAK.replace_all(text, "\n");
    let fragment = Html::parse_fragment(&with_breaks);
    let raw: String = fragment.root_element().text().collect();

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
