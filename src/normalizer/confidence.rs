use anyhow::Result;
use regex::{NoExpand, Regex};
use std::sync::OnceLock;
use tracing::debug;

use crate::normalizer::TextNormalizer;

/// Heading every confidence mention is rewritten to.
pub const CANONICAL_HEADING: &str = "**Confidence:**";

// Value token shared by all mention patterns: optional sign, optional
// `digits.` prefix, then a word. Whitespace after the colon never crosses a
// line break so a bare heading does not swallow the next line.
const VALUE: &str = r"[ \t]*(?P<value>[+-]?(?:\d*\.)?\w+)(?P<pct>%)?";

/// Rewrites confidence-score mentions in model output to
/// `**Confidence:** {n}%` with `n` in `0..=100`.
pub struct ConfidenceNormalizer {
    /// Tried in order: bolded heading, plain label, score variant.
    mention_patterns: [Regex; 3],
    heading_regex: Regex,
    numeric_regex: Regex,
}

struct Rewrite {
    start: usize,
    end: usize,
    replacement: String,
}

impl ConfidenceNormalizer {
    pub fn new() -> Result<Self> {
        let bolded = Regex::new(&format!(
            r"(?i)\*\*confidence(?:\s+score)?(?::\*\*|\*\*:){VALUE}"
        ))?;
        let plain = Regex::new(&format!(r"(?i)\bconfidence:{VALUE}"))?;
        let score = Regex::new(&format!(r"(?i)\bconfidence\s+score:{VALUE}"))?;

        // Bolded spellings come first so an existing bold heading is consumed
        // whole instead of its inner `Confidence:` being wrapped again.
        let heading_regex = Regex::new(
            r"(?i)\*\*confidence(?:\s+score)?(?::\*\*|\*\*:)|\bconfidence(?:\s+score)?:",
        )?;
        let numeric_regex = Regex::new(r"^[+-]?\d*\.?\d+$")?;

        Ok(Self {
            mention_patterns: [bolded, plain, score],
            heading_regex,
            numeric_regex,
        })
    }

    /// Maps a captured value token to a clamped integer percentage.
    ///
    /// Returns `None` when the token is not a number, in which case the
    /// mention keeps its original text.
    fn score_percent(&self, token: &str) -> Option<i64> {
        if !self.numeric_regex.is_match(token) {
            return None;
        }
        let value: f64 = token.parse().ok()?;

        // Decimals up to 1.0 are fractions; everything else is already a percentage.
        let percent = if token.contains('.') && value <= 1.0 {
            value * 100.0
        } else {
            value
        };

        Some((percent as i64).clamp(0, 100))
    }

    fn collect_rewrites(&self, text: &str) -> Vec<Rewrite> {
        let mut rewrites: Vec<Rewrite> = Vec::new();

        for pattern in &self.mention_patterns {
            for caps in pattern.captures_iter(text) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let (start, end) = (whole.start(), whole.end());
                if rewrites.iter().any(|r| start < r.end && r.start < end) {
                    continue;
                }

                let token = caps.name("value").map_or("", |m| m.as_str());
                let replacement = match self.score_percent(token) {
                    Some(percent) => format!("{CANONICAL_HEADING} {percent}%"),
                    None if caps.name("pct").is_some() => whole.as_str().to_string(),
                    None => format!("{}%", whole.as_str()),
                };

                rewrites.push(Rewrite {
                    start,
                    end,
                    replacement,
                });
            }
        }

        rewrites.sort_by_key(|r| r.start);
        rewrites
    }
}

impl TextNormalizer for ConfidenceNormalizer {
    fn normalize(&self, raw_output: &str) -> String {
        let rewrites = self.collect_rewrites(raw_output);

        let mut rebuilt = String::with_capacity(raw_output.len() + rewrites.len() * 4);
        let mut cursor = 0;
        for rewrite in &rewrites {
            rebuilt.push_str(&raw_output[cursor..rewrite.start]);
            rebuilt.push_str(&rewrite.replacement);
            cursor = rewrite.end;
        }
        rebuilt.push_str(&raw_output[cursor..]);

        let result = self
            .heading_regex
            .replace_all(&rebuilt, NoExpand(CANONICAL_HEADING))
            .into_owned();

        debug!(
            "Normalized {} confidence mention(s) in {} chars",
            rewrites.len(),
            raw_output.len()
        );

        result
    }

    fn name(&self) -> &'static str {
        "ConfidenceNormalizer"
    }
}

/// Normalize confidence mentions with a lazily built shared normalizer.
pub fn normalize_confidence(text: &str) -> String {
    static NORMALIZER: OnceLock<Option<ConfidenceNormalizer>> = OnceLock::new();

    match NORMALIZER.get_or_init(|| ConfidenceNormalizer::new().ok()) {
        Some(normalizer) => normalizer.normalize(text),
        None => text.to_string(),
    }
}
