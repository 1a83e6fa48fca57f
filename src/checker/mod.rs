pub mod dictionary;
pub mod english;
pub mod korean;
pub mod suggestions;

use anyhow::Result;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::Config;
use crate::Report;
use dictionary::Dictionary;
use korean::{KoreanChecker, PatternTable, RemoteKoreanChecker};

/// The bilingual typo-detection engine.
///
/// Both language passes read the same immutable text and are independent,
/// so they run concurrently; a failure inside the Korean service pass is
/// contained there and never reaches the English pass (or vice versa).
pub struct TypoChecker {
    dictionary: Dictionary,
    patterns: PatternTable,
    korean_backend: Option<Box<dyn KoreanChecker>>,
    ignore_patterns: Vec<Regex>,
    max_edit_distance: usize,
}

impl TypoChecker {
    pub fn new(config: &Config) -> Result<Self> {
        let dictionary = Dictionary::load(&config.language)?;

        let korean_backend: Option<Box<dyn KoreanChecker>> = match &config.korean_service_url {
            Some(url) => Some(Box::new(RemoteKoreanChecker::new(
                url.clone(),
                config.korean_service_timeout_secs,
            )?)),
            None => None,
        };

        let mut ignore_patterns = Vec::new();
        for pattern in &config.ignore_patterns {
            match Regex::new(pattern) {
                Ok(re) => ignore_patterns.push(re),
                Err(e) => eprintln!("Warning: Invalid regex pattern '{}': {}", pattern, e),
            }
        }

        Ok(Self {
            dictionary,
            patterns: PatternTable::builtin(),
            korean_backend,
            ignore_patterns,
            max_edit_distance: config.max_edit_distance,
        })
    }

    /// Assemble a checker from explicit parts, bypassing config and the
    /// on-disk dictionary. Used by tests and embedders.
    pub fn with_parts(
        dictionary: Dictionary,
        patterns: PatternTable,
        korean_backend: Option<Box<dyn KoreanChecker>>,
    ) -> Self {
        Self {
            dictionary,
            patterns,
            korean_backend,
            ignore_patterns: Vec::new(),
            max_edit_distance: 2,
        }
    }

    /// Run both language passes over the extracted text and merge their
    /// findings into one report.
    pub fn check(&self, text: &str) -> Report {
        let (english, korean) = rayon::join(
            || {
                english::detect(
                    text,
                    &self.dictionary,
                    &self.ignore_patterns,
                    self.max_edit_distance,
                )
            },
            || korean::detect(text, &self.patterns, self.korean_backend.as_deref()),
        );

        Report::assemble(english, korean)
    }
}

/// Grapheme-safe excerpt of `text` around the first occurrence of
/// `needle`; byte slicing would split Hangul syllables.
pub(crate) fn excerpt(text: &str, needle: &str) -> Option<String> {
    const WINDOW: usize = 12;

    let start = text.find(needle)?;
    let before: Vec<&str> = text[..start].graphemes(true).collect();
    let after: Vec<&str> = text[start + needle.len()..].graphemes(true).collect();

    let mut hint = String::new();
    let from = before.len().saturating_sub(WINDOW);
    if from > 0 {
        hint.push('…');
    }
    for g in &before[from..] {
        hint.push_str(g);
    }
    hint.push_str(needle);
    for g in after.iter().take(WINDOW) {
        hint.push_str(g);
    }
    if after.len() > WINDOW {
        hint.push('…');
    }

    Some(hint)
}
