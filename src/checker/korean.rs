use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::checker::excerpt;
use crate::{Language, TypoFinding};

/// Wrong phrases that keep turning up on Korean packaging artwork, with
/// their corrections. Matched literally; one finding per pattern no matter
/// how often it occurs.
const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("위하사", "위하여"),
    ("비타민C", "비타민 C"),
    ("유통기안", "유통기한"),
    ("섭취방범", "섭취방법"),
    ("보관하십시요", "보관하십시오"),
    ("어린이 손이 닫지", "어린이 손이 닿지"),
];

lazy_static! {
    static ref BUILTIN: PatternTable =
        PatternTable::new(
            BUILTIN_PATTERNS
                .iter()
                .map(|(wrong, right)| (wrong.to_string(), right.to_string()))
                .collect(),
        )
        .expect("builtin pattern table");
}

/// Curated wrong-phrase table compiled into a multi-pattern matcher.
#[derive(Debug, Clone)]
pub struct PatternTable {
    entries: Vec<(String, String)>,
    machine: AhoCorasick,
}

impl PatternTable {
    pub fn new(entries: Vec<(String, String)>) -> Result<Self> {
        let machine = AhoCorasick::new(entries.iter().map(|(wrong, _)| wrong.as_str()))
            .context("Failed to compile pattern table")?;
        Ok(Self { entries, machine })
    }

    pub fn builtin() -> PatternTable {
        BUILTIN.clone()
    }

    /// One finding per distinct pattern present in the text, table order.
    fn scan(&self, text: &str) -> Vec<TypoFinding> {
        let mut matched: HashSet<usize> = HashSet::new();
        for hit in self.machine.find_iter(text) {
            matched.insert(hit.pattern().as_usize());
        }

        self.entries
            .iter()
            .enumerate()
            .filter(|(idx, _)| matched.contains(idx))
            .map(|(_, (wrong, right))| TypoFinding {
                language: Language::Ko,
                surface: wrong.clone(),
                suggestion: Some(right.clone()),
                location_hint: excerpt(text, wrong),
            })
            .collect()
    }
}

/// A token the external spelling/grammar service flagged as suspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedToken {
    pub token: String,
    #[serde(default)]
    pub suggestion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceResponse {
    flagged: Vec<FlaggedToken>,
}

/// External Korean spelling/grammar capability.
///
/// Kept behind a trait so tests stub it and deployments can swap the
/// remote service for a local implementation.
pub trait KoreanChecker: Send + Sync {
    fn check(&self, text: &str) -> Result<Vec<FlaggedToken>>;
}

/// HTTP client for a Korean spelling/grammar service.
///
/// Protocol: POST `{"text": "..."}`; response
/// `{"flagged": [{"token": "...", "suggestion": "..."}]}`. The request
/// carries a client-level timeout so a slow or unreachable service can
/// never stall the invocation; the caller degrades to the pattern pass.
pub struct RemoteKoreanChecker {
    client: reqwest::blocking::Client,
    url: String,
}

impl RemoteKoreanChecker {
    pub fn new(url: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, url })
    }
}

impl KoreanChecker for RemoteKoreanChecker {
    fn check(&self, text: &str) -> Result<Vec<FlaggedToken>> {
        let payload = serde_json::json!({ "text": text }).to_string();

        let response = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .body(payload)
            .send()
            .context("Korean spelling service request failed")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Korean spelling service returned HTTP {}",
                response.status()
            );
        }

        let body = response
            .text()
            .context("Failed to read Korean spelling service response")?;
        let parsed: ServiceResponse =
            serde_json::from_str(&body).context("Failed to parse Korean spelling service JSON")?;

        Ok(parsed.flagged)
    }
}

/// Fixed-pattern pass plus (when a backend is configured) the
/// dictionary/grammar-service pass, unioned.
///
/// The service pass is strictly additive: its failure is logged and the
/// pattern findings stand on their own.
pub fn detect(
    text: &str,
    patterns: &PatternTable,
    service: Option<&dyn KoreanChecker>,
) -> Vec<TypoFinding> {
    let mut findings = patterns.scan(text);
    let mut seen: HashSet<String> = findings.iter().map(|f| f.surface.clone()).collect();

    let Some(service) = service else {
        return findings;
    };

    let korean = hangul_text(text);
    if korean.is_empty() {
        return findings;
    }

    match service.check(&korean) {
        Ok(flags) => {
            for flag in flags {
                if seen.insert(flag.token.clone()) {
                    findings.push(TypoFinding {
                        language: Language::Ko,
                        location_hint: excerpt(text, &flag.token),
                        surface: flag.token,
                        suggestion: flag.suggestion,
                    });
                }
            }
        }
        Err(e) => {
            eprintln!("Warning: Korean spelling service unavailable, using pattern pass only: {e}");
        }
    }

    findings
}

/// Normalized Korean-only text: maximal runs of Hangul syllables with the
/// whitespace between them; punctuation and non-Korean text are discarded.
pub fn hangul_text(text: &str) -> String {
    let kept: String = text
        .chars()
        .map(|c| if is_hangul_syllable(c) || c.is_whitespace() { c } else { ' ' })
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubChecker(Vec<FlaggedToken>);

    impl KoreanChecker for StubChecker {
        fn check(&self, _text: &str) -> Result<Vec<FlaggedToken>> {
            Ok(self.0.clone())
        }
    }

    struct DownChecker;

    impl KoreanChecker for DownChecker {
        fn check(&self, _text: &str) -> Result<Vec<FlaggedToken>> {
            anyhow::bail!("connection refused")
        }
    }

    #[test]
    fn test_pattern_reported_once_regardless_of_occurrences() {
        let text = "건강을 위하사 매일 위하사 드세요 위하사";
        let findings = detect(text, &PatternTable::builtin(), None);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].surface, "위하사");
        assert_eq!(findings[0].suggestion.as_deref(), Some("위하여"));
        assert_eq!(findings[0].language, Language::Ko);
    }

    #[test]
    fn test_patterns_reported_in_table_order() {
        let text = "유통기안 표기와 비타민C 함량을 확인하세요";
        let findings = detect(text, &PatternTable::builtin(), None);

        let surfaces: Vec<_> = findings.iter().map(|f| f.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["비타민C", "유통기안"]);
    }

    #[test]
    fn test_hangul_normalization_discards_non_korean() {
        let text = "Vitamn C 500mg 위하사 섭취하세요.";
        assert_eq!(hangul_text(text), "위하사 섭취하세요");
    }

    #[test]
    fn test_service_findings_union_with_pattern_pass() {
        let stub = StubChecker(vec![
            FlaggedToken {
                token: "위하사".to_string(), // already found by the pattern pass
                suggestion: Some("위해서".to_string()),
            },
            FlaggedToken {
                token: "섭치".to_string(),
                suggestion: Some("섭취".to_string()),
            },
        ]);

        let text = "위하사 섭치하세요";
        let findings = detect(text, &PatternTable::builtin(), Some(&stub));

        assert_eq!(findings.len(), 2);
        // Pattern pass wins the duplicate surface form
        assert_eq!(findings[0].surface, "위하사");
        assert_eq!(findings[0].suggestion.as_deref(), Some("위하여"));
        assert_eq!(findings[1].surface, "섭치");
        assert_eq!(findings[1].suggestion.as_deref(), Some("섭취"));
    }

    #[test]
    fn test_service_outage_degrades_to_pattern_pass() {
        let text = "건강을 위하사 드세요";
        let findings = detect(text, &PatternTable::builtin(), Some(&DownChecker));

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].surface, "위하사");
    }

    #[test]
    fn test_no_korean_text_skips_service() {
        struct PanicChecker;
        impl KoreanChecker for PanicChecker {
            fn check(&self, _text: &str) -> Result<Vec<FlaggedToken>> {
                panic!("service must not be called for Korean-free text");
            }
        }

        let findings = detect("English only label text", &PatternTable::builtin(), Some(&PanicChecker));
        assert!(findings.is_empty());
    }
}
