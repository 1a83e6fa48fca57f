use regex::Regex;
use std::collections::HashSet;

use crate::checker::dictionary::Dictionary;
use crate::checker::{excerpt, suggestions};
use crate::{Language, TypoFinding};

/// Dictionary pass over the Latin-letter tokens of the extracted text.
///
/// Pure with respect to its inputs: the same text and dictionary always
/// produce the same findings. Each unknown token type is reported once,
/// first-seen surface form, in order of appearance.
pub fn detect(
    text: &str,
    dictionary: &Dictionary,
    ignore: &[Regex],
    max_distance: usize,
) -> Vec<TypoFinding> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut findings = Vec::new();

    for token in tokenize(text) {
        // Single letters carry no spelling signal
        if token.len() <= 1 {
            continue;
        }

        let lower = token.to_lowercase();
        if !seen.insert(lower.clone()) {
            continue;
        }

        if ignore.iter().any(|re| re.is_match(token)) {
            continue;
        }

        if dictionary.contains(&lower) {
            continue;
        }

        let suggestion = suggestions::best_correction(&lower, dictionary, max_distance)
            .map(|s| match_casing(token, &s));

        findings.push(TypoFinding {
            language: Language::En,
            surface: token.to_string(),
            suggestion,
            location_hint: excerpt(text, token),
        });
    }

    findings
}

/// Maximal runs of ASCII letters; every other character separates tokens.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut start = None;

    for (i, &b) in bytes.iter().enumerate() {
        if b.is_ascii_alphabetic() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            tokens.push(&text[s..i]);
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }

    tokens
}

/// Re-apply the surface form's casing to a lowercase suggestion, so that
/// "Vitamn" suggests "Vitamin" and "MLL" suggests "ML".
fn match_casing(surface: &str, suggestion: &str) -> String {
    if surface.chars().all(|c| c.is_ascii_uppercase()) {
        return suggestion.to_uppercase();
    }
    if surface.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        let mut chars = suggestion.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        };
    }
    suggestion.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn dictionary_of(words: &[&str]) -> Dictionary {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.dict");
        let words: Vec<String> = words.iter().map(|s| s.to_string()).collect();
        Dictionary::build_from_words(&words, &path).unwrap();
        Dictionary::load_from_path(&path).unwrap()
    }

    #[test]
    fn test_tokenize_latin_runs_only() {
        let tokens = tokenize("Vitamn C 500mg 위하사 섭취하세요 take2daily");
        assert_eq!(tokens, vec!["Vitamn", "C", "mg", "take", "daily"]);
    }

    #[test]
    fn test_unknown_token_reported_once_per_type() {
        let dict = dictionary_of(&["vitamin", "mg", "daily"]);
        let text = "Vitamn 500mg Vitamn again Vitamn";
        let findings = detect(text, &dict, &[], 2);

        let vitamn: Vec<_> = findings.iter().filter(|f| f.surface == "Vitamn").collect();
        assert_eq!(vitamn.len(), 1);
        assert_eq!(vitamn[0].suggestion.as_deref(), Some("Vitamin"));
        assert_eq!(vitamn[0].language, Language::En);
    }

    #[test]
    fn test_detection_is_pure() {
        let dict = dictionary_of(&["vitamin", "mg"]);
        let text = "Vitamn C 500mg";
        let first = detect(text, &dict, &[], 2);
        let second = detect(text, &dict, &[], 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_finding_without_correction_still_reported() {
        let dict = dictionary_of(&["vitamin"]);
        let findings = detect("qzxwv", &dict, &[], 2);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].surface, "qzxwv");
        assert!(findings[0].suggestion.is_none());
    }

    #[test]
    fn test_ignore_patterns_suppress_codes() {
        let dict = dictionary_of(&["vitamin"]);
        let ignore = vec![Regex::new(r"^[A-Z]{2,}$").unwrap()];
        let findings = detect("LOTNO vitamin", &dict, &ignore, 2);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_casing_restoration() {
        assert_eq!(match_casing("Vitamn", "vitamin"), "Vitamin");
        assert_eq!(match_casing("MLL", "ml"), "ML");
        assert_eq!(match_casing("vitamn", "vitamin"), "vitamin");
    }
}
