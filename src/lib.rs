pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod extract;
pub mod pipeline;

pub use checker::TypoChecker;
pub use config::Config;
pub use extract::ExtractionMode;
pub use pipeline::{Analysis, Pipeline};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ko,
}

/// One candidate spelling/typo error with a suggested correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypoFinding {
    pub language: Language,
    pub surface: String,
    /// Best-guess correction; `None` when the dictionary has nothing close.
    pub suggestion: Option<String>,
    /// Short excerpt of the extracted text around the first occurrence.
    pub location_hint: Option<String>,
}

/// The merged findings of one document-processing invocation.
///
/// Findings are grouped by language (English first, then Korean) and keep
/// insertion order within each group. An empty report means "no typos
/// detected"; "detection not yet run" is the absence of a report at the
/// caller, not an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub findings: Vec<TypoFinding>,
}

impl Report {
    pub fn assemble(english: Vec<TypoFinding>, korean: Vec<TypoFinding>) -> Self {
        let mut findings = english;
        findings.extend(korean);
        Self { findings }
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn for_language(&self, language: Language) -> impl Iterator<Item = &TypoFinding> {
        self.findings
            .iter()
            .filter(move |f| f.language == language)
    }
}
