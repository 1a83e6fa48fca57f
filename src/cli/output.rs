use colored::*;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::LangProfile;
use crate::extract::ExtractionMode;
use crate::pipeline::Analysis;
use crate::{Language, TypoFinding};

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    file: String,
    mode: ExtractionMode,
    extracted_chars: usize,
    total_findings: usize,
    findings: &'a [TypoFinding],
    text: &'a str,
}

pub fn print_analysis(
    file_path: &Path,
    analysis: &Analysis,
    profile: LangProfile,
    colored_output: bool,
    format: &OutputFormat,
) {
    match format {
        OutputFormat::Text => print_text_analysis(file_path, analysis, profile, colored_output),
        OutputFormat::Json => print_json_analysis(file_path, analysis),
    }
}

fn print_text_analysis(
    file_path: &Path,
    analysis: &Analysis,
    profile: LangProfile,
    colored_output: bool,
) {
    let file_name = file_path.display().to_string();

    if colored_output {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    // Extraction-mode disclosure, so nobody trusts OCR output blindly
    match analysis.mode {
        ExtractionMode::Direct => {
            if colored_output {
                println!("  {}", "embedded text layer read directly".dimmed());
            } else {
                println!("  embedded text layer read directly");
            }
        }
        ExtractionMode::Ocr => {
            let note = format!("no reliable text layer, OCR used ({})", profile);
            if colored_output {
                println!("  {}", note.yellow());
            } else {
                println!("  {}", note);
            }
        }
    }

    for language in [Language::En, Language::Ko] {
        let group: Vec<&TypoFinding> = analysis.report.for_language(language).collect();
        if group.is_empty() {
            continue;
        }

        let header = match language {
            Language::En => "English",
            Language::Ko => "Korean",
        };
        if colored_output {
            println!("\n  {}", header.cyan().bold());
        } else {
            println!("\n  {}", header);
        }

        for finding in group {
            let suggestion = finding.suggestion.as_deref().unwrap_or("(no suggestion)");
            if colored_output {
                println!(
                    "    {} {} {}",
                    finding.surface.red().bold(),
                    "→".dimmed(),
                    suggestion.green()
                );
            } else {
                println!("    {} → {}", finding.surface, suggestion);
            }
            if let Some(hint) = &finding.location_hint {
                if colored_output {
                    println!("      {}", hint.dimmed());
                } else {
                    println!("      {}", hint);
                }
            }
        }
    }
}

fn print_json_analysis(file_path: &Path, analysis: &Analysis) {
    let output = JsonOutput {
        file: file_path.display().to_string(),
        mode: analysis.mode,
        extracted_chars: analysis.text.chars().count(),
        total_findings: analysis.report.len(),
        findings: &analysis.report.findings,
        text: &analysis.text,
    };

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

pub fn print_summary(total_findings: usize, colored: bool) {
    println!();
    if total_findings == 0 {
        if colored {
            println!("{}", "✓ No typo candidates found!".green().bold());
        } else {
            println!("✓ No typo candidates found!");
        }
    } else {
        let noun = if total_findings == 1 {
            "typo candidate"
        } else {
            "typo candidates"
        };
        if colored {
            println!(
                "{} {} {} flagged for review",
                "✗".red().bold(),
                total_findings.to_string().red().bold(),
                noun
            );
        } else {
            println!("✗ {} {} flagged for review", total_findings, noun);
        }
    }
}
