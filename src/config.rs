use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// OCR recognition profile, matching the tesseract language codes the
/// rasterized pages are recognized with. Only the OCR fallback reads this;
/// both typo detectors always run regardless of the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LangProfile {
    #[serde(rename = "kor")]
    Korean,
    #[serde(rename = "eng")]
    English,
    #[serde(rename = "kor+eng")]
    KoreanEnglish,
}

impl LangProfile {
    pub fn tesseract_code(&self) -> &'static str {
        match self {
            LangProfile::Korean => "kor",
            LangProfile::English => "eng",
            LangProfile::KoreanEnglish => "kor+eng",
        }
    }
}

impl FromStr for LangProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kor" | "korean" => Ok(LangProfile::Korean),
            "eng" | "english" => Ok(LangProfile::English),
            "kor+eng" | "eng+kor" | "both" => Ok(LangProfile::KoreanEnglish),
            _ => Err(format!("Unknown language profile: {}", s)),
        }
    }
}

impl fmt::Display for LangProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tesseract_code())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Dictionary language for the English pass (e.g. en_US).
    pub language: String,

    /// OCR recognition profile for the fallback engine.
    #[serde(default = "default_lang_profile")]
    pub lang_profile: LangProfile,

    /// Rasterization resolution for the OCR fallback.
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Minimum trimmed character count for the direct text layer to be
    /// trusted; anything shorter falls back to OCR.
    #[serde(default = "default_direct_text_threshold")]
    pub direct_text_threshold: usize,

    /// Remote Korean spelling/grammar service endpoint. `None` degrades the
    /// Korean pass to the fixed-pattern table only.
    #[serde(default)]
    pub korean_service_url: Option<String>,

    /// Bound on the remote service call, in seconds.
    #[serde(default = "default_korean_service_timeout")]
    pub korean_service_timeout_secs: u64,

    /// Maximum edit distance accepted for a best-guess correction.
    #[serde(default = "default_max_edit_distance")]
    pub max_edit_distance: usize,

    /// Regex patterns for tokens the English pass should never flag
    /// (product codes, lot numbers, URLs).
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_lang_profile() -> LangProfile {
    LangProfile::KoreanEnglish
}

fn default_dpi() -> u32 {
    300
}

fn default_direct_text_threshold() -> usize {
    50
}

fn default_korean_service_timeout() -> u64 {
    5
}

fn default_max_edit_distance() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en_US".to_string(),
            lang_profile: default_lang_profile(),
            dpi: default_dpi(),
            direct_text_threshold: default_direct_text_threshold(),
            korean_service_url: None,
            korean_service_timeout_secs: default_korean_service_timeout(),
            max_edit_distance: default_max_edit_distance(),
            ignore_patterns: vec![
                r"\b[A-Z0-9_]{4,}\b".to_string(), // lot/product codes
                r"https?://\S+".to_string(),      // URLs
            ],
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(lang_profile: Option<LangProfile>, service_url: Option<String>) -> Result<Self> {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        // Load local config (overrides global)
        let local_path = PathBuf::from(".artcheck.toml");
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        // Apply CLI overrides
        if let Some(profile) = lang_profile {
            config.lang_profile = profile;
        }
        if let Some(url) = service_url {
            config.korean_service_url = Some(url);
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        if other.language != "en_US" {
            self.language = other.language;
        }
        if other.lang_profile != default_lang_profile() {
            self.lang_profile = other.lang_profile;
        }
        if other.dpi != default_dpi() {
            self.dpi = other.dpi;
        }
        if other.direct_text_threshold != default_direct_text_threshold() {
            self.direct_text_threshold = other.direct_text_threshold;
        }
        if other.korean_service_url.is_some() {
            self.korean_service_url = other.korean_service_url;
        }
        if other.korean_service_timeout_secs != default_korean_service_timeout() {
            self.korean_service_timeout_secs = other.korean_service_timeout_secs;
        }
        if other.max_edit_distance != default_max_edit_distance() {
            self.max_edit_distance = other.max_edit_distance;
        }
        if !other.ignore_patterns.is_empty() {
            self.ignore_patterns = other.ignore_patterns;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "artcheck").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "artcheck").map(|dirs| dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.language, "en_US");
        assert_eq!(config.lang_profile, LangProfile::KoreanEnglish);
        assert_eq!(config.dpi, 300);
        assert_eq!(config.direct_text_threshold, 50);
        assert!(config.korean_service_url.is_none());
    }

    #[test]
    fn test_lang_profile_from_str() {
        assert_eq!("kor".parse::<LangProfile>().unwrap(), LangProfile::Korean);
        assert_eq!("eng".parse::<LangProfile>().unwrap(), LangProfile::English);
        assert_eq!(
            "kor+eng".parse::<LangProfile>().unwrap(),
            LangProfile::KoreanEnglish
        );
        assert!("fra".parse::<LangProfile>().is_err());
    }

    #[test]
    fn test_merge_configs() {
        let base = Config::default();
        let override_config = Config {
            lang_profile: LangProfile::Korean,
            dpi: 150,
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.lang_profile, LangProfile::Korean);
        assert_eq!(merged.dpi, 150);
        assert_eq!(merged.direct_text_threshold, 50);
    }
}
