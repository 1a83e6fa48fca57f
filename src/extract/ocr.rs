use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

use super::OcrEngine;
use crate::config::LangProfile;

/// Optical character recognition through the `tesseract` binary.
///
/// Recognition quality is taken as-is: there is no retry at a different
/// resolution and no confidence check, so a poor scan propagates garbled
/// text into the typo detectors.
pub struct TesseractOcr {
    extra_args: Vec<String>,
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self {
            extra_args: Vec::new(),
        }
    }

    /// Extra tesseract flags, e.g. `--psm` overrides for unusual layouts.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &Path, profile: LangProfile) -> Result<String> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(profile.tesseract_code())
            .args(&self.extra_args)
            .output()
            .with_context(|| "failed to invoke tesseract; is it installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("tesseract failed on {}: {stderr}", image.display());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
