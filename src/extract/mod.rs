pub mod direct;
pub mod ocr;
pub mod raster;

pub use direct::PdfTextLayer;
pub use ocr::TesseractOcr;
pub use raster::PopplerRasterizer;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{Config, LangProfile};

/// How the extracted text was obtained, for user-visible disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    Direct,
    Ocr,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::Direct => write!(f, "direct"),
            ExtractionMode::Ocr => write!(f, "ocr"),
        }
    }
}

/// The text of a whole document, page blocks joined by newlines.
///
/// When `mode` is `Ocr` the text originates wholly from the OCR pass; any
/// partial direct-extraction fragments are discarded, never merged.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub text: String,
    pub mode: ExtractionMode,
    /// Per-page flag: did the direct pass get any text out of this page?
    pub page_has_text: Vec<bool>,
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Neither the embedded text layer nor the OCR path produced anything.
    /// The only fatal error class of the pipeline.
    #[error("could not process file: {0}")]
    Unprocessable(String),
}

/// Reads the embedded text layer of a document, one string per page.
///
/// Implementations must degrade, not fail: a corrupt or unsupported file
/// yields an empty page list, which routes the document into the OCR path.
pub trait TextLayerReader: Send + Sync {
    fn page_texts(&self, document: &Path) -> Vec<String>;
}

/// Renders one page of a document to a raster image on disk.
pub trait PageRasterizer: Send + Sync {
    fn page_count(&self, document: &Path) -> Result<usize>;
    fn rasterize_page(
        &self,
        document: &Path,
        page_idx: usize,
        dpi: u32,
        out_dir: &Path,
    ) -> Result<PathBuf>;
}

/// Recognizes the text of one rasterized page image.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &Path, profile: LangProfile) -> Result<String>;
}

/// The text extractor with its OCR fallback.
///
/// Extraction is a one-way state machine: the direct attempt either clears
/// the threshold and finishes, or the OCR pass runs once and finishes. No
/// path retries or revisits an earlier state.
pub struct TextExtractor {
    reader: Box<dyn TextLayerReader>,
    rasterizer: Box<dyn PageRasterizer>,
    ocr: Box<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self {
            reader: Box::new(PdfTextLayer),
            rasterizer: Box::new(PopplerRasterizer),
            ocr: Box::new(TesseractOcr::new()),
        }
    }

    /// Swap any backend out, mainly for tests and alternative toolchains.
    pub fn with_backends(
        reader: Box<dyn TextLayerReader>,
        rasterizer: Box<dyn PageRasterizer>,
        ocr: Box<dyn OcrEngine>,
    ) -> Self {
        Self {
            reader,
            rasterizer,
            ocr,
        }
    }

    pub fn extract(&self, document: &Path, config: &Config) -> Result<Extraction, ExtractionError> {
        let pages = self.reader.page_texts(document);
        let page_has_text: Vec<bool> = pages.iter().map(|p| !p.trim().is_empty()).collect();
        let direct_text = direct::join_page_texts(&pages);

        // Threshold is inclusive: exactly `direct_text_threshold` trimmed
        // characters still counts as a reliable text layer.
        if direct_text.trim().chars().count() >= config.direct_text_threshold {
            return Ok(Extraction {
                text: direct_text,
                mode: ExtractionMode::Direct,
                page_has_text,
            });
        }

        let text = self
            .recognize_document(document, config)
            .map_err(|e| ExtractionError::Unprocessable(format!("{}: {:#}", document.display(), e)))?;

        Ok(Extraction {
            text,
            mode: ExtractionMode::Ocr,
            page_has_text,
        })
    }

    fn recognize_document(&self, document: &Path, config: &Config) -> Result<String> {
        let scratch = tempfile::tempdir().context("Failed to create rasterization scratch dir")?;
        let page_count = self.rasterizer.page_count(document)?;
        if page_count == 0 {
            anyhow::bail!("document has no pages");
        }

        // Pages are independent; rasterize and recognize them in parallel,
        // reassembling in page order.
        let blocks = (0..page_count)
            .into_par_iter()
            .map(|page_idx| {
                let image =
                    self.rasterizer
                        .rasterize_page(document, page_idx, config.dpi, scratch.path())?;
                self.ocr.recognize(&image, config.lang_profile)
            })
            .collect::<Result<Vec<String>>>()?;

        Ok(blocks.join("\n"))
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}
