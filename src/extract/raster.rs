use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::PageRasterizer;

/// Rasterizes pages through poppler's `pdftoppm`, the same renderer the
/// design-tool world leans on for PDF/AI exports.
pub struct PopplerRasterizer;

impl PageRasterizer for PopplerRasterizer {
    fn page_count(&self, document: &Path) -> Result<usize> {
        let doc = lopdf::Document::load(document)
            .with_context(|| format!("Failed to open {} for page count", document.display()))?;
        Ok(doc.get_pages().len())
    }

    fn rasterize_page(
        &self,
        document: &Path,
        page_idx: usize,
        dpi: u32,
        out_dir: &Path,
    ) -> Result<PathBuf> {
        // pdftoppm uses 1-based page indices
        let page_number = page_idx + 1;
        let prefix = out_dir.join(format!("page_{:03}", page_number));
        let prefix_str = prefix
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non-UTF8 output path not supported"))?;

        let status = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg(document)
            .arg(prefix_str)
            .status()
            .with_context(|| "failed to invoke pdftoppm; is poppler-utils installed?")?;

        if !status.success() {
            anyhow::bail!("pdftoppm failed with status: {status}");
        }

        // pdftoppm names this page's file `<prefix>-<page>.png`
        let image_path = out_dir.join(format!("page_{:03}-{}.png", page_number, page_number));

        if !image_path.exists() {
            anyhow::bail!("expected rendered image not found: {}", image_path.display());
        }

        Ok(image_path)
    }
}
