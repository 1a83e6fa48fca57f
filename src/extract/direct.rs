use std::path::Path;

use super::TextLayerReader;

/// Direct extraction of the embedded text layer, page by page.
///
/// Packaging artwork is routinely exported with the text flattened into
/// vector outlines or bitmaps; those files parse fine but carry no text
/// layer, and genuinely corrupt uploads don't parse at all. Both cases
/// contribute empty pages here and are decided downstream by the OCR
/// threshold, so extraction failures are swallowed rather than surfaced.
pub struct PdfTextLayer;

impl TextLayerReader for PdfTextLayer {
    fn page_texts(&self, document: &Path) -> Vec<String> {
        match pdf_extract::extract_text_by_pages(document) {
            Ok(pages) => pages,
            Err(e) => {
                eprintln!(
                    "Warning: no readable text layer in {}: {}",
                    document.display(),
                    e
                );
                Vec::new()
            }
        }
    }
}

/// Document text = newline-joined non-empty page texts.
pub fn join_page_texts(pages: &[String]) -> String {
    pages
        .iter()
        .map(|p| p.trim_end())
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_skips_empty_pages() {
        let pages = vec![
            "front of box".to_string(),
            String::new(),
            "   ".to_string(),
            "back of box".to_string(),
        ];
        assert_eq!(join_page_texts(&pages), "front of box\nback of box");
    }

    #[test]
    fn test_join_of_nothing_is_empty_not_null() {
        assert_eq!(join_page_texts(&[]), "");
        assert_eq!(join_page_texts(&[String::new()]), "");
    }

    #[test]
    fn test_unreadable_file_yields_no_pages() {
        let reader = PdfTextLayer;
        assert!(reader.page_texts(Path::new("/nonexistent/artwork.pdf")).is_empty());
    }
}
