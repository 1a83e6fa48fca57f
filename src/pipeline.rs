use anyhow::Result;
use std::path::Path;

use crate::checker::TypoChecker;
use crate::config::Config;
use crate::extract::{Extraction, ExtractionError, ExtractionMode, TextExtractor};
use crate::Report;

/// Everything one document-processing invocation hands back to the
/// presentation layer: the full extracted text (exportable as-is), the
/// extraction mode for disclosure, and the typo report.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub text: String,
    pub mode: ExtractionMode,
    pub report: Report,
}

/// One extraction-plus-detection pipeline. A new invocation simply
/// produces a new `Analysis`; nothing is retained between runs.
pub struct Pipeline {
    config: Config,
    extractor: TextExtractor,
    checker: TypoChecker,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let checker = TypoChecker::new(&config)?;
        Ok(Self {
            config,
            extractor: TextExtractor::new(),
            checker,
        })
    }

    /// Wire a pipeline from explicit parts (alternative backends, tests).
    pub fn with_parts(config: Config, extractor: TextExtractor, checker: TypoChecker) -> Self {
        Self {
            config,
            extractor,
            checker,
        }
    }

    pub fn run(&self, document: &Path) -> Result<Analysis, ExtractionError> {
        let Extraction { text, mode, .. } = self.extractor.extract(document, &self.config)?;
        let report = self.checker.check(&text);

        Ok(Analysis { text, mode, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::dictionary::Dictionary;
    use crate::checker::korean::PatternTable;
    use crate::config::LangProfile;
    use crate::extract::{OcrEngine, PageRasterizer, TextLayerReader};
    use crate::Language;
    use std::path::PathBuf;
    use tempfile::tempdir;

    struct FixedTextLayer(Vec<String>);

    impl TextLayerReader for FixedTextLayer {
        fn page_texts(&self, _document: &Path) -> Vec<String> {
            self.0.clone()
        }
    }

    struct SinglePageRasterizer;

    impl PageRasterizer for SinglePageRasterizer {
        fn page_count(&self, _document: &Path) -> Result<usize> {
            Ok(1)
        }

        fn rasterize_page(
            &self,
            _document: &Path,
            _page_idx: usize,
            _dpi: u32,
            out_dir: &Path,
        ) -> Result<PathBuf> {
            Ok(out_dir.join("page_001-1.png"))
        }
    }

    struct FixedOcr(String);

    impl OcrEngine for FixedOcr {
        fn recognize(&self, _image: &Path, _profile: LangProfile) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn label_dictionary() -> Dictionary {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.dict");
        let words: Vec<String> = [
            "premium", "vitamin", "mg", "chewable", "tablets", "daily", "take",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        Dictionary::build_from_words(&words, &path).unwrap();
        Dictionary::load_from_path(&path).unwrap()
    }

    fn pipeline_with(direct_pages: Vec<String>, ocr_text: &str) -> Pipeline {
        let extractor = TextExtractor::with_backends(
            Box::new(FixedTextLayer(direct_pages)),
            Box::new(SinglePageRasterizer),
            Box::new(FixedOcr(ocr_text.to_string())),
        );
        let checker =
            TypoChecker::with_parts(label_dictionary(), PatternTable::builtin(), None);
        Pipeline::with_parts(Config::default(), extractor, checker)
    }

    #[test]
    fn test_direct_document_end_to_end() {
        let label = "Premium Vitamn C 500mg chewable tablets 건강을 위하사 매일 한 정씩 섭취하세요";
        let pipeline = pipeline_with(vec![label.to_string()], "unused");

        let analysis = pipeline.run(Path::new("box.pdf")).unwrap();

        assert_eq!(analysis.mode, ExtractionMode::Direct);
        assert_eq!(analysis.text, label);
        assert_eq!(analysis.report.len(), 2);

        let en = &analysis.report.findings[0];
        assert_eq!(en.language, Language::En);
        assert_eq!(en.surface, "Vitamn");
        assert_eq!(en.suggestion.as_deref(), Some("Vitamin"));

        let ko = &analysis.report.findings[1];
        assert_eq!(ko.language, Language::Ko);
        assert_eq!(ko.surface, "위하사");
        assert_eq!(ko.suggestion.as_deref(), Some("위하여"));
    }

    #[test]
    fn test_flattened_document_goes_through_ocr() {
        let pipeline = pipeline_with(Vec::new(), "Vitamn C 500mg 위하사 섭취하세요");

        let analysis = pipeline.run(Path::new("flattened.pdf")).unwrap();

        assert_eq!(analysis.mode, ExtractionMode::Ocr);
        let surfaces: Vec<_> = analysis
            .report
            .findings
            .iter()
            .map(|f| (f.language, f.surface.as_str()))
            .collect();
        assert_eq!(
            surfaces,
            vec![(Language::En, "Vitamn"), (Language::Ko, "위하사")]
        );
    }

    #[test]
    fn test_clean_label_reports_nothing() {
        let label = "Take premium chewable vitamin tablets daily 매일 비타민을 드세요 건강한 하루";
        let pipeline = pipeline_with(vec![label.to_string()], "unused");

        let analysis = pipeline.run(Path::new("box.pdf")).unwrap();

        assert_eq!(analysis.mode, ExtractionMode::Direct);
        assert!(analysis.report.is_empty());
    }
}
