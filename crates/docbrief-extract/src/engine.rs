use tracing::debug;

use crate::backend::{PdfBackend, PdfPages};
use crate::ocr::OcrEngine;
use crate::{ExtractError, FileKind, RawDocument};

/// The per-page outcome of the native-text-or-OCR decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageText {
    /// The page had a non-whitespace embedded text layer.
    Native(String),
    /// The page had no usable text layer; it was rasterized and OCRed.
    OcrFallback(String),
}

impl PageText {
    pub fn text(&self) -> &str {
        match self {
            PageText::Native(t) | PageText::OcrFallback(t) => t,
        }
    }

    pub fn is_ocr(&self) -> bool {
        matches!(self, PageText::OcrFallback(_))
    }
}

/// Trait for document text extraction.
///
/// The batch orchestrator consumes this seam, so tests can substitute a
/// fake for the whole engine.
pub trait DocumentExtractor: Send + Sync {
    /// Extract the best-available text from one document.
    fn extract(&self, raw: &RawDocument) -> Result<String, ExtractError>;
}

/// Per-document, per-page extraction: native text where present, OCR
/// fallback where not.
pub struct ExtractionEngine {
    pdf: Box<dyn PdfBackend>,
    ocr: Box<dyn OcrEngine>,
}

impl ExtractionEngine {
    pub fn new(pdf: Box<dyn PdfBackend>, ocr: Box<dyn OcrEngine>) -> Self {
        Self { pdf, ocr }
    }

    fn extract_pdf(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let document = self.pdf.open(bytes)?;
        let mut text = String::new();

        for index in 0..document.page_count() {
            let page = self.extract_page(document.as_ref(), index)?;
            if page.is_ocr() {
                debug!(page = index, "no native text layer, used OCR");
            }
            text.push_str(page.text());
            text.push('\n');
        }

        Ok(text.trim().to_string())
    }

    /// Decide one page: native text wins unless it is empty or
    /// whitespace-only. A legitimately blank page is indistinguishable
    /// from a scanned page here; both go to OCR.
    fn extract_page(
        &self,
        document: &dyn PdfPages,
        index: usize,
    ) -> Result<PageText, ExtractError> {
        let native = document.page_text(index)?;
        if !native.trim().is_empty() {
            return Ok(PageText::Native(native));
        }

        let image = document.rasterize(index)?;
        let recognized = self.ocr.recognize(&image.png_data)?;
        Ok(PageText::OcrFallback(recognized))
    }
}

impl DocumentExtractor for ExtractionEngine {
    fn extract(&self, raw: &RawDocument) -> Result<String, ExtractError> {
        match raw.kind {
            FileKind::Pdf => self.extract_pdf(&raw.bytes),
            // Raster images have no text layer to try first.
            FileKind::Image => Ok(self.ocr.recognize(&raw.bytes)?.trim().to_string()),
            FileKind::Other => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::backend::{BackendError, PageImage};
    use crate::ocr::OcrError;

    /// Counters shared between a mock and the test that boxed it.
    #[derive(Clone, Default)]
    struct PdfCalls {
        open: Arc<AtomicUsize>,
        page_text: Arc<AtomicUsize>,
        rasterize: Arc<AtomicUsize>,
    }

    struct MockPdf {
        pages: Vec<String>,
        fail_open: bool,
        calls: PdfCalls,
    }

    impl MockPdf {
        fn new(pages: &[&str]) -> Self {
            Self {
                pages: pages.iter().map(|p| p.to_string()).collect(),
                fail_open: false,
                calls: PdfCalls::default(),
            }
        }

        fn failing() -> Self {
            Self {
                pages: vec![],
                fail_open: true,
                calls: PdfCalls::default(),
            }
        }

        fn calls(&self) -> PdfCalls {
            self.calls.clone()
        }
    }

    impl PdfBackend for MockPdf {
        fn open(&self, _bytes: &[u8]) -> Result<Box<dyn PdfPages>, BackendError> {
            self.calls.open.fetch_add(1, Ordering::SeqCst);
            if self.fail_open {
                return Err(BackendError::OpenError("not a PDF stream".into()));
            }
            Ok(Box::new(MockPages {
                pages: self.pages.clone(),
                calls: self.calls.clone(),
            }))
        }
    }

    struct MockPages {
        pages: Vec<String>,
        calls: PdfCalls,
    }

    impl PdfPages for MockPages {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_text(&self, index: usize) -> Result<String, BackendError> {
            self.calls.page_text.fetch_add(1, Ordering::SeqCst);
            Ok(self.pages[index].clone())
        }

        fn rasterize(&self, index: usize) -> Result<PageImage, BackendError> {
            self.calls.rasterize.fetch_add(1, Ordering::SeqCst);
            Ok(PageImage {
                width: 612,
                height: 792,
                png_data: format!("raster-{}", index).into_bytes(),
            })
        }
    }

    #[derive(Clone)]
    enum MockOcrResponse {
        Text(String),
        Error(String),
    }

    /// Returns queued responses in order, repeating the last; counts calls.
    struct MockOcr {
        responses: Mutex<Vec<MockOcrResponse>>,
        fallback: MockOcrResponse,
        calls: Arc<AtomicUsize>,
    }

    impl MockOcr {
        fn returning(text: &str) -> Self {
            Self {
                responses: Mutex::new(Vec::new()),
                fallback: MockOcrResponse::Text(text.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn with_sequence(texts: &[&str]) -> Self {
            let mut responses: Vec<MockOcrResponse> = texts
                .iter()
                .map(|t| MockOcrResponse::Text(t.to_string()))
                .collect();
            let fallback = responses.last().cloned().unwrap();
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                fallback,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn erroring(message: &str) -> Self {
            Self {
                responses: Mutex::new(Vec::new()),
                fallback: MockOcrResponse::Error(message.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> Arc<AtomicUsize> {
            self.calls.clone()
        }
    }

    impl OcrEngine for MockOcr {
        fn recognize(&self, _image: &[u8]) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| self.fallback.clone());
            match response {
                MockOcrResponse::Text(t) => Ok(t),
                MockOcrResponse::Error(m) => Err(OcrError::Failed(m)),
            }
        }

        fn is_available(&self) -> bool {
            true
        }

        fn availability_hint(&self) -> String {
            "mock".to_string()
        }
    }

    fn engine(pdf: MockPdf, ocr: MockOcr) -> ExtractionEngine {
        ExtractionEngine::new(Box::new(pdf), Box::new(ocr))
    }

    fn pdf_doc() -> RawDocument {
        RawDocument::new(FileKind::Pdf, b"%PDF-1.4".to_vec())
    }

    #[test]
    fn native_text_everywhere_never_invokes_ocr() {
        let pdf = MockPdf::new(&["Hello", "World"]);
        let ocr = MockOcr::returning("should not appear");
        let ocr_calls = ocr.calls();
        let pdf_calls = pdf.calls();

        let text = engine(pdf, ocr).extract(&pdf_doc()).unwrap();

        assert_eq!(text, "Hello\nWorld");
        assert_eq!(ocr_calls.load(Ordering::SeqCst), 0);
        assert_eq!(pdf_calls.rasterize.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_page_falls_back_to_ocr_exactly_once() {
        let pdf = MockPdf::new(&["Hello", ""]);
        let ocr = MockOcr::with_sequence(&["World"]);
        let ocr_calls = ocr.calls();
        let pdf_calls = pdf.calls();

        let text = engine(pdf, ocr).extract(&pdf_doc()).unwrap();

        assert_eq!(text, "Hello\nWorld");
        assert_eq!(ocr_calls.load(Ordering::SeqCst), 1);
        assert_eq!(pdf_calls.rasterize.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn whitespace_only_page_counts_as_empty() {
        let pdf = MockPdf::new(&["  \n\t  "]);
        let ocr = MockOcr::returning("Scanned content");
        let ocr_calls = ocr.calls();

        let text = engine(pdf, ocr).extract(&pdf_doc()).unwrap();

        assert_eq!(text, "Scanned content");
        assert_eq!(ocr_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn image_input_goes_straight_to_ocr() {
        let pdf = MockPdf::new(&["unused"]);
        let ocr = MockOcr::returning("Receipt total: 12.50");
        let ocr_calls = ocr.calls();
        let pdf_calls = pdf.calls();

        let raw = RawDocument::new(FileKind::Image, b"\x89PNG".to_vec());
        let text = engine(pdf, ocr).extract(&raw).unwrap();

        assert_eq!(text, "Receipt total: 12.50");
        assert_eq!(ocr_calls.load(Ordering::SeqCst), 1);
        // The native-text path is never attempted for raster images.
        assert_eq!(pdf_calls.open.load(Ordering::SeqCst), 0);
        assert_eq!(pdf_calls.page_text.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_kind_yields_empty_text_not_error() {
        let pdf = MockPdf::new(&[]);
        let ocr = MockOcr::returning("unused");
        let ocr_calls = ocr.calls();

        let raw = RawDocument::new(FileKind::Other, b"plain text".to_vec());
        let text = engine(pdf, ocr).extract(&raw).unwrap();

        assert_eq!(text, "");
        assert_eq!(ocr_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn malformed_pdf_surfaces_extraction_error() {
        let err = engine(MockPdf::failing(), MockOcr::returning("unused"))
            .extract(&pdf_doc())
            .unwrap_err();

        assert!(matches!(err, ExtractError::MalformedDocument(_)));
    }

    #[test]
    fn ocr_failure_propagates() {
        let pdf = MockPdf::new(&[""]);
        let err = engine(pdf, MockOcr::erroring("engine crashed"))
            .extract(&pdf_doc())
            .unwrap_err();

        assert!(matches!(err, ExtractError::OcrFailure(_)));
    }

    #[test]
    fn extraction_is_idempotent_on_same_bytes() {
        let raw = pdf_doc();
        let run = |raw: &RawDocument| {
            engine(MockPdf::new(&["Hello", ""]), MockOcr::returning("World"))
                .extract(raw)
                .unwrap()
        };

        assert_eq!(run(&raw), run(&raw));
    }

    #[test]
    fn blank_page_with_empty_ocr_result_is_trimmed_away() {
        let pdf = MockPdf::new(&["Hello", ""]);
        let ocr = MockOcr::returning("");

        let text = engine(pdf, ocr).extract(&pdf_doc()).unwrap();

        assert_eq!(text, "Hello");
    }
}
