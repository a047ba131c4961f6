use std::path::Path;

use thiserror::Error;

pub mod backend;
pub mod engine;
pub mod ocr;

pub use backend::{BackendError, PageImage, PdfBackend, PdfPages};
pub use engine::{DocumentExtractor, ExtractionEngine, PageText};
pub use ocr::{OcrEngine, OcrError, TesseractOcr};

/// File-type tag derived from a document's path suffix.
///
/// Dispatch is case-insensitive. Anything that is neither a PDF nor a
/// known raster format maps to `Other`, which extracts to empty text
/// rather than an error so batch callers keep a result slot for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image,
    Other,
}

impl FileKind {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => FileKind::Pdf,
            "png" | "jpg" | "jpeg" => FileKind::Image,
            _ => FileKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Image => "image",
            FileKind::Other => "other",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The raw bytes of one document plus its declared file type.
///
/// Owned by a single extraction invocation; never shared or mutated.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub kind: FileKind,
    pub bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(kind: FileKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("OCR failure: {0}")]
    OcrFailure(String),
}

impl From<BackendError> for ExtractError {
    fn from(e: BackendError) -> Self {
        ExtractError::MalformedDocument(e.to_string())
    }
}

impl From<OcrError> for ExtractError {
    fn from(e: OcrError) -> Self {
        ExtractError::OcrFailure(e.to_string())
    }
}
