use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("failed to render page: {0}")]
    RenderError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single rasterized page, PNG-encoded.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// Trait for PDF backends.
///
/// Implementors provide the low-level page operations; the per-page
/// native-text-or-OCR decision lives in [`crate::engine::ExtractionEngine`].
/// The only in-tree implementation is `docbrief-pdf-mupdf`, kept in its own
/// crate so non-PDF code paths do not transitively depend on mupdf.
pub trait PdfBackend: Send + Sync {
    /// Open a document from raw bytes.
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfPages>, BackendError>;
}

/// An open multi-page document.
///
/// Pages are addressed by 0-based index in document order. Implementations
/// load page handles per call so page resources stay scoped to the caller's
/// use of the returned value.
pub trait PdfPages {
    fn page_count(&self) -> usize;

    /// Read the embedded text layer of one page (layout-aware).
    fn page_text(&self, index: usize) -> Result<String, BackendError>;

    /// Render one page to a bitmap at the document's native resolution.
    fn rasterize(&self, index: usize) -> Result<PageImage, BackendError>;
}
