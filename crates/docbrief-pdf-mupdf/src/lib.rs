use mupdf::{Colorspace, Document, ImageFormat, Matrix, TextPageFlags};

use docbrief_extract::backend::{BackendError, PageImage, PdfBackend, PdfPages};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island — it isolates the mupdf dependency
/// (which is AGPL-3.0) so that non-PDF code paths do not transitively
/// depend on it.
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfPages>, BackendError> {
        let document =
            Document::from_bytes(bytes, "pdf").map_err(|e| BackendError::OpenError(e.to_string()))?;

        let page_count = document
            .page_count()
            .map_err(|e| BackendError::OpenError(e.to_string()))? as usize;

        Ok(Box::new(MupdfPages {
            document,
            page_count,
        }))
    }
}

/// An open document. Page handles are loaded per call and dropped when the
/// call returns, so a failed page doesn't pin the rest of the document.
struct MupdfPages {
    document: Document,
    page_count: usize,
}

impl PdfPages for MupdfPages {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        let page = self
            .document
            .load_page(index as i32)
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

        // Use block/line iteration to match PyMuPDF's get_text() behavior
        let mut page_text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                page_text.push_str(&line_text);
                page_text.push('\n');
            }
        }
        Ok(page_text)
    }

    fn rasterize(&self, index: usize) -> Result<PageImage, BackendError> {
        let page = self
            .document
            .load_page(index as i32)
            .map_err(|e| BackendError::RenderError(e.to_string()))?;

        // Identity matrix: render at the document's native resolution.
        let pixmap = page
            .to_pixmap(&Matrix::IDENTITY, &Colorspace::device_rgb(), 0.0, false)
            .map_err(|e| BackendError::RenderError(e.to_string()))?;

        let mut png_data = Vec::new();
        pixmap
            .write_to(&mut png_data, ImageFormat::PNG)
            .map_err(|e| BackendError::RenderError(e.to_string()))?;

        Ok(PageImage {
            width: pixmap.width(),
            height: pixmap.height(),
            png_data,
        })
    }
}
