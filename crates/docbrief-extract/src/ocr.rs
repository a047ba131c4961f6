//! OCR engine adapter.
//!
//! The engine is synchronous and CPU-bound; the default implementation
//! shells out to the `tesseract` binary rather than linking it, so the
//! only install-time requirement is the tesseract-ocr package.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineUnavailable(String),
    #[error("OCR failed: {0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for OCR engines: bitmap image bytes in, plain text out.
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an encoded raster image (PNG or JPEG).
    fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;

    /// Whether the engine can actually run on this machine.
    fn is_available(&self) -> bool;

    /// What is needed to make this engine available.
    fn availability_hint(&self) -> String;
}

/// Tesseract OCR via the command line.
pub struct TesseractOcr {
    language: String,
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }

    /// Set the recognition language (e.g. "eng", "deu").
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::Failed(format!("tesseract failed: {}", stderr)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(OcrError::EngineUnavailable(
                "tesseract not found (install tesseract-ocr)".to_string(),
            )),
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        // Tesseract wants a file; it sniffs the format from content, so a
        // fixed name works for both PNG page renders and caller-supplied
        // JPEGs.
        let temp_dir = tempfile::TempDir::new()?;
        let image_path = temp_dir.path().join("input.png");
        std::fs::write(&image_path, image)?;
        self.run_tesseract(&image_path)
    }

    fn is_available(&self) -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn availability_hint(&self) -> String {
        if self.is_available() {
            "tesseract is available".to_string()
        } else {
            "tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_language_is_english() {
        let ocr = TesseractOcr::new();
        assert_eq!(ocr.language, "eng");
    }

    #[test]
    fn with_language_overrides() {
        let ocr = TesseractOcr::new().with_language("deu");
        assert_eq!(ocr.language, "deu");
    }

    #[test]
    fn availability_hint_mentions_install_when_missing() {
        let ocr = TesseractOcr::new();
        if !ocr.is_available() {
            assert!(ocr.availability_hint().contains("tesseract-ocr"));
        }
    }
}
