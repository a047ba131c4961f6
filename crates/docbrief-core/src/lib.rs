use thiserror::Error;

pub mod config_file;
pub mod orchestrator;
pub mod store;
pub mod summarize;

// Re-export for convenience
pub use orchestrator::{Orchestrator, render_response};
pub use store::{FsObjectStore, HttpObjectStore, ObjectStore, RetrievalError};
pub use summarize::{OpenAiSummarizer, SummarizationError, Summarizer};
// Domain types from the extraction crate (canonical definitions live there)
pub use docbrief_extract::{DocumentExtractor, ExtractError, FileKind, RawDocument};

/// The result slot recorded when extraction yields no text and the
/// summarization service is deliberately not called.
pub const NO_TEXT_SENTINEL: &str = "No text provided for summarization.";

/// An opaque object-store key identifying one document.
///
/// The store decides how the key maps to bytes (signed URL, direct path);
/// the pipeline only derives the file-type tag from its suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef(String);

impl DocumentRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_path(&self.0)
    }
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentRef {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error(transparent)]
    Extraction(#[from] ExtractError),
    #[error(transparent)]
    Summarization(#[from] SummarizationError),
}

impl PipelineError {
    /// Which pipeline stage produced the error, for the rendered slot.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Retrieval(_) => "retrieval",
            PipelineError::Extraction(_) => "extraction",
            PipelineError::Summarization(_) => "summarization",
        }
    }
}

/// The outcome recorded for one document.
///
/// A failure occupies its slot rather than shrinking the batch, so the
/// response always lines up one-to-one with the request.
#[derive(Debug)]
pub enum SummaryOutcome {
    /// The summarization service returned a summary.
    Summarized(String),
    /// Extraction produced no text; the service was not called.
    Skipped,
    /// Some stage failed for this document.
    Failed(PipelineError),
}

impl SummaryOutcome {
    pub fn render(&self) -> String {
        match self {
            SummaryOutcome::Summarized(text) => text.clone(),
            SummaryOutcome::Skipped => NO_TEXT_SENTINEL.to_string(),
            SummaryOutcome::Failed(e) => format!("Error ({}): {}", e.stage(), e),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SummaryOutcome::Failed(_))
    }
}

/// One entry of a batch result, in the caller's input order.
#[derive(Debug)]
pub struct DocumentSummary {
    pub reference: DocumentRef,
    pub outcome: SummaryOutcome,
}

/// Summary statistics for a complete batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub summarized: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchStats {
    pub fn from_summaries(summaries: &[DocumentSummary]) -> Self {
        let mut stats = BatchStats {
            total: summaries.len(),
            ..Default::default()
        };
        for summary in summaries {
            match summary.outcome {
                SummaryOutcome::Summarized(_) => stats.summarized += 1,
                SummaryOutcome::Skipped => stats.skipped += 1,
                SummaryOutcome::Failed(_) => stats.failed += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_ref_derives_kind_from_suffix() {
        assert_eq!(DocumentRef::new("reports/scan.pdf").kind(), FileKind::Pdf);
        assert_eq!(DocumentRef::new("photo.jpeg").kind(), FileKind::Image);
        assert_eq!(DocumentRef::new("notes.txt").kind(), FileKind::Other);
    }

    #[test]
    fn skipped_outcome_renders_the_exact_sentinel() {
        assert_eq!(
            SummaryOutcome::Skipped.render(),
            "No text provided for summarization."
        );
    }

    #[test]
    fn failed_outcome_names_the_stage() {
        let outcome = SummaryOutcome::Failed(PipelineError::Retrieval(
            RetrievalError::NotFound("a.pdf".into()),
        ));
        let rendered = outcome.render();
        assert!(rendered.starts_with("Error (retrieval):"), "{rendered}");
    }

    #[test]
    fn batch_stats_counts_each_outcome() {
        let summaries = vec![
            DocumentSummary {
                reference: "a.pdf".into(),
                outcome: SummaryOutcome::Summarized("ok".into()),
            },
            DocumentSummary {
                reference: "b.png".into(),
                outcome: SummaryOutcome::Skipped,
            },
            DocumentSummary {
                reference: "c.pdf".into(),
                outcome: SummaryOutcome::Failed(PipelineError::Retrieval(
                    RetrievalError::Status(500),
                )),
            },
        ];
        let stats = BatchStats::from_summaries(&summaries);
        assert_eq!(
            stats,
            BatchStats {
                total: 3,
                summarized: 1,
                skipped: 1,
                failed: 1,
            }
        );
    }
}
