use tracing::{info, warn};

use docbrief_extract::{DocumentExtractor, RawDocument};

use crate::store::ObjectStore;
use crate::summarize::Summarizer;
use crate::{DocumentRef, DocumentSummary, PipelineError, SummaryOutcome};

/// Runs a batch of document references through fetch → extract → summarize.
///
/// Collaborators are injected at construction; there is no process-wide
/// state. Concurrent batches can use separate orchestrators or share one,
/// since nothing here is mutable across calls.
pub struct Orchestrator {
    store: Box<dyn ObjectStore>,
    extractor: Box<dyn DocumentExtractor>,
    summarizer: Box<dyn Summarizer>,
}

impl Orchestrator {
    pub fn new(
        store: Box<dyn ObjectStore>,
        extractor: Box<dyn DocumentExtractor>,
        summarizer: Box<dyn Summarizer>,
    ) -> Self {
        Self {
            store,
            extractor,
            summarizer,
        }
    }

    /// Process every reference, in input order, one at a time.
    ///
    /// Sequential on purpose: OCR and rasterization spike memory per
    /// document, and the summarization service is rate-limited upstream.
    /// A failure on one document records a [`SummaryOutcome::Failed`] slot
    /// and moves on; the returned vec always has one entry per input ref.
    pub async fn summarize_all(&self, refs: &[DocumentRef]) -> Vec<DocumentSummary> {
        let total = refs.len();
        let mut results = Vec::with_capacity(total);

        for (index, reference) in refs.iter().enumerate() {
            let outcome = match self.process_document(reference).await {
                Ok(outcome) => {
                    info!(
                        index,
                        total,
                        reference = %reference,
                        kind = %reference.kind(),
                        "document processed"
                    );
                    outcome
                }
                Err(e) => {
                    warn!(
                        index,
                        total,
                        reference = %reference,
                        stage = e.stage(),
                        error = %e,
                        "document failed"
                    );
                    SummaryOutcome::Failed(e)
                }
            };

            results.push(DocumentSummary {
                reference: reference.clone(),
                outcome,
            });
        }

        results
    }

    async fn process_document(
        &self,
        reference: &DocumentRef,
    ) -> Result<SummaryOutcome, PipelineError> {
        let bytes = self.store.fetch_bytes(reference).await?;
        let raw = RawDocument::new(reference.kind(), bytes);

        let text = self.extractor.extract(&raw)?;
        if text.trim().is_empty() {
            // Not an optimization: empty input must never reach the paid
            // upstream call.
            return Ok(SummaryOutcome::Skipped);
        }

        let summary = self.summarizer.summarize(&text).await?;
        Ok(SummaryOutcome::Summarized(summary))
    }
}

/// Render a batch result to the wire format: outcomes joined by a blank
/// line, in input order.
pub fn render_response(summaries: &[DocumentSummary]) -> String {
    summaries
        .iter()
        .map(|s| s.outcome.render())
        .collect::<Vec<_>>()
        .join("\n\n")
}
