use std::io::Write;

use docbrief_core::{BatchStats, DocumentSummary, SummaryOutcome};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print one per-document status line.
pub fn print_result_line(
    w: &mut dyn Write,
    index: usize,
    total: usize,
    summary: &DocumentSummary,
    color: ColorMode,
) -> std::io::Result<()> {
    let idx = index + 1;
    match &summary.outcome {
        SummaryOutcome::Summarized(_) => {
            if color.enabled() {
                writeln!(
                    w,
                    "[{}/{}] {} -> {}",
                    idx,
                    total,
                    summary.reference,
                    "SUMMARIZED".green()
                )?;
            } else {
                writeln!(w, "[{}/{}] {} -> SUMMARIZED", idx, total, summary.reference)?;
            }
        }
        SummaryOutcome::Skipped => {
            if color.enabled() {
                writeln!(
                    w,
                    "[{}/{}] {} -> {}",
                    idx,
                    total,
                    summary.reference,
                    "NO TEXT".yellow()
                )?;
            } else {
                writeln!(w, "[{}/{}] {} -> NO TEXT", idx, total, summary.reference)?;
            }
        }
        SummaryOutcome::Failed(e) => {
            let label = format!("FAILED ({})", e.stage());
            if color.enabled() {
                writeln!(
                    w,
                    "[{}/{}] {} -> {}",
                    idx,
                    total,
                    summary.reference,
                    label.red()
                )?;
            } else {
                writeln!(w, "[{}/{}] {} -> {}", idx, total, summary.reference, label)?;
            }
        }
    }
    Ok(())
}

/// Print the end-of-run totals.
pub fn print_batch_summary(
    w: &mut dyn Write,
    stats: &BatchStats,
    color: ColorMode,
) -> std::io::Result<()> {
    let line = format!(
        "{} documents: {} summarized, {} without text, {} failed",
        stats.total, stats.summarized, stats.skipped, stats.failed
    );
    if color.enabled() && stats.failed > 0 {
        writeln!(w, "{}", line.yellow())?;
    } else {
        writeln!(w, "{}", line)?;
    }
    Ok(())
}
