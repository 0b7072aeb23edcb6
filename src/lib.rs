//! Core pipeline for the lead insights dashboard: ingest a CSV of sales
//! leads, validate and normalize it, collapse fuzzy duplicate companies,
//! score the survivors, and aggregate summary insights.
//!
//! The crate is a synchronous, batch-oriented library. Each stage is a pure
//! transformation from input frame(s) to output frame(s); presentation
//! layers (dashboards, upload handlers) are callers, not residents.

pub mod dedup;
pub mod dto;
pub mod error;
pub mod ingest;
pub mod insights;
pub mod score;
pub mod similarity;
pub mod validate;

pub use dedup::resolve_duplicates;
pub use dto::{Cell, DedupConfig, Frame, GroupingMode};
pub use error::{PipelineError, Result};
pub use insights::{generate_insights, Insights};
pub use score::score_leads;
pub use validate::validate;

use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Loads a lead dataset from a file path, validates it, and removes fuzzy
/// duplicates. Returns (cleaned, removed).
pub fn clean_from_path<P: AsRef<Path>>(path: P, config: &DedupConfig) -> Result<(Frame, Frame)> {
    let frame = ingest::read_csv_path(path)?;
    clean(frame, config)
}

/// Same as [`clean_from_path`] for an in-memory byte/character stream, e.g.
/// an uploaded file held by a caller.
pub fn clean_from_reader<R: Read>(reader: R, config: &DedupConfig) -> Result<(Frame, Frame)> {
    let frame = ingest::read_csv(reader)?;
    clean(frame, config)
}

fn clean(frame: Frame, config: &DedupConfig) -> Result<(Frame, Frame)> {
    let start = Instant::now();
    let validated = validate::validate(&frame)?;
    info!(
        "Validated {} of {} rows in {:.4} secs",
        validated.len(),
        frame.len(),
        start.elapsed().as_secs_f64()
    );

    let start = Instant::now();
    let (cleaned, removed) = dedup::resolve_duplicates(&validated, config);
    info!(
        "Dedupe completed in {:.4} secs ({} kept, {} removed)",
        start.elapsed().as_secs_f64(),
        cleaned.len(),
        removed.len()
    );
    Ok((cleaned, removed))
}
