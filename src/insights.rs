use crate::dto::{Frame, ANNUAL_REVENUE, COMPANY_ID, INDUSTRY};
use crate::error::{PipelineError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// Summary statistics over a (possibly filtered) dataset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Insights {
    pub total_companies: usize,
    pub average_revenue: f64,
    pub top_industry: String,
}

/// Aggregates a dataset into dashboard insights: distinct company count,
/// mean annual revenue rounded to two decimals, and the most frequent
/// industry (ties broken by first-encountered value).
///
/// Fails with [`PipelineError::EmptyAggregation`] on a dataset with no rows;
/// a mean and a mode are undefined there.
pub fn generate_insights(frame: &Frame) -> Result<Insights> {
    if frame.is_empty() {
        return Err(PipelineError::EmptyAggregation);
    }

    let missing: Vec<String> = [COMPANY_ID, ANNUAL_REVENUE, INDUSTRY]
        .iter()
        .filter(|name| frame.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::Schema { missing });
    }
    let id_idx = frame.column_index(COMPANY_ID).unwrap_or_default();
    let revenue_idx = frame.column_index(ANNUAL_REVENUE).unwrap_or_default();
    let industry_idx = frame.column_index(INDUSTRY).unwrap_or_default();

    let companies: FxHashSet<String> = frame
        .rows()
        .iter()
        .map(|row| row[id_idx].to_string())
        .collect();

    let revenue_sum: f64 = frame
        .rows()
        .iter()
        .map(|row| row[revenue_idx].as_number().unwrap_or(0.0))
        .sum();
    let average_revenue = round2(revenue_sum / frame.len() as f64);

    Ok(Insights {
        total_companies: companies.len(),
        average_revenue,
        top_industry: industry_mode(frame, industry_idx),
    })
}

/// Most frequent industry value; on equal counts the value seen first wins,
/// giving a stable frequency ranking.
fn industry_mode(frame: &Frame, industry_idx: usize) -> String {
    let mut counts: FxHashMap<String, (usize, usize)> = FxHashMap::default();
    for (position, row) in frame.rows().iter().enumerate() {
        let entry = counts
            .entry(row[industry_idx].to_string())
            .or_insert((0, position));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .min_by_key(|(_, (count, first_seen))| (std::cmp::Reverse(*count), *first_seen))
        .map(|(value, _)| value)
        .unwrap_or_default()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
