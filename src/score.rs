use crate::dto::{
    Cell, Frame, ANNUAL_REVENUE, COMPANY_ID, CONVERSION_RATE, INDUSTRY, LEAD_CATEGORY, LEAD_SCORE,
    MARKETING_SPEND,
};
use crate::error::{PipelineError, Result};

pub const REVENUE_WEIGHT: f64 = 0.4;
pub const SPEND_WEIGHT: f64 = 0.3;
pub const CONVERSION_WEIGHT: f64 = 0.3;

/// Upper bounds of the Low and Medium buckets, inclusive.
const LOW_MAX: f64 = 40.0;
const MEDIUM_MAX: f64 = 70.0;

/// Columns the scorer reads or carries into its output projection.
const SCORING_COLUMNS: &[&str] = &[
    COMPANY_ID,
    INDUSTRY,
    ANNUAL_REVENUE,
    MARKETING_SPEND,
    CONVERSION_RATE,
];

/// Computes a weighted priority score and category per lead.
///
/// Revenue and spend are normalized against their dataset maxima (zero when
/// the maximum is zero, so an all-zero column cannot produce a NaN), the
/// conversion rate against 100. The result is a new frame restricted to the
/// fixed projection {Company_ID, Industry, Annual_Revenue, Conversion_Rate,
/// Lead_Score, Lead_Category}; the caller's frame is untouched.
pub fn score_leads(frame: &Frame) -> Result<Frame> {
    let missing: Vec<String> = SCORING_COLUMNS
        .iter()
        .filter(|name| frame.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::Schema { missing });
    }

    let indices: Vec<usize> = SCORING_COLUMNS
        .iter()
        .filter_map(|name| frame.column_index(name))
        .collect();
    let [id_idx, industry_idx, revenue_idx, spend_idx, rate_idx] = indices[..] else {
        return Err(PipelineError::missing_columns(SCORING_COLUMNS.to_vec()));
    };

    let number = |row: &[Cell], idx: usize| row[idx].as_number().unwrap_or(0.0);
    let max_revenue = frame
        .rows()
        .iter()
        .map(|row| number(row, revenue_idx))
        .fold(0.0, f64::max);
    let max_spend = frame
        .rows()
        .iter()
        .map(|row| number(row, spend_idx))
        .fold(0.0, f64::max);
    let normalize = |value: f64, max: f64| if max > 0.0 { value / max } else { 0.0 };

    let rows = frame
        .rows()
        .iter()
        .map(|row| {
            let revenue_score = normalize(number(row, revenue_idx), max_revenue);
            let spend_score = normalize(number(row, spend_idx), max_spend);
            let conversion_score = number(row, rate_idx) / 100.0;
            let lead_score = 100.0
                * (REVENUE_WEIGHT * revenue_score
                    + SPEND_WEIGHT * spend_score
                    + CONVERSION_WEIGHT * conversion_score);
            vec![
                row[id_idx].clone(),
                row[industry_idx].clone(),
                row[revenue_idx].clone(),
                row[rate_idx].clone(),
                Cell::Number(lead_score),
                Cell::from(lead_category(lead_score)),
            ]
        })
        .collect();

    let columns = vec![
        COMPANY_ID.to_string(),
        INDUSTRY.to_string(),
        ANNUAL_REVENUE.to_string(),
        CONVERSION_RATE.to_string(),
        LEAD_SCORE.to_string(),
        LEAD_CATEGORY.to_string(),
    ];
    Ok(Frame::new(columns, rows))
}

/// Buckets a score with inclusive upper bounds: (0, 40] Low, (40, 70]
/// Medium, (70, 100] High. A score of exactly zero belongs to Low.
pub fn lead_category(score: f64) -> &'static str {
    if score <= LOW_MAX {
        "Low"
    } else if score <= MEDIUM_MAX {
        "Medium"
    } else {
        "High"
    }
}
