use crate::dto::{
    Cell, Frame, ANNUAL_REVENUE, COMPANY_ID, CONVERSION_RATE, INDUSTRY, LEADS_GENERATED,
    MARKETING_SPEND,
};
use crate::error::{PipelineError, Result};

/// Columns that must be present and non-null for a row to survive.
pub const REQUIRED_COLUMNS: &[&str] = &[COMPANY_ID, INDUSTRY, ANNUAL_REVENUE];

/// Columns coerced to numbers when present; unparseable and null values
/// become zero.
pub const NUMERIC_COLUMNS: &[&str] = &[
    ANNUAL_REVENUE,
    MARKETING_SPEND,
    LEADS_GENERATED,
    CONVERSION_RATE,
];

/// Validates and normalizes a raw frame.
///
/// Fails with [`PipelineError::EmptyInput`] on a frame with zero rows or zero
/// columns, and with [`PipelineError::Schema`] when any of
/// [`REQUIRED_COLUMNS`] is absent. On success, rows with a null in a required
/// column are dropped, the [`NUMERIC_COLUMNS`] that exist are fully coerced
/// to numbers, and every remaining null is filled with a numeric zero.
///
/// Zero is the universal null placeholder for all columns regardless of
/// their semantic type. That is a deliberate policy, not an inference rule;
/// callers that need typed placeholders must fill them upstream.
pub fn validate(frame: &Frame) -> Result<Frame> {
    if frame.is_empty() || frame.columns().is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| frame.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::Schema { missing });
    }

    let required: Vec<usize> = REQUIRED_COLUMNS
        .iter()
        .filter_map(|name| frame.column_index(name))
        .collect();
    let numeric: Vec<usize> = NUMERIC_COLUMNS
        .iter()
        .filter_map(|name| frame.column_index(name))
        .collect();

    let rows = frame
        .rows()
        .iter()
        .filter(|row| !required.iter().any(|&idx| row[idx].is_null()))
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(idx, cell)| {
                    if numeric.contains(&idx) {
                        Cell::Number(coerce_numeric(cell))
                    } else if cell.is_null() {
                        Cell::Number(0.0)
                    } else {
                        cell.clone()
                    }
                })
                .collect()
        })
        .collect();

    Ok(Frame::new(frame.columns().to_vec(), rows))
}

fn coerce_numeric(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.trim().parse().unwrap_or(0.0),
        Cell::Null => 0.0,
    }
}
