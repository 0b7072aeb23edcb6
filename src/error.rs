use thiserror::Error;

/// Errors raised by the lead pipeline. All are terminal for the operation
/// that raised them; there is no retry path for a deterministic transform on
/// a fixed input.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("the dataset is empty or has no columns")]
    EmptyInput,

    #[error("the dataset is missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("error reading the tabular input: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot aggregate insights over an empty dataset")]
    EmptyAggregation,
}

impl PipelineError {
    pub fn missing_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PipelineError::Schema {
            missing: names.into_iter().map(Into::into).collect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
