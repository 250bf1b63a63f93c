// error.rs - Failure kinds surfaced by the reader, the accumulator and the report

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AutocrrError>;

#[derive(Debug, Error)]
pub enum AutocrrError {
    /// Malformed or missing numeric token in the input stream.
    #[error(
        "Error in input: \"{source_name}\"\n      near line {line}{}\n      {message}",
        quoted(.token)
    )]
    Format {
        source_name: String,
        line: usize,
        token: Option<String>,
        message: String,
    },

    /// Rows of one data set disagree on the vector dimension.
    #[error(
        "Error: Inconsistent number of entries on each line.\n       \
         (data set #{data_set}, row {row}: expected {expected} entries, found {found})"
    )]
    DimensionMismatch {
        data_set: usize,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

fn quoted(token: &Option<String>) -> String {
    match token {
        Some(t) if !t.is_empty() => format!(": \"{t}\""),
        _ => String::new(),
    }
}

impl AutocrrError {
    pub fn format(
        source_name: impl Into<String>,
        line: usize,
        token: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        AutocrrError::Format {
            source_name: source_name.into(),
            line,
            token: token.map(str::to_owned),
            message: message.into(),
        }
    }
}
