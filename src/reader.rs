// reader.rs - Splitting a whitespace-delimited numeric stream into data sets
//
// Numbers on one line form one sample. A gap of two or more line breaks
// between rows (blank lines, or lines holding only a comment) starts a new
// data set. `#` starts a comment that runs to the end of the line.

use std::io::BufRead;
use std::str::FromStr;

use num_traits::Float;

use crate::error::{AutocrrError, Result};

const COMMENT: char = '#';

/// One independent trajectory: an ordered sequence of equal-dimension samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet<T> {
    pub samples: Vec<Vec<T>>,
    /// Line of the first row, for diagnostics.
    pub first_line: usize,
}

impl<T> DataSet<T> {
    pub fn new(samples: Vec<Vec<T>>) -> Self {
        Self { samples, first_line: 1 }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Dimension of the first sample (0 for an empty data set).
    pub fn dim(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }
}

impl<T> AsRef<[Vec<T>]> for DataSet<T> {
    fn as_ref(&self) -> &[Vec<T>] {
        &self.samples
    }
}

/// Where the reader currently is, carried into every diagnostic.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub source_name: String,
    pub line: usize,
}

impl ParseContext {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self { source_name: source_name.into(), line: 0 }
    }

    fn error(&self, token: Option<&str>, message: &str) -> AutocrrError {
        AutocrrError::format(self.source_name.clone(), self.line, token, message)
    }

    /// Parse one token as a finite scalar. `inf` and `NaN` are rejected.
    pub fn parse_scalar<T: Float + FromStr>(&self, token: &str) -> Result<T> {
        match token.parse::<T>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(self.error(Some(token), "Expected a number.")),
        }
    }
}

/// Lazily yields data sets from a buffered reader.
pub struct DataSetReader<R, T> {
    input: R,
    ctx: ParseContext,
    /// First row of the next data set, read ahead while closing the current one.
    pending: Option<(Vec<T>, usize)>,
    last_row_line: Option<usize>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead, T: Float + FromStr> DataSetReader<R, T> {
    pub fn new(input: R, source_name: impl Into<String>) -> Self {
        Self {
            input,
            ctx: ParseContext::new(source_name),
            pending: None,
            last_row_line: None,
            buf: Vec::new(),
            done: false,
        }
    }

    pub fn context(&self) -> &ParseContext {
        &self.ctx
    }

    /// Next non-empty row with the line it sits on, or `None` at end of input.
    fn next_row(&mut self) -> Result<Option<(Vec<T>, usize)>> {
        loop {
            self.buf.clear();
            if self.input.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.ctx.line += 1;
            let text = std::str::from_utf8(&self.buf)
                .map_err(|_| self.ctx.error(None, "Expected a number."))?;
            let content = match text.find(COMMENT) {
                Some(pos) => &text[..pos],
                None => text,
            };
            let row = content
                .split_whitespace()
                .map(|tok| self.ctx.parse_scalar::<T>(tok))
                .collect::<Result<Vec<T>>>()?;
            if !row.is_empty() {
                return Ok(Some((row, self.ctx.line)));
            }
        }
    }

    fn read_data_set(&mut self) -> Result<Option<DataSet<T>>> {
        let mut samples = Vec::new();
        let mut first_line = 0;
        if let Some((row, line)) = self.pending.take() {
            samples.push(row);
            first_line = line;
            self.last_row_line = Some(line);
        }
        while let Some((row, line)) = self.next_row()? {
            let gap = self.last_row_line.map_or(1, |prev| line - prev);
            self.last_row_line = Some(line);
            if gap > 1 && !samples.is_empty() {
                self.pending = Some((row, line));
                return Ok(Some(DataSet { samples, first_line }));
            }
            if samples.is_empty() {
                first_line = line;
            }
            samples.push(row);
        }
        self.done = true;
        Ok((!samples.is_empty()).then_some(DataSet { samples, first_line }))
    }
}

impl<R: BufRead, T: Float + FromStr> Iterator for DataSetReader<R, T> {
    type Item = Result<DataSet<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done && self.pending.is_none() {
            return None;
        }
        match self.read_data_set() {
            Ok(Some(ds)) => Some(Ok(ds)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                self.pending = None;
                Some(Err(e))
            }
        }
    }
}

/// Read every data set from `input`.
pub fn read_data_sets<R: BufRead, T: Float + FromStr>(
    input: R,
    source_name: &str,
) -> Result<Vec<DataSet<T>>> {
    DataSetReader::new(input, source_name).collect()
}
