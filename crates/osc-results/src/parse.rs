use osc_project::UnknownIntegrator;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Missing field '{field}' (line {line})")]
    MissingField { field: &'static str, line: usize },

    #[error("Invalid value for '{field}': {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("Unexpected trailing data after {expected} fields")]
    TrailingData { expected: usize },

    #[error(transparent)]
    Integrator(#[from] UnknownIntegrator),

    #[error("Malformed header: {0:?}")]
    Header(String),

    #[error("Expected {expected} {what}, found {actual}")]
    Count {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Dynamic file declares {declared} particles but the static file declares {expected}")]
    ParticleMismatch { declared: usize, expected: usize },
}

/// Sequential reader over one-value-per-line text. Blank lines are ignored.
pub(crate) struct Fields<'a> {
    lines: Vec<&'a str>,
    read: usize,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            lines: text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect(),
            read: 0,
        }
    }

    pub(crate) fn next_str(&mut self, field: &'static str) -> Result<&'a str, ParseError> {
        let line = self.lines.get(self.read).copied();
        self.read += 1;
        line.ok_or(ParseError::MissingField {
            field,
            line: self.read,
        })
    }

    pub(crate) fn next_f64(&mut self, field: &'static str) -> Result<f64, ParseError> {
        let raw = self.next_str(field)?;
        parse_f64(raw, field)
    }

    pub(crate) fn next_usize(&mut self, field: &'static str) -> Result<usize, ParseError> {
        let raw = self.next_str(field)?;
        raw.parse().map_err(|_| ParseError::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
        })
    }

    /// Fails if any line is left unread.
    pub(crate) fn finish(self) -> Result<(), ParseError> {
        if self.read < self.lines.len() {
            Err(ParseError::TrailingData {
                expected: self.read,
            })
        } else {
            Ok(())
        }
    }
}

pub(crate) fn parse_f64(raw: &str, field: &str) -> Result<f64, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
    })
}
