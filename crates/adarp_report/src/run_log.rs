use std::path::Path;

use tracing::debug;

use crate::error::{MalformedReason, ReportError};

pub const FIELD_DELIMITER: char = ';';

/// Metrics of a single solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    run: usize,
    line: usize,
    values: Vec<f64>,
}

impl RunRecord {
    /// 1-based run number, in log order.
    pub fn run(&self) -> usize {
        self.run
    }

    /// 1-based line of the log this record was read from.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunLog {
    records: Vec<RunRecord>,
}

impl RunLog {
    /// Parses a run log, the first line being the header. The header text is
    /// not kept, labels come from the column schema.
    ///
    /// Returns `Ok(None)` when the text has no line at all.
    pub fn parse(text: &str, arity: usize) -> Result<Option<Self>, ReportError> {
        let mut lines = text.lines();

        if lines.next().is_none() {
            return Ok(None);
        }

        let records = lines
            .enumerate()
            .map(|(index, line)| {
                // The header is line 1
                let line_number = index + 2;
                parse_record(line, arity, line_number).map(|values| RunRecord {
                    run: index + 1,
                    line: line_number,
                    values,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Self { records }))
    }

    pub fn from_file<P: AsRef<Path>>(path: P, arity: usize) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ReportError::FileNotFound(path.to_path_buf())
            } else {
                ReportError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let log =
            Self::parse(&text, arity)?.ok_or_else(|| ReportError::EmptyLog(path.to_path_buf()))?;

        debug!("Read {} runs from {:?}", log.len(), path);

        Ok(log)
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of the zero-based metric column across all runs.
    pub fn column(&self, column: usize) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(move |record| record.values[column])
    }
}

fn parse_record(line: &str, arity: usize, line_number: usize) -> Result<Vec<f64>, ReportError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();

    if fields.len() != arity {
        return Err(ReportError::MalformedRecord {
            line: line_number,
            reason: MalformedReason::FieldCount {
                expected: arity,
                found: fields.len(),
            },
        });
    }

    fields
        .iter()
        .enumerate()
        .map(|(column, field)| {
            field
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| ReportError::MalformedRecord {
                    line: line_number,
                    reason: MalformedReason::NotNumeric {
                        column: column + 1,
                        value: String::from(*field),
                    },
                })
        })
        .collect()
}
