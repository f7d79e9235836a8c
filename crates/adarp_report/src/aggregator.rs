use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    error::ReportError,
    report::ReportDocument,
    run_log::RunLog,
    schema::ColumnSchema,
    writer::{ReportWriter, XlsxReportWriter},
};

/// Extension of a run log still being written by the solver.
pub const LOG_EXTENSION: &str = "temp";
pub const REPORT_EXTENSION: &str = "xlsx";

/// Path of the report generated from `log_path`.
///
/// A `.temp` extension is replaced by `.xlsx`; any other file name gets
/// `.xlsx` appended so the log itself is never overwritten.
pub fn report_path_for(log_path: &Path) -> PathBuf {
    if log_path
        .extension()
        .is_some_and(|extension| extension == LOG_EXTENSION)
    {
        return log_path.with_extension(REPORT_EXTENSION);
    }

    let mut file_name = log_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    file_name.push(".");
    file_name.push(REPORT_EXTENSION);

    log_path.with_file_name(file_name)
}

/// Turns a finished run log into an `.xlsx` report next to it and returns the
/// report path. The log is left untouched.
pub fn generate_report(log_path: &Path, schema: &ColumnSchema) -> Result<PathBuf, ReportError> {
    generate_report_with(log_path, schema, &XlsxReportWriter::default())
}

pub fn generate_report_with<W: ReportWriter>(
    log_path: &Path,
    schema: &ColumnSchema,
    writer: &W,
) -> Result<PathBuf, ReportError> {
    let log = RunLog::from_file(log_path, schema.arity())?;
    write_report(&log, log_path, schema, writer)
}

/// Writes the report of an already parsed run log read from `log_path`.
pub fn write_report<W: ReportWriter>(
    log: &RunLog,
    log_path: &Path,
    schema: &ColumnSchema,
    writer: &W,
) -> Result<PathBuf, ReportError> {
    let document = ReportDocument::build(log, schema)?;

    let report_path = report_path_for(log_path);
    writer.write(&document, &report_path)?;

    info!(
        "Report with {} runs written to {:?}",
        log.len(),
        report_path
    );

    Ok(report_path)
}
