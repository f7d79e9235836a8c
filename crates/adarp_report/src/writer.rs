use std::path::Path;

use rust_xlsxwriter::{
    DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, XlsxError,
};
use tracing::debug;

use crate::{
    error::ReportError,
    report::{Align, CellStyle, CellValue, ReportDocument},
};

pub const DEFAULT_SHEET_NAME: &str = "Runs";

pub trait ReportWriter {
    fn write(&self, document: &ReportDocument, path: &Path) -> Result<(), ReportError>;
}

/// Writes a report as a single sheet `.xlsx` workbook.
///
/// The document creation time is pinned so that the same document always
/// produces the same bytes.
pub struct XlsxReportWriter {
    sheet_name: String,
}

impl Default for XlsxReportWriter {
    fn default() -> Self {
        Self {
            sheet_name: String::from(DEFAULT_SHEET_NAME),
        }
    }
}

impl XlsxReportWriter {
    pub fn to_buffer(&self, document: &ReportDocument) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = self.workbook(document)?;
        workbook.save_to_buffer()
    }

    fn workbook(&self, document: &ReportDocument) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();

        let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
        let properties = DocProperties::new().set_creation_datetime(&created);
        workbook.set_properties(&properties);

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        // `ReportDocument::build` guarantees rows and columns fit the sheet indexes
        for (column, width) in (0..).zip(document.column_widths()) {
            worksheet.set_column_width(column, *width)?;
        }

        for (row, cells) in (0..).zip(document.rows()) {
            for (column, cell) in (0..).zip(cells) {
                let format = to_format(&cell.style);

                match &cell.value {
                    CellValue::Text(text) => {
                        worksheet.write_string_with_format(row, column, text, &format)?;
                    }
                    CellValue::Number(number) => {
                        worksheet.write_number_with_format(row, column, *number, &format)?;
                    }
                    CellValue::Formula(formula) => {
                        worksheet.write_formula_with_format(
                            row,
                            column,
                            formula.as_str(),
                            &format,
                        )?;
                    }
                }
            }
        }

        Ok(workbook)
    }
}

impl ReportWriter for XlsxReportWriter {
    fn write(&self, document: &ReportDocument, path: &Path) -> Result<(), ReportError> {
        let to_error = |source| ReportError::WriteFailure {
            path: path.to_path_buf(),
            source,
        };

        let mut workbook = self.workbook(document).map_err(to_error)?;
        workbook.save(path).map_err(to_error)?;

        debug!(
            "Wrote {} rows x {} columns to {:?}",
            document.row_count(),
            document.column_count(),
            path
        );

        Ok(())
    }
}

fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new().set_align(match style.align {
        Align::Left => FormatAlign::Left,
        Align::Center => FormatAlign::Center,
        Align::Right => FormatAlign::Right,
    });

    if style.bold {
        format = format.set_bold();
    }

    if style.border.has_top() {
        format = format.set_border_top(FormatBorder::Medium);
    }

    if style.border.has_bottom() {
        format = format.set_border_bottom(FormatBorder::Medium);
    }

    if let Some(number_format) = &style.number_format {
        format = format.set_num_format(number_format);
    }

    format
}
