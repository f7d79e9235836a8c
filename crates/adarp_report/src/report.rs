use rust_xlsxwriter::{ColNum, RowNum};

use crate::{
    error::ReportError,
    range::DataRows,
    run_log::RunLog,
    schema::{ColumnSchema, SUMMARY_NUMBER_FORMAT, SummaryStatistic},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    #[default]
    None,
    Top,
    Bottom,
    TopBottom,
}

impl Border {
    fn for_summary_row(index: usize, count: usize) -> Self {
        match (index == 0, index + 1 == count) {
            (true, true) => Border::TopBottom,
            (true, false) => Border::Top,
            (false, true) => Border::Bottom,
            (false, false) => Border::None,
        }
    }

    pub fn has_top(&self) -> bool {
        matches!(self, Border::Top | Border::TopBottom)
    }

    pub fn has_bottom(&self) -> bool {
        matches!(self, Border::Bottom | Border::TopBottom)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellStyle {
    pub bold: bool,
    pub align: Align,
    pub border: Border,
    pub number_format: Option<String>,
}

impl CellStyle {
    fn plain(align: Align) -> Self {
        Self {
            align,
            ..Self::default()
        }
    }

    fn bold(align: Align) -> Self {
        Self {
            bold: true,
            align,
            ..Self::default()
        }
    }

    fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    fn with_number_format(mut self, number_format: Option<&str>) -> Self {
        self.number_format = number_format.map(String::from);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Formula(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            CellValue::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn as_formula(&self) -> Option<&str> {
        match &self.value {
            CellValue::Formula(formula) => Some(formula),
            _ => None,
        }
    }
}

/// In-memory spreadsheet built from a run log: a header row, one row per run
/// and one row per requested summary statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    column_widths: Vec<f64>,
    rows: Vec<Vec<Cell>>,
    data_rows: DataRows,
}

impl ReportDocument {
    /// Fails when the log or the schema does not fit in a worksheet.
    pub fn build(log: &RunLog, schema: &ColumnSchema) -> Result<Self, ReportError> {
        let columns = schema.columns();
        // The index column comes first, metric columns end at `columns.len()`
        ColNum::try_from(columns.len() + 1).map_err(|_| {
            ReportError::InvalidSchema(format!("{} metric columns do not fit a sheet", columns.len()))
        })?;
        let run_count = RowNum::try_from(log.len()).map_err(|_| {
            ReportError::InvalidSchema(format!("{} runs do not fit a sheet", log.len()))
        })?;
        let data_rows = DataRows::new(1, run_count);

        let mut rows = Vec::with_capacity(1 + log.len() + schema.summaries().len());

        let mut header = Vec::with_capacity(columns.len() + 1);
        header.push(Cell {
            value: CellValue::Text(String::from(schema.index_label())),
            style: CellStyle::bold(Align::Center),
        });
        header.extend(columns.iter().map(|column| Cell {
            value: CellValue::Text(column.label.clone()),
            style: CellStyle::bold(Align::Right),
        }));
        rows.push(header);

        for record in log.records() {
            let mut row = Vec::with_capacity(columns.len() + 1);
            row.push(Cell {
                value: CellValue::Number(record.run() as f64),
                style: CellStyle::plain(Align::Center),
            });
            row.extend(
                record
                    .values()
                    .iter()
                    .zip(columns)
                    .map(|(value, column)| Cell {
                        value: CellValue::Number(*value),
                        style: CellStyle::plain(Align::Right)
                            .with_number_format(column.number_format.as_deref()),
                    }),
            );
            rows.push(row);
        }

        let summaries = schema.summaries();
        for (index, statistic) in summaries.iter().enumerate() {
            let border = Border::for_summary_row(index, summaries.len());
            rows.push(summary_row(*statistic, schema, data_rows, border));
        }

        let mut column_widths = Vec::with_capacity(columns.len() + 1);
        column_widths.push(schema.index_width());
        column_widths.extend(columns.iter().map(|column| column.width));

        Ok(Self {
            column_widths,
            rows,
            data_rows,
        })
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn column_widths(&self) -> &[f64] {
        &self.column_widths
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|row| row.get(column))
    }

    /// Rows below the data block, one per summary statistic.
    pub fn summary_rows(&self) -> &[Vec<Cell>] {
        &self.rows[self.data_rows.end() as usize..]
    }
}

fn summary_row(
    statistic: SummaryStatistic,
    schema: &ColumnSchema,
    data_rows: DataRows,
    border: Border,
) -> Vec<Cell> {
    let mut row = Vec::with_capacity(schema.arity() + 1);
    row.push(Cell {
        value: CellValue::Text(String::from(statistic.label())),
        style: CellStyle::bold(Align::Center).with_border(border),
    });

    row.extend((1..).zip(schema.columns()).map(|(sheet_column, column)| {
        let number_format = if statistic.keeps_column_format() {
            column.number_format.as_deref()
        } else {
            Some(SUMMARY_NUMBER_FORMAT)
        };

        Cell {
            value: CellValue::Formula(data_rows.formula(statistic.function(), sheet_column)),
            style: CellStyle::bold(Align::Right)
                .with_border(border)
                .with_number_format(number_format),
        }
    }));

    row
}

#[cfg(test)]
mod tests {
    use crate::schema::Column;

    use super::*;

    fn example_schema() -> ColumnSchema {
        ColumnSchema::new(
            vec![
                Column::new("A", 10.0, "0"),
                Column::new("B", 10.0, "0.00"),
                Column::new("C", 10.0, "0"),
                Column::new("D", 10.0, "0.00"),
            ],
            &[SummaryStatistic::Min, SummaryStatistic::Avg],
        )
        .unwrap()
    }

    fn formulas(row: &[Cell]) -> Vec<&str> {
        row.iter().skip(1).filter_map(Cell::as_formula).collect()
    }

    #[test]
    fn test_worked_example() {
        let log = RunLog::parse("header\n10;20.5;30;2.1\n12;18.0;29;1.9\n", 4)
            .unwrap()
            .unwrap();
        let document = ReportDocument::build(&log, &example_schema()).unwrap();

        assert_eq!(document.row_count(), 5);
        assert_eq!(document.column_count(), 5);

        assert_eq!(document.cell(0, 0).unwrap().as_text(), Some("#Run"));
        assert_eq!(document.cell(0, 2).unwrap().as_text(), Some("B"));

        let first: Vec<f64> = document.rows()[1].iter().filter_map(Cell::as_number).collect();
        assert_eq!(first, vec![1.0, 10.0, 20.5, 30.0, 2.1]);
        let second: Vec<f64> = document.rows()[2].iter().filter_map(Cell::as_number).collect();
        assert_eq!(second, vec![2.0, 12.0, 18.0, 29.0, 1.9]);

        assert_eq!(document.cell(3, 0).unwrap().as_text(), Some("Min"));
        assert_eq!(
            formulas(&document.rows()[3]),
            vec!["=MIN(B2:B3)", "=MIN(C2:C3)", "=MIN(D2:D3)", "=MIN(E2:E3)"]
        );
        assert_eq!(document.cell(4, 0).unwrap().as_text(), Some("Avg"));
        assert_eq!(
            formulas(&document.rows()[4]),
            vec![
                "=AVERAGE(B2:B3)",
                "=AVERAGE(C2:C3)",
                "=AVERAGE(D2:D3)",
                "=AVERAGE(E2:E3)"
            ]
        );
    }

    #[test]
    fn test_shape_with_all_summaries() {
        let schema = ColumnSchema::grasp();
        let text = "TT;ERT;Best;Init;CPU (min);Best iteration;Best alpha;Best seed\n\
                    1;2;3;4;5;6;7;8\n\
                    1;2;3;4;5;6;7;8\n\
                    1;2;3;4;5;6;7;8\n";
        let log = RunLog::parse(text, schema.arity()).unwrap().unwrap();
        let document = ReportDocument::build(&log, &schema).unwrap();

        assert_eq!(document.row_count(), 1 + 3 + 4);
        assert!(document.rows().iter().all(|row| row.len() == 9));

        let labels: Vec<&str> = document
            .summary_rows()
            .iter()
            .filter_map(|row| row[0].as_text())
            .collect();
        assert_eq!(labels, vec!["Min", "Max", "Avg", "SD"]);

        // Every formula covers rows 2..=N+1 of its own column
        for row in document.summary_rows() {
            for (column, cell) in row.iter().enumerate().skip(1) {
                let letter = rust_xlsxwriter::column_number_to_name(column as ColNum);
                let formula = cell.as_formula().unwrap();
                assert!(
                    formula.ends_with(&format!("({letter}2:{letter}4)")),
                    "{formula}"
                );
            }
        }

        assert_eq!(
            document.cell(7, 8).unwrap().as_formula(),
            Some("=STDEV(I2:I4)")
        );
    }

    #[test]
    fn test_run_numbers_follow_log_order() {
        let log = RunLog::parse("h\n9;9;9;9\n1;1;1;1\n5;5;5;5\n", 4)
            .unwrap()
            .unwrap();
        let document = ReportDocument::build(&log, &example_schema()).unwrap();

        let runs: Vec<f64> = (1..=3)
            .map(|row| document.cell(row, 0).unwrap().as_number().unwrap())
            .collect();
        let values: Vec<f64> = (1..=3)
            .map(|row| document.cell(row, 1).unwrap().as_number().unwrap())
            .collect();

        assert_eq!(runs, vec![1.0, 2.0, 3.0]);
        assert_eq!(values, vec![9.0, 1.0, 5.0]);
    }

    #[test]
    fn test_styles() {
        let log = RunLog::parse("h\n1;2;3;4\n", 4).unwrap().unwrap();
        let document = ReportDocument::build(&log, &example_schema()).unwrap();

        let header_index = &document.cell(0, 0).unwrap().style;
        assert!(header_index.bold);
        assert_eq!(header_index.align, Align::Center);
        let header_metric = &document.cell(0, 1).unwrap().style;
        assert!(header_metric.bold);
        assert_eq!(header_metric.align, Align::Right);

        let run = &document.cell(1, 0).unwrap().style;
        assert!(!run.bold);
        assert_eq!(run.align, Align::Center);
        let value = &document.cell(1, 2).unwrap().style;
        assert_eq!(value.align, Align::Right);
        assert_eq!(value.number_format.as_deref(), Some("0.00"));

        let min = &document.cell(2, 1).unwrap().style;
        assert!(min.bold);
        assert_eq!(min.border, Border::Top);
        assert_eq!(min.number_format.as_deref(), Some("0"));

        let avg = &document.cell(3, 1).unwrap().style;
        assert_eq!(avg.border, Border::Bottom);
        assert_eq!(avg.number_format.as_deref(), Some(SUMMARY_NUMBER_FORMAT));
    }

    #[test]
    fn test_single_summary_row_has_both_borders() {
        let schema =
            ColumnSchema::new(vec![Column::new("A", 10.0, "0")], &[SummaryStatistic::Max]).unwrap();
        let log = RunLog::parse("h\n1\n", 1).unwrap().unwrap();
        let document = ReportDocument::build(&log, &schema).unwrap();

        let border = document.cell(2, 0).unwrap().style.border;
        assert_eq!(border, Border::TopBottom);
        assert!(border.has_top() && border.has_bottom());
    }

    #[test]
    fn test_empty_log() {
        let log = RunLog::parse("header\n", 4).unwrap().unwrap();
        let document = ReportDocument::build(&log, &example_schema()).unwrap();

        assert_eq!(document.row_count(), 3);
        assert_eq!(document.column_count(), 5);
        assert_eq!(
            formulas(&document.rows()[1]),
            vec!["=MIN(#REF!)"; 4]
        );
        assert_eq!(
            formulas(&document.rows()[2]),
            vec!["=AVERAGE(#REF!)"; 4]
        );
    }

    #[test]
    fn test_columns_beyond_sheet_indexes() {
        let columns = (0..=ColNum::MAX as usize)
            .map(|i| Column::new(&format!("M{i}"), 10.0, "0"))
            .collect::<Vec<_>>();
        let arity = columns.len();
        let schema = ColumnSchema::new(columns, &[SummaryStatistic::Min]).unwrap();
        let log = RunLog::parse("header\n", arity).unwrap().unwrap();

        assert!(matches!(
            ReportDocument::build(&log, &schema),
            Err(ReportError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_build_is_deterministic() {
        let log = RunLog::parse("h\n1;2;3;4\n5;6;7;8\n", 4).unwrap().unwrap();
        let schema = example_schema();

        assert_eq!(
            ReportDocument::build(&log, &schema).unwrap(),
            ReportDocument::build(&log, &schema).unwrap()
        );
    }
}
