use std::{fmt::Display, path::Path, str::FromStr};

use serde::Deserialize;

use crate::error::ReportError;

pub const DEFAULT_INDEX_LABEL: &str = "#Run";
pub const DEFAULT_INDEX_WIDTH: f64 = 6.0;
pub const DEFAULT_COLUMN_WIDTH: f64 = 10.0;

/// Number format used for the Avg and SD rows, whatever the column format is.
pub const SUMMARY_NUMBER_FORMAT: &str = "0.00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatistic {
    Min,
    Max,
    Avg,
    #[serde(alias = "sd")]
    StdDev,
}

impl SummaryStatistic {
    pub const ALL: [SummaryStatistic; 4] = [
        SummaryStatistic::Min,
        SummaryStatistic::Max,
        SummaryStatistic::Avg,
        SummaryStatistic::StdDev,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SummaryStatistic::Min => "Min",
            SummaryStatistic::Max => "Max",
            SummaryStatistic::Avg => "Avg",
            SummaryStatistic::StdDev => "SD",
        }
    }

    /// Spreadsheet function computing this statistic over a range.
    pub fn function(&self) -> &'static str {
        match self {
            SummaryStatistic::Min => "MIN",
            SummaryStatistic::Max => "MAX",
            SummaryStatistic::Avg => "AVERAGE",
            SummaryStatistic::StdDev => "STDEV",
        }
    }

    /// Min and Max keep the column's own format, Avg and SD are fractional.
    pub fn keeps_column_format(&self) -> bool {
        matches!(self, SummaryStatistic::Min | SummaryStatistic::Max)
    }
}

impl Display for SummaryStatistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    pub label: String,
    #[serde(default = "default_column_width")]
    pub width: f64,
    #[serde(default)]
    pub number_format: Option<String>,
}

impl Column {
    pub fn new(label: &str, width: f64, number_format: &str) -> Self {
        Self {
            label: String::from(label),
            width,
            number_format: Some(String::from(number_format)),
        }
    }
}

fn default_column_width() -> f64 {
    DEFAULT_COLUMN_WIDTH
}

fn default_index_label() -> String {
    String::from(DEFAULT_INDEX_LABEL)
}

fn default_index_width() -> f64 {
    DEFAULT_INDEX_WIDTH
}

#[derive(Deserialize)]
struct ColumnSchemaDef {
    #[serde(default = "default_index_label")]
    index_label: String,
    #[serde(default = "default_index_width")]
    index_width: f64,
    columns: Vec<Column>,
    summaries: Vec<SummaryStatistic>,
}

impl TryFrom<ColumnSchemaDef> for ColumnSchema {
    type Error = ReportError;

    fn try_from(def: ColumnSchemaDef) -> Result<Self, Self::Error> {
        if !(def.index_width.is_finite() && def.index_width > 0.0) {
            return Err(ReportError::InvalidSchema(format!(
                "index width must be positive, got {}",
                def.index_width
            )));
        }

        let mut schema = ColumnSchema::new(def.columns, &def.summaries)?;
        schema.index_label = def.index_label;
        schema.index_width = def.index_width;
        Ok(schema)
    }
}

/// Describes the metric columns of a run log and the statistics reported for them.
///
/// Summary statistics are kept in canonical order (Min, Max, Avg, SD) and
/// without duplicates, whatever order they were requested in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ColumnSchemaDef")]
pub struct ColumnSchema {
    index_label: String,
    index_width: f64,
    columns: Vec<Column>,
    summaries: Vec<SummaryStatistic>,
}

impl ColumnSchema {
    pub fn new(
        columns: Vec<Column>,
        summaries: &[SummaryStatistic],
    ) -> Result<Self, ReportError> {
        if columns.is_empty() {
            return Err(ReportError::InvalidSchema(String::from(
                "at least one metric column is required",
            )));
        }

        if summaries.is_empty() {
            return Err(ReportError::InvalidSchema(String::from(
                "at least one summary statistic is required",
            )));
        }

        if let Some(column) = columns
            .iter()
            .find(|column| !column.width.is_finite() || column.width <= 0.0)
        {
            return Err(ReportError::InvalidSchema(format!(
                "column {:?} has an invalid width {}",
                column.label, column.width
            )));
        }

        let summaries = SummaryStatistic::ALL
            .into_iter()
            .filter(|statistic| summaries.contains(statistic))
            .collect();

        Ok(Self {
            index_label: default_index_label(),
            index_width: default_index_width(),
            columns,
            summaries,
        })
    }

    /// Single instance runs of the reactive GRASP.
    pub fn grasp() -> Self {
        Self {
            index_label: default_index_label(),
            index_width: DEFAULT_INDEX_WIDTH,
            columns: vec![
                Column::new("TT", 10.0, "0.00"),
                Column::new("ERT", 10.0, "0.00"),
                Column::new("Cost", 10.0, "0.00"),
                Column::new("CPU (min)", 10.0, "0.00"),
                Column::new("Vehicles", 10.0, "0"),
                Column::new("Best iteration", 12.0, "0"),
                Column::new("Best alpha", 12.0, "0.00"),
                Column::new("Seed", 12.0, "0"),
            ],
            summaries: SummaryStatistic::ALL.to_vec(),
        }
    }

    /// Data set runs comparing the heuristic against CPLEX.
    pub fn cplex() -> Self {
        Self {
            index_label: default_index_label(),
            index_width: DEFAULT_INDEX_WIDTH,
            columns: vec![
                Column::new("Total routes", 15.0, "0"),
                Column::new("Heuristic", 15.0, "0.00"),
                Column::new("CPLEX", 15.0, "0.00"),
                Column::new("CPU (s)", 15.0, "0.00"),
            ],
            summaries: vec![SummaryStatistic::Min, SummaryStatistic::Avg],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json)
            .map_err(|error| ReportError::InvalidSchema(error.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&content)
    }

    /// Number of metric fields in every run record.
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn summaries(&self) -> &[SummaryStatistic] {
        &self.summaries
    }

    pub fn index_label(&self) -> &str {
        &self.index_label
    }

    pub fn index_width(&self) -> f64 {
        self.index_width
    }
}

/// Built-in report variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    Grasp,
    Cplex,
}

impl SchemaVariant {
    pub fn schema(&self) -> ColumnSchema {
        match self {
            SchemaVariant::Grasp => ColumnSchema::grasp(),
            SchemaVariant::Cplex => ColumnSchema::cplex(),
        }
    }
}

impl Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SchemaVariant::Grasp => "grasp",
                SchemaVariant::Cplex => "cplex",
            }
        )
    }
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grasp" | "single" => Ok(SchemaVariant::Grasp),
            "cplex" | "dataset" => Ok(SchemaVariant::Cplex),
            other => Err(format!("Unknown schema variant: {other}")),
        }
    }
}
