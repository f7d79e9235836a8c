//! Summary statistics computed in-process, mirroring the spreadsheet formulas.
//!
//! A value is `None` where the matching spreadsheet formula evaluates to an
//! error: every statistic for an empty column, and the sample standard
//! deviation (`STDEV`) for fewer than two runs.

use crate::{run_log::RunLog, schema::SummaryStatistic};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub label: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub std_dev: Option<f64>,
}

impl ColumnSummary {
    pub fn get(&self, statistic: SummaryStatistic) -> Option<f64> {
        match statistic {
            SummaryStatistic::Min => self.min,
            SummaryStatistic::Max => self.max,
            SummaryStatistic::Avg => self.avg,
            SummaryStatistic::StdDev => self.std_dev,
        }
    }
}

pub fn summarize_values(label: &str, values: &[f64]) -> ColumnSummary {
    if values.is_empty() {
        return ColumnSummary {
            label: String::from(label),
            min: None,
            max: None,
            avg: None,
            std_dev: None,
        };
    }

    let n = values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / n;

    let std_dev = if values.len() < 2 {
        None
    } else {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(variance.sqrt())
    };

    ColumnSummary {
        label: String::from(label),
        min: Some(min),
        max: Some(max),
        avg: Some(mean),
        std_dev,
    }
}

/// One summary per metric column of the log, labelled from `labels`.
pub fn summarize<S: AsRef<str>>(log: &RunLog, labels: &[S]) -> Vec<ColumnSummary> {
    labels
        .iter()
        .enumerate()
        .map(|(column, label)| {
            let values: Vec<f64> = log.column(column).collect();
            summarize_values(label.as_ref(), &values)
        })
        .collect()
}
