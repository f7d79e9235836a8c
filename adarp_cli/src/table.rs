use adarp_report::SummaryStatistic;
use comfy_table::{CellAlignment, Table, presets::UTF8_FULL};

use crate::batch::BatchOutcome;

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |value| format!("{value:.2}"))
}

/// Terminal version of the summary block of a report.
pub fn summary_table(outcome: &BatchOutcome, statistics: &[SummaryStatistic]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec![String::new()];
    header.extend(outcome.summaries.iter().map(|summary| summary.label.clone()));
    table.set_header(header);

    for statistic in statistics {
        let mut row = vec![String::from(statistic.label())];
        row.extend(
            outcome
                .summaries
                .iter()
                .map(|summary| format_value(summary.get(*statistic))),
        );
        table.add_row(row);
    }

    for column in table.column_iter_mut().skip(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    table
}
