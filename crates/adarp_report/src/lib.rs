pub mod aggregator;
pub mod error;
pub mod range;
pub mod report;
pub mod run_log;
pub mod schema;
pub mod summary;
pub mod writer;

pub use aggregator::{generate_report, generate_report_with, report_path_for, write_report};
pub use error::{MalformedReason, ReportError};
pub use schema::{Column, ColumnSchema, SchemaVariant, SummaryStatistic};
