use rust_xlsxwriter::{ColNum, RowNum, row_col_to_cell};

/// The contiguous block of data rows of a report, in zero-based row indexes.
///
/// Ranges for summary formulas are always derived from the column of the
/// cell that holds the formula, so a formula can only reference its own column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRows {
    first: RowNum,
    count: RowNum,
}

impl DataRows {
    pub fn new(first: RowNum, count: RowNum) -> Self {
        Self { first, count }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Zero-based index of the first row after the data block.
    pub fn end(&self) -> RowNum {
        self.first + self.count
    }

    /// A1 range covering the data rows of `column`, or `None` when there are no rows.
    ///
    /// A single row still yields a `C2:C2` style range.
    pub fn range(&self, column: ColNum) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        Some(format!(
            "{}:{}",
            row_col_to_cell(self.first, column),
            row_col_to_cell(self.end() - 1, column)
        ))
    }

    /// Formula applying `function` to the data rows of `column`.
    ///
    /// An empty block yields `#REF!` as argument, which is still a valid
    /// formula and evaluates to an error in the spreadsheet.
    pub fn formula(&self, function: &str, column: ColNum) -> String {
        let argument = self.range(column).unwrap_or_else(|| String::from("#REF!"));
        format!("={function}({argument})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        let rows = DataRows::new(1, 2);
        assert_eq!(rows.range(1).as_deref(), Some("B2:B3"));
        assert_eq!(rows.range(4).as_deref(), Some("E2:E3"));
        assert_eq!(rows.formula("AVERAGE", 4), "=AVERAGE(E2:E3)");
    }

    #[test]
    fn test_wide_columns() {
        let rows = DataRows::new(1, 30);
        assert_eq!(rows.range(26).as_deref(), Some("AA2:AA31"));
        assert_eq!(rows.formula("MAX", 702), "=MAX(AAA2:AAA31)");
    }

    #[test]
    fn test_single_row_range() {
        let rows = DataRows::new(1, 1);
        assert_eq!(rows.formula("MIN", 2), "=MIN(C2:C2)");
    }

    #[test]
    fn test_empty_range() {
        let rows = DataRows::new(1, 0);
        assert!(rows.is_empty());
        assert_eq!(rows.range(1), None);
        assert_eq!(rows.formula("STDEV", 1), "=STDEV(#REF!)");
    }
}
