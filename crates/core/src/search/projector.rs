//! Row projection: what part of a table row is searched and summed.

use serde::{Deserialize, Serialize};

/// Minimum cell count of a well-formed ledger row (date, category, amount, memo).
pub const LEDGER_MIN_CELLS: usize = 4;

const DATE: usize = 0;
const CATEGORY: usize = 1;
const AMOUNT: usize = 2;
const MEMO: usize = 3;

/// Shape of the table being filtered, decided once per pass from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Expense ledger: date, category, amount, memo.
    Ledger,
    /// Asset holdings: name first, numeric columns after.
    Holdings,
}

impl TableKind {
    /// Classify a table by its header row.
    ///
    /// A header containing a cell equal to `holdings_label` (surrounding
    /// whitespace ignored) marks a holdings table; anything else, including
    /// a missing header, is a ledger.
    pub fn classify<S: AsRef<str>>(header: &[S], holdings_label: &str) -> Self {
        if header.iter().any(|cell| cell.as_ref().trim() == holdings_label) {
            TableKind::Holdings
        } else {
            TableKind::Ledger
        }
    }
}

/// Searchable text of a row plus its contribution to the running total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub text: String,
    /// `None` for rows that never contribute (holdings).
    pub amount: Option<u64>,
}

/// Project a row for the given table kind.
///
/// Returns `None` for a ledger row with fewer than [`LEDGER_MIN_CELLS`]
/// cells; such rows are skipped rather than reported. A holdings row with no
/// cells projects to empty text.
pub fn project<S: AsRef<str>>(cells: &[S], kind: TableKind) -> Option<Projection> {
    match kind {
        TableKind::Holdings => {
            let text = cells.first().map(|c| c.as_ref().to_string()).unwrap_or_default();
            Some(Projection { text, amount: None })
        }
        TableKind::Ledger => {
            if cells.len() < LEDGER_MIN_CELLS {
                return None;
            }
            // The amount column is summed, never searched.
            let text = [DATE, CATEGORY, MEMO]
                .iter()
                .map(|&i| cells[i].as_ref())
                .collect::<Vec<_>>()
                .join(" ");
            Some(Projection { text, amount: Some(parse_amount(cells[AMOUNT].as_ref())) })
        }
    }
}

/// Parse a displayed amount such as `¥12,345` by dropping every non-digit.
///
/// Anything that does not leave a parseable number (no digits, overflow)
/// counts as 0.
pub fn parse_amount(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_holdings_header() {
        let header = ["銘柄", "数量", "評価額"];
        assert_eq!(TableKind::classify(&header, "銘柄"), TableKind::Holdings);
    }

    #[test]
    fn test_classify_ledger_header() {
        let header = ["日付", "費目", "金額", "メモ"];
        assert_eq!(TableKind::classify(&header, "銘柄"), TableKind::Ledger);
    }

    #[test]
    fn test_classify_trims_header_cells() {
        let header = vec![" 銘柄 ".to_string()];
        assert_eq!(TableKind::classify(&header, "銘柄"), TableKind::Holdings);
    }

    #[test]
    fn test_classify_missing_header_is_ledger() {
        let header: [&str; 0] = [];
        assert_eq!(TableKind::classify(&header, "銘柄"), TableKind::Ledger);
    }

    #[test]
    fn test_ledger_projection_excludes_amount_from_text() {
        let row = ["2024-05-01", "食費", "¥1,200", "ランチ"];
        let projection = project(&row, TableKind::Ledger).unwrap();
        assert_eq!(projection.text, "2024-05-01 食費 ランチ");
        assert_eq!(projection.amount, Some(1200));
    }

    #[test]
    fn test_ledger_projection_keeps_empty_memo() {
        let row = ["2024-05-02", "交通費", "¥300", ""];
        let projection = project(&row, TableKind::Ledger).unwrap();
        assert_eq!(projection.text, "2024-05-02 交通費 ");
    }

    #[test]
    fn test_short_ledger_row_is_skipped() {
        let row = ["2024-05-01", "食費", "¥1,200"];
        assert_eq!(project(&row, TableKind::Ledger), None);
    }

    #[test]
    fn test_holdings_projection_uses_first_cell_only() {
        let row = ["VTI", "12", "$250"];
        let projection = project(&row, TableKind::Holdings).unwrap();
        assert_eq!(projection.text, "VTI");
        assert_eq!(projection.amount, None);
    }

    #[test]
    fn test_holdings_row_without_cells() {
        let row: [&str; 0] = [];
        let projection = project(&row, TableKind::Holdings).unwrap();
        assert_eq!(projection.text, "");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("¥12,345"), 12345);
        assert_eq!(parse_amount("300"), 300);
        assert_eq!(parse_amount("n/a"), 0);
        assert_eq!(parse_amount(""), 0);
        assert_eq!(parse_amount("99999999999999999999999"), 0);
    }
}
