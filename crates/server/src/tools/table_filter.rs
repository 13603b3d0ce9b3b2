//! table_filter tool implementation.
//!
//! Runs one incremental-search pass over a table supplied by the caller and
//! reports what the page would show.

use kakei_core::search::{ClearControl, MatchResult, SearchController, SearchPage, SummaryElement, TableRow};
use kakei_core::{AppConfig, SummaryLocale, TableKind};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the table_filter tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableFilterParams {
    /// The search query as typed. Surrounding whitespace is ignored.
    pub query: String,

    /// Header cells. Omit for a ledger table.
    #[serde(default)]
    pub header: Option<Vec<String>>,

    /// Body rows, one array of cell texts per row.
    pub rows: Vec<Vec<String>>,

    /// Summary language: "ja" (default from config) or "en".
    #[serde(default)]
    pub locale: Option<SummaryLocale>,
}

/// Output structure for the table_filter tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableFilterOutput {
    pub table_kind: TableKind,
    /// Per-row visibility; `null` for rows too short to project, which keep
    /// whatever visibility they had.
    pub visibility: Vec<Option<bool>>,
    /// Matching rows with their scores, in table order.
    pub matches: Vec<MatchResult>,
    /// Sum of matched amounts.
    pub total: u64,
    /// Number of matched ledger rows.
    pub count: usize,
    /// Summary line, or `null` when the summary is hidden.
    pub summary_text: Option<String>,
    pub show_clear_control: bool,
}

/// Implementation of the table_filter tool.
pub fn filter_impl(config: &AppConfig, params: TableFilterParams) -> Result<CallToolResult, McpError> {
    let locale = params.locale.unwrap_or(config.summary_locale);
    let controller = SearchController::new(config.holdings_label.clone(), locale);

    let mut page = SearchPage {
        query_input: Some(params.query),
        header: params.header,
        rows: Some(params.rows.into_iter().map(TableRow::new).collect()),
        summary: Some(SummaryElement::default()),
        clear_control: Some(ClearControl::default()),
    };

    let table_kind = controller.table_kind(&page);
    let Some(outcome) = controller.on_input(&mut page) else {
        return Err(kakei_core::Error::InvalidInput("query input missing".into()).into());
    };

    let output = TableFilterOutput {
        table_kind,
        visibility: outcome.visibility.clone(),
        matches: outcome.matches.iter().filter(|m| m.is_match).copied().collect(),
        total: outcome.summary.total,
        count: outcome.summary.count,
        summary_text: page.summary.filter(|s| s.visible).map(|s| s.text),
        show_clear_control: page.clear_control.is_some_and(|c| c.visible),
    };

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::result_json;

    fn ledger_rows() -> Vec<Vec<String>> {
        [
            ["2024-05-01", "食費", "¥1,200", "ランチ"],
            ["2024-05-02", "交通費", "¥300", "バス"],
            ["2024-05-03", "食費", "¥800", "ディナー"],
        ]
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
    }

    fn params(query: &str) -> TableFilterParams {
        TableFilterParams {
            query: query.to_string(),
            header: Some(vec!["日付".into(), "費目".into(), "金額".into(), "メモ".into()]),
            rows: ledger_rows(),
            locale: None,
        }
    }

    #[test]
    fn test_filter_ledger_summary() {
        let result = filter_impl(&AppConfig::default(), params("食費")).unwrap();
        let json = result_json(&result);

        assert_eq!(json["table_kind"], "ledger");
        assert_eq!(json["visibility"], serde_json::json!([true, false, true]));
        assert_eq!(json["total"], 2000);
        assert_eq!(json["count"], 2);
        assert_eq!(json["summary_text"], "合計: ¥2,000 (2件)");
        assert_eq!(json["show_clear_control"], true);
        assert_eq!(json["matches"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_filter_locale_override() {
        let mut p = params("食費");
        p.locale = Some(SummaryLocale::En);
        let json = result_json(&filter_impl(&AppConfig::default(), p).unwrap());
        assert_eq!(json["summary_text"], "Total: ¥2,000 (2 items)");
    }

    #[test]
    fn test_filter_empty_query_shows_everything() {
        let json = result_json(&filter_impl(&AppConfig::default(), params("   ")).unwrap());
        assert_eq!(json["visibility"], serde_json::json!([true, true, true]));
        assert!(json["summary_text"].is_null());
        assert_eq!(json["show_clear_control"], false);
        let matches = json["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 3);
        assert!(matches.iter().all(|m| m["score"] == 0));
    }

    #[test]
    fn test_filter_holdings_table() {
        let p = TableFilterParams {
            query: "とよた".into(),
            header: Some(vec!["銘柄".into(), "数量".into()]),
            rows: vec![vec!["トヨタ自動車".into(), "100".into()], vec!["ソニー".into(), "50".into()]],
            locale: None,
        };
        let json = result_json(&filter_impl(&AppConfig::default(), p).unwrap());

        assert_eq!(json["table_kind"], "holdings");
        assert_eq!(json["visibility"], serde_json::json!([true, false]));
        assert!(json["summary_text"].is_null());
    }

    #[test]
    fn test_filter_malformed_row_is_untouched() {
        let mut p = params("食費");
        p.rows.push(vec!["2024-05-04".into()]);
        let json = result_json(&filter_impl(&AppConfig::default(), p).unwrap());
        assert_eq!(json["visibility"][3], serde_json::Value::Null);
        assert_eq!(json["count"], 2);
    }
}
