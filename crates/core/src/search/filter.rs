//! Filter pass over a whole table: visibility per row plus the aggregate.
//!
//! A pass is synchronous and starts from scratch every time; nothing is
//! carried over from the previous keystroke.

use serde::{Deserialize, Serialize};

use super::matcher::score;
use super::projector::{TableKind, project};

/// Language of the rendered summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLocale {
    #[default]
    Ja,
    En,
}

/// Per-row result of a filter pass.
///
/// `score` is only meaningful when `is_match` is true; 0 is also what an
/// empty query produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MatchResult {
    /// Position of the row in the table body.
    pub row: usize,
    pub is_match: bool,
    pub score: u32,
}

/// Running total and count of visible ledger rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AggregateSummary {
    pub total: u64,
    pub count: usize,
}

/// Everything a pass decides. The caller applies it to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Visibility per row in table order. `None` marks a malformed row the
    /// pass skipped; its visibility is left as it was.
    pub visibility: Vec<Option<bool>>,
    /// One entry per row that was projected.
    pub matches: Vec<MatchResult>,
    pub summary: AggregateSummary,
    /// True when the trimmed query is non-empty.
    pub query_active: bool,
}

impl FilterOutcome {
    /// Whether the "clear query" control should be shown. Depends only on
    /// the query, never on how many rows matched.
    pub fn show_clear_control(&self) -> bool {
        self.query_active
    }

    /// Summary line to display, or `None` to hide the summary element.
    ///
    /// Hidden when the query is empty and also when the matched total is 0,
    /// even if some rows matched.
    pub fn summary_text(&self, locale: SummaryLocale) -> Option<String> {
        if !self.query_active || self.summary.total == 0 {
            return None;
        }
        Some(format_summary(&self.summary, locale))
    }
}

/// Render a summary line with thousands-grouped yen.
pub fn format_summary(summary: &AggregateSummary, locale: SummaryLocale) -> String {
    let total = group_thousands(summary.total);
    match locale {
        SummaryLocale::Ja => format!("合計: ¥{total} ({}件)", summary.count),
        SummaryLocale::En => format!("Total: ¥{total} ({} items)", summary.count),
    }
}

/// Format `value` with `,` between groups of three digits.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Stateless filter over table rows.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine;

impl FilterEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run one pass of `query` over `rows`.
    ///
    /// The query is trimmed first; an empty query shows every row. Only
    /// visible ledger rows add to the summary.
    pub fn apply<R, S>(&self, query: &str, rows: &[R], kind: TableKind) -> FilterOutcome
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let query = query.trim();
        let query_active = !query.is_empty();

        let mut visibility = Vec::with_capacity(rows.len());
        let mut matches = Vec::with_capacity(rows.len());
        let mut summary = AggregateSummary::default();

        for (index, row) in rows.iter().enumerate() {
            let Some(projection) = project(row.as_ref(), kind) else {
                visibility.push(None);
                continue;
            };

            let row_score = if query_active { score(query, &projection.text) } else { 0 };
            let visible = !query_active || row_score > 0;

            if visible && let Some(amount) = projection.amount {
                summary.total = summary.total.saturating_add(amount);
                summary.count += 1;
            }

            visibility.push(Some(visible));
            matches.push(MatchResult { row: index, is_match: visible, score: row_score });
        }

        tracing::debug!(
            query_len = query.chars().count(),
            rows = rows.len(),
            visible = matches.iter().filter(|m| m.is_match).count(),
            total = summary.total,
            "filter pass complete"
        );

        FilterOutcome { visibility, matches, summary, query_active }
    }
}
