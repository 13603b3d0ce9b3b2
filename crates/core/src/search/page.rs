//! Page adapter: applies filter passes to an owned model of the page.
//!
//! Every element of the page is optional. A missing element disables only
//! the behavior that needs it; the rest of the page keeps working.

use super::filter::{FilterEngine, FilterOutcome, SummaryLocale};
use super::projector::TableKind;

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub visible: bool,
}

impl TableRow {
    pub fn new<S: Into<String>>(cells: impl IntoIterator<Item = S>) -> Self {
        Self { cells: cells.into_iter().map(Into::into).collect(), visible: true }
    }
}

/// Summary display element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryElement {
    pub text: String,
    pub visible: bool,
}

/// "Clear query" control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearControl {
    pub visible: bool,
}

/// The search-related part of a page.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Current value of the query input, if the page has one.
    pub query_input: Option<String>,
    pub header: Option<Vec<String>>,
    pub rows: Option<Vec<TableRow>>,
    pub summary: Option<SummaryElement>,
    pub clear_control: Option<ClearControl>,
}

/// Wires input events on a [`SearchPage`] to the [`FilterEngine`].
#[derive(Debug, Clone)]
pub struct SearchController {
    engine: FilterEngine,
    holdings_label: String,
    locale: SummaryLocale,
}

impl SearchController {
    pub fn new(holdings_label: impl Into<String>, locale: SummaryLocale) -> Self {
        Self { engine: FilterEngine::new(), holdings_label: holdings_label.into(), locale }
    }

    /// Table kind of `page`, decided from its header.
    pub fn table_kind(&self, page: &SearchPage) -> TableKind {
        match &page.header {
            Some(header) => TableKind::classify(header.as_slice(), &self.holdings_label),
            None => TableKind::Ledger,
        }
    }

    /// Handle an input event: re-run the filter with the current query.
    ///
    /// Returns `None` when the page has no query input, in which case
    /// nothing is touched.
    pub fn on_input(&self, page: &mut SearchPage) -> Option<FilterOutcome> {
        let query = page.query_input.clone()?;
        let kind = self.table_kind(page);

        let outcome = match page.rows.as_deref() {
            Some(rows) => {
                let cells: Vec<&[String]> = rows.iter().map(|r| r.cells.as_slice()).collect();
                self.engine.apply(&query, &cells, kind)
            }
            None => self.engine.apply::<&[String], String>(&query, &[], kind),
        };

        self.render(page, &outcome);
        Some(outcome)
    }

    /// Handle a click on the clear control: empty the query and re-filter.
    pub fn on_clear(&self, page: &mut SearchPage) -> Option<FilterOutcome> {
        if let Some(query) = page.query_input.as_mut() {
            query.clear();
        }
        self.on_input(page)
    }

    fn render(&self, page: &mut SearchPage, outcome: &FilterOutcome) {
        if let Some(rows) = page.rows.as_mut() {
            for (row, visible) in rows.iter_mut().zip(&outcome.visibility) {
                if let Some(visible) = visible {
                    row.visible = *visible;
                }
            }
        }

        if let Some(summary) = page.summary.as_mut() {
            match outcome.summary_text(self.locale) {
                Some(text) => {
                    summary.text = text;
                    summary.visible = true;
                }
                None => {
                    summary.text.clear();
                    summary.visible = false;
                }
            }
        }

        if let Some(clear) = page.clear_control.as_mut() {
            clear.visible = outcome.show_clear_control();
        }
    }
}
