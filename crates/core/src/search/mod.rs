//! Incremental table search.
//!
//! Filters the rows of a rendered table as the user types, without a
//! network round-trip:
//!
//! - [`normalize`]: case folding and katakana-to-hiragana unification
//! - [`matcher`]: greedy ordered-subsequence scoring
//! - [`projector`]: searchable text and amount of a row, per table kind
//! - [`filter`]: the per-keystroke pass and the aggregate summary
//! - [`page`]: adapter that applies a pass to an owned page model

pub mod filter;
pub mod matcher;
pub mod normalize;
pub mod page;
pub mod projector;

pub use filter::{AggregateSummary, FilterEngine, FilterOutcome, MatchResult, SummaryLocale, format_summary};
pub use matcher::score;
pub use normalize::normalize;
pub use page::{ClearControl, SearchController, SearchPage, SummaryElement, TableRow};
pub use projector::{Projection, TableKind, parse_amount, project};
