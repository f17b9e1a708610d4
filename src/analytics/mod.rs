//! Query-and-aggregate engine
//!
//! The fetcher pulls every page of a query through a [`QueryClient`], the
//! aggregator folds aggregate records into per-conversation totals, and the
//! formatter turns detail records into display summaries.
//!
//! [`QueryClient`]: crate::client::QueryClient

pub mod aggregator;
pub mod fetcher;
pub mod formatter;

pub use aggregator::{aggregate, GroupTotals, NestedAggregator, NestedTotals};
pub use fetcher::{FetchError, FetchOutcome, Fetcher};
pub use formatter::{ConversationSummary, ParticipantSummary, NOT_AVAILABLE, NOT_ENDED};
