pub mod query;
pub mod records;

pub use query::{
    Filter, FilterKind, Interval, Paging, Predicate, PredicateOperator, QueryError, QueryKind,
    QueryRequest,
};
pub use records::{
    AggregateData, AggregateMetric, AggregateRecord, ConversationRecord, ParticipantRecord,
    QueryResultPage, StatField, StatSet,
};
