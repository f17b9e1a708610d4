//! Analytics query request model.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("interval start {start} is after its end {end}")]
    InvertedInterval { start: String, end: String },
    #[error("aggregate queries need at least one metric")]
    NoMetrics,
    #[error("a time zone is required when granularity '{0}' is set")]
    MissingTimeZone(String),
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("detail queries need a paging cursor")]
    MissingPaging,
    #[error("cannot look back {0} days from now")]
    IntervalOutOfRange(u32),
}

/// Which query endpoint a request is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    ConversationDetails,
    BotAggregates,
}

impl QueryKind {
    pub fn path(self) -> &'static str {
        match self {
            QueryKind::ConversationDetails => "/api/v2/analytics/conversations/details/query",
            QueryKind::BotAggregates => "/api/v2/analytics/bots/aggregates/query",
        }
    }

    pub fn is_paginated(self) -> bool {
        matches!(self, QueryKind::ConversationDetails)
    }
}

/// Half-open time range, serialized as `start/end` ISO-8601 instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, QueryError> {
        if start > end {
            return Err(QueryError::InvertedInterval {
                start: iso(start),
                end: iso(end),
            });
        }
        Ok(Self { start, end })
    }

    /// The `days` days leading up to `now`.
    pub fn trailing_days(days: u32, now: DateTime<Utc>) -> Result<Self, QueryError> {
        let start = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or(QueryError::IntervalOutOfRange(days))?;
        Ok(Self { start, end: now })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", iso(self.start), iso(self.end))
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PredicateOperator {
    Matches,
}

/// Leaf of a filter tree. Without an operator the platform compares for equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predicate {
    pub dimension: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<PredicateOperator>,
    pub value: String,
}

impl Predicate {
    pub fn equals(dimension: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            operator: None,
            value: value.into(),
        }
    }

    pub fn matches(dimension: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            operator: Some(PredicateOperator::Matches),
            value: value.into(),
        }
    }
}

/// Composite filter node: predicates and nested clauses joined by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    #[serde(rename = "type")]
    pub kind: FilterKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub predicates: Vec<Predicate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clauses: Vec<Filter>,
}

impl Filter {
    pub fn and(predicates: Vec<Predicate>) -> Self {
        Self {
            kind: FilterKind::And,
            predicates,
            clauses: Vec::new(),
        }
    }

    pub fn or(predicates: Vec<Predicate>) -> Self {
        Self {
            kind: FilterKind::Or,
            predicates,
            clauses: Vec::new(),
        }
    }

    pub fn with_clause(mut self, clause: Filter) -> Self {
        self.clauses.push(clause);
        self
    }
}

/// Page cursor. `page_number` 0 means no page has been requested yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub page_size: u32,
    pub page_number: u32,
}

impl Paging {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            page_number: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub interval: Interval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granularity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl QueryRequest {
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            granularity: None,
            time_zone: None,
            metrics: Vec::new(),
            group_by: Vec::new(),
            filter: None,
            paging: None,
        }
    }

    pub fn with_granularity(mut self, granularity: impl Into<String>) -> Self {
        self.granularity = Some(granularity.into());
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    pub fn group_by<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = dimensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self
    }

    pub fn validate(&self, kind: QueryKind) -> Result<(), QueryError> {
        if kind == QueryKind::BotAggregates && self.metrics.is_empty() {
            return Err(QueryError::NoMetrics);
        }

        if let Some(granularity) = &self.granularity {
            if self.time_zone.is_none() {
                return Err(QueryError::MissingTimeZone(granularity.clone()));
            }
        }

        match self.paging {
            Some(paging) if paging.page_size == 0 => Err(QueryError::ZeroPageSize),
            None if kind.is_paginated() => Err(QueryError::MissingPaging),
            _ => Ok(()),
        }
    }
}
