//! Nested result aggregation
//!
//! Folds flat aggregate records into outer key → inner key → running total.
//! Both levels keep first-appearance order so output is deterministic.
//! Records missing either key dimension are skipped; anything missing below
//! the group (data, metrics, stats, the stat itself) contributes zero.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::trace;

use crate::models::{AggregateRecord, StatField};

/// Inner mapping for one outer key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotals {
    key: String,
    entries: Vec<(String, f64)>,
    positions: HashMap<String, usize>,
}

impl GroupTotals {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self, inner: &str) -> Option<f64> {
        self.positions.get(inner).map(|&idx| self.entries[idx].1)
    }

    /// Inner keys and totals in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zero-initialized on first sight.
    fn slot(&mut self, inner: &str) -> &mut f64 {
        let idx = match self.positions.get(inner) {
            Some(&idx) => idx,
            None => {
                self.entries.push((inner.to_string(), 0.0));
                let idx = self.entries.len() - 1;
                self.positions.insert(inner.to_string(), idx);
                idx
            }
        };
        &mut self.entries[idx].1
    }
}

impl Serialize for GroupTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Insertion-ordered two-level accumulator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedTotals {
    groups: Vec<GroupTotals>,
    positions: HashMap<String, usize>,
}

impl NestedTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, outer: &str, inner: &str) -> Option<f64> {
        self.group(outer)?.get(inner)
    }

    pub fn group(&self, outer: &str) -> Option<&GroupTotals> {
        self.positions.get(outer).map(|&idx| &self.groups[idx])
    }

    /// Outer groups in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = &GroupTotals> {
        self.groups.iter()
    }

    /// Number of outer keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Registers (outer, inner) with a zero total if new and returns its slot.
    pub fn slot(&mut self, outer: &str, inner: &str) -> &mut f64 {
        let idx = match self.positions.get(outer) {
            Some(&idx) => idx,
            None => {
                self.groups.push(GroupTotals::new(outer));
                let idx = self.groups.len() - 1;
                self.positions.insert(outer.to_string(), idx);
                idx
            }
        };
        self.groups[idx].slot(inner)
    }
}

impl Serialize for NestedTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.key, group)?;
        }
        map.end()
    }
}

/// Incremental aggregator over aggregate-query records.
#[derive(Debug, Clone)]
pub struct NestedAggregator {
    stat: StatField,
    outer_dim: String,
    inner_dim: String,
    totals: NestedTotals,
    skipped: usize,
}

impl NestedAggregator {
    pub fn new(stat: StatField, outer_dim: impl Into<String>, inner_dim: impl Into<String>) -> Self {
        Self {
            stat,
            outer_dim: outer_dim.into(),
            inner_dim: inner_dim.into(),
            totals: NestedTotals::new(),
            skipped: 0,
        }
    }

    /// Folds one record in. Returns false if it lacked a key dimension.
    pub fn record(&mut self, record: &AggregateRecord) -> bool {
        let (Some(outer), Some(inner)) = (
            record.group_value(&self.outer_dim),
            record.group_value(&self.inner_dim),
        ) else {
            self.skipped += 1;
            trace!(
                "Skipping record without '{}' or '{}' in its group",
                self.outer_dim,
                self.inner_dim
            );
            return false;
        };

        *self.totals.slot(&outer, &inner) += record.stat_total(self.stat);
        true
    }

    /// Records dropped so far for missing keys.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn finish(self) -> NestedTotals {
        self.totals
    }
}

/// Aggregates `records` by `outer_dim` then `inner_dim`, summing `stat`.
pub fn aggregate<'r, I>(records: I, stat: StatField, outer_dim: &str, inner_dim: &str) -> NestedTotals
where
    I: IntoIterator<Item = &'r AggregateRecord>,
{
    let mut aggregator = NestedAggregator::new(stat, outer_dim, inner_dim);
    for record in records {
        aggregator.record(record);
    }
    aggregator.finish()
}
