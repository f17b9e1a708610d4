//! Aggregation integration tests
//!
//! Feed decoded aggregate-query responses through the nested aggregator and
//! check totals, key registration and skip behaviour.

use serde_json::json;
use tally::analytics::{aggregate, NestedAggregator};
use tally::models::{AggregateRecord, QueryResultPage, StatField};
use tally::presets::{BOT_INTENT, CONVERSATION_ID};

fn records(value: serde_json::Value) -> Vec<AggregateRecord> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_sums_accumulate_per_pair() {
    let input = records(json!([
        {"group": {"c": "A", "i": "x"}, "data": [{"metrics": [{"stats": {"sum": 3}}]}]},
        {"group": {"c": "A", "i": "x"}, "data": [{"metrics": [{"stats": {"sum": 5}}]}]}
    ]));

    let totals = aggregate(&input, StatField::Sum, "c", "i");

    assert_eq!(totals.len(), 1);
    assert_eq!(totals.get("A", "x"), Some(8.0));
    assert_eq!(serde_json::to_value(&totals).unwrap(), json!({"A": {"x": 8.0}}));
}

#[test]
fn test_keyed_records_without_stats_register_zero() {
    let input = records(json!([
        {"group": {"conversationId": "c-1", "botIntent": "greeting"}},
        {"group": {"conversationId": "c-1", "botIntent": "billing"}, "data": []},
        {"group": {"conversationId": "c-2", "botIntent": "greeting"}, "data": [{"interval": "i"}]},
        {"group": {"conversationId": "c-2", "botIntent": "billing"}, "data": [{"metrics": [{"metric": "oBotIntent"}]}]},
        {"group": {"conversationId": "c-3", "botIntent": "greeting"}, "data": [{"metrics": [{"stats": {"sum": 4}}]}]}
    ]));

    let totals = aggregate(&input, StatField::Count, CONVERSATION_ID, BOT_INTENT);

    assert_eq!(totals.get("c-1", "greeting"), Some(0.0));
    assert_eq!(totals.get("c-1", "billing"), Some(0.0));
    assert_eq!(totals.get("c-2", "greeting"), Some(0.0));
    assert_eq!(totals.get("c-2", "billing"), Some(0.0));
    // Only a sum was reported, so the count is still zero.
    assert_eq!(totals.get("c-3", "greeting"), Some(0.0));
}

#[test]
fn test_records_missing_a_key_are_skipped_entirely() {
    let input = records(json!([
        {"group": {"conversationId": "c-1"}, "data": [{"metrics": [{"stats": {"count": 9}}]}]},
        {"group": {"botIntent": "greeting"}, "data": [{"metrics": [{"stats": {"count": 9}}]}]},
        {"data": [{"metrics": [{"stats": {"count": 9}}]}]},
        {"group": {"conversationId": "c-2", "botIntent": null}},
        {"group": {"conversationId": "c-3", "botIntent": "greeting"}, "data": [{"metrics": [{"stats": {"count": 1}}]}]}
    ]));

    let mut aggregator = NestedAggregator::new(StatField::Count, CONVERSATION_ID, BOT_INTENT);
    let accepted: Vec<bool> = input.iter().map(|r| aggregator.record(r)).collect();

    assert_eq!(accepted, vec![false, false, false, false, true]);
    assert_eq!(aggregator.skipped(), 4);

    let totals = aggregator.finish();
    assert_eq!(totals.len(), 1);
    assert!(totals.group("c-1").is_none());
    assert!(totals.group("c-2").is_none());
    assert_eq!(totals.get("c-3", "greeting"), Some(1.0));
}

#[test]
fn test_skipped_outer_key_appears_when_another_record_supplies_it() {
    let input = records(json!([
        {"group": {"conversationId": "c-1"}},
        {"group": {"conversationId": "c-1", "botIntent": "greeting"}}
    ]));

    let totals = aggregate(&input, StatField::Sum, CONVERSATION_ID, BOT_INTENT);

    let group = totals.group("c-1").unwrap();
    assert_eq!(group.len(), 1);
    assert_eq!(group.get("greeting"), Some(0.0));
}

#[test]
fn test_count_and_sum_select_different_stats() {
    let input = records(json!([
        {
            "group": {"conversationId": "c-1", "botIntent": "order_status"},
            "data": [
                {"interval": "2024-03-01/2024-03-02", "metrics": [
                    {"metric": "oBotIntent", "stats": {"count": 2, "sum": 1.5}}
                ]},
                {"interval": "2024-03-02/2024-03-03", "metrics": [
                    {"metric": "oBotIntent", "stats": {"count": 1, "sum": 0.25}},
                    {"metric": "oBotIntent", "stats": {"max": 7}}
                ]}
            ]
        }
    ]));

    let counts = aggregate(&input, StatField::Count, CONVERSATION_ID, BOT_INTENT);
    let sums = aggregate(&input, StatField::Sum, CONVERSATION_ID, BOT_INTENT);

    assert_eq!(counts.get("c-1", "order_status"), Some(3.0));
    assert_eq!(sums.get("c-1", "order_status"), Some(1.75));
}

#[test]
fn test_order_follows_first_appearance() {
    let input = records(json!([
        {"group": {"conversationId": "c-9", "botIntent": "b"}},
        {"group": {"conversationId": "c-1", "botIntent": "a"}},
        {"group": {"conversationId": "c-9", "botIntent": "a"}},
        {"group": {"conversationId": "c-1", "botIntent": "z"}},
        {"group": {"conversationId": "c-9", "botIntent": "b"}}
    ]));

    let totals = aggregate(&input, StatField::Sum, CONVERSATION_ID, BOT_INTENT);

    let layout: Vec<(String, Vec<String>)> = totals
        .iter()
        .map(|g| {
            (
                g.key().to_string(),
                g.iter().map(|(k, _)| k.to_string()).collect(),
            )
        })
        .collect();
    assert_eq!(
        layout,
        vec![
            ("c-9".to_string(), vec!["b".to_string(), "a".to_string()]),
            ("c-1".to_string(), vec!["a".to_string(), "z".to_string()]),
        ]
    );
}

#[test]
fn test_full_response_page() {
    let page: QueryResultPage = serde_json::from_str(
        r#"{
            "results": [
                {
                    "group": {"conversationId": "4b0e8f5c-0000-4000-8000-000000000001", "botIntent": "greeting", "mediaType": "message"},
                    "data": [{"interval": "2024-03-01T05:00:00.000Z/2024-03-08T05:00:00.000Z",
                              "metrics": [{"metric": "oBotIntent", "stats": {"count": 4}}]}]
                },
                {
                    "group": {"conversationId": "4b0e8f5c-0000-4000-8000-000000000001", "botIntent": "handoff"},
                    "data": [{"interval": "2024-03-01T05:00:00.000Z/2024-03-08T05:00:00.000Z",
                              "metrics": [{"metric": "oBotIntent", "stats": {"count": 1}}]}]
                },
                {
                    "group": {"conversationId": "4b0e8f5c-0000-4000-8000-000000000002", "botIntent": "greeting"},
                    "data": [{"interval": "2024-03-01T05:00:00.000Z/2024-03-08T05:00:00.000Z",
                              "metrics": [{"metric": "oBotIntent", "stats": {"count": 2}}]}]
                }
            ]
        }"#,
    )
    .unwrap();

    let results = page.results.unwrap();
    let totals = aggregate(&results, StatField::Count, CONVERSATION_ID, BOT_INTENT);

    assert_eq!(totals.len(), 2);
    assert_eq!(
        totals.get("4b0e8f5c-0000-4000-8000-000000000001", "greeting"),
        Some(4.0)
    );
    assert_eq!(
        totals.get("4b0e8f5c-0000-4000-8000-000000000001", "handoff"),
        Some(1.0)
    );
    assert_eq!(
        totals.get("4b0e8f5c-0000-4000-8000-000000000002", "greeting"),
        Some(2.0)
    );
}

#[test]
fn test_empty_input() {
    let input: Vec<AggregateRecord> = Vec::new();
    let totals = aggregate(&input, StatField::Sum, CONVERSATION_ID, BOT_INTENT);
    assert!(totals.is_empty());
    assert_eq!(serde_json::to_string(&totals).unwrap(), "{}");
}
