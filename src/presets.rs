//! Ready-made analytics queries.
//!
//! Each preset fixes the metrics and grouping for one report; the interval,
//! time zone and filter come from the caller.

use crate::models::{Filter, Interval, Paging, Predicate, QueryRequest};

pub const CONVERSATION_ID: &str = "conversationId";
pub const BOT_INTENT: &str = "botIntent";
pub const BOT_PROVIDER: &str = "botProvider";
pub const MEDIA_TYPE: &str = "mediaType";

pub const BOT_INTENT_METRIC: &str = "oBotIntent";

pub const BOT_SUMMARY_METRICS: [&str; 11] = [
    "nBotSessionTurns",
    "nBotSessions",
    "oBotIntent",
    "oBotSessionQuery",
    "oBotSessionQuerySelfServed",
    "oBotSessionTurn",
    "oBotSlot",
    "tBotDisconnect",
    "tBotExit",
    "tBotRecognitionFailure",
    "tBotSession",
];

pub fn conversation_details(interval: Interval, page_size: u32) -> QueryRequest {
    QueryRequest::new(interval).with_paging(Paging::new(page_size))
}

/// Bot intents per conversation.
pub fn intents_by_conversation(
    interval: Interval,
    time_zone: &str,
    filter: Option<Filter>,
) -> QueryRequest {
    QueryRequest::new(interval)
        .with_time_zone(time_zone)
        .with_metrics([BOT_INTENT_METRIC])
        .group_by([CONVERSATION_ID, BOT_INTENT])
        .with_filter(filter)
}

/// Bot intents of a single conversation.
pub fn intents_for_conversation(
    interval: Interval,
    time_zone: &str,
    conversation_id: &str,
) -> QueryRequest {
    let filter = Filter::and(vec![Predicate::matches(CONVERSATION_ID, conversation_id)]);
    intents_by_conversation(interval, time_zone, Some(filter))
}

/// Bot session metrics per intent, bucketed by `granularity`.
pub fn bot_summary(
    interval: Interval,
    time_zone: &str,
    granularity: &str,
    filter: Option<Filter>,
) -> QueryRequest {
    QueryRequest::new(interval)
        .with_granularity(granularity)
        .with_time_zone(time_zone)
        .with_metrics(BOT_SUMMARY_METRICS)
        .group_by([BOT_INTENT])
        .with_filter(filter)
}

/// `and` of whichever of the provider and media type are given.
pub fn provider_media_filter(provider: Option<&str>, media_type: Option<&str>) -> Option<Filter> {
    let predicates: Vec<Predicate> = [(BOT_PROVIDER, provider), (MEDIA_TYPE, media_type)]
        .into_iter()
        .filter_map(|(dimension, value)| value.map(|v| Predicate::equals(dimension, v)))
        .collect();

    if predicates.is_empty() {
        None
    } else {
        Some(Filter::and(predicates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueryKind;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn interval() -> Interval {
        Interval::trailing_days(7, Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap()).unwrap()
    }

    #[test]
    fn test_conversation_details_is_paged() {
        let request = conversation_details(interval(), 100);
        assert_eq!(request.paging, Some(Paging::new(100)));
        assert!(request.validate(QueryKind::ConversationDetails).is_ok());
    }

    #[test]
    fn test_intents_for_conversation_filters_by_id() {
        let id = "3f2c9a4e-5b1d-4c8e-9f7a-0d6b2e1c4a8f";
        let request = intents_for_conversation(interval(), "America/Bogota", id);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["groupBy"], json!(["conversationId", "botIntent"]));
        assert_eq!(body["metrics"], json!(["oBotIntent"]));
        assert_eq!(
            body["filter"],
            json!({
                "type": "and",
                "predicates": [{"dimension": "conversationId", "operator": "matches", "value": id}]
            })
        );
        assert!(request.validate(QueryKind::BotAggregates).is_ok());
    }

    #[test]
    fn test_bot_summary_is_valid_aggregate_query() {
        let filter = provider_media_filter(Some("GOOGLE"), Some("MESSAGING"));
        let request = bot_summary(interval(), "America/Bogota", "P1D", filter);

        assert_eq!(request.metrics.len(), 11);
        assert_eq!(request.group_by, vec![BOT_INTENT.to_string()]);
        assert_eq!(request.granularity.as_deref(), Some("P1D"));
        assert!(request.validate(QueryKind::BotAggregates).is_ok());
    }

    #[test]
    fn test_provider_media_filter() {
        assert_eq!(provider_media_filter(None, None), None);

        let filter = provider_media_filter(None, Some("VOICE")).unwrap();
        assert_eq!(filter.predicates, vec![Predicate::equals(MEDIA_TYPE, "VOICE")]);

        let filter = provider_media_filter(Some("GOOGLE"), Some("MESSAGING")).unwrap();
        assert_eq!(filter.predicates.len(), 2);
        assert_eq!(filter.predicates[0].dimension, BOT_PROVIDER);
    }
}
