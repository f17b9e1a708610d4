//! Display-ready view of a single conversation detail record.

use serde::Serialize;

use crate::models::{ConversationRecord, ParticipantRecord};

pub const NOT_AVAILABLE: &str = "Not available";
pub const NOT_ENDED: &str = "Not ended";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantSummary {
    pub id: String,
    pub name: String,
    pub purpose: String,
}

impl ParticipantSummary {
    pub fn from_record(record: &ParticipantRecord) -> Self {
        Self {
            id: or_not_available(record.participant_id.as_deref()),
            name: or_not_available(record.participant_name.as_deref()),
            purpose: or_not_available(record.purpose.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub id: String,
    pub started: String,
    pub ended: String,
    pub has_evaluations: bool,
    pub has_surveys: bool,
    pub participants: Vec<ParticipantSummary>,
}

impl ConversationSummary {
    pub fn from_record(record: &ConversationRecord) -> Self {
        Self {
            id: record.conversation_id.clone(),
            started: or_not_available(record.conversation_start.as_deref()),
            ended: record
                .conversation_end
                .clone()
                .unwrap_or_else(|| NOT_ENDED.to_string()),
            has_evaluations: record.evaluations.is_some(),
            has_surveys: record.surveys.is_some(),
            participants: record
                .participants
                .iter()
                .flatten()
                .map(ParticipantSummary::from_record)
                .collect(),
        }
    }
}

fn or_not_available(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}
