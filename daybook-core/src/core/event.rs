use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A calendar entry with a time range, optionally linked to a [`Note`](super::note::Note).
///
/// `start_time`/`end_time` are RFC 3339 strings. The layer does not enforce
/// `start_time <= end_time`; the calendar UI owns that decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    /// Set when this event was created from a note. Deleting the note
    /// cascades to this row (store-level foreign-key rule).
    pub note_id: Option<i64>,
}

/// An [`Event`] as returned by `list_events`: the event itself plus a
/// denormalized projection of its note's name and parsed content, for
/// display without a second round-trip. Both fields are `None` for
/// standalone events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    #[serde(flatten)]
    pub event: Event,
    pub note_name: Option<String>,
    pub note_content: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_row_flattens_event_fields() {
        let row = EventRow {
            event: Event {
                id: 7,
                title: "Standup".to_string(),
                description: None,
                start_time: "2025-03-10T09:00:00+00:00".to_string(),
                end_time: "2025-03-10T09:15:00+00:00".to_string(),
                note_id: None,
            },
            note_name: None,
            note_content: None,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Standup");
        assert!(json["note_name"].is_null());
    }
}
