//! Per-day activity counts backing the calendar heatmap views.
//!
//! Two aggregates exist over the same `events` table, split by `note_id`
//! nullability: standalone events feed the event heatmap, note-linked
//! events feed the note-activity heatmap. Both group by the calendar day
//! of `start_time` and are ordered by date so the UI can render them
//! without re-sorting.

use serde::{Deserialize, Serialize};

/// One day's worth of activity: a `YYYY-MM-DD` date and how many events
/// started on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapBucket {
    pub date: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_serializes_with_plain_field_names() {
        let bucket = HeatmapBucket {
            date: "2025-03-10".to_string(),
            count: 3,
        };
        let json = serde_json::to_string(&bucket).unwrap();
        assert_eq!(json, r#"{"date":"2025-03-10","count":3}"#);
    }
}
