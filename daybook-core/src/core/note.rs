use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A titled rich-text document persisted as a serialized block tree.
///
/// `content` is owned by the front-end editor; this layer treats it as an
/// opaque JSON tree, stored as text and parsed back on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub name: String,
    pub content: Value,
    pub time_created: String,
    pub time_updated: String,
    /// Discriminator column carried since the second schema revision.
    /// Always `"note"` today; nothing branches on it.
    pub kind: String,
}

pub const DEFAULT_NOTE_KIND: &str = "note";
