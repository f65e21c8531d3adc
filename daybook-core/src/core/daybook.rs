//! High-level note and event operations over a Daybook SQLite database.

use crate::{DaybookError, Event, EventRow, HeatmapBucket, Note, Result, Storage};
use crate::core::note::DEFAULT_NOTE_KIND;
use chrono::{Duration, Utc};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;

/// How long the audit event created alongside a note spans on the calendar.
const NOTE_AUDIT_EVENT_MINUTES: i64 = 30;

/// An open Daybook database.
///
/// `Daybook` is the single data source for the note editor, the notes list
/// and the calendar views. It wraps a [`Storage`] connection constructed
/// once at application start; every operation is a one-shot statement with
/// no cache or derived state — reads always hit the store.
pub struct Daybook {
    storage: Storage,
}

impl Daybook {
    /// Wraps an already-bootstrapped [`Storage`] connection.
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Opens (or creates) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DaybookError::StoreUnavailable`] if the file cannot be
    /// opened or the schema cannot be initialised.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Storage::open(path)?))
    }

    /// Returns the underlying SQLite connection.
    pub fn connection(&self) -> &Connection {
        self.storage.connection()
    }

    /// Inserts a new note and returns the stored row with its assigned id.
    ///
    /// Both timestamps are set to the current time. `name` is expected to be
    /// non-empty; the editor dialog enforces that before calling in.
    ///
    /// # Errors
    ///
    /// Returns [`DaybookError::Write`] for any SQLite failure, or
    /// [`DaybookError::Json`] if `content` cannot be serialised.
    pub fn create_note(&self, name: &str, content: &Value) -> Result<Note> {
        let now = Utc::now().to_rfc3339();
        let content_json = serde_json::to_string(content)?;

        self.connection()
            .execute(
                "INSERT INTO notes (name, content, time_created, time_updated, type)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![name, content_json, now, now, DEFAULT_NOTE_KIND],
            )
            .map_err(DaybookError::Write)?;

        let id = self.connection().last_insert_rowid();
        debug!("created note {id}");

        Ok(Note {
            id,
            name: name.to_string(),
            content: content.clone(),
            time_created: now.clone(),
            time_updated: now,
            kind: DEFAULT_NOTE_KIND.to_string(),
        })
    }

    /// Inserts a new note together with its audit event — a 30-minute
    /// calendar entry titled `Created Note: {name}` linked via `note_id` —
    /// in a single transaction. If either insert fails, neither row is kept.
    ///
    /// # Errors
    ///
    /// Returns [`DaybookError::Write`] for any SQLite failure, or
    /// [`DaybookError::Json`] if `content` cannot be serialised.
    pub fn create_note_with_event(&mut self, name: &str, content: &Value) -> Result<(Note, Event)> {
        let created = Utc::now();
        let now = created.to_rfc3339();
        let event_end = (created + Duration::minutes(NOTE_AUDIT_EVENT_MINUTES)).to_rfc3339();
        let content_json = serde_json::to_string(content)?;
        let event_title = format!("Created Note: {name}");

        let tx = self
            .storage
            .connection_mut()
            .transaction()
            .map_err(DaybookError::Write)?;

        tx.execute(
            "INSERT INTO notes (name, content, time_created, time_updated, type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![name, content_json, now, now, DEFAULT_NOTE_KIND],
        )
        .map_err(DaybookError::Write)?;
        let note_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO events (title, description, start_time, end_time, note_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![event_title, "Note creation event", now, event_end, note_id],
        )
        .map_err(DaybookError::Write)?;
        let event_id = tx.last_insert_rowid();

        tx.commit().map_err(DaybookError::Write)?;
        debug!("created note {note_id} with audit event {event_id}");

        let note = Note {
            id: note_id,
            name: name.to_string(),
            content: content.clone(),
            time_created: now.clone(),
            time_updated: now.clone(),
            kind: DEFAULT_NOTE_KIND.to_string(),
        };
        let event = Event {
            id: event_id,
            title: event_title,
            description: Some("Note creation event".to_string()),
            start_time: now,
            end_time: event_end,
            note_id: Some(note_id),
        };
        Ok((note, event))
    }

    /// Fetches a single note by id.
    ///
    /// # Errors
    ///
    /// Returns [`DaybookError::NoteNotFound`] if no row matches, or
    /// [`DaybookError::Json`] if the stored content fails to parse.
    pub fn get_note(&self, id: i64) -> Result<Note> {
        let row = self
            .connection()
            .query_row(
                "SELECT id, name, content, time_created, time_updated, type
                 FROM notes WHERE id = ?1",
                [id],
                map_note_row,
            )
            .optional()
            .map_err(DaybookError::Read)?;

        match row {
            Some(raw) => note_from_raw(raw),
            None => Err(DaybookError::NoteNotFound(id)),
        }
    }

    /// Overwrites `name`, `content` and `time_updated` for the note at `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DaybookError::NoteNotFound`] if no row matched — the caller
    /// must be able to tell an update apart from a miss — or
    /// [`DaybookError::Write`] for any SQLite failure.
    pub fn update_note(&self, id: i64, name: &str, content: &Value) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let content_json = serde_json::to_string(content)?;

        let changed = self
            .connection()
            .execute(
                "UPDATE notes SET name = ?1, content = ?2, time_updated = ?3 WHERE id = ?4",
                rusqlite::params![name, content_json, now, id],
            )
            .map_err(DaybookError::Write)?;

        if changed == 0 {
            return Err(DaybookError::NoteNotFound(id));
        }
        Ok(())
    }

    /// Returns all notes, newest first, with `content` parsed back into a tree.
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        let mut stmt = self
            .connection()
            .prepare(
                "SELECT id, name, content, time_created, time_updated, type
                 FROM notes ORDER BY time_created DESC, id DESC",
            )
            .map_err(DaybookError::Read)?;

        let raw_rows: Vec<RawNote> = stmt
            .query_map([], map_note_row)
            .map_err(DaybookError::Read)?
            .collect::<std::result::Result<_, _>>()
            .map_err(DaybookError::Read)?;

        raw_rows.into_iter().map(note_from_raw).collect()
    }

    /// Deletes the note at `id`. Dependent events are removed by the
    /// store's cascade rule. No-op when the id is absent.
    pub fn delete_note(&self, id: i64) -> Result<()> {
        self.connection()
            .execute("DELETE FROM notes WHERE id = ?1", [id])
            .map_err(DaybookError::Write)?;
        debug!("deleted note {id}");
        Ok(())
    }

    /// Unconditionally empties the notes table and, by cascade, every
    /// note-linked event.
    pub fn delete_all_notes(&self) -> Result<()> {
        let removed = self
            .connection()
            .execute("DELETE FROM notes", [])
            .map_err(DaybookError::Write)?;
        info!("deleted all notes ({removed} rows)");
        Ok(())
    }

    /// Inserts a calendar event and returns the stored row with its assigned id.
    pub fn add_event(
        &self,
        title: &str,
        description: Option<&str>,
        start_time: &str,
        end_time: &str,
        note_id: Option<i64>,
    ) -> Result<Event> {
        self.connection()
            .execute(
                "INSERT INTO events (title, description, start_time, end_time, note_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![title, description, start_time, end_time, note_id],
            )
            .map_err(DaybookError::Write)?;

        let id = self.connection().last_insert_rowid();
        Ok(Event {
            id,
            title: title.to_string(),
            description: description.map(str::to_string),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            note_id,
        })
    }

    /// Full overwrite of all mutable event fields by id.
    ///
    /// # Errors
    ///
    /// Returns [`DaybookError::EventNotFound`] if no row matched, or
    /// [`DaybookError::Write`] for any SQLite failure.
    pub fn update_event(
        &self,
        id: i64,
        title: &str,
        description: Option<&str>,
        start_time: &str,
        end_time: &str,
        note_id: Option<i64>,
    ) -> Result<()> {
        let changed = self
            .connection()
            .execute(
                "UPDATE events
                 SET title = ?1, description = ?2, start_time = ?3, end_time = ?4, note_id = ?5
                 WHERE id = ?6",
                rusqlite::params![title, description, start_time, end_time, note_id, id],
            )
            .map_err(DaybookError::Write)?;

        if changed == 0 {
            return Err(DaybookError::EventNotFound(id));
        }
        Ok(())
    }

    /// Returns all events in start order, each carrying its note's name and
    /// parsed content when `note_id` is set.
    pub fn list_events(&self) -> Result<Vec<EventRow>> {
        let mut stmt = self
            .connection()
            .prepare(
                "SELECT e.id, e.title, e.description, e.start_time, e.end_time, e.note_id,
                        n.name AS note_name, n.content AS note_content
                 FROM events e
                 LEFT JOIN notes n ON n.id = e.note_id
                 ORDER BY e.start_time ASC, e.id ASC",
            )
            .map_err(DaybookError::Read)?;

        let raw_rows: Vec<RawEventRow> = stmt
            .query_map([], |row| {
                Ok(RawEventRow {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    start_time: row.get(3)?,
                    end_time: row.get(4)?,
                    note_id: row.get(5)?,
                    note_name: row.get(6)?,
                    note_content: row.get(7)?,
                })
            })
            .map_err(DaybookError::Read)?
            .collect::<std::result::Result<_, _>>()
            .map_err(DaybookError::Read)?;

        raw_rows.into_iter().map(event_row_from_raw).collect()
    }

    /// Deletes the event at `id`. No-op when the id is absent.
    pub fn delete_event(&self, id: i64) -> Result<()> {
        self.connection()
            .execute("DELETE FROM events WHERE id = ?1", [id])
            .map_err(DaybookError::Write)?;
        debug!("deleted event {id}");
        Ok(())
    }

    /// Per-day counts of standalone events (`note_id IS NULL`), ordered by date.
    pub fn event_heatmap(&self) -> Result<Vec<HeatmapBucket>> {
        self.heatmap("SELECT date(start_time) AS day, COUNT(*) FROM events
                      WHERE note_id IS NULL GROUP BY day ORDER BY day ASC")
    }

    /// Per-day counts of note-linked events (`note_id IS NOT NULL`), ordered
    /// by date. This is the proxy for note activity on the dashboard.
    pub fn note_heatmap(&self) -> Result<Vec<HeatmapBucket>> {
        self.heatmap("SELECT date(start_time) AS day, COUNT(*) FROM events
                      WHERE note_id IS NOT NULL GROUP BY day ORDER BY day ASC")
    }

    fn heatmap(&self, sql: &str) -> Result<Vec<HeatmapBucket>> {
        let mut stmt = self.connection().prepare(sql).map_err(DaybookError::Read)?;
        let buckets = stmt
            .query_map([], |row| {
                Ok(HeatmapBucket {
                    date: row.get(0)?,
                    count: row.get(1)?,
                })
            })
            .map_err(DaybookError::Read)?
            .collect::<std::result::Result<_, _>>()
            .map_err(DaybookError::Read)?;
        Ok(buckets)
    }
}

/// Column tuple for a `notes` row before the content blob is parsed.
type RawNote = (i64, String, String, String, Option<String>, String);

fn map_note_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawNote> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn note_from_raw(raw: RawNote) -> Result<Note> {
    let (id, name, content_json, time_created, time_updated, kind) = raw;
    let content: Value = serde_json::from_str(&content_json)?;
    // time_updated is nullable in the first schema revision; fall back to
    // the creation time for rows that predate it.
    let time_updated = time_updated.unwrap_or_else(|| time_created.clone());
    Ok(Note {
        id,
        name,
        content,
        time_created,
        time_updated,
        kind,
    })
}

struct RawEventRow {
    id: i64,
    title: String,
    description: Option<String>,
    start_time: String,
    end_time: String,
    note_id: Option<i64>,
    note_name: Option<String>,
    note_content: Option<String>,
}

fn event_row_from_raw(raw: RawEventRow) -> Result<EventRow> {
    let note_content = match raw.note_content {
        Some(json) => Some(serde_json::from_str(&json)?),
        None => None,
    };
    Ok(EventRow {
        event: Event {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            start_time: raw.start_time,
            end_time: raw.end_time,
            note_id: raw.note_id,
        },
        note_name: raw.note_name,
        note_content,
    })
}
