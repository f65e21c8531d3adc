//! Core persistence library for Daybook — a desktop note-taking and calendar
//! application.
//!
//! The primary entry point is [`Daybook`], which represents an open database
//! file holding the `notes` and `events` tables. The GUI shell, rich-text
//! editor and calendar component are external consumers: they call the CRUD
//! and aggregate operations here and render what comes back. Note content is
//! an opaque serialized block tree owned by the editor; this crate stores and
//! parses it without interpreting it.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use crate::core::{
    daybook::Daybook,
    error::{DaybookError, Result},
    event::{Event, EventRow},
    heatmap::HeatmapBucket,
    note::Note,
    storage::Storage,
};
