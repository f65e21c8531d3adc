//! Internal domain modules for the Daybook core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod daybook;
pub mod error;
pub mod event;
pub mod heatmap;
pub mod note;
pub mod storage;

#[doc(inline)]
pub use self::daybook::Daybook;
#[doc(inline)]
pub use self::error::{DaybookError, Result};
#[doc(inline)]
pub use self::event::{Event, EventRow};
#[doc(inline)]
pub use self::heatmap::HeatmapBucket;
#[doc(inline)]
pub use self::note::Note;
#[doc(inline)]
pub use self::storage::Storage;
