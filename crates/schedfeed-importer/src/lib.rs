//! Schedule retrieval and normalization.
//!
//! This crate fetches a published conference schedule in one of two wire
//! formats and normalizes both into the canonical [`ScheduleEvent`]
//! representation from `schedfeed-core`:
//!
//! - **frab XML** - the day/room/event hierarchy used by many conference
//!   scheduling tools.
//! - **EMF JSON** - a flat array of event objects.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  schedule URL    │
//! └────────┬─────────┘
//!          │ ScheduleClient::fetch
//!          ▼
//! ┌──────────────────┐   suffix    ┌───────────────┐
//! │    raw bytes     ├────────────►│ScheduleFormat │
//! └────────┬─────────┘             └───────┬───────┘
//!          │                               │
//!          ▼ normalize()                   │
//!    ┌───────────┐   ┌───────────┐         │
//!    │   frab    │   │    emf    │◄────────┘
//!    └─────┬─────┘   └─────┬─────┘
//!          │               │
//!          └───────┬───────┘
//!                  ▼
//!        ┌──────────────────┐
//!        │ Vec<ScheduleEvent>│
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use schedfeed_importer::{ScheduleClient, import_schedule};
//!
//! let client = ScheduleClient::with_defaults()?;
//! let events = import_schedule(&client, "https://example.org/schedule.xml", "camp2024").await?;
//! ```

pub mod emf;
pub mod error;
pub mod fetch;
pub mod format;
pub mod frab;
pub mod normalize;

// Re-export main types at crate root
pub use error::{ImportError, ImportErrorKind, ImportResult};
pub use fetch::{FetchConfig, ScheduleClient};
pub use format::ScheduleFormat;
pub use normalize::{import_schedule, normalize};

pub use schedfeed_core::ScheduleEvent;
