//! # Campusboard Core Library
//!
//! Event tracking for a college campus: a JSON-backed event store with name
//! and category lookup, an upcoming-window filter, a TF-IDF recommender and a
//! keyword assistant. The `campusboard` CLI is a thin layer over this crate.
//!
//! ## Key Components
//!
//! - [`EventStore`]: event persistence and indexed lookup
//! - [`Catalog`]: lock-guarded store handle with a lazily rebuilt index
//! - [`filter_upcoming`]: events inside a forward date window
//! - [`SimilarityIndex`]: text-similarity ranking
//! - [`assistant::respond`]: canned answers by keyword
//! - [`Config`]: application configuration management

pub mod assistant;
pub mod catalog;
pub mod dates;
pub mod error;
pub mod event;
pub mod recommend;
pub mod storage;
pub mod upcoming;

pub use assistant::{respond, Intent};
pub use catalog::Catalog;
pub use dates::{format_date_str, format_long_date, parse_date};
pub use error::{ConfigError, CoreError, Result, StoreError, ValidationError};
pub use event::{Event, EventDraft, EventRecord};
pub use recommend::{recommend, Recommendation, SimilarityIndex};
pub use storage::{AddOutcome, Config, EventRef, EventStore, LoadReport, LoadWarning};
pub use upcoming::{filter_upcoming, Dated};
