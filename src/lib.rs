//! report-filters — hierarchical filter synchronization engine
//!
//! Client-side state module that narrows the worksite reporting dataset
//! through two chains of dependent selectors:
//!
//! ```text
//! Manager → Project → Stage → Object
//! Subdivision → Department → Team → Employee
//! ```
//!
//! Each level's available options depend on the levels above it, selections
//! stay mutually consistent through cascade propagation, overlapping loads
//! are settled "last request wins", and the whole state survives restarts
//! via persisted snapshots that are revalidated on startup.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use report_filters::{
//!     EngineConfig, FilterEngine, FilterLevel, HttpReferenceProvider, JsonFileStorage,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(HttpReferenceProvider::new("https://reports.local/api")?);
//!     let storage = Arc::new(JsonFileStorage::new("/var/lib/reports"));
//!
//!     let engine = FilterEngine::new(provider, storage);
//!     engine.initialize(EngineConfig::default()).await;
//!
//!     engine.set_filter(FilterLevel::Manager, Some("m1".to_string()));
//!     let projects = engine.filtered_projects();
//!     println!("{} projects for the selected manager", projects.len());
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod levels;
pub mod model;
pub mod provider;
pub mod storage;

pub use engine::{EngineConfig, FilterEngine, FilterUpdate, RehydrationReport};
pub use error::{LoadFailure, ProviderError};
pub use levels::{FilterAxis, FilterLevel, UnknownLevel};
pub use model::{FilterSelection, PersistedSnapshot, ReferenceOption};
pub use provider::http::HttpReferenceProvider;
pub use provider::{ReferenceDataProvider, ReferenceQuery};
pub use storage::{JsonFileStorage, MemoryStorage, SnapshotStorage};
