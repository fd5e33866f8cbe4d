//! Reference data loading with version guarding
//!
//! Every invocation takes a fresh per-level version *synchronously at the
//! call site*, so "latest" is defined by invocation order rather than by
//! task scheduling. A result only lands if its version is still current
//! when it arrives; everything else is discarded post-hoc. In-flight
//! fetches are never aborted; superseded results are simply dropped.

use tracing::{debug, warn};

use super::FilterEngine;
use crate::error::LoadFailure;
use crate::levels::{FilterAxis, FilterLevel};
use crate::provider::ReferenceQuery;

/// How one load invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadOutcome {
    /// The result replaced the reference list.
    Applied,
    /// A newer invocation had already started; the result was dropped.
    Superseded,
    /// The fetch failed while still current; the prior list was retained
    /// and a failure signal was emitted.
    Failed,
}

impl FilterEngine {
    /// Fire-and-forget load, used by `set_filter` cascades and `refresh`.
    pub(crate) fn spawn_load(&self, level: FilterLevel, scope_id: Option<String>) {
        let version = self.state().loads.begin(level);
        let engine = self.clone();
        tokio::spawn(async move {
            engine.run_load(level, scope_id, version).await;
        });
    }

    /// Awaited load, used by the rehydration validator.
    pub(crate) async fn load_reference(
        &self,
        level: FilterLevel,
        scope_id: Option<String>,
    ) -> LoadOutcome {
        let version = self.state().loads.begin(level);
        self.run_load(level, scope_id, version).await
    }

    async fn run_load(
        &self,
        level: FilterLevel,
        scope_id: Option<String>,
        version: u64,
    ) -> LoadOutcome {
        debug!(
            "loading {level} v{version} (scope: {})",
            scope_id.as_deref().unwrap_or("none")
        );
        let query = ReferenceQuery {
            level,
            scope_id,
        };
        let result = self.provider().fetch(query).await;

        let mut state = self.state();
        match result {
            Ok(rows) => {
                if !state.loads.is_current(level, version) {
                    debug!("discarding stale {level} result v{version}");
                    return LoadOutcome::Superseded;
                }
                debug!("loaded {level} v{version}: {} rows", rows.len());
                state.lists.replace(level, rows);
                state.loads.finish(level, version);
                LoadOutcome::Applied
            }
            Err(err) => {
                if !state.loads.is_current(level, version) {
                    debug!("discarding stale {level} failure v{version}: {err}");
                    return LoadOutcome::Superseded;
                }
                state.loads.finish(level, version);
                drop(state);
                warn!("loading {level} failed: {err}");
                self.emit_failure(LoadFailure {
                    level,
                    message: err.to_string(),
                });
                LoadOutcome::Failed
            }
        }
    }

    /// Re-fetch one reference list on demand (e.g. a refresh control).
    ///
    /// Project-axis child lists are scoped to the current parent selection;
    /// organizational lists and axis roots are fetched in full.
    pub fn refresh(&self, level: FilterLevel) {
        let scope_id = match level.axis() {
            FilterAxis::Project => {
                let state = self.state();
                level
                    .parent()
                    .and_then(|parent| state.selection.get(parent).map(str::to_string))
            }
            FilterAxis::Organization => None,
        };
        self.spawn_load(level, scope_id);
    }
}
