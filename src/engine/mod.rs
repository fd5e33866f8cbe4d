//! The filter synchronization engine
//!
//! [`FilterEngine`] owns the selection state and reference lists for one UI
//! session: an explicit instance passed by handle to consumers, not a
//! global singleton. Clones share the same underlying state.
//!
//! Control flow: the UI calls [`FilterEngine::initialize`] once, then
//! [`FilterEngine::set_filter`] on every interaction. State mutation is
//! synchronous; any loads it triggers run detached and re-enter the state
//! path on completion, guarded against stale landings (see
//! `engine::loader`).

mod cascade;
mod loader;
mod projection;
mod rehydrate;
mod state;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tracing::warn;

pub use cascade::FilterUpdate;
pub use rehydrate::RehydrationReport;

use crate::error::LoadFailure;
use crate::levels::FilterLevel;
use crate::model::{FilterSelection, PersistedSnapshot, ReferenceOption};
use crate::provider::ReferenceDataProvider;
use crate::storage::SnapshotStorage;
use state::EngineState;

/// Storage key used when the config does not override it.
pub const DEFAULT_STORAGE_KEY: &str = "report-filters";

/// Startup configuration consumed by [`FilterEngine::initialize`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Key the snapshot is persisted under.
    pub storage_key: String,
    /// Levels the caller has marked immutable (role/permission driven,
    /// computed outside this engine).
    pub locked: HashSet<FilterLevel>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            locked: HashSet::new(),
        }
    }
}

struct EngineInner {
    state: Mutex<EngineState>,
    provider: Arc<dyn ReferenceDataProvider>,
    storage: Arc<dyn SnapshotStorage>,
    failure_subs: Mutex<Vec<mpsc::UnboundedSender<LoadFailure>>>,
}

/// Cheaply cloneable handle to one engine instance.
///
/// Must live inside a Tokio runtime: `set_filter` spawns its follow-up
/// loads onto the current runtime.
#[derive(Clone)]
pub struct FilterEngine {
    inner: Arc<EngineInner>,
}

impl FilterEngine {
    pub fn new(
        provider: Arc<dyn ReferenceDataProvider>,
        storage: Arc<dyn SnapshotStorage>,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                state: Mutex::new(EngineState::new()),
                provider,
                storage,
                failure_subs: Mutex::new(Vec::new()),
            }),
        }
    }

    // =====================================================================
    // MUTATIONS
    // =====================================================================

    /// Change one level's selection, with full cascade semantics.
    ///
    /// Synchronous for the state-mutation portion; dependent reloads are
    /// spawned detached. Locked levels reject the whole call as a silent
    /// no-op; the UI is expected to disable those controls.
    pub fn set_filter(&self, level: FilterLevel, value: Option<String>) -> FilterUpdate {
        let scope_id = value.clone();
        let (update, snapshot) = {
            let mut state = self.state();
            let update = cascade::apply_set(&mut state, level, value);
            let snapshot = update
                .applied
                .then(|| (state.storage_key.clone(), state.selection.clone()));
            (update, snapshot)
        };

        if let Some(child) = update.reload {
            self.spawn_load(child, scope_id);
        }
        if let Some((key, selection)) = snapshot {
            self.persist(&key, selection);
        }
        update
    }

    /// Clear every non-locked level in one step. Idempotent.
    pub fn reset_filters(&self) -> FilterUpdate {
        let (update, key, selection) = {
            let mut state = self.state();
            let update = cascade::apply_reset(&mut state);
            (update, state.storage_key.clone(), state.selection.clone())
        };
        self.persist(&key, selection);
        update
    }

    // =====================================================================
    // READS
    // =====================================================================

    /// True when the caller marked this level immutable.
    pub fn is_filter_locked(&self, level: FilterLevel) -> bool {
        self.state().locked.contains(&level)
    }

    /// Snapshot of the current selection (all eight levels).
    pub fn selection(&self) -> FilterSelection {
        self.state().selection.clone()
    }

    /// The raw reference list for a level, as last loaded.
    pub fn options(&self, level: FilterLevel) -> Vec<ReferenceOption> {
        self.state().lists.get(level).to_vec()
    }

    /// True while the most recently initiated load for `level` is in
    /// flight.
    pub fn is_loading(&self, level: FilterLevel) -> bool {
        self.state().loads.is_loading(level)
    }

    /// True once `initialize` has completed.
    pub fn is_initialized(&self) -> bool {
        self.state().initialized
    }

    /// All projects, or only the selected manager's.
    pub fn filtered_projects(&self) -> Vec<ReferenceOption> {
        projection::filtered_projects(&self.state())
    }

    /// Stages under the selected project (empty without one).
    pub fn filtered_stages(&self) -> Vec<ReferenceOption> {
        projection::filtered_stages(&self.state())
    }

    /// Objects under the selected stage (empty without one).
    pub fn filtered_objects(&self) -> Vec<ReferenceOption> {
        projection::filtered_objects(&self.state())
    }

    /// Teams narrowed by department or subdivision.
    pub fn filtered_teams(&self) -> Vec<ReferenceOption> {
        projection::filtered_teams(&self.state())
    }

    /// Employees narrowed by the most specific selected ancestor.
    pub fn filtered_employees(&self) -> Vec<ReferenceOption> {
        projection::filtered_employees(&self.state())
    }

    // =====================================================================
    // FAILURE SIGNAL
    // =====================================================================

    /// Subscribe to load failures (for toasts/logging; the engine renders
    /// nothing itself). Dropping the receiver unsubscribes.
    pub fn subscribe_failures(&self) -> mpsc::UnboundedReceiver<LoadFailure> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.failure_subs.lock().unwrap().push(tx);
        rx
    }

    pub(crate) fn emit_failure(&self, failure: LoadFailure) {
        let mut subs = self.inner.failure_subs.lock().unwrap();
        subs.retain(|tx| tx.send(failure.clone()).is_ok());
    }

    // =====================================================================
    // INTERNALS
    // =====================================================================

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.inner.state.lock().unwrap()
    }

    fn provider(&self) -> &Arc<dyn ReferenceDataProvider> {
        &self.inner.provider
    }

    /// Best-effort snapshot write; storage errors are logged, never raised.
    fn persist(&self, key: &str, selection: FilterSelection) {
        let snapshot = PersistedSnapshot::new(selection);
        if let Err(err) = self.inner.storage.write(key, &snapshot) {
            warn!("failed to persist filter snapshot under '{key}': {err:#}");
        }
    }
}
