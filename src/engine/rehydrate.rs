//! Persistence restore and revalidation
//!
//! Two explicit phases inside one awaited call: restore the persisted
//! selection, then prove every restored id against freshly loaded
//! reference lists, walking each axis top-down. Persisted data is drift,
//! not gospel: an id that no longer exists is cleared together with its
//! descendants, and a list that fails to load counts as empty for the
//! pass, erring toward a clean filter state.

use tracing::{debug, info, warn};

use super::loader::LoadOutcome;
use super::state::EngineState;
use super::{EngineConfig, FilterEngine};
use crate::levels::FilterLevel;

/// What `initialize` restored, cleared, and failed to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RehydrationReport {
    /// True when a persisted snapshot was found and restored.
    pub restored: bool,
    /// Levels whose persisted id failed validation and was cleared
    /// (includes descendants cleared by cascade).
    pub cleared: Vec<FilterLevel>,
    /// Reference loads that failed during this pass.
    pub load_failures: usize,
}

impl FilterEngine {
    /// Restore the persisted selection, load reference data, and drop
    /// every restored id that no longer exists.
    ///
    /// Root lists (managers, the full organizational axis, and projects
    /// scoped to the persisted manager when one is set) load in parallel;
    /// stages and objects load sequentially because each is scoped by a
    /// parent that must be validated first.
    pub async fn initialize(&self, config: EngineConfig) -> RehydrationReport {
        let mut report = RehydrationReport::default();

        // Phase 1: restore.
        let snapshot = match self.inner.storage.read(&config.storage_key) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    "failed to read filter snapshot under '{}': {err:#}",
                    config.storage_key
                );
                None
            }
        };

        let manager_scope = {
            let mut state = self.state();
            state.storage_key = config.storage_key;
            state.locked = config.locked;
            if let Some(snapshot) = snapshot {
                debug!("restoring filter snapshot saved at {}", snapshot.saved_at);
                state.selection = snapshot.selection;
                report.restored = true;
            }
            state.selection.get(FilterLevel::Manager).map(str::to_string)
        };

        // Phase 2: root loads in parallel.
        let outcomes = tokio::join!(
            self.load_reference(FilterLevel::Manager, None),
            self.load_reference(FilterLevel::Subdivision, None),
            self.load_reference(FilterLevel::Department, None),
            self.load_reference(FilterLevel::Team, None),
            self.load_reference(FilterLevel::Employee, None),
            self.load_reference(FilterLevel::Project, manager_scope),
        );
        report.load_failures += count_failures(&[
            outcomes.0, outcomes.1, outcomes.2, outcomes.3, outcomes.4, outcomes.5,
        ]);

        // Phase 3: validate, roots first, one axis level at a time.
        {
            let mut state = self.state();
            validate_level(&mut state, FilterLevel::Subdivision, &mut report.cleared);
            validate_level(&mut state, FilterLevel::Department, &mut report.cleared);
            validate_level(&mut state, FilterLevel::Team, &mut report.cleared);
            validate_level(&mut state, FilterLevel::Employee, &mut report.cleared);

            validate_level(&mut state, FilterLevel::Manager, &mut report.cleared);
            validate_level(&mut state, FilterLevel::Project, &mut report.cleared);
        }

        // Stages and objects can only be fetched under a confirmed parent.
        let project_scope = self.state().selection.get(FilterLevel::Project).map(str::to_string);
        if let Some(project_id) = project_scope {
            let outcome = self.load_reference(FilterLevel::Stage, Some(project_id)).await;
            report.load_failures += count_failures(&[outcome]);
        }
        validate_level(&mut self.state(), FilterLevel::Stage, &mut report.cleared);

        let stage_scope = self.state().selection.get(FilterLevel::Stage).map(str::to_string);
        if let Some(stage_id) = stage_scope {
            let outcome = self.load_reference(FilterLevel::Object, Some(stage_id)).await;
            report.load_failures += count_failures(&[outcome]);
        }
        validate_level(&mut self.state(), FilterLevel::Object, &mut report.cleared);

        // Persist whatever survived and open for business.
        let (key, selection) = {
            let mut state = self.state();
            state.initialized = true;
            (state.storage_key.clone(), state.selection.clone())
        };
        self.persist(&key, selection);

        info!(
            "filter engine initialized (restored: {}, cleared: {:?}, load failures: {})",
            report.restored, report.cleared, report.load_failures
        );
        report
    }
}

/// Membership check for one restored id; on failure, clear the level and
/// its descendants. Locked levels are validated like any other: locks
/// protect against user mutation, not against stale-data correction.
fn validate_level(state: &mut EngineState, level: FilterLevel, cleared: &mut Vec<FilterLevel>) {
    let Some(id) = state.selection.get(level).map(str::to_string) else {
        return;
    };
    if state.lists.contains(level, &id) {
        return;
    }

    // Expected drift, not a fault: logged, never surfaced to the user.
    info!("persisted {level} id '{id}' is no longer valid, clearing");
    state.selection.set(level, None);
    cleared.push(level);
    for descendant in level.descendants() {
        if state.selection.get(*descendant).is_some() {
            state.selection.set(*descendant, None);
            cleared.push(*descendant);
        }
    }
}

fn count_failures(outcomes: &[LoadOutcome]) -> usize {
    outcomes
        .iter()
        .filter(|outcome| **outcome == LoadOutcome::Failed)
        .count()
}
