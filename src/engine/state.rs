//! In-memory engine state: selection, reference lists, load bookkeeping
//!
//! All of this lives behind one mutex inside the engine and is mutated by a
//! single logical writer. The only concurrency hazard, out-of-order
//! completion of overlapping fetches, is handled by [`LoadTracker`], a
//! per-level generation counter: every load invocation takes a new version
//! up front, and only a result whose version is still current may land.

use std::collections::{HashMap, HashSet};

use crate::levels::FilterLevel;
use crate::model::{FilterSelection, ReferenceOption};

/// The eight reference lists, one per level.
///
/// Lists start empty, are populated by successful loads, and are replaced
/// wholesale; a failed load leaves the previous list untouched, preferring
/// stale-but-valid data over an empty widget.
#[derive(Debug, Default)]
pub(crate) struct ReferenceLists {
    managers: Vec<ReferenceOption>,
    projects: Vec<ReferenceOption>,
    stages: Vec<ReferenceOption>,
    objects: Vec<ReferenceOption>,
    subdivisions: Vec<ReferenceOption>,
    departments: Vec<ReferenceOption>,
    teams: Vec<ReferenceOption>,
    employees: Vec<ReferenceOption>,
}

impl ReferenceLists {
    pub(crate) fn get(&self, level: FilterLevel) -> &[ReferenceOption] {
        match level {
            FilterLevel::Manager => &self.managers,
            FilterLevel::Project => &self.projects,
            FilterLevel::Stage => &self.stages,
            FilterLevel::Object => &self.objects,
            FilterLevel::Subdivision => &self.subdivisions,
            FilterLevel::Department => &self.departments,
            FilterLevel::Team => &self.teams,
            FilterLevel::Employee => &self.employees,
        }
    }

    pub(crate) fn replace(&mut self, level: FilterLevel, rows: Vec<ReferenceOption>) {
        match level {
            FilterLevel::Manager => self.managers = rows,
            FilterLevel::Project => self.projects = rows,
            FilterLevel::Stage => self.stages = rows,
            FilterLevel::Object => self.objects = rows,
            FilterLevel::Subdivision => self.subdivisions = rows,
            FilterLevel::Department => self.departments = rows,
            FilterLevel::Team => self.teams = rows,
            FilterLevel::Employee => self.employees = rows,
        }
    }

    pub(crate) fn find(&self, level: FilterLevel, id: &str) -> Option<&ReferenceOption> {
        self.get(level).iter().find(|option| option.id == id)
    }

    pub(crate) fn contains(&self, level: FilterLevel, id: &str) -> bool {
        self.find(level, id).is_some()
    }
}

#[derive(Debug, Default)]
struct LoadSlot {
    version: u64,
    loading: bool,
}

/// Per-level monotonic load versions: "last request wins".
///
/// Owned by the engine instance rather than module state, so two engines
/// never interfere with each other's generations.
#[derive(Debug, Default)]
pub(crate) struct LoadTracker {
    slots: HashMap<FilterLevel, LoadSlot>,
}

impl LoadTracker {
    /// Register a new load invocation and return its version.
    pub(crate) fn begin(&mut self, level: FilterLevel) -> u64 {
        let slot = self.slots.entry(level).or_default();
        slot.version += 1;
        slot.loading = true;
        slot.version
    }

    /// True when `version` is still the most recently initiated load.
    pub(crate) fn is_current(&self, level: FilterLevel, version: u64) -> bool {
        self.slots
            .get(&level)
            .map(|slot| slot.version == version)
            .unwrap_or(false)
    }

    /// Clear the loading flag, but only if `version` is still current:
    /// a superseded invocation must not wipe the flag of the one that
    /// superseded it.
    pub(crate) fn finish(&mut self, level: FilterLevel, version: u64) {
        if let Some(slot) = self.slots.get_mut(&level) {
            if slot.version == version {
                slot.loading = false;
            }
        }
    }

    pub(crate) fn is_loading(&self, level: FilterLevel) -> bool {
        self.slots
            .get(&level)
            .map(|slot| slot.loading)
            .unwrap_or(false)
    }
}

/// Everything the engine owns, guarded by one mutex.
#[derive(Debug)]
pub(crate) struct EngineState {
    pub(crate) selection: FilterSelection,
    pub(crate) lists: ReferenceLists,
    pub(crate) loads: LoadTracker,
    pub(crate) locked: HashSet<FilterLevel>,
    pub(crate) storage_key: String,
    pub(crate) initialized: bool,
}

impl EngineState {
    pub(crate) fn new() -> Self {
        Self {
            selection: FilterSelection::default(),
            lists: ReferenceLists::default(),
            loads: LoadTracker::default(),
            locked: HashSet::new(),
            storage_key: crate::engine::DEFAULT_STORAGE_KEY.to_string(),
            initialized: false,
        }
    }
}
