//! Core data model: reference options, selection state, persisted snapshot
//!
//! `ReferenceOption` rows are immutable once fetched; a reload replaces the
//! whole list, it never merges or mutates rows in place. `FilterSelection`
//! is the single source of truth for what the user has narrowed to, and is
//! also the payload persisted across restarts (wrapped in
//! [`PersistedSnapshot`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::levels::FilterLevel;

/// One id/name row from the reference data provider.
///
/// `parent_id` is the scoping parent for the level the row belongs to:
/// manager for projects, project for stages, stage for objects, subdivision
/// for departments, department for teams, team for employees. Employees
/// additionally carry their department in `department_id` (denormalized so
/// ancestor levels can be inferred from a leaf selection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOption {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
}

impl ReferenceOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
            department_id: None,
        }
    }

    /// Attach the scoping parent id.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Attach the denormalized department id (employee rows only).
    pub fn with_department(mut self, department_id: impl Into<String>) -> Self {
        self.department_id = Some(department_id.into());
        self
    }
}

/// The nullable current selection for every level of both axes.
///
/// Field-level `#[serde(default)]` keeps deserialization tolerant of
/// snapshots written by older builds: missing levels restore as unselected
/// instead of failing the whole restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub manager_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub stage_id: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub subdivision_id: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
}

impl FilterSelection {
    /// The selected id at `level`, if any.
    pub fn get(&self, level: FilterLevel) -> Option<&str> {
        match level {
            FilterLevel::Manager => self.manager_id.as_deref(),
            FilterLevel::Project => self.project_id.as_deref(),
            FilterLevel::Stage => self.stage_id.as_deref(),
            FilterLevel::Object => self.object_id.as_deref(),
            FilterLevel::Subdivision => self.subdivision_id.as_deref(),
            FilterLevel::Department => self.department_id.as_deref(),
            FilterLevel::Team => self.team_id.as_deref(),
            FilterLevel::Employee => self.employee_id.as_deref(),
        }
    }

    /// Overwrite the selection at `level`.
    pub fn set(&mut self, level: FilterLevel, value: Option<String>) {
        match level {
            FilterLevel::Manager => self.manager_id = value,
            FilterLevel::Project => self.project_id = value,
            FilterLevel::Stage => self.stage_id = value,
            FilterLevel::Object => self.object_id = value,
            FilterLevel::Subdivision => self.subdivision_id = value,
            FilterLevel::Department => self.department_id = value,
            FilterLevel::Team => self.team_id = value,
            FilterLevel::Employee => self.employee_id = value,
        }
    }

    /// True when no level has a selection.
    pub fn is_empty(&self) -> bool {
        FilterLevel::ALL.iter().all(|level| self.get(*level).is_none())
    }
}

/// The on-disk shape: the eight selection ids plus when they were saved.
///
/// Written on every successful mutation, read once at startup. The engine
/// never trusts restored ids blindly (see `engine::rehydrate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub selection: FilterSelection,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

impl PersistedSnapshot {
    pub fn new(selection: FilterSelection) -> Self {
        Self {
            selection,
            saved_at: Utc::now(),
        }
    }
}
