//! Filter axes and levels
//!
//! Two structurally independent axes, each an ordered chain of four levels:
//!
//! ```text
//! Project axis:        Manager → Project → Stage → Object
//! Organizational axis: Subdivision → Department → Team → Employee
//! ```
//!
//! Every place a level is dispatched uses exhaustive matches on
//! [`FilterLevel`], so adding a level is a compile-time checklist rather
//! than a runtime string hunt.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the two filter axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterAxis {
    Project,
    Organization,
}

/// A named position within an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterLevel {
    Manager,
    Project,
    Stage,
    Object,
    Subdivision,
    Department,
    Team,
    Employee,
}

/// The project axis chain, root first.
pub const PROJECT_CHAIN: [FilterLevel; 4] = [
    FilterLevel::Manager,
    FilterLevel::Project,
    FilterLevel::Stage,
    FilterLevel::Object,
];

/// The organizational axis chain, root first.
pub const ORGANIZATION_CHAIN: [FilterLevel; 4] = [
    FilterLevel::Subdivision,
    FilterLevel::Department,
    FilterLevel::Team,
    FilterLevel::Employee,
];

impl FilterAxis {
    /// The axis chain, root first.
    pub fn chain(&self) -> &'static [FilterLevel; 4] {
        match self {
            FilterAxis::Project => &PROJECT_CHAIN,
            FilterAxis::Organization => &ORGANIZATION_CHAIN,
        }
    }
}

impl FilterLevel {
    /// All eight levels, project axis first, each axis root first.
    pub const ALL: [FilterLevel; 8] = [
        FilterLevel::Manager,
        FilterLevel::Project,
        FilterLevel::Stage,
        FilterLevel::Object,
        FilterLevel::Subdivision,
        FilterLevel::Department,
        FilterLevel::Team,
        FilterLevel::Employee,
    ];

    /// The axis this level belongs to.
    pub fn axis(&self) -> FilterAxis {
        match self {
            FilterLevel::Manager
            | FilterLevel::Project
            | FilterLevel::Stage
            | FilterLevel::Object => FilterAxis::Project,
            FilterLevel::Subdivision
            | FilterLevel::Department
            | FilterLevel::Team
            | FilterLevel::Employee => FilterAxis::Organization,
        }
    }

    /// Zero-based position within the axis chain.
    pub fn depth(&self) -> usize {
        match self {
            FilterLevel::Manager | FilterLevel::Subdivision => 0,
            FilterLevel::Project | FilterLevel::Department => 1,
            FilterLevel::Stage | FilterLevel::Team => 2,
            FilterLevel::Object | FilterLevel::Employee => 3,
        }
    }

    /// The level directly above this one in the same axis, if any.
    pub fn parent(&self) -> Option<FilterLevel> {
        let depth = self.depth();
        if depth == 0 {
            None
        } else {
            Some(self.axis().chain()[depth - 1])
        }
    }

    /// The level directly below this one in the same axis, if any.
    pub fn child(&self) -> Option<FilterLevel> {
        let chain = self.axis().chain();
        chain.get(self.depth() + 1).copied()
    }

    /// Strict descendants in the same axis, top-down.
    pub fn descendants(&self) -> &'static [FilterLevel] {
        &self.axis().chain()[self.depth() + 1..]
    }

    /// Strict ancestors in the same axis, nearest first.
    pub fn ancestors(&self) -> Vec<FilterLevel> {
        let chain = self.axis().chain();
        chain[..self.depth()].iter().rev().copied().collect()
    }

    /// Stable snake-case key, used in storage and provider requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterLevel::Manager => "manager",
            FilterLevel::Project => "project",
            FilterLevel::Stage => "stage",
            FilterLevel::Object => "object",
            FilterLevel::Subdivision => "subdivision",
            FilterLevel::Department => "department",
            FilterLevel::Team => "team",
            FilterLevel::Employee => "employee",
        }
    }
}

impl fmt::Display for FilterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level key.
#[derive(Debug, Clone, Error)]
#[error("unknown filter level '{0}'")]
pub struct UnknownLevel(pub String);

impl FromStr for FilterLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(FilterLevel::Manager),
            "project" => Ok(FilterLevel::Project),
            "stage" => Ok(FilterLevel::Stage),
            "object" => Ok(FilterLevel::Object),
            "subdivision" => Ok(FilterLevel::Subdivision),
            "department" => Ok(FilterLevel::Department),
            "team" => Ok(FilterLevel::Team),
            "employee" => Ok(FilterLevel::Employee),
            other => Err(UnknownLevel(other.to_string())),
        }
    }
}
