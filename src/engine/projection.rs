//! Filtered view projections
//!
//! Pure, recomputed-on-read derivations over the current selection and
//! reference lists, with no caches of their own. The project-axis child lists
//! are already server-scoped at load time, so their projections are
//! existence gates rather than client-side filters; the organizational
//! lists are loaded in full and filtered here.

use super::state::EngineState;
use crate::levels::FilterLevel;
use crate::model::ReferenceOption;

/// All projects, or only the selected manager's.
pub(crate) fn filtered_projects(state: &EngineState) -> Vec<ReferenceOption> {
    let projects = state.lists.get(FilterLevel::Project);
    match state.selection.get(FilterLevel::Manager) {
        Some(manager_id) => projects
            .iter()
            .filter(|project| project.parent_id.as_deref() == Some(manager_id))
            .cloned()
            .collect(),
        None => projects.to_vec(),
    }
}

/// Existence gate: the stage list is only meaningful under a selected
/// project.
pub(crate) fn filtered_stages(state: &EngineState) -> Vec<ReferenceOption> {
    if state.selection.get(FilterLevel::Project).is_some() {
        state.lists.get(FilterLevel::Stage).to_vec()
    } else {
        Vec::new()
    }
}

/// Existence gate: the object list is only meaningful under a selected
/// stage.
pub(crate) fn filtered_objects(state: &EngineState) -> Vec<ReferenceOption> {
    if state.selection.get(FilterLevel::Stage).is_some() {
        state.lists.get(FilterLevel::Object).to_vec()
    } else {
        Vec::new()
    }
}

/// Teams under the selected department, or, with only a subdivision
/// selected, teams whose department belongs to that subdivision (two-hop
/// join through the department list).
pub(crate) fn filtered_teams(state: &EngineState) -> Vec<ReferenceOption> {
    let teams = state.lists.get(FilterLevel::Team);

    if let Some(department_id) = state.selection.get(FilterLevel::Department) {
        return teams
            .iter()
            .filter(|team| team.parent_id.as_deref() == Some(department_id))
            .cloned()
            .collect();
    }

    if let Some(subdivision_id) = state.selection.get(FilterLevel::Subdivision) {
        return teams
            .iter()
            .filter(|team| {
                team.parent_id
                    .as_deref()
                    .and_then(|dep_id| state.lists.find(FilterLevel::Department, dep_id))
                    .and_then(|department| department.parent_id.as_deref())
                    == Some(subdivision_id)
            })
            .cloned()
            .collect();
    }

    teams.to_vec()
}

/// Employees filtered by the most specific selected ancestor only:
/// Team > Department > Subdivision, never intersected.
pub(crate) fn filtered_employees(state: &EngineState) -> Vec<ReferenceOption> {
    let employees = state.lists.get(FilterLevel::Employee);

    if let Some(team_id) = state.selection.get(FilterLevel::Team) {
        return employees
            .iter()
            .filter(|employee| employee.parent_id.as_deref() == Some(team_id))
            .cloned()
            .collect();
    }

    if let Some(department_id) = state.selection.get(FilterLevel::Department) {
        return employees
            .iter()
            .filter(|employee| employee.department_id.as_deref() == Some(department_id))
            .cloned()
            .collect();
    }

    if let Some(subdivision_id) = state.selection.get(FilterLevel::Subdivision) {
        return employees
            .iter()
            .filter(|employee| {
                employee
                    .department_id
                    .as_deref()
                    .and_then(|dep_id| state.lists.find(FilterLevel::Department, dep_id))
                    .and_then(|department| department.parent_id.as_deref())
                    == Some(subdivision_id)
            })
            .cloned()
            .collect();
    }

    employees.to_vec()
}
