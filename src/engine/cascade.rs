//! Cascade propagation rules
//!
//! Every selection change flows through [`apply_set`]:
//! - a locked level rejects the whole call, no partial state change;
//! - strictly-descendant levels in the same axis are cleared synchronously
//!   (lists are retained, never cleared here);
//! - a non-null project-axis value asks for an immediate-child reload
//!   scoped to the new value (the caller spawns it);
//! - team/employee selections infer their organizational ancestors from the
//!   chosen row's denormalized parent ids, skipping locked ancestors.
//!
//! Downward always runs before upward within one call. Leaves have no
//! descendants so the two never conflict today, but the ordering is part of
//! the contract should intermediate levels ever grow.

use tracing::debug;

use super::state::EngineState;
use crate::levels::{FilterAxis, FilterLevel};

/// What one `set_filter` call actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    /// False when the call was rejected because the level is locked.
    pub applied: bool,
    /// Levels whose selection was cleared (cascade or reset).
    pub cleared: Vec<FilterLevel>,
    /// Ancestor levels written by upward inference, with the inferred id.
    pub inferred: Vec<(FilterLevel, String)>,
    /// Child level the caller must reload, scoped to the new value.
    pub reload: Option<FilterLevel>,
}

impl FilterUpdate {
    pub(crate) fn rejected() -> Self {
        Self::default()
    }

    pub(crate) fn applied() -> Self {
        Self {
            applied: true,
            ..Self::default()
        }
    }
}

// =========================================================================
// SELECTION CHANGE
// =========================================================================

/// Apply one selection change with full cascade semantics.
pub(crate) fn apply_set(
    state: &mut EngineState,
    level: FilterLevel,
    value: Option<String>,
) -> FilterUpdate {
    if state.locked.contains(&level) {
        debug!("set_filter({level}) rejected: level is locked");
        return FilterUpdate::rejected();
    }

    let mut update = FilterUpdate::applied();

    clear_descendants(state, level, &mut update);
    state.selection.set(level, value.clone());

    if let Some(new_value) = value {
        if level.axis() == FilterAxis::Project {
            // Children of a project-axis level are server-scoped lists.
            update.reload = level.child();
        }
        infer_ancestors(state, level, &new_value, &mut update);
        debug!(
            "set_filter({level}) = {new_value}: cleared {:?}, inferred {:?}",
            update.cleared, update.inferred
        );
    } else {
        debug!("set_filter({level}) = none: cleared {:?}", update.cleared);
    }

    update
}

/// Clear all non-locked levels in one step.
pub(crate) fn apply_reset(state: &mut EngineState) -> FilterUpdate {
    let mut update = FilterUpdate::applied();
    for level in FilterLevel::ALL {
        if state.locked.contains(&level) {
            continue;
        }
        if state.selection.get(level).is_some() {
            state.selection.set(level, None);
            update.cleared.push(level);
        }
    }
    debug!("reset_filters: cleared {:?}", update.cleared);
    update
}

// =========================================================================
// DOWNWARD / UPWARD RULES
// =========================================================================

fn clear_descendants(state: &mut EngineState, level: FilterLevel, update: &mut FilterUpdate) {
    for descendant in level.descendants() {
        if state.locked.contains(descendant) {
            continue;
        }
        if state.selection.get(*descendant).is_some() {
            state.selection.set(*descendant, None);
            update.cleared.push(*descendant);
        }
    }
}

/// Upward inference from a leaf-side organizational selection.
///
/// The inferred ids come from the chosen row's denormalized fields, not
/// from whatever happens to be selected, so a locked Department does not
/// block inferring the Subdivision.
fn infer_ancestors(
    state: &mut EngineState,
    level: FilterLevel,
    id: &str,
    update: &mut FilterUpdate,
) {
    let (team_id, department_id) = match level {
        FilterLevel::Employee => match state.lists.find(FilterLevel::Employee, id) {
            Some(employee) => (employee.parent_id.clone(), employee.department_id.clone()),
            None => {
                debug!("employee {id} not in reference list, skipping ancestor inference");
                return;
            }
        },
        FilterLevel::Team => match state.lists.find(FilterLevel::Team, id) {
            Some(team) => (None, team.parent_id.clone()),
            None => {
                debug!("team {id} not in reference list, skipping ancestor inference");
                return;
            }
        },
        _ => return,
    };

    let subdivision_id = department_id.as_deref().and_then(|dep_id| {
        state
            .lists
            .find(FilterLevel::Department, dep_id)
            .and_then(|department| department.parent_id.clone())
    });

    if let Some(team_id) = team_id {
        write_ancestor(state, FilterLevel::Team, team_id, update);
    }
    if let Some(department_id) = department_id {
        write_ancestor(state, FilterLevel::Department, department_id, update);
    }
    if let Some(subdivision_id) = subdivision_id {
        write_ancestor(state, FilterLevel::Subdivision, subdivision_id, update);
    }
}

fn write_ancestor(
    state: &mut EngineState,
    level: FilterLevel,
    id: String,
    update: &mut FilterUpdate,
) {
    if state.locked.contains(&level) {
        return;
    }
    // Already-equal ancestors are idempotent no-op writes.
    if state.selection.get(level) == Some(id.as_str()) {
        return;
    }
    state.selection.set(level, Some(id.clone()));
    update.inferred.push((level, id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReferenceOption;

    fn make_state() -> EngineState {
        let mut state = EngineState::new();
        state.lists.replace(
            FilterLevel::Department,
            vec![ReferenceOption::new("d1", "Civil works").with_parent("s1")],
        );
        state.lists.replace(
            FilterLevel::Team,
            vec![ReferenceOption::new("t1", "Crew 4").with_parent("d1")],
        );
        state.lists.replace(
            FilterLevel::Employee,
            vec![ReferenceOption::new("e1", "Petrov")
                .with_parent("t1")
                .with_department("d1")],
        );
        state
    }

    #[test]
    fn test_downward_cascade_clears_all_descendants() {
        let mut state = make_state();
        state
            .selection
            .set(FilterLevel::Project, Some("p1".to_string()));
        state
            .selection
            .set(FilterLevel::Stage, Some("st1".to_string()));
        state
            .selection
            .set(FilterLevel::Object, Some("o1".to_string()));

        let update = apply_set(&mut state, FilterLevel::Manager, Some("m2".to_string()));

        assert!(update.applied);
        assert_eq!(
            update.cleared,
            vec![FilterLevel::Project, FilterLevel::Stage, FilterLevel::Object]
        );
        assert_eq!(state.selection.get(FilterLevel::Manager), Some("m2"));
        assert_eq!(state.selection.get(FilterLevel::Project), None);
        assert_eq!(state.selection.get(FilterLevel::Stage), None);
        assert_eq!(state.selection.get(FilterLevel::Object), None);
    }

    #[test]
    fn test_project_axis_requests_child_reload() {
        let mut state = make_state();
        let update = apply_set(&mut state, FilterLevel::Project, Some("p1".to_string()));
        assert_eq!(update.reload, Some(FilterLevel::Stage));

        let update = apply_set(&mut state, FilterLevel::Object, Some("o1".to_string()));
        assert_eq!(update.reload, None);
    }

    #[test]
    fn test_null_value_requests_no_reload() {
        let mut state = make_state();
        let update = apply_set(&mut state, FilterLevel::Manager, None);
        assert_eq!(update.reload, None);
    }

    #[test]
    fn test_organizational_axis_requests_no_reload() {
        let mut state = make_state();
        let update = apply_set(&mut state, FilterLevel::Subdivision, Some("s1".to_string()));
        assert_eq!(update.reload, None);
    }

    #[test]
    fn test_locked_level_rejects_whole_call() {
        let mut state = make_state();
        state.locked.insert(FilterLevel::Department);
        state
            .selection
            .set(FilterLevel::Team, Some("t1".to_string()));
        let before = state.selection.clone();

        let update = apply_set(&mut state, FilterLevel::Department, Some("d2".to_string()));

        assert!(!update.applied);
        assert_eq!(state.selection, before);
    }

    #[test]
    fn test_employee_selection_infers_full_ancestor_chain() {
        let mut state = make_state();
        let update = apply_set(&mut state, FilterLevel::Employee, Some("e1".to_string()));

        assert_eq!(state.selection.get(FilterLevel::Employee), Some("e1"));
        assert_eq!(state.selection.get(FilterLevel::Team), Some("t1"));
        assert_eq!(state.selection.get(FilterLevel::Department), Some("d1"));
        assert_eq!(state.selection.get(FilterLevel::Subdivision), Some("s1"));
        assert_eq!(
            update.inferred,
            vec![
                (FilterLevel::Team, "t1".to_string()),
                (FilterLevel::Department, "d1".to_string()),
                (FilterLevel::Subdivision, "s1".to_string()),
            ]
        );
    }

    #[test]
    fn test_team_selection_infers_department_and_subdivision() {
        let mut state = make_state();
        apply_set(&mut state, FilterLevel::Team, Some("t1".to_string()));

        assert_eq!(state.selection.get(FilterLevel::Department), Some("d1"));
        assert_eq!(state.selection.get(FilterLevel::Subdivision), Some("s1"));
    }

    #[test]
    fn test_inference_overwrites_stale_ancestors() {
        let mut state = make_state();
        state
            .selection
            .set(FilterLevel::Department, Some("d9".to_string()));
        state
            .selection
            .set(FilterLevel::Subdivision, Some("s9".to_string()));

        apply_set(&mut state, FilterLevel::Team, Some("t1".to_string()));

        assert_eq!(state.selection.get(FilterLevel::Department), Some("d1"));
        assert_eq!(state.selection.get(FilterLevel::Subdivision), Some("s1"));
    }

    #[test]
    fn test_inference_skips_locked_ancestors() {
        let mut state = make_state();
        state.locked.insert(FilterLevel::Department);
        state
            .selection
            .set(FilterLevel::Department, Some("d9".to_string()));

        apply_set(&mut state, FilterLevel::Employee, Some("e1".to_string()));

        // The locked department keeps its value, but the subdivision is
        // still inferred through the employee's denormalized department.
        assert_eq!(state.selection.get(FilterLevel::Department), Some("d9"));
        assert_eq!(state.selection.get(FilterLevel::Team), Some("t1"));
        assert_eq!(state.selection.get(FilterLevel::Subdivision), Some("s1"));
    }

    #[test]
    fn test_inference_is_idempotent_for_equal_ancestors() {
        let mut state = make_state();
        apply_set(&mut state, FilterLevel::Employee, Some("e1".to_string()));
        let update = apply_set(&mut state, FilterLevel::Employee, Some("e1".to_string()));
        assert!(update.inferred.is_empty());
    }

    #[test]
    fn test_unknown_leaf_id_skips_inference() {
        let mut state = make_state();
        let update = apply_set(&mut state, FilterLevel::Employee, Some("ghost".to_string()));

        assert!(update.applied);
        assert!(update.inferred.is_empty());
        assert_eq!(state.selection.get(FilterLevel::Employee), Some("ghost"));
        assert_eq!(state.selection.get(FilterLevel::Team), None);
    }

    #[test]
    fn test_reset_clears_everything_except_locked() {
        let mut state = make_state();
        for level in FilterLevel::ALL {
            state.selection.set(level, Some(format!("{level}-1")));
        }
        state.locked.insert(FilterLevel::Subdivision);

        let update = apply_reset(&mut state);

        assert!(update.applied);
        assert_eq!(update.cleared.len(), 7);
        assert_eq!(
            state.selection.get(FilterLevel::Subdivision),
            Some("subdivision-1")
        );
        for level in FilterLevel::ALL {
            if level != FilterLevel::Subdivision {
                assert_eq!(state.selection.get(level), None);
            }
        }

        // Idempotent: a second reset changes nothing further.
        let update = apply_reset(&mut state);
        assert!(update.cleared.is_empty());
    }
}
