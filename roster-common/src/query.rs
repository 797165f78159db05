//! Fleet query engine
//!
//! Pure functions computing what the dashboard shows for a given snapshot
//! and user selection. Nothing here holds state or mutates its inputs.
//!
//! A vehicle belongs to an assignment when either its `ol` equals the
//! assignment code or its plate starts with it. Both paths are needed: the
//! source sheet fills `ol` for some vehicles and leaves it blank for others
//! whose plate carries the code instead.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{Assignment, FleetData, Vehicle};

/// Selector value meaning "no filter"
pub const ANY_VALUE: &str = "any";

/// Length of the assignment code shared by `ol` values and plate prefixes
pub const ASSIGNMENT_CODE_LEN: usize = 3;

/// Suffix appended to the code for the plate prefix hint
pub const PLATE_HINT_SUFFIX: &str = "00";

/// User selection and favorites driving the dashboard views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    pub selected_assignment_id: Option<String>,
    #[serde(default)]
    pub selected_vehicle_model: Option<String>,
    #[serde(default)]
    pub favorite_vehicle_ids: HashSet<String>,
    #[serde(default)]
    pub favorite_assignment_ids: HashSet<String>,
    #[serde(default)]
    pub active_pill_id: Option<String>,
}

/// Computed dashboard views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetView {
    pub favorites_view: Vec<Vehicle>,
    pub roster_view: Vec<Vehicle>,
    pub available_vehicle_models: Vec<String>,
    pub plate_prefix_hint: String,
    pub favorite_assignments: Vec<Assignment>,
}

/// Treat `None`, blank and [`ANY_VALUE`] as unset
fn active(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty() && *v != ANY_VALUE)
}

/// Leading code of an assignment id (`"142A"` gives `"142"`)
pub fn assignment_code(assignment_id: &str) -> &str {
    match assignment_id.char_indices().nth(ASSIGNMENT_CODE_LEN) {
        Some((idx, _)) => &assignment_id[..idx],
        None => assignment_id,
    }
}

/// Whether a vehicle belongs to the assignment with this code
pub fn vehicle_matches(vehicle: &Vehicle, code: &str) -> bool {
    if code.is_empty() {
        return false;
    }
    let plate_prefix: String = vehicle.plate.chars().take(ASSIGNMENT_CODE_LEN).collect();
    vehicle.ol == code || plate_prefix == code
}

/// Vehicles belonging to an assignment, in snapshot order
pub fn vehicles_for_assignment<'a>(
    data: &'a FleetData,
    assignment_id: &str,
) -> impl Iterator<Item = &'a Vehicle> + 'a {
    let code = assignment_code(assignment_id).to_string();
    data.vehicles
        .iter()
        .filter(move |v| vehicle_matches(v, &code))
}

/// Vehicles shown in the roster table
pub fn roster_view(
    data: &FleetData,
    selected_assignment_id: Option<&str>,
    selected_vehicle_model: Option<&str>,
) -> Vec<Vehicle> {
    let Some(assignment_id) = active(selected_assignment_id) else {
        return Vec::new();
    };
    let model = active(selected_vehicle_model);

    vehicles_for_assignment(data, assignment_id)
        .filter(|v| model.map_or(true, |m| v.make_model == m))
        .cloned()
        .collect()
}

/// Active pill, honored only while its assignment is favorited
fn active_pill(selection: &Selection) -> Option<&str> {
    active(selection.active_pill_id.as_deref())
        .filter(|id| selection.favorite_assignment_ids.contains(*id))
}

/// Vehicles shown in the favorites table
///
/// An active pill (which must be a favorited assignment) shows that
/// assignment's vehicles; otherwise the favorited vehicles are shown.
pub fn favorites_view(data: &FleetData, selection: &Selection) -> Vec<Vehicle> {
    match active_pill(selection) {
        Some(assignment_id) => vehicles_for_assignment(data, assignment_id)
            .cloned()
            .collect(),
        None => data
            .vehicles
            .iter()
            .filter(|v| selection.favorite_vehicle_ids.contains(&v.id))
            .cloned()
            .collect(),
    }
}

/// Distinct make/model values for the selected assignment, sorted
pub fn available_vehicle_models(data: &FleetData, selected_assignment_id: Option<&str>) -> Vec<String> {
    let Some(assignment_id) = active(selected_assignment_id) else {
        return Vec::new();
    };

    vehicles_for_assignment(data, assignment_id)
        .map(|v| v.make_model.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Assignment code plus `"00"`, or empty when nothing is selected
pub fn plate_prefix_hint(selected_assignment_id: Option<&str>) -> String {
    match active(selected_assignment_id) {
        Some(id) => format!("{}{}", assignment_code(id), PLATE_HINT_SUFFIX),
        None => String::new(),
    }
}

/// Favorited assignments in snapshot order
pub fn favorite_assignments(data: &FleetData, favorite_ids: &HashSet<String>) -> Vec<Assignment> {
    data.assignments
        .iter()
        .filter(|a| favorite_ids.contains(&a.id))
        .cloned()
        .collect()
}

/// Compute every dashboard view for one selection
pub fn query(data: &FleetData, selection: &Selection) -> FleetView {
    let assignment = selection.selected_assignment_id.as_deref();
    // Clicking a pill also targets its assignment for the plate hint
    let hint_assignment = active(assignment).or_else(|| active_pill(selection));

    FleetView {
        favorites_view: favorites_view(data, selection),
        roster_view: roster_view(data, assignment, selection.selected_vehicle_model.as_deref()),
        available_vehicle_models: available_vehicle_models(data, assignment),
        plate_prefix_hint: plate_prefix_hint(hint_assignment),
        favorite_assignments: favorite_assignments(data, &selection.favorite_assignment_ids),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(id: &str, plate: &str, make_model: &str, ol: &str) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            plate: plate.to_string(),
            make_model: make_model.to_string(),
            ol: ol.to_string(),
            ..Default::default()
        }
    }

    fn assignment(id: &str, name: &str) -> Assignment {
        Assignment {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn fleet() -> FleetData {
        FleetData {
            assignments: vec![
                assignment("120", "Investigations (20)"),
                assignment("142", "Patrol (42)"),
                assignment("155", "Traffic (55)"),
            ],
            vehicles: vec![
                vehicle("1", "142001", "Ford Explorer", ""),
                vehicle("2", "ZZ9001", "Chevy Tahoe", "142"),
                vehicle("3", "155003", "Ford Explorer", ""),
                vehicle("4", "142777", "Chevy Tahoe", "155"),
                vehicle("5", "120010", "Honda Accord", "120"),
                vehicle("6", "14", "Dodge Charger", ""),
            ],
        }
    }

    fn ids(vehicles: &[Vehicle]) -> Vec<&str> {
        vehicles.iter().map(|v| v.id.as_str()).collect()
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_assignment_code() {
        assert_eq!(assignment_code("142"), "142");
        assert_eq!(assignment_code("142A"), "142");
        assert_eq!(assignment_code("1123"), "112");
        assert_eq!(assignment_code("15"), "15");
        assert_eq!(assignment_code(""), "");
    }

    #[test]
    fn test_plate_prefix_match_path() {
        let data = FleetData {
            assignments: vec![assignment("142", "Patrol (42)")],
            vehicles: vec![vehicle("5", "142001", "", "")],
        };
        assert_eq!(ids(&roster_view(&data, Some("142"), None)), vec!["5"]);
    }

    #[test]
    fn test_ol_match_path() {
        let data = FleetData {
            assignments: vec![assignment("142", "Patrol (42)")],
            vehicles: vec![vehicle("5", "ABC123", "", "142")],
        };
        assert_eq!(ids(&roster_view(&data, Some("142"), None)), vec!["5"]);
    }

    #[test]
    fn test_roster_view_uses_either_path_in_snapshot_order() {
        assert_eq!(ids(&roster_view(&fleet(), Some("142"), None)), vec!["1", "2", "4"]);
        // Vehicle 4 has plate 142 but ol 155: it belongs to both
        assert_eq!(ids(&roster_view(&fleet(), Some("155"), None)), vec!["3", "4"]);
    }

    #[test]
    fn test_roster_view_empty_without_assignment() {
        assert!(roster_view(&fleet(), None, None).is_empty());
        assert!(roster_view(&fleet(), Some(ANY_VALUE), Some("Chevy Tahoe")).is_empty());
        assert!(roster_view(&fleet(), Some(""), None).is_empty());
    }

    #[test]
    fn test_roster_view_model_filter() {
        assert_eq!(
            ids(&roster_view(&fleet(), Some("142"), Some("Chevy Tahoe"))),
            vec!["2", "4"]
        );
        assert_eq!(
            ids(&roster_view(&fleet(), Some("142"), Some(ANY_VALUE))),
            vec!["1", "2", "4"]
        );
        assert!(roster_view(&fleet(), Some("142"), Some("Honda Accord")).is_empty());
    }

    #[test]
    fn test_short_plate_never_matches() {
        // Plate "14" is shorter than the code
        assert!(!vehicle_matches(&vehicle("6", "14", "", ""), "142"));
        assert!(!vehicle_matches(&vehicle("6", "", "", ""), ""));
    }

    #[test]
    fn test_available_models_sorted_and_distinct() {
        assert_eq!(
            available_vehicle_models(&fleet(), Some("142")),
            vec!["Chevy Tahoe".to_string(), "Ford Explorer".to_string()]
        );
        assert!(available_vehicle_models(&fleet(), None).is_empty());
    }

    #[test]
    fn test_plate_prefix_hint() {
        assert_eq!(plate_prefix_hint(Some("142")), "14200");
        assert_eq!(plate_prefix_hint(Some("142A")), "14200");
        assert_eq!(plate_prefix_hint(Some(ANY_VALUE)), "");
        assert_eq!(plate_prefix_hint(None), "");
    }

    #[test]
    fn test_favorites_view_by_vehicle_ids() {
        let selection = Selection {
            favorite_vehicle_ids: set(&["5", "1", "missing"]),
            ..Default::default()
        };
        // Snapshot order, unknown ids ignored
        assert_eq!(ids(&favorites_view(&fleet(), &selection)), vec!["1", "5"]);
    }

    #[test]
    fn test_favorites_view_pill_overrides_vehicle_favorites() {
        let selection = Selection {
            favorite_vehicle_ids: set(&["5"]),
            favorite_assignment_ids: set(&["155"]),
            active_pill_id: Some("155".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&favorites_view(&fleet(), &selection)), vec!["3", "4"]);
    }

    #[test]
    fn test_pill_for_unfavorited_assignment_is_ignored() {
        let selection = Selection {
            favorite_vehicle_ids: set(&["5"]),
            active_pill_id: Some("155".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&favorites_view(&fleet(), &selection)), vec!["5"]);
    }

    #[test]
    fn test_query_combines_views() {
        let data = fleet();
        let selection = Selection {
            selected_assignment_id: Some("142".to_string()),
            selected_vehicle_model: Some("Ford Explorer".to_string()),
            favorite_vehicle_ids: set(&["3"]),
            favorite_assignment_ids: set(&["155", "120"]),
            active_pill_id: None,
        };

        let view = query(&data, &selection);
        assert_eq!(ids(&view.roster_view), vec!["1"]);
        assert_eq!(ids(&view.favorites_view), vec!["3"]);
        assert_eq!(view.available_vehicle_models.len(), 2);
        assert_eq!(view.plate_prefix_hint, "14200");
        let fav: Vec<_> = view.favorite_assignments.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(fav, vec!["120", "155"]);

        // Inputs untouched and result deterministic
        assert_eq!(data, fleet());
        assert_eq!(query(&data, &selection), view);
    }

    #[test]
    fn test_plate_hint_follows_active_pill() {
        let mut selection = Selection {
            favorite_assignment_ids: set(&["155"]),
            active_pill_id: Some("155".to_string()),
            ..Default::default()
        };
        assert_eq!(query(&fleet(), &selection).plate_prefix_hint, "15500");

        // An explicit assignment selection wins
        selection.selected_assignment_id = Some("142".to_string());
        assert_eq!(query(&fleet(), &selection).plate_prefix_hint, "14200");

        // No hint from a pill that is no longer favorited
        selection.selected_assignment_id = None;
        selection.favorite_assignment_ids.clear();
        assert_eq!(query(&fleet(), &selection).plate_prefix_hint, "");
    }

    #[test]
    fn test_selection_deserializes_from_camel_case() {
        let selection: Selection = serde_json::from_str(
            r#"{"selectedAssignmentId":"142","favoriteVehicleIds":["1","2"]}"#,
        )
        .unwrap();
        assert_eq!(selection.selected_assignment_id.as_deref(), Some("142"));
        assert_eq!(selection.favorite_vehicle_ids, set(&["1", "2"]));
        assert!(selection.active_pill_id.is_none());
    }
}
