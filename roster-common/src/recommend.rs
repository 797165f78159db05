//! Recommendation request preparation
//!
//! The generative call itself lives behind [`Recommender`]; this module
//! builds its input from a snapshot and resolves its output back to records.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Assignment, FleetData, Vehicle};
use crate::Result;

/// Input to the recommendation backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationInput {
    pub favorite_vehicle_ids: Vec<String>,
    pub favorite_assignment_ids: Vec<String>,
    /// Candidate vehicles, favorites excluded
    pub all_vehicle_ids: Vec<String>,
    /// Candidate assignments, favorites excluded
    pub all_assignment_ids: Vec<String>,
}

impl RecommendationInput {
    /// Build an input from favorites and the snapshot's id pools
    pub fn from_snapshot(
        data: &FleetData,
        favorite_vehicle_ids: Vec<String>,
        favorite_assignment_ids: Vec<String>,
    ) -> Self {
        let fav_vehicles: HashSet<&str> = favorite_vehicle_ids.iter().map(String::as_str).collect();
        let fav_assignments: HashSet<&str> =
            favorite_assignment_ids.iter().map(String::as_str).collect();

        let all_vehicle_ids = data
            .vehicles
            .iter()
            .filter(|v| !fav_vehicles.contains(v.id.as_str()))
            .map(|v| v.id.clone())
            .collect();
        let all_assignment_ids = data
            .assignments
            .iter()
            .filter(|a| !fav_assignments.contains(a.id.as_str()))
            .map(|a| a.id.clone())
            .collect();

        Self {
            favorite_vehicle_ids,
            favorite_assignment_ids,
            all_vehicle_ids,
            all_assignment_ids,
        }
    }
}

/// Raw output of the recommendation backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationOutput {
    #[serde(default)]
    pub recommended_vehicles: Vec<String>,
    #[serde(default)]
    pub recommended_assignments: Vec<String>,
}

/// Recommendations resolved against the snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub recommended_vehicles: Vec<String>,
    pub recommended_assignments: Vec<String>,
    pub vehicles: Vec<Vehicle>,
    pub assignments: Vec<Assignment>,
}

impl Recommendations {
    /// Keep only ids present in the snapshot, in the backend's order
    pub fn resolve(data: &FleetData, output: RecommendationOutput) -> Self {
        let vehicles: Vec<Vehicle> = output
            .recommended_vehicles
            .iter()
            .filter_map(|id| data.vehicle(id).cloned())
            .collect();
        let assignments: Vec<Assignment> = output
            .recommended_assignments
            .iter()
            .filter_map(|id| data.assignment(id).cloned())
            .collect();

        Self {
            recommended_vehicles: vehicles.iter().map(|v| v.id.clone()).collect(),
            recommended_assignments: assignments.iter().map(|a| a.id.clone()).collect(),
            vehicles,
            assignments,
        }
    }
}

/// External generative recommendation call
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, input: &RecommendationInput) -> Result<RecommendationOutput>;
}
