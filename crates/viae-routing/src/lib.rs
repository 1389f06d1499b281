//! Breadth-first routing for tile-based city simulations.
//!
//! This crate computes shortest-path distance fields over a square terrain
//! grid and turns them into walking routes or laid structures:
//!
//! - **Distance fields** rebuilt per search by a flood-fill driver with
//!   destination-match, hop-cap and early-halt termination
//!   ([`Router::distances_from`], [`Router::can_travel_citizen`], …)
//! - **Passability rules** for citizens, enemies, wall walkers, boats,
//!   flotsam and structure placement ([`TravelPolicy`])
//! - **Path reconstruction** by greedy descent with deterministic or
//!   randomized tie-breaking ([`Router::path_to`],
//!   [`Router::water_path`])
//! - **Route tracing** that lays roads, walls or aqueducts backward along
//!   a field ([`Router::place_routed`])
//!
//! Everything runs through a [`Router`], which owns the distance field,
//! the frontier queue and the telemetry counters. One `Router` serves one
//! search at a time; a new search overwrites the previous field, so
//! callers extract paths or reachability answers before issuing the next
//! one. Concurrent searching means one `Router` per caller, never a
//! shared instance.
//!
//! Terrain classification is read through the [`RoutingTerrain`] trait and
//! is never mutated here; structure placement and demolition go through
//! the [`TileWorks`] seam.

mod field;
mod frontier;
mod path;
mod policy;
mod router;
mod terrain;
mod trace;
mod traversal;

#[cfg(test)]
mod testgrid;

pub use field::{BLOCKED, DistanceField, REACHABLE_LIMIT, Reach, UNVISITED};
pub use frontier::Frontier;
pub use path::{MAX_PATH_LENGTH, PathDirections};
pub use policy::{Decision, TravelPolicy, WATER_EDGE_PENALTY};
pub use router::{MAP_SIDE_DEFAULT, RouteStats, Router};
pub use terrain::{
    BuildingId, CitizenClass, NonCitizenClass, Occupant, Orientation, RoutingTerrain,
    TerrainFlags, WallClass, WaterClass,
};
pub use trace::{
    MAX_TRACE_STEPS, RoutedStructure, TileWorks, aqueduct_graphic_with_road,
    can_place_road_under_aqueduct,
};
pub use traversal::{MAX_SWEEP_TILES, PlacementKind, WATER_DRAG_BUDGET};
