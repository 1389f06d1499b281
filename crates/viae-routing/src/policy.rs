//! Admission rules applied to candidate cells during a search.

use crate::field::DistanceField;
use crate::terrain::{
    BuildingId, CitizenClass, NonCitizenClass, RoutingTerrain, TerrainFlags, WallClass,
    WaterClass, has_fighting_enemy, has_fighting_friendly,
};
use crate::trace::{can_place_aqueduct_on_road, can_place_road_under_aqueduct};

/// Distance inflation recorded on map-edge water cells, biasing boat
/// routes away from the map boundary.
pub const WATER_EDGE_PENALTY: i32 = 4;

/// What a policy decided about one candidate cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Enter the cell: record the tentative distance and enqueue it.
    Admit,
    /// Enter the cell, then inflate its recorded distance by the given
    /// amount (the cell keeps its breadth position in the frontier).
    AdmitPenalized(i32),
    /// Do not enter the cell.
    Reject,
    /// Do not enter, and record the cell as structurally impossible so
    /// feasibility checks can tell "impossible here" from "too far".
    MarkBlocked,
    /// Stop the whole search at this cell.
    Halt,
}

/// The closed set of passability rules a search can run under.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TravelPolicy {
    /// Citizen movement over roads and walkable land, avoiding cells
    /// where friendly entities are fighting.
    Citizen,
    /// Citizen movement ignoring combat state, for static distance
    /// fields.
    CitizenStatic,
    /// Citizen movement confined to roads and gardens.
    CitizenRoadGarden,
    /// Movement along fortifications.
    WallWalker,
    /// Non-citizen movement, avoiding cells where enemies are fighting.
    NonCitizen,
    /// Non-citizen movement allowed to breach exactly one designated
    /// building (a gate being forced, say).
    NonCitizenThroughBuilding(BuildingId),
    /// Non-citizen movement through everything passable, combat
    /// ignored; coarse reachability.
    NonCitizenAll,
    /// Citizen movement that halts at the first removable obstacle
    /// (wall or aqueduct) instead of routing around it.
    ClearObstacle,
    /// Feasibility sweep for laying a road or an aqueduct.
    Placement {
        /// True when placing an aqueduct, false for a road.
        aqueduct: bool,
    },
    /// Feasibility sweep for building a wall; only fully clear land.
    WallPlacement,
    /// Boat movement: open water, no low bridges, map edge penalized.
    WaterBoat,
    /// Flotsam drift: any non-blocked water.
    WaterFlotsam,
}

impl TravelPolicy {
    /// Decide whether the search may enter `cell`.
    ///
    /// `field` is the in-progress distance field of the same search;
    /// placement rules inspect it to judge crossing legality.
    pub(crate) fn decide<T: RoutingTerrain>(
        &self,
        terrain: &T,
        field: &DistanceField,
        cell: usize,
    ) -> Decision {
        match self {
            TravelPolicy::Citizen => {
                if terrain.citizen_class(cell) >= CitizenClass::Road
                    && !has_fighting_friendly(terrain, cell)
                {
                    Decision::Admit
                } else {
                    Decision::Reject
                }
            }
            TravelPolicy::CitizenStatic => {
                if terrain.citizen_class(cell) >= CitizenClass::Road {
                    Decision::Admit
                } else {
                    Decision::Reject
                }
            }
            TravelPolicy::CitizenRoadGarden => {
                let class = terrain.citizen_class(cell);
                if class >= CitizenClass::Road && class <= CitizenClass::PassableTerrain {
                    Decision::Admit
                } else {
                    Decision::Reject
                }
            }
            TravelPolicy::WallWalker => {
                let class = terrain.wall_class(cell);
                if class >= WallClass::Passable && class <= WallClass::Gatehouse {
                    Decision::Admit
                } else {
                    Decision::Reject
                }
            }
            TravelPolicy::NonCitizen => {
                let class = terrain.noncitizen_class(cell);
                if !has_fighting_enemy(terrain, cell)
                    && class >= NonCitizenClass::Passable
                    && class < NonCitizenClass::Fort
                {
                    Decision::Admit
                } else {
                    Decision::Reject
                }
            }
            TravelPolicy::NonCitizenThroughBuilding(id) => {
                if has_fighting_enemy(terrain, cell) {
                    return Decision::Reject;
                }
                let class = terrain.noncitizen_class(cell);
                let admitted = class == NonCitizenClass::Passable
                    || class == NonCitizenClass::Clearable
                    || (class == NonCitizenClass::Building
                        && terrain.building_at(cell) == Some(*id));
                if admitted { Decision::Admit } else { Decision::Reject }
            }
            TravelPolicy::NonCitizenAll => {
                if terrain.noncitizen_class(cell) >= NonCitizenClass::Passable {
                    Decision::Admit
                } else {
                    Decision::Reject
                }
            }
            TravelPolicy::ClearObstacle => {
                if terrain.citizen_class(cell) >= CitizenClass::Road {
                    Decision::Admit
                } else if terrain
                    .flags(cell)
                    .intersects(TerrainFlags::AQUEDUCT | TerrainFlags::WALL)
                {
                    Decision::Halt
                } else {
                    Decision::Reject
                }
            }
            TravelPolicy::Placement { aqueduct } => {
                placement_decision(terrain, field, cell, *aqueduct)
            }
            TravelPolicy::WallPlacement => {
                if terrain.citizen_class(cell) == CitizenClass::ClearTerrain {
                    Decision::Admit
                } else {
                    Decision::Reject
                }
            }
            TravelPolicy::WaterBoat => match terrain.water_class(cell) {
                WaterClass::Blocked | WaterClass::LowBridge => Decision::Reject,
                WaterClass::MapEdge => Decision::AdmitPenalized(WATER_EDGE_PENALTY),
                _ => Decision::Admit,
            },
            TravelPolicy::WaterFlotsam => {
                if terrain.water_class(cell) == WaterClass::Blocked {
                    Decision::Reject
                } else {
                    Decision::Admit
                }
            }
        }
    }
}

/// Admission rule for laying a road or aqueduct through `cell`.
///
/// Rejects occupied land, rubble and foreign buildings outright; an
/// illegal crossing of an existing perpendicular structure is recorded
/// as a hard block so the feasibility display can distinguish it from
/// plain unreachability.
fn placement_decision<T: RoutingTerrain>(
    terrain: &T,
    field: &DistanceField,
    cell: usize,
    aqueduct: bool,
) -> Decision {
    let mut blocked = false;
    let mut mark = false;
    match terrain.citizen_class(cell) {
        CitizenClass::Aqueduct => {
            if aqueduct {
                blocked = true;
            } else if !can_place_road_under_aqueduct(terrain, field, cell) {
                mark = true;
            }
        }
        // Rubble, gardens, access ramps and non-empty land.
        CitizenClass::PassableTerrain | CitizenClass::Blocked => blocked = true,
        class => {
            if terrain.flags(cell).contains(TerrainFlags::BUILDING)
                && (class != CitizenClass::ReservoirConnector || !aqueduct)
            {
                blocked = true;
            }
        }
    }
    if terrain.flags(cell).contains(TerrainFlags::ROAD)
        && aqueduct
        && !can_place_aqueduct_on_road(terrain, field, cell)
    {
        mark = true;
    }
    if mark {
        Decision::MarkBlocked
    } else if blocked {
        Decision::Reject
    } else {
        Decision::Admit
    }
}
