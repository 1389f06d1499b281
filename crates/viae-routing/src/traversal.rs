//! The generic flood-fill driver and the searches built on it.

use viae_core::Point;

use crate::field::UNVISITED;
use crate::policy::{Decision, TravelPolicy};
use crate::router::Router;
use crate::terrain::{BuildingId, RoutingTerrain, TerrainFlags, WaterClass};
use crate::trace::{can_place_aqueduct_on_road, can_start_placement};

/// Hard cap on cells dequeued by an open-ended water sweep.
pub const MAX_SWEEP_TILES: u32 = 50_000;

/// How many times a map-edge water cell is re-enqueued unchanged before
/// it expands, approximating extra traversal cost without weighted
/// edges.
pub const WATER_DRAG_BUDGET: u8 = 4;

/// Which structure a placement feasibility sweep is for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlacementKind {
    Road,
    Aqueduct,
}

impl PlacementKind {
    #[inline]
    fn is_aqueduct(self) -> bool {
        matches!(self, PlacementKind::Aqueduct)
    }
}

/// Neighbor set expanded around each dequeued cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum NeighborMode {
    Four,
    Eight,
}

/// Termination and re-visitation knobs for one flood run.
#[derive(Copy, Clone, Debug)]
pub(crate) struct FloodOpts {
    pub(crate) neighbors: NeighborMode,
    /// Stop as soon as this cell is dequeued.
    pub(crate) dest: Option<usize>,
    /// Stop after this many cells have been dequeued.
    pub(crate) max_tiles: Option<u32>,
    /// Re-enqueue map-edge water cells before expanding them.
    pub(crate) water_drag: bool,
}

impl FloodOpts {
    /// Full-field sweep, no early termination.
    pub(crate) fn sweep(neighbors: NeighborMode) -> Self {
        Self {
            neighbors,
            dest: None,
            max_tiles: None,
            water_drag: false,
        }
    }

    /// Stop when `dest` is dequeued.
    pub(crate) fn to(dest: usize) -> Self {
        Self {
            neighbors: NeighborMode::Four,
            dest: Some(dest),
            max_tiles: None,
            water_drag: false,
        }
    }
}

impl Router {
    /// Run one breadth-first flood from `source` under `policy`.
    ///
    /// Clears the previous field, seeds the source at distance 1 and
    /// expands in discovery order until the frontier drains or a
    /// termination condition fires. Returns the cell a
    /// [`Decision::Halt`] stopped on, if any.
    pub(crate) fn flood<T: RoutingTerrain>(
        &mut self,
        terrain: &T,
        source: usize,
        policy: TravelPolicy,
        opts: FloodOpts,
    ) -> Option<usize> {
        self.field.reset();
        if opts.water_drag {
            self.drag.fill(0);
        }
        self.field.set_source(source);
        self.frontier.clear();
        self.frontier.push(source);

        let mut tiles: u32 = 0;
        let mut halted = None;

        'search: while let Some(offset) = self.frontier.pop() {
            if opts.dest == Some(offset) {
                break;
            }
            tiles += 1;
            if let Some(max) = opts.max_tiles {
                if tiles > max {
                    break;
                }
            }
            if opts.water_drag && terrain.water_class(offset) == WaterClass::MapEdge {
                let seen = *self.drag.get(offset);
                if seen < WATER_DRAG_BUDGET {
                    self.drag.set(offset, seen + 1);
                    self.frontier.push(offset);
                    continue;
                }
            }
            let dist = 1 + self.field.raw(offset);
            let here = self.field.point_of(offset);
            let four;
            let eight;
            let candidates: &[Point] = match opts.neighbors {
                NeighborMode::Four => {
                    four = here.neighbors_4();
                    &four
                }
                NeighborMode::Eight => {
                    eight = here.neighbors_8();
                    &eight
                }
            };
            for &next in candidates {
                let Some(ni) = self.field.index_of(next) else {
                    continue;
                };
                if self.field.raw(ni) != UNVISITED {
                    continue;
                }
                match policy.decide(terrain, &self.field, ni) {
                    Decision::Admit => {
                        self.field.admit(ni, dist);
                        self.frontier.push(ni);
                    }
                    Decision::AdmitPenalized(penalty) => {
                        self.field.admit(ni, dist);
                        self.frontier.push(ni);
                        self.field.add_penalty(ni, penalty);
                    }
                    Decision::Reject => {}
                    Decision::MarkBlocked => self.field.mark_blocked(ni),
                    Decision::Halt => {
                        halted = Some(ni);
                        break 'search;
                    }
                }
            }
        }
        log::trace!("flood expanded {tiles} tiles");
        halted
    }

    /// Build the citizen walking-distance field from `from`, ignoring
    /// combat. The field stays readable until the next search.
    pub fn distances_from<T: RoutingTerrain>(&mut self, terrain: &T, from: Point) {
        let Some(source) = self.field.index_of(from) else {
            return;
        };
        self.stats.total_routes += 1;
        self.flood(
            terrain,
            source,
            TravelPolicy::CitizenStatic,
            FloodOpts::sweep(NeighborMode::Four),
        );
    }

    /// Whether a citizen can walk from `from` to `to` over land, keeping
    /// clear of friendly battles.
    pub fn can_travel_citizen<T: RoutingTerrain>(
        &mut self,
        terrain: &T,
        from: Point,
        to: Point,
    ) -> bool {
        self.travel_check(terrain, from, to, TravelPolicy::Citizen, None)
    }

    /// Whether a route confined to roads and gardens exists from `from`
    /// to `to`.
    pub fn can_travel_road_garden<T: RoutingTerrain>(
        &mut self,
        terrain: &T,
        from: Point,
        to: Point,
    ) -> bool {
        self.travel_check(terrain, from, to, TravelPolicy::CitizenRoadGarden, None)
    }

    /// Whether `to` can be reached from `from` along fortifications.
    pub fn can_travel_walls<T: RoutingTerrain>(
        &mut self,
        terrain: &T,
        from: Point,
        to: Point,
    ) -> bool {
        self.travel_check(terrain, from, to, TravelPolicy::WallWalker, None)
    }

    /// Whether a non-citizen can reach `to` from `from`.
    ///
    /// With `through`, movement may breach exactly that building and the
    /// search runs uncapped; otherwise it dequeues at most `max_tiles`
    /// cells and a truncated search simply reports unreachable.
    pub fn can_travel_noncitizen<T: RoutingTerrain>(
        &mut self,
        terrain: &T,
        from: Point,
        to: Point,
        through: Option<BuildingId>,
        max_tiles: u32,
    ) -> bool {
        self.stats.enemy_routes += 1;
        match through {
            Some(id) => self.travel_check(
                terrain,
                from,
                to,
                TravelPolicy::NonCitizenThroughBuilding(id),
                None,
            ),
            None => {
                self.travel_check(terrain, from, to, TravelPolicy::NonCitizen, Some(max_tiles))
            }
        }
    }

    /// Coarse reachability: whether anything non-citizen could ever get
    /// from `from` to `to`, combat and forts ignored.
    pub fn can_travel_everything<T: RoutingTerrain>(
        &mut self,
        terrain: &T,
        from: Point,
        to: Point,
    ) -> bool {
        self.travel_check(terrain, from, to, TravelPolicy::NonCitizenAll, None)
    }

    fn travel_check<T: RoutingTerrain>(
        &mut self,
        terrain: &T,
        from: Point,
        to: Point,
        policy: TravelPolicy,
        max_tiles: Option<u32>,
    ) -> bool {
        let (Some(source), Some(dest)) = (self.field.index_of(from), self.field.index_of(to))
        else {
            return false;
        };
        self.stats.total_routes += 1;
        let mut opts = FloodOpts::to(dest);
        opts.max_tiles = max_tiles;
        self.flood(terrain, source, policy, opts);
        self.field.raw(dest) > 0
    }

    /// Build the feasibility field for laying a road or aqueduct from
    /// `from`. Returns false without searching when the starting tile
    /// itself is not buildable.
    ///
    /// Cells where an existing perpendicular structure makes the
    /// crossing illegal are marked [`Reach::Blocked`](crate::Reach),
    /// letting the feasibility display distinguish "impossible here"
    /// from "too far". The starting-tile legality is judged against the
    /// field of the previous search, which the caller built over this
    /// same placement drag.
    pub fn distances_for_placement<T: RoutingTerrain>(
        &mut self,
        terrain: &T,
        from: Point,
        kind: PlacementKind,
    ) -> bool {
        let Some(source) = self.field.index_of(from) else {
            return false;
        };
        let aqueduct = kind.is_aqueduct();
        if !can_start_placement(terrain, &self.field, source, aqueduct) {
            return false;
        }
        if terrain.flags(source).contains(TerrainFlags::ROAD)
            && aqueduct
            && !can_place_aqueduct_on_road(terrain, &self.field, source)
        {
            return false;
        }
        self.stats.total_routes += 1;
        self.flood(
            terrain,
            source,
            TravelPolicy::Placement { aqueduct },
            FloodOpts::sweep(NeighborMode::Four),
        );
        true
    }

    /// Build the feasibility field for a wall starting at `from`.
    pub fn distances_for_wall<T: RoutingTerrain>(&mut self, terrain: &T, from: Point) {
        let Some(source) = self.field.index_of(from) else {
            return;
        };
        self.flood(
            terrain,
            source,
            TravelPolicy::WallPlacement,
            FloodOpts::sweep(NeighborMode::Four),
        );
    }

    /// Build the boat distance field from `from`, with the map-edge
    /// drag and distance inflation. Returns false when the source cell
    /// is blocked water, leaving the previous field untouched.
    pub fn water_field_boat<T: RoutingTerrain>(&mut self, terrain: &T, from: Point) -> bool {
        let Some(source) = self.field.index_of(from) else {
            return false;
        };
        if terrain.water_class(source) == WaterClass::Blocked {
            return false;
        }
        self.flood(
            terrain,
            source,
            TravelPolicy::WaterBoat,
            FloodOpts {
                neighbors: NeighborMode::Four,
                dest: None,
                max_tiles: Some(MAX_SWEEP_TILES),
                water_drag: true,
            },
        );
        true
    }

    /// Build the flotsam distance field from `from`: 8-connected, any
    /// non-blocked water. Returns false when the source cell is blocked
    /// water, leaving the previous field untouched.
    pub fn water_field_flotsam<T: RoutingTerrain>(&mut self, terrain: &T, from: Point) -> bool {
        let Some(source) = self.field.index_of(from) else {
            return false;
        };
        if terrain.water_class(source) == WaterClass::Blocked {
            return false;
        }
        self.flood(
            terrain,
            source,
            TravelPolicy::WaterFlotsam,
            FloodOpts {
                neighbors: NeighborMode::Eight,
                dest: None,
                max_tiles: Some(MAX_SWEEP_TILES),
                water_drag: false,
            },
        );
        true
    }
}
