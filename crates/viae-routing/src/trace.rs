//! Reverse route tracing and structure placement legality.
//!
//! A completed placement field can be walked back from a destination to
//! its source, laying one connected tile per visited cell through the
//! [`TileWorks`] seam. The legality helpers decide whether a tile can
//! host the traced structure at all, which is where the aqueduct/road
//! co-placement rules live.

use viae_core::{Direction, Point};

use crate::field::DistanceField;
use crate::policy::TravelPolicy;
use crate::router::Router;
use crate::terrain::{CitizenClass, RoutingTerrain, TerrainFlags};
use crate::traversal::FloodOpts;

/// Step cap on a reverse trace; exceeding it reports failure.
pub const MAX_TRACE_STEPS: u32 = 400;

/// Terrain mutation effects invoked while tracing.
///
/// Each laying call returns the number of items actually placed on the
/// tile (zero when the tile already carried the structure).
pub trait TileWorks {
    fn lay_road(&mut self, at: Point) -> u32;
    fn lay_wall(&mut self, at: Point) -> u32;
    fn lay_aqueduct(&mut self, at: Point) -> u32;
    /// Remove the wall or aqueduct found by an obstacle-clearing search.
    fn demolish_obstacle(&mut self, at: Point);
}

/// Which structure a traced route lays down.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoutedStructure {
    Road,
    Wall,
    Aqueduct,
    /// Count the tiles an aqueduct would need without touching graphics.
    AqueductMarkOnly,
}

/// Candidate step directions per general-direction bucket, best first.
///
/// Traced structures step cardinally; the table leads with the cardinal
/// closest to the bearing toward the source so the structure comes out
/// geometrically straight.
const STEP_PRIORITY: [[u8; 4]; 8] = [
    [0, 2, 6, 4],
    [0, 2, 6, 4],
    [2, 4, 0, 6],
    [2, 4, 0, 6],
    [4, 6, 2, 0],
    [4, 6, 2, 0],
    [6, 0, 4, 2],
    [6, 0, 4, 2],
];

impl Router {
    /// Walk the last placement field backward from `to` to its source
    /// `from`, laying one tile of `structure` on every visited cell.
    ///
    /// Follows strictly decreasing distances, preferring the straightest
    /// cardinal toward the source. Returns the accumulated placed-item
    /// count, or `None` when the field does not connect `to` back to
    /// `from` or the walk exceeds [`MAX_TRACE_STEPS`]. Tiles laid before
    /// a failure are not rolled back.
    pub fn place_routed<W: TileWorks>(
        &self,
        works: &mut W,
        from: Point,
        to: Point,
        structure: RoutedStructure,
    ) -> Option<u32> {
        let mut offset = self.field.index_of(to)?;
        let mut pos = to;
        let mut items = 0u32;

        for _ in 0..MAX_TRACE_STEPS {
            let distance = self.field.raw(offset);
            if distance <= 0 {
                log::debug!("trace hit an unrouted cell at {pos}");
                return None;
            }
            items += match structure {
                RoutedStructure::Road => works.lay_road(pos),
                RoutedStructure::Wall => works.lay_wall(pos),
                RoutedStructure::Aqueduct => works.lay_aqueduct(pos),
                RoutedStructure::AqueductMarkOnly => 1,
            };
            let Some(general) = Direction::general(pos, from) else {
                return Some(items);
            };
            let mut moved = false;
            for &idx in &STEP_PRIORITY[general.index() as usize] {
                let dir = Direction::ALL[idx as usize];
                let Some(ni) = self.field.index_of(dir.step(pos)) else {
                    continue;
                };
                let next = self.field.raw(ni);
                if next > 0 && next < distance {
                    pos = dir.step(pos);
                    offset = ni;
                    moved = true;
                    break;
                }
            }
            if !moved {
                log::debug!("trace found no descent from {pos}");
                return None;
            }
        }
        None
    }

    /// Flood outward from `from` over citizen-passable land and demolish
    /// the first wall or aqueduct found in the way.
    ///
    /// The search halts the moment such an obstacle turns up next to a
    /// reachable cell; the obstacle is removed through `works` rather
    /// than routed around. Returns whether anything was demolished.
    pub fn clear_closest_obstacle<T: RoutingTerrain, W: TileWorks>(
        &mut self,
        terrain: &T,
        works: &mut W,
        from: Point,
    ) -> bool {
        let Some(source) = self.field.index_of(from) else {
            return false;
        };
        self.stats.total_routes += 1;
        let halted = self.flood(
            terrain,
            source,
            TravelPolicy::ClearObstacle,
            FloodOpts::sweep(crate::traversal::NeighborMode::Four),
        );
        match halted {
            Some(cell) => {
                works.demolish_obstacle(self.field.point_of(cell));
                true
            }
            None => false,
        }
    }

    /// Whether the starting tile of a placement drag is buildable at
    /// all, given the aqueduct/road/reservoir co-occupancy rules.
    pub fn can_start_placement<T: RoutingTerrain>(
        &self,
        terrain: &T,
        at: Point,
        aqueduct: bool,
    ) -> bool {
        match self.field.index_of(at) {
            Some(cell) => can_start_placement(terrain, &self.field, cell, aqueduct),
            None => false,
        }
    }
}

/// Whether a road may be laid under the aqueduct on `cell`.
///
/// Only straight aqueduct segments can span a road, and only across the
/// axis perpendicular to the aqueduct; a neighboring road or routed tile
/// on the crossing axis means the crossing is already taken. Map
/// rotation swaps which axis is checked.
pub fn can_place_road_under_aqueduct<T: RoutingTerrain>(
    terrain: &T,
    field: &DistanceField,
    cell: usize,
) -> bool {
    let graphic = terrain.aqueduct_graphic(cell);
    let vertical = match graphic {
        0 | 2 | 8 | 15 | 17 | 23 => true,
        1 | 3 | 9..=14 | 16 | 18 | 24..=29 => false,
        // Bends and junctions never take a road.
        _ => return false,
    };
    let vertical = vertical != terrain.orientation().swaps_axes();
    let here = field.point_of(cell);
    let axis = if vertical {
        [Direction::Up, Direction::Down]
    } else {
        [Direction::Left, Direction::Right]
    };
    for dir in axis {
        if let Some(ni) = field.index_of(dir.step(here)) {
            // A hard-blocked marker counts as occupied on the crossing
            // axis, same as a routed tile.
            if terrain.flags(ni).contains(TerrainFlags::ROAD) || field.is_touched(ni) {
                return false;
            }
        }
    }
    true
}

/// Whether an aqueduct may cross the road on `cell`.
pub(crate) fn can_place_aqueduct_on_road<T: RoutingTerrain>(
    terrain: &T,
    field: &DistanceField,
    cell: usize,
) -> bool {
    let graphic = terrain.road_graphic(cell);
    if !matches!(graphic, 0 | 1 | 49 | 50) {
        return false;
    }
    let vertical = (graphic == 0 || graphic == 49) != terrain.orientation().swaps_axes();
    let here = field.point_of(cell);
    let axis = if vertical {
        [Direction::Up, Direction::Down]
    } else {
        [Direction::Left, Direction::Right]
    };
    for dir in axis {
        if let Some(ni) = field.index_of(dir.step(here)) {
            if field.is_touched(ni) {
                return false;
            }
        }
    }
    true
}

/// Whether a placement drag may begin on `cell` at all.
pub(crate) fn can_start_placement<T: RoutingTerrain>(
    terrain: &T,
    field: &DistanceField,
    cell: usize,
    aqueduct: bool,
) -> bool {
    match terrain.citizen_class(cell) {
        CitizenClass::Blocked => {
            // Occupied land: an aqueduct may still start on an existing
            // aqueduct or on a reservoir.
            if !aqueduct {
                return false;
            }
            let flags = terrain.flags(cell);
            flags.contains(TerrainFlags::AQUEDUCT)
                || (flags.contains(TerrainFlags::BUILDING) && terrain.reservoir_at(cell))
        }
        // Rubble, access ramps, gardens.
        CitizenClass::PassableTerrain => false,
        CitizenClass::Aqueduct => {
            !aqueduct && can_place_road_under_aqueduct(terrain, field, cell)
        }
        _ => true,
    }
}

/// The graphic offset an aqueduct tile takes once a road runs under it.
///
/// Straight segments shift to their with-road variants; with-road and
/// end-cap segments keep their graphic.
pub fn aqueduct_graphic_with_road(graphic: i32) -> i32 {
    match graphic {
        2 => 8,
        3 => 9,
        0 | 1 | 8 | 9 | 15 | 16 | 17 | 18 | 23 | 24 => graphic,
        _ => 8,
    }
}
