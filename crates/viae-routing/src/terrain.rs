//! Read-only terrain classification consumed by searches.
//!
//! The grid storage derives several independent passability layers per
//! cell (citizen movement, non-citizen movement, walls, water) together
//! with raw terrain flags, building identity and the chain of mobile
//! entities standing on the cell. This module defines those
//! classifications and the [`RoutingTerrain`] trait through which the
//! routing engine reads them. The engine never writes terrain; mutation
//! goes through [`TileWorks`](crate::TileWorks).

use bitflags::bitflags;

/// Per-cell passability for citizen movement.
///
/// Variants are declared in ascending order of their wire values so that
/// derived ordering matches numeric comparisons on the classification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum CitizenClass {
    /// Reservoir connector tile: only an aqueduct may pass.
    ReservoirConnector = -4,
    /// An aqueduct occupies the cell.
    Aqueduct = -3,
    /// Non-empty land: buildings, trees, water, rock.
    Blocked = -1,
    /// Road or equivalent paved surface.
    Road = 0,
    /// Rubble, access ramps, gardens: walkable but not paved.
    PassableTerrain = 2,
    /// Fully clear, buildable land.
    ClearTerrain = 4,
}

/// Per-cell passability for non-citizen (enemy, animal) movement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum NonCitizenClass {
    Blocked = -1,
    Passable = 0,
    /// An ordinary building; enemies may breach through it.
    Building = 1,
    /// Gardens, rubble and other clearable obstructions.
    Clearable = 2,
    Wall = 3,
    Gatehouse = 4,
    /// Forts stop everything.
    Fort = 5,
}

/// Per-cell passability for movement along fortifications.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum WallClass {
    Blocked = -1,
    Passable = 0,
    Gatehouse = 2,
}

/// Per-cell passability for water movement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum WaterClass {
    /// Water under a low bridge: boats cannot pass, flotsam can.
    LowBridge = -3,
    /// Water on the map boundary; routes are biased away from it.
    MapEdge = -2,
    Blocked = -1,
    Passable = 0,
}

bitflags! {
    /// Raw terrain bits the routing rules inspect.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct TerrainFlags: u8 {
        const ROAD     = 1 << 0;
        const AQUEDUCT = 1 << 1;
        const WALL     = 1 << 2;
        const BUILDING = 1 << 3;
    }
}

/// Identity of a building record, as stored per cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingId(pub u16);

/// One mobile entity in a cell's occupant chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Occupant {
    /// Whether the entity belongs to the player's side.
    pub friendly: bool,
    /// Whether the entity is currently in the attacking action state.
    pub attacking: bool,
}

/// Map rotation. Placement legality checks swap their row/column axis
/// when the map is viewed rotated a quarter turn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Orientation {
    /// Whether this rotation exchanges the vertical and horizontal axes.
    #[inline]
    pub fn swaps_axes(self) -> bool {
        matches!(self, Orientation::East | Orientation::West)
    }
}

/// Read-only access to terrain classification, addressed by linear cell
/// index over a square grid of `side() × side()` cells.
///
/// Implementors own the grid storage; the routing engine only reads.
pub trait RoutingTerrain {
    /// Side length of the square grid.
    fn side(&self) -> i32;

    fn citizen_class(&self, cell: usize) -> CitizenClass;
    fn noncitizen_class(&self, cell: usize) -> NonCitizenClass;
    fn wall_class(&self, cell: usize) -> WallClass;
    fn water_class(&self, cell: usize) -> WaterClass;

    /// Raw terrain bits for the cell.
    fn flags(&self, cell: usize) -> TerrainFlags;

    /// The building occupying the cell, if any.
    fn building_at(&self, cell: usize) -> Option<BuildingId>;

    /// Whether the building on the cell is a reservoir.
    fn reservoir_at(&self, cell: usize) -> bool;

    /// The chain of mobile entities standing on the cell.
    fn occupants(&self, cell: usize) -> impl Iterator<Item = Occupant> + '_;

    /// Graphic offset of the aqueduct on the cell, relative to the
    /// aqueduct graphic group. Meaningless unless the cell carries an
    /// aqueduct.
    fn aqueduct_graphic(&self, cell: usize) -> i32;

    /// Graphic offset of the road on the cell, relative to the road
    /// graphic group. Meaningless unless the cell carries a road.
    fn road_graphic(&self, cell: usize) -> i32;

    /// Current map rotation.
    fn orientation(&self) -> Orientation;

    /// The per-cell pseudo-random byte used for wandering water routes.
    fn random_at(&self, cell: usize) -> u8;
}

/// Whether a friendly entity is fighting on the cell.
///
/// Walks the occupant chain looking for a friendly occupant in the
/// attacking state; citizens will not route through friendly battles.
pub(crate) fn has_fighting_friendly<T: RoutingTerrain>(terrain: &T, cell: usize) -> bool {
    terrain.occupants(cell).any(|o| o.friendly && o.attacking)
}

/// Whether an enemy entity is fighting on the cell.
pub(crate) fn has_fighting_enemy<T: RoutingTerrain>(terrain: &T, cell: usize) -> bool {
    terrain.occupants(cell).any(|o| !o.friendly && o.attacking)
}
