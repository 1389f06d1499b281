//! Dense in-memory terrain used by the unit tests.

use viae_core::{Grid, Point, Range};

use crate::terrain::{
    BuildingId, CitizenClass, NonCitizenClass, Occupant, Orientation, RoutingTerrain,
    TerrainFlags, WallClass, WaterClass,
};

/// A terrain of parallel classification layers with builder-style
/// setters. `open` starts from walkable land everywhere: citizens may
/// roam, there are no walls, no water, no buildings.
pub(crate) struct TerrainFixture {
    citizen: Grid<CitizenClass>,
    noncitizen: Grid<NonCitizenClass>,
    wall: Grid<WallClass>,
    water: Grid<WaterClass>,
    flags: Grid<TerrainFlags>,
    buildings: Grid<u16>,
    reservoirs: Grid<bool>,
    occupants: Grid<Vec<Occupant>>,
    aqueduct_gfx: Grid<i32>,
    road_gfx: Grid<i32>,
    randoms: Grid<u8>,
    orientation: Orientation,
}

impl TerrainFixture {
    pub(crate) fn open(side: i32) -> Self {
        Self {
            citizen: Grid::new(side, CitizenClass::Road),
            noncitizen: Grid::new(side, NonCitizenClass::Passable),
            wall: Grid::new(side, WallClass::Blocked),
            water: Grid::new(side, WaterClass::Blocked),
            flags: Grid::new(side, TerrainFlags::empty()),
            buildings: Grid::new(side, 0),
            reservoirs: Grid::new(side, false),
            occupants: Grid::new(side, Vec::new()),
            aqueduct_gfx: Grid::new(side, -1),
            road_gfx: Grid::new(side, -1),
            randoms: Grid::new(side, 0),
            orientation: Orientation::North,
        }
    }

    pub(crate) fn cell(&self, p: Point) -> usize {
        self.citizen.index_of(p).expect("point on the test grid")
    }

    pub(crate) fn side_len(&self) -> i32 {
        self.citizen.side()
    }

    pub(crate) fn bounds(&self) -> Range {
        self.citizen.bounds()
    }

    pub(crate) fn set_citizen(&mut self, p: Point, class: CitizenClass) {
        self.citizen.put(p, class);
    }

    pub(crate) fn set_noncitizen(&mut self, p: Point, class: NonCitizenClass) {
        self.noncitizen.put(p, class);
    }

    pub(crate) fn set_wall(&mut self, p: Point, class: WallClass) {
        self.wall.put(p, class);
    }

    pub(crate) fn set_water(&mut self, p: Point, class: WaterClass) {
        self.water.put(p, class);
    }

    pub(crate) fn add_flags(&mut self, p: Point, flags: TerrainFlags) {
        let cell = self.cell(p);
        let merged = *self.flags.get(cell) | flags;
        self.flags.set(cell, merged);
    }

    pub(crate) fn set_building(&mut self, p: Point, id: BuildingId) {
        self.buildings.put(p, id.0);
    }

    pub(crate) fn set_reservoir(&mut self, p: Point, yes: bool) {
        self.reservoirs.put(p, yes);
    }

    pub(crate) fn add_occupant(&mut self, p: Point, occupant: Occupant) {
        let cell = self.cell(p);
        self.occupants.cells_mut()[cell].push(occupant);
    }

    pub(crate) fn set_aqueduct_graphic(&mut self, p: Point, graphic: i32) {
        self.aqueduct_gfx.put(p, graphic);
    }

    pub(crate) fn set_road_graphic(&mut self, p: Point, graphic: i32) {
        self.road_gfx.put(p, graphic);
    }

    pub(crate) fn set_random(&mut self, p: Point, value: u8) {
        self.randoms.put(p, value);
    }

    pub(crate) fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }
}

impl RoutingTerrain for TerrainFixture {
    fn side(&self) -> i32 {
        self.citizen.side()
    }

    fn citizen_class(&self, cell: usize) -> CitizenClass {
        *self.citizen.get(cell)
    }

    fn noncitizen_class(&self, cell: usize) -> NonCitizenClass {
        *self.noncitizen.get(cell)
    }

    fn wall_class(&self, cell: usize) -> WallClass {
        *self.wall.get(cell)
    }

    fn water_class(&self, cell: usize) -> WaterClass {
        *self.water.get(cell)
    }

    fn flags(&self, cell: usize) -> TerrainFlags {
        *self.flags.get(cell)
    }

    fn building_at(&self, cell: usize) -> Option<BuildingId> {
        match *self.buildings.get(cell) {
            0 => None,
            id => Some(BuildingId(id)),
        }
    }

    fn reservoir_at(&self, cell: usize) -> bool {
        *self.reservoirs.get(cell)
    }

    fn occupants(&self, cell: usize) -> impl Iterator<Item = Occupant> + '_ {
        self.occupants.get(cell).iter().copied()
    }

    fn aqueduct_graphic(&self, cell: usize) -> i32 {
        *self.aqueduct_gfx.get(cell)
    }

    fn road_graphic(&self, cell: usize) -> i32 {
        *self.road_gfx.get(cell)
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn random_at(&self, cell: usize) -> u8 {
        *self.randoms.get(cell)
    }
}
