//! The routing context: field, frontier and telemetry in one place.

use viae_core::{Grid, Point, Range};

use crate::field::{DistanceField, Reach};
use crate::frontier::Frontier;
use crate::traversal::WATER_DRAG_BUDGET;

/// Side length of the production map grid.
pub const MAP_SIDE_DEFAULT: i32 = 162;

/// Telemetry counters over the lifetime of a `Router`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStats {
    /// Searches performed, of any kind.
    pub total_routes: u32,
    /// Searches performed on behalf of enemy movement.
    pub enemy_routes: u32,
}

/// Central coordinator for routing on one square grid.
///
/// `Router` owns the distance field, the frontier queue and the water
/// drag counters so that repeated searches incur no allocations after
/// construction. Exactly one search is in flight at a time: every search
/// clears and overwrites the previous field, and the field stays valid
/// for reading until the next search begins. For concurrent searching,
/// give each caller its own `Router` rather than sharing one.
pub struct Router {
    pub(crate) field: DistanceField,
    pub(crate) frontier: Frontier,
    /// Per-cell re-visitation counters for the water drag policy.
    pub(crate) drag: Grid<u8>,
    pub(crate) stats: RouteStats,
}

impl Router {
    /// Create a router for a `side` × `side` grid.
    pub fn new(side: i32) -> Self {
        let cells = (side as usize) * (side as usize);
        // Every cell is enqueued at most once by admission, plus up to
        // WATER_DRAG_BUDGET re-enqueues for each map-edge water cell.
        let capacity = cells + WATER_DRAG_BUDGET as usize * 4 * side as usize;
        Self {
            field: DistanceField::new(side),
            frontier: Frontier::with_capacity(capacity),
            drag: Grid::new(side, 0),
            stats: RouteStats::default(),
        }
    }

    /// Side length of the grid this router serves.
    #[inline]
    pub fn side(&self) -> i32 {
        self.field.side()
    }

    /// The grid bounds.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.field.bounds()
    }

    /// The distance field of the last search, for direct consumption.
    #[inline]
    pub fn field(&self) -> &DistanceField {
        &self.field
    }

    /// Interpreted field value at `p` from the last search.
    ///
    /// Out-of-bounds points read as unvisited.
    #[inline]
    pub fn reach(&self, p: Point) -> Reach {
        match self.field.index_of(p) {
            Some(i) => self.field.reach(i),
            None => Reach::Unvisited,
        }
    }

    /// Zero the field over `rect`, retracting the region from the last
    /// search's result (for example a footprint about to be built over).
    pub fn block(&mut self, rect: Range) {
        self.field.block(rect);
    }

    /// Telemetry counters.
    #[inline]
    pub fn stats(&self) -> RouteStats {
        self.stats
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(MAP_SIDE_DEFAULT)
    }
}
