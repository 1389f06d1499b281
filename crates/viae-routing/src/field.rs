//! The shared per-search distance field.

use viae_core::{Grid, Point, Range};

/// Raw field value of a cell no search has reached.
pub const UNVISITED: i32 = 0;

/// Raw field value of a cell a placement search proved structurally
/// impossible — a stronger fact than merely unreached.
pub const BLOCKED: i32 = -1;

/// Distances at or above this are treated as "not usefully reachable"
/// by every consumer, even when numerically present in the field.
pub const REACHABLE_LIMIT: i32 = 998;

/// Interpreted view of one distance-field cell.
///
/// The raw encoding is kept for the hot loops; consumers read through
/// this to make the sentinel semantics explicit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reach {
    /// Never visited by the last search.
    Unvisited,
    /// Proven structurally impossible by a placement search.
    Blocked,
    /// Reached at `1 + hops` from the source (the source itself is 1).
    Reached(i32),
    /// Numerically set but beyond [`REACHABLE_LIMIT`].
    Far,
}

impl Reach {
    /// Interpret a raw field value.
    #[inline]
    pub fn of(raw: i32) -> Self {
        match raw {
            UNVISITED => Reach::Unvisited,
            BLOCKED => Reach::Blocked,
            d if d >= REACHABLE_LIMIT => Reach::Far,
            d => Reach::Reached(d),
        }
    }

    /// Whether the cell was reached at a usable distance.
    #[inline]
    pub fn is_reached(self) -> bool {
        matches!(self, Reach::Reached(_))
    }

    /// The recorded distance counter, if usable.
    #[inline]
    pub fn distance(self) -> Option<i32> {
        match self {
            Reach::Reached(d) => Some(d),
            _ => None,
        }
    }
}

/// Grid-sized array of distance counters, rebuilt from scratch by every
/// search and read until the next search begins.
#[derive(Clone, Debug)]
pub struct DistanceField {
    cells: Grid<i32>,
}

impl DistanceField {
    /// Create a field for a `side` × `side` grid, all unvisited.
    pub fn new(side: i32) -> Self {
        Self {
            cells: Grid::new(side, UNVISITED),
        }
    }

    /// Side length of the grid.
    #[inline]
    pub fn side(&self) -> i32 {
        self.cells.side()
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the field has no cells. Never true.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The grid bounds.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.cells.bounds()
    }

    /// Linear index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn index_of(&self, p: Point) -> Option<usize> {
        self.cells.index_of(p)
    }

    /// The point addressed by linear index `i`.
    #[inline]
    pub fn point_of(&self, i: usize) -> Point {
        self.cells.point_of(i)
    }

    /// Clear every cell to unvisited.
    pub fn reset(&mut self) {
        self.cells.fill(UNVISITED);
    }

    /// Raw value at linear index `i`.
    #[inline]
    pub fn raw(&self, i: usize) -> i32 {
        *self.cells.get(i)
    }

    /// Interpreted value at linear index `i`.
    #[inline]
    pub fn reach(&self, i: usize) -> Reach {
        Reach::of(self.raw(i))
    }

    /// Whether any search decision has written the cell (reached, blocked
    /// or inflated) — anything but unvisited.
    #[inline]
    pub fn is_touched(&self, i: usize) -> bool {
        self.raw(i) != UNVISITED
    }

    /// Mark `i` as the search source (distance 1).
    #[inline]
    pub fn set_source(&mut self, i: usize) {
        self.cells.set(i, 1);
    }

    /// Record distance `dist` at `i` if the cell is still unvisited.
    ///
    /// First discovery wins: an already-set cell is never overwritten,
    /// which is what makes breadth-order distances minimal.
    #[inline]
    pub fn admit(&mut self, i: usize, dist: i32) -> bool {
        if self.raw(i) != UNVISITED {
            return false;
        }
        self.cells.set(i, dist);
        true
    }

    /// Inflate an already-recorded distance by `amount`.
    #[inline]
    pub fn add_penalty(&mut self, i: usize, amount: i32) {
        let v = self.raw(i);
        debug_assert!(v > 0, "penalty on an unvisited cell");
        self.cells.set(i, v + amount);
    }

    /// Mark `i` structurally blocked.
    #[inline]
    pub fn mark_blocked(&mut self, i: usize) {
        self.cells.set(i, BLOCKED);
    }

    /// Zero every cell of `rect` (clipped to the grid), retracting the
    /// region from the previous search's result.
    pub fn block(&mut self, rect: Range) {
        for p in self.bounds().intersect(rect) {
            self.cells.put(p, UNVISITED);
        }
    }
}
