//! Compass directions over screen coordinates.
//!
//! Directions are numbered clockwise from [`Direction::Up`], so that the
//! opposite of direction `d` is `(d + 4) % 8`. Cardinals are the even
//! indices, diagonals the odd ones.

use crate::geom::Point;

/// One of the eight compass steps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    UpRight = 1,
    Right = 2,
    DownRight = 3,
    Down = 4,
    DownLeft = 5,
    Left = 6,
    UpLeft = 7,
}

impl Direction {
    /// All eight directions, clockwise from up.
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    /// The four cardinal directions.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// The direction at clockwise index `i` (0 = up, …, 7 = up-left).
    #[inline]
    pub const fn from_index(i: u8) -> Option<Direction> {
        if i < 8 { Some(Self::ALL[i as usize]) } else { None }
    }

    /// Clockwise index of this direction (0 = up, …, 7 = up-left).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// The unit step this direction takes on the grid.
    #[inline]
    pub const fn delta(self) -> Point {
        match self {
            Direction::Up => Point::new(0, -1),
            Direction::UpRight => Point::new(1, -1),
            Direction::Right => Point::new(1, 0),
            Direction::DownRight => Point::new(1, 1),
            Direction::Down => Point::new(0, 1),
            Direction::DownLeft => Point::new(-1, 1),
            Direction::Left => Point::new(-1, 0),
            Direction::UpLeft => Point::new(-1, -1),
        }
    }

    /// The direction pointing the opposite way.
    #[inline]
    pub const fn opposite(self) -> Direction {
        Self::ALL[((self as u8 + 4) % 8) as usize]
    }

    /// Whether this is one of the four cardinal directions.
    #[inline]
    pub const fn is_cardinal(self) -> bool {
        self as u8 % 2 == 0
    }

    /// The general compass bearing from `from` toward `to`.
    ///
    /// This is a pure sign bucket over the coordinate deltas, not an octant
    /// computation: any displacement that is both rightward and upward is
    /// [`Direction::UpRight`], however shallow the slope. Returns `None`
    /// when the two points coincide ("arrived").
    pub fn general(from: Point, to: Point) -> Option<Direction> {
        use std::cmp::Ordering::*;
        match (to.x.cmp(&from.x), to.y.cmp(&from.y)) {
            (Equal, Equal) => None,
            (Equal, Less) => Some(Direction::Up),
            (Greater, Less) => Some(Direction::UpRight),
            (Greater, Equal) => Some(Direction::Right),
            (Greater, Greater) => Some(Direction::DownRight),
            (Equal, Greater) => Some(Direction::Down),
            (Less, Greater) => Some(Direction::DownLeft),
            (Less, Equal) => Some(Direction::Left),
            (Less, Less) => Some(Direction::UpLeft),
        }
    }

    /// Apply this step to a point.
    #[inline]
    pub fn step(self, p: Point) -> Point {
        p + self.delta()
    }
}
