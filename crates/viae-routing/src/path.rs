//! Path reconstruction by greedy descent over a completed field.

use rand::Rng;
use rand::RngExt;
use viae_core::{Direction, Point};

use crate::field::REACHABLE_LIMIT;
use crate::router::Router;
use crate::terrain::RoutingTerrain;

/// Step cap on reconstructed paths; exceeding it reports failure.
pub const MAX_PATH_LENGTH: usize = 500;

/// Neighbor set scanned while descending a field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PathDirections {
    /// Cardinal steps only.
    Four,
    /// Cardinal and diagonal steps.
    Eight,
}

impl PathDirections {
    /// Stride over the clockwise direction indices: 2 visits only the
    /// cardinals, 1 visits everything.
    #[inline]
    fn stride(self) -> usize {
        match self {
            PathDirections::Four => 2,
            PathDirections::Eight => 1,
        }
    }
}

impl Router {
    /// Reconstruct the walk from `from` (the source of the last search)
    /// to `to` as a sequence of forward compass steps.
    ///
    /// Descends the field from `to` toward the source, never stepping
    /// straight back, preferring on ties the direction that points at
    /// the source. Returns `None` when `to` was not usefully reached,
    /// when the descent hits a gap in the field, or when the walk
    /// exceeds [`MAX_PATH_LENGTH`].
    pub fn path_to(
        &self,
        from: Point,
        to: Point,
        dirs: PathDirections,
    ) -> Option<Vec<Direction>> {
        let dst = self.field.index_of(to)?;
        let mut distance = self.field.raw(dst);
        if distance <= 0 || distance >= REACHABLE_LIMIT {
            return None;
        }

        let stride = dirs.stride();
        let mut steps: Vec<Direction> = Vec::new();
        let mut last: Option<Direction> = None;
        let mut pos = to;
        let mut offset = dst;

        while distance > 1 {
            distance = self.field.raw(offset);
            let general = Direction::general(pos, from);
            let mut chosen: Option<(Direction, usize)> = None;
            for idx in (0..8).step_by(stride) {
                let dir = Direction::ALL[idx];
                if Some(dir) == last {
                    continue;
                }
                let Some(ni) = self.field.index_of(dir.step(pos)) else {
                    continue;
                };
                let next = self.field.raw(ni);
                if next <= 0 {
                    continue;
                }
                if next < distance {
                    distance = next;
                    chosen = Some((dir, ni));
                } else if next == distance && (Some(dir) == general || chosen.is_none()) {
                    distance = next;
                    chosen = Some((dir, ni));
                }
            }
            let (dir, ni) = chosen?;
            pos = dir.step(pos);
            offset = ni;
            let forward = dir.opposite();
            steps.push(forward);
            last = Some(forward);
            if steps.len() >= MAX_PATH_LENGTH {
                return None;
            }
        }
        steps.reverse();
        Some(steps)
    }

    /// Descend from `to` toward the source of the last search and return
    /// the first cell whose distance is within `range`.
    ///
    /// Lets an entity approach "close enough" instead of walking all the
    /// way. Returns `None` when `to` was not usefully reached or the
    /// descent fails before coming within range.
    pub fn closest_within_range(
        &self,
        from: Point,
        to: Point,
        dirs: PathDirections,
        range: i32,
    ) -> Option<Point> {
        let dst = self.field.index_of(to)?;
        let mut distance = self.field.raw(dst);
        if distance <= 0 || distance >= REACHABLE_LIMIT {
            return None;
        }

        let stride = dirs.stride();
        let mut taken = 0usize;
        let mut last: Option<Direction> = None;
        let mut pos = to;
        let mut offset = dst;

        while distance > 1 {
            distance = self.field.raw(offset);
            if distance <= range {
                return Some(pos);
            }
            let general = Direction::general(pos, from);
            let mut chosen: Option<(Direction, usize)> = None;
            for idx in (0..8).step_by(stride) {
                let dir = Direction::ALL[idx];
                if Some(dir) == last {
                    continue;
                }
                let Some(ni) = self.field.index_of(dir.step(pos)) else {
                    continue;
                };
                let next = self.field.raw(ni);
                if next <= 0 {
                    continue;
                }
                if next < distance {
                    distance = next;
                    chosen = Some((dir, ni));
                } else if next == distance && (Some(dir) == general || chosen.is_none()) {
                    distance = next;
                    chosen = Some((dir, ni));
                }
            }
            let (dir, ni) = chosen?;
            pos = dir.step(pos);
            offset = ni;
            last = Some(dir.opposite());
            taken += 1;
            if taken >= MAX_PATH_LENGTH {
                return None;
            }
        }
        None
    }

    /// Reconstruct a water route to `to`, 8-connected, with randomized
    /// tie-breaking.
    ///
    /// Boats draw one random value from `rng` for the whole walk, biasing
    /// every tie toward one arbitrary branch; flotsam instead re-reads
    /// the per-cell random byte at each step, which makes equal-distance
    /// drift visibly wander.
    pub fn water_path<T: RoutingTerrain, R: Rng>(
        &self,
        terrain: &T,
        rng: &mut R,
        to: Point,
        flotsam: bool,
    ) -> Option<Vec<Direction>> {
        let draw = rng.random::<u8>() & 3;
        let dst = self.field.index_of(to)?;
        let mut distance = self.field.raw(dst);
        if distance <= 0 || distance >= REACHABLE_LIMIT {
            return None;
        }

        let mut steps: Vec<Direction> = Vec::new();
        let mut last: Option<Direction> = None;
        let mut pos = to;
        let mut offset = dst;

        while distance > 1 {
            let cell_draw = if flotsam {
                terrain.random_at(offset) & 3
            } else {
                draw
            };
            distance = self.field.raw(offset);
            let mut chosen: Option<(Direction, usize)> = None;
            for dir in Direction::ALL {
                if Some(dir) == last {
                    continue;
                }
                let Some(ni) = self.field.index_of(dir.step(pos)) else {
                    continue;
                };
                let next = self.field.raw(ni);
                if next <= 0 {
                    continue;
                }
                if next < distance {
                    distance = next;
                    chosen = Some((dir, ni));
                } else if next == distance && draw == cell_draw {
                    distance = next;
                    chosen = Some((dir, ni));
                }
            }
            let (dir, ni) = chosen?;
            pos = dir.step(pos);
            offset = ni;
            let forward = dir.opposite();
            steps.push(forward);
            last = Some(forward);
            if steps.len() >= MAX_PATH_LENGTH {
                return None;
            }
        }
        steps.reverse();
        Some(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Reach;
    use crate::terrain::{CitizenClass, WaterClass};
    use crate::testgrid::TerrainFixture;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn walk(from: Point, steps: &[Direction]) -> Point {
        steps.iter().fold(from, |pos, d| d.step(pos))
    }

    #[test]
    fn round_trip_on_an_open_grid() {
        let t = TerrainFixture::open(5);
        let mut r = Router::new(5);
        r.distances_from(&t, p(2, 2));
        let path = r.path_to(p(2, 2), p(0, 0), PathDirections::Four).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(walk(p(2, 2), &path), p(0, 0));
    }

    #[test]
    fn path_length_matches_recorded_distance() {
        let mut t = TerrainFixture::open(6);
        t.set_citizen(p(2, 1), CitizenClass::Blocked);
        t.set_citizen(p(2, 2), CitizenClass::Blocked);
        t.set_citizen(p(2, 3), CitizenClass::Blocked);
        let mut r = Router::new(6);
        r.distances_from(&t, p(0, 2));
        for dest in [p(5, 5), p(4, 2), p(2, 0)] {
            let Reach::Reached(d) = r.reach(dest) else {
                panic!("{dest} unreached");
            };
            let path = r.path_to(p(0, 2), dest, PathDirections::Four).unwrap();
            assert_eq!(path.len() as i32, d - 1, "to {dest}");
            assert_eq!(walk(p(0, 2), &path), dest);
        }
    }

    #[test]
    fn unreached_destination_fails_every_variant() {
        let mut t = TerrainFixture::open(5);
        for y in 0..5 {
            t.set_citizen(p(2, y), CitizenClass::Blocked);
        }
        let mut r = Router::new(5);
        r.distances_from(&t, p(0, 2));
        assert_eq!(r.reach(p(4, 2)), Reach::Unvisited);
        assert!(r.path_to(p(0, 2), p(4, 2), PathDirections::Four).is_none());
        assert!(
            r.closest_within_range(p(0, 2), p(4, 2), PathDirections::Four, 3)
                .is_none()
        );
        let mut rng = StdRng::seed_from_u64(7);
        assert!(r.water_path(&t, &mut rng, p(4, 2), false).is_none());
    }

    #[test]
    fn reconstruction_is_deterministic() {
        let mut t = TerrainFixture::open(7);
        t.set_citizen(p(3, 3), CitizenClass::Blocked);
        let mut r = Router::new(7);
        r.distances_from(&t, p(1, 1));
        let a = r.path_to(p(1, 1), p(6, 6), PathDirections::Four).unwrap();
        let b = r.path_to(p(1, 1), p(6, 6), PathDirections::Four).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn range_stop_returns_the_first_cell_within_range() {
        let t = TerrainFixture::open(5);
        let mut r = Router::new(5);
        r.distances_from(&t, p(2, 2));
        // Descending from (0,0) at distance 5, the first cell at
        // distance ≤ 3 along the canonical walk is (2,0).
        let stop = r
            .closest_within_range(p(2, 2), p(0, 0), PathDirections::Four, 3)
            .unwrap();
        assert_eq!(stop, p(2, 0));
        assert_eq!(r.reach(stop), Reach::Reached(3));
        // A generous range stops at the destination itself.
        let stop = r
            .closest_within_range(p(2, 2), p(0, 0), PathDirections::Four, 9)
            .unwrap();
        assert_eq!(stop, p(0, 0));
    }

    #[test]
    fn flotsam_path_descends_the_eight_connected_field() {
        let mut t = TerrainFixture::open(4);
        for cell in t.bounds().iter() {
            t.set_water(cell, WaterClass::Passable);
            t.set_random(cell, 2);
        }
        let mut r = Router::new(4);
        assert!(r.water_field_flotsam(&t, p(0, 0)));
        assert_eq!(r.reach(p(3, 3)), Reach::Reached(4));
        let mut rng = StdRng::seed_from_u64(3);
        let path = r.water_path(&t, &mut rng, p(3, 3), true).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(walk(p(0, 0), &path), p(3, 3));
    }

    #[test]
    fn eight_direction_descent_takes_diagonals() {
        let mut t = TerrainFixture::open(4);
        for cell in t.bounds().iter() {
            t.set_water(cell, WaterClass::Passable);
        }
        let mut r = Router::new(4);
        assert!(r.water_field_flotsam(&t, p(0, 0)));
        let path = r.path_to(p(0, 0), p(3, 3), PathDirections::Eight).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(walk(p(0, 0), &path), p(3, 3));
    }

    #[test]
    fn boat_route_shuns_the_map_boundary() {
        // Two equal-hop corridors between source and destination: one
        // along penalized edge water, one through open water.
        let mut t = TerrainFixture::open(5);
        for x in 0..5 {
            t.set_water(p(x, 0), WaterClass::MapEdge);
            t.set_water(p(x, 2), WaterClass::Passable);
        }
        t.set_water(p(0, 1), WaterClass::Passable);
        t.set_water(p(4, 1), WaterClass::Passable);
        let mut r = Router::new(5);
        assert!(r.water_field_boat(&t, p(0, 1)));

        // The edge corridor's recorded distances carry the inflation.
        let open = r.reach(p(0, 2)).distance().unwrap();
        let edge = r.reach(p(0, 0)).distance().unwrap();
        assert_eq!(edge, open + crate::policy::WATER_EDGE_PENALTY);

        // The reconstructed route keeps off the boundary row.
        let mut rng = StdRng::seed_from_u64(11);
        let path = r.water_path(&t, &mut rng, p(4, 1), false).unwrap();
        let mut pos = p(0, 1);
        for d in &path {
            pos = d.step(pos);
            assert!(pos.y >= 1, "route touched the boundary at {pos}");
        }
        assert_eq!(pos, p(4, 1));
    }
}
