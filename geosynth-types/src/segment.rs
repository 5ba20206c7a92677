use crate::orient::Orientation;
use crate::point::CartesianPoint2d;
use num_traits::Zero;

/// A strait line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

impl<P> Clone for Segment<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Segment<'_, P> {}

impl<P: CartesianPoint2d> Segment<'_, P> {
    /// Returns true, if the segment has at least one common point with the `other` segment.
    ///
    /// Touching endpoints and collinear overlaps count as intersections.
    pub fn intersects<Point: CartesianPoint2d<Num = P::Num>>(&self, other: &Segment<Point>) -> bool {
        let o1 = Orientation::triplet(self.0, self.1, other.0);
        let o2 = Orientation::triplet(self.0, self.1, other.1);
        let o3 = Orientation::triplet(other.0, other.1, self.0);
        let o4 = Orientation::triplet(other.0, other.1, self.1);

        if o1 != o2 && o3 != o4 && [o1, o2, o3, o4].iter().all(|o| *o != Orientation::Collinear) {
            return true;
        }

        (o1 == Orientation::Collinear && within_bounds(self.0, other.0, self.1))
            || (o2 == Orientation::Collinear && within_bounds(self.0, other.1, self.1))
            || (o3 == Orientation::Collinear && within_bounds(other.0, self.0, other.1))
            || (o4 == Orientation::Collinear && within_bounds(other.0, self.1, other.1))
    }

    /// Returns true if `next` continues this segment back over itself: the segments are joined at `self.1 == next.0`,
    /// are collinear and point in opposite directions.
    pub fn folds_back(&self, next: &Segment<P>) -> bool {
        if Orientation::triplet(self.0, self.1, next.1) != Orientation::Collinear {
            return false;
        }

        let dx1 = self.1.x() - self.0.x();
        let dy1 = self.1.y() - self.0.y();
        let dx2 = next.1.x() - next.0.x();
        let dy2 = next.1.y() - next.0.y();

        dx1 * dx2 + dy1 * dy2 < P::Num::zero()
    }

    /// Squared length of the segment.
    pub fn length_sq(&self) -> P::Num {
        self.0.distance_sq(self.1)
    }
}

/// Checks whether `q`, known to be collinear with `p` and `r`, lies within the bounding box of `p`-`r`.
fn within_bounds<N: num_traits::Float>(
    p: &impl CartesianPoint2d<Num = N>,
    q: &impl CartesianPoint2d<Num = N>,
    r: &impl CartesianPoint2d<Num = N>,
) -> bool {
    q.x() <= p.x().max(r.x())
        && q.x() >= p.x().min(r.x())
        && q.y() <= p.y().max(r.y())
        && q.y() >= p.y().min(r.y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coord;

    fn seg<'a>(a: &'a Coord, b: &'a Coord) -> Segment<'a, Coord> {
        Segment(a, b)
    }

    #[test]
    fn crossing_segments_intersect() {
        let (a, b) = (Coord::new(0.0, 0.0), Coord::new(2.0, 2.0));
        let (c, d) = (Coord::new(0.0, 2.0), Coord::new(2.0, 0.0));
        assert!(seg(&a, &b).intersects(&seg(&c, &d)));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let (a, b) = (Coord::new(0.0, 0.0), Coord::new(2.0, 0.0));
        let (c, d) = (Coord::new(0.0, 1.0), Coord::new(2.0, 1.0));
        assert!(!seg(&a, &b).intersects(&seg(&c, &d)));
    }

    #[test]
    fn touching_and_overlapping() {
        let (a, b) = (Coord::new(0.0, 0.0), Coord::new(2.0, 0.0));
        let touching = Coord::new(1.0, 5.0);
        let on_segment = Coord::new(1.0, 0.0);
        assert!(seg(&a, &b).intersects(&seg(&on_segment, &touching)));

        let (c, d) = (Coord::new(1.0, 0.0), Coord::new(3.0, 0.0));
        assert!(seg(&a, &b).intersects(&seg(&c, &d)));

        let (e, f) = (Coord::new(2.5, 0.0), Coord::new(3.0, 0.0));
        assert!(!seg(&a, &b).intersects(&seg(&e, &f)));
    }

    #[test]
    fn disjoint_non_parallel() {
        let (a, b) = (Coord::new(0.0, 0.0), Coord::new(1.0, 1.0));
        let (c, d) = (Coord::new(3.0, 0.0), Coord::new(2.0, 5.0));
        assert!(!seg(&a, &b).intersects(&seg(&c, &d)));
    }

    #[test]
    fn fold_back() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(2.0, 0.0);
        let back = Coord::new(1.0, 0.0);
        let forward = Coord::new(3.0, 0.0);
        let up = Coord::new(2.0, 1.0);

        assert!(seg(&a, &b).folds_back(&seg(&b, &back)));
        assert!(!seg(&a, &b).folds_back(&seg(&b, &forward)));
        assert!(!seg(&a, &b).folds_back(&seg(&b, &up)));
    }
}
