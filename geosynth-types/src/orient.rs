use crate::point::CartesianPoint2d;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Orientation of a triplet of points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    Counterclockwise,
    /// Collinear
    Collinear,
}

impl Orientation {
    /// Determines orientation of a triplet of points.
    ///
    /// Non-comparable values (NaN coordinates) are reported as collinear.
    pub fn triplet<N: num_traits::Float>(
        p: &impl CartesianPoint2d<Num = N>,
        q: &impl CartesianPoint2d<Num = N>,
        r: &impl CartesianPoint2d<Num = N>,
    ) -> Self {
        match (q.y() - p.y()) * (r.x() - q.x()) - (q.x() - p.x()) * (r.y() - q.y()) {
            v if v > N::zero() => Self::Clockwise,
            v if v < N::zero() => Self::Counterclockwise,
            _ => Self::Collinear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coord;

    #[test]
    fn triplet() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(1.0, 0.0);
        let c = Coord::new(1.0, 1.0);

        assert_eq!(Orientation::triplet(&a, &b, &c), Orientation::Counterclockwise);
        assert_eq!(Orientation::triplet(&c, &b, &a), Orientation::Clockwise);
        assert_eq!(
            Orientation::triplet(&a, &b, &Coord::new(2.0, 0.0)),
            Orientation::Collinear
        );
        assert_eq!(
            Orientation::triplet(&a, &b, &Coord::new(f64::NAN, 0.0)),
            Orientation::Collinear
        );
    }
}
