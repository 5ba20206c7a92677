use crate::error::GeometryError;
use crate::point::{CartesianPoint2d, Coord};
use serde::{Deserialize, Serialize};

/// Closed axis-aligned bounding rectangle.
///
/// The bounds are always finite and ordered (`x_min <= x_max`, `y_min <= y_max`), which is enforced by every
/// constructor including deserialization. An envelope with zero width or height is allowed, but reported as
/// [degenerate](Envelope::is_degenerate).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnvelopeBounds", into = "EnvelopeBounds")]
pub struct Envelope {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

#[derive(Serialize, Deserialize)]
struct EnvelopeBounds {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl TryFrom<EnvelopeBounds> for Envelope {
    type Error = GeometryError;

    fn try_from(value: EnvelopeBounds) -> Result<Self, Self::Error> {
        Self::new(value.x_min, value.y_min, value.x_max, value.y_max)
    }
}

impl From<Envelope> for EnvelopeBounds {
    fn from(value: Envelope) -> Self {
        Self {
            x_min: value.x_min,
            y_min: value.y_min,
            x_max: value.x_max,
            y_max: value.y_max,
        }
    }
}

impl Envelope {
    /// The whole longitude/latitude domain: `[-180, -90] - [180, 90]`.
    pub const WORLD: Envelope = Envelope {
        x_min: -180.0,
        y_min: -90.0,
        x_max: 180.0,
        y_max: 90.0,
    };

    /// Creates a new envelope, failing if any bound is not finite or if the bounds are reversed.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self, GeometryError> {
        if ![x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite()) {
            return Err(GeometryError::malformed(
                "Envelope",
                format!("non-finite bounds [{x_min}, {y_min}, {x_max}, {y_max}]"),
            ));
        }
        if x_min > x_max || y_min > y_max {
            return Err(GeometryError::malformed(
                "Envelope",
                format!("min greater than max in [{x_min}, {y_min}, {x_max}, {y_max}]"),
            ));
        }

        Ok(Self {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Creates the envelope spanned by two arbitrary corners.
    pub fn from_corners(a: Coord, b: Coord) -> Result<Self, GeometryError> {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Smallest envelope containing all the given coordinates, or `None` for an empty iterator.
    pub fn from_coords<'a>(mut coords: impl Iterator<Item = &'a Coord>) -> Option<Self> {
        let first = coords.next()?;
        let mut x_min = first.x;
        let mut y_min = first.y;
        let mut x_max = first.x;
        let mut y_max = first.y;

        for c in coords {
            x_min = x_min.min(c.x);
            y_min = y_min.min(c.y);
            x_max = x_max.max(c.x);
            y_max = y_max.max(c.y);
        }

        Self::new(x_min, y_min, x_max, y_max).ok()
    }

    /// Minimum x.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Maximum x.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Minimum y.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Maximum y.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Extent along the x axis.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along the y axis.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Center of the envelope.
    pub fn center(&self) -> Coord {
        Coord::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// True if the envelope has zero width or zero height.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// True if the point lies inside or on the border of the envelope.
    pub fn contains(&self, point: &impl CartesianPoint2d<Num = f64>) -> bool {
        self.x_min <= point.x()
            && self.x_max >= point.x()
            && self.y_min <= point.y()
            && self.y_max >= point.y()
    }

    /// True if `other` lies completely inside this envelope.
    pub fn contains_envelope(&self, other: &Envelope) -> bool {
        self.x_min <= other.x_min
            && self.y_min <= other.y_min
            && self.x_max >= other.x_max
            && self.y_max >= other.y_max
    }

    /// Moves every side of the envelope inwards by the given amounts. If an amount is larger than half of the
    /// extent, the envelope collapses to its center along that axis.
    pub fn shrink(&self, dx: f64, dy: f64) -> Self {
        let center = self.center();
        let half_w = (self.width() / 2.0 - dx).max(0.0);
        let half_h = (self.height() / 2.0 - dy).max(0.0);
        Self {
            x_min: center.x - half_w,
            x_max: center.x + half_w,
            y_min: center.y - half_h,
            y_max: center.y + half_h,
        }
    }

    /// Moves every side inwards by `fraction` of the extent along its axis.
    pub fn shrink_relative(&self, fraction: f64) -> Self {
        self.shrink(self.width() * fraction, self.height() * fraction)
    }

    /// Smallest envelope containing both envelopes.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::WORLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reversed_and_non_finite_bounds() {
        assert!(Envelope::new(0.0, 0.0, 1.0, 1.0).is_ok());
        assert!(Envelope::new(1.0, 0.0, 0.0, 1.0).is_err());
        assert!(Envelope::new(0.0, 1.0, 1.0, 0.0).is_err());
        assert!(Envelope::new(0.0, f64::NAN, 1.0, 1.0).is_err());
        assert!(Envelope::new(0.0, 0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn from_corners_orders_bounds() {
        let env = Envelope::from_corners(Coord::new(5.0, -1.0), Coord::new(-5.0, 1.0)).expect("finite");
        assert_eq!(env, Envelope::new(-5.0, -1.0, 5.0, 1.0).expect("valid"));
    }

    #[test]
    fn degenerate() {
        assert!(Envelope::new(0.0, 0.0, 0.0, 1.0).expect("valid").is_degenerate());
        assert!(Envelope::new(0.0, 0.0, 1.0, 0.0).expect("valid").is_degenerate());
        assert!(!Envelope::WORLD.is_degenerate());
    }

    #[test]
    fn shrink() {
        let env = Envelope::new(0.0, 0.0, 10.0, 4.0).expect("valid");
        assert_eq!(env.shrink(1.0, 1.0), Envelope::new(1.0, 1.0, 9.0, 3.0).expect("valid"));
        assert_eq!(env.shrink_relative(0.25), Envelope::new(2.5, 1.0, 7.5, 3.0).expect("valid"));

        let collapsed = env.shrink(100.0, 100.0);
        assert_eq!(collapsed.center(), env.center());
        assert!(collapsed.is_degenerate());
    }

    #[test]
    fn contains() {
        let env = Envelope::new(0.0, 0.0, 10.0, 10.0).expect("valid");
        assert!(env.contains(&Coord::new(0.0, 10.0)));
        assert!(env.contains(&Coord::new(5.0, 5.0)));
        assert!(!env.contains(&Coord::new(10.1, 5.0)));
        assert!(env.contains_envelope(&env.shrink(1.0, 1.0)));
        assert!(!env.shrink(1.0, 1.0).contains_envelope(&env));
    }

    #[test]
    fn from_coords() {
        let coords = [Coord::new(1.0, 5.0), Coord::new(-2.0, 3.0), Coord::new(4.0, -1.0)];
        let env = Envelope::from_coords(coords.iter()).expect("not empty");
        assert_eq!(env, Envelope::new(-2.0, -1.0, 4.0, 5.0).expect("valid"));
        assert!(Envelope::from_coords([].iter()).is_none());
    }

    #[test]
    fn deserialization_checks_bounds() {
        let ok: Result<Envelope, _> =
            serde_json::from_str(r#"{"x_min":0,"y_min":0,"x_max":10,"y_max":10}"#);
        assert!(ok.is_ok());
        let reversed: Result<Envelope, _> =
            serde_json::from_str(r#"{"x_min":10,"y_min":0,"x_max":0,"y_max":10}"#);
        assert!(reversed.is_err());
    }
}
