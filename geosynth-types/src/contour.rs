//! Sequences of coordinates: open [`LineString`]s and closed [`LinearRing`]s.
//!
//! Unlike some contour models, a ring here follows the OGC convention: it is considered closed when its first and
//! last coordinates are identical, and the closing coordinate is stored explicitly. A [`LinearRing`] can still be
//! constructed from an unclosed sequence, so that the validity checker is able to report it.

use crate::envelope::Envelope;
use crate::error::GeometryError;
use crate::point::{CartesianPoint2d, Coord};
use crate::segment::Segment;
use serde::{Deserialize, Serialize};

/// Minimum number of coordinates of a line.
pub const MIN_LINE_COORDS: usize = 2;
/// Minimum number of coordinates of a ring, closing coordinate included.
pub const MIN_RING_COORDS: usize = 4;

/// Direction in which a ring goes around its interior.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Winding {
    /// Clockwise.
    Clockwise,
    /// Counter-clockwise.
    CounterClockwise,
}

/// Open sequence of at least two coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coord>", into = "Vec<Coord>")]
pub struct LineString {
    coords: Vec<Coord>,
}

impl LineString {
    /// Creates a new line, failing if there are less than two coordinates.
    pub fn new(coords: Vec<Coord>) -> Result<Self, GeometryError> {
        if coords.len() < MIN_LINE_COORDS {
            return Err(GeometryError::malformed(
                "LineString",
                format!(
                    "expected at least {MIN_LINE_COORDS} coordinates, got {}",
                    coords.len()
                ),
            ));
        }

        Ok(Self { coords })
    }

    /// Coordinates of the line.
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// Iterates over the segments of the line.
    pub fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, Coord>> {
        self.coords.windows(2).map(|w| Segment(&w[0], &w[1]))
    }

    /// Planar length of the line.
    pub fn length(&self) -> f64 {
        self.iter_segments().map(|s| s.length_sq().sqrt()).sum()
    }
}

impl TryFrom<Vec<Coord>> for LineString {
    type Error = GeometryError;

    fn try_from(value: Vec<Coord>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LineString> for Vec<Coord> {
    fn from(value: LineString) -> Self {
        value.coords
    }
}

/// Ring of a polygon: a sequence of at least four coordinates that is expected to be closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coord>", into = "Vec<Coord>")]
pub struct LinearRing {
    coords: Vec<Coord>,
}

impl LinearRing {
    /// Creates a ring from the coordinates as given, failing if there are less than four of them.
    ///
    /// Closure is not enforced here: see [`LinearRing::is_closed`].
    pub fn new(coords: Vec<Coord>) -> Result<Self, GeometryError> {
        if coords.len() < MIN_RING_COORDS {
            return Err(GeometryError::malformed(
                "LinearRing",
                format!(
                    "expected at least {MIN_RING_COORDS} coordinates, got {}",
                    coords.len()
                ),
            ));
        }

        Ok(Self { coords })
    }

    /// Creates a ring, appending the first coordinate at the end if the sequence is not closed yet.
    pub fn closed(mut coords: Vec<Coord>) -> Result<Self, GeometryError> {
        if let (Some(first), Some(last)) = (coords.first().copied(), coords.last()) {
            if first != *last {
                coords.push(first);
            }
        }

        Self::new(coords)
    }

    /// Coordinates of the ring, including the closing one.
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// True if the first and the last coordinates are identical.
    pub fn is_closed(&self) -> bool {
        self.coords.first() == self.coords.last()
    }

    /// Iterates over segments between consecutive coordinates.
    pub fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, Coord>> {
        self.coords.windows(2).map(|w| Segment(&w[0], &w[1]))
    }

    /// Signed area of the ring (shoelace formula). Positive for counter-clockwise rings.
    pub fn area_signed(&self) -> f64 {
        let mut aggr = 0.0;
        for s in self.iter_segments() {
            aggr += s.0.x * s.1.y - s.1.x * s.0.y;
        }

        aggr / 2.0
    }

    /// Winding of the ring. Rings with zero area are reported as clockwise.
    pub fn winding(&self) -> Winding {
        if self.area_signed() <= 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    /// The same ring going in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut coords = self.coords.clone();
        coords.reverse();
        Self { coords }
    }

    /// Returns true if the point lies strictly inside the ring (winding number test). Points on the boundary may be
    /// reported either way.
    pub fn contains_point(&self, point: &impl CartesianPoint2d<Num = f64>) -> bool {
        let (x, y) = (point.x(), point.y());
        let mut wn = 0i64;

        for s in self.iter_segments() {
            let is_left = (s.1.x - s.0.x) * (y - s.0.y) - (x - s.0.x) * (s.1.y - s.0.y);
            if s.0.y <= y {
                if s.1.y > y && is_left > 0.0 {
                    wn += 1;
                }
            } else if s.1.y <= y && is_left < 0.0 {
                wn -= 1;
            }
        }

        wn != 0
    }

    /// Bounding envelope of the ring.
    pub fn envelope(&self) -> Option<Envelope> {
        Envelope::from_coords(self.coords.iter())
    }
}

impl TryFrom<Vec<Coord>> for LinearRing {
    type Error = GeometryError;

    fn try_from(value: Vec<Coord>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LinearRing> for Vec<Coord> {
    fn from(value: LinearRing) -> Self {
        value.coords
    }
}
