use crate::contour::LinearRing;
use crate::envelope::Envelope;
use crate::error::GeometryError;
use crate::point::Coord;
use crate::segment::Segment;
use serde::{Deserialize, Serialize};

/// Polygon geometry. Polygon consists of one exterior ring and zero or more interior rings (holes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    exterior: LinearRing,
    interiors: Vec<LinearRing>,
}

impl Polygon {
    /// Creates a new polygon.
    pub fn new(exterior: LinearRing, interiors: Vec<LinearRing>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Creates a polygon from raw coordinate sequences, checking the arity of every ring.
    pub fn from_coords(exterior: Vec<Coord>, interiors: Vec<Vec<Coord>>) -> Result<Self, GeometryError> {
        Ok(Self {
            exterior: LinearRing::new(exterior)?,
            interiors: interiors
                .into_iter()
                .map(LinearRing::new)
                .collect::<Result<_, _>>()?,
        })
    }

    /// Exterior ring.
    pub fn exterior(&self) -> &LinearRing {
        &self.exterior
    }

    /// Interior rings.
    pub fn interiors(&self) -> &[LinearRing] {
        &self.interiors
    }

    /// Iterates over all rings of the polygon starting with the exterior one.
    pub fn iter_rings(&self) -> impl Iterator<Item = &'_ LinearRing> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    /// Iterates over all segments of all rings.
    pub fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, Coord>> {
        self.iter_rings().flat_map(|r| r.iter_segments())
    }

    /// Bounding envelope of the exterior ring.
    pub fn envelope(&self) -> Option<Envelope> {
        self.exterior.envelope()
    }

    /// Area of the exterior minus the area of the holes.
    pub fn area(&self) -> f64 {
        self.exterior.area_signed().abs()
            - self
                .interiors
                .iter()
                .map(|r| r.area_signed().abs())
                .sum::<f64>()
    }
}
