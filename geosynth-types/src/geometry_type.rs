//! See documentation for [`ShapeKind`].
use crate::error::GeometryError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Kind of a geometry. The six kinds correspond to the OGC simple feature types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Single coordinate.
    Point,
    /// Open line of two or more coordinates.
    LineString,
    /// Exterior ring with optional holes.
    Polygon,
    /// Set of points.
    MultiPoint,
    /// Set of lines.
    MultiLineString,
    /// Set of polygons.
    MultiPolygon,
}

impl ShapeKind {
    /// All kinds, in declaration order.
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Point,
        ShapeKind::LineString,
        ShapeKind::Polygon,
        ShapeKind::MultiPoint,
        ShapeKind::MultiLineString,
        ShapeKind::MultiPolygon,
    ];

    /// True for the kinds that consist of several member geometries.
    pub fn is_multi(&self) -> bool {
        matches!(
            self,
            ShapeKind::MultiPoint | ShapeKind::MultiLineString | ShapeKind::MultiPolygon
        )
    }

    /// True for the kinds that have an area and so need rings.
    pub fn has_area(&self) -> bool {
        matches!(self, ShapeKind::Polygon | ShapeKind::MultiPolygon)
    }

    /// True for the kinds built of lines.
    pub fn is_linear(&self) -> bool {
        matches!(self, ShapeKind::LineString | ShapeKind::MultiLineString)
    }

    /// Kind of a single member of this kind (the kind itself for non-multi kinds).
    pub fn member(&self) -> ShapeKind {
        match self {
            ShapeKind::MultiPoint => ShapeKind::Point,
            ShapeKind::MultiLineString => ShapeKind::LineString,
            ShapeKind::MultiPolygon => ShapeKind::Polygon,
            other => *other,
        }
    }

    /// Snake-case name of the kind, as used in configuration keys.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Point => "point",
            ShapeKind::LineString => "line_string",
            ShapeKind::Polygon => "polygon",
            ShapeKind::MultiPoint => "multi_point",
            ShapeKind::MultiLineString => "multi_line_string",
            ShapeKind::MultiPolygon => "multi_polygon",
        }
    }
}

impl Display for ShapeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = GeometryError;

    /// Accepts the snake-case names as well as the OGC spelling (`LineString`, `MULTIPOLYGON`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        Self::ALL
            .into_iter()
            .find(|kind| kind.name().replace('_', "") == normalized)
            .ok_or_else(|| GeometryError::malformed("ShapeKind", format!("unknown shape kind {s:?}")))
    }
}
