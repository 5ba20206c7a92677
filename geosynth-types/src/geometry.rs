use crate::contour::{LineString, LinearRing};
use crate::crs::Crs;
use crate::envelope::Envelope;
use crate::geometry_type::ShapeKind;
use crate::point::Coord;
use crate::polygon::Polygon;
use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

/// Set of points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiPoint(Vec<Coord>);

impl MultiPoint {
    /// Creates a new multipoint.
    pub fn new(points: Vec<Coord>) -> Self {
        Self(points)
    }

    /// Member points.
    pub fn points(&self) -> &[Coord] {
        &self.0
    }
}

/// Set of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiLineString(Vec<LineString>);

impl MultiLineString {
    /// Creates a new multiline.
    pub fn new(lines: Vec<LineString>) -> Self {
        Self(lines)
    }

    /// Member lines.
    pub fn lines(&self) -> &[LineString] {
        &self.0
    }
}

/// Set of polygons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiPolygon(Vec<Polygon>);

impl MultiPolygon {
    /// Creates a new multipolygon.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self(polygons)
    }

    /// Member polygons.
    pub fn polygons(&self) -> &[Polygon] {
        &self.0
    }
}

/// Canonical geometry: a library-agnostic shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geom {
    /// Point.
    Point(Coord),
    /// LineString.
    LineString(LineString),
    /// Polygon.
    Polygon(Polygon),
    /// MultiPoint.
    MultiPoint(MultiPoint),
    /// MultiLineString.
    MultiLineString(MultiLineString),
    /// MultiPolygon.
    MultiPolygon(MultiPolygon),
}

impl Geom {
    /// Kind of the geometry.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geom::Point(_) => ShapeKind::Point,
            Geom::LineString(_) => ShapeKind::LineString,
            Geom::Polygon(_) => ShapeKind::Polygon,
            Geom::MultiPoint(_) => ShapeKind::MultiPoint,
            Geom::MultiLineString(_) => ShapeKind::MultiLineString,
            Geom::MultiPolygon(_) => ShapeKind::MultiPolygon,
        }
    }

    /// Iterates over every coordinate of the geometry, closing coordinates of rings included.
    pub fn coords(&self) -> Box<dyn Iterator<Item = &'_ Coord> + '_> {
        fn polygon_coords(p: &Polygon) -> impl Iterator<Item = &'_ Coord> {
            p.iter_rings().flat_map(|r| r.coords().iter())
        }

        match self {
            Geom::Point(c) => Box::new(std::iter::once(c)),
            Geom::LineString(l) => Box::new(l.coords().iter()),
            Geom::Polygon(p) => Box::new(polygon_coords(p)),
            Geom::MultiPoint(mp) => Box::new(mp.points().iter()),
            Geom::MultiLineString(ml) => Box::new(ml.lines().iter().flat_map(|l| l.coords().iter())),
            Geom::MultiPolygon(mp) => Box::new(mp.polygons().iter().flat_map(|p| polygon_coords(p))),
        }
    }

    /// Number of coordinates in the geometry.
    pub fn coord_count(&self) -> usize {
        self.coords().count()
    }

    /// Bounding envelope, `None` for empty multi-geometries.
    pub fn envelope(&self) -> Option<Envelope> {
        Envelope::from_coords(self.coords())
    }

    /// True if any coordinate carries an elevation.
    pub fn has_z(&self) -> bool {
        self.coords().any(|c| c.z.is_some())
    }

    /// Iterates over all rings of all polygons of the geometry.
    pub fn rings(&self) -> Box<dyn Iterator<Item = &'_ LinearRing> + '_> {
        match self {
            Geom::Polygon(p) => Box::new(p.iter_rings()),
            Geom::MultiPolygon(mp) => Box::new(mp.polygons().iter().flat_map(|p| p.iter_rings())),
            _ => Box::new(std::iter::empty()),
        }
    }
}

impl From<Coord> for Geom {
    fn from(value: Coord) -> Self {
        Self::Point(value)
    }
}

impl From<LineString> for Geom {
    fn from(value: LineString) -> Self {
        Self::LineString(value)
    }
}

impl From<Polygon> for Geom {
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}

impl From<MultiPoint> for Geom {
    fn from(value: MultiPoint) -> Self {
        Self::MultiPoint(value)
    }
}

impl From<MultiLineString> for Geom {
    fn from(value: MultiLineString) -> Self {
        Self::MultiLineString(value)
    }
}

impl From<MultiPolygon> for Geom {
    fn from(value: MultiPolygon) -> Self {
        Self::MultiPolygon(value)
    }
}

/// Structural comparison with a tolerance for coordinate values. Geometries of different kinds or with a different
/// number of parts are never equal.
impl AbsDiffEq for Geom {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        fn rings_shape(g: &Geom) -> Vec<usize> {
            g.rings().map(|r| r.coords().len()).collect()
        }

        fn parts_shape(g: &Geom) -> Vec<usize> {
            match g {
                Geom::MultiLineString(ml) => ml.lines().iter().map(|l| l.coords().len()).collect(),
                Geom::MultiPolygon(mp) => mp.polygons().iter().map(|p| p.interiors().len()).collect(),
                _ => vec![],
            }
        }

        self.kind() == other.kind()
            && self.coord_count() == other.coord_count()
            && rings_shape(self) == rings_shape(other)
            && parts_shape(self) == parts_shape(other)
            && self
                .coords()
                .zip(other.coords())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

/// A canonical geometry together with the CRS its coordinates are expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedGeom {
    geom: Geom,
    crs: Crs,
}

impl TaggedGeom {
    /// Tags the geometry with a CRS.
    pub fn new(geom: impl Into<Geom>, crs: Crs) -> Self {
        Self {
            geom: geom.into(),
            crs,
        }
    }

    /// The geometry.
    pub fn geom(&self) -> &Geom {
        &self.geom
    }

    /// The CRS.
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Splits into the geometry and its CRS.
    pub fn into_parts(self) -> (Geom, Crs) {
        (self.geom, self.crs)
    }
}

impl AbsDiffEq for TaggedGeom {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.crs == other.crs && self.geom.abs_diff_eq(&other.geom, epsilon)
    }
}
