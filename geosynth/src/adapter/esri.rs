//! ESRI geometries in the ESRI JSON model.
//!
//! The model has four geometry types: point, multipoint, polyline (a set of paths) and polygon (a set of rings).
//! Rings follow the ESRI convention: exterior rings go clockwise and holes counter-clockwise, the opposite of the
//! canonical model, so rings are reversed on conversion.
//!
//! Conversion into ESRI JSON is limited to the kinds with a direct counterpart: Point, MultiPoint, LineString
//! (a polyline with a single path) and Polygon. Reading is lenient: a polyline with several paths becomes a
//! MultiLineString and a polygon with several exterior rings becomes a MultiPolygon.

use super::{numeric_srid, srid_to_crs, Adapter};
use crate::error::AdapterError;
use crate::library::Library;
use geosynth_types::{
    Coord, Crs, Geom, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Polygon, ShapeKind,
    TaggedGeom, Winding,
};
use serde::{Deserialize, Serialize};

/// `spatialReference` member of an ESRI geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    /// Well-known id of the CRS.
    pub wkid: i32,
}

/// ESRI point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriPoint {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Elevation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// CRS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

/// ESRI multipoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriMultipoint {
    /// True if positions have three values.
    #[serde(default)]
    pub has_z: bool,
    /// Positions.
    pub points: Vec<Vec<f64>>,
    /// CRS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

/// ESRI polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriPolyline {
    /// True if positions have three values.
    #[serde(default)]
    pub has_z: bool,
    /// Paths, each a list of positions.
    pub paths: Vec<Vec<Vec<f64>>>,
    /// CRS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

/// ESRI polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriPolygon {
    /// True if positions have three values.
    #[serde(default)]
    pub has_z: bool,
    /// Rings, each a closed list of positions.
    pub rings: Vec<Vec<Vec<f64>>>,
    /// CRS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
}

/// ESRI JSON geometry. The type is recognized by the members present, as in the ESRI format itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EsriGeometry {
    /// Point.
    Point(EsriPoint),
    /// Multipoint.
    Multipoint(EsriMultipoint),
    /// Polyline.
    Polyline(EsriPolyline),
    /// Polygon.
    Polygon(EsriPolygon),
}

impl EsriGeometry {
    /// Parses ESRI JSON.
    pub fn from_json(json: &str) -> Result<Self, AdapterError> {
        serde_json::from_str(json).map_err(|err| AdapterError::native(Library::Esri, err))
    }

    /// Writes ESRI JSON.
    pub fn to_json(&self) -> Result<String, AdapterError> {
        serde_json::to_string(self).map_err(|err| AdapterError::native(Library::Esri, err))
    }

    /// The `spatialReference` member.
    pub fn spatial_reference(&self) -> Option<SpatialReference> {
        match self {
            EsriGeometry::Point(g) => g.spatial_reference,
            EsriGeometry::Multipoint(g) => g.spatial_reference,
            EsriGeometry::Polyline(g) => g.spatial_reference,
            EsriGeometry::Polygon(g) => g.spatial_reference,
        }
    }
}

pub(super) fn supports(kind: ShapeKind) -> bool {
    matches!(
        kind,
        ShapeKind::Point | ShapeKind::MultiPoint | ShapeKind::LineString | ShapeKind::Polygon
    )
}

/// Adapter for [`EsriGeometry`].
#[derive(Debug, Clone, PartialEq)]
pub struct EsriAdapter {
    default_crs: Crs,
}

impl EsriAdapter {
    /// Creates an adapter. Geometries without a `spatialReference` are read in `default_crs`.
    pub fn new(default_crs: Crs) -> Self {
        Self { default_crs }
    }
}

impl Default for EsriAdapter {
    fn default() -> Self {
        Self::new(Crs::WGS84)
    }
}

impl Adapter for EsriAdapter {
    type Native = EsriGeometry;

    fn library(&self) -> Library {
        Library::Esri
    }

    fn supports(&self, kind: ShapeKind) -> bool {
        supports(kind)
    }

    fn to_native(&self, value: &TaggedGeom) -> Result<Self::Native, AdapterError> {
        self.check_kind(value)?;
        let spatial_reference = Some(SpatialReference {
            wkid: numeric_srid(Library::Esri, value.crs())?,
        });
        let has_z = value.geom().has_z();

        let native = match value.geom() {
            Geom::Point(c) => EsriGeometry::Point(EsriPoint {
                x: c.x,
                y: c.y,
                z: c.z,
                spatial_reference,
            }),
            Geom::MultiPoint(mp) => EsriGeometry::Multipoint(EsriMultipoint {
                has_z,
                points: mp.points().iter().map(position).collect(),
                spatial_reference,
            }),
            Geom::LineString(line) => EsriGeometry::Polyline(EsriPolyline {
                has_z,
                paths: vec![line.coords().iter().map(position).collect()],
                spatial_reference,
            }),
            Geom::Polygon(p) => EsriGeometry::Polygon(EsriPolygon {
                has_z,
                rings: p
                    .iter_rings()
                    .map(|ring| ring.coords().iter().rev().map(position).collect())
                    .collect(),
                spatial_reference,
            }),
            Geom::MultiLineString(_) | Geom::MultiPolygon(_) => {
                return Err(AdapterError::UnsupportedGeometryKind {
                    library: Library::Esri,
                    kind: value.geom().kind(),
                })
            }
        };

        Ok(native)
    }

    fn from_native(&self, native: &Self::Native) -> Result<TaggedGeom, AdapterError> {
        let crs = match native.spatial_reference() {
            Some(sr) => srid_to_crs(Library::Esri, sr.wkid)?,
            None => self.default_crs.clone(),
        };

        let geom = match native {
            EsriGeometry::Point(p) => Geom::Point(Coord { x: p.x, y: p.y, z: p.z }),
            EsriGeometry::Multipoint(mp) => MultiPoint::new(
                mp.points
                    .iter()
                    .map(|p| coord(p))
                    .collect::<Result<_, _>>()?,
            )
            .into(),
            EsriGeometry::Polyline(polyline) => {
                let mut lines = polyline
                    .paths
                    .iter()
                    .map(|path| Ok(LineString::new(coords(path)?)?))
                    .collect::<Result<Vec<_>, AdapterError>>()?;
                match lines.len() {
                    0 => return Err(empty("polyline without paths")),
                    1 => Geom::LineString(lines.remove(0)),
                    _ => MultiLineString::new(lines).into(),
                }
            }
            EsriGeometry::Polygon(polygon) => {
                let mut polygons = read_polygons(polygon)?;
                match polygons.len() {
                    0 => return Err(empty("polygon without rings")),
                    1 => Geom::Polygon(polygons.remove(0)),
                    _ => MultiPolygon::new(polygons).into(),
                }
            }
        };

        Ok(TaggedGeom::new(geom, crs))
    }
}

fn position(c: &Coord) -> Vec<f64> {
    match c.z {
        Some(z) => vec![c.x, c.y, z],
        None => vec![c.x, c.y],
    }
}

fn coord(position: &[f64]) -> Result<Coord, AdapterError> {
    match *position {
        [x, y] => Ok(Coord::new(x, y)),
        [x, y, z, ..] => Ok(Coord::xyz(x, y, z)),
        _ => Err(AdapterError::UnsupportedNative {
            library: Library::Esri,
            found: format!("position with {} values", position.len()),
        }),
    }
}

fn coords(positions: &[Vec<f64>]) -> Result<Vec<Coord>, AdapterError> {
    positions.iter().map(|p| coord(p)).collect()
}

fn empty(found: &str) -> AdapterError {
    AdapterError::UnsupportedNative {
        library: Library::Esri,
        found: found.into(),
    }
}

/// Groups ESRI rings into polygons: every clockwise ring starts a new polygon, counter-clockwise rings are holes of
/// the last one.
fn read_polygons(polygon: &EsriPolygon) -> Result<Vec<Polygon>, AdapterError> {
    let mut polygons: Vec<(LinearRing, Vec<LinearRing>)> = vec![];
    for positions in &polygon.rings {
        let mut ring_coords = coords(positions)?;
        ring_coords.reverse();
        let ring = LinearRing::new(ring_coords)?;

        match (ring.winding(), polygons.last_mut()) {
            (Winding::CounterClockwise, _) => polygons.push((ring, vec![])),
            (Winding::Clockwise, Some((_, holes))) => holes.push(ring),
            (Winding::Clockwise, None) => return Err(empty("polygon starting with a hole")),
        }
    }

    Ok(polygons
        .into_iter()
        .map(|(exterior, holes)| Polygon::new(exterior, holes))
        .collect())
}
