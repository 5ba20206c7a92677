//! Projected coordinates.
//!
//! Points are reprojected from the CRS of the canonical geometry into a target CRS with `geodesy`. The supported
//! codes are:
//!
//! * `EPSG:4326` - WGS84 longitude/latitude in degrees,
//! * `EPSG:3857` - Web Mercator,
//! * `EPSG:32601`..`EPSG:32660` and `EPSG:32701`..`EPSG:32760` - UTM zones of the northern and southern hemispheres.
//!
//! Projection is not exact, so a round trip reproduces the coordinates only within [`ProjAdapter::TOLERANCE`].

use super::Adapter;
use crate::error::AdapterError;
use crate::library::Library;
use geodesy::prelude::*;
use geosynth_types::{Coord, Crs, Geom, MultiPoint, ShapeKind, TaggedGeom};
use serde::{Deserialize, Serialize};

/// Coordinate in a projected (or geographic) CRS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjCoordinate {
    /// Easting or longitude.
    pub x: f64,
    /// Northing or latitude.
    pub y: f64,
    /// Elevation, passed through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

/// Projected value: a single coordinate or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjValue {
    /// Single coordinate.
    Coordinate(ProjCoordinate),
    /// List of coordinates.
    Coordinates(Vec<ProjCoordinate>),
}

/// Coordinates together with the CRS they are expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projected {
    crs: Crs,
    value: ProjValue,
}

impl Projected {
    /// Creates a new projected value.
    pub fn new(crs: Crs, value: ProjValue) -> Self {
        Self { crs, value }
    }

    /// CRS of the coordinates.
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// The coordinates.
    pub fn value(&self) -> &ProjValue {
        &self.value
    }
}

/// A CRS `geodesy` can convert to and from geographic coordinates.
#[derive(Debug)]
struct CrsProjection {
    crs: Crs,
    context: Minimal,
    /// `None` for geographic coordinates.
    op: Option<OpHandle>,
}

impl CrsProjection {
    fn new(crs: &Crs) -> Result<Self, AdapterError> {
        let unknown = || AdapterError::UnknownCrs {
            library: Library::Proj4j,
            crs: crs.to_string(),
        };

        if !crs.authority().eq_ignore_ascii_case("EPSG") {
            return Err(unknown());
        }

        let definition = match crs.srid().ok_or_else(unknown)? {
            4326 => None,
            3857 => Some("webmerc".to_string()),
            code @ 32601..=32660 => Some(format!("utm zone={}", code - 32600)),
            code @ 32701..=32760 => Some(format!("utm zone={} south", code - 32700)),
            _ => return Err(unknown()),
        };

        let mut context = Minimal::new();
        let op = match definition {
            Some(definition) => Some(
                context
                    .op(&definition)
                    .map_err(|err| AdapterError::native(Library::Proj4j, err))?,
            ),
            None => None,
        };

        Ok(Self {
            crs: crs.clone(),
            context,
            op,
        })
    }

    /// Converts longitude/latitude in degrees into this CRS.
    fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let Some(op) = self.op else {
            return Some((lon, lat));
        };

        let mut data = [Coor2D::geo(lat, lon)];
        self.context.apply(op, Fwd, &mut data).ok()?;

        finite(data[0].0[0], data[0].0[1])
    }

    /// Converts coordinates in this CRS into longitude/latitude in degrees.
    fn unproject(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let Some(op) = self.op else {
            return Some((x, y));
        };

        let mut data = [Coor2D([x, y])];
        self.context.apply(op, Inv, &mut data).ok()?;

        finite(data[0].0[0].to_degrees(), data[0].0[1].to_degrees())
    }
}

fn finite(x: f64, y: f64) -> Option<(f64, f64)> {
    (x.is_finite() && y.is_finite()).then_some((x, y))
}

/// Adapter producing [`Projected`] values.
#[derive(Debug)]
pub struct ProjAdapter {
    source: CrsProjection,
    target: CrsProjection,
}

impl ProjAdapter {
    /// Largest coordinate difference a round trip may introduce.
    pub const TOLERANCE: f64 = 1e-6;

    /// Creates an adapter converting geometries in `source` into coordinates in `target`.
    pub fn new(source: Crs, target: Crs) -> Result<Self, AdapterError> {
        Ok(Self {
            source: CrsProjection::new(&source)?,
            target: CrsProjection::new(&target)?,
        })
    }

    fn transform(from: &CrsProjection, to: &CrsProjection, c: &Coord) -> Result<Coord, AdapterError> {
        let error = || AdapterError::Projection {
            coord: *c,
            from: from.crs.to_string(),
            to: to.crs.to_string(),
        };

        if from.crs == to.crs {
            return Ok(*c);
        }

        let (lon, lat) = from.unproject(c.x, c.y).ok_or_else(error)?;
        let (x, y) = to.project(lon, lat).ok_or_else(error)?;
        Ok(Coord { x, y, z: c.z })
    }
}

impl Adapter for ProjAdapter {
    type Native = Projected;

    fn library(&self) -> Library {
        Library::Proj4j
    }

    fn supports(&self, kind: ShapeKind) -> bool {
        matches!(kind, ShapeKind::Point | ShapeKind::MultiPoint)
    }

    fn to_native(&self, value: &TaggedGeom) -> Result<Self::Native, AdapterError> {
        self.check_kind(value)?;
        if value.crs() != &self.source.crs {
            return Err(AdapterError::UnknownCrs {
                library: Library::Proj4j,
                crs: value.crs().to_string(),
            });
        }

        let project = |c: &Coord| -> Result<ProjCoordinate, AdapterError> {
            let p = Self::transform(&self.source, &self.target, c)?;
            Ok(ProjCoordinate { x: p.x, y: p.y, z: p.z })
        };

        let projected = match value.geom() {
            Geom::Point(c) => ProjValue::Coordinate(project(c)?),
            Geom::MultiPoint(mp) => {
                ProjValue::Coordinates(mp.points().iter().map(project).collect::<Result<_, _>>()?)
            }
            other => {
                return Err(AdapterError::UnsupportedGeometryKind {
                    library: Library::Proj4j,
                    kind: other.kind(),
                })
            }
        };

        Ok(Projected::new(self.target.crs.clone(), projected))
    }

    /// Converts the coordinates from their CRS back into the source CRS of the adapter.
    fn from_native(&self, native: &Self::Native) -> Result<TaggedGeom, AdapterError> {
        let from = CrsProjection::new(native.crs())?;
        let unproject = |c: &ProjCoordinate| {
            Self::transform(
                &from,
                &self.source,
                &Coord {
                    x: c.x,
                    y: c.y,
                    z: c.z,
                },
            )
        };

        let geom = match native.value() {
            ProjValue::Coordinate(c) => Geom::Point(unproject(c)?),
            ProjValue::Coordinates(coords) => {
                MultiPoint::new(coords.iter().map(unproject).collect::<Result<_, _>>()?).into()
            }
        };

        Ok(TaggedGeom::new(geom, self.source.crs.clone()))
    }

    fn tolerance(&self) -> f64 {
        Self::TOLERANCE
    }
}
