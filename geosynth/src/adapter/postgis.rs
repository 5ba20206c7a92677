//! PostGIS geometries.
//!
//! Two representations are supported:
//! * [`PgGeometry`] - the value as the database stores it, extended WKB with an SRID,
//! * [`JtsWrapper`] - a JTS geometry together with its SRID, written as extended WKT (`SRID=4326;POINT(1 2)`).
//!
//! Encoding and decoding is done with `geozero`. Both models are two-dimensional and need a numeric SRID.

use super::jts::{from_geo, to_geo};
use super::{ensure_2d, ensure_members_2d, numeric_srid, srid_to_crs, Adapter, CollectionAdapter};
use crate::error::AdapterError;
use crate::library::Library;
use geosynth_types::{Crs, Geom, ShapeKind, TaggedGeom};
use geozero::wkb::Ewkb;
use geozero::wkt::WktStr;
use geozero::{CoordDimensions, ToGeo, ToWkb, ToWkt};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const EWKB_SRID_FLAG: u32 = 0x2000_0000;

/// PostGIS geometry value in extended WKB encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgGeometry {
    ewkb: Vec<u8>,
}

impl PgGeometry {
    /// Wraps EWKB bytes.
    pub fn from_ewkb(ewkb: Vec<u8>) -> Self {
        Self { ewkb }
    }

    /// EWKB bytes.
    pub fn as_ewkb(&self) -> &[u8] {
        &self.ewkb
    }

    /// SRID stored in the EWKB header, if there is one.
    pub fn srid(&self) -> Option<i32> {
        let header = self.ewkb.get(..9)?;
        let little_endian = header[0] == 1;
        let read = |bytes: &[u8]| -> Option<[u8; 4]> { bytes.try_into().ok() };
        let geometry_type = read(&header[1..5])?;
        let srid = read(&header[5..9])?;

        let (geometry_type, srid) = if little_endian {
            (u32::from_le_bytes(geometry_type), i32::from_le_bytes(srid))
        } else {
            (u32::from_be_bytes(geometry_type), i32::from_be_bytes(srid))
        };

        (geometry_type & EWKB_SRID_FLAG != 0).then_some(srid)
    }

    /// Hex string of the EWKB, the way PostGIS prints geometries.
    pub fn to_hex(&self) -> String {
        self.ewkb.iter().map(|b| format!("{b:02X}")).collect()
    }
}

/// Adapter for [`PgGeometry`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgisGeometryAdapter;

impl Adapter for PostgisGeometryAdapter {
    type Native = PgGeometry;

    fn library(&self) -> Library {
        Library::PostgisGeometry
    }

    fn supports(&self, _kind: ShapeKind) -> bool {
        true
    }

    fn to_native(&self, value: &TaggedGeom) -> Result<Self::Native, AdapterError> {
        let library = self.library();
        ensure_2d(library, value)?;
        let srid = numeric_srid(library, value.crs())?;

        let ewkb = to_geo(value.geom())
            .to_ewkb(CoordDimensions::xy(), Some(srid))
            .map_err(|err| AdapterError::native(library, err))?;
        Ok(PgGeometry::from_ewkb(ewkb))
    }

    fn from_native(&self, native: &Self::Native) -> Result<TaggedGeom, AdapterError> {
        let (geo, crs) = decode_ewkb(native)?;
        Ok(TaggedGeom::new(from_geo(self.library(), &geo)?, crs))
    }
}

impl CollectionAdapter for PostgisGeometryAdapter {
    type NativeCollection = PgGeometry;

    fn collection_to_native(&self, members: &[Geom], crs: &Crs) -> Result<Self::NativeCollection, AdapterError> {
        let library = self.library();
        ensure_members_2d(library, members)?;
        let srid = numeric_srid(library, crs)?;

        let collection = geo_types::GeometryCollection(members.iter().map(to_geo).collect());
        let ewkb = geo_types::Geometry::GeometryCollection(collection)
            .to_ewkb(CoordDimensions::xy(), Some(srid))
            .map_err(|err| AdapterError::native(library, err))?;
        Ok(PgGeometry::from_ewkb(ewkb))
    }

    fn collection_from_native(&self, native: &Self::NativeCollection) -> Result<(Vec<Geom>, Crs), AdapterError> {
        let library = self.library();
        let (geo, crs) = decode_ewkb(native)?;
        let geo_types::Geometry::GeometryCollection(collection) = geo else {
            return Err(AdapterError::UnsupportedNative {
                library,
                found: "EWKB that is not a GeometryCollection".into(),
            });
        };

        let members = collection
            .0
            .iter()
            .map(|member| from_geo(library, member))
            .collect::<Result<_, _>>()?;
        Ok((members, crs))
    }
}

fn decode_ewkb(native: &PgGeometry) -> Result<(geo_types::Geometry<f64>, Crs), AdapterError> {
    let library = Library::PostgisGeometry;
    let srid = native.srid().ok_or_else(|| AdapterError::UnknownCrs {
        library,
        crs: "EWKB without SRID".into(),
    })?;

    let geo = Ewkb(native.as_ewkb().to_vec())
        .to_geo()
        .map_err(|err| AdapterError::native(library, err))?;
    Ok((geo, srid_to_crs(library, srid)?))
}

/// JTS geometry with the SRID PostGIS attaches to it.
#[derive(Debug, Clone, PartialEq)]
pub struct JtsWrapper {
    srid: i32,
    geometry: geo_types::Geometry<f64>,
}

impl JtsWrapper {
    /// Creates a new wrapper.
    pub fn new(srid: i32, geometry: geo_types::Geometry<f64>) -> Self {
        Self { srid, geometry }
    }

    /// Spatial reference id.
    pub fn srid(&self) -> i32 {
        self.srid
    }

    /// The wrapped geometry.
    pub fn geometry(&self) -> &geo_types::Geometry<f64> {
        &self.geometry
    }
}

impl Display for JtsWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let wkt = self.geometry.to_wkt().map_err(|_| std::fmt::Error)?;
        write!(f, "SRID={};{wkt}", self.srid)
    }
}

impl FromStr for JtsWrapper {
    type Err = AdapterError;

    /// Parses extended WKT. Text without the `SRID=` prefix gets SRID 0, as in PostGIS.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let library = Library::PostgisJts;
        let s = s.trim();
        let (srid, wkt) = match s.strip_prefix("SRID=").and_then(|rest| rest.split_once(';')) {
            Some((srid, wkt)) => (
                srid.trim()
                    .parse()
                    .map_err(|_| AdapterError::native(library, format!("invalid SRID {srid:?}")))?,
                wkt,
            ),
            None => (0, s),
        };

        let geometry = WktStr(wkt)
            .to_geo()
            .map_err(|err| AdapterError::native(library, err))?;
        Ok(Self::new(srid, geometry))
    }
}

/// Adapter for [`JtsWrapper`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgisJtsAdapter;

impl Adapter for PostgisJtsAdapter {
    type Native = JtsWrapper;

    fn library(&self) -> Library {
        Library::PostgisJts
    }

    fn supports(&self, _kind: ShapeKind) -> bool {
        true
    }

    fn to_native(&self, value: &TaggedGeom) -> Result<Self::Native, AdapterError> {
        let library = self.library();
        ensure_2d(library, value)?;
        let srid = numeric_srid(library, value.crs())?;
        Ok(JtsWrapper::new(srid, to_geo(value.geom())))
    }

    fn from_native(&self, native: &Self::Native) -> Result<TaggedGeom, AdapterError> {
        let library = self.library();
        Ok(TaggedGeom::new(
            from_geo(library, native.geometry())?,
            srid_to_crs(library, native.srid())?,
        ))
    }
}
