//! H3 cell indices.
//!
//! Only WGS84 points can be indexed. A cell is read back as its center, so a round trip starting from a cell is
//! stable while one starting from an arbitrary point is not.

use super::{ensure_2d, Adapter};
use crate::error::AdapterError;
use crate::library::Library;
use geosynth_types::{Coord, Crs, Geom, ShapeKind, TaggedGeom};
use h3o::{CellIndex, LatLng, Resolution};

const MAX_RESOLUTION: u8 = 15;

/// Adapter for `h3o::CellIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct H3Adapter {
    resolution: Resolution,
}

impl H3Adapter {
    /// Creates an adapter indexing points at the given resolution. Resolutions above 15 are clamped.
    pub fn new(resolution: u8) -> Result<Self, AdapterError> {
        if resolution > MAX_RESOLUTION {
            log::warn!("H3 resolution {resolution} is out of range, using {MAX_RESOLUTION}");
        }

        let resolution = Resolution::try_from(resolution.min(MAX_RESOLUTION))
            .map_err(|err| AdapterError::native(Library::H3, err))?;
        Ok(Self { resolution })
    }

    /// Resolution of the produced cells.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
}

impl Adapter for H3Adapter {
    type Native = CellIndex;

    fn library(&self) -> Library {
        Library::H3
    }

    fn supports(&self, kind: ShapeKind) -> bool {
        kind == ShapeKind::Point
    }

    fn to_native(&self, value: &TaggedGeom) -> Result<Self::Native, AdapterError> {
        self.check_kind(value)?;
        if value.crs() != &Crs::WGS84 {
            return Err(AdapterError::UnknownCrs {
                library: Library::H3,
                crs: value.crs().to_string(),
            });
        }
        ensure_2d(Library::H3, value)?;

        let Geom::Point(c) = value.geom() else {
            return Err(AdapterError::UnsupportedGeometryKind {
                library: Library::H3,
                kind: value.geom().kind(),
            });
        };

        let lat_lng = LatLng::new(c.y, c.x).map_err(|err| AdapterError::native(Library::H3, err))?;
        Ok(lat_lng.to_cell(self.resolution))
    }

    fn from_native(&self, native: &Self::Native) -> Result<TaggedGeom, AdapterError> {
        let center = LatLng::from(*native);
        Ok(TaggedGeom::new(Coord::new(center.lng(), center.lat()), Crs::WGS84))
    }
}
