//! Conversion of canonical geometries into the object models of GIS libraries.
//!
//! Every supported library has an [`Adapter`] implementation that converts a [`TaggedGeom`] into the library's native
//! value and back. [`NativeGeometry`] wraps the native values of all libraries, so that generators of different
//! libraries can be used through one interface.
//!
//! Libraries backed by an optional crate are enabled by the cargo feature of the same name (`jts`, `postgis`,
//! `geolatte`, `h3`, `proj`), all of them on by default.

use crate::config::AdapterOptions;
use crate::error::AdapterError;
use crate::library::Library;
use approx::AbsDiffEq;
use geosynth_types::{Crs, Geom, ShapeKind, TaggedGeom};

pub mod esri;
#[cfg(feature = "geolatte")]
pub mod geolatte;
#[cfg(feature = "h3")]
pub mod h3;
#[cfg(feature = "jts")]
pub mod jts;
#[cfg(feature = "postgis")]
pub mod postgis;
#[cfg(feature = "proj")]
pub mod proj;

use esri::{EsriAdapter, EsriGeometry};
#[cfg(feature = "geolatte")]
use geolatte::GeolatteAdapter;
#[cfg(feature = "h3")]
use h3::H3Adapter;
#[cfg(feature = "jts")]
use jts::JtsAdapter;
#[cfg(feature = "postgis")]
use postgis::{JtsWrapper, PgGeometry, PostgisGeometryAdapter, PostgisJtsAdapter};
#[cfg(feature = "proj")]
use proj::{ProjAdapter, Projected};

/// Converts canonical geometries into values of one library and back.
pub trait Adapter {
    /// Native geometry type of the library.
    type Native;

    /// The library this adapter converts to.
    fn library(&self) -> Library;

    /// Whether the native model can represent geometries of this kind.
    fn supports(&self, kind: ShapeKind) -> bool;

    /// Converts a canonical geometry into the native value.
    fn to_native(&self, value: &TaggedGeom) -> Result<Self::Native, AdapterError>;

    /// Converts a native value into a canonical geometry.
    fn from_native(&self, native: &Self::Native) -> Result<TaggedGeom, AdapterError>;

    /// Largest coordinate difference a round trip through this adapter may introduce. Zero for lossless adapters.
    fn tolerance(&self) -> f64 {
        0.0
    }

    /// Returns an error if the geometry is of a kind this adapter does not support.
    fn check_kind(&self, value: &TaggedGeom) -> Result<(), AdapterError> {
        let kind = value.geom().kind();
        if self.supports(kind) {
            Ok(())
        } else {
            Err(AdapterError::UnsupportedGeometryKind {
                library: self.library(),
                kind,
            })
        }
    }
}

/// Adapter of a library that can group canonical geometries into one native geometry collection.
///
/// Collections are not a canonical kind, so the members are passed around as a plain list sharing one CRS.
pub trait CollectionAdapter: Adapter {
    /// Native geometry collection type.
    type NativeCollection;

    /// Builds a native collection of the given members.
    fn collection_to_native(&self, members: &[Geom], crs: &Crs) -> Result<Self::NativeCollection, AdapterError>;

    /// Reads the members and the CRS of a native collection. Nested collections are rejected.
    fn collection_from_native(&self, native: &Self::NativeCollection) -> Result<(Vec<Geom>, Crs), AdapterError>;
}

/// Checks that converting `native` into a canonical geometry and back is stable: the geometry read from the
/// original native value and the one read after the second conversion must be equal (within the adapter's
/// tolerance). Returns the geometry read from `native`.
pub fn check_round_trip<A: Adapter>(adapter: &A, native: &A::Native) -> Result<TaggedGeom, AdapterError> {
    let expected = adapter.from_native(native)?;
    let actual = adapter.from_native(&adapter.to_native(&expected)?)?;

    let tolerance = adapter.tolerance();
    let matches = if tolerance == 0.0 {
        expected == actual
    } else {
        expected.abs_diff_eq(&actual, tolerance)
    };

    if matches {
        Ok(expected)
    } else {
        Err(AdapterError::RoundTripMismatch {
            library: adapter.library(),
            expected: Box::new(expected),
            actual: Box::new(actual),
        })
    }
}

pub(crate) fn ensure_2d(library: Library, value: &TaggedGeom) -> Result<(), AdapterError> {
    ensure_members_2d(library, std::slice::from_ref(value.geom()))
}

pub(crate) fn ensure_members_2d(library: Library, members: &[Geom]) -> Result<(), AdapterError> {
    if members.iter().any(Geom::has_z) {
        Err(AdapterError::UnsupportedDimension { library })
    } else {
        Ok(())
    }
}

/// SRID of an EPSG CRS, for the native models that store the CRS as a bare number and so always read it back as
/// EPSG. Other authorities and non-positive codes are rejected.
pub(crate) fn numeric_srid(library: Library, crs: &Crs) -> Result<i32, AdapterError> {
    crs.srid()
        .filter(|srid| *srid > 0 && crs.authority() == "EPSG")
        .ok_or_else(|| AdapterError::UnknownCrs {
            library,
            crs: crs.to_string(),
        })
}

/// The EPSG CRS of an SRID read from a native value. Inverse of [`numeric_srid`].
pub(crate) fn srid_to_crs(library: Library, srid: i32) -> Result<Crs, AdapterError> {
    u32::try_from(srid)
        .ok()
        .filter(|srid| *srid > 0)
        .map(Crs::epsg)
        .ok_or_else(|| AdapterError::UnknownCrs {
            library,
            crs: format!("SRID {srid}"),
        })
}

/// Native value of any of the supported libraries.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeGeometry {
    /// `geo-types` geometry.
    #[cfg(feature = "jts")]
    Jts(geo_types::Geometry<f64>),
    /// PostGIS EWKB.
    #[cfg(feature = "postgis")]
    PostgisGeometry(PgGeometry),
    /// PostGIS JTS wrapper.
    #[cfg(feature = "postgis")]
    PostgisJts(JtsWrapper),
    /// ESRI JSON geometry.
    Esri(EsriGeometry),
    /// GeoJSON geometry.
    #[cfg(feature = "geolatte")]
    Geolatte(geojson::Geometry),
    /// H3 cell.
    #[cfg(feature = "h3")]
    H3(h3o::CellIndex),
    /// Projected coordinates.
    #[cfg(feature = "proj")]
    Proj4j(Projected),
}

impl NativeGeometry {
    /// Library the value belongs to.
    pub fn library(&self) -> Library {
        match self {
            #[cfg(feature = "jts")]
            Self::Jts(_) => Library::Jts,
            #[cfg(feature = "postgis")]
            Self::PostgisGeometry(_) => Library::PostgisGeometry,
            #[cfg(feature = "postgis")]
            Self::PostgisJts(_) => Library::PostgisJts,
            Self::Esri(_) => Library::Esri,
            #[cfg(feature = "geolatte")]
            Self::Geolatte(_) => Library::Geolatte,
            #[cfg(feature = "h3")]
            Self::H3(_) => Library::H3,
            #[cfg(feature = "proj")]
            Self::Proj4j(_) => Library::Proj4j,
        }
    }

    /// Converts the value into a canonical geometry.
    ///
    /// `crs` is used by the libraries whose values do not carry a CRS. For projected values it is the CRS the
    /// coordinates are projected back into.
    #[cfg_attr(not(feature = "h3"), allow(unused_variables))]
    pub fn to_canonical(&self, crs: &Crs, options: &AdapterOptions) -> Result<TaggedGeom, AdapterError> {
        match self {
            #[cfg(feature = "jts")]
            Self::Jts(native) => JtsAdapter::new(crs.clone()).from_native(native),
            #[cfg(feature = "postgis")]
            Self::PostgisGeometry(native) => PostgisGeometryAdapter.from_native(native),
            #[cfg(feature = "postgis")]
            Self::PostgisJts(native) => PostgisJtsAdapter.from_native(native),
            Self::Esri(native) => EsriAdapter::new(crs.clone()).from_native(native),
            #[cfg(feature = "geolatte")]
            Self::Geolatte(native) => GeolatteAdapter::new(crs.clone()).from_native(native),
            #[cfg(feature = "h3")]
            Self::H3(native) => H3Adapter::new(options.h3_resolution)?.from_native(native),
            #[cfg(feature = "proj")]
            Self::Proj4j(native) => {
                let target = native.crs().clone();
                ProjAdapter::new(crs.clone(), target)?.from_native(native)
            }
        }
    }
}

impl Library {
    /// Whether the library can represent geometries of this kind. Always false for libraries whose support is not
    /// compiled in.
    pub fn supports(&self, kind: ShapeKind) -> bool {
        match self {
            Library::Esri => esri::supports(kind),
            Library::H3 => cfg!(feature = "h3") && kind == ShapeKind::Point,
            Library::Proj4j => {
                cfg!(feature = "proj") && matches!(kind, ShapeKind::Point | ShapeKind::MultiPoint)
            }
            Library::Jts => cfg!(feature = "jts"),
            Library::PostgisGeometry | Library::PostgisJts => cfg!(feature = "postgis"),
            Library::Geolatte => cfg!(feature = "geolatte"),
        }
    }

    /// Converts a canonical geometry into the native value of this library.
    #[cfg_attr(not(any(feature = "h3", feature = "proj")), allow(unused_variables))]
    pub fn to_native(&self, value: &TaggedGeom, options: &AdapterOptions) -> Result<NativeGeometry, AdapterError> {
        let crs = value.crs().clone();
        match self {
            #[cfg(feature = "jts")]
            Library::Jts => Ok(NativeGeometry::Jts(JtsAdapter::new(crs).to_native(value)?)),
            #[cfg(feature = "postgis")]
            Library::PostgisGeometry => Ok(NativeGeometry::PostgisGeometry(
                PostgisGeometryAdapter.to_native(value)?,
            )),
            #[cfg(feature = "postgis")]
            Library::PostgisJts => Ok(NativeGeometry::PostgisJts(PostgisJtsAdapter.to_native(value)?)),
            Library::Esri => Ok(NativeGeometry::Esri(EsriAdapter::new(crs).to_native(value)?)),
            #[cfg(feature = "geolatte")]
            Library::Geolatte => Ok(NativeGeometry::Geolatte(GeolatteAdapter::new(crs).to_native(value)?)),
            #[cfg(feature = "h3")]
            Library::H3 => Ok(NativeGeometry::H3(
                H3Adapter::new(options.h3_resolution)?.to_native(value)?,
            )),
            #[cfg(feature = "proj")]
            Library::Proj4j => {
                let target = options.target_crs.clone().unwrap_or_else(|| crs.clone());
                Ok(NativeGeometry::Proj4j(ProjAdapter::new(crs, target)?.to_native(value)?))
            }
            #[allow(unreachable_patterns)]
            _ => Err(AdapterError::LibraryDisabled(*self)),
        }
    }
}
