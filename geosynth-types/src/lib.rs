//! Library-agnostic geometry model used by the `geosynth` generators.
//!
//! Every geometry produced by the synthesis engine is first built in the types of this crate and only then
//! converted into the model of a concrete GIS library. The model is deliberately small:
//!
//! * [`Coord`] - a 2d coordinate with an optional elevation,
//! * [`Envelope`] - an axis-aligned bounding rectangle,
//! * [`Crs`] - an opaque coordinate reference system identifier,
//! * [`Geom`] - one of the six OGC simple feature shapes, with [`TaggedGeom`] attaching a CRS to it.
//!
//! Geometries are immutable once constructed. Constructors check arity only (e.g. a ring must have at least four
//! coordinates); topological validity is the job of the validity checker in the `geosynth` crate, which uses the
//! planar predicates of this crate ([`Orientation`], [`Segment`], [`LinearRing::area_signed`] etc).

pub mod contour;
pub mod crs;
pub mod envelope;
pub mod error;
pub mod geometry;
pub mod geometry_type;
pub mod orient;
pub mod point;
pub mod polygon;
pub mod segment;

pub use contour::{LineString, LinearRing, Winding};
pub use crs::Crs;
pub use envelope::Envelope;
pub use error::GeometryError;
pub use geometry::{Geom, MultiLineString, MultiPoint, MultiPolygon, TaggedGeom};
pub use geometry_type::ShapeKind;
pub use orient::Orientation;
pub use point::{CartesianPoint2d, Coord};
pub use polygon::Polygon;
pub use segment::Segment;
