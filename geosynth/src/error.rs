//! Error types used by the crate.

use crate::library::Library;
use geosynth_types::{Coord, Envelope, GeometryError, ShapeKind, TaggedGeom, Winding};
use thiserror::Error;

/// Reason a canonical geometry is not structurally valid.
///
/// Ring indices count the rings of the whole geometry in order: for a polygon the exterior is `0` and holes follow,
/// for a multipolygon the numbering continues through all member polygons.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidityError {
    /// A coordinate component is NaN or infinite.
    #[error("coordinate {0:?} is not finite")]
    NonFiniteCoordinate(Coord),
    /// A line or ring has fewer coordinates than required.
    #[error("{what} has {found} coordinates, at least {required} required")]
    TooFewVertices {
        /// `"line"` or `"ring"`.
        what: &'static str,
        /// Minimum number of coordinates.
        required: usize,
        /// Actual number of coordinates.
        found: usize,
    },
    /// First and last coordinates of a ring differ.
    #[error("ring {ring} is not closed")]
    UnclosedRing {
        /// Index of the ring.
        ring: usize,
    },
    /// Two non-adjacent segments of a ring intersect, or two adjacent ones overlap.
    #[error("ring {ring} intersects itself at segments {first} and {second}")]
    SelfIntersecting {
        /// Index of the ring.
        ring: usize,
        /// Index of the first segment.
        first: usize,
        /// Index of the second segment.
        second: usize,
    },
    /// A polygon ring encloses no area.
    #[error("ring {ring} has zero area")]
    DegenerateArea {
        /// Index of the ring.
        ring: usize,
    },
    /// All coordinates of a line are identical.
    #[error("line has zero length")]
    ZeroLength,
    /// A ring goes in the wrong direction.
    #[error("ring {ring} is {found:?}, expected {expected:?}")]
    WrongWinding {
        /// Index of the ring.
        ring: usize,
        /// Required winding.
        expected: Winding,
        /// Actual winding.
        found: Winding,
    },
    /// A hole is not strictly inside its exterior ring, or it touches another hole.
    #[error("hole {ring} is not inside the exterior ring or touches another ring")]
    HoleOutsideShell {
        /// Index of the ring.
        ring: usize,
    },
    /// A coordinate lies outside the requested envelope.
    #[error("coordinate {coord:?} is outside of {envelope:?}")]
    OutOfEnvelope {
        /// Offending coordinate.
        coord: Coord,
        /// Requested envelope.
        envelope: Envelope,
    },
}

/// Error converting between canonical geometries and library-native values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    /// The library cannot represent this kind of geometry.
    #[error("{library} does not support {kind} geometries")]
    UnsupportedGeometryKind {
        /// Target library.
        library: Library,
        /// Requested kind.
        kind: ShapeKind,
    },
    /// The library does not understand this CRS.
    #[error("{library} does not support CRS {crs}")]
    UnknownCrs {
        /// Target library.
        library: Library,
        /// The CRS as it was given.
        crs: String,
    },
    /// The geometry has elevation but the native model is 2d only.
    #[error("{library} cannot store coordinates with elevation")]
    UnsupportedDimension {
        /// Target library.
        library: Library,
    },
    /// The native value has no canonical counterpart.
    #[error("{library} value of type {found} cannot be converted into a canonical geometry")]
    UnsupportedNative {
        /// Source library.
        library: Library,
        /// Description of the native value.
        found: String,
    },
    /// A coordinate could not be projected.
    #[error("failed to project coordinate {coord:?} from {from} to {to}")]
    Projection {
        /// The coordinate being projected.
        coord: Coord,
        /// Source CRS.
        from: String,
        /// Target CRS.
        to: String,
    },
    /// Error reported by the native codec.
    #[error("{library}: {message}")]
    Native {
        /// Library whose codec failed.
        library: Library,
        /// Codec error message.
        message: String,
    },
    /// Support for the library is not compiled in.
    #[error("support for {0} is disabled")]
    LibraryDisabled(Library),
    /// Converting a native value back and forth changed it.
    #[error("round trip through {library} changed the geometry: {expected:?} became {actual:?}")]
    RoundTripMismatch {
        /// Library of the adapter.
        library: Library,
        /// Geometry read from the original native value.
        expected: Box<TaggedGeom>,
        /// Geometry read after the second conversion.
        actual: Box<TaggedGeom>,
    },
    /// A native value decoded into a malformed canonical geometry.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl AdapterError {
    pub(crate) fn native(library: Library, message: impl ToString) -> Self {
        Self::Native {
            library,
            message: message.to_string(),
        }
    }
}

/// Error of a geometry generator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    /// Constraints cannot be satisfied by any geometry.
    #[error("invalid generation constraints: {0}")]
    InvalidConstraints(String),
    /// No valid candidate was produced within the retry budget.
    #[error("failed to synthesize a valid {kind} in {attempts} attempts, last rejection: {last}")]
    SynthesisExhausted {
        /// Requested kind.
        kind: ShapeKind,
        /// Number of candidates drawn.
        attempts: u32,
        /// Why the last candidate was rejected.
        last: ValidityError,
    },
    /// The registry has no generator with this key.
    #[error("no generator registered for {0:?}")]
    NoGeneratorRegistered(String),
    /// Adapter failure.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    /// Malformed geometry or CRS.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
