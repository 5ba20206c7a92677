//! Configuration of the generators.
//!
//! Every field has a default, so a configuration can be given partially, e.g. as JSON:
//!
//! ```json
//! { "envelope": { "x_min": 0, "y_min": 0, "x_max": 10, "y_max": 10 }, "max_vertices": 6, "seed": 42 }
//! ```

use crate::error::GeneratorError;
use geosynth_types::contour::{MIN_LINE_COORDS, MIN_RING_COORDS};
use geosynth_types::{Crs, Envelope, ShapeKind};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Default H3 resolution.
pub const DEFAULT_H3_RESOLUTION: u8 = 7;

/// Constraints a synthesized geometry must satisfy.
///
/// Vertex counts count coordinates, so for rings the closing coordinate is included. Ring counts are the number of
/// rings of a polygon (exterior included) and, for multi-geometries, the number of members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConstraints {
    /// Area all coordinates must fall into.
    pub envelope: Envelope,
    /// CRS the coordinates are expressed in.
    pub crs: Crs,
    /// Minimum number of coordinates of a line or ring.
    pub min_vertices: usize,
    /// Maximum number of coordinates of a line or ring.
    pub max_vertices: usize,
    /// Minimum number of rings of a polygon, or members of a multi-geometry.
    pub min_rings: usize,
    /// Maximum number of rings of a polygon, or members of a multi-geometry.
    pub max_rings: usize,
    /// Seed of the random source. When set, generation does not depend on the caller's random source.
    pub seed: Option<u64>,
    /// Number of candidates drawn before giving up.
    pub max_attempts: u32,
    /// Number of candidates drawn for each hole before dropping it.
    pub hole_attempts: u32,
    /// If set, coordinates get an elevation within this range.
    pub elevation: Option<(f64, f64)>,
}

impl Default for GenerationConstraints {
    fn default() -> Self {
        Self {
            envelope: Envelope::WORLD,
            crs: Crs::WGS84,
            min_vertices: 4,
            max_vertices: 10,
            min_rings: 1,
            max_rings: 1,
            seed: None,
            max_attempts: 32,
            hole_attempts: 16,
            elevation: None,
        }
    }
}

impl GenerationConstraints {
    /// Sets the envelope.
    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Sets the CRS.
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    /// Sets the range of coordinate counts.
    pub fn with_vertices(mut self, min: usize, max: usize) -> Self {
        self.min_vertices = min;
        self.max_vertices = max;
        self
    }

    /// Sets the range of ring (or member) counts.
    pub fn with_rings(mut self, min: usize, max: usize) -> Self {
        self.min_rings = min;
        self.max_rings = max;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the elevation range.
    pub fn with_elevation(mut self, min: f64, max: f64) -> Self {
        self.elevation = Some((min, max));
        self
    }

    /// Sets the retry budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Checks that the constraints can be satisfied by a geometry of the given kind, returning the effective range
    /// of coordinate counts.
    pub fn check(&self, kind: ShapeKind) -> Result<RangeInclusive<usize>, GeneratorError> {
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts must be at least 1"));
        }

        if let Some((min, max)) = self.elevation {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(invalid(format!("elevation range {min}..{max} is not valid")));
            }
        }

        if self.min_vertices > self.max_vertices {
            return Err(invalid(format!(
                "min_vertices {} is greater than max_vertices {}",
                self.min_vertices, self.max_vertices
            )));
        }

        if self.min_rings == 0 {
            return Err(invalid("min_rings must be at least 1"));
        }

        if self.min_rings > self.max_rings {
            return Err(invalid(format!(
                "min_rings {} is greater than max_rings {}",
                self.min_rings, self.max_rings
            )));
        }

        let required = if kind.has_area() {
            if self.envelope.width() <= 0.0 || self.envelope.height() <= 0.0 {
                return Err(invalid(format!(
                    "{kind} needs an envelope with non-zero width and height"
                )));
            }
            if !area_is_finite(&self.envelope, self.max_vertices.max(MIN_RING_COORDS)) {
                return Err(invalid(format!(
                    "{kind} needs an envelope small enough for ring areas to be finite"
                )));
            }
            MIN_RING_COORDS
        } else if kind.is_linear() {
            if self.envelope.width() <= 0.0 && self.envelope.height() <= 0.0 {
                return Err(invalid(format!("{kind} needs an envelope that is not a single point")));
            }
            MIN_LINE_COORDS
        } else {
            return Ok(1..=1);
        };

        if self.max_vertices < required {
            return Err(invalid(format!(
                "max_vertices {} is below the {required} coordinates a {} needs",
                self.max_vertices,
                kind.member()
            )));
        }

        Ok(self.min_vertices.max(required)..=self.max_vertices)
    }
}

/// Ring areas sum one cross product per coordinate and orientation tests take the difference of two products of
/// extents. Neither may overflow anywhere in the envelope.
fn area_is_finite(envelope: &Envelope, max_coords: usize) -> bool {
    let max_x = envelope.x_min().abs().max(envelope.x_max().abs());
    let max_y = envelope.y_min().abs().max(envelope.y_max().abs());
    (2.0 * max_coords as f64 * max_x * max_y).is_finite() && (2.0 * envelope.width() * envelope.height()).is_finite()
}

fn invalid(reason: impl Into<String>) -> GeneratorError {
    GeneratorError::InvalidConstraints(reason.into())
}

/// Options of the library adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterOptions {
    /// CRS projected coordinates are produced in. Defaults to the CRS of the geometry.
    pub target_crs: Option<Crs>,
    /// Resolution of H3 cells, `0..=15`.
    pub h3_resolution: u8,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            target_crs: None,
            h3_resolution: DEFAULT_H3_RESOLUTION,
        }
    }
}

/// Full configuration of a generator call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Constraints of the synthesized geometry.
    #[serde(flatten)]
    pub constraints: GenerationConstraints,
    /// Options of the adapter.
    pub adapter: AdapterOptions,
}

impl GeneratorConfig {
    /// Creates a configuration with the given constraints and default adapter options.
    pub fn new(constraints: GenerationConstraints) -> Self {
        Self {
            constraints,
            adapter: AdapterOptions::default(),
        }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GeneratorError> {
        serde_json::from_str(json).map_err(|err| invalid(err.to_string()))
    }

    /// Sets the target CRS of projecting adapters.
    pub fn with_target_crs(mut self, crs: Crs) -> Self {
        self.adapter.target_crs = Some(crs);
        self
    }

    /// Sets the H3 resolution.
    pub fn with_h3_resolution(mut self, resolution: u8) -> Self {
        self.adapter.h3_resolution = resolution;
        self
    }
}

impl From<GenerationConstraints> for GeneratorConfig {
    fn from(value: GenerationConstraints) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn envelope(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Envelope {
        Envelope::new(x_min, y_min, x_max, y_max).expect("valid envelope")
    }

    #[test]
    fn defaults() {
        let constraints = GenerationConstraints::default();
        assert_eq!(constraints.envelope, Envelope::WORLD);
        assert_eq!(constraints.crs, Crs::WGS84);
        assert_eq!(constraints.check(ShapeKind::Polygon), Ok(4..=10));
        assert_eq!(constraints.check(ShapeKind::LineString), Ok(4..=10));
    }

    #[test]
    fn minimum_is_raised_to_kind_arity() {
        let constraints = GenerationConstraints::default().with_vertices(0, 6);
        assert_eq!(constraints.check(ShapeKind::Polygon), Ok(4..=6));
        assert_eq!(constraints.check(ShapeKind::MultiLineString), Ok(2..=6));
        assert_eq!(constraints.check(ShapeKind::Point), Ok(1..=1));
    }

    #[test]
    fn reversed_ranges_are_rejected() {
        let constraints = GenerationConstraints::default().with_vertices(8, 5);
        assert_matches!(
            constraints.check(ShapeKind::Polygon),
            Err(GeneratorError::InvalidConstraints(_))
        );

        let constraints = GenerationConstraints::default().with_rings(3, 2);
        assert_matches!(
            constraints.check(ShapeKind::MultiPoint),
            Err(GeneratorError::InvalidConstraints(_))
        );

        let constraints = GenerationConstraints::default().with_rings(0, 2);
        assert_matches!(
            constraints.check(ShapeKind::Polygon),
            Err(GeneratorError::InvalidConstraints(_))
        );
    }

    #[test]
    fn ring_needs_four_coordinates() {
        let constraints = GenerationConstraints::default().with_vertices(2, 3);
        assert_matches!(
            constraints.check(ShapeKind::Polygon),
            Err(GeneratorError::InvalidConstraints(_))
        );
        assert_eq!(constraints.check(ShapeKind::LineString), Ok(2..=3));
    }

    #[test]
    fn degenerate_envelope() {
        let flat = GenerationConstraints::default().with_envelope(envelope(0.0, 5.0, 10.0, 5.0));
        assert_matches!(
            flat.check(ShapeKind::Polygon),
            Err(GeneratorError::InvalidConstraints(_))
        );
        assert!(flat.check(ShapeKind::LineString).is_ok());

        let dot = GenerationConstraints::default().with_envelope(envelope(1.0, 1.0, 1.0, 1.0));
        assert_matches!(
            dot.check(ShapeKind::MultiLineString),
            Err(GeneratorError::InvalidConstraints(_))
        );
        assert!(dot.check(ShapeKind::Point).is_ok());
    }

    #[test]
    fn huge_envelope() {
        let constraints =
            GenerationConstraints::default().with_envelope(envelope(-f64::MAX, -f64::MAX, f64::MAX, f64::MAX));
        for kind in [ShapeKind::Polygon, ShapeKind::MultiPolygon] {
            assert_matches!(constraints.check(kind), Err(GeneratorError::InvalidConstraints(_)));
        }
        for kind in [
            ShapeKind::Point,
            ShapeKind::LineString,
            ShapeKind::MultiPoint,
            ShapeKind::MultiLineString,
        ] {
            assert!(constraints.check(kind).is_ok(), "{kind}");
        }

        let far = GenerationConstraints::default().with_envelope(envelope(1e200, 1e200, 1e200 + 1e190, 1e200 + 1e190));
        assert_matches!(
            far.check(ShapeKind::Polygon),
            Err(GeneratorError::InvalidConstraints(_))
        );
        assert!(GenerationConstraints::default().check(ShapeKind::Polygon).is_ok());
    }

    #[test]
    fn elevation_must_be_ordered() {
        let constraints = GenerationConstraints::default().with_elevation(10.0, -10.0);
        assert_matches!(
            constraints.check(ShapeKind::Point),
            Err(GeneratorError::InvalidConstraints(_))
        );
    }

    #[test]
    fn partial_json() {
        let config = GeneratorConfig::from_json(
            r#"{
                "envelope": { "x_min": 0, "y_min": 0, "x_max": 10, "y_max": 10 },
                "max_vertices": 6,
                "seed": 42,
                "adapter": { "target_crs": "EPSG:3857" }
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.constraints.envelope, envelope(0.0, 0.0, 10.0, 10.0));
        assert_eq!(config.constraints.max_vertices, 6);
        assert_eq!(config.constraints.min_vertices, 4);
        assert_eq!(config.constraints.seed, Some(42));
        assert_eq!(config.adapter.target_crs, Some(Crs::EPSG3857));
        assert_eq!(config.adapter.h3_resolution, DEFAULT_H3_RESOLUTION);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(GeneratorConfig::from_json("{}"), Ok(GeneratorConfig::default()));
    }

    #[test]
    fn invalid_json() {
        assert_matches!(
            GeneratorConfig::from_json(r#"{ "envelope": { "x_min": 5, "y_min": 0, "x_max": 1, "y_max": 1 } }"#),
            Err(GeneratorError::InvalidConstraints(_))
        );
    }
}
