//! Synthesis of random canonical geometries.
//!
//! [`synthesize`] draws candidates from the random source until one of them passes the
//! [validity check](crate::validity) and lies inside the requested envelope. With the same random source state and
//! the same constraints the result is identical, bit for bit.

mod ring;

use crate::config::GenerationConstraints;
use crate::error::{GeneratorError, ValidityError};
use crate::validity::validate_within;
use geosynth_types::{
    Coord, Crs, Envelope, Geom, GeometryError, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon,
    Polygon, ShapeKind,
};
use rand::Rng;
use std::ops::RangeInclusive;

/// CRS codes [`synthesize_crs`] picks from when no other list is given.
pub const DEFAULT_CRS_CODES: [&str; 3] = ["EPSG:4326", "EPSG:3857", "EPSG:32632"];

/// Synthesizes a valid geometry of the given kind satisfying the constraints.
pub fn synthesize<R: Rng + ?Sized>(
    kind: ShapeKind,
    constraints: &GenerationConstraints,
    rng: &mut R,
) -> Result<Geom, GeneratorError> {
    let vertices = constraints.check(kind)?;
    retry(
        kind,
        constraints,
        || draw(kind, constraints, &vertices, rng),
        |geom| validate_within(geom, &constraints.envelope),
    )
}

/// Synthesizes a standalone counter-clockwise ring, following the constraints for polygon exteriors.
pub fn synthesize_ring<R: Rng + ?Sized>(
    constraints: &GenerationConstraints,
    rng: &mut R,
) -> Result<LinearRing, GeneratorError> {
    let vertices = constraints.check(ShapeKind::Polygon)?;
    retry(
        ShapeKind::Polygon,
        constraints,
        || {
            let count = rng.gen_range(vertices.clone());
            ring::star_ring(rng, &constraints.envelope, count, constraints.elevation)
        },
        |ring| validate_within(&Geom::from(Polygon::new(ring.clone(), vec![])), &constraints.envelope),
    )
}

/// Synthesizes the members of a geometry collection: points and lines in random order. The number of members is
/// drawn from the ring range, like for multi-geometries.
pub fn synthesize_collection<R: Rng + ?Sized>(
    constraints: &GenerationConstraints,
    rng: &mut R,
) -> Result<Vec<Geom>, GeneratorError> {
    constraints.check(ShapeKind::LineString)?;

    let count = member_count(rng, constraints);
    let mut members = Vec::with_capacity(count);
    for _ in 0..count {
        let kind = if rng.gen_bool(0.5) {
            ShapeKind::Point
        } else {
            ShapeKind::LineString
        };
        members.push(synthesize(kind, constraints, &mut *rng)?);
    }

    Ok(members)
}

/// Synthesizes an envelope lying inside the constraint envelope.
pub fn synthesize_envelope<R: Rng + ?Sized>(
    constraints: &GenerationConstraints,
    rng: &mut R,
) -> Result<Envelope, GeneratorError> {
    let a = point(rng, constraints);
    let b = point(rng, constraints);
    Ok(Envelope::from_corners(a.xy(), b.xy())?)
}

/// Picks one of the given CRS codes.
pub fn synthesize_crs<R: Rng + ?Sized>(codes: &[&str], rng: &mut R) -> Result<Crs, GeneratorError> {
    if codes.is_empty() {
        return Err(GeneratorError::InvalidConstraints(
            "no CRS codes to choose from".into(),
        ));
    }

    let code = codes[rng.gen_range(0..codes.len())];
    Ok(code.parse()?)
}

fn retry<T>(
    kind: ShapeKind,
    constraints: &GenerationConstraints,
    mut draw: impl FnMut() -> Result<T, GeometryError>,
    check: impl Fn(&T) -> Result<(), ValidityError>,
) -> Result<T, GeneratorError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let candidate = draw()?;
        let error = match check(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(error) => error,
        };

        log::debug!(
            "Rejected {kind} candidate {attempt}/{}: {error}",
            constraints.max_attempts
        );

        if attempt >= constraints.max_attempts {
            return Err(exhausted(kind, attempt, error));
        }
    }
}

fn exhausted(kind: ShapeKind, attempts: u32, last: ValidityError) -> GeneratorError {
    GeneratorError::SynthesisExhausted {
        kind,
        attempts,
        last,
    }
}

fn draw<R: Rng + ?Sized>(
    kind: ShapeKind,
    constraints: &GenerationConstraints,
    vertices: &RangeInclusive<usize>,
    rng: &mut R,
) -> Result<Geom, GeometryError> {
    let geom = match kind {
        ShapeKind::Point => Geom::Point(point(rng, constraints)),
        ShapeKind::LineString => line(rng, constraints, vertices)?.into(),
        ShapeKind::Polygon => {
            let rings = rng.gen_range(constraints.min_rings..=constraints.max_rings);
            polygon(rng, constraints, vertices, rings)?.into()
        }
        ShapeKind::MultiPoint => {
            let count = member_count(rng, constraints);
            let points = (0..count).map(|_| point(rng, constraints)).collect();
            MultiPoint::new(points).into()
        }
        ShapeKind::MultiLineString => {
            let count = member_count(rng, constraints);
            let lines = (0..count)
                .map(|_| line(rng, constraints, vertices))
                .collect::<Result<_, _>>()?;
            MultiLineString::new(lines).into()
        }
        ShapeKind::MultiPolygon => {
            let count = member_count(rng, constraints);
            let polygons = (0..count)
                .map(|_| polygon(rng, constraints, vertices, 1))
                .collect::<Result<_, _>>()?;
            MultiPolygon::new(polygons).into()
        }
    };

    Ok(geom)
}

fn member_count<R: Rng + ?Sized>(rng: &mut R, constraints: &GenerationConstraints) -> usize {
    rng.gen_range(constraints.min_rings..=constraints.max_rings)
}

fn point<R: Rng + ?Sized>(rng: &mut R, constraints: &GenerationConstraints) -> Coord {
    let envelope = &constraints.envelope;
    let x = uniform(rng, envelope.x_min(), envelope.x_max());
    let y = uniform(rng, envelope.y_min(), envelope.y_max());
    let z = constraints
        .elevation
        .map(|(min, max)| uniform(rng, min, max));

    Coord { x, y, z }
}

fn line<R: Rng + ?Sized>(
    rng: &mut R,
    constraints: &GenerationConstraints,
    vertices: &RangeInclusive<usize>,
) -> Result<LineString, GeometryError> {
    let count = rng.gen_range(vertices.clone());
    LineString::new((0..count).map(|_| point(rng, constraints)).collect())
}

fn polygon<R: Rng + ?Sized>(
    rng: &mut R,
    constraints: &GenerationConstraints,
    vertices: &RangeInclusive<usize>,
    rings: usize,
) -> Result<Polygon, GeometryError> {
    let count = rng.gen_range(vertices.clone());
    let exterior = ring::star_ring(rng, &constraints.envelope, count, constraints.elevation)?;
    let holes = ring::place_holes(rng, &exterior, rings.saturating_sub(1), constraints)?;
    Ok(Polygon::new(exterior, holes))
}

/// Uniform value in `min..=max`, which may be an empty range. The range may be wider than `f64::MAX`.
fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }

    // Halves keep every intermediate value finite.
    let half = max / 2.0 - min / 2.0;
    let t: f64 = rng.gen();
    (min + half * t + half * t).clamp(min, max)
}
