//! Structural validity of canonical geometries.
//!
//! A geometry is valid when every coordinate is finite and every line and ring satisfies, in this order:
//!
//! 1. minimum coordinate count (2 for lines, 4 for rings),
//! 2. ring closure,
//! 3. simplicity: no two non-adjacent segments of a ring intersect and no two adjacent ones fold back on each other,
//! 4. non-zero area for rings and non-zero length for lines,
//! 5. winding: exterior rings counter-clockwise, holes clockwise.
//!
//! Finally each hole must lie strictly inside its exterior ring without touching it or any other hole of the same
//! polygon. Members of multi-geometries are checked independently and may overlap.

use crate::error::ValidityError;
use geosynth_types::contour::{MIN_LINE_COORDS, MIN_RING_COORDS};
use geosynth_types::{Envelope, Geom, LineString, LinearRing, Polygon, Winding};

/// Relative area below which a ring is considered collinear.
const AREA_EPSILON: f64 = 1e-12;

/// Checks that the geometry is structurally valid.
pub fn validate(geom: &Geom) -> Result<(), ValidityError> {
    if let Some(coord) = geom.coords().find(|c| !c.is_finite()) {
        return Err(ValidityError::NonFiniteCoordinate(*coord));
    }

    match geom {
        Geom::Point(_) | Geom::MultiPoint(_) => Ok(()),
        Geom::LineString(line) => validate_line(line),
        Geom::MultiLineString(lines) => lines.lines().iter().try_for_each(validate_line),
        Geom::Polygon(polygon) => validate_polygon(polygon, 0),
        Geom::MultiPolygon(polygons) => {
            let mut offset = 0;
            for polygon in polygons.polygons() {
                validate_polygon(polygon, offset)?;
                offset += polygon.interiors().len() + 1;
            }

            Ok(())
        }
    }
}

/// Checks that the geometry is valid and that all its coordinates lie inside the envelope.
pub fn validate_within(geom: &Geom, envelope: &Envelope) -> Result<(), ValidityError> {
    validate(geom)?;

    match geom.coords().find(|c| !envelope.contains(*c)) {
        Some(coord) => Err(ValidityError::OutOfEnvelope {
            coord: *coord,
            envelope: *envelope,
        }),
        None => Ok(()),
    }
}

fn validate_line(line: &LineString) -> Result<(), ValidityError> {
    let found = line.coords().len();
    if found < MIN_LINE_COORDS {
        return Err(ValidityError::TooFewVertices {
            what: "line",
            required: MIN_LINE_COORDS,
            found,
        });
    }

    if line.length() == 0.0 {
        return Err(ValidityError::ZeroLength);
    }

    Ok(())
}

fn validate_polygon(polygon: &Polygon, offset: usize) -> Result<(), ValidityError> {
    let rings = move || {
        polygon
            .iter_rings()
            .enumerate()
            .map(move |(i, r)| (offset + i, r))
    };

    for (_, ring) in rings() {
        let found = ring.coords().len();
        if found < MIN_RING_COORDS {
            return Err(ValidityError::TooFewVertices {
                what: "ring",
                required: MIN_RING_COORDS,
                found,
            });
        }
    }

    for (index, ring) in rings() {
        if !ring.is_closed() {
            return Err(ValidityError::UnclosedRing { ring: index });
        }
    }

    for (index, ring) in rings() {
        if let Some((first, second)) = find_self_intersection(ring) {
            return Err(ValidityError::SelfIntersecting {
                ring: index,
                first,
                second,
            });
        }
    }

    for (index, ring) in rings() {
        if is_collinear(ring) {
            return Err(ValidityError::DegenerateArea { ring: index });
        }
    }

    for (index, ring) in rings() {
        let expected = if index == offset {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        };
        let found = ring.winding();
        if found != expected {
            return Err(ValidityError::WrongWinding {
                ring: index,
                expected,
                found,
            });
        }
    }

    let holes = polygon.interiors();
    for (i, hole) in holes.iter().enumerate() {
        if !hole_fits(polygon.exterior(), &holes[..i], hole) {
            return Err(ValidityError::HoleOutsideShell {
                ring: offset + i + 1,
            });
        }
    }

    Ok(())
}

/// Finds a pair of segments that makes the closed ring non-simple.
fn find_self_intersection(ring: &LinearRing) -> Option<(usize, usize)> {
    let segments: Vec<_> = ring.iter_segments().collect();
    let count = segments.len();

    for i in 0..count {
        for j in (i + 1)..count {
            let wraps = i == 0 && j == count - 1;
            let hit = if j == i + 1 {
                segments[i].folds_back(&segments[j])
            } else if wraps {
                segments[j].folds_back(&segments[i])
            } else {
                segments[i].intersects(&segments[j])
            };

            if hit {
                return Some((i, j));
            }
        }
    }

    None
}

fn is_collinear(ring: &LinearRing) -> bool {
    let Some(envelope) = ring.envelope() else {
        return true;
    };

    let scale = envelope.width() * envelope.height();
    scale == 0.0 || ring.area_signed().abs() <= scale * AREA_EPSILON
}

/// Returns true if `candidate` lies strictly inside `exterior` and touches neither it nor any of the `placed` holes.
pub(crate) fn hole_fits(exterior: &LinearRing, placed: &[LinearRing], candidate: &LinearRing) -> bool {
    let inside = candidate.coords().iter().all(|c| exterior.contains_point(c));
    if !inside || rings_touch(exterior, candidate) {
        return false;
    }

    placed.iter().all(|hole| {
        !rings_touch(hole, candidate)
            && !hole.contains_point(&candidate.coords()[0])
            && !candidate.contains_point(&hole.coords()[0])
    })
}

fn rings_touch(a: &LinearRing, b: &LinearRing) -> bool {
    a.iter_segments()
        .any(|sa| b.iter_segments().any(|sb| sa.intersects(&sb)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use geosynth_types::{Coord, MultiPolygon};

    fn ring(coords: &[(f64, f64)]) -> LinearRing {
        LinearRing::new(coords.iter().map(|(x, y)| Coord::new(*x, *y)).collect()).expect("arity")
    }

    fn square() -> LinearRing {
        ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)])
    }

    fn hole(x: f64, y: f64) -> LinearRing {
        ring(&[(x, y), (x, y + 1.0), (x + 1.0, y + 1.0), (x + 1.0, y), (x, y)])
    }

    fn polygon(exterior: LinearRing, holes: Vec<LinearRing>) -> Geom {
        Geom::Polygon(Polygon::new(exterior, holes))
    }

    #[test]
    fn valid_polygon_with_holes() {
        let geom = polygon(square(), vec![hole(1.0, 1.0), hole(5.0, 5.0)]);
        assert_eq!(validate(&geom), Ok(()));
    }

    #[test]
    fn minimal_triangle_is_valid() {
        let geom = polygon(ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)]), vec![]);
        assert_eq!(validate(&geom), Ok(()));
    }

    #[test]
    fn non_finite() {
        let geom = Geom::Point(Coord::new(f64::NAN, 0.0));
        assert_matches!(validate(&geom), Err(ValidityError::NonFiniteCoordinate(_)));

        let geom = Geom::Point(Coord::xyz(0.0, 0.0, f64::INFINITY));
        assert_matches!(validate(&geom), Err(ValidityError::NonFiniteCoordinate(_)));
    }

    #[test]
    fn unclosed_ring() {
        let geom = polygon(ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]), vec![]);
        assert_eq!(validate(&geom), Err(ValidityError::UnclosedRing { ring: 0 }));
    }

    #[test]
    fn bow_tie() {
        let geom = polygon(
            ring(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)]),
            vec![],
        );
        assert_matches!(validate(&geom), Err(ValidityError::SelfIntersecting { ring: 0, .. }));
    }

    #[test]
    fn spike_folding_back() {
        let geom = polygon(
            ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (4.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        assert_matches!(
            validate(&geom),
            Err(ValidityError::SelfIntersecting { ring: 0, first: 1, second: 2 })
        );
    }

    #[test]
    fn collinear_ring() {
        let geom = polygon(ring(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.0, 0.0)]), vec![]);
        assert_matches!(
            validate(&geom),
            Err(ValidityError::SelfIntersecting { .. } | ValidityError::DegenerateArea { .. })
        );
    }

    #[test]
    fn clockwise_exterior() {
        let geom = polygon(square().reversed(), vec![]);
        assert_eq!(
            validate(&geom),
            Err(ValidityError::WrongWinding {
                ring: 0,
                expected: Winding::CounterClockwise,
                found: Winding::Clockwise,
            })
        );
    }

    #[test]
    fn counter_clockwise_hole() {
        let geom = polygon(square(), vec![hole(1.0, 1.0).reversed()]);
        assert_matches!(validate(&geom), Err(ValidityError::WrongWinding { ring: 1, .. }));
    }

    #[test]
    fn hole_outside() {
        let geom = polygon(square(), vec![hole(20.0, 20.0)]);
        assert_eq!(validate(&geom), Err(ValidityError::HoleOutsideShell { ring: 1 }));
    }

    #[test]
    fn hole_crossing_exterior() {
        let geom = polygon(square(), vec![hole(9.5, 5.0)]);
        assert_eq!(validate(&geom), Err(ValidityError::HoleOutsideShell { ring: 1 }));
    }

    #[test]
    fn overlapping_holes() {
        let geom = polygon(square(), vec![hole(1.0, 1.0), hole(1.5, 1.5)]);
        assert_eq!(validate(&geom), Err(ValidityError::HoleOutsideShell { ring: 2 }));
    }

    #[test]
    fn nested_holes() {
        let big = ring(&[(1.0, 1.0), (1.0, 8.0), (8.0, 8.0), (8.0, 1.0), (1.0, 1.0)]);
        let geom = polygon(square(), vec![big, hole(3.0, 3.0)]);
        assert_eq!(validate(&geom), Err(ValidityError::HoleOutsideShell { ring: 2 }));
    }

    #[test]
    fn ring_indices_continue_through_multipolygon() {
        let first = Polygon::new(square(), vec![hole(1.0, 1.0)]);
        let second = Polygon::new(
            ring(&[(20.0, 0.0), (21.0, 1.0), (21.0, 0.0), (20.0, 1.0), (20.0, 0.0)]),
            vec![],
        );
        let geom = Geom::MultiPolygon(MultiPolygon::new(vec![first, second]));
        assert_matches!(validate(&geom), Err(ValidityError::SelfIntersecting { ring: 2, .. }));
    }

    #[test]
    fn lines() {
        let line = |coords: &[(f64, f64)]| {
            Geom::LineString(
                LineString::new(coords.iter().map(|(x, y)| Coord::new(*x, *y)).collect()).expect("arity"),
            )
        };

        assert_eq!(validate(&line(&[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0)])), Ok(()));
        assert_eq!(
            validate(&line(&[(1.0, 1.0), (1.0, 1.0)])),
            Err(ValidityError::ZeroLength)
        );
    }

    #[test]
    fn out_of_envelope() {
        let geom = polygon(square(), vec![]);
        let envelope = Envelope::new(0.0, 0.0, 5.0, 10.0).expect("valid");
        assert_matches!(
            validate_within(&geom, &envelope),
            Err(ValidityError::OutOfEnvelope { coord, .. }) if coord == Coord::new(10.0, 0.0)
        );

        let envelope = Envelope::new(0.0, 0.0, 10.0, 10.0).expect("valid");
        assert_eq!(validate_within(&geom, &envelope), Ok(()));
    }
}
