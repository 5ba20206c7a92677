//! Random simple rings.
//!
//! A ring is drawn as a "noisy star": vertices are placed around a center at strictly increasing angles with random
//! distances from it. Any such ring is star-shaped with respect to its center, and so is simple. Since the gap between
//! two consecutive angles is always less than a half-turn, the center stays inside the ring and the ring goes
//! counter-clockwise.

use super::uniform;
use crate::config::GenerationConstraints;
use crate::validity::hole_fits;
use geosynth_types::contour::MIN_RING_COORDS;
use geosynth_types::{Coord, Envelope, GeometryError, LinearRing};
use rand::Rng;
use std::f64::consts::TAU;

/// Holes never get more coordinates than this.
const MAX_HOLE_COORDS: usize = 8;
/// Share of the exterior's extent kept free of holes along each side.
const HOLE_MARGIN: f64 = 0.1;
const MIN_RADIUS: f64 = 0.3;
const MAX_ANGLE_JITTER: f64 = 0.5;

/// Draws a counter-clockwise ring with `coord_count` coordinates (closing one included) inside the envelope.
pub(super) fn star_ring<R: Rng + ?Sized>(
    rng: &mut R,
    envelope: &Envelope,
    coord_count: usize,
    elevation: Option<(f64, f64)>,
) -> Result<LinearRing, GeometryError> {
    let vertex_count = coord_count.max(MIN_RING_COORDS) - 1;

    let centers = envelope.shrink_relative(0.25);
    let cx = uniform(rng, centers.x_min(), centers.x_max());
    let cy = uniform(rng, centers.y_min(), centers.y_max());
    let rx = (cx - envelope.x_min()).min(envelope.x_max() - cx);
    let ry = (cy - envelope.y_min()).min(envelope.y_max() - cy);

    let phase = rng.gen_range(0.0..TAU);
    let step = TAU / vertex_count as f64;

    let mut coords = Vec::with_capacity(vertex_count + 1);
    for i in 0..vertex_count {
        let angle = phase + (i as f64 + rng.gen_range(0.0..MAX_ANGLE_JITTER)) * step;
        let radius = uniform(rng, MIN_RADIUS, 1.0);
        let x = (cx + radius * rx * angle.cos()).clamp(envelope.x_min(), envelope.x_max());
        let y = (cy + radius * ry * angle.sin()).clamp(envelope.y_min(), envelope.y_max());
        let z = elevation.map(|(min, max)| uniform(rng, min, max));
        coords.push(Coord { x, y, z });
    }

    LinearRing::closed(coords)
}

/// Tries to place `count` clockwise holes inside the exterior ring. A hole that does not fit after
/// `hole_attempts` candidates is dropped, so fewer holes may be returned.
pub(super) fn place_holes<R: Rng + ?Sized>(
    rng: &mut R,
    exterior: &LinearRing,
    count: usize,
    constraints: &GenerationConstraints,
) -> Result<Vec<LinearRing>, GeometryError> {
    let Some(bounds) = exterior.envelope() else {
        return Ok(vec![]);
    };

    let area = bounds.shrink_relative(HOLE_MARGIN);
    let max_coords = constraints.max_vertices.clamp(MIN_RING_COORDS, MAX_HOLE_COORDS);

    let mut holes: Vec<LinearRing> = Vec::with_capacity(count);
    for index in 0..count {
        let mut placed = None;
        for _ in 0..constraints.hole_attempts {
            let candidate = hole_candidate(rng, &area, max_coords, constraints.elevation)?;
            if hole_fits(exterior, &holes, &candidate) {
                placed = Some(candidate);
                break;
            }
        }

        match placed {
            Some(hole) => holes.push(hole),
            None => log::debug!(
                "Dropped hole {index}: no candidate fit in {} attempts",
                constraints.hole_attempts
            ),
        }
    }

    Ok(holes)
}

fn hole_candidate<R: Rng + ?Sized>(
    rng: &mut R,
    area: &Envelope,
    max_coords: usize,
    elevation: Option<(f64, f64)>,
) -> Result<LinearRing, GeometryError> {
    let width = area.width() * uniform(rng, 0.1, 0.4);
    let height = area.height() * uniform(rng, 0.1, 0.4);
    let x = uniform(rng, area.x_min(), area.x_max() - width);
    let y = uniform(rng, area.y_min(), area.y_max() - height);
    let bounds = Envelope::new(x, y, x + width, y + height)?;

    let coord_count = rng.gen_range(MIN_RING_COORDS..=max_coords);
    Ok(star_ring(rng, &bounds, coord_count, elevation)?.reversed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validity::validate;
    use geosynth_types::{Geom, Polygon, Winding};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn envelope() -> Envelope {
        Envelope::new(0.0, 0.0, 10.0, 10.0).expect("valid")
    }

    #[test]
    fn star_rings_are_valid_polygons() {
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let count = rng.gen_range(4..=20);
            let ring = star_ring(&mut rng, &envelope(), count, None).expect("ring");

            assert_eq!(ring.coords().len(), count);
            assert!(ring.is_closed());
            assert_eq!(ring.winding(), Winding::CounterClockwise);
            assert!(ring.coords().iter().all(|c| envelope().contains(c)));
            assert_eq!(validate(&Geom::Polygon(Polygon::new(ring, vec![]))), Ok(()));
        }
    }

    #[test]
    fn elevation_is_within_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ring = star_ring(&mut rng, &envelope(), 6, Some((100.0, 200.0))).expect("ring");
        for c in ring.coords() {
            let z = c.z.expect("has elevation");
            assert!((100.0..=200.0).contains(&z));
        }
    }

    #[test]
    fn holes_fit_into_exterior() {
        let constraints = GenerationConstraints::default();
        let mut placed_any = false;
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let exterior = star_ring(&mut rng, &envelope(), 10, None).expect("ring");
            let holes = place_holes(&mut rng, &exterior, 2, &constraints).expect("holes");

            assert!(holes.len() <= 2);
            placed_any |= !holes.is_empty();
            for hole in &holes {
                assert_eq!(hole.winding(), Winding::Clockwise);
                assert!(hole.coords().len() <= MAX_HOLE_COORDS);
            }

            assert_eq!(validate(&Geom::Polygon(Polygon::new(exterior, holes))), Ok(()));
        }

        assert!(placed_any);
    }

    #[test]
    fn no_hole_budget_drops_holes() {
        let constraints = GenerationConstraints {
            hole_attempts: 0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let exterior = star_ring(&mut rng, &envelope(), 10, None).expect("ring");
        let holes = place_holes(&mut rng, &exterior, 3, &constraints).expect("holes");
        assert!(holes.is_empty());
    }
}
