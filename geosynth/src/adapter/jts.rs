//! JTS geometries, represented by [`geo_types`].
//!
//! The model is two-dimensional and carries no CRS, so the CRS of the canonical geometry is set by the adapter.

use super::{ensure_2d, ensure_members_2d, Adapter, CollectionAdapter};
use crate::error::AdapterError;
use crate::library::Library;
use geosynth_types::{
    Coord, Crs, Geom, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Polygon, ShapeKind,
    TaggedGeom, Winding,
};

/// Adapter for `geo_types::Geometry`.
#[derive(Debug, Clone, PartialEq)]
pub struct JtsAdapter {
    crs: Crs,
}

impl JtsAdapter {
    /// Creates an adapter tagging the geometries it reads with the given CRS.
    pub fn new(crs: Crs) -> Self {
        Self { crs }
    }
}

impl Default for JtsAdapter {
    fn default() -> Self {
        Self::new(Crs::WGS84)
    }
}

impl Adapter for JtsAdapter {
    type Native = geo_types::Geometry<f64>;

    fn library(&self) -> Library {
        Library::Jts
    }

    fn supports(&self, _kind: ShapeKind) -> bool {
        true
    }

    fn to_native(&self, value: &TaggedGeom) -> Result<Self::Native, AdapterError> {
        ensure_2d(Library::Jts, value)?;
        Ok(to_geo(value.geom()))
    }

    fn from_native(&self, native: &Self::Native) -> Result<TaggedGeom, AdapterError> {
        Ok(TaggedGeom::new(from_geo(Library::Jts, native)?, self.crs.clone()))
    }
}

impl CollectionAdapter for JtsAdapter {
    type NativeCollection = geo_types::GeometryCollection<f64>;

    fn collection_to_native(&self, members: &[Geom], _crs: &Crs) -> Result<Self::NativeCollection, AdapterError> {
        ensure_members_2d(Library::Jts, members)?;
        Ok(geo_types::GeometryCollection(members.iter().map(to_geo).collect()))
    }

    fn collection_from_native(&self, native: &Self::NativeCollection) -> Result<(Vec<Geom>, Crs), AdapterError> {
        let members = native
            .0
            .iter()
            .map(|member| from_geo(Library::Jts, member))
            .collect::<Result<_, _>>()?;
        Ok((members, self.crs.clone()))
    }
}

/// Converts a canonical geometry into `geo-types`, dropping elevation.
pub(crate) fn to_geo(geom: &Geom) -> geo_types::Geometry<f64> {
    match geom {
        Geom::Point(c) => geo_types::Geometry::Point(geo_types::Point(coord(c))),
        Geom::LineString(line) => geo_types::Geometry::LineString(line_string(line.coords())),
        Geom::Polygon(p) => geo_types::Geometry::Polygon(polygon(p)),
        Geom::MultiPoint(mp) => geo_types::Geometry::MultiPoint(geo_types::MultiPoint(
            mp.points().iter().map(|c| geo_types::Point(coord(c))).collect(),
        )),
        Geom::MultiLineString(ml) => geo_types::Geometry::MultiLineString(geo_types::MultiLineString(
            ml.lines().iter().map(|l| line_string(l.coords())).collect(),
        )),
        Geom::MultiPolygon(mp) => geo_types::Geometry::MultiPolygon(geo_types::MultiPolygon(
            mp.polygons().iter().map(polygon).collect(),
        )),
    }
}

fn coord(c: &Coord) -> geo_types::Coord<f64> {
    geo_types::Coord { x: c.x, y: c.y }
}

fn line_string(coords: &[Coord]) -> geo_types::LineString<f64> {
    geo_types::LineString(coords.iter().map(coord).collect())
}

fn polygon(p: &Polygon) -> geo_types::Polygon<f64> {
    geo_types::Polygon::new(
        line_string(p.exterior().coords()),
        p.interiors().iter().map(|r| line_string(r.coords())).collect(),
    )
}

/// Converts a `geo-types` geometry into a canonical one. `Line`, `Rect` and `Triangle` are read as a line string and
/// polygons; geometry collections have no canonical counterpart.
pub(crate) fn from_geo(library: Library, geo: &geo_types::Geometry<f64>) -> Result<Geom, AdapterError> {
    let geom = match geo {
        geo_types::Geometry::Point(p) => Geom::Point(canonical(&p.0)),
        geo_types::Geometry::Line(l) => {
            LineString::new(vec![canonical(&l.start), canonical(&l.end)])?.into()
        }
        geo_types::Geometry::LineString(l) => LineString::new(canonical_coords(l))?.into(),
        geo_types::Geometry::Polygon(p) => canonical_polygon(p)?.into(),
        geo_types::Geometry::MultiPoint(mp) => {
            MultiPoint::new(mp.0.iter().map(|p| canonical(&p.0)).collect()).into()
        }
        geo_types::Geometry::MultiLineString(ml) => MultiLineString::new(
            ml.0.iter()
                .map(|l| LineString::new(canonical_coords(l)))
                .collect::<Result<_, _>>()?,
        )
        .into(),
        geo_types::Geometry::MultiPolygon(mp) => MultiPolygon::new(
            mp.0.iter()
                .map(canonical_polygon)
                .collect::<Result<_, _>>()?,
        )
        .into(),
        geo_types::Geometry::Rect(r) => {
            let (min, max) = (r.min(), r.max());
            let exterior = LinearRing::new(vec![
                Coord::new(min.x, min.y),
                Coord::new(max.x, min.y),
                Coord::new(max.x, max.y),
                Coord::new(min.x, max.y),
                Coord::new(min.x, min.y),
            ])?;
            Polygon::new(exterior, vec![]).into()
        }
        geo_types::Geometry::Triangle(t) => {
            let ring = LinearRing::closed(vec![canonical(&t.0), canonical(&t.1), canonical(&t.2)])?;
            let exterior = match ring.winding() {
                Winding::CounterClockwise => ring,
                Winding::Clockwise => ring.reversed(),
            };
            Polygon::new(exterior, vec![]).into()
        }
        geo_types::Geometry::GeometryCollection(_) => {
            return Err(AdapterError::UnsupportedNative {
                library,
                found: "GeometryCollection".into(),
            })
        }
    };

    Ok(geom)
}

fn canonical(c: &geo_types::Coord<f64>) -> Coord {
    Coord::new(c.x, c.y)
}

fn canonical_coords(line: &geo_types::LineString<f64>) -> Vec<Coord> {
    line.0.iter().map(canonical).collect()
}

fn canonical_polygon(p: &geo_types::Polygon<f64>) -> Result<Polygon, AdapterError> {
    Ok(Polygon::from_coords(
        canonical_coords(p.exterior()),
        p.interiors().iter().map(canonical_coords).collect(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::check_round_trip;
    use crate::config::GenerationConstraints;
    use crate::synth::{synthesize, synthesize_collection};
    use crate::validity::validate;
    use assert_matches::assert_matches;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn synthesized_geometries_survive_round_trip() {
        let adapter = JtsAdapter::default();
        let constraints = GenerationConstraints::default().with_rings(1, 3);
        for kind in ShapeKind::ALL {
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let value = TaggedGeom::new(synthesize(kind, &constraints, &mut rng).expect("geom"), Crs::WGS84);

            let native = adapter.to_native(&value).expect("native");
            assert_eq!(adapter.from_native(&native), Ok(value.clone()));
            assert_eq!(check_round_trip(&adapter, &native), Ok(value));
        }
    }

    #[test]
    fn crs_comes_from_adapter() {
        let adapter = JtsAdapter::new(Crs::EPSG3857);
        let native = geo_types::Geometry::Point(geo_types::Point::new(1.0, 2.0));
        let value = adapter.from_native(&native).expect("point");
        assert_eq!(value.crs(), &Crs::EPSG3857);
        assert_eq!(value.geom(), &Geom::Point(Coord::new(1.0, 2.0)));
    }

    #[test]
    fn elevation_is_not_supported() {
        let value = TaggedGeom::new(Coord::xyz(1.0, 2.0, 3.0), Crs::WGS84);
        assert_eq!(
            JtsAdapter::default().to_native(&value),
            Err(AdapterError::UnsupportedDimension { library: Library::Jts })
        );
    }

    #[test]
    fn rect_and_triangle_become_valid_polygons() {
        let adapter = JtsAdapter::default();

        let rect = geo_types::Rect::new(geo_types::coord! { x: 0.0, y: 0.0 }, geo_types::coord! { x: 2.0, y: 1.0 });
        let value = adapter.from_native(&geo_types::Geometry::Rect(rect)).expect("rect");
        assert_eq!(value.geom().coord_count(), 5);
        assert_eq!(validate(value.geom()), Ok(()));

        let triangle = geo_types::Triangle::new(
            geo_types::coord! { x: 0.0, y: 0.0 },
            geo_types::coord! { x: 0.0, y: 1.0 },
            geo_types::coord! { x: 1.0, y: 0.0 },
        );
        let value = adapter.from_native(&geo_types::Geometry::Triangle(triangle)).expect("triangle");
        assert_eq!(validate(value.geom()), Ok(()));
    }

    #[test]
    fn line_becomes_line_string() {
        let line = geo_types::Line::new(geo_types::coord! { x: 0.0, y: 0.0 }, geo_types::coord! { x: 1.0, y: 1.0 });
        let value = JtsAdapter::default()
            .from_native(&geo_types::Geometry::Line(line))
            .expect("line");
        assert_eq!(value.geom().kind(), ShapeKind::LineString);
    }

    #[test]
    fn geometry_collection_is_rejected() {
        let native = geo_types::Geometry::GeometryCollection(geo_types::GeometryCollection(vec![]));
        assert_matches!(
            JtsAdapter::default().from_native(&native),
            Err(AdapterError::UnsupportedNative { library: Library::Jts, .. })
        );
    }

    #[test]
    fn collection_members() {
        let adapter = JtsAdapter::new(Crs::EPSG3857);
        let constraints = GenerationConstraints::default().with_rings(2, 4);
        let members = synthesize_collection(&constraints, &mut ChaCha8Rng::seed_from_u64(3)).expect("members");

        let native = adapter.collection_to_native(&members, &Crs::EPSG3857).expect("native");
        assert_eq!(native.0.len(), members.len());
        assert_eq!(adapter.collection_from_native(&native), Ok((members, Crs::EPSG3857)));

        let nested = geo_types::GeometryCollection(vec![geo_types::Geometry::GeometryCollection(native)]);
        assert_matches!(
            adapter.collection_from_native(&nested),
            Err(AdapterError::UnsupportedNative { library: Library::Jts, .. })
        );

        assert_eq!(
            adapter.collection_to_native(&[Geom::Point(Coord::xyz(1.0, 2.0, 3.0))], &Crs::EPSG3857),
            Err(AdapterError::UnsupportedDimension { library: Library::Jts })
        );
    }

    #[test]
    fn short_ring_is_malformed() {
        let native = geo_types::Geometry::LineString(geo_types::LineString(vec![geo_types::coord! { x: 0.0, y: 0.0 }]));
        assert_matches!(
            JtsAdapter::default().from_native(&native),
            Err(AdapterError::Geometry(_))
        );
    }
}
