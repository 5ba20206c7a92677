//! Geolatte geometries, exchanged as GeoJSON.
//!
//! GeoJSON has a counterpart for every canonical kind and keeps elevation. The CRS is written as a named CRS foreign
//! member, as the 2008 GeoJSON format did:
//!
//! ```json
//! "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::4326" } }
//! ```

use super::{Adapter, CollectionAdapter};
use crate::error::AdapterError;
use crate::library::Library;
use geojson::{JsonObject, JsonValue, Value};
use geosynth_types::{
    Coord, Crs, Geom, LineString, MultiLineString, MultiPoint, MultiPolygon, Polygon, ShapeKind, TaggedGeom,
};
use serde_json::json;

/// Adapter for `geojson::Geometry`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeolatteAdapter {
    default_crs: Crs,
}

impl GeolatteAdapter {
    /// Creates an adapter. Geometries without a CRS member are read in `default_crs`.
    pub fn new(default_crs: Crs) -> Self {
        Self { default_crs }
    }
}

impl Default for GeolatteAdapter {
    fn default() -> Self {
        Self::new(Crs::WGS84)
    }
}

impl Adapter for GeolatteAdapter {
    type Native = geojson::Geometry;

    fn library(&self) -> Library {
        Library::Geolatte
    }

    fn supports(&self, _kind: ShapeKind) -> bool {
        true
    }

    fn to_native(&self, value: &TaggedGeom) -> Result<Self::Native, AdapterError> {
        Ok(geojson::Geometry {
            bbox: None,
            value: to_value(value.geom()),
            foreign_members: Some(crs_member(value.crs())),
        })
    }

    fn from_native(&self, native: &Self::Native) -> Result<TaggedGeom, AdapterError> {
        Ok(TaggedGeom::new(from_value(&native.value)?, self.read_crs(native)?))
    }
}

impl CollectionAdapter for GeolatteAdapter {
    type NativeCollection = geojson::Geometry;

    fn collection_to_native(&self, members: &[Geom], crs: &Crs) -> Result<Self::NativeCollection, AdapterError> {
        let members = members
            .iter()
            .map(|member| geojson::Geometry::new(to_value(member)))
            .collect();

        Ok(geojson::Geometry {
            bbox: None,
            value: Value::GeometryCollection(members),
            foreign_members: Some(crs_member(crs)),
        })
    }

    fn collection_from_native(&self, native: &Self::NativeCollection) -> Result<(Vec<Geom>, Crs), AdapterError> {
        let Value::GeometryCollection(members) = &native.value else {
            return Err(AdapterError::UnsupportedNative {
                library: Library::Geolatte,
                found: format!("{} instead of GeometryCollection", native.value.type_name()),
            });
        };

        let members = members
            .iter()
            .map(|member| from_value(&member.value))
            .collect::<Result<_, _>>()?;
        Ok((members, self.read_crs(native)?))
    }
}

impl GeolatteAdapter {
    fn read_crs(&self, native: &geojson::Geometry) -> Result<Crs, AdapterError> {
        match crs_name(native) {
            Some(name) => name.parse().map_err(|_| AdapterError::UnknownCrs {
                library: Library::Geolatte,
                crs: name.to_string(),
            }),
            None => Ok(self.default_crs.clone()),
        }
    }
}

fn crs_member(crs: &Crs) -> JsonObject {
    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "crs".into(),
        json!({ "type": "name", "properties": { "name": crs.to_urn() } }),
    );
    foreign_members
}

fn to_value(geom: &Geom) -> Value {
    match geom {
        Geom::Point(c) => Value::Point(position(c)),
        Geom::LineString(line) => Value::LineString(positions(line.coords())),
        Geom::Polygon(p) => Value::Polygon(rings(p)),
        Geom::MultiPoint(mp) => Value::MultiPoint(positions(mp.points())),
        Geom::MultiLineString(ml) => {
            Value::MultiLineString(ml.lines().iter().map(|l| positions(l.coords())).collect())
        }
        Geom::MultiPolygon(mp) => Value::MultiPolygon(mp.polygons().iter().map(rings).collect()),
    }
}

fn from_value(value: &Value) -> Result<Geom, AdapterError> {
    let geom = match value {
        Value::Point(p) => Geom::Point(coord(p)?),
        Value::LineString(line) => LineString::new(coords(line)?)?.into(),
        Value::Polygon(p) => polygon(p)?.into(),
        Value::MultiPoint(points) => MultiPoint::new(coords(points)?).into(),
        Value::MultiLineString(lines) => MultiLineString::new(
            lines
                .iter()
                .map(|l| Ok(LineString::new(coords(l)?)?))
                .collect::<Result<_, AdapterError>>()?,
        )
        .into(),
        Value::MultiPolygon(polygons) => {
            MultiPolygon::new(polygons.iter().map(|p| polygon(p)).collect::<Result<_, _>>()?).into()
        }
        Value::GeometryCollection(_) => {
            return Err(AdapterError::UnsupportedNative {
                library: Library::Geolatte,
                found: "GeometryCollection".into(),
            })
        }
    };

    Ok(geom)
}

fn crs_name(native: &geojson::Geometry) -> Option<&str> {
    native
        .foreign_members
        .as_ref()?
        .get("crs")?
        .get("properties")?
        .get("name")
        .and_then(JsonValue::as_str)
}

fn position(c: &Coord) -> Vec<f64> {
    match c.z {
        Some(z) => vec![c.x, c.y, z],
        None => vec![c.x, c.y],
    }
}

fn positions(coords: &[Coord]) -> Vec<Vec<f64>> {
    coords.iter().map(position).collect()
}

fn rings(p: &Polygon) -> Vec<Vec<Vec<f64>>> {
    p.iter_rings().map(|r| positions(r.coords())).collect()
}

fn coord(position: &[f64]) -> Result<Coord, AdapterError> {
    match *position {
        [x, y] => Ok(Coord::new(x, y)),
        [x, y, z, ..] => Ok(Coord::xyz(x, y, z)),
        _ => Err(AdapterError::UnsupportedNative {
            library: Library::Geolatte,
            found: format!("position with {} values", position.len()),
        }),
    }
}

fn coords(positions: &[Vec<f64>]) -> Result<Vec<Coord>, AdapterError> {
    positions.iter().map(|p| coord(p)).collect()
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Result<Polygon, AdapterError> {
    let Some((exterior, interiors)) = rings.split_first() else {
        return Err(AdapterError::UnsupportedNative {
            library: Library::Geolatte,
            found: "polygon without rings".into(),
        });
    };

    Ok(Polygon::from_coords(
        coords(exterior)?,
        interiors.iter().map(|r| coords(r)).collect::<Result<_, _>>()?,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::check_round_trip;
    use crate::config::GenerationConstraints;
    use crate::synth::{synthesize, synthesize_collection};
    use assert_matches::assert_matches;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn round_trip_with_elevation() {
        let adapter = GeolatteAdapter::default();
        let constraints = GenerationConstraints::default()
            .with_rings(1, 3)
            .with_elevation(-100.0, 100.0);
        for kind in ShapeKind::ALL {
            let geom = synthesize(kind, &constraints, &mut ChaCha8Rng::seed_from_u64(17)).expect("geom");
            let value = TaggedGeom::new(geom, Crs::epsg(32632));

            let native = adapter.to_native(&value).expect("native");
            assert_eq!(adapter.from_native(&native), Ok(value.clone()));
            assert_eq!(check_round_trip(&adapter, &native), Ok(value));
        }
    }

    #[test]
    fn crs_member() {
        let value = TaggedGeom::new(Coord::new(1.0, 2.0), Crs::WGS84);
        let native = GeolatteAdapter::default().to_native(&value).expect("native");
        assert_eq!(crs_name(&native), Some("urn:ogc:def:crs:EPSG::4326"));

        let json = serde_json::to_string(&native).expect("json");
        assert!(json.contains(r#""crs":{"#));
        let parsed: geojson::Geometry = serde_json::from_str(&json).expect("geometry");
        assert_eq!(GeolatteAdapter::default().from_native(&parsed), Ok(value));
    }

    #[test]
    fn missing_crs_is_default() {
        let native = geojson::Geometry::new(Value::Point(vec![1.0, 2.0]));
        let value = GeolatteAdapter::new(Crs::EPSG3857).from_native(&native).expect("point");
        assert_eq!(value.crs(), &Crs::EPSG3857);
    }

    #[test]
    fn unparsable_crs() {
        let mut native = geojson::Geometry::new(Value::Point(vec![1.0, 2.0]));
        let mut members = JsonObject::new();
        members.insert("crs".into(), json!({ "type": "name", "properties": { "name": "nonsense" } }));
        native.foreign_members = Some(members);

        assert_matches!(
            GeolatteAdapter::default().from_native(&native),
            Err(AdapterError::UnknownCrs { library: Library::Geolatte, .. })
        );
    }

    #[test]
    fn collection_keeps_crs_and_elevation() {
        let adapter = GeolatteAdapter::default();
        let constraints = GenerationConstraints::default()
            .with_rings(2, 4)
            .with_elevation(0.0, 10.0);
        let members = synthesize_collection(&constraints, &mut ChaCha8Rng::seed_from_u64(21)).expect("members");
        let crs: Crs = "ESRI:102100".parse().expect("crs");

        let native = adapter.collection_to_native(&members, &crs).expect("native");
        assert_eq!(crs_name(&native), Some("urn:ogc:def:crs:ESRI::102100"));

        let json = serde_json::to_string(&native).expect("json");
        let parsed: geojson::Geometry = serde_json::from_str(&json).expect("geometry");
        assert_eq!(adapter.collection_from_native(&parsed), Ok((members, crs)));

        let point = geojson::Geometry::new(Value::Point(vec![1.0, 2.0]));
        assert_matches!(
            adapter.collection_from_native(&point),
            Err(AdapterError::UnsupportedNative { .. })
        );
    }

    #[test]
    fn collections_and_short_positions() {
        let adapter = GeolatteAdapter::default();
        let collection = geojson::Geometry::new(Value::GeometryCollection(vec![]));
        assert_matches!(
            adapter.from_native(&collection),
            Err(AdapterError::UnsupportedNative { .. })
        );

        let point = geojson::Geometry::new(Value::Point(vec![1.0]));
        assert_matches!(adapter.from_native(&point), Err(AdapterError::UnsupportedNative { .. }));
    }
}
