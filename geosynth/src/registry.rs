//! Catalog of geometry generators.
//!
//! A generator produces values of one [`ShapeKind`] for one [`Library`]. The catalog is built once, on first access,
//! from the list of registrations in this module and is never modified afterwards, so it can be shared between
//! threads freely.
//!
//! ```ignore
//! let key: GeneratorKey = "jts:polygon".parse()?;
//! let value = Registry::global().generate(key, None, &mut rand::thread_rng())?;
//! ```

use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::library::Library;
use crate::synth::synthesize;
use crate::NativeGeometry;
use geosynth_types::{ShapeKind, TaggedGeom};
use lazy_static::lazy_static;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Identifies a generator: a library and the kind of geometry.
///
/// The string form is `library:kind`, e.g. `jts:polygon` or `h3:point`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GeneratorKey {
    /// Target library.
    pub library: Library,
    /// Kind of the produced geometries.
    pub kind: ShapeKind,
}

impl GeneratorKey {
    /// Creates a new key.
    pub const fn new(library: Library, kind: ShapeKind) -> Self {
        Self { library, kind }
    }
}

impl Display for GeneratorKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.library, self.kind)
    }
}

impl FromStr for GeneratorKey {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let not_registered = || GeneratorError::NoGeneratorRegistered(s.to_string());
        let (library, kind) = s.split_once(':').ok_or_else(not_registered)?;

        Ok(Self {
            library: library.trim().parse().map_err(|_| not_registered())?,
            kind: kind.trim().parse().map_err(|_| not_registered())?,
        })
    }
}

/// Contract of a value generator as seen by the host framework: configuration and a random source in, a fresh native
/// value out.
pub trait ValueGenerator: Send + Sync {
    /// Generates a new value.
    fn generate(&self, config: &GeneratorConfig, rng: &mut dyn RngCore) -> Result<NativeGeometry, GeneratorError>;
}

/// Generator of one library and kind: synthesizes a canonical geometry and converts it into the library's model.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Generator {
    key: GeneratorKey,
}

impl Generator {
    /// Key of the generator.
    pub fn key(&self) -> GeneratorKey {
        self.key
    }

    /// Synthesizes the canonical geometry the native value is made from.
    pub fn generate_canonical(
        &self,
        config: &GeneratorConfig,
        rng: &mut dyn RngCore,
    ) -> Result<TaggedGeom, GeneratorError> {
        let constraints = &config.constraints;
        let geom = match constraints.seed {
            Some(seed) => synthesize(self.key.kind, constraints, &mut ChaCha8Rng::seed_from_u64(seed))?,
            None => synthesize(self.key.kind, constraints, rng)?,
        };

        Ok(TaggedGeom::new(geom, constraints.crs.clone()))
    }
}

impl ValueGenerator for Generator {
    fn generate(&self, config: &GeneratorConfig, rng: &mut dyn RngCore) -> Result<NativeGeometry, GeneratorError> {
        let value = self.generate_canonical(config, rng)?;
        Ok(self.key.library.to_native(&value, &config.adapter)?)
    }
}

/// Immutable catalog of generators.
#[derive(Debug)]
pub struct Registry {
    generators: BTreeMap<GeneratorKey, Generator>,
}

lazy_static! {
    static ref GLOBAL: Registry = Registry::with_registrations(&registrations());
}

/// Every generator of the catalog.
fn registrations() -> Vec<GeneratorKey> {
    use ShapeKind::*;

    let mut keys = vec![];
    let mut register = |library: Library, kinds: &[ShapeKind]| {
        keys.extend(kinds.iter().map(|kind| GeneratorKey::new(library, *kind)));
    };

    const ALL: &[ShapeKind] = &[Point, LineString, Polygon, MultiPoint, MultiLineString, MultiPolygon];

    #[cfg(feature = "jts")]
    register(Library::Jts, ALL);
    #[cfg(feature = "postgis")]
    register(Library::PostgisGeometry, ALL);
    #[cfg(feature = "postgis")]
    register(Library::PostgisJts, ALL);
    register(Library::Esri, &[Point, MultiPoint, LineString, Polygon]);
    #[cfg(feature = "geolatte")]
    register(Library::Geolatte, ALL);
    #[cfg(feature = "h3")]
    register(Library::H3, &[Point]);
    #[cfg(feature = "proj")]
    register(Library::Proj4j, &[Point, MultiPoint]);

    keys
}

impl Registry {
    /// The process-wide catalog.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    fn with_registrations(keys: &[GeneratorKey]) -> Self {
        let generators = keys.iter().map(|key| (*key, Generator { key: *key })).collect();
        Self { generators }
    }

    /// Finds the generator with this key.
    pub fn lookup(&self, key: GeneratorKey) -> Result<&Generator, GeneratorError> {
        self.generators
            .get(&key)
            .ok_or_else(|| GeneratorError::NoGeneratorRegistered(key.to_string()))
    }

    /// Whether there is a generator with this key.
    pub fn contains(&self, key: GeneratorKey) -> bool {
        self.generators.contains_key(&key)
    }

    /// Keys of all generators, ordered by library and kind.
    pub fn keys(&self) -> impl Iterator<Item = GeneratorKey> + '_ {
        self.generators.keys().copied()
    }

    /// Generates a value with the generator of this key. Without a configuration the defaults are used.
    pub fn generate(
        &self,
        key: GeneratorKey,
        config: Option<&GeneratorConfig>,
        rng: &mut dyn RngCore,
    ) -> Result<NativeGeometry, GeneratorError> {
        let generator = self.lookup(key)?;
        log::trace!("Generating {key}");

        match config {
            Some(config) => generator.generate(config, rng),
            None => generator.generate(&GeneratorConfig::default(), rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConstraints;
    use assert_matches::assert_matches;

    #[test]
    fn key_parsing() {
        assert_eq!(
            "jts:polygon".parse::<GeneratorKey>(),
            Ok(GeneratorKey::new(Library::Jts, ShapeKind::Polygon))
        );
        assert_eq!(
            "postgis_jts:MultiLineString".parse::<GeneratorKey>(),
            Ok(GeneratorKey::new(Library::PostgisJts, ShapeKind::MultiLineString))
        );
        assert_matches!(
            "jts".parse::<GeneratorKey>(),
            Err(GeneratorError::NoGeneratorRegistered(_))
        );
        assert_matches!(
            "gdal:point".parse::<GeneratorKey>(),
            Err(GeneratorError::NoGeneratorRegistered(_))
        );

        let key = GeneratorKey::new(Library::H3, ShapeKind::Point);
        assert_eq!(key.to_string(), "h3:point");
        assert_eq!(key.to_string().parse::<GeneratorKey>(), Ok(key));
    }

    #[test]
    fn registrations_match_supported_kinds() {
        let registry = Registry::global();
        for library in Library::ALL {
            for kind in ShapeKind::ALL {
                let key = GeneratorKey::new(library, kind);
                assert_eq!(registry.contains(key), library.supports(kind), "{key}");
            }
        }
    }

    #[test]
    fn unregistered_key() {
        let key = GeneratorKey::new(Library::H3, ShapeKind::Polygon);
        assert_eq!(
            Registry::global().generate(key, None, &mut ChaCha8Rng::seed_from_u64(0)),
            Err(GeneratorError::NoGeneratorRegistered("h3:polygon".into()))
        );
    }

    #[test]
    fn seed_overrides_host_rng() {
        let config = GeneratorConfig::new(GenerationConstraints::default().with_seed(42));
        let key = GeneratorKey::new(Library::Jts, ShapeKind::Polygon);
        let registry = Registry::global();

        let a = registry
            .generate(key, Some(&config), &mut ChaCha8Rng::seed_from_u64(1))
            .expect("a");
        let b = registry
            .generate(key, Some(&config), &mut ChaCha8Rng::seed_from_u64(2))
            .expect("b");
        assert_eq!(a, b);
    }

    #[test]
    fn unseeded_calls_use_host_rng() {
        let key = GeneratorKey::new(Library::Geolatte, ShapeKind::LineString);
        let registry = Registry::global();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let a = registry.generate(key, None, &mut rng).expect("a");
        let b = registry.generate(key, None, &mut rng).expect("b");
        assert_ne!(a, b);

        let c = registry
            .generate(key, None, &mut ChaCha8Rng::seed_from_u64(1))
            .expect("c");
        assert_eq!(a, c);
    }
}
