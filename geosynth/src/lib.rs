//! Geosynth produces random but structurally valid geometry values for property-based testing of code that works with
//! GIS libraries.
//!
//! # Quick start
//!
//! ```ignore
//! use geosynth::{GeneratorConfig, GenerationConstraints, Registry};
//! use geosynth::geosynth_types::Envelope;
//!
//! let config = GeneratorConfig::new(
//!     GenerationConstraints::default()
//!         .with_envelope(Envelope::new(0.0, 0.0, 10.0, 10.0)?)
//!         .with_vertices(5, 5)
//!         .with_seed(7),
//! );
//! let polygon = Registry::global().generate("postgis_geometry:polygon".parse()?, Some(&config), &mut rng)?;
//! ```
//!
//! # How values are made
//!
//! Generation happens in two independent steps:
//!
//! * the [`synthesizer`](synth) draws a canonical geometry (see [`geosynth_types`]) satisfying the
//!   [`GenerationConstraints`], redrawing candidates the [`validity`] checker rejects, and
//! * an [`adapter`] converts the canonical geometry into the object model of the target [`Library`].
//!
//! The [`Registry`] ties the two together: for every library and geometry kind the library can represent there is a
//! generator the host test framework can look up by its [`GeneratorKey`].

pub mod adapter;
pub mod config;
pub mod error;
mod library;
pub mod registry;
pub mod synth;
pub mod validity;

pub use adapter::{check_round_trip, Adapter, CollectionAdapter, NativeGeometry};
pub use config::{AdapterOptions, GenerationConstraints, GeneratorConfig};
pub use error::{AdapterError, GeneratorError, ValidityError};
pub use library::Library;
pub use registry::{Generator, GeneratorKey, Registry, ValueGenerator};

// Reexport geosynth_types
pub use geosynth_types;
