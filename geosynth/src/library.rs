use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// GIS library a generator produces values for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Library {
    /// JTS topology suite, represented by `geo-types`.
    Jts,
    /// PostGIS geometry as stored by the database (EWKB).
    PostgisGeometry,
    /// PostGIS wrapper around a JTS geometry (EWKT).
    PostgisJts,
    /// ESRI geometry API (ESRI JSON).
    Esri,
    /// Geolatte geometries (GeoJSON).
    Geolatte,
    /// H3 hexagonal cell index.
    H3,
    /// Projected coordinates.
    Proj4j,
}

impl Library {
    /// All libraries, in declaration order.
    pub const ALL: [Library; 7] = [
        Library::Jts,
        Library::PostgisGeometry,
        Library::PostgisJts,
        Library::Esri,
        Library::Geolatte,
        Library::H3,
        Library::Proj4j,
    ];

    /// Snake-case name of the library, as used in generator keys.
    pub fn name(&self) -> &'static str {
        match self {
            Library::Jts => "jts",
            Library::PostgisGeometry => "postgis_geometry",
            Library::PostgisJts => "postgis_jts",
            Library::Esri => "esri",
            Library::Geolatte => "geolatte",
            Library::H3 => "h3",
            Library::Proj4j => "proj4j",
        }
    }
}

impl Display for Library {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Library {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        Self::ALL
            .into_iter()
            .find(|lib| lib.name().replace('_', "") == normalized)
            .ok_or_else(|| format!("unknown library {s:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!("jts".parse::<Library>(), Ok(Library::Jts));
        assert_eq!("PostGIS-JTS".parse::<Library>(), Ok(Library::PostgisJts));
        assert_eq!("postgis_geometry".parse::<Library>(), Ok(Library::PostgisGeometry));
        assert!("gdal".parse::<Library>().is_err());

        for lib in Library::ALL {
            assert_eq!(lib.to_string().parse::<Library>(), Ok(lib));
        }
    }
}
