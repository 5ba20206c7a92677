use crate::error::GeometryError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Coordinate reference system identifier, e.g. `EPSG:4326`.
///
/// This is an opaque tag: it is carried alongside geometries and written into the native models that support it,
/// but it is never checked to describe a real CRS. Adapters that actually transform coordinates decide themselves
/// which codes they understand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs {
    authority: Cow<'static, str>,
    code: Cow<'static, str>,
}

const URN_PREFIX: &str = "urn:ogc:def:crs:";

impl Crs {
    /// WGS84 geographic coordinates (longitude, latitude).
    pub const WGS84: Crs = Crs {
        authority: Cow::Borrowed("EPSG"),
        code: Cow::Borrowed("4326"),
    };

    /// Web Mercator projection.
    pub const EPSG3857: Crs = Crs {
        authority: Cow::Borrowed("EPSG"),
        code: Cow::Borrowed("3857"),
    };

    /// Creates a new identifier. The authority is normalized to upper case.
    pub fn new(authority: &str, code: &str) -> Result<Self, GeometryError> {
        let authority = authority.trim();
        let code = code.trim();
        if authority.is_empty() || code.is_empty() || authority.contains(':') || code.contains(':') {
            return Err(GeometryError::InvalidCrs(format!("{authority}:{code}")));
        }

        Ok(Self {
            authority: Cow::Owned(authority.to_uppercase()),
            code: Cow::Owned(code.to_string()),
        })
    }

    /// Identifier in the EPSG registry.
    pub fn epsg(code: u32) -> Self {
        Self {
            authority: Cow::Borrowed("EPSG"),
            code: Cow::Owned(code.to_string()),
        }
    }

    /// Naming authority, e.g. `EPSG`.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Code within the authority, e.g. `4326`.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Numeric spatial reference id, if the code is a number.
    pub fn srid(&self) -> Option<i32> {
        self.code.parse().ok()
    }

    /// OGC URN form, e.g. `urn:ogc:def:crs:EPSG::4326`.
    pub fn to_urn(&self) -> String {
        format!("{URN_PREFIX}{}::{}", self.authority, self.code)
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::WGS84
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

impl FromStr for Crs {
    type Err = GeometryError;

    /// Parses `AUTHORITY:CODE` or `urn:ogc:def:crs:AUTHORITY:[VERSION]:CODE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || GeometryError::InvalidCrs(s.to_string());

        if let Some(rest) = s
            .get(..URN_PREFIX.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(URN_PREFIX))
            .map(|_| &s[URN_PREFIX.len()..])
        {
            let mut parts = rest.split(':');
            let authority = parts.next().ok_or_else(invalid)?;
            let code = parts.last().ok_or_else(invalid)?;
            return Self::new(authority, code).map_err(|_| invalid());
        }

        let (authority, code) = s.split_once(':').ok_or_else(invalid)?;
        Self::new(authority, code).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Crs {
    type Error = GeometryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Crs> for String {
    fn from(value: Crs) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short_form() {
        let crs: Crs = "epsg:4326".parse().expect("valid");
        assert_eq!(crs, Crs::WGS84);
        assert_eq!(crs.srid(), Some(4326));
        assert_eq!(crs.to_string(), "EPSG:4326");
    }

    #[test]
    fn parse_urn() {
        let crs: Crs = "urn:ogc:def:crs:EPSG::3857".parse().expect("valid");
        assert_eq!(crs, Crs::EPSG3857);
        assert_eq!(crs.to_urn(), "urn:ogc:def:crs:EPSG::3857");

        let crs84: Crs = "urn:ogc:def:crs:OGC:1.3:CRS84".parse().expect("valid");
        assert_eq!(crs84.authority(), "OGC");
        assert_eq!(crs84.code(), "CRS84");
        assert_eq!(crs84.srid(), None);
    }

    #[test]
    fn rejects_garbage() {
        assert!("4326".parse::<Crs>().is_err());
        assert!("EPSG:".parse::<Crs>().is_err());
        assert!(":4326".parse::<Crs>().is_err());
        assert!("EPSG:43:26".parse::<Crs>().is_err());
    }

    #[test]
    fn owned_and_borrowed_compare_equal() {
        assert_eq!(Crs::epsg(4326), Crs::WGS84);
        assert_eq!(Crs::new("epsg", "3857").expect("valid"), Crs::EPSG3857);
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&Crs::EPSG3857).expect("serialize");
        assert_eq!(json, r#""EPSG:3857""#);
        let back: Crs = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Crs::EPSG3857);
    }
}
