use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use bootcamp_query::GeoPoint;

#[derive(Debug)]
pub struct GeocodeError(pub String);

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for GeocodeError {}

/// Resolves a zipcode to a point on the map.
///
/// `Ok(None)` means the zipcode is unknown; `Err` means the lookup itself
/// failed.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, zipcode: &str) -> Result<Option<GeoPoint>, GeocodeError>;
}

/// Knows no zipcodes. Used when no table is configured.
pub struct NoopGeocoder;

impl Geocoder for NoopGeocoder {
    fn geocode(&self, _zipcode: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        Ok(None)
    }
}

/// Fixed zipcode table, usually loaded from a JSON object of
/// `{ "02215": { "latitude": .., "longitude": .. } }`.
#[derive(Debug, Default, Clone)]
pub struct StaticGeocoder {
    points: HashMap<String, GeoPoint>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, GeocodeError> {
        let points: HashMap<String, GeoPoint> = serde_json::from_slice(bytes)
            .map_err(|e| GeocodeError(format!("invalid zipcode table: {e}")))?;
        Ok(Self { points })
    }

    pub fn from_file(path: &Path) -> Result<Self, GeocodeError> {
        let bytes = std::fs::read(path)
            .map_err(|e| GeocodeError(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json(&bytes)
    }

    pub fn with(mut self, zipcode: impl Into<String>, point: GeoPoint) -> Self {
        self.points.insert(zipcode.into(), point);
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, zipcode: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        Ok(self.points.get(zipcode.trim()).copied())
    }
}
