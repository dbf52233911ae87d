use bson::{Document, doc};
use serde::{Deserialize, Serialize};

/// Mean earth radius used to turn a distance into radians.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Filter matching records whose `location` lies within `distance_miles`
/// of `center`. Coordinates follow GeoJSON order: `[longitude, latitude]`.
pub fn radius_filter(center: GeoPoint, distance_miles: f64) -> Document {
    let radians = distance_miles / EARTH_RADIUS_MILES;
    doc! {
        "location": {
            "$geoWithin": {
                "$centerSphere": [[center.longitude, center.latitude], radians],
            },
        },
    }
}
