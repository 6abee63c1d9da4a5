// Airport coordinates and great-circle distance
use serde::{Deserialize, Serialize};

// Mean Earth radius (IUGG)
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn midpoint(&self, other: &Coordinates) -> Coordinates {
        Coordinates::new((self.lat + other.lat) / 2.0, (self.lon + other.lon) / 2.0)
    }
}

/// Haversine distance between two points, in kilometres.
pub fn great_circle_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let (lat1, lat2) = (from.lat.to_radians(), to.lat.to_radians());
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}
