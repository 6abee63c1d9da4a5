// Mapping collaborator: standalone Leaflet page for a flight route
use crate::geo::Coordinates;
use crate::offer::OfferRecord;
use std::path::Path;

pub const DEFAULT_MAP_FILE: &str = "flight_route.html";

const LEAFLET_VERSION: &str = "1.9.4";
const ZOOM: u8 = 4;

/// First departure and last arrival airport of the offer's first itinerary.
pub fn route_endpoints(offer: &OfferRecord) -> Option<(&str, &str)> {
    let segments = &offer.itineraries.first()?.segments;
    let departure = segments.first()?.departure.iata_code.as_str();
    let arrival = segments.last()?.arrival.iata_code.as_str();
    Some((departure, arrival))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteMap {
    pub departure: String,
    pub departure_coords: Coordinates,
    pub arrival: String,
    pub arrival_coords: Coordinates,
}

impl RouteMap {
    pub fn new(
        departure: &str,
        departure_coords: Coordinates,
        arrival: &str,
        arrival_coords: Coordinates,
    ) -> Self {
        Self {
            departure: departure.to_string(),
            departure_coords,
            arrival: arrival.to_string(),
            arrival_coords,
        }
    }

    pub fn center(&self) -> Coordinates {
        self.departure_coords.midpoint(&self.arrival_coords)
    }

    pub fn to_html(&self) -> String {
        let center = self.center();
        let (from, to) = (self.departure_coords, self.arrival_coords);
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Flight route {dep} - {arr}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
  <script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
  <style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
  <div id="map"></div>
  <script>
    var map = L.map('map').setView([{center_lat}, {center_lon}], {zoom});
    L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
      attribution: '&copy; OpenStreetMap contributors'
    }}).addTo(map);
    L.marker([{from_lat}, {from_lon}]).addTo(map).bindPopup('Departure: {dep}');
    L.marker([{to_lat}, {to_lon}]).addTo(map).bindPopup('Arrival: {arr}');
    L.polyline([[{from_lat}, {from_lon}], [{to_lat}, {to_lon}]], {{color: 'blue', weight: 2.5}}).addTo(map);
  </script>
</body>
</html>
"#,
            dep = self.departure,
            arr = self.arrival,
            version = LEAFLET_VERSION,
            center_lat = center.lat,
            center_lon = center.lon,
            zoom = ZOOM,
            from_lat = from.lat,
            from_lon = from.lon,
            to_lat = to.lat,
            to_lon = to.lon,
        )
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        tokio::fs::write(path, self.to_html()).await?;
        tracing::info!(path = %path.display(), "Route map written");
        Ok(())
    }
}
