//! Address geocoding against an external provider.
//!
//! Two independent calls live here. The geocode call turns a free-text
//! address into coordinates and its failure aborts the delivery webhook.
//! The forward lookup returns candidate places used only as a plausibility
//! signal, so its failures degrade to an empty candidate list.

use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use tadka_core::Coordinates;

use crate::config::GeocoderConfig;

/// Errors from the geocoding provider.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Transport-level failure talking to the provider.
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered but could not resolve the address.
    #[error("geocoding failed with status {0}")]
    Failed(String),
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// A forward-lookup candidate. The provider returns coordinates as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressHit {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

/// Client for the geocoding and forward-lookup endpoints.
#[derive(Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl Geocoder {
    /// Create a geocoder from the loaded configuration.
    #[must_use]
    pub fn new(config: GeocoderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Resolve a free-text address to coordinates.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError::Failed` when the provider status is not `OK`
    /// or the result list is empty, and `GeocodeError::Http` on transport
    /// failures.
    pub async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let response: GeocodeResponse = self
            .client
            .get(&self.config.geocode_base_url)
            .query(&[
                ("address", address),
                ("key", self.config.api_key.expose_secret()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" {
            return Err(GeocodeError::Failed(response.status));
        }

        response
            .results
            .first()
            .map(|r| Coordinates::new(r.geometry.location.lat, r.geometry.location.lng))
            .ok_or_else(|| GeocodeError::Failed("ZERO_RESULTS".to_owned()))
    }

    /// Forward-lookup candidates for an address string.
    ///
    /// Best effort only: any failure, including a missing lookup key, yields
    /// an empty list rather than an error.
    pub async fn lookup(&self, query: &str) -> Vec<AddressHit> {
        let Some(key) = self.config.location_api_key.as_ref() else {
            return Vec::new();
        };

        let result = self
            .client
            .get(&self.config.location_base_url)
            .query(&[
                ("key", key.expose_secret()),
                ("q", query),
                ("format", "json"),
            ])
            .send()
            .await;

        match result {
            Ok(response) => response.json().await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Address lookup returned unparseable body");
                Vec::new()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Address lookup request failed");
                Vec::new()
            }
        }
    }
}

/// True when any lookup candidate mentions both the postcode and the town.
///
/// A coarse signal. An empty candidate list counts as plausible so a lookup
/// outage never blocks checkout.
#[must_use]
pub fn is_plausible(hits: &[AddressHit], pincode: &str, town: &str) -> bool {
    if hits.is_empty() {
        return true;
    }
    let town_lower = town.to_lowercase();
    hits.iter().any(|hit| {
        let name = hit.display_name.to_lowercase();
        name.contains(pincode) && name.contains(&town_lower)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_response_parses_provider_shape() {
        let body = r#"{
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": 48.7758, "lng": 9.1829}}},
                {"geometry": {"location": {"lat": 48.0, "lng": 9.0}}}
            ]
        }"#;
        let parsed: GeocodeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.results.len(), 2);
        let first = &parsed.results[0].geometry.location;
        assert!((first.lat - 48.7758).abs() < f64::EPSILON);
        assert!((first.lng - 9.1829).abs() < f64::EPSILON);
    }

    #[test]
    fn test_geocode_response_tolerates_missing_results() {
        let body = r#"{"status": "ZERO_RESULTS"}"#;
        let parsed: GeocodeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "ZERO_RESULTS");
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn test_address_hit_parses_string_coordinates() {
        let body = r#"[
            {"lat": "48.7758", "lon": "9.1829", "display_name": "Königstraße, 70173 Stuttgart, Germany"}
        ]"#;
        let hits: Vec<AddressHit> = serde_json::from_str(body).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].lat, "48.7758");
    }

    #[test]
    fn test_plausible_when_candidate_matches() {
        let hits = vec![AddressHit {
            lat: "48.7758".to_owned(),
            lon: "9.1829".to_owned(),
            display_name: "Königstraße 12, 70173 Stuttgart, Germany".to_owned(),
        }];
        assert!(is_plausible(&hits, "70173", "Stuttgart"));
        assert!(!is_plausible(&hits, "70190", "Stuttgart"));
        assert!(!is_plausible(&hits, "70173", "Esslingen"));
    }

    #[test]
    fn test_empty_candidate_list_is_plausible() {
        assert!(is_plausible(&[], "70173", "Stuttgart"));
    }
}
