//! Nominatim reverse-geocoding endpoint.

use crate::{GeocodeError, ReverseGeocodedPlace};

/// Reverse-geocodes a coordinate pair into a place name.
///
/// Returns `Ok(None)` when Nominatim has no settlement for the
/// position (open water, unnamed areas). The caller is responsible for
/// rate limiting (1 request per second for the public instance).
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing
/// fails.
pub async fn reverse(
    client: &reqwest::Client,
    base_url: &str,
    latitude: f64,
    longitude: f64,
) -> Result<Option<ReverseGeocodedPlace>, GeocodeError> {
    let lat = latitude.to_string();
    let lon = longitude.to_string();
    let resp = client
        .get(format!("{}/reverse", base_url.trim_end_matches('/')))
        .query(&[
            ("format", "jsonv2"),
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
        ])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    let place = parse_response(&body);
    log::debug!(
        "Reverse geocoded ({latitude}, {longitude}) to {:?}",
        place.as_ref().map(|p| p.place_name.as_str())
    );
    Ok(place)
}

/// Parses a Nominatim reverse-geocoding response.
///
/// The settlement name lives under `address.city`, `address.town`, or
/// `address.village` depending on the place class; they are tried in
/// that order.
fn parse_response(body: &serde_json::Value) -> Option<ReverseGeocodedPlace> {
    let address = body.get("address")?;

    let place_name = ["city", "town", "village"]
        .iter()
        .find_map(|key| address[*key].as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let display_name = body["display_name"].as_str().map(String::from);

    Some(ReverseGeocodedPlace {
        place_name,
        display_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_city_result() {
        let body = serde_json::json!({
            "display_name": "Campinas, São Paulo, Brasil",
            "address": {"city": "Campinas", "state": "São Paulo"}
        });
        let place = parse_response(&body).unwrap();
        assert_eq!(place.place_name, "Campinas");
        assert_eq!(
            place.display_name.as_deref(),
            Some("Campinas, São Paulo, Brasil")
        );
    }

    #[test]
    fn falls_back_to_town_then_village() {
        let body = serde_json::json!({"address": {"town": "Holambra"}});
        assert_eq!(parse_response(&body).unwrap().place_name, "Holambra");

        let body = serde_json::json!({"address": {"village": "Joanópolis"}});
        assert_eq!(parse_response(&body).unwrap().place_name, "Joanópolis");
    }

    #[test]
    fn missing_settlement_yields_none() {
        let body = serde_json::json!({"address": {"state": "São Paulo"}});
        assert!(parse_response(&body).is_none());

        let body = serde_json::json!({"error": "Unable to geocode"});
        assert!(parse_response(&body).is_none());
    }
}
