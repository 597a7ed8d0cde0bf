use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const W3W_CONVERT_URL: &str = "https://api.what3words.com/v3/convert-to-3wa";

/// `get_what3words_address(address)` — §4.1. Geocodes the address, then
/// converts the coordinates to a three-word address. Falls back to the raw
/// coordinates plus a map URL if the What3Words key is absent or the API
/// reports a quota error.
pub async fn get_what3words_address(client: &reqwest::Client, api_key: Option<&SecretString>, address: &str) -> String {
    let (lat, lon) = match geocode(client, address).await {
        Ok(coords) => coords,
        Err(error) => return error,
    };

    let Some(api_key) = api_key else {
        return coordinates_fallback(address, lat, lon);
    };

    let response = client
        .get(W3W_CONVERT_URL)
        .query(&[
            ("coordinates", format!("{lat},{lon}")),
            ("key", api_key.expose_secret().to_string()),
        ])
        .send()
        .await;

    let response = match response {
        Ok(response) => response,
        Err(_) => return coordinates_fallback(address, lat, lon),
    };

    if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS || response.status() == reqwest::StatusCode::FORBIDDEN {
        return coordinates_fallback(address, lat, lon);
    }
    if !response.status().is_success() {
        return coordinates_fallback(address, lat, lon);
    }

    match response.json::<Value>().await {
        Ok(body) => match body["words"].as_str() {
            Some(words) => format!("{address} is at ///{words} ({lat:.5}, {lon:.5})"),
            None => coordinates_fallback(address, lat, lon),
        },
        Err(_) => coordinates_fallback(address, lat, lon),
    }
}

async fn geocode(client: &reqwest::Client, address: &str) -> Result<(f64, f64), String> {
    let response = client
        .get(NOMINATIM_URL)
        .query(&[("q", address), ("format", "json"), ("limit", "1")])
        .header("User-Agent", "request-orchestration-core/1.0")
        .send()
        .await
        .map_err(|error| format!("Could not find location: {address}. ({error})"))?;

    if !response.status().is_success() {
        return Err(format!("Could not find location: {address}."));
    }
    let body: Value = response
        .json()
        .await
        .map_err(|error| format!("Could not parse geocoding response: {error}"))?;
    let entry = body
        .as_array()
        .and_then(|entries| entries.first())
        .ok_or_else(|| format!("Could not find location: {address}. Please be more specific."))?;

    let lat = entry["lat"].as_str().and_then(|v| v.parse().ok()).unwrap_or_default();
    let lon = entry["lon"].as_str().and_then(|v| v.parse().ok()).unwrap_or_default();
    Ok((lat, lon))
}

fn coordinates_fallback(address: &str, lat: f64, lon: f64) -> String {
    format!(
        "{address} is at ({lat:.5}, {lon:.5}). Map: https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map=16/{lat}/{lon}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_fallback_includes_a_map_url() {
        let result = coordinates_fallback("Eiffel Tower", 48.8584, 2.2945);
        assert!(result.contains("openstreetmap.org"));
        assert!(result.contains("48.85840"));
    }
}
