use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Builds the ordered list of location spellings to retry: the location as
/// given, then with a country/state suffix appended, so a bare city name
/// still resolves against OpenWeatherMap's strict geocoder.
fn location_variants(location: &str) -> Vec<String> {
    let mut variants = vec![location.to_string()];
    if !location.contains(',') {
        variants.push(format!("{location},US"));
        variants.push(format!("{location},NY,US"));
    }
    variants
}

/// `get_weather_forecast(location, days)` — §4.1. Tries a small ordered list
/// of location spellings before giving up.
pub async fn get_weather_forecast(client: &reqwest::Client, api_key: &SecretString, location: &str, days: u32) -> String {
    let mut last_error = None;
    for variant in location_variants(location) {
        match fetch_current(client, api_key, &variant).await {
            Ok(current) => return render_forecast(client, api_key, &current, days).await,
            Err(error) => last_error = Some(error),
        }
    }
    last_error.unwrap_or_else(|| format!("Could not find location: {location}."))
}

async fn fetch_current(client: &reqwest::Client, api_key: &SecretString, location: &str) -> Result<Value, String> {
    let response = client
        .get(CURRENT_WEATHER_URL)
        .query(&[
            ("q", location),
            ("appid", api_key.expose_secret()),
            ("units", "imperial"),
        ])
        .send()
        .await
        .map_err(|error| format!("Sorry, I couldn't fetch the weather information: {error}"))?;

    if !response.status().is_success() {
        return Err(format!(
            "Could not find location: {location}. Please try a different format (e.g., 'City,Country')."
        ));
    }
    response
        .json()
        .await
        .map_err(|error| format!("Error parsing weather data: {error}"))
}

async fn render_forecast(client: &reqwest::Client, api_key: &SecretString, current: &Value, days: u32) -> String {
    let Some(lat) = current["coord"]["lat"].as_f64() else {
        return "Error parsing weather data. Please try a different location format.".to_string();
    };
    let lon = current["coord"]["lon"].as_f64().unwrap_or_default();
    let city_name = current["name"].as_str().unwrap_or("unknown");
    let country = current["sys"]["country"].as_str().unwrap_or("");

    let forecast = client
        .get(FORECAST_URL)
        .query(&[
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("appid", api_key.expose_secret().to_string()),
            ("units", "imperial".to_string()),
        ])
        .send()
        .await
        .ok()
        .and_then(|response| response.error_for_status().ok());
    let forecast_body: Option<Value> = match forecast {
        Some(response) => response.json().await.ok(),
        None => None,
    };

    let temp = current["main"]["temp"].as_f64().unwrap_or_default().round();
    let feels_like = current["main"]["feels_like"].as_f64().unwrap_or_default().round();
    let humidity = current["main"]["humidity"].as_u64().unwrap_or_default();
    let description = current["weather"][0]["description"].as_str().unwrap_or("");
    let wind = current["wind"]["speed"].as_f64().unwrap_or_default().round();

    let mut lines = vec![
        format!("Weather for {city_name}, {country}:"),
        format!("Current: {temp}°F (feels like {feels_like}°F)"),
        format!("{description}, Humidity: {humidity}%, Wind: {wind} mph"),
        String::new(),
    ];

    if let Some(body) = forecast_body {
        lines.push("Forecast:".to_string());
        for day in summarize_daily(&body, days) {
            lines.push(day);
        }
    }

    lines.join("\n")
}

fn summarize_daily(forecast_body: &Value, days: u32) -> Vec<String> {
    use std::collections::BTreeMap;

    let mut by_date: BTreeMap<String, (Vec<f64>, Vec<String>)> = BTreeMap::new();
    for item in forecast_body["list"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .take(days as usize * 8)
    {
        let Some(dt_txt) = item["dt_txt"].as_str() else { continue };
        let Some(date) = dt_txt.split(' ').next() else { continue };
        let entry = by_date.entry(date.to_string()).or_default();
        if let Some(temp) = item["main"]["temp"].as_f64() {
            entry.0.push(temp);
        }
        if let Some(condition) = item["weather"][0]["description"].as_str() {
            entry.1.push(condition.to_string());
        }
    }

    by_date
        .into_iter()
        .take(days as usize)
        .filter_map(|(date, (temps, conditions))| {
            if temps.is_empty() {
                return None;
            }
            let high = temps.iter().cloned().fold(f64::MIN, f64::max).round();
            let low = temps.iter().cloned().fold(f64::MAX, f64::min).round();
            let most_common = most_common_condition(&conditions);
            let umbrella = if ["rain", "shower", "drizzle"]
                .iter()
                .any(|term| most_common.to_lowercase().contains(term))
            {
                " (umbrella recommended)"
            } else {
                ""
            };
            Some(format!("{date}: {high}°F/{low}°F, {most_common}{umbrella}"))
        })
        .collect()
}

fn most_common_condition(conditions: &[String]) -> String {
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for condition in conditions {
        *counts.entry(condition.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(condition, _)| condition.to_string())
        .unwrap_or_default()
}

/// `get_pws_current_conditions()` — §4.1, current conditions only.
pub async fn get_pws_current_conditions(
    client: &reqwest::Client,
    access_token: &SecretString,
    station_id: &str,
    api_endpoint: &str,
) -> String {
    pws_observations(client, access_token, station_id, api_endpoint, false).await
}

/// `get_home_weather(include_forecast)` — §4.1, current conditions plus an
/// optional 10-day forecast pulled from the station's own endpoint.
pub async fn get_home_weather(
    client: &reqwest::Client,
    access_token: &SecretString,
    station_id: &str,
    api_endpoint: &str,
    include_forecast: bool,
) -> String {
    pws_observations(client, access_token, station_id, api_endpoint, include_forecast).await
}

async fn pws_observations(
    client: &reqwest::Client,
    access_token: &SecretString,
    station_id: &str,
    api_endpoint: &str,
    include_forecast: bool,
) -> String {
    let obs_url = format!("{api_endpoint}/observations/station/{station_id}");
    let response = client
        .get(&obs_url)
        .query(&[("token", access_token.expose_secret())])
        .send()
        .await;
    let response = match response {
        Ok(response) => response,
        Err(error) => return format!("Sorry, I couldn't connect to your home weather station: {error}"),
    };
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let truncated: String = body.chars().take(200).collect();
        return format!("WeatherFlow API error {status}: {truncated}");
    }
    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(error) => return format!("Error parsing data from your home weather station: {error}"),
    };
    let Some(obs) = body["obs"].as_array().and_then(|obs| obs.first()) else {
        return "No recent observations available from your home weather station.".to_string();
    };

    let mut lines = vec!["Home Weather Station:".to_string()];
    if let Some(temp_c) = obs.get(7).and_then(Value::as_f64) {
        let temp_f = ((temp_c * 9.0 / 5.0) + 32.0).round();
        lines.push(format!("Temperature: {temp_f}°F ({temp_c:.1}°C)"));
    }
    if let Some(humidity) = obs.get(8).and_then(Value::as_f64) {
        lines.push(format!("Humidity: {humidity}%"));
    }
    if let Some(wind_avg) = obs.get(2).and_then(Value::as_f64) {
        let direction = obs.get(4).and_then(Value::as_f64).map(wind_dir_to_compass).unwrap_or_default();
        lines.push(format!("Wind: {wind_avg:.1} mph from {direction}"));
        if let Some(gust) = obs.get(3).and_then(Value::as_f64)
            && gust > wind_avg
        {
            lines.push(format!("Wind Gusts: {gust:.1} mph"));
        }
    }
    if let Some(pressure_mb) = obs.get(6).and_then(Value::as_f64) {
        let pressure_inhg = pressure_mb * 0.02953;
        lines.push(format!("Pressure: {pressure_mb:.1} mb ({pressure_inhg:.2} inHg)"));
    }
    if let Some(uv) = obs.get(10).and_then(Value::as_f64) {
        lines.push(format!("UV Index: {uv:.1}{}", uv_description(uv)));
    }

    if include_forecast {
        lines.push(String::new());
        lines.push(fetch_station_forecast(client, access_token, station_id, api_endpoint).await);
    }

    lines.join("\n")
}

async fn fetch_station_forecast(
    client: &reqwest::Client,
    access_token: &SecretString,
    station_id: &str,
    api_endpoint: &str,
) -> String {
    let station_url = format!("{api_endpoint}/stations/{station_id}");
    let response = client
        .get(&station_url)
        .query(&[("token", access_token.expose_secret())])
        .send()
        .await;
    let Ok(response) = response else {
        return "(Forecast unavailable)".to_string();
    };
    let Ok(body) = response.json::<Value>().await else {
        return "(Forecast unavailable)".to_string();
    };
    let Some(daily) = body["forecast"]["daily"].as_array() else {
        return "(Forecast unavailable)".to_string();
    };

    let mut lines = vec!["10-Day Forecast:".to_string()];
    for day in daily.iter().take(5) {
        let high = day["air_temp_high"].as_f64().unwrap_or_default().round();
        let low = day["air_temp_low"].as_f64().unwrap_or_default().round();
        let conditions = day["conditions"].as_str().unwrap_or("Unknown");
        let rain = if day["precip_probability"].as_f64().unwrap_or_default() > 30.0 {
            " (rain likely)"
        } else {
            ""
        };
        lines.push(format!("{high}°F/{low}°F, {conditions}{rain}"));
    }
    lines.join("\n")
}

fn wind_dir_to_compass(degrees: f64) -> String {
    const DIRECTIONS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
    ];
    let index = ((degrees / 22.5).round() as i64).rem_euclid(16) as usize;
    DIRECTIONS[index].to_string()
}

fn uv_description(uv: f64) -> &'static str {
    if uv <= 2.0 {
        " (Low)"
    } else if uv <= 5.0 {
        " (Moderate)"
    } else if uv <= 7.0 {
        " (High)"
    } else if uv <= 10.0 {
        " (Very High)"
    } else {
        " (Extreme)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_variants_adds_country_suffix_when_bare() {
        let variants = location_variants("Springfield");
        assert_eq!(variants, vec!["Springfield", "Springfield,US", "Springfield,NY,US"]);
    }

    #[test]
    fn location_variants_leaves_qualified_location_alone() {
        assert_eq!(location_variants("London,UK"), vec!["London,UK".to_string()]);
    }

    #[test]
    fn wind_direction_wraps_compass_points() {
        assert_eq!(wind_dir_to_compass(0.0), "N");
        assert_eq!(wind_dir_to_compass(350.0), "N");
        assert_eq!(wind_dir_to_compass(180.0), "S");
    }

    #[test]
    fn uv_description_buckets_are_ordered() {
        assert_eq!(uv_description(1.0), " (Low)");
        assert_eq!(uv_description(11.0), " (Extreme)");
    }
}
