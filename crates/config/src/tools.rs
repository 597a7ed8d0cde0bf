use secrecy::SecretString;

use crate::{env, secret_opt};

/// Credentials for the built-in tools (§4.1) and search engines (§4.2).
#[derive(Debug, Clone, Default)]
pub struct ToolKeys {
    /// Brave Search API key.
    pub brave_api_key: Option<SecretString>,
    /// Serper.dev API key.
    pub serper_api_key: Option<SecretString>,
    /// OpenWeatherMap API key, used by `get_weather_forecast`.
    pub openweather_api_key: Option<SecretString>,
    /// Personal weather station (WeatherFlow Tempest-like) access token.
    pub weatherflow_access_token: Option<SecretString>,
    /// Personal weather station id.
    pub weatherflow_station_id: Option<String>,
    /// Personal weather station API base, overridable for testing.
    pub weatherflow_api_endpoint: String,
    /// What3Words API key.
    pub what3words_api_key: Option<SecretString>,
}

impl ToolKeys {
    pub(crate) fn from_env() -> Self {
        Self {
            brave_api_key: secret_opt("BRAVE_API_KEY"),
            serper_api_key: secret_opt("SERPER_API_KEY"),
            openweather_api_key: secret_opt("OPENWEATHER_API_KEY"),
            weatherflow_access_token: secret_opt("WEATHERFLOW_ACCESS_TOKEN"),
            weatherflow_station_id: env::var_opt("WEATHERFLOW_STATION_ID"),
            weatherflow_api_endpoint: env::var_opt("WEATHERFLOW_API_ENDPOINT")
                .unwrap_or_else(|| "https://swd.weatherflow.com/swd/rest".to_string()),
            what3words_api_key: secret_opt("WHATSTHREEWORDS_API_KEY"),
        }
    }
}
