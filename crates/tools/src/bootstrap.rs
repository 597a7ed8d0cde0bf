//! Wires the built-in tools (§4.1) into a [`ToolRegistry`], gating each on
//! the credential it needs. Mirrors the registration pattern from the
//! source's tool setup: one `register` call per tool, a JSON parameter
//! schema where the tool takes arguments, and a closure that adapts the
//! typed builtin function to the registry's `Value`-in, `String`-out
//! contract. A tool whose credential is absent from `config` is simply
//! skipped — the registry ends up smaller, nothing fails.

use std::sync::Arc;

use config::Config;
use serde_json::{json, Value};

use crate::builtin::{search, w3w, weather};
use crate::registry::ToolRegistry;

fn arg_str(args: &Value, name: &str) -> String {
    args.get(name).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn arg_u32(args: &Value, name: &str, default: u32) -> u32 {
    args.get(name).and_then(Value::as_u64).map(|n| n as u32).unwrap_or(default)
}

fn arg_bool(args: &Value, name: &str, default: bool) -> bool {
    args.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Registers every built-in tool whose credential is present in `config`.
/// `client` is shared across tools; callers typically build one
/// `reqwest::Client` for the whole process.
pub fn register_builtins(registry: &mut ToolRegistry, config: &Config, client: reqwest::Client) {
    register_brave(registry, config, client.clone());
    register_serper(registry, config, client.clone());
    register_weather_forecast(registry, config, client.clone());
    register_home_weather(registry, config, client.clone());
    register_what3words(registry, config, client);
}

fn register_brave(registry: &mut ToolRegistry, config: &Config, client: reqwest::Client) {
    let Some(api_key) = config.tools.brave_api_key.clone() else {
        return;
    };
    let schema = json!({
        "type": "object",
        "properties": {
            "query": {"type": "string", "description": "The search query."},
            "num_results": {"type": "integer", "description": "Number of results to return.", "default": 5},
        },
        "required": ["query"],
    });
    registry.register_replacing(
        "brave_search",
        "Search the web using the Brave Search API.",
        schema,
        Arc::new(move |args: Value| {
            let client = client.clone();
            let api_key = api_key.clone();
            Box::pin(async move {
                let query = arg_str(&args, "query");
                let num_results = arg_u32(&args, "num_results", 5);
                search::brave_search(&client, &api_key, &query, num_results).await
            })
        }),
    );
}

fn register_serper(registry: &mut ToolRegistry, config: &Config, client: reqwest::Client) {
    let Some(api_key) = config.tools.serper_api_key.clone() else {
        return;
    };
    let schema = json!({
        "type": "object",
        "properties": {
            "query": {"type": "string", "description": "The search query."},
            "num_results": {"type": "integer", "description": "Number of results to return.", "default": 5},
        },
        "required": ["query"],
    });
    registry.register_replacing(
        "serper_search",
        "Search Google via Serper.dev.",
        schema,
        Arc::new(move |args: Value| {
            let client = client.clone();
            let api_key = api_key.clone();
            Box::pin(async move {
                let query = arg_str(&args, "query");
                let num_results = arg_u32(&args, "num_results", 5);
                search::serper_search(&client, &api_key, &query, num_results).await
            })
        }),
    );
}

fn register_weather_forecast(registry: &mut ToolRegistry, config: &Config, client: reqwest::Client) {
    let Some(api_key) = config.tools.openweather_api_key.clone() else {
        return;
    };
    let schema = json!({
        "type": "object",
        "properties": {
            "location": {"type": "string", "description": "City name, optionally with state/country."},
            "days": {"type": "integer", "description": "Number of forecast days.", "default": 3},
        },
        "required": ["location"],
    });
    registry.register_replacing(
        "get_weather_forecast",
        "Get the weather forecast for a location.",
        schema,
        Arc::new(move |args: Value| {
            let client = client.clone();
            let api_key = api_key.clone();
            Box::pin(async move {
                let location = arg_str(&args, "location");
                let days = arg_u32(&args, "days", 3);
                weather::get_weather_forecast(&client, &api_key, &location, days).await
            })
        }),
    );
}

fn register_home_weather(registry: &mut ToolRegistry, config: &Config, client: reqwest::Client) {
    let (Some(access_token), Some(station_id)) = (config.tools.weatherflow_access_token.clone(), config.tools.weatherflow_station_id.clone()) else {
        return;
    };
    let api_endpoint = config.tools.weatherflow_api_endpoint.clone();

    registry.register_replacing(
        "get_pws_current_conditions",
        "Get current conditions from the home personal weather station.",
        json!({"type": "object", "properties": {}}),
        {
            let client = client.clone();
            let access_token = access_token.clone();
            let station_id = station_id.clone();
            let api_endpoint = api_endpoint.clone();
            Arc::new(move |_args: Value| {
                let client = client.clone();
                let access_token = access_token.clone();
                let station_id = station_id.clone();
                let api_endpoint = api_endpoint.clone();
                Box::pin(async move { weather::get_pws_current_conditions(&client, &access_token, &station_id, &api_endpoint).await })
            })
        },
    );

    let schema = json!({
        "type": "object",
        "properties": {
            "include_forecast": {"type": "boolean", "description": "Include a 10-day forecast.", "default": false},
        },
    });
    registry.register_replacing(
        "get_home_weather",
        "Get current conditions, and optionally a forecast, from the home personal weather station.",
        schema,
        Arc::new(move |args: Value| {
            let client = client.clone();
            let access_token = access_token.clone();
            let station_id = station_id.clone();
            let api_endpoint = api_endpoint.clone();
            Box::pin(async move {
                let include_forecast = arg_bool(&args, "include_forecast", false);
                weather::get_home_weather(&client, &access_token, &station_id, &api_endpoint, include_forecast).await
            })
        }),
    );
}

fn register_what3words(registry: &mut ToolRegistry, config: &Config, client: reqwest::Client) {
    // Unlike the other tools, what3words degrades to a coordinates fallback
    // rather than needing its key to function at all (§4.1), so it registers
    // unconditionally.
    let api_key = config.tools.what3words_api_key.clone();
    let schema = json!({
        "type": "object",
        "properties": {
            "address": {"type": "string", "description": "A street address or place name to convert."},
        },
        "required": ["address"],
    });
    registry.register_replacing(
        "get_what3words_address",
        "Convert a street address to its what3words three-word address.",
        schema,
        Arc::new(move |args: Value| {
            let client = client.clone();
            let api_key = api_key.clone();
            Box::pin(async move {
                let address = arg_str(&args, "address");
                w3w::get_what3words_address(&client, api_key.as_ref(), &address).await
            })
        }),
    );
}
