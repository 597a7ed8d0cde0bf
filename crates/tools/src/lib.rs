//! The Tool Registry (§4.1): a process-wide catalog of named callables with
//! JSON parameter schemas, plus the built-in tools themselves.
//!
//! Every built-in tool returns a plain `String`: success text or a
//! human-readable error beginning with a stable tag. Tools never throw
//! across the registry boundary — network errors, timeouts, and non-2xx
//! responses are rendered into the return string so the agentic tool loop
//! sees them as ordinary tool output.

mod bootstrap;
mod builtin;
mod registry;

pub use bootstrap::register_builtins;
pub use builtin::{
    search::{brave_search, serper_search},
    w3w::get_what3words_address,
    weather::{get_home_weather, get_pws_current_conditions, get_weather_forecast},
};
pub use registry::{RegisterError, ToolHandle, ToolRegistry};
