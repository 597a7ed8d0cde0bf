use serde::{Deserialize, Serialize};

/// Measurement units the user prefers in rendered tool output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitPreference {
    Metric,
    #[default]
    Imperial,
}

/// Per-field opt-in for inclusion in the system-prompt user-context block
/// (§4.5 "System prompt enhancement"). A field absent here, or set `false`,
/// is never surfaced to a provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PrivacyFlags {
    pub share_name: bool,
    pub share_location: bool,
    pub share_coordinates: bool,
    pub share_what3words: bool,
    pub share_timezone: bool,
    pub share_personal_station: bool,
    pub share_personality: bool,
}

/// Singleton per-user profile (§3), read at turn start and never written by
/// the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub home_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub what3words: Option<String>,
    pub timezone: Option<String>,
    pub personal_station_id: Option<String>,
    pub unit_preference: UnitPreference,
    pub personality_hint: Option<String>,
    pub privacy: PrivacyFlags,
}

impl UserProfile {
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}
