use chrono::Utc;
use domain::UserProfile;

const VERBATIM_CLAUSE: &str = "When tool results are provided, use their numeric values verbatim; do not round or approximate them.";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Prefix a configured system prompt with a compact user-context block
/// derived from [`UserProfile`], honoring its privacy flags, and append the
/// fixed "use tool results verbatim" clause (§4.5).
///
/// If `base_prompt` is empty, a minimal default is synthesized first.
pub fn enhance_system_prompt(base_prompt: &str, profile: &UserProfile) -> String {
    let base = if base_prompt.trim().is_empty() {
        DEFAULT_SYSTEM_PROMPT
    } else {
        base_prompt
    };

    let mut lines = Vec::new();

    if profile.privacy.share_name
        && let Some(name) = &profile.display_name
    {
        lines.push(format!("You are assisting {name}."));
    }

    if profile.privacy.share_location
        && let Some(address) = &profile.home_address
    {
        lines.push(format!("User's home: {address}"));
    }

    if profile.privacy.share_coordinates && profile.has_coordinates() {
        lines.push(format!(
            "Home coordinates: {:.4}, {:.4}",
            profile.latitude.unwrap(),
            profile.longitude.unwrap()
        ));
    }

    if profile.privacy.share_what3words
        && let Some(w3w) = &profile.what3words
    {
        lines.push(format!("What3Words: {w3w}"));
    }

    if profile.privacy.share_timezone {
        if let Some(timezone) = &profile.timezone {
            lines.push(format!("User timezone: {timezone}"));
        }
        lines.push(format!("Current date/time (UTC): {}", Utc::now().format("%Y-%m-%d %I:%M %p UTC")));
    }

    if profile.privacy.share_personal_station
        && let Some(station_id) = &profile.personal_station_id
    {
        lines.push(format!("Personal weather station id: {station_id}."));
        lines.push(
            "When the user asks about 'home weather' or their personal weather station, use this station's data."
                .to_string(),
        );
    }

    lines.push(format!("Preferred units: {:?}", profile.unit_preference));

    if profile.privacy.share_personality
        && let Some(hint) = &profile.personality_hint
    {
        lines.push(format!("Communication style: {hint}"));
    }

    lines.push(VERBATIM_CLAUSE.to_string());

    format!("{base}\n\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::PrivacyFlags;

    #[test]
    fn privacy_flags_gate_each_field() {
        let profile = UserProfile {
            display_name: Some("Alex".to_string()),
            privacy: PrivacyFlags::default(),
            ..Default::default()
        };
        let enhanced = enhance_system_prompt("Base prompt", &profile);
        assert!(!enhanced.contains("Alex"));
        assert!(enhanced.contains("Base prompt"));
        assert!(enhanced.contains(VERBATIM_CLAUSE));
    }

    #[test]
    fn shared_name_is_surfaced() {
        let profile = UserProfile {
            display_name: Some("Alex".to_string()),
            privacy: PrivacyFlags {
                share_name: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let enhanced = enhance_system_prompt("", &profile);
        assert!(enhanced.contains("Alex"));
        assert!(enhanced.starts_with(DEFAULT_SYSTEM_PROMPT));
    }
}
