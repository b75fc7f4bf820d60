use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a conversational persona, e.g. `union_rep`
pub type PersonaId = String;

/// Persona used by callers that choose to fall back on a lookup miss
pub const FALLBACK_PERSONA: &str = "custom_character";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub voice_name: String,
    pub language_code: String,
    #[serde(default)]
    pub description: String,
}

impl VoiceProfile {
    pub fn new(voice_name: &str, language_code: &str, description: &str) -> Self {
        Self {
            voice_name: voice_name.to_owned(),
            language_code: language_code.to_owned(),
            description: description.to_owned(),
        }
    }
}

/// Checks for a language tag of the form `xx-XX`
pub fn is_region_language_code(language_code: &str) -> bool {
    let bytes = language_code.as_bytes();
    bytes.len() == 5
        && bytes[..2].iter().all(u8::is_ascii_lowercase)
        && bytes[2] == b'-'
        && bytes[3..].iter().all(u8::is_ascii_uppercase)
}

/// Persona ids are lowercase snake_case, e.g. `union_rep`
pub fn is_persona_id(persona_id: &str) -> bool {
    persona_id
        .chars()
        .next()
        .map(|first| first.is_ascii_lowercase())
        .unwrap_or(false)
        && persona_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Voices for the DISC personalities
pub fn default_voice_profiles() -> HashMap<PersonaId, VoiceProfile> {
    [
        // Dominance
        (
            "infrastructure_engineer",
            VoiceProfile::new("en-AU-Neural2-B", "en-AU", "Confident Australian Male"),
        ),
        (
            "budget_director",
            VoiceProfile::new("en-AU-Neural2-B", "en-AU", "Direct Australian Male"),
        ),
        // Influence
        (
            "community_engagement",
            VoiceProfile::new("en-AU-Neural2-A", "en-AU", "Warm Australian Female"),
        ),
        (
            "strategic_planner",
            VoiceProfile::new("en-AU-Neural2-A", "en-AU", "Enthusiastic Australian Female"),
        ),
        // Steadiness
        (
            "councillor_thompson",
            VoiceProfile::new("en-AU-Neural2-C", "en-AU", "Patient Australian Female"),
        ),
        // Conscientiousness
        (
            "union_rep",
            VoiceProfile::new("en-GB-Neural2-B", "en-GB", "Assertive British Male"),
        ),
        (
            FALLBACK_PERSONA,
            VoiceProfile::new("en-AU-Neural2-D", "en-AU", "Professional Australian Voice"),
        ),
    ]
    .into_iter()
    .map(|(persona, profile)| (persona.to_owned(), profile))
    .collect()
}
