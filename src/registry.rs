//! Process wide voice configuration.
//!
//! [`ConfigurationRegistry`] is built once at startup and handed to whatever
//! needs to know which voice, endpoint or feature flags to use. The API key is
//! the only field that can change after construction.
//!
//! For hosts serving several sessions from multiple threads, wrap it in a
//! [`SharedRegistry`].

use crate::{
    audio_settings::AudioSettings,
    configuration::{AppConfig, DEFAULT_TTS_ENDPOINT},
    error::Result,
    features::FeatureFlags,
    synthesis_request::SynthesisRequest,
    voice_profile::{default_voice_profiles, PersonaId, VoiceProfile, FALLBACK_PERSONA},
};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::*;

/// Placeholder key shipped in the default settings
pub const DEFAULT_TTS_API_KEY: &str = "YOUR_GOOGLE_TTS_API_KEY";

const FINGERPRINT_LENGTH: usize = 8;

#[derive(Debug, Clone)]
pub struct ConfigurationRegistry {
    tts_api_key: Secret<String>,
    tts_endpoint: String,
    voice_profiles: HashMap<PersonaId, VoiceProfile>,
    audio_settings: AudioSettings,
    features: FeatureFlags,
}

impl ConfigurationRegistry {
    /// Registry with the built in voices, endpoint, audio settings and flags
    pub fn new(tts_api_key: impl Into<String>) -> Self {
        Self {
            tts_api_key: Secret::new(tts_api_key.into()),
            tts_endpoint: String::from(DEFAULT_TTS_ENDPOINT),
            voice_profiles: default_voice_profiles(),
            audio_settings: AudioSettings::default(),
            features: FeatureFlags::default(),
        }
    }

    /// Registry from loaded settings. Configured voices replace or extend the built in ones.
    ///
    /// The settings are validated again since `AppConfig` can be built by hand.
    pub fn from_app_config(app_config: &AppConfig) -> Result<Self> {
        app_config.validate()?;
        let mut voice_profiles = default_voice_profiles();
        voice_profiles.extend(app_config.voice_profiles());
        Ok(Self {
            tts_api_key: app_config.tts.api_key.clone(),
            tts_endpoint: app_config.tts.endpoint.clone(),
            voice_profiles,
            audio_settings: app_config.audio,
            features: app_config.features,
        })
    }

    pub fn tts_api_key(&self) -> &Secret<String> {
        &self.tts_api_key
    }

    pub fn tts_endpoint(&self) -> &str {
        &self.tts_endpoint
    }

    pub fn voice_profiles(&self) -> &HashMap<PersonaId, VoiceProfile> {
        &self.voice_profiles
    }

    pub fn audio_settings(&self) -> &AudioSettings {
        &self.audio_settings
    }

    pub fn features(&self) -> &FeatureFlags {
        &self.features
    }

    /// Replaces the API key. Any value is accepted, including an empty one.
    ///
    /// Consumers holding a copy of the old key are not notified.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.tts_api_key = Secret::new(api_key.into());
        info!("API key updated");
    }

    /// Returns `None` for unknown personas. The fallback voice is never substituted here.
    pub fn lookup_voice_profile(&self, persona_id: &str) -> Option<&VoiceProfile> {
        self.voice_profiles.get(persona_id)
    }

    /// Lookup for callers that want the `custom_character` voice on a miss
    pub fn lookup_voice_profile_or_fallback(&self, persona_id: &str) -> Option<&VoiceProfile> {
        self.lookup_voice_profile(persona_id).or_else(|| {
            debug!("No voice for persona {}, using fallback", persona_id);
            self.voice_profiles.get(FALLBACK_PERSONA)
        })
    }

    pub fn persona_ids(&self) -> Vec<&str> {
        let mut persona_ids: Vec<&str> = self.voice_profiles.keys().map(String::as_str).collect();
        persona_ids.sort_unstable();
        persona_ids
    }

    pub fn is_default_api_key(&self) -> bool {
        self.tts_api_key.expose_secret() == DEFAULT_TTS_API_KEY
    }

    /// Endpoint with the key passed as the `key` query parameter
    pub fn synthesis_url(&self) -> String {
        format!(
            "{}?key={}",
            self.tts_endpoint,
            self.tts_api_key.expose_secret()
        )
    }

    /// Request body for speaking `text` in the voice of `persona_id`
    pub fn synthesis_request(&self, persona_id: &str, text: &str) -> Option<SynthesisRequest> {
        self.lookup_voice_profile(persona_id)
            .map(|profile| SynthesisRequest::new(text, profile, &self.audio_settings))
    }

    pub fn debug_report(&self) -> DebugReport {
        DebugReport {
            tts_endpoint: self.tts_endpoint.clone(),
            api_key_configured: !self.is_default_api_key(),
            api_key_fingerprint: fingerprint(self.tts_api_key.expose_secret()),
            persona_ids: self.persona_ids().into_iter().map(String::from).collect(),
            voice_profiles: self
                .voice_profiles
                .iter()
                .map(|(persona, profile)| (persona.clone(), profile.clone()))
                .collect(),
            audio_settings: self.audio_settings,
            features: self.features,
        }
    }

    /// Logs the current configuration at info level. The API key is only logged as a fingerprint.
    pub fn debug_dump(&self) {
        let report = self.debug_report();
        info!(
            endpoint = %report.tts_endpoint,
            audio = ?report.audio_settings,
            features = ?report.features,
            "Configuration debug"
        );
        for line in report.voice_lines() {
            info!("{}", line);
        }
        info!("Available voices: {:?}", report.persona_ids);
        info!(
            "API key configured: {} (fingerprint {})",
            report.api_key_configured, report.api_key_fingerprint
        );
    }
}

impl Default for ConfigurationRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_TTS_API_KEY)
    }
}

impl PartialEq for ConfigurationRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.tts_api_key.expose_secret() == other.tts_api_key.expose_secret()
            && self.tts_endpoint == other.tts_endpoint
            && self.voice_profiles == other.voice_profiles
            && self.audio_settings == other.audio_settings
            && self.features == other.features
    }
}

fn fingerprint(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key);
    let hashed = format!("{:x}", hasher.finalize());
    hashed[..FINGERPRINT_LENGTH].to_owned()
}

/// Snapshot of the configuration safe to print
#[derive(Debug, Clone, Serialize)]
pub struct DebugReport {
    pub tts_endpoint: String,
    pub api_key_configured: bool,
    pub api_key_fingerprint: String,
    pub persona_ids: Vec<String>,
    pub voice_profiles: BTreeMap<PersonaId, VoiceProfile>,
    pub audio_settings: AudioSettings,
    pub features: FeatureFlags,
}

impl DebugReport {
    /// One line per persona, sorted by persona id
    pub fn voice_lines(&self) -> Vec<String> {
        self.voice_profiles
            .iter()
            .map(|(persona, profile)| {
                format!(
                    "Persona {} uses {} ({}) {}",
                    persona, profile.voice_name, profile.language_code, profile.description
                )
            })
            .collect()
    }
}

/// Registry handle that can be cloned across threads.
///
/// Readers get snapshots, so a key update never tears a read.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<ConfigurationRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: ConfigurationRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn get(&self) -> ConfigurationRegistry {
        self.read().clone()
    }

    pub fn set_api_key(&self, api_key: impl Into<String>) {
        self.write().set_api_key(api_key);
    }

    pub fn lookup_voice_profile(&self, persona_id: &str) -> Option<VoiceProfile> {
        self.read().lookup_voice_profile(persona_id).cloned()
    }

    pub fn debug_dump(&self) {
        self.read().debug_dump();
    }

    // a panicking writer can't leave the registry half updated
    fn read(&self) -> RwLockReadGuard<'_, ConfigurationRegistry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigurationRegistry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_settings::AudioEncoding;
    use crate::configuration::ConfiguredVoice;
    use crate::error::TrainerVoiceError;
    use crate::voice_profile::is_region_language_code;

    #[test]
    fn union_rep_uses_british_voice() {
        let registry = ConfigurationRegistry::default();
        let profile = registry.lookup_voice_profile("union_rep").unwrap();
        assert_eq!(profile.voice_name, "en-GB-Neural2-B");
        assert_eq!(profile.language_code, "en-GB");
    }

    #[test]
    fn every_persona_resolves_to_region_language_code() {
        let registry = ConfigurationRegistry::default();
        for persona in registry.persona_ids() {
            let profile = registry.lookup_voice_profile(persona).unwrap();
            assert!(is_region_language_code(&profile.language_code));
        }
    }

    #[test]
    fn unknown_persona_is_not_found() {
        let registry = ConfigurationRegistry::default();
        assert_eq!(registry.lookup_voice_profile("does_not_exist"), None);
    }

    #[test]
    fn fallback_lookup_is_opt_in() {
        let registry = ConfigurationRegistry::default();
        let profile = registry
            .lookup_voice_profile_or_fallback("does_not_exist")
            .unwrap();
        assert_eq!(profile.voice_name, "en-AU-Neural2-D");
        assert_eq!(
            registry
                .lookup_voice_profile_or_fallback("union_rep")
                .unwrap()
                .voice_name,
            "en-GB-Neural2-B"
        );
    }

    #[test]
    fn set_api_key_is_observed_and_idempotent() {
        let mut registry = ConfigurationRegistry::default();
        registry.set_api_key("NEWKEY123");
        assert_eq!(registry.tts_api_key().expose_secret(), "NEWKEY123");

        let snapshot = registry.clone();
        registry.set_api_key("NEWKEY123");
        assert_eq!(registry, snapshot);
    }

    #[test]
    fn empty_api_key_is_accepted() {
        let mut registry = ConfigurationRegistry::new("abc");
        registry.set_api_key("");
        assert_eq!(registry.tts_api_key().expose_secret(), "");
    }

    #[test]
    fn debug_dump_does_not_mutate() {
        let registry = ConfigurationRegistry::new("abc");
        let snapshot = registry.clone();
        registry.debug_dump();
        assert_eq!(registry, snapshot);
    }

    #[test]
    fn default_key_detection_uses_exact_default() {
        let mut registry = ConfigurationRegistry::default();
        assert!(registry.is_default_api_key());
        assert!(!registry.debug_report().api_key_configured);

        registry.set_api_key(format!("{}E", DEFAULT_TTS_API_KEY));
        assert!(!registry.is_default_api_key());
        assert!(registry.debug_report().api_key_configured);
    }

    #[test]
    fn from_app_config_rejects_invalid_voices() {
        let app_config: AppConfig = config::Config::builder()
            .set_override("tts.api_key", "abc")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        let registry = ConfigurationRegistry::from_app_config(&app_config).unwrap();
        assert_eq!(registry.tts_api_key().expose_secret(), "abc");

        let mut app_config = app_config;
        app_config.voices.push(ConfiguredVoice {
            persona: String::from("Mediator"),
            voice_name: String::from("en-US-Neural2-F"),
            language_code: String::from("en-US"),
            description: String::new(),
        });
        assert!(matches!(
            ConfigurationRegistry::from_app_config(&app_config),
            Err(TrainerVoiceError::InvalidPersonaId { .. })
        ));
    }

    #[test]
    fn debug_report_hides_the_key() {
        let registry = ConfigurationRegistry::new("super-secret-key");
        let report = registry.debug_report();
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("super-secret-key"));
        assert_eq!(report.api_key_fingerprint.len(), FINGERPRINT_LENGTH);
        assert_eq!(report.persona_ids.len(), 7);
        assert_eq!(report.persona_ids[0], "budget_director");
    }

    #[test]
    fn debug_dump_lists_every_voice() {
        let report = ConfigurationRegistry::default().debug_report();
        let lines = report.voice_lines();
        assert_eq!(lines.len(), 7);
        assert!(lines.contains(&String::from(
            "Persona union_rep uses en-GB-Neural2-B (en-GB) Assertive British Male"
        )));
    }

    #[test]
    fn default_audio_settings() {
        let registry = ConfigurationRegistry::default();
        let audio = registry.audio_settings();
        assert_eq!(audio.encoding(), AudioEncoding::Mp3);
        assert_eq!(audio.speaking_rate(), 1.0);
        assert_eq!(audio.pitch(), 0.0);
        assert_eq!(audio.volume_gain_db(), 0.0);
    }

    #[test]
    fn synthesis_url_carries_key() {
        let registry = ConfigurationRegistry::new("abc");
        assert_eq!(
            registry.synthesis_url(),
            "https://texttospeech.googleapis.com/v1/text:synthesize?key=abc"
        );
    }

    #[test]
    fn synthesis_request_for_unknown_persona() {
        let registry = ConfigurationRegistry::default();
        assert!(registry.synthesis_request("does_not_exist", "hi").is_none());
        assert!(registry.synthesis_request("union_rep", "hi").is_some());
    }

    #[test]
    fn shared_registry_sees_updates_from_other_threads() {
        let shared = SharedRegistry::default();
        let writer = shared.clone();
        std::thread::spawn(move || writer.set_api_key("NEWKEY123"))
            .join()
            .unwrap();
        assert_eq!(shared.get().tts_api_key().expose_secret(), "NEWKEY123");
        assert_eq!(
            shared.lookup_voice_profile("union_rep").unwrap().language_code,
            "en-GB"
        );
        assert!(shared.lookup_voice_profile("does_not_exist").is_none());
    }

    #[test]
    fn shared_snapshot_is_detached() {
        let shared = SharedRegistry::new(ConfigurationRegistry::new("old"));
        let snapshot = shared.get();
        shared.set_api_key("new");
        assert_eq!(snapshot.tts_api_key().expose_secret(), "old");
        assert_eq!(shared.get().tts_api_key().expose_secret(), "new");
    }
}
