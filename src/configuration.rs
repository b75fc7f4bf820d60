use crate::{
    assistant_config::AssistantConfig,
    audio_settings::AudioSettings,
    error::{Result, TrainerVoiceError},
    features::FeatureFlags,
    voice_profile::{is_persona_id, is_region_language_code, PersonaId, VoiceProfile},
};
use config::{builder::DefaultState, ConfigBuilder, Environment};
use secrecy::Secret;
use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf};
use tracing::*;

pub const DEFAULT_TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

const ENV_PREFIX: &str = "APP";

/// Use default config if no path is provided
pub fn get_configuration(config: Option<PathBuf>) -> Result<AppConfig> {
    let settings = config::Config::builder();

    let settings = if let Some(config) = config {
        info!("Using configuration from {:?}", config);
        settings.add_source(config::File::from(config))
    } else {
        info!("Using default configuration");
        settings
            .add_source(config::File::with_name("configuration/settings"))
            .add_source(config::File::with_name("configuration/dev_settings").required(false))
    };

    load_configuration(settings, environment())
}

fn environment() -> Environment {
    // APP_TTS__API_KEY -> tts.api_key
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn load_configuration(
    settings: ConfigBuilder<DefaultState>,
    environment: Environment,
) -> Result<AppConfig> {
    let app_config: AppConfig = settings
        .add_source(environment)
        .build()?
        .try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub tts: TtsConfig,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub features: FeatureFlags,
    /// Merged over the built in persona voices.
    ///
    /// A list rather than a map because config lowercases map keys.
    #[serde(default)]
    pub voices: Vec<ConfiguredVoice>,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        for voice in &self.voices {
            if !is_persona_id(&voice.persona) {
                return Err(TrainerVoiceError::InvalidPersonaId {
                    persona: voice.persona.clone(),
                });
            }
            if !is_region_language_code(&voice.language_code) {
                return Err(TrainerVoiceError::InvalidLanguageCode {
                    persona: voice.persona.clone(),
                    language_code: voice.language_code.clone(),
                });
            }
        }
        Ok(())
    }

    /// Configured voices keyed by persona, later entries win
    pub fn voice_profiles(&self) -> HashMap<PersonaId, VoiceProfile> {
        self.voices
            .iter()
            .map(|voice| (voice.persona.clone(), voice.profile()))
            .collect()
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredVoice {
    pub persona: PersonaId,
    pub voice_name: String,
    pub language_code: String,
    #[serde(default)]
    pub description: String,
}

impl ConfiguredVoice {
    pub fn profile(&self) -> VoiceProfile {
        VoiceProfile::new(&self.voice_name, &self.language_code, &self.description)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct TtsConfig {
    pub api_key: Secret<String>,
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,
}

fn default_tts_endpoint() -> String {
    String::from(DEFAULT_TTS_ENDPOINT)
}
