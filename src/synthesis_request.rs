use crate::{
    audio_settings::{AudioEncoding, AudioSettings},
    error::Result,
    voice_profile::VoiceProfile,
};
use serde::Serialize;

/// Body of a `text:synthesize` call.
///
/// Only built here. Sending it is up to the speech output component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    pub input: TextInput,
    pub voice: VoiceSelection,
    pub audio_config: AudioConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelection {
    pub language_code: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: AudioEncoding,
    pub speaking_rate: f64,
    pub pitch: f64,
    pub volume_gain_db: f64,
}

impl From<&AudioSettings> for AudioConfig {
    fn from(settings: &AudioSettings) -> Self {
        Self {
            audio_encoding: settings.encoding(),
            speaking_rate: settings.speaking_rate(),
            pitch: settings.pitch(),
            volume_gain_db: settings.volume_gain_db(),
        }
    }
}

impl SynthesisRequest {
    pub fn new(text: &str, voice: &VoiceProfile, audio_settings: &AudioSettings) -> Self {
        Self {
            input: TextInput {
                text: text.to_owned(),
            },
            voice: VoiceSelection {
                language_code: voice.language_code.clone(),
                name: voice.voice_name.clone(),
            },
            audio_config: audio_settings.into(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
