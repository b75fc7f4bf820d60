use serde::{Deserialize, Serialize};

/// Toggles read by the components that perform speech output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Synthesize through the remote TTS endpoint
    pub use_remote_tts: bool,
    /// Use local speech output when the remote call fails
    pub fallback_to_local_tts: bool,
    pub enable_voice_controls: bool,
    pub debug_mode: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            use_remote_tts: true,
            fallback_to_local_tts: true,
            enable_voice_controls: true,
            debug_mode: true,
        }
    }
}
