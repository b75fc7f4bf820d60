pub mod assistant_config;
pub mod audio_settings;
pub mod configuration;
pub mod error;
pub mod features;
pub mod logging;
pub mod registry;
pub mod synthesis_request;
pub mod voice_profile;
