use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrainerVoiceError>;

#[derive(Error, Debug)]
pub enum TrainerVoiceError {
    #[error("configuration error")]
    ConfigError(#[from] config::ConfigError),
    #[error("{field} value {value} is outside of range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("persona id {persona:?} must be lowercase snake_case")]
    InvalidPersonaId { persona: String },
    #[error("voice for persona {persona} has invalid language code {language_code:?}")]
    InvalidLanguageCode {
        persona: String,
        language_code: String,
    },
    #[error("serialisation error")]
    SerializationError(#[from] serde_json::Error),
}
