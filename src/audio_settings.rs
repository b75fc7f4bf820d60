use crate::error::{Result, TrainerVoiceError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SPEAKING_RATE_RANGE: (f64, f64) = (0.25, 4.0);
pub const PITCH_RANGE: (f64, f64) = (-20.0, 20.0);
pub const VOLUME_GAIN_DB_RANGE: (f64, f64) = (-96.0, 16.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    #[default]
    Mp3,
    Linear16,
    OggOpus,
    Mulaw,
    Alaw,
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AudioEncoding::Mp3 => "MP3",
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::OggOpus => "OGG_OPUS",
            AudioEncoding::Mulaw => "MULAW",
            AudioEncoding::Alaw => "ALAW",
        };
        f.write_str(name)
    }
}

/// Audio parameters sent with every synthesis request.
///
/// Values are range checked on construction, including when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAudioSettings")]
pub struct AudioSettings {
    encoding: AudioEncoding,
    speaking_rate: f64,
    pitch: f64,
    volume_gain_db: f64,
}

impl AudioSettings {
    pub fn new(
        encoding: AudioEncoding,
        speaking_rate: f64,
        pitch: f64,
        volume_gain_db: f64,
    ) -> Result<Self> {
        check_range("speaking_rate", speaking_rate, SPEAKING_RATE_RANGE)?;
        check_range("pitch", pitch, PITCH_RANGE)?;
        check_range("volume_gain_db", volume_gain_db, VOLUME_GAIN_DB_RANGE)?;
        Ok(Self {
            encoding,
            speaking_rate,
            pitch,
            volume_gain_db,
        })
    }

    pub fn encoding(&self) -> AudioEncoding {
        self.encoding
    }

    pub fn speaking_rate(&self) -> f64 {
        self.speaking_rate
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn volume_gain_db(&self) -> f64 {
        self.volume_gain_db
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            encoding: AudioEncoding::Mp3,
            speaking_rate: 1.0,
            pitch: 0.0,
            volume_gain_db: 0.0,
        }
    }
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    // NaN fails both comparisons
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(TrainerVoiceError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[derive(Deserialize)]
struct RawAudioSettings {
    #[serde(default)]
    encoding: AudioEncoding,
    #[serde(default = "default_speaking_rate")]
    speaking_rate: f64,
    #[serde(default)]
    pitch: f64,
    #[serde(default)]
    volume_gain_db: f64,
}

fn default_speaking_rate() -> f64 {
    1.0
}

impl TryFrom<RawAudioSettings> for AudioSettings {
    type Error = TrainerVoiceError;

    fn try_from(raw: RawAudioSettings) -> Result<Self> {
        AudioSettings::new(
            raw.encoding,
            raw.speaking_rate,
            raw.pitch,
            raw.volume_gain_db,
        )
    }
}
