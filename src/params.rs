//! Parameter snapshot consumed by the engine.
//!
//! The batch path builds a [`Parameters`] once per render from command-line
//! values; the streaming path reads a [`LiveParams`] once per block.

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::amplify::db_to_gain;
use crate::error::ConfigError;

/// Number of keyframes in a journey (quarter-point milestones).
pub const JOURNEY_POINTS: usize = 5;

/// How the entrainment rate is imposed on the carrier.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrainmentType {
    /// Isochronic: one carrier, amplitude shaped by the pulse envelope.
    AmplitudeModulated,
    /// Binaural: each ear gets `carrier ∓ pulse/2`, no envelope.
    BinauralOffset,
}

impl EntrainmentType {
    pub fn from_index(index: i32) -> Result<Self, ConfigError> {
        match index {
            0 => Ok(EntrainmentType::AmplitudeModulated),
            1 => Ok(EntrainmentType::BinauralOffset),
            _ => Err(ConfigError::UnknownEntrainmentType { index }),
        }
    }
}

/// Background noise color.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseType {
    #[default]
    None,
    White,
    Pink,
    Brown,
}

impl NoiseType {
    /// Command-line index: -1 none, 0 brown, 1 pink, 2 white.
    pub fn from_index(index: i32) -> Result<Self, ConfigError> {
        match index {
            -1 => Ok(NoiseType::None),
            0 => Ok(NoiseType::Brown),
            1 => Ok(NoiseType::Pink),
            2 => Ok(NoiseType::White),
            _ => Err(ConfigError::UnknownNoiseType { index }),
        }
    }

    pub fn is_enabled(self) -> bool {
        self != NoiseType::None
    }
}

/// Full parameter snapshot for one session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub pulse_hz: f32,
    pub carrier_hz: f32,
    /// 0.0 = sharp pulse, 1.0 = smooth pulse
    pub softness: f32,
    pub gain_db: f32,
    pub entrainment: EntrainmentType,
    pub noise: NoiseType,
    pub noise_level: f32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            pulse_hz: 10.0,
            carrier_hz: 200.0,
            softness: 0.5,
            gain_db: -10.0,
            entrainment: EntrainmentType::AmplitudeModulated,
            noise: NoiseType::None,
            noise_level: 0.3,
        }
    }
}

impl Parameters {
    pub fn gain(&self) -> f32 {
        db_to_gain(self.gain_db)
    }

    /// Check ranges that do not depend on the sample rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.softness) {
            return Err(ConfigError::UnitOutOfRange {
                name: "softness",
                value: self.softness,
            });
        }
        if !(0.0..=1.0).contains(&self.noise_level) {
            return Err(ConfigError::UnitOutOfRange {
                name: "noise level",
                value: self.noise_level,
            });
        }
        if !self.gain_db.is_finite() {
            return Err(ConfigError::InvalidGain { db: self.gain_db });
        }
        Ok(())
    }
}

/// A pulse or carrier value as given on the command line: one frequency, or
/// a comma-separated list describing a journey.
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencySpec {
    Fixed(f32),
    Journey(Vec<f32>),
}

impl FromStr for FrequencySpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |token: &str| {
            token
                .trim()
                .parse::<f32>()
                .map_err(|_| ConfigError::InvalidFrequencyToken {
                    token: token.trim().to_string(),
                })
        };

        if s.contains(',') {
            let values = s.split(',').map(parse).collect::<Result<Vec<_>, _>>()?;
            Ok(FrequencySpec::Journey(values))
        } else {
            parse(s).map(FrequencySpec::Fixed)
        }
    }
}

/// Streaming-path parameter set, with the ranges the host registers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveParams {
    pub pulse_hz: f32,
    pub carrier_hz: f32,
    pub softness: f32,
    pub gain_db: f32,
}

impl LiveParams {
    pub const PULSE_RANGE: (f32, f32) = (0.5, 60.0);
    pub const CARRIER_RANGE: (f32, f32) = (40.0, 1000.0);
    pub const SOFTNESS_RANGE: (f32, f32) = (0.0, 1.0);
    pub const GAIN_DB_RANGE: (f32, f32) = (-60.0, 0.0);

    /// Clamp every value into its registered range.
    pub fn clamped(self) -> Self {
        Self {
            pulse_hz: clamp_range(self.pulse_hz, Self::PULSE_RANGE),
            carrier_hz: clamp_range(self.carrier_hz, Self::CARRIER_RANGE),
            softness: clamp_range(self.softness, Self::SOFTNESS_RANGE),
            gain_db: clamp_range(self.gain_db, Self::GAIN_DB_RANGE),
        }
    }

    /// Expand to a full snapshot: amplitude-modulated, no noise.
    pub fn to_parameters(self) -> Parameters {
        Parameters {
            pulse_hz: self.pulse_hz,
            carrier_hz: self.carrier_hz,
            softness: self.softness,
            gain_db: self.gain_db,
            entrainment: EntrainmentType::AmplitudeModulated,
            noise: NoiseType::None,
            noise_level: 0.0,
        }
    }
}

impl Default for LiveParams {
    fn default() -> Self {
        Self {
            pulse_hz: 10.0,
            carrier_hz: 440.0,
            softness: 0.5,
            gain_db: -6.0,
        }
    }
}

#[inline]
fn clamp_range(value: f32, (lo, hi): (f32, f32)) -> f32 {
    value.clamp(lo, hi)
}
