//! Render session configuration.

use crate::dsp::journey::Journey;
use crate::error::ConfigError;
use crate::params::{FrequencySpec, Parameters};
use crate::DEFAULT_SAMPLE_RATE;

/// Everything `SynthesisEngine::prepare` needs for one session.
///
/// `duration == None` describes an open-ended streaming session.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub params: Parameters,
    pub sample_rate: f64,
    pub duration: Option<f64>,
    pub journey: Option<Journey>,
    /// Base seed for the noise generators; each channel derives its own.
    pub seed: u64,
}

impl RenderConfig {
    pub fn new(params: Parameters) -> Self {
        Self {
            params,
            sample_rate: DEFAULT_SAMPLE_RATE,
            duration: None,
            journey: None,
            seed: 0,
        }
    }

    /// Build a batch config from command-line style pulse/carrier values.
    ///
    /// Both specs must be single frequencies, or both must be 5-value
    /// journeys. For journeys the snapshot's pulse/carrier hold the first
    /// keyframe.
    pub fn from_specs(
        pulse: &FrequencySpec,
        carrier: &FrequencySpec,
        params: Parameters,
        duration: f64,
    ) -> Result<Self, ConfigError> {
        let mut params = params;

        let journey = match (pulse, carrier) {
            (FrequencySpec::Fixed(p), FrequencySpec::Fixed(c)) => {
                params.pulse_hz = *p;
                params.carrier_hz = *c;
                None
            }
            (FrequencySpec::Journey(pulses), FrequencySpec::Journey(carriers)) => {
                let journey = Journey::from_milestones(pulses, carriers, duration)?;
                let first = journey.points()[0];
                params.pulse_hz = first.pulse_hz;
                params.carrier_hz = first.carrier_hz;
                Some(journey)
            }
            _ => return Err(ConfigError::MismatchedFrequencySpecs),
        };

        Ok(Self {
            journey,
            ..Self::new(params).duration(duration)
        })
    }

    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn journey(mut self, journey: Journey) -> Self {
        self.journey = Some(journey);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Number of frames a batch session emits: `floor(duration × sample_rate)`.
    pub fn total_frames(&self) -> Option<u64> {
        self.duration
            .map(|seconds| (seconds * self.sample_rate).floor() as u64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }

        if let Some(seconds) = self.duration {
            if !(seconds.is_finite() && seconds > 0.0) {
                return Err(ConfigError::InvalidDuration { seconds });
            }
        }

        self.params.validate()?;

        let nyquist = self.nyquist();
        match &self.journey {
            Some(journey) => {
                if let Some(seconds) = self.duration {
                    if (journey.duration() - seconds).abs() > seconds * 1e-9 {
                        return Err(ConfigError::JourneySpan {
                            journey: journey.duration(),
                            duration: seconds,
                        });
                    }
                }
                for point in journey.points() {
                    check_frequency("pulse", point.pulse_hz, nyquist)?;
                    check_frequency("carrier", point.carrier_hz, nyquist)?;
                }
            }
            None => {
                check_frequency("pulse", self.params.pulse_hz, nyquist)?;
                check_frequency("carrier", self.params.carrier_hz, nyquist)?;
            }
        }

        Ok(())
    }
}

fn check_frequency(name: &'static str, hz: f32, nyquist: f64) -> Result<(), ConfigError> {
    let hz = hz as f64;
    if hz > 0.0 && hz < nyquist {
        Ok(())
    } else {
        Err(ConfigError::FrequencyOutOfRange { name, hz, nyquist })
    }
}
