//! Journey: pulse and carrier automation across five keyframes.
//!
//! A journey places keyframes at 0%, 25%, 50%, 75% and 100% of the session
//! and linearly interpolates pulse and carrier frequency between them:
//!
//! ```text
//!  pulse Hz
//!   20 ┤                          ●
//!   15 ┤                   ●─────╯
//!   10 ┤            ●─────╯
//!    5 ┤     ●─────╯
//!    1 ┼●───╯
//!      └┴──────┴──────┴──────┴──────┴──→ t
//!       0    0.25    0.5    0.75    1.0  × duration
//! ```
//!
//! Keyframe times are validated once at construction (first at 0, strictly
//! increasing), so the per-sample path never divides by zero.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::params::JOURNEY_POINTS;

/// Normalized keyframe positions.
pub const MILESTONES: [f64; JOURNEY_POINTS] = [0.0, 0.25, 0.5, 0.75, 1.0];

const LAST_SEGMENT: usize = JOURNEY_POINTS - 2;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JourneyPoint {
    pub time_sec: f64,
    pub pulse_hz: f32,
    pub carrier_hz: f32,
}

/// Instantaneous frequencies resolved for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frequencies {
    pub pulse_hz: f64,
    pub carrier_hz: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    points: [JourneyPoint; JOURNEY_POINTS],
}

impl Journey {
    pub fn new(points: &[JourneyPoint]) -> Result<Self, ConfigError> {
        let points: [JourneyPoint; JOURNEY_POINTS] =
            points
                .try_into()
                .map_err(|_| ConfigError::JourneyPointCount {
                    expected: JOURNEY_POINTS,
                    pulse: points.len(),
                    carrier: points.len(),
                })?;

        if points[0].time_sec != 0.0 {
            return Err(ConfigError::JourneyNotIncreasing);
        }
        if points.windows(2).any(|w| !(w[1].time_sec > w[0].time_sec)) {
            return Err(ConfigError::JourneyNotIncreasing);
        }

        Ok(Self { points })
    }

    /// Build the standard quarter-point journey over `duration` seconds.
    pub fn from_milestones(
        pulses: &[f32],
        carriers: &[f32],
        duration: f64,
    ) -> Result<Self, ConfigError> {
        if pulses.len() != JOURNEY_POINTS || carriers.len() != JOURNEY_POINTS {
            return Err(ConfigError::JourneyPointCount {
                expected: JOURNEY_POINTS,
                pulse: pulses.len(),
                carrier: carriers.len(),
            });
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(ConfigError::InvalidDuration { seconds: duration });
        }

        let points: Vec<JourneyPoint> = MILESTONES
            .iter()
            .zip(pulses.iter().zip(carriers))
            .map(|(&m, (&pulse_hz, &carrier_hz))| JourneyPoint {
                time_sec: m * duration,
                pulse_hz,
                carrier_hz,
            })
            .collect();

        Self::new(&points)
    }

    pub fn points(&self) -> &[JourneyPoint; JOURNEY_POINTS] {
        &self.points
    }

    pub fn duration(&self) -> f64 {
        self.points[JOURNEY_POINTS - 1].time_sec
    }

    /// Frequencies at `time_sec`, scanning every segment.
    pub fn frequencies_at(&self, time_sec: f64) -> Frequencies {
        let segment = self.find_segment(0, time_sec);
        self.interpolate(segment, time_sec)
    }

    /// First segment at or after `start` whose end is not before `time_sec`,
    /// clamped to the last segment.
    #[inline]
    fn find_segment(&self, start: usize, time_sec: f64) -> usize {
        let mut idx = start;
        while idx < LAST_SEGMENT && time_sec > self.points[idx + 1].time_sec {
            idx += 1;
        }
        idx
    }

    #[inline]
    fn interpolate(&self, segment: usize, time_sec: f64) -> Frequencies {
        let a = &self.points[segment];
        let b = &self.points[segment + 1];
        let alpha = ((time_sec - a.time_sec) / (b.time_sec - a.time_sec)).clamp(0.0, 1.0);

        Frequencies {
            pulse_hz: lerp(a.pulse_hz as f64, b.pulse_hz as f64, alpha),
            carrier_hz: lerp(a.carrier_hz as f64, b.carrier_hz as f64, alpha),
        }
    }
}

/// Endpoint-exact linear interpolation: returns `a` at 0 and `b` at 1.
#[inline]
fn lerp(a: f64, b: f64, alpha: f64) -> f64 {
    a * (1.0 - alpha) + b * alpha
}

/// Stateful reader for monotonic playback: remembers the current segment and
/// only scans forward from it.
#[derive(Debug, Clone)]
pub struct JourneyCursor {
    journey: Journey,
    segment: usize,
    last_time: f64,
}

impl JourneyCursor {
    pub fn new(journey: Journey) -> Self {
        Self {
            journey,
            segment: 0,
            last_time: 0.0,
        }
    }

    pub fn journey(&self) -> &Journey {
        &self.journey
    }

    pub fn frequencies_at(&mut self, time_sec: f64) -> Frequencies {
        if time_sec < self.last_time {
            self.segment = 0;
        }
        self.last_time = time_sec;
        self.segment = self.journey.find_segment(self.segment, time_sec);
        self.journey.interpolate(self.segment, time_sec)
    }

    pub fn reset(&mut self) {
        self.segment = 0;
        self.last_time = 0.0;
    }
}
