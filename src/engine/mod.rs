//! Session state machine shared by the batch renderer and the streaming
//! adapter.
//!
//! ```text
//!            prepare()              last frame (batch)
//!   Idle ──→ Preparing ──→ Rendering ──────────────────→ Complete
//!     ↑          │              │
//!     │          └──→ Failed    │ release()
//!     └─────────────────────────┘
//! ```
//!
//! One [`SynthesisEngine`] renders one session at a time. The mode decides
//! the pulse envelope and output stage; [`Capabilities`] decide which
//! optional stages (noise, reverb, journey) may run at all.

pub mod config;
#[cfg(feature = "rtrb")]
pub mod meter;
pub mod render;
pub mod stream;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dsp::journey::{Frequencies, JourneyCursor};
use crate::dsp::noise::{derive_channel_seed, NoiseSynth};
use crate::dsp::phase::PhaseAccumulator;
use crate::dsp::pulse::{PulseEnvelope, PulseShape};
use crate::dsp::ramp::Ramp;
use crate::dsp::reverb::SchroederReverb;
use crate::dsp::shaping::OutputStage;
use crate::error::{EngineError, EngineResult};
use crate::params::{EntrainmentType, LiveParams, Parameters};
use crate::DEFAULT_SAMPLE_RATE;

use self::config::RenderConfig;

/// Reverb contribution added on top of the dry signal.
pub const REVERB_WET_MIX: f32 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Preparing,
    Rendering,
    Complete,
    Failed,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    /// File rendering: narrowing pulse, tanh saturation.
    Offline,
    /// Host streaming: widening pulse, soft-knee clipper.
    Live,
}

impl EngineMode {
    pub fn pulse_shape(self) -> PulseShape {
        match self {
            EngineMode::Offline => PulseShape::Narrowing,
            EngineMode::Live => PulseShape::Widening,
        }
    }

    pub fn output_stage(self) -> OutputStage {
        match self {
            EngineMode::Offline => OutputStage::Saturate,
            EngineMode::Live => OutputStage::SoftKnee,
        }
    }
}

/// Optional processing stages a session is allowed to use.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub noise: bool,
    pub reverb: bool,
    pub journey: bool,
}

impl Capabilities {
    pub const ALL: Self = Self {
        noise: true,
        reverb: true,
        journey: true,
    };

    pub const NONE: Self = Self {
        noise: false,
        reverb: false,
        journey: false,
    };

    pub fn for_mode(mode: EngineMode) -> Self {
        match mode {
            EngineMode::Offline => Self::ALL,
            EngineMode::Live => Self::NONE,
        }
    }
}

pub struct SynthesisEngine {
    mode: EngineMode,
    capabilities: Capabilities,
    state: EngineState,
    sample_rate: f64,
    params: Parameters,

    // Control values (ramped in live mode, constant in batch mode)
    pulse_hz: Ramp,
    carrier_hz: Ramp,
    softness: Ramp,
    gain: Ramp,
    journey: Option<JourneyCursor>,
    last_frequencies: Frequencies,

    envelope: PulseEnvelope,
    output: OutputStage,
    carrier_phase: PhaseAccumulator,
    pulse_phase: PhaseAccumulator,
    left_phase: PhaseAccumulator,
    right_phase: PhaseAccumulator,

    noise: [NoiseSynth; 2],
    noise_enabled: bool,
    reverb: [SchroederReverb; 2],
    reverb_enabled: bool,

    position: u64,
    total_frames: Option<u64>,
}

impl SynthesisEngine {
    pub fn new(mode: EngineMode) -> Self {
        let params = Parameters::default();
        Self {
            mode,
            capabilities: Capabilities::for_mode(mode),
            state: EngineState::Idle,
            sample_rate: DEFAULT_SAMPLE_RATE,
            params,
            pulse_hz: Ramp::new(params.pulse_hz),
            carrier_hz: Ramp::new(params.carrier_hz),
            softness: Ramp::new(params.softness),
            gain: Ramp::new(params.gain()),
            journey: None,
            last_frequencies: Frequencies {
                pulse_hz: params.pulse_hz as f64,
                carrier_hz: params.carrier_hz as f64,
            },
            envelope: PulseEnvelope::new(mode.pulse_shape(), params.softness),
            output: mode.output_stage(),
            carrier_phase: PhaseAccumulator::new(),
            pulse_phase: PhaseAccumulator::new(),
            left_phase: PhaseAccumulator::new(),
            right_phase: PhaseAccumulator::new(),
            noise: [
                NoiseSynth::new(derive_channel_seed(0, 0)),
                NoiseSynth::new(derive_channel_seed(0, 1)),
            ],
            noise_enabled: false,
            reverb: [
                SchroederReverb::new(DEFAULT_SAMPLE_RATE),
                SchroederReverb::new(DEFAULT_SAMPLE_RATE),
            ],
            reverb_enabled: false,
            position: 0,
            total_frames: None,
        }
    }

    /// Override the mode's default capabilities. Takes effect on the next
    /// `prepare`.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Frames emitted since `prepare`.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Frames a batch session will emit, `None` for open-ended sessions.
    pub fn total_frames(&self) -> Option<u64> {
        self.total_frames
    }

    /// Pulse and carrier used for the most recently rendered frame.
    pub fn last_frequencies(&self) -> Frequencies {
        self.last_frequencies
    }

    /// Validate `config` and reset every component for a new session.
    ///
    /// Allocation happens here (reverb lines are resized when the sample
    /// rate changes); `render_block` never allocates.
    pub fn prepare(&mut self, config: &RenderConfig) -> EngineResult<()> {
        self.state = EngineState::Preparing;

        if let Err(err) = config.validate() {
            warn!(error = %err, "session configuration rejected");
            self.state = EngineState::Failed;
            return Err(err.into());
        }

        let params = config.params;
        self.params = params;
        self.sample_rate = config.sample_rate;
        self.position = 0;
        self.total_frames = config.total_frames();

        self.pulse_hz.jump(params.pulse_hz);
        self.carrier_hz.jump(params.carrier_hz);
        self.softness.jump(params.softness);
        self.gain.jump(params.gain());
        self.envelope = PulseEnvelope::new(self.mode.pulse_shape(), params.softness);
        self.output = self.mode.output_stage();

        self.journey = match &config.journey {
            Some(journey) if self.capabilities.journey => {
                Some(JourneyCursor::new(journey.clone()))
            }
            Some(_) => {
                debug!("journey requested but disabled for this engine");
                None
            }
            None => None,
        };
        self.last_frequencies = Frequencies {
            pulse_hz: params.pulse_hz as f64,
            carrier_hz: params.carrier_hz as f64,
        };

        self.carrier_phase.reset();
        self.pulse_phase.reset();
        self.left_phase.reset();
        self.right_phase.reset();

        self.noise_enabled = self.capabilities.noise && params.noise.is_enabled();
        for (channel, synth) in self.noise.iter_mut().enumerate() {
            synth.set_seed(derive_channel_seed(config.seed, channel));
            synth.prepare(config.sample_rate, params.noise, params.pulse_hz);
        }

        self.reverb_enabled = self.capabilities.reverb;
        for reverb in &mut self.reverb {
            reverb.prepare(config.sample_rate);
        }

        self.state = EngineState::Rendering;
        info!(
            mode = ?self.mode,
            sample_rate = self.sample_rate,
            total_frames = ?self.total_frames,
            noise = self.noise_enabled,
            reverb = self.reverb_enabled,
            journey = self.journey.is_some(),
            "session prepared"
        );
        Ok(())
    }

    /// Install new live targets. With `ramp_frames > 0` each value moves
    /// linearly over that many frames; zero jumps at the next frame.
    pub fn update_live(&mut self, live: &LiveParams, ramp_frames: u32) {
        let live = live.clamped();
        self.params.pulse_hz = live.pulse_hz;
        self.params.carrier_hz = live.carrier_hz;
        self.params.softness = live.softness;
        self.params.gain_db = live.gain_db;

        self.pulse_hz.set_target(live.pulse_hz, ramp_frames);
        self.carrier_hz.set_target(live.carrier_hz, ramp_frames);
        self.gain.set_target(self.params.gain(), ramp_frames);
        self.softness.set_target(live.softness, ramp_frames);
        if !self.softness.is_ramping() {
            self.envelope.set_softness(live.softness);
        }
    }

    /// Render up to `min(left.len(), right.len())` frames.
    ///
    /// Returns the number of frames written; fewer than requested only when a
    /// batch session reaches its end, and zero once it is Complete.
    pub fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) -> EngineResult<usize> {
        match self.state {
            EngineState::Rendering => {}
            EngineState::Complete => return Ok(0),
            actual => {
                return Err(EngineError::InvalidState {
                    expected: EngineState::Rendering,
                    actual,
                })
            }
        }

        let mut frames = left.len().min(right.len());
        if let Some(total) = self.total_frames {
            let remaining = total.saturating_sub(self.position);
            frames = frames.min(usize::try_from(remaining).unwrap_or(usize::MAX));
        }

        for (l, r) in left[..frames].iter_mut().zip(right[..frames].iter_mut()) {
            let (out_l, out_r) = self.next_frame();
            *l = out_l;
            *r = out_r;
            self.position += 1;
        }

        if self.total_frames == Some(self.position) {
            self.state = EngineState::Complete;
        }
        Ok(frames)
    }

    /// End the session and return to Idle.
    pub fn release(&mut self) {
        debug!(position = self.position, "session released");
        self.state = EngineState::Idle;
        self.journey = None;
        self.total_frames = None;
        for reverb in &mut self.reverb {
            reverb.reset();
        }
    }

    #[inline]
    fn resolve_frequencies(&mut self) -> Frequencies {
        let frequencies = match self.journey.as_mut() {
            Some(cursor) => cursor.frequencies_at(self.position as f64 / self.sample_rate),
            None => Frequencies {
                pulse_hz: self.pulse_hz.next() as f64,
                carrier_hz: self.carrier_hz.next() as f64,
            },
        };
        self.last_frequencies = frequencies;
        frequencies
    }

    #[inline]
    fn next_frame(&mut self) -> (f32, f32) {
        let Frequencies {
            pulse_hz,
            carrier_hz,
        } = self.resolve_frequencies();

        let gain = self.gain.next();
        if self.softness.is_ramping() {
            self.softness.next();
            self.envelope.set_softness(self.softness.value());
        }

        let sr = self.sample_rate;
        let (mut left, mut right) = match self.params.entrainment {
            EntrainmentType::AmplitudeModulated => {
                let tone = self.carrier_phase.sin();
                let level = self.envelope.level(self.pulse_phase.value());
                self.carrier_phase
                    .advance(PhaseAccumulator::increment_for(carrier_hz, sr));
                self.pulse_phase
                    .advance(PhaseAccumulator::increment_for(pulse_hz, sr));

                let sample = tone * level * gain;
                (sample, sample)
            }
            EntrainmentType::BinauralOffset => {
                let left = self.left_phase.sin() * gain;
                let right = self.right_phase.sin() * gain;
                let half_beat = pulse_hz / 2.0;
                self.left_phase
                    .advance(PhaseAccumulator::increment_for(carrier_hz - half_beat, sr));
                self.right_phase
                    .advance(PhaseAccumulator::increment_for(carrier_hz + half_beat, sr));
                (left, right)
            }
        };

        if self.noise_enabled {
            let level = self.params.noise_level;
            left += self.noise[0].process() * level;
            right += self.noise[1].process() * level;
        }

        if self.reverb_enabled {
            left += self.reverb[0].process(left) * REVERB_WET_MIX;
            right += self.reverb[1].process(right) * REVERB_WET_MIX;
        }

        (self.output.apply(left), self.output.apply(right))
    }
}
