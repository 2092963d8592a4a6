//! Node descriptors: control surfaces for the host runtime's audio units.
//!
//! resona does not execute sample-level DSP. Each node here describes one
//! host-provided processing unit (filter, delay line, convolution, dynamics,
//! panning, waveshaping) and owns its automatable parameters as
//! [`AutomatedParam`]s. The mapping layer writes targets; the host reads the
//! smoothed values at render time.
//!
//! Buffers that the host consumes wholesale - the reverb impulse response and
//! the waveshaper transfer curve - are plain data ([`ImpulseResponse`],
//! [`TransferCurve`]) and swap instantaneously rather than smoothing.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::param::AutomatedParam;

/// Biquad-style filter response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Passes frequencies above the cutoff.
    Highpass,
    /// Passes frequencies below the cutoff.
    Lowpass,
    /// Boost/cut around a center frequency.
    Peaking,
    /// Shelving boost/cut below the corner frequency.
    LowShelf,
    /// Shelving boost/cut above the corner frequency.
    HighShelf,
}

/// A single filter stage with automatable frequency, Q, and gain.
#[derive(Debug, Clone)]
pub struct FilterNode {
    /// Response shape. Fixed at construction.
    pub kind: FilterKind,
    /// Cutoff / center frequency in Hz.
    pub frequency: AutomatedParam,
    /// Resonance / bandwidth.
    pub q: AutomatedParam,
    /// Boost or cut in dB (peaking and shelving kinds only).
    pub gain_db: AutomatedParam,
}

impl FilterNode {
    /// Create a filter with the given shape, frequency, and Q. Gain starts flat.
    pub fn new(kind: FilterKind, frequency: f32, q: f32, sample_rate: f32) -> Self {
        Self {
            kind,
            frequency: AutomatedParam::new(frequency, sample_rate),
            q: AutomatedParam::new(q, sample_rate),
            gain_db: AutomatedParam::new(0.0, sample_rate),
        }
    }

    /// Advance every automated parameter by `samples` steps.
    pub fn advance_by(&mut self, samples: u32) {
        self.frequency.advance_by(samples);
        self.q.advance_by(samples);
        self.gain_db.advance_by(samples);
    }
}

/// A single gain stage.
#[derive(Debug, Clone)]
pub struct GainNode {
    /// Linear gain.
    pub gain: AutomatedParam,
}

impl GainNode {
    /// Create a gain stage at the given linear gain.
    pub fn new(gain: f32, sample_rate: f32) -> Self {
        Self {
            gain: AutomatedParam::new(gain, sample_rate),
        }
    }

    /// Advance every automated parameter by `samples` steps.
    pub fn advance_by(&mut self, samples: u32) {
        self.gain.advance_by(samples);
    }
}

/// A variable delay line with a fixed maximum length.
#[derive(Debug, Clone)]
pub struct DelayNode {
    /// Current delay in seconds.
    pub delay_seconds: AutomatedParam,
    /// Maximum delay the host allocated for this line, in seconds.
    max_delay_seconds: f32,
}

impl DelayNode {
    /// Create a delay line. The maximum length is fixed at construction.
    pub fn new(max_delay_seconds: f32, sample_rate: f32) -> Self {
        Self {
            delay_seconds: AutomatedParam::new(0.0, sample_rate),
            max_delay_seconds,
        }
    }

    /// Schedule a new delay time, clamped to `[0, max_delay]`.
    pub fn set_delay_seconds(&mut self, seconds: f32) {
        self.delay_seconds
            .set_target(seconds.clamp(0.0, self.max_delay_seconds));
    }

    /// Maximum delay in seconds.
    pub fn max_delay_seconds(&self) -> f32 {
        self.max_delay_seconds
    }

    /// Advance every automated parameter by `samples` steps.
    pub fn advance_by(&mut self, samples: u32) {
        self.delay_seconds.advance_by(samples);
    }
}

/// An equal-power stereo panner.
#[derive(Debug, Clone)]
pub struct PannerNode {
    /// Pan position, -1 (hard left) to +1 (hard right).
    pub pan: AutomatedParam,
}

impl PannerNode {
    /// Create a panner at the given position.
    pub fn new(pan: f32, sample_rate: f32) -> Self {
        Self {
            pan: AutomatedParam::new(pan.clamp(-1.0, 1.0), sample_rate),
        }
    }

    /// Schedule a new pan position, clamped to `[-1, 1]`.
    pub fn set_pan(&mut self, pan: f32) {
        self.pan.set_target(pan.clamp(-1.0, 1.0));
    }

    /// Advance every automated parameter by `samples` steps.
    pub fn advance_by(&mut self, samples: u32) {
        self.pan.advance_by(samples);
    }
}

/// A dynamics processor (compressor, or gate via extreme ratio settings).
#[derive(Debug, Clone)]
pub struct DynamicsNode {
    /// Threshold in dB below which no gain reduction occurs.
    pub threshold_db: AutomatedParam,
    /// Soft-knee width in dB.
    pub knee_db: AutomatedParam,
    /// Compression ratio (1 = unity, no compression).
    pub ratio: AutomatedParam,
    /// Attack time in seconds.
    pub attack_seconds: AutomatedParam,
    /// Release time in seconds.
    pub release_seconds: AutomatedParam,
}

impl DynamicsNode {
    /// Create a dynamics stage with the given initial settings.
    pub fn new(
        threshold_db: f32,
        knee_db: f32,
        ratio: f32,
        attack_seconds: f32,
        release_seconds: f32,
        sample_rate: f32,
    ) -> Self {
        Self {
            threshold_db: AutomatedParam::new(threshold_db, sample_rate),
            knee_db: AutomatedParam::new(knee_db, sample_rate),
            ratio: AutomatedParam::new(ratio, sample_rate),
            attack_seconds: AutomatedParam::new(attack_seconds, sample_rate),
            release_seconds: AutomatedParam::new(release_seconds, sample_rate),
        }
    }

    /// Advance every automated parameter by `samples` steps.
    pub fn advance_by(&mut self, samples: u32) {
        self.threshold_db.advance_by(samples);
        self.knee_db.advance_by(samples);
        self.ratio.advance_by(samples);
        self.attack_seconds.advance_by(samples);
        self.release_seconds.advance_by(samples);
    }
}

/// A synthesized impulse response consumed by a [`ConvolverNode`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseResponse {
    sample_rate: f32,
    channels: Vec<Vec<f32>>,
}

impl ImpulseResponse {
    /// Create an impulse response from per-channel sample buffers.
    pub fn new(sample_rate: f32, channels: Vec<Vec<f32>>) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Sample rate the buffers were generated at.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Per-channel sample buffers.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Length in samples (all channels are equal length).
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// True if the response holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate > 0.0 {
            self.len() as f32 / self.sample_rate
        } else {
            0.0
        }
    }
}

/// A convolution reverb unit. Holds the current impulse response.
///
/// Swapping the buffer is instantaneous; the discontinuity at the swap
/// boundary is the caller's trade-off to manage (see the impulse cache in
/// the engine crate).
#[derive(Debug, Clone, Default)]
pub struct ConvolverNode {
    /// Current impulse response, if one has been loaded.
    pub impulse: Option<ImpulseResponse>,
}

impl ConvolverNode {
    /// Create a convolver with no impulse loaded.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A fixed nonlinear transfer table consumed by a [`WaveshaperNode`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransferCurve {
    samples: Vec<f32>,
}

impl TransferCurve {
    /// Create a transfer curve from a sample table mapping x in [-1, 1].
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// Table entries.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Table length.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Evaluate the curve at `x` in [-1, 1] via nearest-entry lookup.
    pub fn evaluate(&self, x: f32) -> f32 {
        if self.samples.is_empty() {
            return x;
        }
        let t = (x.clamp(-1.0, 1.0) + 1.0) / 2.0;
        let idx = (t * (self.samples.len() - 1) as f32) as usize;
        self.samples[idx]
    }
}

/// Oversampling factor for nonlinear stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Oversample {
    /// No oversampling.
    None,
    /// 2x oversampling.
    TwoX,
    /// 4x oversampling.
    #[default]
    FourX,
}

/// A waveshaper applying a fixed transfer curve.
#[derive(Debug, Clone, Default)]
pub struct WaveshaperNode {
    /// Current transfer curve, if one has been loaded.
    pub curve: Option<TransferCurve>,
    /// Oversampling requested from the host for alias suppression.
    pub oversample: Oversample,
}

impl WaveshaperNode {
    /// Create a waveshaper with the given oversampling factor and no curve.
    pub fn new(oversample: Oversample) -> Self {
        Self {
            curve: None,
            oversample,
        }
    }
}
