//! Procedural synthesis of the reverb impulse and warmth transfer curve.
//!
//! The reverb impulse is decaying filtered noise, generated per channel with
//! an independent PRNG stream so the stereo image decorrelates. The warmth
//! curve is a fixed nonlinear transfer table with drive either off (0) or at
//! a single fixed amount - there are no intermediate levels.
//!
//! Both buffers swap instantaneously in their nodes, so [`RenderCache`]
//! regenerates them only when their inputs actually change: the impulse is
//! keyed by decay length rounded to a millisecond (plus channel count and
//! sample rate), the curve by drive amount. A failed regeneration keeps the
//! previous buffer.

use resona_core::{ConvolverNode, ImpulseResponse, TransferCurve, WaveshaperNode};
use thiserror::Error;
use tracing::{debug, warn};

/// Length of the warmth transfer table.
pub const WARMTH_CURVE_LEN: usize = 44100;

/// Fixed drive amount when analog warmth is engaged.
pub const WARMTH_DRIVE: f32 = 50.0;

/// Exponent scale relating decay seconds to envelope steepness.
const DECAY_SHAPE: f32 = 3.5;

/// Longest impulse the synthesizer will attempt, in seconds.
const MAX_IMPULSE_SECONDS: f32 = 30.0;

/// Errors from buffer synthesis.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    /// Decay length is non-finite, non-positive, or absurdly long.
    #[error("invalid impulse decay length: {seconds}s")]
    InvalidDecay {
        /// The rejected decay length.
        seconds: f32,
    },

    /// Sample rate is non-finite or non-positive.
    #[error("invalid sample rate: {hz} Hz")]
    InvalidSampleRate {
        /// The rejected sample rate.
        hz: f32,
    },
}

/// Xorshift PRNG for noise generation. Deterministic per seed.
struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x12345678 } else { seed },
        }
    }

    fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform sample in [-1, 1].
    fn next_sample(&mut self) -> f32 {
        (self.next() as i32 as f32) / (i32::MAX as f32)
    }
}

/// Synthesize a reverb impulse response of `decay_seconds` at `sample_rate`.
///
/// Sample `i` of each channel is `noise * (1 - i/N)^(decay * 3.5)`: white
/// noise under a polynomial decay envelope whose steepness tracks the decay
/// length. Channels use independent noise streams.
pub fn synthesize_impulse(
    channels: usize,
    sample_rate: f32,
    decay_seconds: f32,
) -> Result<ImpulseResponse, RenderError> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(RenderError::InvalidSampleRate { hz: sample_rate });
    }
    if !decay_seconds.is_finite() || decay_seconds <= 0.0 || decay_seconds > MAX_IMPULSE_SECONDS {
        return Err(RenderError::InvalidDecay {
            seconds: decay_seconds,
        });
    }

    let len = (sample_rate * decay_seconds) as usize;
    if len == 0 {
        return Err(RenderError::InvalidDecay {
            seconds: decay_seconds,
        });
    }

    let shape = decay_seconds * DECAY_SHAPE;
    let buffers = (0..channels)
        .map(|c| {
            let mut rng = Xorshift32::new(0x12345678u32.wrapping_add(c as u32 * 0x9E3779B9));
            (0..len)
                .map(|i| {
                    let envelope = (1.0 - i as f32 / len as f32).powf(shape);
                    rng.next_sample() * envelope
                })
                .collect()
        })
        .collect();

    Ok(ImpulseResponse::new(sample_rate, buffers))
}

/// Build the warmth transfer table for the given drive amount.
///
/// Maps `x` in [-1, 1] through `((3+k)·x·20°) / (π + k·|x|)` - a gentle
/// arctangent-like soft saturation at the fixed drive, identity-like at
/// drive 0.
pub fn warmth_curve(drive: f32) -> TransferCurve {
    let k = drive;
    let deg = core::f32::consts::PI / 180.0;
    let samples = (0..WARMTH_CURVE_LEN)
        .map(|i| {
            let x = (i as f32 * 2.0) / WARMTH_CURVE_LEN as f32 - 1.0;
            ((3.0 + k) * x * 20.0 * deg) / (core::f32::consts::PI + k * x.abs())
        })
        .collect();
    TransferCurve::new(samples)
}

/// Cache key for the last synthesized impulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ImpulseKey {
    decay_ms: u32,
    channels: u32,
    sample_rate_hz: u32,
}

/// Regenerates render buffers only when their inputs change.
#[derive(Debug, Default)]
pub struct RenderCache {
    impulse_key: Option<ImpulseKey>,
    warmth_drive_bits: Option<u32>,
}

impl RenderCache {
    /// Create an empty cache. The first `ensure_*` call always generates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a stereo impulse of `decay_seconds` into the convolver if its
    /// decay length (rounded to 1 ms), channel count, or sample rate differ
    /// from the current buffer. Synthesis failure keeps the previous buffer.
    pub fn ensure_impulse(
        &mut self,
        convolver: &mut ConvolverNode,
        sample_rate: f32,
        decay_seconds: f32,
    ) {
        const CHANNELS: usize = 2;
        let key = ImpulseKey {
            decay_ms: (decay_seconds * 1000.0).round().max(0.0) as u32,
            channels: CHANNELS as u32,
            sample_rate_hz: sample_rate.max(0.0) as u32,
        };
        if self.impulse_key == Some(key) && convolver.impulse.is_some() {
            return;
        }

        match synthesize_impulse(CHANNELS, sample_rate, decay_seconds) {
            Ok(impulse) => {
                debug!(decay_ms = key.decay_ms, "regenerated reverb impulse");
                convolver.impulse = Some(impulse);
                self.impulse_key = Some(key);
            }
            Err(err) => {
                warn!(%err, "impulse synthesis failed, keeping previous buffer");
            }
        }
    }

    /// Load the warmth curve for `drive` into the waveshaper if the drive
    /// amount changed.
    pub fn ensure_warmth_curve(&mut self, shaper: &mut WaveshaperNode, drive: f32) {
        let bits = drive.to_bits();
        if self.warmth_drive_bits == Some(bits) && shaper.curve.is_some() {
            return;
        }
        shaper.curve = Some(warmth_curve(drive));
        self.warmth_drive_bits = Some(bits);
    }
}
