//! Automated parameters with smoothing for click-free control changes.
//!
//! Every automatable node parameter needs smooth transitions: a gain that
//! steps instantly from 1.0 to 0.0 produces an audible discontinuity. This
//! module provides [`AutomatedParam`], an exponential-approach (one-pole
//! lowpass) parameter that retargets toward the most recent value.
//!
//! The default time constant is [`DEFAULT_TIME_CONSTANT_MS`] (16 ms, one
//! control frame), so a superseding update simply overwrites the previous
//! target and smoothing naturally converges on the newest value. No explicit
//! cancellation is needed.
//!
//! ## Usage
//!
//! ```rust
//! use resona_core::AutomatedParam;
//!
//! let mut gain = AutomatedParam::new(1.0, 48000.0);
//!
//! // Schedule a new target - smoothing happens as the host advances time
//! gain.set_target(0.5);
//!
//! // Host control tick: advance by one block of samples
//! let value = gain.advance_by(256);
//! assert!(value < 1.0 && value > 0.5);
//! ```

use libm::{expf, powf};

/// Default smoothing time constant in milliseconds (~one control frame).
pub const DEFAULT_TIME_CONSTANT_MS: f32 = 16.0;

/// A control-rate parameter that exponentially approaches its target.
///
/// The render side reads the latest smoothed value; the mapping side only
/// ever writes targets. Writing the same target twice is a no-op, so applying
/// an identical control snapshot is idempotent by construction.
#[derive(Debug, Clone)]
pub struct AutomatedParam {
    /// Current smoothed value.
    current: f32,
    /// Target value being approached.
    target: f32,
    /// One-pole coefficient (1.0 = instant).
    coeff: f32,
    /// Sample rate in Hz.
    sample_rate: f32,
    /// Time constant in milliseconds.
    time_constant_ms: f32,
}

impl AutomatedParam {
    /// Create a parameter at `initial` with the default 16 ms time constant.
    pub fn new(initial: f32, sample_rate: f32) -> Self {
        Self::with_time_constant(initial, sample_rate, DEFAULT_TIME_CONSTANT_MS)
    }

    /// Create a parameter with an explicit smoothing time constant.
    pub fn with_time_constant(initial: f32, sample_rate: f32, time_constant_ms: f32) -> Self {
        let mut param = Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate,
            time_constant_ms,
        };
        param.recalculate_coeff();
        param
    }

    /// Schedule a new target value.
    ///
    /// The parameter approaches the target exponentially; a later call simply
    /// retargets from wherever the value currently is.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and snap to it immediately, skipping the transition.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update the sample rate and recalculate the smoothing coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Advance the smoothing by one sample and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        // One-pole lowpass: y[n] = y[n-1] + coeff * (target - y[n-1])
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Advance the smoothing by `samples` steps and return the new value.
    ///
    /// Closed form of `samples` repeated [`advance`](Self::advance) calls:
    /// the remaining distance to the target shrinks by `(1-coeff)^samples`.
    pub fn advance_by(&mut self, samples: u32) -> f32 {
        if samples == 0 {
            return self.current;
        }
        let remaining = powf(1.0 - self.coeff, samples as f32);
        self.current = self.target - (self.target - self.current) * remaining;
        self.current
    }

    /// Current smoothed value, without advancing.
    #[inline]
    pub fn value(&self) -> f32 {
        self.current
    }

    /// Target value being approached.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True once the value is within epsilon of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Jump to the target immediately.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// Derive the one-pole coefficient from sample rate and time constant.
    ///
    /// `coeff = 1 - exp(-1 / (tau * sample_rate))` where tau is the time
    /// constant in seconds; after one tau the value has covered ~63.2% of
    /// the distance to the target, after five it is effectively settled.
    fn recalculate_coeff(&mut self) {
        if self.time_constant_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples_per_tau = self.time_constant_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples_per_tau);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retarget_overwrites_previous_target() {
        let mut param = AutomatedParam::new(0.0, 48000.0);
        param.set_target(1.0);
        param.advance_by(100);
        param.set_target(-1.0);
        assert_eq!(param.target(), -1.0);

        for _ in 0..48000 {
            param.advance();
        }
        assert!((param.value() + 1.0).abs() < 1e-3);
    }

    #[test]
    fn converges_within_five_time_constants() {
        let mut param = AutomatedParam::new(0.0, 48000.0);
        param.set_target(1.0);

        // 5 * 16ms = 80ms
        param.advance_by(48000 * 80 / 1000);
        assert!(
            (param.value() - 1.0).abs() < 0.01,
            "should be settled, got {}",
            param.value()
        );
    }

    #[test]
    fn one_time_constant_covers_63_percent() {
        let mut param = AutomatedParam::new(0.0, 48000.0);
        param.set_target(1.0);

        param.advance_by((48000.0 * 0.016) as u32);
        let expected = 1.0 - expf(-1.0);
        assert!(
            (param.value() - expected).abs() < 0.05,
            "expected ~{expected}, got {}",
            param.value()
        );
    }

    #[test]
    fn advance_by_matches_repeated_advance() {
        let mut stepped = AutomatedParam::new(0.2, 48000.0);
        let mut jumped = stepped.clone();
        stepped.set_target(0.9);
        jumped.set_target(0.9);

        for _ in 0..512 {
            stepped.advance();
        }
        jumped.advance_by(512);

        assert!(
            (stepped.value() - jumped.value()).abs() < 1e-4,
            "stepped {} vs jumped {}",
            stepped.value(),
            jumped.value()
        );
    }

    #[test]
    fn set_immediate_skips_smoothing() {
        let mut param = AutomatedParam::new(1.0, 48000.0);
        param.set_immediate(0.25);
        assert_eq!(param.value(), 0.25);
        assert!(param.is_settled());
    }

    #[test]
    fn zero_time_constant_is_instant() {
        let mut param = AutomatedParam::with_time_constant(0.0, 48000.0, 0.0);
        param.set_target(0.7);
        assert_eq!(param.advance(), 0.7);
    }
}
