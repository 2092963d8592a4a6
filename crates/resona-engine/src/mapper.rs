//! Translation from [`ControlState`] snapshots to graph parameter targets.
//!
//! [`apply`] is the single entry point: it recomputes every node target from
//! one complete snapshot, so repeated application of the same state is
//! idempotent. All writes go through the nodes' smoothed targets; the only
//! instantaneous swaps are the render buffers, which [`RenderCache`]
//! regenerates only when their inputs change.
//!
//! The per-mode math lives in small pure functions (`spatial_field`,
//! `early_taps`, `reverb_plan`, `crossfeed_gains`) so the numeric behavior
//! is testable without a graph.

use resona_state::{ControlState, EQ_BANDS, Mode, SpatialParams};

use crate::graph::{AudioGraph, EARLY_BRANCHES, SPATIAL_BRANCHES};
use crate::media::MediaElement;
use crate::render::{RenderCache, WARMTH_DRIVE};

/// Playback-rate writes below this delta are skipped.
const RATE_WRITE_EPSILON: f32 = 0.01;

/// Longest reverb decay the mapper will request, in seconds.
const MAX_DECAY_SECONDS: f32 = 5.0;

/// Shortest reverb decay, in seconds.
const MIN_DECAY_SECONDS: f32 = 0.1;

/// Reverb size/decay multiplier per mode.
pub fn reverb_scale(mode: Mode) -> f32 {
    match mode {
        Mode::Default => 1.0,
        Mode::SixteenD => 0.8,
        Mode::ThreeSixty => 1.5,
        Mode::Concert => 2.0,
        Mode::Vocal => 0.5,
        Mode::Studio => 0.25,
    }
}

/// Early-reflection level multiplier per mode.
pub fn early_reflection_scale(mode: Mode) -> f32 {
    match mode {
        Mode::Concert => 1.5,
        Mode::Studio => 0.3,
        _ => 1.0,
    }
}

/// Direct and leaked gains for the crossfeed matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossfeedGains {
    /// Same-channel gain.
    pub direct: f32,
    /// Opposite-channel leakage gain.
    pub cross: f32,
}

/// Crossfeed gains for the given amount (percent).
///
/// Mono compatibility overrides the slider with a full 50/50 downmix.
pub fn crossfeed_gains(crossfeed_pct: f32, mono_compat: bool) -> CrossfeedGains {
    if mono_compat {
        return CrossfeedGains {
            direct: 0.5,
            cross: 0.5,
        };
    }
    let cf = crossfeed_pct / 100.0;
    CrossfeedGains {
        direct: 1.0 - cf * 0.15,
        cross: cf * 0.35,
    }
}

/// Wet/dry levels and impulse decay for the reverb stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbPlan {
    /// Wet gain, clamped to [0, 1].
    pub wet: f32,
    /// Dry gain. Never drops below 0.7 so the source stays audible.
    pub dry: f32,
    /// Impulse decay length in seconds, clamped to [0.1, 5].
    pub decay_seconds: f32,
}

/// Compute the reverb mix and impulse decay for a mode.
pub fn reverb_plan(mode: Mode, spatial: &SpatialParams) -> ReverbPlan {
    let scale = reverb_scale(mode);
    let wet = ((spatial.wet_dry / 100.0) * scale).clamp(0.0, 1.0);
    let decay = MIN_DECAY_SECONDS
        + (spatial.room_size / 100.0) * 3.0 * scale
        + (spatial.reverb_decay / 100.0) * 2.0;
    ReverbPlan {
        wet,
        dry: 1.0 - wet * 0.3,
        decay_seconds: decay.clamp(MIN_DECAY_SECONDS, MAX_DECAY_SECONDS),
    }
}

/// One spatial branch placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialTap {
    /// Branch delay in seconds.
    pub delay_seconds: f32,
    /// Branch gain.
    pub gain: f32,
    /// Branch pan position in [-1, 1].
    pub pan: f32,
}

/// Compute the 16-branch spatial field for a mode.
///
/// Returns `None` for modes without a spatial field (default, vocal,
/// studio); callers silence the branch gains and leave delay/pan untouched.
pub fn spatial_field(
    mode: Mode,
    spatial: &SpatialParams,
) -> Option<[SpatialTap; SPATIAL_BRANCHES]> {
    let depth = spatial.depth_16d / 100.0;
    let spread = spatial.spatial_spread / 180.0;
    let pre = spatial.pre_delay / 1000.0;
    let width = spatial.stereo_width / 100.0;

    match mode {
        Mode::SixteenD => Some(core::array::from_fn(|i| {
            let t = i as f32;
            SpatialTap {
                delay_seconds: (0.001 + pre * 0.1 + t * 0.0035 * depth).min(0.12),
                gain: (depth * 0.22 * (1.0 - (t / 16.0) * 0.5) * spread).max(0.0),
                pan: ((-1.0 + (t / 15.0) * 2.0) * width).clamp(-1.0, 1.0),
            }
        })),
        Mode::ThreeSixty => Some(core::array::from_fn(|i| {
            let t = i as f32;
            let angle = core::f32::consts::TAU * t / SPATIAL_BRANCHES as f32;
            SpatialTap {
                delay_seconds: (0.002 + pre * 0.15 + t * 0.005 * depth).min(0.14),
                gain: (depth * 0.28 * (1.0 - (t / 16.0) * 0.35) * spread).max(0.0),
                pan: (angle.sin() * width).clamp(-1.0, 1.0),
            }
        })),
        Mode::Concert => Some(core::array::from_fn(|i| {
            let t = i as f32;
            SpatialTap {
                delay_seconds: (0.005 + pre * 0.2 + t * 0.006 * depth).min(0.14),
                gain: (depth * 0.3 * (1.0 - (t / 16.0) * 0.4) * spread).max(0.0),
                pan: ((-1.0 + (t / 15.0) * 2.0) * width * 0.8).clamp(-1.0, 1.0),
            }
        })),
        Mode::Default | Mode::Vocal | Mode::Studio => None,
    }
}

/// One early-reflection placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarlyTap {
    /// Reflection delay in seconds.
    pub delay_seconds: f32,
    /// Reflection gain, never negative.
    pub gain: f32,
}

/// Compute the six early-reflection taps for a mode.
pub fn early_taps(mode: Mode, spatial: &SpatialParams) -> [EarlyTap; EARLY_BRANCHES] {
    let level = spatial.early_ref / 100.0;
    let scale = early_reflection_scale(mode);
    core::array::from_fn(|i| {
        let t = i as f32;
        EarlyTap {
            delay_seconds: 0.004 + t * 0.007,
            gain: (level * scale * 0.2 * (1.0 - t * 0.12)).max(0.0),
        }
    })
}

/// Apply one control snapshot to the graph and media element.
///
/// Every node target is recomputed from the snapshot; a disabled snapshot
/// drives every stage to its neutral value instead. Pass `None` for `media`
/// when no element is attached (the graph still follows the snapshot).
pub fn apply<M: MediaElement + ?Sized>(
    state: &ControlState,
    graph: &mut AudioGraph,
    media: Option<&mut M>,
    cache: &mut RenderCache,
) {
    if !state.enabled {
        apply_bypass(graph, media);
        return;
    }

    let enhance = &state.enhance;
    let spatial = &state.spatial;

    graph.master_gain.gain.set_target(enhance.master_vol / 100.0);
    graph.balance_pan.set_pan(enhance.balance / 100.0);
    graph.high_pass.frequency.set_target(enhance.clarity);
    graph.low_pass.frequency.set_target(enhance.warmth);

    // Band gains only apply from a well-formed array.
    if state.eq.len() == EQ_BANDS {
        for (band, gain) in graph.eq.iter_mut().zip(&state.eq) {
            band.gain_db.set_target(*gain);
        }
    }

    graph.sub_bass.gain_db.set_target(state.tone.sub_bass);
    graph.presence.gain_db.set_target(state.tone.presence);
    graph.air.gain_db.set_target(state.tone.air);

    // Loudness normalization pins the compressor into limiting territory
    // and adds makeup gain at the output.
    let (threshold, ratio, makeup) = if enhance.loudness_norm {
        (enhance.comp_threshold.min(-18.0), enhance.comp_ratio.max(6.0), 1.15)
    } else {
        (enhance.comp_threshold, enhance.comp_ratio, 1.0)
    };
    graph.comp.threshold_db.set_target(threshold);
    graph.comp.ratio.set_target(ratio);
    graph.comp.attack_seconds.set_target(enhance.comp_attack / 1000.0);
    graph.comp.release_seconds.set_target(enhance.comp_release / 1000.0);
    graph.output_gain.gain.set_target(makeup);

    if enhance.noise_gate {
        graph.gate.threshold_db.set_target(-45.0);
        graph.gate.ratio.set_target(20.0);
        graph.gate.attack_seconds.set_target(0.001);
        graph.gate.release_seconds.set_target(0.05);
    } else {
        graph.gate.threshold_db.set_target(-100.0);
        graph.gate.ratio.set_target(1.0);
    }

    let cross = crossfeed_gains(spatial.crossfeed, enhance.mono_compat);
    graph.direct_l.gain.set_target(cross.direct);
    graph.direct_r.gain.set_target(cross.direct);
    graph.cross_l2r.gain.set_target(cross.cross);
    graph.cross_r2l.gain.set_target(cross.cross);

    if enhance.analog_warmth {
        cache.ensure_warmth_curve(&mut graph.waveshaper, WARMTH_DRIVE);
        graph.warmth_mix.gain.set_target(0.15);
        graph.warmth_dry.gain.set_target(0.85);
    } else {
        graph.warmth_mix.gain.set_target(0.0);
        graph.warmth_dry.gain.set_target(1.0);
    }

    let plan = reverb_plan(state.mode, spatial);
    graph.wet_gain.gain.set_target(plan.wet);
    graph.dry_gain.gain.set_target(plan.dry);
    let sample_rate = graph.sample_rate();
    cache.ensure_impulse(&mut graph.convolver, sample_rate, plan.decay_seconds);

    for (branch, tap) in graph.early.iter_mut().zip(early_taps(state.mode, spatial)) {
        branch.delay.set_delay_seconds(tap.delay_seconds);
        branch.gain.gain.set_target(tap.gain);
    }

    match spatial_field(state.mode, spatial) {
        Some(taps) => {
            for (branch, tap) in graph.spatial.iter_mut().zip(taps) {
                branch.delay.set_delay_seconds(tap.delay_seconds);
                branch.gain.gain.set_target(tap.gain);
                branch.pan.set_pan(tap.pan);
            }
        }
        None => {
            for branch in &mut graph.spatial {
                branch.gain.gain.set_target(0.0);
            }
        }
    }

    if let Some(media) = media {
        // Zero or negative speed would stall the element; skip it.
        if enhance.speed > 0.0 {
            write_playback_rate(media, enhance.speed / 100.0);
        }
    }
}

/// Drive every stage to its neutral value.
///
/// Delays, pans, and render buffers keep their last values; every gain,
/// filter, and dynamics stage that could color the signal goes flat.
pub fn apply_bypass<M: MediaElement + ?Sized>(graph: &mut AudioGraph, media: Option<&mut M>) {
    graph.master_gain.gain.set_target(1.0);
    graph.balance_pan.set_pan(0.0);
    graph.high_pass.frequency.set_target(0.0);
    graph.low_pass.frequency.set_target(22000.0);

    for band in &mut graph.eq {
        band.gain_db.set_target(0.0);
    }
    graph.sub_bass.gain_db.set_target(0.0);
    graph.presence.gain_db.set_target(0.0);
    graph.air.gain_db.set_target(0.0);

    graph.comp.threshold_db.set_target(-50.0);
    graph.comp.ratio.set_target(1.0);
    graph.gate.ratio.set_target(1.0);

    graph.direct_l.gain.set_target(1.0);
    graph.direct_r.gain.set_target(1.0);
    graph.cross_l2r.gain.set_target(0.0);
    graph.cross_r2l.gain.set_target(0.0);

    graph.warmth_mix.gain.set_target(0.0);
    graph.warmth_dry.gain.set_target(1.0);

    graph.wet_gain.gain.set_target(0.0);
    graph.dry_gain.gain.set_target(1.0);

    for branch in &mut graph.spatial {
        branch.gain.gain.set_target(0.0);
    }
    for branch in &mut graph.early {
        branch.gain.gain.set_target(0.0);
    }

    graph.output_gain.gain.set_target(1.0);

    if let Some(media) = media {
        write_playback_rate(media, 1.0);
    }
}

/// Write the playback rate only when it actually moved.
fn write_playback_rate<M: MediaElement + ?Sized>(media: &mut M, rate: f32) {
    if (media.playback_rate() - rate).abs() > RATE_WRITE_EPSILON {
        media.set_playback_rate(rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeMedia {
        rate: f32,
        writes: u32,
    }

    impl FakeMedia {
        fn new() -> Self {
            Self {
                rate: 1.0,
                writes: 0,
            }
        }
    }

    impl MediaElement for FakeMedia {
        fn identity(&self) -> u64 {
            1
        }
        fn playback_rate(&self) -> f32 {
            self.rate
        }
        fn set_playback_rate(&mut self, rate: f32) {
            self.rate = rate;
            self.writes += 1;
        }
    }

    fn enabled_state() -> ControlState {
        ControlState {
            enabled: true,
            ..ControlState::default()
        }
    }

    #[test]
    fn disabled_state_forces_neutral() {
        let mut graph = AudioGraph::build(48000.0).unwrap();
        let mut cache = RenderCache::new();
        let mut media = FakeMedia::new();
        media.rate = 1.5;

        let mut state = enabled_state();
        state.enhance.master_vol = 40.0;
        state.eq = vec![6.0; EQ_BANDS];
        apply(&state, &mut graph, Some(&mut media), &mut cache);
        assert_eq!(graph.master_gain.gain.target(), 0.4);

        state.enabled = false;
        apply(&state, &mut graph, Some(&mut media), &mut cache);
        assert_eq!(graph.master_gain.gain.target(), 1.0);
        assert_eq!(graph.low_pass.frequency.target(), 22000.0);
        assert_eq!(graph.high_pass.frequency.target(), 0.0);
        assert_eq!(graph.comp.ratio.target(), 1.0);
        assert_eq!(graph.gate.ratio.target(), 1.0);
        assert_eq!(graph.wet_gain.gain.target(), 0.0);
        assert_eq!(graph.dry_gain.gain.target(), 1.0);
        assert_eq!(graph.direct_l.gain.target(), 1.0);
        assert_eq!(graph.cross_l2r.gain.target(), 0.0);
        for band in &graph.eq {
            assert_eq!(band.gain_db.target(), 0.0);
        }
        for branch in &graph.spatial {
            assert_eq!(branch.gain.gain.target(), 0.0);
        }
        assert_eq!(media.rate, 1.0);
    }

    #[test]
    fn master_volume_and_balance_scale_to_unit_ranges() {
        let mut graph = AudioGraph::build(48000.0).unwrap();
        let mut cache = RenderCache::new();
        let mut state = enabled_state();
        state.enhance.master_vol = 150.0;
        state.enhance.balance = -100.0;

        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert_eq!(graph.master_gain.gain.target(), 1.5);
        assert_eq!(graph.balance_pan.pan.target(), -1.0);
    }

    #[test]
    fn eq_applies_only_with_full_band_array() {
        let mut graph = AudioGraph::build(48000.0).unwrap();
        let mut cache = RenderCache::new();
        let mut state = enabled_state();
        state.eq = vec![3.0; EQ_BANDS];
        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert!(graph.eq.iter().all(|b| b.gain_db.target() == 3.0));

        // A malformed array leaves the previous gains in place.
        state.eq = vec![-9.0; 9];
        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert!(graph.eq.iter().all(|b| b.gain_db.target() == 3.0));
    }

    #[test]
    fn loudness_norm_pins_compressor_and_adds_makeup() {
        let mut graph = AudioGraph::build(48000.0).unwrap();
        let mut cache = RenderCache::new();
        let mut state = enabled_state();
        state.enhance.comp_threshold = -12.0;
        state.enhance.comp_ratio = 2.0;
        state.enhance.loudness_norm = true;

        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert_eq!(graph.comp.threshold_db.target(), -18.0);
        assert_eq!(graph.comp.ratio.target(), 6.0);
        assert_eq!(graph.output_gain.gain.target(), 1.15);

        // A harder user setting wins over the floor.
        state.enhance.comp_threshold = -30.0;
        state.enhance.comp_ratio = 10.0;
        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert_eq!(graph.comp.threshold_db.target(), -30.0);
        assert_eq!(graph.comp.ratio.target(), 10.0);

        state.enhance.loudness_norm = false;
        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert_eq!(graph.comp.threshold_db.target(), -30.0);
        assert_eq!(graph.output_gain.gain.target(), 1.0);
    }

    #[test]
    fn compressor_times_convert_from_milliseconds() {
        let mut graph = AudioGraph::build(48000.0).unwrap();
        let mut cache = RenderCache::new();
        let mut state = enabled_state();
        state.enhance.comp_attack = 10.0;
        state.enhance.comp_release = 500.0;

        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert!((graph.comp.attack_seconds.target() - 0.01).abs() < 1e-6);
        assert!((graph.comp.release_seconds.target() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn noise_gate_toggles_between_hard_and_open() {
        let mut graph = AudioGraph::build(48000.0).unwrap();
        let mut cache = RenderCache::new();
        let mut state = enabled_state();
        state.enhance.noise_gate = true;

        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert_eq!(graph.gate.threshold_db.target(), -45.0);
        assert_eq!(graph.gate.ratio.target(), 20.0);

        state.enhance.noise_gate = false;
        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert_eq!(graph.gate.threshold_db.target(), -100.0);
        assert_eq!(graph.gate.ratio.target(), 1.0);
    }

    #[test]
    fn crossfeed_leaks_and_attenuates_proportionally() {
        let g = crossfeed_gains(100.0, false);
        assert!((g.cross - 0.35).abs() < 1e-6);
        assert!((g.direct - 0.85).abs() < 1e-6);

        let g = crossfeed_gains(0.0, false);
        assert_eq!(g.cross, 0.0);
        assert_eq!(g.direct, 1.0);

        // Direct never drops below 0.85 at any slider position.
        for pct in 0..=100 {
            assert!(crossfeed_gains(pct as f32, false).direct >= 0.85 - 1e-6);
        }
    }

    #[test]
    fn mono_compat_overrides_crossfeed() {
        let g = crossfeed_gains(10.0, true);
        assert_eq!(g.direct, 0.5);
        assert_eq!(g.cross, 0.5);
    }

    #[test]
    fn analog_warmth_blends_in_the_shaped_path() {
        let mut graph = AudioGraph::build(48000.0).unwrap();
        let mut cache = RenderCache::new();
        let mut state = enabled_state();
        state.enhance.analog_warmth = true;

        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert_eq!(graph.warmth_mix.gain.target(), 0.15);
        assert_eq!(graph.warmth_dry.gain.target(), 0.85);
        assert!(graph.waveshaper.curve.is_some());

        state.enhance.analog_warmth = false;
        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert_eq!(graph.warmth_mix.gain.target(), 0.0);
        assert_eq!(graph.warmth_dry.gain.target(), 1.0);
    }

    #[test]
    fn reverb_plan_scales_with_mode() {
        let spatial = SpatialParams::default();

        let plan = reverb_plan(Mode::Concert, &spatial);
        let base = reverb_plan(Mode::Default, &spatial);
        assert!(plan.wet > base.wet);
        assert!(plan.decay_seconds > base.decay_seconds);

        let studio = reverb_plan(Mode::Studio, &spatial);
        assert!(studio.wet < base.wet);
    }

    #[test]
    fn reverb_plan_clamps_wet_and_decay() {
        let spatial = SpatialParams {
            wet_dry: 100.0,
            room_size: 100.0,
            reverb_decay: 100.0,
            ..SpatialParams::default()
        };

        let plan = reverb_plan(Mode::Concert, &spatial);
        assert_eq!(plan.wet, 1.0);
        assert_eq!(plan.decay_seconds, 5.0);
        assert!((plan.dry - 0.7).abs() < 1e-6);
    }

    #[test]
    fn decay_never_falls_below_the_floor() {
        let spatial = SpatialParams {
            room_size: -1.0,
            reverb_decay: 0.0,
            wet_dry: -10.0,
            ..SpatialParams::default()
        };
        let plan = reverb_plan(Mode::Default, &spatial);
        assert_eq!(plan.decay_seconds, 0.1);
        assert_eq!(plan.wet, 0.0);
        assert_eq!(plan.dry, 1.0);
    }

    #[test]
    fn silent_modes_have_no_spatial_field() {
        let spatial = SpatialParams::default();
        assert!(spatial_field(Mode::Default, &spatial).is_none());
        assert!(spatial_field(Mode::Vocal, &spatial).is_none());
        assert!(spatial_field(Mode::Studio, &spatial).is_none());
    }

    #[test]
    fn sixteen_d_fans_pans_across_the_width() {
        let spatial = SpatialParams::default();
        let taps = spatial_field(Mode::SixteenD, &spatial).unwrap();
        assert_eq!(taps[0].pan, -1.0);
        assert_eq!(taps[15].pan, 1.0);
        // Later branches arrive later and quieter.
        assert!(taps[15].delay_seconds > taps[0].delay_seconds);
        assert!(taps[15].gain < taps[0].gain);
        assert!(taps.iter().all(|t| t.delay_seconds <= 0.12));
    }

    #[test]
    fn narrow_width_collapses_the_field() {
        let spatial = SpatialParams {
            stereo_width: 0.0,
            ..SpatialParams::default()
        };
        let taps = spatial_field(Mode::SixteenD, &spatial).unwrap();
        assert!(taps.iter().all(|t| t.pan == 0.0));
    }

    #[test]
    fn out_of_range_spatial_inputs_never_invert_phase() {
        for mode in [Mode::SixteenD, Mode::ThreeSixty, Mode::Concert] {
            let negative_depth = SpatialParams {
                depth_16d: -50.0,
                ..SpatialParams::default()
            };
            let taps = spatial_field(mode, &negative_depth).unwrap();
            assert!(taps.iter().all(|t| t.gain == 0.0), "{mode:?} depth");

            let negative_spread = SpatialParams {
                spatial_spread: -90.0,
                ..SpatialParams::default()
            };
            let taps = spatial_field(mode, &negative_spread).unwrap();
            assert!(taps.iter().all(|t| t.gain == 0.0), "{mode:?} spread");
        }
    }

    #[test]
    fn three_sixty_pans_trace_a_circle() {
        let spatial = SpatialParams::default();
        let taps = spatial_field(Mode::ThreeSixty, &spatial).unwrap();
        assert_eq!(taps[0].pan, 0.0);
        assert!((taps[4].pan - 1.0).abs() < 1e-6);
        assert!(taps[8].pan.abs() < 1e-6);
        assert!((taps[12].pan + 1.0).abs() < 1e-6);
    }

    #[test]
    fn concert_pans_stay_inside_the_extremes() {
        let spatial = SpatialParams::default();
        let taps = spatial_field(Mode::Concert, &spatial).unwrap();
        assert!((taps[0].pan + 0.8).abs() < 1e-6);
        assert!((taps[15].pan - 0.8).abs() < 1e-6);
    }

    #[test]
    fn early_taps_decay_and_never_go_negative() {
        let spatial = SpatialParams {
            early_ref: 100.0,
            ..SpatialParams::default()
        };
        let taps = early_taps(Mode::Default, &spatial);
        for pair in taps.windows(2) {
            assert!(pair[1].gain < pair[0].gain);
            assert!(pair[1].delay_seconds > pair[0].delay_seconds);
        }
        assert!(taps.iter().all(|t| t.gain >= 0.0));

        let concert = early_taps(Mode::Concert, &spatial);
        assert!(concert[0].gain > taps[0].gain);
    }

    #[test]
    fn playback_rate_writes_only_past_the_delta_guard() {
        let mut graph = AudioGraph::build(48000.0).unwrap();
        let mut cache = RenderCache::new();
        let mut media = FakeMedia::new();
        let mut state = enabled_state();

        state.enhance.speed = 100.5;
        apply(&state, &mut graph, Some(&mut media), &mut cache);
        assert_eq!(media.writes, 0, "sub-epsilon delta must not write");

        state.enhance.speed = 150.0;
        apply(&state, &mut graph, Some(&mut media), &mut cache);
        assert_eq!(media.writes, 1);
        assert_eq!(media.rate, 1.5);

        state.enhance.speed = 0.0;
        apply(&state, &mut graph, Some(&mut media), &mut cache);
        assert_eq!(media.rate, 1.5, "non-positive speed is ignored");
    }

    #[test]
    fn reapplying_the_same_state_is_idempotent() {
        let mut graph = AudioGraph::build(48000.0).unwrap();
        let mut cache = RenderCache::new();
        let mut state = enabled_state();
        state.mode = Mode::SixteenD;
        state.spatial.crossfeed = 60.0;

        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        let wet = graph.wet_gain.gain.target();
        let cross = graph.cross_l2r.gain.target();
        let impulse_len = graph.convolver.impulse.as_ref().unwrap().len();

        apply::<FakeMedia>(&state, &mut graph, None, &mut cache);
        assert_eq!(graph.wet_gain.gain.target(), wet);
        assert_eq!(graph.cross_l2r.gain.target(), cross);
        assert_eq!(graph.convolver.impulse.as_ref().unwrap().len(), impulse_len);
    }
}
