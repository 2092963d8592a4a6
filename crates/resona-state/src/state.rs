//! The declarative control state consumed by the engine.
//!
//! A [`ControlState`] is the full snapshot of every user-adjustable effect
//! parameter. The controller surface pushes one complete snapshot per edit;
//! the engine never receives partial diffs. Missing sub-objects and fields
//! default-fill, so a sparse snapshot is always decodable.
//!
//! Units follow the wire format: most sliders are percentages (0-100 unless
//! noted), `balance` is -100..100, `pre_delay` and the compressor times are
//! milliseconds, `comp_threshold` is dB, `warmth`/`clarity` are corner
//! frequencies in Hz.

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Number of EQ bands a well-formed snapshot carries.
///
/// Band gains only apply when the snapshot's `eq` array has exactly this
/// length; a mismatched array leaves the previous band gains untouched.
pub const EQ_BANDS: usize = 10;

/// Processing mode selecting the spatial field and reverb character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Plain stereo, no spatial branches.
    #[default]
    #[serde(rename = "default")]
    Default,
    /// 16-direction surround fan.
    #[serde(rename = "16d")]
    SixteenD,
    /// Circular/spiral panning field.
    #[serde(rename = "360")]
    ThreeSixty,
    /// Large-hall imaging with deep reflections.
    #[serde(rename = "concert")]
    Concert,
    /// Center-focused, minimal space.
    #[serde(rename = "vocal")]
    Vocal,
    /// Dry, tight control-room rendering.
    #[serde(rename = "studio")]
    Studio,
}

/// Reverb and spatial-imaging parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpatialParams {
    /// Simulated room size, percent.
    pub room_size: f32,
    /// Reverb tail length, percent.
    pub reverb_decay: f32,
    /// Reverb wet/dry balance, percent.
    pub wet_dry: f32,
    /// Stereo width, percent (100 = unchanged).
    pub stereo_width: f32,
    /// Spatial depth for the 16-direction field, percent.
    #[serde(rename = "depth16d")]
    pub depth_16d: f32,
    /// Pre-delay before the spatial field, milliseconds.
    pub pre_delay: f32,
    /// Angular spread of the spatial field, degrees (0-180).
    pub spatial_spread: f32,
    /// Early-reflection level, percent.
    pub early_ref: f32,
    /// Headphone crossfeed amount, percent.
    pub crossfeed: f32,
}

impl Default for SpatialParams {
    fn default() -> Self {
        Self {
            room_size: 40.0,
            reverb_decay: 25.0,
            wet_dry: 30.0,
            stereo_width: 100.0,
            depth_16d: 50.0,
            pre_delay: 15.0,
            spatial_spread: 60.0,
            early_ref: 35.0,
            crossfeed: 20.0,
        }
    }
}

/// Loudness, dynamics, and coloration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnhanceParams {
    /// Master volume, percent.
    pub master_vol: f32,
    /// Left/right balance, -100..100.
    pub balance: f32,
    /// Compressor threshold, dB.
    pub comp_threshold: f32,
    /// Compressor ratio.
    pub comp_ratio: f32,
    /// Compressor attack, milliseconds.
    pub comp_attack: f32,
    /// Compressor release, milliseconds.
    pub comp_release: f32,
    /// High-pass corner for rumble cut, Hz (0 = off).
    pub clarity: f32,
    /// Low-pass corner for top-end rolloff, Hz (22000 = off).
    pub warmth: f32,
    /// Loudness normalization toggle.
    pub loudness_norm: bool,
    /// Mono-compatibility downmix toggle.
    pub mono_compat: bool,
    /// Analog-warmth waveshaping toggle.
    pub analog_warmth: bool,
    /// Noise gate toggle.
    pub noise_gate: bool,
    /// Playback speed, percent.
    pub speed: f32,
    /// Pitch shift, semitones. Reserved; the graph does not consume it yet.
    pub pitch: f32,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            master_vol: 100.0,
            balance: 0.0,
            comp_threshold: -24.0,
            comp_ratio: 4.0,
            comp_attack: 3.0,
            comp_release: 250.0,
            clarity: 0.0,
            warmth: 22000.0,
            loudness_norm: false,
            mono_compat: false,
            analog_warmth: false,
            noise_gate: false,
            speed: 100.0,
            pitch: 0.0,
        }
    }
}

/// Tone-shaping shelf/peak gains, dB.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToneParams {
    /// Low-shelf boost at 60 Hz.
    pub sub_bass: f32,
    /// Peaking boost at 3 kHz.
    pub presence: f32,
    /// High-shelf boost at 12 kHz.
    pub air: f32,
}

/// The full declarative snapshot of all user-adjustable effect parameters.
///
/// Externally owned: the engine treats each snapshot as immutable input and
/// recomputes every node target from it. The default state is disabled, so a
/// host that never receives a stored state starts in full bypass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlState {
    /// Master enable. When false every stage is forced to neutral.
    pub enabled: bool,
    /// Active processing mode.
    pub mode: Mode,
    /// Per-band EQ gains in dB, one per center frequency, lowest first.
    pub eq: Vec<f32>,
    /// Reverb and spatial parameters.
    pub spatial: SpatialParams,
    /// Loudness, dynamics, and coloration parameters.
    pub enhance: EnhanceParams,
    /// Tone-shaping parameters.
    pub tone: ToneParams,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: Mode::Default,
            eq: vec![0.0; EQ_BANDS],
            spatial: SpatialParams::default(),
            enhance: EnhanceParams::default(),
            tone: ToneParams::default(),
        }
    }
}

impl ControlState {
    /// Decode a snapshot from its JSON wire form.
    ///
    /// Missing fields and sub-objects default-fill; only malformed JSON
    /// fails.
    pub fn parse(json: &str) -> Result<Self, StateError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_is_all_defaults() {
        let state = ControlState::parse("{}").unwrap();
        assert_eq!(state, ControlState::default());
        assert!(!state.enabled);
        assert_eq!(state.mode, Mode::Default);
        assert_eq!(state.eq.len(), EQ_BANDS);
    }

    #[test]
    fn missing_sub_objects_default_fill() {
        let state = ControlState::parse(r#"{"enabled":true,"mode":"concert"}"#).unwrap();
        assert!(state.enabled);
        assert_eq!(state.mode, Mode::Concert);
        assert_eq!(state.spatial, SpatialParams::default());
        assert_eq!(state.enhance, EnhanceParams::default());
        assert_eq!(state.tone, ToneParams::default());
    }

    #[test]
    fn partial_sub_object_keeps_other_defaults() {
        let state =
            ControlState::parse(r#"{"spatial":{"roomSize":80,"crossfeed":50}}"#).unwrap();
        assert_eq!(state.spatial.room_size, 80.0);
        assert_eq!(state.spatial.crossfeed, 50.0);
        assert_eq!(state.spatial.reverb_decay, 25.0);
        assert_eq!(state.spatial.stereo_width, 100.0);
    }

    #[test]
    fn wire_mode_names_round_trip() {
        for (name, mode) in [
            ("default", Mode::Default),
            ("16d", Mode::SixteenD),
            ("360", Mode::ThreeSixty),
            ("concert", Mode::Concert),
            ("vocal", Mode::Vocal),
            ("studio", Mode::Studio),
        ] {
            let state = ControlState::parse(&format!(r#"{{"mode":"{name}"}}"#)).unwrap();
            assert_eq!(state.mode, mode, "mode {name}");
            let json = serde_json::to_string(&state).unwrap();
            assert!(json.contains(&format!(r#""mode":"{name}""#)), "got {json}");
        }
    }

    #[test]
    fn camel_case_field_names_on_the_wire() {
        let state = ControlState::parse(
            r#"{"spatial":{"depth16d":70,"preDelay":20,"spatialSpread":120,"earlyRef":50},
                "enhance":{"masterVol":110,"compThreshold":-28,"loudnessNorm":true,"monoCompat":true},
                "tone":{"subBass":6}}"#,
        )
        .unwrap();
        assert_eq!(state.spatial.depth_16d, 70.0);
        assert_eq!(state.spatial.pre_delay, 20.0);
        assert_eq!(state.spatial.spatial_spread, 120.0);
        assert_eq!(state.spatial.early_ref, 50.0);
        assert_eq!(state.enhance.master_vol, 110.0);
        assert_eq!(state.enhance.comp_threshold, -28.0);
        assert!(state.enhance.loudness_norm);
        assert!(state.enhance.mono_compat);
        assert_eq!(state.tone.sub_bass, 6.0);
    }

    #[test]
    fn short_eq_array_is_representable() {
        // Length enforcement belongs to the mapper, not the decoder.
        let state = ControlState::parse(r#"{"eq":[1,2,3]}"#).unwrap();
        assert_eq!(state.eq, vec![1.0, 2.0, 3.0]);
    }
}
