//! Factory preset catalog.
//!
//! Presets are named bundles of mode, EQ, spatial, enhance, and tone settings
//! used to seed a [`ControlState`]. The factory catalog is embedded at
//! compile time in the same JSON wire format snapshots use, so it is always
//! available without external files. A preset never touches `enabled` - the
//! master switch stays where the user left it.

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::state::{ControlState, EnhanceParams, Mode, SpatialParams, ToneParams};

/// A named bundle of settings that seeds a [`ControlState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    /// Processing mode.
    pub mode: Mode,
    /// Per-band EQ gains in dB.
    pub eq: Vec<f32>,
    /// Reverb and spatial parameters.
    pub spatial: SpatialParams,
    /// Loudness, dynamics, and coloration parameters.
    pub enhance: EnhanceParams,
    /// Tone-shaping parameters.
    pub tone: ToneParams,
}

impl Default for Preset {
    fn default() -> Self {
        let state = ControlState::default();
        Self {
            mode: state.mode,
            eq: state.eq,
            spatial: state.spatial,
            enhance: state.enhance,
            tone: state.tone,
        }
    }
}

impl Preset {
    /// Copy this preset's settings onto a control state, leaving `enabled`
    /// untouched.
    pub fn apply_to(&self, state: &mut ControlState) {
        state.mode = self.mode;
        state.eq = self.eq.clone();
        state.spatial = self.spatial.clone();
        state.enhance = self.enhance.clone();
        state.tone = self.tone.clone();
    }
}

/// Names of the factory presets, in catalog order.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "flat",
    "bass-heavy",
    "bright",
    "warm",
    "vocal",
    "podcast",
    "lofi",
    "cinema",
    "night",
];

/// Embedded JSON sources for the factory catalog.
static FACTORY_PRESETS: &[(&str, &str)] = &[
    ("flat", FLAT_PRESET),
    ("bass-heavy", BASS_HEAVY_PRESET),
    ("bright", BRIGHT_PRESET),
    ("warm", WARM_PRESET),
    ("vocal", VOCAL_PRESET),
    ("podcast", PODCAST_PRESET),
    ("lofi", LOFI_PRESET),
    ("cinema", CINEMA_PRESET),
    ("night", NIGHT_PRESET),
];

/// Look up and decode a factory preset by name.
pub fn factory_preset(name: &str) -> Result<Preset, StateError> {
    let (_, json) = FACTORY_PRESETS
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| StateError::PresetNotFound(name.to_string()))?;
    Ok(serde_json::from_str(json)?)
}

/// Neutral reference: everything flat, effects parked.
const FLAT_PRESET: &str = r#"{
  "mode": "default",
  "eq": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
  "spatial": {"roomSize": 0, "reverbDecay": 0, "wetDry": 0, "stereoWidth": 100,
              "depth16d": 0, "preDelay": 0, "spatialSpread": 0, "earlyRef": 0, "crossfeed": 0},
  "enhance": {"masterVol": 100, "balance": 0, "compThreshold": -24, "compRatio": 4,
              "compAttack": 3, "compRelease": 250, "clarity": 0, "warmth": 22000,
              "loudnessNorm": false, "monoCompat": false, "analogWarmth": false,
              "noiseGate": false, "speed": 100, "pitch": 0},
  "tone": {"subBass": 0, "presence": 0, "air": 0}
}"#;

/// Low-end emphasis with gentle compression and tape-style coloration.
const BASS_HEAVY_PRESET: &str = r#"{
  "mode": "default",
  "eq": [9, 8, 6, 4, 1, 0, 0, -1, 0, 1],
  "spatial": {"roomSize": 35, "reverbDecay": 20, "wetDry": 15, "stereoWidth": 120,
              "depth16d": 30, "preDelay": 8, "spatialSpread": 40, "earlyRef": 20, "crossfeed": 10},
  "enhance": {"masterVol": 105, "balance": 0, "compThreshold": -20, "compRatio": 5,
              "compAttack": 5, "compRelease": 200, "clarity": 0, "warmth": 22000,
              "loudnessNorm": false, "monoCompat": false, "analogWarmth": true,
              "noiseGate": false, "speed": 100, "pitch": 0},
  "tone": {"subBass": 8, "presence": 0, "air": 0}
}"#;

/// Lifted top end, wide image, touch of rumble cut.
const BRIGHT_PRESET: &str = r#"{
  "mode": "default",
  "eq": [-2, -1, 0, 0, 1, 2, 4, 6, 7, 8],
  "spatial": {"roomSize": 25, "reverbDecay": 15, "wetDry": 18, "stereoWidth": 130,
              "depth16d": 20, "preDelay": 5, "spatialSpread": 50, "earlyRef": 30, "crossfeed": 15},
  "enhance": {"masterVol": 100, "balance": 0, "compThreshold": -22, "compRatio": 3,
              "compAttack": 3, "compRelease": 250, "clarity": 30, "warmth": 22000,
              "loudnessNorm": false, "monoCompat": false, "analogWarmth": false,
              "noiseGate": false, "speed": 100, "pitch": 0},
  "tone": {"subBass": 0, "presence": 3, "air": 6}
}"#;

/// Rolled-off highs, mid warmth, roomier reverb.
const WARM_PRESET: &str = r#"{
  "mode": "default",
  "eq": [4, 3, 2, 1, 0, -1, -2, -1, 0, 0],
  "spatial": {"roomSize": 45, "reverbDecay": 35, "wetDry": 30, "stereoWidth": 100,
              "depth16d": 40, "preDelay": 18, "spatialSpread": 55, "earlyRef": 40, "crossfeed": 25},
  "enhance": {"masterVol": 100, "balance": 0, "compThreshold": -22, "compRatio": 4,
              "compAttack": 5, "compRelease": 300, "clarity": 0, "warmth": 14000,
              "loudnessNorm": false, "monoCompat": false, "analogWarmth": true,
              "noiseGate": false, "speed": 100, "pitch": 0},
  "tone": {"subBass": 3, "presence": -2, "air": 0}
}"#;

/// Midrange focus for voice, vocal mode imaging.
const VOCAL_PRESET: &str = r#"{
  "mode": "vocal",
  "eq": [0, -1, -2, 2, 5, 6, 5, 3, 1, 0],
  "spatial": {"roomSize": 20, "reverbDecay": 10, "wetDry": 12, "stereoWidth": 90,
              "depth16d": 15, "preDelay": 4, "spatialSpread": 30, "earlyRef": 15, "crossfeed": 20},
  "enhance": {"masterVol": 100, "balance": 0, "compThreshold": -18, "compRatio": 3,
              "compAttack": 2, "compRelease": 200, "clarity": 80, "warmth": 18000,
              "loudnessNorm": false, "monoCompat": false, "analogWarmth": false,
              "noiseGate": false, "speed": 100, "pitch": 0},
  "tone": {"subBass": 0, "presence": 4, "air": 2}
}"#;

/// Speech intelligibility: tight dynamics, gate, loudness floor.
const PODCAST_PRESET: &str = r#"{
  "mode": "studio",
  "eq": [-4, -3, 0, 4, 5, 6, 4, 2, 0, -2],
  "spatial": {"roomSize": 8, "reverbDecay": 5, "wetDry": 5, "stereoWidth": 80,
              "depth16d": 5, "preDelay": 2, "spatialSpread": 10, "earlyRef": 5, "crossfeed": 30},
  "enhance": {"masterVol": 115, "balance": 0, "compThreshold": -15, "compRatio": 8,
              "compAttack": 1, "compRelease": 150, "clarity": 120, "warmth": 16000,
              "loudnessNorm": true, "monoCompat": false, "analogWarmth": false,
              "noiseGate": true, "speed": 100, "pitch": 0},
  "tone": {"subBass": 0, "presence": 5, "air": 0}
}"#;

/// Dusty top end, slow compression, saturated mids.
const LOFI_PRESET: &str = r#"{
  "mode": "default",
  "eq": [3, 2, 0, -1, -2, -1, 0, -2, -3, -4],
  "spatial": {"roomSize": 55, "reverbDecay": 40, "wetDry": 35, "stereoWidth": 85,
              "depth16d": 30, "preDelay": 25, "spatialSpread": 40, "earlyRef": 45, "crossfeed": 35},
  "enhance": {"masterVol": 95, "balance": 0, "compThreshold": -20, "compRatio": 6,
              "compAttack": 10, "compRelease": 400, "clarity": 0, "warmth": 10000,
              "loudnessNorm": false, "monoCompat": false, "analogWarmth": true,
              "noiseGate": false, "speed": 100, "pitch": 0},
  "tone": {"subBass": 4, "presence": -3, "air": 0}
}"#;

/// Wide 16-direction field with big-room reverb.
const CINEMA_PRESET: &str = r#"{
  "mode": "16d",
  "eq": [5, 4, 2, 0, -1, 0, 2, 4, 5, 4],
  "spatial": {"roomSize": 70, "reverbDecay": 50, "wetDry": 40, "stereoWidth": 160,
              "depth16d": 70, "preDelay": 20, "spatialSpread": 120, "earlyRef": 50, "crossfeed": 10},
  "enhance": {"masterVol": 110, "balance": 0, "compThreshold": -28, "compRatio": 5,
              "compAttack": 5, "compRelease": 300, "clarity": 20, "warmth": 20000,
              "loudnessNorm": true, "monoCompat": false, "analogWarmth": false,
              "noiseGate": false, "speed": 100, "pitch": 0},
  "tone": {"subBass": 6, "presence": 2, "air": 4}
}"#;

/// Late-night listening: reduced level, heavy limiting, soft highs.
const NIGHT_PRESET: &str = r#"{
  "mode": "default",
  "eq": [2, 1, 0, 0, 0, 0, 0, -1, -2, -3],
  "spatial": {"roomSize": 30, "reverbDecay": 20, "wetDry": 20, "stereoWidth": 90,
              "depth16d": 20, "preDelay": 10, "spatialSpread": 30, "earlyRef": 20, "crossfeed": 30},
  "enhance": {"masterVol": 80, "balance": 0, "compThreshold": -12, "compRatio": 12,
              "compAttack": 1, "compRelease": 100, "clarity": 0, "warmth": 12000,
              "loudnessNorm": true, "monoCompat": false, "analogWarmth": true,
              "noiseGate": true, "speed": 100, "pitch": 0},
  "tone": {"subBass": 2, "presence": 0, "air": 0}
}"#;
