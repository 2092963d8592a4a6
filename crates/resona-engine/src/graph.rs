//! The fixed audio-effects graph.
//!
//! [`AudioGraph`] owns every node the engine parameterizes, plus a
//! [`Topology`] recording how the host should wire them. Construction
//! happens exactly once per media attachment; after that only parameter
//! values change. The wiring is:
//!
//! ```text
//! source → highPass → lowPass → eq[0..9] → subBass → presence → air
//!        → comp → gate → masterGain → balancePan
//!        → crossfeed matrix (splitter → direct/cross gains → merger)
//!        → warmth mix (dry + waveshaper → merge)
//!        → { dry, convolver wet, 16 spatial branches, 6 early branches }
//!        → outputGain → destination
//! ```
//!
//! The spatial and early-reflection branches each tap the signal after the
//! warmth stage and sum independently into the output gain: parallel, never
//! serial.

use resona_core::{
    ConvolverNode, DelayNode, DynamicsNode, FilterKind, FilterNode, GainNode, GraphError, NodeId,
    Oversample, PannerNode, Topology, WaveshaperNode,
};

use crate::render;

/// EQ band center frequencies in Hz, ascending.
pub const EQ_CENTER_FREQUENCIES: [f32; 10] = [
    31.0, 62.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
];

/// Number of parallel spatial delay/gain/pan branches.
pub const SPATIAL_BRANCHES: usize = 16;

/// Number of parallel early-reflection delay/gain branches.
pub const EARLY_BRANCHES: usize = 6;

/// Q for the peaking EQ bands.
const EQ_BAND_Q: f32 = 1.4;

/// Maximum spatial branch delay in seconds.
const SPATIAL_MAX_DELAY: f32 = 0.15;

/// Maximum early-reflection delay in seconds.
const EARLY_MAX_DELAY: f32 = 0.06;

/// One spatial branch: delay → gain → pan, summing into the output.
#[derive(Debug, Clone)]
pub struct SpatialBranch {
    /// Branch micro-delay.
    pub delay: DelayNode,
    /// Branch level.
    pub gain: GainNode,
    /// Branch direction.
    pub pan: PannerNode,
}

/// One early-reflection branch: delay → gain, summing into the output.
#[derive(Debug, Clone)]
pub struct EarlyBranch {
    /// Reflection delay.
    pub delay: DelayNode,
    /// Reflection level.
    pub gain: GainNode,
}

/// Topology ids for every node, for wiring introspection.
///
/// Labels are not unique across arrayed branches; the [`NodeId`] is the
/// identity.
#[derive(Debug, Clone)]
pub struct GraphHandles {
    /// Media source tap.
    pub source: NodeId,
    /// Rumble-cut high-pass.
    pub high_pass: NodeId,
    /// Top-end low-pass.
    pub low_pass: NodeId,
    /// Ten peaking EQ bands, ascending frequency.
    pub eq: [NodeId; 10],
    /// Sub-bass low shelf.
    pub sub_bass: NodeId,
    /// Presence peak.
    pub presence: NodeId,
    /// Air high shelf.
    pub air: NodeId,
    /// Main compressor.
    pub comp: NodeId,
    /// Gate-emulating dynamics stage.
    pub gate: NodeId,
    /// Master gain.
    pub master_gain: NodeId,
    /// Balance panner.
    pub balance_pan: NodeId,
    /// Crossfeed channel splitter.
    pub cross_splitter: NodeId,
    /// Left direct gain.
    pub direct_l: NodeId,
    /// Right direct gain.
    pub direct_r: NodeId,
    /// Left-into-right leakage gain.
    pub cross_l2r: NodeId,
    /// Right-into-left leakage gain.
    pub cross_r2l: NodeId,
    /// Crossfeed channel merger.
    pub cross_merger: NodeId,
    /// Warmth waveshaper.
    pub waveshaper: NodeId,
    /// Warmth dry gain.
    pub warmth_dry: NodeId,
    /// Warmth wet gain.
    pub warmth_mix: NodeId,
    /// Warmth sum.
    pub warmth_merge: NodeId,
    /// Reverb convolver.
    pub convolver: NodeId,
    /// Reverb wet gain.
    pub wet_gain: NodeId,
    /// Reverb-bypassing dry gain.
    pub dry_gain: NodeId,
    /// Spatial branch delays.
    pub spatial_delays: [NodeId; SPATIAL_BRANCHES],
    /// Spatial branch gains.
    pub spatial_gains: [NodeId; SPATIAL_BRANCHES],
    /// Spatial branch panners.
    pub spatial_pans: [NodeId; SPATIAL_BRANCHES],
    /// Early-reflection delays.
    pub early_delays: [NodeId; EARLY_BRANCHES],
    /// Early-reflection gains.
    pub early_gains: [NodeId; EARLY_BRANCHES],
    /// Final output gain.
    pub output_gain: NodeId,
    /// Host destination.
    pub destination: NodeId,
}

/// The complete effects graph for one attached media source.
///
/// Topology is immutable after [`build`](Self::build); the mapper only
/// writes parameter targets. A navigation discards the whole instance.
pub struct AudioGraph {
    sample_rate: f32,
    topology: Topology,
    handles: GraphHandles,

    /// Rumble-cut high-pass (clarity).
    pub high_pass: FilterNode,
    /// Top-end low-pass (warmth rolloff).
    pub low_pass: FilterNode,
    /// Ten peaking EQ bands, ascending frequency.
    pub eq: [FilterNode; 10],
    /// Sub-bass low shelf at 60 Hz.
    pub sub_bass: FilterNode,
    /// Presence peak at 3 kHz.
    pub presence: FilterNode,
    /// Air high shelf at 12 kHz.
    pub air: FilterNode,
    /// Main compressor.
    pub comp: DynamicsNode,
    /// Gate-emulating dynamics stage.
    pub gate: DynamicsNode,
    /// Master gain.
    pub master_gain: GainNode,
    /// Balance panner.
    pub balance_pan: PannerNode,
    /// Left direct gain of the crossfeed matrix.
    pub direct_l: GainNode,
    /// Right direct gain of the crossfeed matrix.
    pub direct_r: GainNode,
    /// Left-into-right crossfeed leakage.
    pub cross_l2r: GainNode,
    /// Right-into-left crossfeed leakage.
    pub cross_r2l: GainNode,
    /// Warmth waveshaper.
    pub waveshaper: WaveshaperNode,
    /// Warmth dry gain.
    pub warmth_dry: GainNode,
    /// Warmth wet gain.
    pub warmth_mix: GainNode,
    /// Reverb convolver.
    pub convolver: ConvolverNode,
    /// Reverb wet gain.
    pub wet_gain: GainNode,
    /// Reverb-bypassing dry gain.
    pub dry_gain: GainNode,
    /// Sixteen parallel spatial branches.
    pub spatial: [SpatialBranch; SPATIAL_BRANCHES],
    /// Six parallel early-reflection branches.
    pub early: [EarlyBranch; EARLY_BRANCHES],
    /// Final output gain.
    pub output_gain: GainNode,
}

impl AudioGraph {
    /// Construct the fixed graph at the given sample rate.
    ///
    /// Every node starts at its neutral value (filters at pass-all extremes,
    /// gains at bypass levels, spatial branches silent), so an unmapped
    /// graph is audibly transparent apart from the host's own latency.
    pub fn build(sample_rate: f32) -> Result<Self, GraphError> {
        let mut topo = Topology::new();

        let source = topo.add("source");
        let high_pass_id = topo.add("highPass");
        let low_pass_id = topo.add("lowPass");
        let eq_ids: [NodeId; 10] = core::array::from_fn(|_| topo.add("eqBand"));
        let sub_bass_id = topo.add("subBass");
        let presence_id = topo.add("presence");
        let air_id = topo.add("air");
        let comp_id = topo.add("comp");
        let gate_id = topo.add("gate");
        let master_gain_id = topo.add("masterGain");
        let balance_pan_id = topo.add("balancePan");
        let cross_splitter = topo.add("crossSplitter");
        let direct_l_id = topo.add("directL");
        let direct_r_id = topo.add("directR");
        let cross_l2r_id = topo.add("crossL2R");
        let cross_r2l_id = topo.add("crossR2L");
        let cross_merger = topo.add("crossMerger");
        let waveshaper_id = topo.add("waveshaper");
        let warmth_dry_id = topo.add("warmthDry");
        let warmth_mix_id = topo.add("warmthMix");
        let warmth_merge = topo.add("warmthMerge");
        let convolver_id = topo.add("convolver");
        let wet_gain_id = topo.add("wetGain");
        let dry_gain_id = topo.add("dryGain");
        let spatial_delays: [NodeId; SPATIAL_BRANCHES] =
            core::array::from_fn(|_| topo.add("spatialDelay"));
        let spatial_gains: [NodeId; SPATIAL_BRANCHES] =
            core::array::from_fn(|_| topo.add("spatialGain"));
        let spatial_pans: [NodeId; SPATIAL_BRANCHES] =
            core::array::from_fn(|_| topo.add("spatialPan"));
        let early_delays: [NodeId; EARLY_BRANCHES] =
            core::array::from_fn(|_| topo.add("earlyDelay"));
        let early_gains: [NodeId; EARLY_BRANCHES] =
            core::array::from_fn(|_| topo.add("earlyGain"));
        let output_gain_id = topo.add("outputGain");
        let destination = topo.add("destination");

        // Serial front chain through the balance panner.
        let mut chain = source;
        for next in [high_pass_id, low_pass_id]
            .into_iter()
            .chain(eq_ids)
            .chain([
                sub_bass_id,
                presence_id,
                air_id,
                comp_id,
                gate_id,
                master_gain_id,
                balance_pan_id,
            ])
        {
            topo.connect(chain, next)?;
            chain = next;
        }

        // Crossfeed matrix: split, direct + leakage gains, merge.
        topo.connect(balance_pan_id, cross_splitter)?;
        topo.connect(cross_splitter, direct_l_id)?;
        topo.connect(cross_splitter, direct_r_id)?;
        topo.connect(cross_splitter, cross_l2r_id)?;
        topo.connect(cross_splitter, cross_r2l_id)?;
        topo.connect(direct_l_id, cross_merger)?;
        topo.connect(cross_r2l_id, cross_merger)?;
        topo.connect(direct_r_id, cross_merger)?;
        topo.connect(cross_l2r_id, cross_merger)?;

        // Warmth: dry path plus shaped path summed.
        topo.connect(cross_merger, warmth_dry_id)?;
        topo.connect(cross_merger, waveshaper_id)?;
        topo.connect(waveshaper_id, warmth_mix_id)?;
        topo.connect(warmth_dry_id, warmth_merge)?;
        topo.connect(warmth_mix_id, warmth_merge)?;

        // Dry path into the output.
        topo.connect(warmth_merge, dry_gain_id)?;
        topo.connect(dry_gain_id, output_gain_id)?;

        // Reverb wet path.
        topo.connect(warmth_merge, convolver_id)?;
        topo.connect(convolver_id, wet_gain_id)?;
        topo.connect(wet_gain_id, output_gain_id)?;

        // Sixteen parallel spatial branches.
        for i in 0..SPATIAL_BRANCHES {
            topo.connect(warmth_merge, spatial_delays[i])?;
            topo.connect(spatial_delays[i], spatial_gains[i])?;
            topo.connect(spatial_gains[i], spatial_pans[i])?;
            topo.connect(spatial_pans[i], output_gain_id)?;
        }

        // Six parallel early reflections.
        for i in 0..EARLY_BRANCHES {
            topo.connect(warmth_merge, early_delays[i])?;
            topo.connect(early_delays[i], early_gains[i])?;
            topo.connect(early_gains[i], output_gain_id)?;
        }

        topo.connect(output_gain_id, destination)?;

        let mut convolver = ConvolverNode::new();
        convolver.impulse = render::synthesize_impulse(2, sample_rate, 0.5).ok();
        let mut waveshaper = WaveshaperNode::new(Oversample::FourX);
        waveshaper.curve = Some(render::warmth_curve(0.0));

        let spatial: [SpatialBranch; SPATIAL_BRANCHES] = core::array::from_fn(|i| SpatialBranch {
            delay: DelayNode::new(SPATIAL_MAX_DELAY, sample_rate),
            gain: GainNode::new(0.0, sample_rate),
            // Fan the idle pan positions evenly across the field.
            pan: PannerNode::new(-1.0 + (i as f32 / 15.0) * 2.0, sample_rate),
        });
        let early: [EarlyBranch; EARLY_BRANCHES] = core::array::from_fn(|i| {
            let mut delay = DelayNode::new(EARLY_MAX_DELAY, sample_rate);
            delay
                .delay_seconds
                .set_immediate(0.005 + i as f32 * 0.008);
            EarlyBranch {
                delay,
                gain: GainNode::new(0.0, sample_rate),
            }
        });

        Ok(Self {
            sample_rate,
            topology: topo,
            handles: GraphHandles {
                source,
                high_pass: high_pass_id,
                low_pass: low_pass_id,
                eq: eq_ids,
                sub_bass: sub_bass_id,
                presence: presence_id,
                air: air_id,
                comp: comp_id,
                gate: gate_id,
                master_gain: master_gain_id,
                balance_pan: balance_pan_id,
                cross_splitter,
                direct_l: direct_l_id,
                direct_r: direct_r_id,
                cross_l2r: cross_l2r_id,
                cross_r2l: cross_r2l_id,
                cross_merger,
                waveshaper: waveshaper_id,
                warmth_dry: warmth_dry_id,
                warmth_mix: warmth_mix_id,
                warmth_merge,
                convolver: convolver_id,
                wet_gain: wet_gain_id,
                dry_gain: dry_gain_id,
                spatial_delays,
                spatial_gains,
                spatial_pans,
                early_delays,
                early_gains,
                output_gain: output_gain_id,
                destination,
            },
            high_pass: FilterNode::new(FilterKind::Highpass, 0.0, 0.707, sample_rate),
            low_pass: FilterNode::new(FilterKind::Lowpass, 22000.0, 0.707, sample_rate),
            eq: core::array::from_fn(|i| {
                FilterNode::new(
                    FilterKind::Peaking,
                    EQ_CENTER_FREQUENCIES[i],
                    EQ_BAND_Q,
                    sample_rate,
                )
            }),
            sub_bass: FilterNode::new(FilterKind::LowShelf, 60.0, 0.707, sample_rate),
            presence: FilterNode::new(FilterKind::Peaking, 3000.0, 1.0, sample_rate),
            air: FilterNode::new(FilterKind::HighShelf, 12000.0, 0.707, sample_rate),
            comp: DynamicsNode::new(-24.0, 12.0, 4.0, 0.003, 0.25, sample_rate),
            gate: DynamicsNode::new(-50.0, 0.0, 1.0, 0.001, 0.05, sample_rate),
            master_gain: GainNode::new(1.0, sample_rate),
            balance_pan: PannerNode::new(0.0, sample_rate),
            direct_l: GainNode::new(1.0, sample_rate),
            direct_r: GainNode::new(1.0, sample_rate),
            cross_l2r: GainNode::new(0.0, sample_rate),
            cross_r2l: GainNode::new(0.0, sample_rate),
            waveshaper,
            warmth_dry: GainNode::new(1.0, sample_rate),
            warmth_mix: GainNode::new(0.0, sample_rate),
            convolver,
            wet_gain: GainNode::new(0.0, sample_rate),
            dry_gain: GainNode::new(1.0, sample_rate),
            spatial,
            early,
            output_gain: GainNode::new(1.0, sample_rate),
        })
    }

    /// Sample rate the graph was built at.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The declarative wiring.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Topology ids for every node.
    pub fn handles(&self) -> &GraphHandles {
        &self.handles
    }

    /// Advance every automated parameter by one control block.
    pub fn advance(&mut self, samples: u32) {
        self.high_pass.advance_by(samples);
        self.low_pass.advance_by(samples);
        for band in &mut self.eq {
            band.advance_by(samples);
        }
        self.sub_bass.advance_by(samples);
        self.presence.advance_by(samples);
        self.air.advance_by(samples);
        self.comp.advance_by(samples);
        self.gate.advance_by(samples);
        self.master_gain.advance_by(samples);
        self.balance_pan.advance_by(samples);
        self.direct_l.advance_by(samples);
        self.direct_r.advance_by(samples);
        self.cross_l2r.advance_by(samples);
        self.cross_r2l.advance_by(samples);
        self.warmth_dry.advance_by(samples);
        self.warmth_mix.advance_by(samples);
        self.wet_gain.advance_by(samples);
        self.dry_gain.advance_by(samples);
        for branch in &mut self.spatial {
            branch.delay.advance_by(samples);
            branch.gain.advance_by(samples);
            branch.pan.advance_by(samples);
        }
        for branch in &mut self.early {
            branch.delay.advance_by(samples);
            branch.gain.advance_by(samples);
        }
        self.output_gain.advance_by(samples);
    }
}
