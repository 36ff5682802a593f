use ndarray::{Array1, Array2, Array3};

/// Principal-component projections of each spike, together with the channels
/// that contribute to each projection column. The two arrays only ever exist as a pair.
#[derive(Clone, Debug, PartialEq)]
pub struct PcFeatures {
    /// `(n_spikes, n_features_per_channel, n_pc_features)`
    pub features: Array3<f64>,
    /// `(n_templates, n_pc_features)`
    pub feature_index: Array2<i64>,
}

/// Everything the quality-control stage needs from one sorting run.
///
/// Indices (template ids, channel ids) are zero-based as written by the sorter.
#[derive(Clone, Debug, PartialEq)]
pub struct EphysData {
    /// Spike times in samples, not seconds
    pub spike_times: Array1<i64>,
    /// Template (or cluster) id of each spike
    pub spike_templates: Array1<i64>,
    /// Un-whitened template waveforms, `(n_templates, n_time_points, n_channels)`
    pub template_waveforms: Array3<f64>,
    /// Per-spike amplitude
    pub amplitudes: Array1<f64>,
    /// `None` when the sorter did not write PC features
    pub pc_features: Option<PcFeatures>,
    /// x/y coordinate per channel, `(n_channels, 2)`
    pub channel_positions: Array2<f64>,
    /// Channels retained by the sorter
    pub good_channels: Array1<i64>,
}

/// Tuple form of [`EphysData`], in load order.
pub type EphysParts = (
    Array1<i64>,
    Array1<i64>,
    Array3<f64>,
    Array1<f64>,
    Option<Array3<f64>>,
    Option<Array2<i64>>,
    Array2<f64>,
    Array1<i64>,
);

impl EphysData {
    /// Number of detected spikes
    pub fn n_spikes(&self) -> usize {
        self.spike_times.len()
    }

    /// Number of templates
    pub fn n_templates(&self) -> usize {
        self.template_waveforms.shape()[0]
    }

    /// Number of channels in the template waveforms
    pub fn n_channels(&self) -> usize {
        self.template_waveforms.shape()[2]
    }

    /// Split into the individual arrays. The two PC outputs are both `Some` or both `None`.
    pub fn into_parts(self) -> EphysParts {
        let (pc_features, pc_feature_index) = match self.pc_features {
            Some(pc) => (Some(pc.features), Some(pc.feature_index)),
            None => (None, None),
        };
        (
            self.spike_times,
            self.spike_templates,
            self.template_waveforms,
            self.amplitudes,
            pc_features,
            pc_feature_index,
            self.channel_positions,
            self.good_channels,
        )
    }
}
