//! Loading of a Kilosort-style results directory.
//!
//! All indices are read as the sorter wrote them (zero-based); no offset is applied.

use crate::npy::read_array;
use crate::EphysError;
use anyhow::Error;
use ephys_types::{EphysData, PcFeatures};
use log::{debug, info};
use ndarray::{Array1, Array2, Array3, ArrayView2, ArrayView3, Zip};
use std::path::{Path, PathBuf};

/// Template id per spike
pub const SPIKE_TEMPLATES: &str = "spike_templates.npy";
/// Cluster id per spike. Newer sorters only write this one, with clusters == templates.
pub const SPIKE_CLUSTERS: &str = "spike_clusters.npy";
/// Drift/clock corrected spike times, in samples
pub const SPIKE_TIMES_CORRECTED: &str = "spike_times_corrected.npy";
/// Raw spike times, in samples
pub const SPIKE_TIMES: &str = "spike_times.npy";
/// Per-spike amplitudes
pub const AMPLITUDES: &str = "amplitudes.npy";
/// Whitened template waveforms
pub const TEMPLATES: &str = "templates.npy";
/// Inverse whitening matrix, `(n_channels, n_channels)`
pub const WHITENING_MAT_INV: &str = "whitening_mat_inv.npy";
/// Optional PC projections per spike
pub const PC_FEATURES: &str = "pc_features.npy";
/// Channels of each PC projection column, required if `PC_FEATURES` exists
pub const PC_FEATURE_IND: &str = "pc_feature_ind.npy";
/// x/y position of each channel
pub const CHANNEL_POSITIONS: &str = "channel_positions.npy";
/// Channels kept by the sorter
pub const CHANNEL_MAP: &str = "channel_map.npy";

fn preferred(dir: &Path, primary: &str, fallback: &str) -> PathBuf {
    let path = dir.join(primary);
    if path.is_file() {
        path
    } else {
        info!("{} not found, using {}", primary, fallback);
        dir.join(fallback)
    }
}

/// Load the arrays the quality-control stage needs from the sorter output in `results_path`.
///
/// Fails with [`EphysError::MissingFile`] if any required file is absent and with
/// [`EphysError::Malformed`]/[`EphysError::WrongShape`] if one cannot be read. The PC feature
/// pair is optional and comes back as `None` when `pc_features.npy` does not exist.
pub fn load_ephys_data(results_path: impl AsRef<Path>) -> Result<EphysData, Error> {
    let dir = results_path.as_ref();

    let spike_templates: Array1<i64> = read_array(preferred(dir, SPIKE_TEMPLATES, SPIKE_CLUSTERS))?;
    let spike_times: Array1<i64> = read_array(preferred(dir, SPIKE_TIMES_CORRECTED, SPIKE_TIMES))?;
    let amplitudes: Array1<f64> = read_array(dir.join(AMPLITUDES))?;

    let whitened: Array3<f64> = read_array(dir.join(TEMPLATES))?;
    let winv: Array2<f64> = read_array(dir.join(WHITENING_MAT_INV))?;
    let template_waveforms = unwhiten_templates(whitened.view(), winv.view())?;

    let pc_features = load_pc_features(dir)?;

    let channel_positions: Array2<f64> = read_array(dir.join(CHANNEL_POSITIONS))?;
    let good_channels: Array1<i64> = read_array(dir.join(CHANNEL_MAP))?;

    debug!(
        "loaded {} spikes, templates {:?}, {} good channels",
        spike_times.len(),
        template_waveforms.shape(),
        good_channels.len()
    );

    Ok(EphysData {
        spike_times,
        spike_templates,
        template_waveforms,
        amplitudes,
        pc_features,
        channel_positions,
        good_channels,
    })
}

fn load_pc_features(dir: &Path) -> Result<Option<PcFeatures>, Error> {
    let features_path = dir.join(PC_FEATURES);
    if !features_path.is_file() {
        info!("{} not found, PC features unavailable", PC_FEATURES);
        return Ok(None);
    }

    let features: Array3<f64> = read_array(features_path)?;
    let feature_index: Array2<i64> = read_array(dir.join(PC_FEATURE_IND))?;
    Ok(Some(PcFeatures {
        features,
        feature_index,
    }))
}

/// Map whitened templates `(n_templates, n_time, n_channels)` back to voltage space:
/// `out[i] = whitened[i] . winv` for every template `i` independently.
pub fn unwhiten_templates(whitened: ArrayView3<f64>, winv: ArrayView2<f64>) -> Result<Array3<f64>, Error> {
    let (n_templates, n_time, n_channels) = whitened.dim();
    let (rows, cols) = winv.dim();
    if rows != n_channels {
        return Err(EphysError::WhiteningShape {
            channels: n_channels,
            rows,
            cols,
        }
        .into());
    }

    let mut unwhitened = Array3::<f64>::zeros((n_templates, n_time, cols));
    Zip::from(unwhitened.outer_iter_mut())
        .and(whitened.outer_iter())
        .par_for_each(|mut out, template| out.assign(&template.dot(&winv)));
    Ok(unwhitened)
}
