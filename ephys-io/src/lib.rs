//! # ephys-io: loading spike-sorting output and SpikeGLX metadata

#![deny(missing_docs)]
#![deny(warnings)]

/// Failure conditions of the loaders
pub mod error;

/// Probe scaling factor from SpikeGLX metadata
pub mod gain;

/// SpikeGLX `.meta` parsing
pub mod meta;

/// dtype-tolerant `.npy` reading
pub mod npy;

/// Results directory loading and template un-whitening
pub mod results;

pub use ephys_types::{EphysData, PcFeatures, ProbeFamily, ProbeGain};
pub use error::EphysError;
pub use gain::get_gain_spikeglx;
pub use results::{load_ephys_data, unwhiten_templates};
