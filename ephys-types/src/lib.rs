//! # ephys-types: in-memory model of spike-sorting output

#![deny(missing_docs)]
#![deny(warnings)]

/// Arrays loaded from a spike-sorting results directory
pub mod ephys_data;

/// Neuropixels probe families and their digitization constants
pub mod probe;

pub use ephys_data::{EphysData, PcFeatures};
pub use probe::{ProbeFamily, ProbeGain};
