use ndarray_npy::ReadNpyError;
use std::path::PathBuf;
use thiserror::Error;

/// Conditions a caller may want to branch on. Functions in this crate return
/// `anyhow::Error`; use `err.downcast_ref::<EphysError>()` to recover these.
#[derive(Debug, Error)]
pub enum EphysError {
    /// A required input file does not exist
    #[error("required file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// The file exists but could not be parsed as an `.npy` array
    #[error("could not read array from {}", .path.display())]
    Malformed {
        /// offending file
        path: PathBuf,
        /// parse failure reported by ndarray-npy
        #[source]
        source: ReadNpyError,
    },

    /// The file's values cannot be held exactly by the element type they are loaded as
    #[error("{}: {source_type} values do not fit in {target_type}", .path.display())]
    Unrepresentable {
        /// offending file
        path: PathBuf,
        /// element type on disk
        source_type: &'static str,
        /// element type requested
        target_type: &'static str,
    },

    /// The array was read but has the wrong number of dimensions
    #[error("{}: expected a {expected}-d array, found shape {found:?}", .path.display())]
    WrongShape {
        /// offending file
        path: PathBuf,
        /// required number of axes
        expected: usize,
        /// shape found on disk
        found: Vec<usize>,
    },

    /// The inverse whitening matrix does not act on the templates' channel axis
    #[error("templates have {channels} channels but whitening_mat_inv has shape {rows}x{cols}")]
    WhiteningShape {
        /// channel count of the templates
        channels: usize,
        /// rows of the inverse whitening matrix
        rows: usize,
        /// columns of the inverse whitening matrix
        cols: usize,
    },

    /// Neither `imDatPrb_type` nor `imProbeOpt` is present in the metadata
    #[error("can not find imDatPrb_type or imProbeOpt in meta file")]
    MissingProbeKey,

    /// The probe type is not in either known hardware family
    #[error(
        "probe type {0:?} is not one of the known values, please raise an issue or supply the \
         scaling factor manually"
    )]
    UnknownProbe(String),

    /// A metadata directory holds no `.meta` file
    #[error("no .meta file found in {}", .0.display())]
    MissingMeta(PathBuf),
}
