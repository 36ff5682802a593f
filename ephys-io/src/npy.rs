//! Sorter versions disagree on dtypes (`spike_times` as `uint64` or `int64`, `whitening_mat_inv`
//! as `float32` or `float64`, ...) and sometimes store 1-d quantities as `(n, 1)` columns.
//! [`read_array`] hides both differences behind the element type and rank the caller asks for.

use crate::error::EphysError;
use anyhow::Error;
use ndarray::{Array, ArrayD, Axis, Dimension, Zip};
use ndarray_npy::{read_npy, ReadNpyError};
use num_traits::NumCast;
use std::path::Path;

/// Element types a `.npy` file can be coerced to on load
pub trait NpyTarget: Sized {
    /// Read `path` as an n-d array of `Self`, casting from whichever numeric dtype it holds.
    /// Values that do not survive the cast unchanged are an error.
    fn read_dyn(path: &Path) -> Result<ArrayD<Self>, EphysError>;
}

/// `v` as a `T`, only if converting back yields `v` again (NaN passes through).
fn exact_cast<S, T>(v: S) -> Option<T>
where
    S: NumCast + Copy + PartialOrd,
    T: NumCast + Copy,
{
    let out = T::from(v)?;
    let back = S::from(out)?;
    (back == v || v.partial_cmp(&v).is_none()).then_some(out)
}

fn cast_array<S, T>(path: &Path, arr: ArrayD<S>) -> Result<ArrayD<T>, EphysError>
where
    S: NumCast + Copy + PartialOrd,
    T: NumCast + Copy + num_traits::Zero,
{
    let mut out = ArrayD::<T>::zeros(arr.raw_dim());
    let mut exact = true;
    Zip::from(&mut out).and(&arr).for_each(|o, &v| match exact_cast(v) {
        Some(c) => *o = c,
        None => exact = false,
    });
    if exact {
        Ok(out)
    } else {
        Err(EphysError::Unrepresentable {
            path: path.to_path_buf(),
            source_type: std::any::type_name::<S>(),
            target_type: std::any::type_name::<T>(),
        })
    }
}

macro_rules! npy_target {
    ($t:ty; $($src:ty),*) => {
        impl NpyTarget for $t {
            fn read_dyn(path: &Path) -> Result<ArrayD<$t>, EphysError> {
                let malformed = |source: ReadNpyError| EphysError::Malformed {
                    path: path.to_path_buf(),
                    source,
                };
                let native_err = match read_npy::<_, ArrayD<$t>>(path) {
                    Err(e @ ReadNpyError::WrongDescriptor(_)) => e,
                    r => return r.map_err(malformed),
                };
                $(
                    match read_npy::<_, ArrayD<$src>>(path) {
                        Ok(a) => return cast_array::<$src, $t>(path, a),
                        Err(ReadNpyError::WrongDescriptor(_)) => {}
                        Err(e) => return Err(malformed(e)),
                    }
                )*
                Err(malformed(native_err))
            }
        }
    };
}

npy_target!(f64; f32, i64, i32, i16, i8, u64, u32, u16, u8);
npy_target!(i64; i32, i16, i8, u64, u32, u16, u8);

/// Load an array of rank `D` from `path`, coercing its elements to `T`.
///
/// Length-1 axes are dropped (trailing ones first) while the file has more axes than `D`.
pub fn read_array<T, D>(path: impl AsRef<Path>) -> Result<Array<T, D>, Error>
where
    T: NpyTarget,
    D: Dimension,
{
    let path = path.as_ref();
    if !path.is_file() {
        return Err(EphysError::MissingFile(path.to_path_buf()).into());
    }

    let mut arr = T::read_dyn(path)?;

    if let Some(ndim) = D::NDIM {
        while arr.ndim() > ndim {
            let Some(axis) = (0..arr.ndim()).rev().find(|&i| arr.len_of(Axis(i)) == 1) else {
                break;
            };
            arr = arr.index_axis_move(Axis(axis), 0);
        }
    }

    let found = arr.shape().to_vec();
    arr.into_dimensionality::<D>().map_err(|_| {
        EphysError::WrongShape {
            path: path.to_path_buf(),
            expected: D::NDIM.unwrap_or(found.len()),
            found,
        }
        .into()
    })
}
