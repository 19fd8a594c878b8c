//! Raw spectra indexed by descendant count.

use std::{fmt, ops::Index};

pub mod io;

/// Iteration over sample frequencies.
pub mod iter;
use iter::FrequenciesIter;

use crate::binning::{BinnedSpectrum, Binning, BinningError};

/// A raw spectrum.
///
/// For a sample of size `n`, the raw spectrum has `n + 1` values, where the value at index `w`
/// is the expected total length of branches with `w` descendants per tree. The values at index
/// `0` and `n` do not correspond to any branch of a bifurcating tree below the root, but are kept
/// so that indices match descendant counts.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSpectrum {
    values: Vec<f64>,
}

impl RawSpectrum {
    /// Returns the values as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Bins the spectrum.
    pub fn bin(&self, binning: &Binning) -> Result<BinnedSpectrum, BinningError> {
        binning.bin(self)
    }

    /// Returns the number of values.
    pub fn elements(&self) -> usize {
        self.values.len()
    }

    /// Returns the spectrum as a vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Returns an iterator over the sample frequencies `w / n` paired with the weight
    /// `value / n` carried by each.
    pub fn iter_frequencies(&self) -> FrequenciesIter<'_> {
        FrequenciesIter::new(self)
    }

    /// Creates a new spectrum from values indexed by descendant count.
    ///
    /// At least two values are required, corresponding to a sample size of at least one, and
    /// all values must be finite and non-negative.
    pub fn new<V>(values: V) -> Result<Self, SpectrumError>
    where
        Vec<f64>: From<V>,
    {
        let values = Vec::from(values);

        if values.len() < 2 {
            return Err(SpectrumError::TooShort { len: values.len() });
        }

        match values.iter().position(|x| !x.is_finite() || *x < 0.0) {
            Some(index) => Err(SpectrumError::InvalidValue {
                index,
                value: values[index],
            }),
            None => Ok(Self::new_unchecked(values)),
        }
    }

    pub(crate) fn new_unchecked(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Returns the sample size.
    pub fn sample_size(&self) -> usize {
        self.values.len() - 1
    }

    /// Returns the sum of the spectrum.
    ///
    /// This is the expected total tree length.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl Index<usize> for RawSpectrum {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

/// An error associated with data that cannot form a raw spectrum.
#[derive(Clone, Debug, PartialEq)]
pub enum SpectrumError {
    /// A value is negative, infinite, or NaN.
    InvalidValue {
        /// Index of the value.
        index: usize,
        /// The invalid value.
        value: f64,
    },
    /// Too few values for any sample.
    TooShort {
        /// Number of values found.
        len: usize,
    },
    /// Data is not one-dimensional.
    NotOneDimensional {
        /// Shape of the data, as rows and columns.
        shape: [usize; 2],
    },
}

impl fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectrumError::InvalidValue { index, value } => write!(
                f,
                "expected finite and non-negative values, found {value} at index {index}"
            ),
            SpectrumError::TooShort { len } => {
                write!(f, "expected a spectrum with at least 2 values, found {len}")
            }
            SpectrumError::NotOneDimensional { shape: [rows, cols] } => write!(
                f,
                "expected a one-dimensional vector, found object with shape {rows}x{cols}"
            ),
        }
    }
}

impl std::error::Error for SpectrumError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let spectrum = RawSpectrum::new([0.0, 2.0, 1.0]).unwrap();

        assert_eq!(spectrum.sample_size(), 2);
        assert_eq!(spectrum.elements(), 3);
        assert_eq!(spectrum[1], 2.0);
        assert_eq!(spectrum.sum(), 3.0);
    }

    #[test]
    fn test_new_too_short() {
        assert_eq!(
            RawSpectrum::new(vec![1.0]),
            Err(SpectrumError::TooShort { len: 1 })
        );
        assert_eq!(
            RawSpectrum::new(Vec::<f64>::new()),
            Err(SpectrumError::TooShort { len: 0 })
        );
    }

    #[test]
    fn test_new_invalid_values() {
        assert_eq!(
            RawSpectrum::new([0.0, -1.0, 0.0]),
            Err(SpectrumError::InvalidValue {
                index: 1,
                value: -1.0
            })
        );
        assert_eq!(
            RawSpectrum::new([0.0, 1.0, f64::INFINITY]),
            Err(SpectrumError::InvalidValue {
                index: 2,
                value: f64::INFINITY
            })
        );
        assert!(matches!(
            RawSpectrum::new([f64::NAN, 1.0]),
            Err(SpectrumError::InvalidValue { index: 0, .. })
        ));

        // Negative zero compares equal to zero
        assert!(RawSpectrum::new([-0.0, 1.0]).is_ok());
    }

    #[test]
    fn test_display_shape_error() {
        assert_eq!(
            SpectrumError::NotOneDimensional { shape: [3, 2] }.to_string(),
            "expected a one-dimensional vector, found object with shape 3x2"
        );
    }
}
