use std::{iter::FusedIterator, slice};

use super::RawSpectrum;

/// An iterator over sample frequencies of a raw spectrum and their weights.
///
/// The value at descendant count `w` in a spectrum of sample size `n` is placed at frequency
/// `w / n` with weight `value / n`.
#[derive(Debug)]
pub struct FrequenciesIter<'a> {
    inner: std::iter::Enumerate<slice::Iter<'a, f64>>,
    sample_size: f64,
}

impl<'a> FrequenciesIter<'a> {
    pub(super) fn new(spectrum: &'a RawSpectrum) -> Self {
        Self {
            inner: spectrum.values.iter().enumerate(),
            sample_size: spectrum.sample_size() as f64,
        }
    }
}

impl<'a> Iterator for FrequenciesIter<'a> {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(w, v)| (w as f64 / self.sample_size, v / self.sample_size))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> ExactSizeIterator for FrequenciesIter<'a> {}

impl<'a> FusedIterator for FrequenciesIter<'a> {}
