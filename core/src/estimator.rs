//! Estimating, storing, and loading a raw spectrum for a single tree model.

use std::{fmt, io, path::Path};

use crate::{
    accumulate::{accumulate, AccumulateError},
    binning::{BinnedSpectrum, Binning, BinningError},
    io::{read, write},
    tree::TreeGenerator,
    RawSpectrum,
};

/// Number of trees used when a spectrum is required before one has been estimated.
pub const DEFAULT_TREES: usize = 10;

/// A raw spectrum estimate tied to the tree generator it is estimated from.
///
/// The estimator holds at most one spectrum at a time, which is either estimated from the
/// generator or loaded from a file. When a spectrum is required for saving or binning before
/// one exists, [`DEFAULT_TREES`] trees are generated first.
#[derive(Debug)]
pub struct Estimator<G> {
    generator: G,
    sample_size: usize,
    spectrum: Option<RawSpectrum>,
}

impl<G> Estimator<G>
where
    G: TreeGenerator,
{
    /// Bins the current spectrum, estimating one from [`DEFAULT_TREES`] trees if none exists.
    pub fn bin(&mut self, binning: &Binning) -> Result<BinnedSpectrum, EstimateError<G::Error>> {
        Ok(self.spectrum_or_estimate()?.bin(binning)?)
    }

    /// Estimates a new spectrum from `trees` trees, replacing any current spectrum.
    pub fn estimate(&mut self, trees: usize) -> Result<&RawSpectrum, AccumulateError<G::Error>> {
        let spectrum = accumulate(&mut self.generator, self.sample_size, trees)?;

        Ok(self.spectrum.insert(spectrum))
    }

    /// Returns the generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Loads a spectrum from a path, replacing any current spectrum.
    ///
    /// The sample size of the estimator is fixed by its generator, so the loaded spectrum must
    /// have the same sample size. Otherwise, an error is returned and the current spectrum is
    /// kept.
    pub fn load_from_path<P>(&mut self, path: P) -> Result<&RawSpectrum, EstimateError<G::Error>>
    where
        P: AsRef<Path>,
    {
        let spectrum = read::Builder::default().read_from_path(path)?;

        if spectrum.sample_size() != self.sample_size {
            return Err(EstimateError::SampleSizeMismatch {
                expected: self.sample_size,
                found: spectrum.sample_size(),
            });
        }

        Ok(self.spectrum.insert(spectrum))
    }

    /// Creates a new estimator without a spectrum.
    pub fn new(generator: G, sample_size: usize) -> Self {
        Self {
            generator,
            sample_size,
            spectrum: None,
        }
    }

    /// Returns the sample size.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Saves the current spectrum to a path, estimating one from [`DEFAULT_TREES`] trees if none
    /// exists.
    pub fn save_to_path<P>(
        &mut self,
        path: P,
        builder: write::Builder,
    ) -> Result<(), EstimateError<G::Error>>
    where
        P: AsRef<Path>,
    {
        let spectrum = self.spectrum_or_estimate()?;
        builder.write_to_path(path, spectrum)?;

        Ok(())
    }

    /// Returns the current spectrum, if any.
    pub fn spectrum(&self) -> Option<&RawSpectrum> {
        self.spectrum.as_ref()
    }

    fn spectrum_or_estimate(&mut self) -> Result<&RawSpectrum, AccumulateError<G::Error>> {
        let spectrum = match self.spectrum.take() {
            Some(spectrum) => spectrum,
            None => accumulate(&mut self.generator, self.sample_size, DEFAULT_TREES)?,
        };

        Ok(self.spectrum.insert(spectrum))
    }
}

/// An error associated with the estimator.
#[derive(Debug)]
pub enum EstimateError<E> {
    /// Estimating the spectrum failed.
    Accumulate(AccumulateError<E>),
    /// Binning the spectrum failed.
    Binning(BinningError),
    /// Reading or writing the spectrum failed.
    Io(io::Error),
    /// A loaded spectrum does not match the sample size of the estimator.
    SampleSizeMismatch {
        /// Sample size of the estimator.
        expected: usize,
        /// Sample size of the loaded spectrum.
        found: usize,
    },
}

impl<E> From<AccumulateError<E>> for EstimateError<E> {
    fn from(e: AccumulateError<E>) -> Self {
        Self::Accumulate(e)
    }
}

impl<E> From<BinningError> for EstimateError<E> {
    fn from(e: BinningError) -> Self {
        Self::Binning(e)
    }
}

impl<E> From<io::Error> for EstimateError<E> {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl<E> fmt::Display for EstimateError<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateError::Accumulate(e) => write!(f, "{e}"),
            EstimateError::Binning(e) => write!(f, "{e}"),
            EstimateError::Io(e) => write!(f, "{e}"),
            EstimateError::SampleSizeMismatch { expected, found } => write!(
                f,
                "loaded spectrum has sample size {found}, expected sample size {expected}"
            ),
        }
    }
}

impl<E> std::error::Error for EstimateError<E> where E: fmt::Debug + fmt::Display {}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{convert::Infallible, fs};

    use crate::{binning::Mode, Branch};

    type Generator = Box<dyn FnMut() -> Result<Vec<Branch>, Infallible>>;

    fn counting_estimator() -> Estimator<Generator> {
        let mut calls = 0.0;
        let generator: Generator = Box::new(move || {
            calls += 1.0;
            Ok(vec![
                Branch::new(1, calls),
                Branch::new(1, 1.0),
                Branch::new(2, 0.0),
            ])
        });

        Estimator::new(generator, 2)
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("coalsfs-test-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_estimate_replaces_spectrum() {
        let mut estimator = counting_estimator();
        assert!(estimator.spectrum().is_none());

        assert_eq!(estimator.estimate(1).unwrap().as_slice(), &[0.0, 2.0, 0.0]);
        assert_eq!(estimator.estimate(2).unwrap().as_slice(), &[0.0, 3.5, 0.0]);
        assert_eq!(estimator.spectrum().unwrap().as_slice(), &[0.0, 3.5, 0.0]);
    }

    #[test]
    fn test_save_estimates_default_trees() -> Result<(), EstimateError<Infallible>> {
        let mut estimator = counting_estimator();
        let path = temp_path("estimator.dat");

        estimator.save_to_path(&path, write::Builder::default())?;
        let saved = read::Builder::default().read_from_path(&path)?;
        fs::remove_file(&path)?;

        // Mean of 1..=10 plus one
        let expected = RawSpectrum::new([0.0, 6.5, 0.0]).unwrap();
        assert_eq!(estimator.spectrum(), Some(&expected));
        assert_eq!(saved, expected);

        Ok(())
    }

    #[test]
    fn test_bin_uses_existing_spectrum() {
        let mut estimator = counting_estimator();
        estimator.estimate(1).unwrap();

        let binned = estimator.bin(&Binning::from_count(Mode::Linear, 2)).unwrap();

        assert_eq!(binned.densities(), &[0.0, 2.0]);
    }

    #[test]
    fn test_load_then_estimate() -> Result<(), EstimateError<Infallible>> {
        let mut estimator = counting_estimator();
        let path = temp_path("estimator-load.dat");
        fs::write(&path, "0.0\n3.0\n1.5\n")?;

        let loaded = estimator.load_from_path(&path)?.clone();
        fs::remove_file(&path)?;

        assert_eq!(loaded.as_slice(), &[0.0, 3.0, 1.5]);
        assert_eq!(estimator.spectrum(), Some(&loaded));

        // Estimating replaces the loaded spectrum with one of the same shape
        assert_eq!(estimator.estimate(1)?.as_slice(), &[0.0, 2.0, 0.0]);
        assert_eq!(estimator.sample_size(), 2);

        Ok(())
    }

    #[test]
    fn test_load_rejects_sample_size_mismatch() -> Result<(), EstimateError<Infallible>> {
        let mut estimator = counting_estimator();
        estimator.estimate(1)?;

        let path = temp_path("estimator-load-mismatch.dat");
        fs::write(&path, "0.0\n3.0\n1.5\n0.5\n0.0\n")?;

        let result = estimator.load_from_path(&path).map(|_| ());
        fs::remove_file(&path)?;

        assert!(matches!(
            result,
            Err(EstimateError::SampleSizeMismatch {
                expected: 2,
                found: 4
            })
        ));
        assert_eq!(estimator.sample_size(), 2);
        assert_eq!(estimator.spectrum().unwrap().as_slice(), &[0.0, 2.0, 0.0]);
        assert_eq!(estimator.estimate(1)?.elements(), 3);

        Ok(())
    }

    #[test]
    fn test_estimate_zero_trees() {
        let mut estimator = counting_estimator();

        assert!(matches!(
            estimator.estimate(0),
            Err(AccumulateError::InvalidTreeCount(_))
        ));
        assert!(estimator.spectrum().is_none());
    }
}
