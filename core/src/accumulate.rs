//! Accumulating raw spectra from coalescent trees.

use std::fmt;

use crate::{
    spectrum::RawSpectrum,
    tree::{Branch, MalformedBranch, TreeGenerator},
};

/// Accumulates branch lengths by descendant count over trees.
///
/// This is the state of a fold over trees: branches are added tree by tree, and
/// [`Accumulator::finish`] averages over the number of trees added. Accumulators over disjoint
/// sets of trees may be combined with [`Accumulator::merge`] before finishing.
#[derive(Clone, Debug, PartialEq)]
pub struct Accumulator {
    totals: Vec<f64>,
    trees: usize,
}

impl Accumulator {
    /// Creates a new, empty accumulator for trees with `sample_size` leaves.
    pub fn new(sample_size: usize) -> Result<Self, InvalidSampleSize> {
        if sample_size >= 2 {
            Ok(Self {
                totals: vec![0.0; sample_size + 1],
                trees: 0,
            })
        } else {
            Err(InvalidSampleSize { sample_size })
        }
    }

    /// Adds the branches of a single tree.
    ///
    /// All branches are validated before any is added, so that the accumulator is unchanged if
    /// the tree is malformed.
    pub fn add_tree(&mut self, branches: &[Branch]) -> Result<(), MalformedBranch> {
        let sample_size = self.sample_size();
        branches
            .iter()
            .try_for_each(|branch| branch.validate(sample_size))?;

        for branch in branches {
            self.totals[branch.descendants] += branch.length;
        }
        self.trees += 1;

        Ok(())
    }

    /// Averages the accumulated branch lengths over the number of trees added.
    pub fn finish(self) -> Result<RawSpectrum, InvalidTreeCount> {
        if self.trees == 0 {
            return Err(InvalidTreeCount { trees: 0 });
        }

        let trees = self.trees as f64;
        let values = self
            .totals
            .into_iter()
            .map(|x| x / trees)
            .collect::<Vec<_>>();

        Ok(RawSpectrum::new_unchecked(values))
    }

    /// Combines two accumulators over the same sample size.
    pub fn merge(mut self, other: Self) -> Result<Self, SampleSizeMismatch> {
        if self.sample_size() != other.sample_size() {
            return Err(SampleSizeMismatch {
                left: self.sample_size(),
                right: other.sample_size(),
            });
        }

        self.totals
            .iter_mut()
            .zip(other.totals)
            .for_each(|(x, y)| *x += y);
        self.trees += other.trees;

        Ok(self)
    }

    /// Returns the sample size.
    pub fn sample_size(&self) -> usize {
        self.totals.len() - 1
    }

    /// Returns the number of trees added.
    pub fn trees(&self) -> usize {
        self.trees
    }
}

/// Accumulates a raw spectrum from `trees` trees generated by `generator`.
///
/// The result gives, for each descendant count `0..=sample_size`, the total length of branches
/// with that many descendants averaged over trees. Any error from the generator, or any
/// malformed branch, aborts the accumulation.
pub fn accumulate<G>(
    generator: &mut G,
    sample_size: usize,
    trees: usize,
) -> Result<RawSpectrum, AccumulateError<G::Error>>
where
    G: TreeGenerator + ?Sized,
{
    if trees == 0 {
        return Err(InvalidTreeCount { trees }.into());
    }

    let mut accumulator = Accumulator::new(sample_size)?;

    for _ in 0..trees {
        let branches = generator.generate().map_err(AccumulateError::Generator)?;
        accumulator.add_tree(&branches)?;
    }

    Ok(accumulator.finish()?)
}

/// An error associated with accumulating a spectrum.
#[derive(Debug, PartialEq)]
pub enum AccumulateError<E> {
    /// The tree generator failed.
    Generator(E),
    /// The tree generator produced a malformed branch.
    MalformedBranch(MalformedBranch),
    /// The sample size is too small.
    InvalidSampleSize(InvalidSampleSize),
    /// The number of trees is zero.
    InvalidTreeCount(InvalidTreeCount),
}

impl<E> From<MalformedBranch> for AccumulateError<E> {
    fn from(e: MalformedBranch) -> Self {
        Self::MalformedBranch(e)
    }
}

impl<E> From<InvalidTreeCount> for AccumulateError<E> {
    fn from(e: InvalidTreeCount) -> Self {
        Self::InvalidTreeCount(e)
    }
}

impl<E> From<InvalidSampleSize> for AccumulateError<E> {
    fn from(e: InvalidSampleSize) -> Self {
        Self::InvalidSampleSize(e)
    }
}

impl<E> fmt::Display for AccumulateError<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccumulateError::Generator(e) => write!(f, "failed to generate tree: {e}"),
            AccumulateError::MalformedBranch(e) => write!(f, "malformed tree: {e}"),
            AccumulateError::InvalidSampleSize(e) => write!(f, "{e}"),
            AccumulateError::InvalidTreeCount(e) => write!(f, "{e}"),
        }
    }
}

impl<E> std::error::Error for AccumulateError<E> where E: fmt::Debug + fmt::Display {}

/// An error associated with averaging over zero trees.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidTreeCount {
    /// The invalid number of trees.
    pub trees: usize,
}

impl fmt::Display for InvalidTreeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "number of trees must be at least 1, found {}",
            self.trees
        )
    }
}

impl std::error::Error for InvalidTreeCount {}

/// An error associated with a sample size too small to form a tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidSampleSize {
    /// The invalid sample size.
    pub sample_size: usize,
}

impl fmt::Display for InvalidSampleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sample size must be at least 2, found {}",
            self.sample_size
        )
    }
}

impl std::error::Error for InvalidSampleSize {}

/// An error associated with merging accumulators of different sample sizes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SampleSizeMismatch {
    /// Sample size of the accumulator merged into.
    pub left: usize,
    /// Sample size of the accumulator merged from.
    pub right: usize,
}

impl fmt::Display for SampleSizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot merge accumulators with sample sizes {} and {}",
            self.left, self.right
        )
    }
}

impl std::error::Error for SampleSizeMismatch {}
