//! Binning raw spectra onto frequency grids.
//!
//! A raw spectrum of sample size `n` is treated as a weighted histogram of the `n + 1` sample
//! frequencies `w / n`, each carrying weight `value / n`. Binning accumulates these weights into
//! bins and divides by the bin widths, so that the result is a density over frequency.
//!
//! Bins are half-open, `[left, right)`, except the last bin which also includes its right edge.
//! Frequencies below the first edge are counted in the first bin, and frequencies above the last
//! edge are counted in the last bin, so that no weight is lost when the edges do not span the
//! whole unit interval.

use std::fmt;

mod edges;

use crate::spectrum::RawSpectrum;

/// Factor by which automatically generated log and logit edges are pulled in from the
/// extremes, relative to `ln(n)`.
pub const SHRINK: f64 = 0.9;

/// The spacing of bins.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Uniformly spaced edges, with centers at the arithmetic mean of adjacent edges.
    Linear,
    /// Logarithmically spaced edges, with centers at the geometric mean of adjacent edges.
    Log,
    /// Edges spaced uniformly in log-odds, with centers at the geometric mean of adjacent edges.
    Logit,
}

impl Mode {
    /// Returns the center of the bin between two edges.
    pub fn center(&self, left: f64, right: f64) -> f64 {
        match self {
            Mode::Linear => 0.5 * (left + right),
            Mode::Log | Mode::Logit => (left * right).sqrt(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Mode::Linear => "linear",
            Mode::Log => "log",
            Mode::Logit => "logit",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The bins to use, either as a number of bins or as explicit edges.
#[derive(Clone, Debug, PartialEq)]
pub enum Bins {
    /// Number of bins, with edges generated according to the mode.
    Count(usize),
    /// Explicit, strictly increasing edges in the unit interval.
    Edges(Vec<f64>),
}

/// A binning specification.
#[derive(Clone, Debug, PartialEq)]
pub struct Binning {
    mode: Mode,
    bins: Bins,
}

impl Binning {
    /// Bins a raw spectrum.
    ///
    /// The sample size is taken from the spectrum.
    pub fn bin(&self, spectrum: &RawSpectrum) -> Result<BinnedSpectrum, BinningError> {
        let edges = self.edges(spectrum.sample_size())?;
        let bins = edges.len() - 1;

        let mut weights = vec![0.0; bins];
        for (frequency, weight) in spectrum.iter_frequencies() {
            let i = edges
                .partition_point(|&edge| edge <= frequency)
                .saturating_sub(1)
                .min(bins - 1);

            weights[i] += weight;
        }

        let (centers, widths): (Vec<_>, Vec<_>) = edges
            .windows(2)
            .map(|w| (self.mode.center(w[0], w[1]), w[1] - w[0]))
            .unzip();

        let densities = weights
            .into_iter()
            .zip(widths.iter())
            .map(|(weight, width)| weight / width)
            .collect();

        Ok(BinnedSpectrum {
            edges,
            centers,
            widths,
            densities,
        })
    }

    /// Returns the bins.
    pub fn bins(&self) -> &Bins {
        &self.bins
    }

    /// Returns the bin edges for a spectrum of the provided sample size.
    ///
    /// Explicit edges are returned as given after validation, and must lie in the unit interval.
    /// Generated edges are always strictly increasing, but note that generated log edges extend
    /// beyond one.
    pub fn edges(&self, sample_size: usize) -> Result<Vec<f64>, BinningError> {
        let edges = match &self.bins {
            Bins::Count(0) => return Err(BinningError::InvalidBinCount),
            Bins::Count(bins) => edges::generate(self.mode, *bins, sample_size),
            Bins::Edges(edges) => {
                if let Some(&edge) = edges.iter().find(|edge| !(0.0..=1.0).contains(*edge)) {
                    return Err(BinningError::InvalidEdge { edge });
                }
                edges.clone()
            }
        };

        edges::validate(&edges)?;

        Ok(edges)
    }

    /// Creates a new binning with a number of bins generated according to the mode.
    pub fn from_count(mode: Mode, bins: usize) -> Self {
        Self::new(mode, Bins::Count(bins))
    }

    /// Creates a new binning with explicit edges.
    ///
    /// The mode only determines the placement of bin centers.
    pub fn from_edges<E>(mode: Mode, edges: E) -> Self
    where
        Vec<f64>: From<E>,
    {
        Self::new(mode, Bins::Edges(Vec::from(edges)))
    }

    /// Returns the mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Creates a new binning.
    pub fn new(mode: Mode, bins: Bins) -> Self {
        Self { mode, bins }
    }
}

impl Default for Binning {
    fn default() -> Self {
        Self::from_count(Mode::Logit, 10)
    }
}

/// A single bin of a binned spectrum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bin {
    /// Bin center.
    pub center: f64,
    /// Bin width.
    pub width: f64,
    /// Density of spectrum weight in the bin.
    pub density: f64,
}

/// A binned spectrum.
#[derive(Clone, Debug, PartialEq)]
pub struct BinnedSpectrum {
    edges: Vec<f64>,
    centers: Vec<f64>,
    widths: Vec<f64>,
    densities: Vec<f64>,
}

impl BinnedSpectrum {
    /// Returns the bin centers.
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Returns the densities.
    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    /// Returns the bin edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Returns an iterator over bins.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Bin> + '_ {
        self.centers
            .iter()
            .zip(self.widths.iter())
            .zip(self.densities.iter())
            .map(|((&center, &width), &density)| Bin {
                center,
                width,
                density,
            })
    }

    /// Returns the number of bins.
    pub fn len(&self) -> usize {
        self.densities.len()
    }

    /// Returns `true` if there are no bins.
    ///
    /// A successfully binned spectrum always has at least one bin.
    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }

    /// Returns the total weight, i.e. the sum of densities multiplied by widths.
    pub fn mass(&self) -> f64 {
        self.iter().map(|bin| bin.density * bin.width).sum()
    }

    /// Returns the bin widths.
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }
}

/// An error associated with binning.
#[derive(Clone, Debug, PartialEq)]
pub enum BinningError {
    /// Zero bins requested.
    InvalidBinCount,
    /// An explicit edge is outside the unit interval or not finite.
    InvalidEdge {
        /// The invalid edge.
        edge: f64,
    },
    /// Edges decrease between two bins.
    NonMonotonicEdges {
        /// Index of the bin with decreasing edges.
        bin: usize,
        /// Left edge of the bin.
        left: f64,
        /// Right edge of the bin.
        right: f64,
    },
    /// Too few edges to define a bin.
    TooFewEdges {
        /// Number of edges provided.
        len: usize,
    },
    /// A bin has zero width.
    ZeroWidthBin {
        /// Index of the bin with zero width.
        bin: usize,
        /// The repeated edge.
        edge: f64,
    },
}

impl fmt::Display for BinningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinningError::InvalidBinCount => f.write_str("number of bins must be at least 1"),
            BinningError::InvalidEdge { edge } => {
                write!(f, "bin edge {edge} is not in the unit interval")
            }
            BinningError::NonMonotonicEdges { bin, left, right } => write!(
                f,
                "bin edges must be increasing, found edges {left} and {right} for bin {bin}"
            ),
            BinningError::TooFewEdges { len } => {
                write!(f, "at least 2 bin edges are required, found {len}")
            }
            BinningError::ZeroWidthBin { bin, edge } => {
                write!(f, "bin {bin} has zero width at edge {edge}")
            }
        }
    }
}

impl std::error::Error for BinningError {}
