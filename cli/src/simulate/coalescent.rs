//! Beta-coalescent trees.

use std::{convert::Infallible, fmt};

use rand::{distr::weighted::WeightedIndex, Rng};
use rand_distr::{Distribution, Exp1};

use coalsfs_core::{
    utils::{ln_beta, ln_binomial},
    Branch, TreeGenerator,
};

/// Merger rates with a given number of active lineages.
#[derive(Clone, Debug)]
struct Rates {
    total: f64,
    // Index i corresponds to a merger of i + 2 lineages
    sizes: WeightedIndex<f64>,
}

impl Rates {
    fn kingman(lineages: usize) -> Result<Self, ModelError> {
        let pairs = (lineages * (lineages - 1) / 2) as f64;

        Ok(Self {
            total: pairs,
            sizes: WeightedIndex::new([1.0]).map_err(ModelError::rates)?,
        })
    }

    fn beta(lineages: usize, alpha: f64) -> Result<Self, ModelError> {
        let b = lineages as u64;
        let ln_norm = ln_beta(2.0 - alpha, alpha);

        // Total rate of any k of b lineages merging, on log scale
        let ln_rates = (2..=b)
            .map(|k| {
                ln_binomial(b, k) + ln_beta(k as f64 - alpha, (b - k) as f64 + alpha) - ln_norm
            })
            .collect::<Vec<_>>();

        let max = ln_rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let weights = ln_rates.iter().map(|x| (x - max).exp()).collect::<Vec<_>>();
        let total = max.exp() * weights.iter().sum::<f64>();

        Ok(Self {
            total,
            sizes: WeightedIndex::new(weights).map_err(ModelError::rates)?,
        })
    }
}

/// A generator of trees from the Beta(2 - α, α)-coalescent.
///
/// With `alpha` equal to two, this is the Kingman coalescent, in which only pairs of lineages
/// merge. Smaller values of `alpha` allow multiple mergers, becoming more frequent as `alpha`
/// decreases.
#[derive(Clone, Debug)]
pub struct BetaCoalescent<R> {
    sample_size: usize,
    alpha: f64,
    // Index i corresponds to i + 2 active lineages
    rates: Vec<Rates>,
    rng: R,
}

impl<R> BetaCoalescent<R>
where
    R: Rng,
{
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn new(sample_size: usize, alpha: f64, rng: R) -> Result<Self, ModelError> {
        if sample_size < 2 {
            return Err(ModelError::InvalidSampleSize { sample_size });
        }
        if !(alpha > 0.0 && alpha <= 2.0) {
            return Err(ModelError::InvalidAlpha { alpha });
        }

        let rates = (2..=sample_size)
            .map(|lineages| {
                if alpha == 2.0 {
                    Rates::kingman(lineages)
                } else {
                    Rates::beta(lineages, alpha)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sample_size,
            alpha,
            rates,
            rng,
        })
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl<R> TreeGenerator for BetaCoalescent<R>
where
    R: Rng,
{
    type Error = Infallible;

    fn generate(&mut self) -> Result<Vec<Branch>, Self::Error> {
        // Active lineages as pairs of descendants and time of origin
        let mut lineages = vec![(1, 0.0); self.sample_size];
        let mut branches = Vec::with_capacity(2 * self.sample_size - 1);
        let mut time = 0.0;

        while lineages.len() > 1 {
            let rates = &self.rates[lineages.len() - 2];

            let waiting: f64 = Exp1.sample(&mut self.rng);
            time += waiting / rates.total;

            let size = rates.sizes.sample(&mut self.rng) + 2;
            let mut descendants = 0;
            for _ in 0..size {
                let i = self.rng.random_range(0..lineages.len());
                let (w, origin) = lineages.swap_remove(i);

                branches.push(Branch::new(w, time - origin));
                descendants += w;
            }

            lineages.push((descendants, time));
        }

        branches.push(Branch::new(self.sample_size, 0.0));

        Ok(branches)
    }
}

#[derive(Debug)]
pub enum ModelError {
    InvalidAlpha { alpha: f64 },
    InvalidSampleSize { sample_size: usize },
    Rates(String),
}

impl ModelError {
    fn rates<E>(e: E) -> Self
    where
        E: fmt::Display,
    {
        Self::Rates(e.to_string())
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidAlpha { alpha } => {
                write!(f, "alpha must be in the interval (0, 2], found {alpha}")
            }
            ModelError::InvalidSampleSize { sample_size } => {
                write!(f, "sample size must be at least 2, found {sample_size}")
            }
            ModelError::Rates(e) => write!(f, "failed to compute merger rates: {e}"),
        }
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    use coalsfs_core::{accumulate, utils::harmonic};

    fn coalescent(sample_size: usize, alpha: f64) -> BetaCoalescent<Xoshiro256PlusPlus> {
        let rng = Xoshiro256PlusPlus::seed_from_u64(42);
        BetaCoalescent::new(sample_size, alpha, rng).unwrap()
    }

    fn check_tree(branches: &[Branch], sample_size: usize) {
        let leaves = branches.iter().filter(|b| b.descendants == 1).count();
        assert_eq!(leaves, sample_size);

        let root = branches.last().unwrap();
        assert_eq!(*root, Branch::new(sample_size, 0.0));

        for branch in branches {
            assert!(branch.validate(sample_size).is_ok());
        }
        for branch in &branches[..branches.len() - 1] {
            assert!(branch.descendants < sample_size);
        }
    }

    #[test]
    fn test_kingman_tree_shape() {
        let mut generator = coalescent(8, 2.0);

        for _ in 0..50 {
            let branches = generator.generate().unwrap();

            // Strictly bifurcating: every branch but the root is a distinct edge
            assert_eq!(branches.len(), 2 * 8 - 1);
            check_tree(&branches, 8);
        }
    }

    #[test]
    fn test_beta_tree_shape() {
        for alpha in [1.9, 1.5, 1.0, 0.5] {
            let mut generator = coalescent(20, alpha);

            for _ in 0..50 {
                let branches = generator.generate().unwrap();

                assert!(branches.len() <= 2 * 20 - 1);
                check_tree(&branches, 20);
            }
        }
    }

    #[test]
    fn test_rates_two_lineages() {
        // With two lineages, the only possible merger has unit rate for all alpha
        for alpha in [1.9, 1.5, 1.0] {
            let rates = Rates::beta(2, alpha).unwrap();
            assert!((rates.total - 1.0).abs() < 1e-10);
        }
        assert_eq!(Rates::kingman(2).unwrap().total, 1.0);
        assert_eq!(Rates::kingman(5).unwrap().total, 10.0);
    }

    #[test]
    fn test_beta_rates_approach_kingman() {
        let rates = Rates::beta(10, 1.9999).unwrap();

        assert!((rates.total - 45.0).abs() < 0.1);
    }

    #[test]
    fn test_kingman_expected_spectrum() {
        let sample_size = 10;
        let mut generator = coalescent(sample_size, 2.0);

        let spectrum = accumulate(&mut generator, sample_size, 4000).unwrap();

        let expected_total = 2.0 * harmonic(sample_size as u64);
        assert!((spectrum.sum() - expected_total).abs() < 0.3);

        for w in 1..sample_size {
            assert!((spectrum[w] - 2.0 / w as f64).abs() < 0.25);
        }
        assert_eq!(spectrum[0], 0.0);
        assert_eq!(spectrum[sample_size], 0.0);
    }

    #[test]
    fn test_multiple_mergers_shorten_trees() {
        let sample_size = 20;

        let kingman = accumulate(&mut coalescent(sample_size, 2.0), sample_size, 2000).unwrap();
        let beta = accumulate(&mut coalescent(sample_size, 1.0), sample_size, 2000).unwrap();

        // Relative to total length, multiple mergers put more weight on singletons
        assert!(beta[1] / beta.sum() > kingman[1] / kingman.sum());
    }

    #[test]
    fn test_invalid_parameters() {
        let rng = Xoshiro256PlusPlus::seed_from_u64(1);

        assert!(matches!(
            BetaCoalescent::new(1, 2.0, rng.clone()),
            Err(ModelError::InvalidSampleSize { sample_size: 1 })
        ));
        for alpha in [0.0, 2.5, f64::NAN] {
            assert!(matches!(
                BetaCoalescent::new(10, alpha, rng.clone()),
                Err(ModelError::InvalidAlpha { .. })
            ));
        }
    }
}
