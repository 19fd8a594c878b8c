use std::path::PathBuf;

use anyhow::Error;

use clap::Parser;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use coalsfs_core::{estimator::DEFAULT_TREES, io::write, Estimator};

mod coalescent;
use coalescent::BetaCoalescent;

/// Estimate a raw SFS by simulating coalescent trees.
#[derive(Debug, Parser)]
pub struct Simulate {
    /// Sample size.
    ///
    /// The number of leaves of each simulated tree. The raw SFS will have one more value than
    /// the sample size, indexed by the number of descendants of a branch.
    #[arg(short = 'n', long, value_name = "INT")]
    sample_size: usize,

    /// Shape parameter of the Beta(2 - α, α)-coalescent.
    ///
    /// Must be in the interval (0, 2]. The default of 2 gives the Kingman coalescent, while
    /// smaller values give increasingly frequent multiple mergers.
    #[arg(short = 'a', long, default_value_t = 2.0, value_name = "FLOAT")]
    alpha: f64,

    /// Number of trees to average over.
    #[arg(short = 't', long, default_value_t = DEFAULT_TREES, value_name = "INT")]
    trees: usize,

    /// Seed for the random number generator.
    ///
    /// If unset, the generator is seeded from system entropy.
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,

    /// Output raw SFS path.
    ///
    /// If no path is given, the raw SFS will be output to stdout. If the path ends in '.gz',
    /// the output will be gzip-compressed.
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output raw SFS precision.
    ///
    /// Values are written in scientific notation with this many digits after the decimal point.
    #[arg(short = 'p', long, default_value_t = 18, value_name = "INT")]
    precision: usize,
}

impl Simulate {
    pub fn run(self) -> Result<(), Error> {
        let rng = match self.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
        };

        let generator = BetaCoalescent::new(self.sample_size, self.alpha, rng)?;
        log::info!(
            "simulating {} trees with sample size {} and alpha {}",
            self.trees,
            generator.sample_size(),
            generator.alpha()
        );

        let mut estimator = Estimator::new(generator, self.sample_size);
        let spectrum = estimator.estimate(self.trees)?;
        log::debug!("average total tree length {}", spectrum.sum());

        write::Builder::default()
            .set_precision(self.precision)
            .write_to_path_or_stdout(self.output.as_ref(), spectrum)?;

        Ok(())
    }
}
