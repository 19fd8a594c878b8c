use std::path::PathBuf;

use anyhow::Error;

use clap::{Parser, ValueEnum};

use coalsfs_core::{binning::Mode, io::read, Binning};

mod runner;
use runner::Runner;

/// Bin a raw SFS onto a frequency grid.
#[derive(Debug, Parser)]
pub struct Bin {
    /// Input raw SFS.
    ///
    /// The input SFS can be provided here or read from stdin, optionally gzip-compressed.
    #[clap(value_parser, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Spacing of bins.
    ///
    /// With log and logit spacing, generated edges are pulled in from the extreme frequencies
    /// by a factor depending on the sample size, and bin centers are geometric means of the
    /// adjacent edges.
    #[clap(
        short = 'm',
        long,
        value_enum,
        default_value = "logit",
        value_name = "MODE"
    )]
    pub mode: Spacing,

    /// Number of bins.
    #[clap(
        short = 'b',
        long,
        default_value_t = 10,
        conflicts_with = "edges",
        value_name = "INT"
    )]
    pub bins: usize,

    /// Explicit bin edges.
    ///
    /// Edges must be strictly increasing and lie between zero and one. Use comma to separate
    /// edges. When provided, the mode only determines bin centers.
    #[clap(
        short = 'e',
        long,
        use_value_delimiter = true,
        value_delimiter = ',',
        allow_negative_numbers = true,
        value_name = "FLOAT,..."
    )]
    pub edges: Option<Vec<f64>>,

    /// Delimiter between columns.
    #[clap(short = 'd', long, default_value_t = ',', value_name = "CHAR")]
    pub delimiter: char,

    /// Include a header with the names of columns.
    #[clap(short = 'H', long)]
    pub header: bool,

    /// Precision to use when printing bins.
    #[clap(short = 'p', long, default_value_t = 6, value_name = "INT")]
    pub precision: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Spacing {
    /// Uniformly spaced bins.
    Linear,
    /// Logarithmically spaced bins.
    Log,
    /// Bins uniformly spaced in log-odds.
    Logit,
}

impl From<Spacing> for Mode {
    fn from(spacing: Spacing) -> Self {
        match spacing {
            Spacing::Linear => Mode::Linear,
            Spacing::Log => Mode::Log,
            Spacing::Logit => Mode::Logit,
        }
    }
}

impl Bin {
    fn binning(&self) -> Binning {
        let mode = Mode::from(self.mode);

        match &self.edges {
            Some(edges) => Binning::from_edges(mode, edges.clone()),
            None => Binning::from_count(mode, self.bins),
        }
    }

    pub fn run(self) -> Result<(), Error> {
        let spectrum = read::Builder::default().read_from_path_or_stdin(self.path.as_ref())?;
        log::info!(
            "read raw spectrum with sample size {}",
            spectrum.sample_size()
        );

        let binning = self.binning();
        let binned = spectrum.bin(&binning)?;
        log::debug!(
            "binned spectrum into {} {} bins with edges {:?}",
            binned.len(),
            binning.mode(),
            binned.edges()
        );

        Runner::new(
            std::io::stdout().lock(),
            binned,
            self.header,
            self.delimiter,
            self.precision,
        )
        .run()
    }
}
