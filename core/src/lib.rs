#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Estimating site frequency spectra from coalescent trees.
//!
//! This serves as the core library implementation for the `coalsfs` CLI, but can also be used as
//! a free-standing library.
//!
//! # Overview
//!
//! Trees are provided by a [`TreeGenerator`], which is any source of branches annotated with
//! the number of sampled leaves below them. An [`Accumulator`] sums branch lengths per
//! descendant count over many trees, and averaging gives a [`RawSpectrum`]. The raw spectrum can
//! be resampled onto linear, logarithmic, or logit-spaced frequency bins using a [`Binning`],
//! and stored to or read from a plain text format using the [`io`] module.
//!
//! # Example
//!
//! ```
//! use coalsfs_core::{accumulate, Binning, Branch, Mode};
//!
//! // A fixed two-leaf tree with unit-length leaf branches
//! let mut generator = || -> Result<_, std::convert::Infallible> {
//!     Ok(vec![Branch::new(1, 1.0), Branch::new(1, 1.0), Branch::new(2, 0.0)])
//! };
//!
//! let spectrum = accumulate(&mut generator, 2, 5).expect("valid trees");
//! assert_eq!(spectrum.as_slice(), &[0.0, 2.0, 0.0]);
//!
//! let binned = Binning::from_count(Mode::Linear, 2).bin(&spectrum).expect("valid bins");
//! assert_eq!(binned.densities(), &[0.0, 2.0]);
//! ```

#[cfg(test)]
#[macro_use]
pub(crate) mod approx;

pub mod accumulate;
pub use accumulate::{accumulate, Accumulator};

pub mod binning;
pub use binning::{BinnedSpectrum, Binning, Mode};

pub mod estimator;
pub use estimator::Estimator;

pub mod spectrum;
pub use spectrum::{io, RawSpectrum};

pub mod tree;
pub use tree::{Branch, TreeGenerator};

pub mod utils;
