//! Trees as consumed by the accumulator.
//!
//! The accumulator does not care about tree topology: a tree is fully described by its branches,
//! each annotated with the number of sampled leaves it subtends.

use std::fmt;

/// A single branch of a coalescent tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    /// Number of sampled leaves below the branch.
    pub descendants: usize,
    /// Branch length in coalescent time units.
    pub length: f64,
}

impl Branch {
    /// Creates a new branch.
    pub fn new(descendants: usize, length: f64) -> Self {
        Self {
            descendants,
            length,
        }
    }

    /// Checks that the branch is well-formed for a tree with `sample_size` leaves.
    ///
    /// The descendant count must be in `1..=sample_size`, where the upper bound allows the root
    /// to be reported, and the length must be finite and non-negative.
    pub fn validate(&self, sample_size: usize) -> Result<(), MalformedBranch> {
        if self.descendants == 0 || self.descendants > sample_size {
            Err(MalformedBranch::DescendantsOutOfRange {
                descendants: self.descendants,
                sample_size,
            })
        } else if !self.length.is_finite() || self.length < 0.0 {
            Err(MalformedBranch::InvalidLength {
                length: self.length,
            })
        } else {
            Ok(())
        }
    }
}

impl From<(usize, f64)> for Branch {
    fn from((descendants, length): (usize, f64)) -> Self {
        Self::new(descendants, length)
    }
}

/// A source of random coalescent trees.
///
/// Each call to [`TreeGenerator::generate`] should produce a fresh, independent tree, given as
/// every branch of that tree exactly once: both leaf branches and internal branches.
///
/// Closures returning `Result<Vec<Branch>, E>` implement this trait.
pub trait TreeGenerator {
    /// The error returned when a tree cannot be generated.
    type Error;

    /// Generates the branches of a single tree.
    fn generate(&mut self) -> Result<Vec<Branch>, Self::Error>;
}

impl<F, E> TreeGenerator for F
where
    F: FnMut() -> Result<Vec<Branch>, E>,
{
    type Error = E;

    fn generate(&mut self) -> Result<Vec<Branch>, Self::Error> {
        self()
    }
}

/// An error associated with a branch that cannot belong to a tree of the given sample size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MalformedBranch {
    /// The descendant count is zero or exceeds the sample size.
    DescendantsOutOfRange {
        /// Descendant count of the branch.
        descendants: usize,
        /// Sample size of the tree.
        sample_size: usize,
    },
    /// The length is negative or not finite.
    InvalidLength {
        /// Length of the branch.
        length: f64,
    },
}

impl fmt::Display for MalformedBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedBranch::DescendantsOutOfRange {
                descendants,
                sample_size,
            } => write!(
                f,
                "branch with {descendants} descendants in tree with sample size {sample_size}"
            ),
            MalformedBranch::InvalidLength { length } => {
                write!(f, "branch with invalid length {length}")
            }
        }
    }
}

impl std::error::Error for MalformedBranch {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_descendants() {
        assert!(Branch::new(1, 0.5).validate(3).is_ok());
        assert!(Branch::new(3, 0.0).validate(3).is_ok());

        assert_eq!(
            Branch::new(0, 0.5).validate(3),
            Err(MalformedBranch::DescendantsOutOfRange {
                descendants: 0,
                sample_size: 3
            })
        );
        assert_eq!(
            Branch::new(4, 0.5).validate(3),
            Err(MalformedBranch::DescendantsOutOfRange {
                descendants: 4,
                sample_size: 3
            })
        );
    }

    #[test]
    fn test_validate_length() {
        assert_eq!(
            Branch::new(1, -1.0).validate(3),
            Err(MalformedBranch::InvalidLength { length: -1.0 })
        );
        assert!(Branch::new(1, f64::INFINITY).validate(3).is_err());
        assert!(Branch::new(1, f64::NAN).validate(3).is_err());
    }

    #[test]
    fn test_closure_generator() {
        let mut calls = 0;
        let mut generator = || -> Result<Vec<Branch>, ()> {
            calls += 1;
            Ok(vec![Branch::from((1, 1.0))])
        };

        assert_eq!(generator.generate(), Ok(vec![Branch::new(1, 1.0)]));
        assert_eq!(generator.generate(), Ok(vec![Branch::new(1, 1.0)]));
        drop(generator);

        assert_eq!(calls, 2);
    }
}
