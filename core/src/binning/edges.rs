use super::{BinningError, Mode, SHRINK};

/// Generates `bins + 1` edges for a spectrum of the provided sample size.
///
/// Log and logit edges are symmetric around one and one half, respectively, and span
/// `SHRINK * ln(n)` on either side on the log (odds) scale.
pub(super) fn generate(mode: Mode, bins: usize, sample_size: usize) -> Vec<f64> {
    match mode {
        Mode::Linear => (0..=bins).map(|i| i as f64 / bins as f64).collect(),
        Mode::Log => exp_spaced(bins, sample_size).collect(),
        Mode::Logit => exp_spaced(bins, sample_size)
            .map(|x| x / (1.0 + x))
            .collect(),
    }
}

fn exp_spaced(bins: usize, sample_size: usize) -> impl Iterator<Item = f64> {
    let scale = SHRINK * (sample_size as f64).ln();

    (0..=bins).map(move |i| {
        let u = -1.0 + 2.0 * i as f64 / bins as f64;
        (scale * u).exp()
    })
}

/// Checks that edges are finite and strictly increasing.
pub(super) fn validate(edges: &[f64]) -> Result<(), BinningError> {
    if edges.len() < 2 {
        return Err(BinningError::TooFewEdges { len: edges.len() });
    }

    if let Some(&edge) = edges.iter().find(|edge| !edge.is_finite()) {
        return Err(BinningError::InvalidEdge { edge });
    }

    edges
        .windows(2)
        .enumerate()
        .try_for_each(|(bin, w)| match (w[0], w[1]) {
            (left, right) if left == right => Err(BinningError::ZeroWidthBin { bin, edge: left }),
            (left, right) if left > right => {
                Err(BinningError::NonMonotonicEdges { bin, left, right })
            }
            _ => Ok(()),
        })
}
