//! Ordinary kriging system assembly and solve.

use crate::{NeighborSample, VariogramModel};
use nalgebra::{DMatrix, DVector};

/// Solve the ordinary kriging system for one query location.
///
/// Builds the (n+1) x (n+1) semivariance matrix with the Lagrange row
/// enforcing unit weight sum, inverts it, and applies the weights. The
/// kriging variance is the dot product of the right-hand side with the
/// solution (including the multiplier term), clamped at zero against
/// rounding.
///
/// Returns `None` when the system is singular or its conditioning
/// estimate (product of Frobenius norms of the matrix and its inverse)
/// exceeds `ill_condition_threshold` - clustered or near-duplicate
/// neighborhoods produce such systems, and the caller is expected to
/// fall back to a distance-weighted estimate for the cell rather than
/// trust amplified rounding error.
pub(crate) fn solve(
    neighbors: &[NeighborSample],
    variogram: &VariogramModel,
    ill_condition_threshold: f64,
) -> Option<(f64, f64)> {
    let n = neighbors.len();
    if n == 0 {
        return None;
    }

    let mut k = DMatrix::zeros(n + 1, n + 1);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = neighbors[i].x - neighbors[j].x;
            let dy = neighbors[i].y - neighbors[j].y;
            let gamma = variogram.gamma((dx * dx + dy * dy).sqrt());
            k[(i, j)] = gamma;
            k[(j, i)] = gamma;
        }
        k[(i, n)] = 1.0;
        k[(n, i)] = 1.0;
    }

    let mut rhs = DVector::zeros(n + 1);
    for (i, nb) in neighbors.iter().enumerate() {
        rhs[i] = variogram.gamma(nb.distance);
    }
    rhs[n] = 1.0;

    let k_norm = k.norm();
    let k_inv = k.try_inverse()?;
    let condition_estimate = k_norm * k_inv.norm();
    if !condition_estimate.is_finite() || condition_estimate > ill_condition_threshold {
        return None;
    }

    let weights = k_inv * &rhs;
    let mut value = 0.0;
    for (i, nb) in neighbors.iter().enumerate() {
        value += weights[i] * nb.depth;
    }
    let variance = rhs.dot(&weights).max(0.0);

    Some((value, variance))
}
