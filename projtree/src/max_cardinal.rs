use lnb_weights::Weights;

/// Derives a `ProjectionTree`'s `maxCardinal` from a `Weights` value's
/// support, so callers never have to guess the cutoff by hand. Weight
/// families with no intrinsic cardinality bound (`Product`,
/// `ProjectionDependent` with an unbounded explicit set) fall back to
/// `dimension`, the only cardinality that can never be exceeded.
pub fn compute_max_card_from_weights(weights: &Weights, dimension: usize) -> usize {
    match weights {
        Weights::OrderDependent { capital_gamma, default } => {
            bounded_cardinal(capital_gamma, *default, dimension)
        }
        Weights::Pod { capital_gamma, od_default, .. } => bounded_cardinal(capital_gamma, *od_default, dimension),
        Weights::ProjectionDependent { by_projection, .. } => {
            by_projection.keys().map(|p| p.len()).max().unwrap_or(1).min(dimension).max(1)
        }
        Weights::InterlacedPod { pod, .. } => compute_max_card_from_weights(pod, dimension),
        Weights::Combined(parts) => {
            parts.iter().map(|w| compute_max_card_from_weights(w, dimension)).max().unwrap_or(1)
        }
        Weights::Product { .. } => dimension.max(1),
    }
}

/// For an order-dependent-flavoured weight, the largest cardinality with a
/// nonzero `Gamma_l` (explicit entries only — a nonzero *default* means
/// every cardinality beyond the table still contributes, so the bound
/// falls back to `dimension`).
fn bounded_cardinal(capital_gamma: &[f64], default: f64, dimension: usize) -> usize {
    if default != 0.0 {
        return dimension.max(1);
    }
    capital_gamma
        .iter()
        .enumerate()
        .filter(|(_, &g)| g != 0.0)
        .map(|(l, _)| l + 1)
        .max()
        .unwrap_or(1)
        .min(dimension.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_dependent_zero_default_bounds_by_last_nonzero_gamma() {
        let w = Weights::order_dependent(0.0, vec![1.0, 0.5, 0.0, 0.0]);
        assert_eq!(compute_max_card_from_weights(&w, 10), 2);
    }

    #[test]
    fn order_dependent_nonzero_default_falls_back_to_dimension() {
        let w = Weights::order_dependent(0.3, vec![1.0]);
        assert_eq!(compute_max_card_from_weights(&w, 5), 5);
    }

    #[test]
    fn product_weight_has_no_intrinsic_bound() {
        let w = Weights::product(0.5, vec![1.0, 1.0]);
        assert_eq!(compute_max_card_from_weights(&w, 7), 7);
    }

    #[test]
    fn projection_dependent_bounds_by_largest_explicit_set() {
        let w = Weights::projection_dependent(
            0.0,
            vec![(lnb_weights::Projection::new([0, 1, 2]), 0.5), (lnb_weights::Projection::new([3]), 0.2)],
        );
        assert_eq!(compute_max_card_from_weights(&w, 10), 3);
    }
}
