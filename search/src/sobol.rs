use lnb_net::{DigitalNet, NetConstruction};

/// Builds a `dimension`-dimensional Sobol' net directly from the tabulated
/// Joe-Kuo direction numbers: there is nothing to search here, every
/// dimension's matrix is fixed by its primitive-polynomial recurrence, so
/// this is a builder rather than a `SearchDriver`.
pub fn build_sobol_net(dimension: usize, m_rows: usize) -> DigitalNet {
    let mut net = DigitalNet::empty(NetConstruction::Sobol, m_rows, m_rows);
    for j in 1..=dimension {
        let matrix = NetConstruction::sobol_matrix(j, m_rows, m_rows);
        net = net.with_matrix_appended(matrix);
    }
    net
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_the_requested_dimension_count() {
        let net = build_sobol_net(4, 8);
        assert_eq!(net.dimension(), 4);
        assert_eq!(net.m_rows(), 8);
    }

    #[test]
    fn first_dimension_is_the_van_der_corput_sequence() {
        let net = build_sobol_net(1, 4);
        // Sobol dimension 1 is always the van der Corput sequence in base 2.
        assert!((net.point_coordinate(1, 0) - 0.5).abs() < 1e-12);
        assert!((net.point_coordinate(2, 0) - 0.25).abs() < 1e-12);
        assert!((net.point_coordinate(3, 0) - 0.75).abs() < 1e-12);
    }
}
