use lnb_matrix::GenMatrix;
use lnb_util::Gf2Poly;

use crate::sobol::SobolParams;

/// Which family a [`crate::DigitalNet`]'s generating matrices come from: the
/// three constructions share one `DigitalNet` representation and differ
/// only in how a new dimension's matrix, or a larger size's matrix, is
/// produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetConstruction {
    /// Sobol' nets: dimension `j`'s matrix columns are the binary digits of
    /// the direction numbers produced by `j`'s primitive-polynomial
    /// recurrence.
    Sobol,
    /// Polynomial lattice rules viewed as digital nets: dimension `j`'s
    /// matrix columns are the coefficients of `h_j(z) * z^c mod p(z)` for a
    /// per-dimension generator polynomial `h_j` and shared modulus `p`.
    Polynomial,
    /// User- or test-supplied matrices with no generation rule at all.
    Explicit,
}

impl NetConstruction {
    /// Builds the `m_rows x w_cols` generating matrix for Sobol dimension
    /// `j` (1-based).
    pub fn sobol_matrix(j: usize, m_rows: usize, w_cols: usize) -> GenMatrix {
        let params = SobolParams::for_dimension(j);
        let m = params.direction_numbers(w_cols);
        crate::sobol::direction_numbers_to_matrix(&m, m_rows)
    }

    /// Builds the `m_rows x w_cols` generating matrix for a polynomial
    /// lattice dimension with generator `gen` over modulus `modulus`:
    /// column `c` holds the degree-`<m_rows` coefficients of `gen * z^c mod
    /// modulus`, MSB (highest degree) in row 0.
    pub fn polynomial_matrix(gen: Gf2Poly, modulus: Gf2Poly, m_rows: usize, w_cols: usize) -> GenMatrix {
        let mut mat = GenMatrix::zeros(m_rows, w_cols);
        let z = Gf2Poly::from_int(2);
        let mut power = Gf2Poly::ONE;
        for c in 0..w_cols {
            let h = gen.mul_mod(power, modulus);
            for row in 0..m_rows {
                let bit = (h.0 >> row) & 1;
                mat.set(m_rows - 1 - row, c, bit != 0);
            }
            power = power.mul_mod(z, modulus);
        }
        mat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sobol_matrix_matches_direction_numbers() {
        let mat = NetConstruction::sobol_matrix(3, 4, 4);
        assert_eq!(mat.n_rows(), 4);
        assert_eq!(mat.n_cols(), 4);
    }

    #[test]
    fn polynomial_matrix_has_requested_shape() {
        let m = Gf2Poly::from_int(0b1011);
        let gen = Gf2Poly::from_int(0b11);
        let mat = NetConstruction::polynomial_matrix(gen, m, 3, 5);
        assert_eq!(mat.n_rows(), 3);
        assert_eq!(mat.n_cols(), 5);
    }
}
