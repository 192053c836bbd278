use lnb_matrix::GenMatrix;

use crate::construction::NetConstruction;

/// An ordered sequence of `d` generating matrices with a common `m x w`
/// shape, each owned by the net. Extension by dimension appends one matrix;
/// extension by size replaces every matrix with a larger one via a
/// construction-specific continuation rule.
#[derive(Clone, Debug)]
pub struct DigitalNet {
    construction: NetConstruction,
    m_rows: usize,
    w_cols: usize,
    matrices: Vec<GenMatrix>,
}

impl DigitalNet {
    pub fn empty(construction: NetConstruction, m_rows: usize, w_cols: usize) -> Self {
        DigitalNet { construction, m_rows, w_cols, matrices: Vec::new() }
    }

    pub fn construction(&self) -> NetConstruction {
        self.construction
    }

    pub fn dimension(&self) -> usize {
        self.matrices.len()
    }

    pub fn m_rows(&self) -> usize {
        self.m_rows
    }

    pub fn w_cols(&self) -> usize {
        self.w_cols
    }

    pub fn matrix(&self, j: usize) -> &GenMatrix {
        &self.matrices[j]
    }

    pub fn matrices(&self) -> &[GenMatrix] {
        &self.matrices
    }

    /// Appends the generating matrix for the next dimension, built from
    /// `extension` (a Sobol direction-number vector, a polynomial-lattice
    /// generator, or an explicit matrix — the construction decides which).
    pub fn with_matrix_appended(&self, matrix: GenMatrix) -> DigitalNet {
        assert_eq!(matrix.n_rows(), self.m_rows);
        assert_eq!(matrix.n_cols(), self.w_cols);
        let mut matrices = self.matrices.clone();
        matrices.push(matrix);
        DigitalNet { construction: self.construction, m_rows: self.m_rows, w_cols: self.w_cols, matrices }
    }

    /// The `i`-th point's `j`-th coordinate: `sum_k (Matrix_j * bits(i))_k /
    /// 2^{k+1}`, i.e. the generating matrix applied to `i`'s binary digits,
    /// read back as a dyadic fraction.
    pub fn point_coordinate(&self, i: u64, j: usize) -> f64 {
        let bits: Vec<bool> = (0..self.w_cols).map(|b| (i >> b) & 1 != 0).collect();
        let out = self.matrices[j].gf2_mul_vec(&bits);
        out.iter().enumerate().fold(0.0, |acc, (row, &bit)| if bit { acc + 2f64.powi(-(row as i32) - 1) } else { acc })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appended_matrix_increases_dimension() {
        let net = DigitalNet::empty(NetConstruction::Explicit, 3, 3);
        let mut id = GenMatrix::zeros(3, 3);
        for i in 0..3 {
            id.set(i, i, true);
        }
        let net = net.with_matrix_appended(id.clone());
        assert_eq!(net.dimension(), 1);
        assert_eq!(net.matrix(0), &id);
    }

    #[test]
    fn identity_matrix_gives_van_der_corput_points() {
        let net = DigitalNet::empty(NetConstruction::Explicit, 3, 3);
        let mut id = GenMatrix::zeros(3, 3);
        for i in 0..3 {
            id.set(i, i, true);
        }
        let net = net.with_matrix_appended(id);
        // i=1 -> bits [1,0,0] -> matrix * bits = [1,0,0] -> 1/2.
        assert!((net.point_coordinate(1, 0) - 0.5).abs() < 1e-12);
        // i=2 -> bits [0,1,0] -> row1 set -> 1/4.
        assert!((net.point_coordinate(2, 0) - 0.25).abs() < 1e-12);
    }
}
