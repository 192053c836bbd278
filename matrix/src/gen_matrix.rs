use std::fmt;

/// A dense bit matrix over GF(2), row-major, word-packed: each row is a
/// `Vec<u64>` of `ceil(n_cols / 64)` words, bit `j` of word `j / 64` holding
/// column `j`. Row and column counts are explicit: a matrix never
/// infers its shape from its storage, so `resize` and sub-matrix views can
/// change the logical shape without reshaping every row's backing words.
#[derive(Clone, PartialEq, Eq)]
pub struct GenMatrix {
    n_rows: usize,
    n_cols: usize,
    words_per_row: usize,
    rows: Vec<Vec<u64>>,
}

const WORD_BITS: usize = 64;

fn words_for(n_cols: usize) -> usize {
    n_cols.div_ceil(WORD_BITS)
}

impl GenMatrix {
    /// An `n_rows x n_cols` matrix of zeros.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        let words_per_row = words_for(n_cols);
        GenMatrix {
            n_rows,
            n_cols,
            words_per_row,
            rows: vec![vec![0u64; words_per_row]; n_rows],
        }
    }

    /// Builds a matrix from row bit-vectors given as booleans, outermost
    /// index the row.
    pub fn from_rows(rows: &[Vec<bool>]) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        let mut m = GenMatrix::zeros(n_rows, n_cols);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), n_cols, "ragged row in GenMatrix::from_rows");
            for (j, &bit) in row.iter().enumerate() {
                if bit {
                    m.set(i, j, true);
                }
            }
        }
        m
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        debug_assert!(row < self.n_rows && col < self.n_cols);
        (self.rows[row][col / WORD_BITS] >> (col % WORD_BITS)) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, bit: bool) {
        debug_assert!(row < self.n_rows && col < self.n_cols);
        let word = &mut self.rows[row][col / WORD_BITS];
        let mask = 1u64 << (col % WORD_BITS);
        if bit {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    pub fn row(&self, i: usize) -> &[u64] {
        &self.rows[i]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [u64] {
        &mut self.rows[i]
    }

    /// A column read out as a dense bit vector, O(rows).
    pub fn column(&self, j: usize) -> Vec<bool> {
        (0..self.n_rows).map(|i| self.get(i, j)).collect()
    }

    pub fn append_row(&mut self, row: &[u64]) {
        assert_eq!(row.len(), self.words_per_row);
        self.rows.push(row.to_vec());
        self.n_rows += 1;
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.rows.swap(a, b);
    }

    /// XORs column `j` of `other` (read bit by bit) into column `dst_col`,
    /// used by the column permutation machinery of `ProgressiveRowReducer`.
    pub fn swap_columns(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for i in 0..self.n_rows {
            let va = self.get(i, a);
            let vb = self.get(i, b);
            self.set(i, a, vb);
            self.set(i, b, va);
        }
    }

    /// XOR `src` row into `dst` row in place: `rows[dst] ^= rows[src]`.
    pub fn xor_row_into(&mut self, dst: usize, src: usize) {
        if dst == src {
            return;
        }
        let (lo, hi) = if dst < src { (dst, src) } else { (src, dst) };
        let (left, right) = self.rows.split_at_mut(hi);
        let (a, b) = (&mut left[lo], &mut right[0]);
        if dst < src {
            for (x, y) in a.iter_mut().zip(b.iter()) {
                *x ^= y;
            }
        } else {
            for (x, y) in b.iter_mut().zip(a.iter()) {
                *x ^= y;
            }
        }
    }

    /// Vertical stack: appends `other`'s rows below `self`'s. Both matrices
    /// must share a column count.
    pub fn vstack(mut self, other: &GenMatrix) -> GenMatrix {
        assert_eq!(self.n_cols, other.n_cols, "vstack requires matching column counts");
        self.rows.extend(other.rows.iter().cloned());
        self.n_rows += other.n_rows;
        self
    }

    /// Returns a by-value copy of the `n_rows x n_cols` sub-matrix starting
    /// at `(row_off, col_off)`. Sub-matrix views are copies, never aliases.
    pub fn submatrix(&self, row_off: usize, col_off: usize, n_rows: usize, n_cols: usize) -> GenMatrix {
        assert!(row_off + n_rows <= self.n_rows);
        assert!(col_off + n_cols <= self.n_cols);
        let mut out = GenMatrix::zeros(n_rows, n_cols);
        for i in 0..n_rows {
            for j in 0..n_cols {
                out.set(i, j, self.get(row_off + i, col_off + j));
            }
        }
        out
    }

    /// Grows or shrinks the matrix to `(new_rows, new_cols)` in place,
    /// padding with zero rows/columns or truncating, O(rows*cols/word).
    pub fn resize(&mut self, new_rows: usize, new_cols: usize) {
        let new_words = words_for(new_cols);
        for row in &mut self.rows {
            row.resize(new_words, 0);
            if new_cols < self.n_cols {
                let tail_bits = new_cols % WORD_BITS;
                if tail_bits != 0 {
                    if let Some(last) = row.last_mut() {
                        *last &= (1u64 << tail_bits) - 1;
                    }
                }
            }
        }
        self.rows.resize(new_rows, vec![0u64; new_words]);
        self.n_rows = new_rows;
        self.n_cols = new_cols;
        self.words_per_row = new_words;
    }

    /// GF(2) matrix product `self * rhs`, O(n_rows * n_cols * rhs.n_cols / word).
    pub fn gf2_mul(&self, rhs: &GenMatrix) -> GenMatrix {
        assert_eq!(self.n_cols, rhs.n_rows, "gf2_mul dimension mismatch");
        let mut out = GenMatrix::zeros(self.n_rows, rhs.n_cols);
        for i in 0..self.n_rows {
            for k in 0..self.n_cols {
                if self.get(i, k) {
                    for j in 0..rhs.n_cols {
                        if rhs.get(k, j) {
                            let cur = out.get(i, j);
                            out.set(i, j, !cur);
                        }
                    }
                }
            }
        }
        out
    }

    /// GF(2) matrix-vector product `self * v`.
    pub fn gf2_mul_vec(&self, v: &[bool]) -> Vec<bool> {
        assert_eq!(self.n_cols, v.len());
        (0..self.n_rows)
            .map(|i| {
                (0..self.n_cols)
                    .filter(|&j| v[j])
                    .fold(false, |acc, j| acc ^ self.get(i, j))
            })
            .collect()
    }
}

impl fmt::Debug for GenMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GenMatrix({}x{})", self.n_rows, self.n_cols)?;
        for i in 0..self.n_rows {
            for j in 0..self.n_cols {
                write!(f, "{}", self.get(i, j) as u8)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_roundtrip() {
        let mut m = GenMatrix::zeros(3, 70);
        m.set(1, 65, true);
        assert!(m.get(1, 65));
        assert!(!m.get(1, 64));
        assert!(!m.get(0, 65));
    }

    #[test]
    fn from_rows_matches_get() {
        let m = GenMatrix::from_rows(&[vec![true, false, true], vec![false, false, true]]);
        assert!(m.get(0, 0));
        assert!(!m.get(0, 1));
        assert!(m.get(1, 2));
    }

    #[test]
    fn xor_row_into_is_gf2_add() {
        let mut m = GenMatrix::from_rows(&[vec![true, false, true], vec![false, true, true]]);
        m.xor_row_into(0, 1);
        assert_eq!(m.column(0), vec![true, false]);
        assert_eq!(m.column(1), vec![true, true]);
        assert_eq!(m.column(2), vec![false, true]);
    }

    #[test]
    fn vstack_concatenates_rows() {
        let a = GenMatrix::from_rows(&[vec![true, false]]);
        let b = GenMatrix::from_rows(&[vec![false, true]]);
        let c = a.vstack(&b);
        assert_eq!(c.n_rows(), 2);
        assert!(c.get(0, 0));
        assert!(c.get(1, 1));
    }

    #[test]
    fn submatrix_is_a_copy_not_a_view() {
        let mut m = GenMatrix::zeros(4, 4);
        m.set(1, 1, true);
        let mut sub = m.submatrix(1, 1, 2, 2);
        sub.set(0, 0, false);
        assert!(m.get(1, 1), "mutating the submatrix must not alias the source");
    }

    #[test]
    fn resize_truncates_extra_columns_to_zero() {
        let mut m = GenMatrix::zeros(1, 70);
        m.set(0, 65, true);
        m.resize(1, 10);
        m.resize(1, 70);
        assert!(!m.get(0, 65), "bits beyond a shrink must not reappear after growing back");
    }

    #[test]
    fn gf2_mul_identity() {
        let mut id = GenMatrix::zeros(3, 3);
        for i in 0..3 {
            id.set(i, i, true);
        }
        let m = GenMatrix::from_rows(&[vec![true, false, true], vec![false, true, false], vec![true, true, true]]);
        assert_eq!(id.gf2_mul(&m), m);
    }

    #[test]
    fn gf2_mul_vec_matches_mul() {
        let m = GenMatrix::from_rows(&[vec![true, false, true], vec![false, true, true]]);
        let v = vec![true, true, false];
        let out = m.gf2_mul_vec(&v);
        assert_eq!(out, vec![true ^ false, false ^ true]);
    }
}
