use crate::GenMatrix;

/// Maintains the (reduced) row echelon form of a binary matrix that grows by
/// appending rows and/or columns, without ever re-deriving the whole
/// reduction from scratch. Used by the t-value engine's Gauss
/// method, where each candidate composition rebuilds one of these from a
/// handful of rows rather than calling a batch Gaussian elimination.
///
/// `reduced` holds the current rows after elimination; `combo` is the square
/// matrix such that `reduced[i] = combo[i] . original_rows` (GF(2) dot
/// product) — a "parallel matrix" letting `add_column`
/// project a freshly supplied column of *original* entries into the already
/// reduced row space without re-running elimination on the whole matrix.
pub struct ProgressiveRowReducer {
    reduced: GenMatrix,
    combo: GenMatrix,
    /// `row_pivot[i]` is the pivot column of row `i`, or `None` if row `i`
    /// reduced to all zero against every pivot known so far.
    row_pivot: Vec<Option<usize>>,
    /// `col_pivot[j]` is the row whose pivot is column `j`, or `None`.
    col_pivot: Vec<Option<usize>>,
    /// Pivot columns in the order they were discovered, kept sorted so
    /// `rank_per_prefix` can binary-search it.
    pivot_cols_sorted: Vec<usize>,
}

impl ProgressiveRowReducer {
    pub fn new() -> Self {
        ProgressiveRowReducer {
            reduced: GenMatrix::zeros(0, 0),
            combo: GenMatrix::zeros(0, 0),
            row_pivot: Vec::new(),
            col_pivot: Vec::new(),
            pivot_cols_sorted: Vec::new(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.reduced.n_rows()
    }

    pub fn n_cols(&self) -> usize {
        self.reduced.n_cols()
    }

    pub fn rank(&self) -> usize {
        self.pivot_cols_sorted.len()
    }

    pub fn is_full_rank(&self) -> bool {
        self.rank() == self.n_rows().min(self.n_cols())
    }

    /// Rank of the first `l` columns, for `l` in `0..=n_cols()`. Monotone
    /// non-decreasing by construction.
    pub fn rank_per_prefix(&self) -> Vec<usize> {
        (0..=self.n_cols())
            .map(|l| self.pivot_cols_sorted.partition_point(|&c| c < l))
            .collect()
    }

    /// Appends a row (given as bits over the current column count) and
    /// reduces it against existing pivots, possibly promoting it to a new
    /// pivot row and clearing that pivot column from every other row.
    pub fn add_row(&mut self, r: &[bool]) {
        let n_cols = self.n_cols();
        assert_eq!(r.len(), n_cols, "row width must match current column count");
        let new_row_idx = self.reduced.n_rows();

        // Grow `reduced` by one row, `combo` by one row and one column
        // (new row contributes e_{new_row_idx} to its own combination).
        self.reduced.resize(new_row_idx + 1, n_cols);
        for (j, &bit) in r.iter().enumerate() {
            self.reduced.set(new_row_idx, j, bit);
        }
        self.combo.resize(new_row_idx + 1, new_row_idx + 1);
        self.combo.set(new_row_idx, new_row_idx, true);

        for (p_row, &p_col) in self.row_pivot.iter().enumerate().filter_map(|(i, pc)| pc.map(|c| (i, c))) {
            if self.reduced.get(new_row_idx, p_col) {
                self.reduced.xor_row_into(new_row_idx, p_row);
                self.combo.xor_row_into(new_row_idx, p_row);
            }
        }

        let leading = (0..n_cols).find(|&j| self.reduced.get(new_row_idx, j));
        self.row_pivot.push(None);
        self.col_pivot.resize(n_cols, None);

        if let Some(pc) = leading {
            self.promote_pivot(new_row_idx, pc);
        }
    }

    /// Appends a column, given as the values each already-appended row has
    /// at that column in the *original* (unreduced) matrix. Projects it
    /// through `combo` to find its value in reduced space, then promotes a
    /// new pivot if some non-pivot row now has a nonzero entry there.
    pub fn add_column(&mut self, c: &[bool]) {
        let n_rows = self.n_rows();
        assert_eq!(c.len(), n_rows, "column height must match current row count");
        let new_col = self.n_cols();

        let projected = self.combo.gf2_mul_vec(c);
        self.reduced.resize(n_rows, new_col + 1);
        for i in 0..n_rows {
            self.reduced.set(i, new_col, projected[i]);
        }
        self.col_pivot.push(None);

        let candidate = (0..n_rows).find(|&i| self.row_pivot[i].is_none() && self.reduced.get(i, new_col));
        if let Some(row) = candidate {
            self.promote_pivot(row, new_col);
        }
    }

    /// Marks `row` as the pivot row for `col`, then XORs it into every other
    /// row that still has a `1` there, restoring the single-one-hot pivot
    /// column invariant.
    fn promote_pivot(&mut self, row: usize, col: usize) {
        self.row_pivot[row] = Some(col);
        self.col_pivot[col] = Some(row);
        let insert_at = self.pivot_cols_sorted.partition_point(|&x| x < col);
        self.pivot_cols_sorted.insert(insert_at, col);

        for other in 0..self.reduced.n_rows() {
            if other != row && self.reduced.get(other, col) {
                self.reduced.xor_row_into(other, row);
                self.combo.xor_row_into(other, row);
            }
        }
    }
}

impl Default for ProgressiveRowReducer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn gf2_rank_from_scratch(rows: &[Vec<bool>], n_cols: usize) -> usize {
        let mut m = GenMatrix::zeros(rows.len(), n_cols);
        for (i, row) in rows.iter().enumerate() {
            for (j, &b) in row.iter().enumerate() {
                m.set(i, j, b);
            }
        }
        let mut rank = 0;
        let mut used_cols = vec![false; n_cols];
        let mut work: Vec<Vec<bool>> = rows.to_vec();
        for col in 0..n_cols {
            if used_cols[col] {
                continue;
            }
            if let Some(piv) = (rank..work.len()).find(|&i| work[i][col]) {
                work.swap(rank, piv);
                for i in 0..work.len() {
                    if i != rank && work[i][col] {
                        for j in 0..n_cols {
                            work[i][j] ^= work[rank][j];
                        }
                    }
                }
                used_cols[col] = true;
                rank += 1;
            }
        }
        rank
    }

    #[test]
    fn rank_matches_scratch_after_add_rows_only() {
        let mut rng = StdRng::seed_from_u64(42);
        for trial in 0..20 {
            let n_cols = 1 + (trial % 8);
            let n_rows = 1 + (trial % 6);
            let rows: Vec<Vec<bool>> =
                (0..n_rows).map(|_| (0..n_cols).map(|_| rng.gen_bool(0.5)).collect()).collect();
            let mut red = ProgressiveRowReducer::new();
            for row in &rows {
                red.add_row(row);
            }
            assert_eq!(red.rank(), gf2_rank_from_scratch(&rows, n_cols));
        }
    }

    #[test]
    fn rank_matches_scratch_interleaved_rows_and_columns() {
        let mut rng = StdRng::seed_from_u64(7);
        for trial in 0..20 {
            let n_rows = 1 + (trial % 5);
            let n_cols = 1 + (trial % 5);
            let full: Vec<Vec<bool>> =
                (0..n_rows).map(|_| (0..n_cols).map(|_| rng.gen_bool(0.5)).collect()).collect();

            let mut red = ProgressiveRowReducer::new();
            // Interleave: add the first column of all rows, then the rows
            // grow one column at a time.
            for i in 0..n_rows {
                red.add_row(&full[i][..0]);
            }
            let mut prefix_cols: Vec<Vec<bool>> = vec![Vec::new(); n_rows];
            for col in 0..n_cols {
                let c: Vec<bool> = (0..n_rows).map(|i| full[i][col]).collect();
                red.add_column(&c);
                for i in 0..n_rows {
                    prefix_cols[i].push(full[i][col]);
                }
                assert_eq!(red.rank(), gf2_rank_from_scratch(&prefix_cols, col + 1));
            }
        }
    }

    #[test]
    fn rank_per_prefix_is_monotone_and_matches_rank() {
        let rows = vec![vec![true, false, true], vec![false, true, true], vec![true, true, false]];
        let mut red = ProgressiveRowReducer::new();
        for r in &rows {
            red.add_row(r);
        }
        let prefix = red.rank_per_prefix();
        assert_eq!(*prefix.last().unwrap(), red.rank());
        for w in prefix.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn full_rank_identity() {
        let mut red = ProgressiveRowReducer::new();
        for i in 0..4 {
            let mut row = vec![false; 4];
            row[i] = true;
            red.add_row(&row);
        }
        assert!(red.is_full_rank());
        assert_eq!(red.rank(), 4);
    }
}
