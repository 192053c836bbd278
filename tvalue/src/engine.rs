use lnb_matrix::{GenMatrix, ProgressiveRowReducer};
use lnb_util::gray::{compositions, GraySubsetFlips};
use tracing::debug;

/// Re-exported composition enumerator, specialised to the `(k, d, max_part)`
/// shape every t-value method needs: compositions of `k` into `d` parts,
/// each part bounded by the net's row count `m`.
pub fn compositions_for(k: usize, d: usize, m: usize) -> Vec<Vec<usize>> {
    compositions(k, d, m)
}

/// The top `k_j` rows of `mats[j]`, restricted to the first `width` columns,
/// as dense bit rows — the per-composition sub-matrix stacked into a
/// `k x width` matrix before asking whether it is full rank.
fn composition_rows(mats: &[GenMatrix], comp: &[usize], width: usize) -> Vec<Vec<bool>> {
    let mut rows = Vec::with_capacity(comp.iter().sum());
    for (j, &kj) in comp.iter().enumerate() {
        for row in 0..kj {
            rows.push((0..width).map(|col| mats[j].get(row, col)).collect());
        }
    }
    rows
}

/// Whether every composition of `k` (rows split `k_1 + .. + k_d = k` across
/// `mats`, each `k_j <= m`) yields a full-rank `k x width` matrix, checked
/// via `ProgressiveRowReducer` (the Gauss method).
fn all_compositions_full_rank_gauss(mats: &[GenMatrix], k: usize, d: usize, m: usize, width: usize) -> bool {
    for comp in compositions_for(k, d, m) {
        let rows = composition_rows(mats, &comp, width);
        let mut reducer = ProgressiveRowReducer::new();
        for row in &rows {
            reducer.add_row(row);
        }
        if reducer.rank() < k {
            return false;
        }
    }
    true
}

/// Largest `k <= width` for which every composition is full rank, found by
/// scanning `k` upward and stopping at the first failure — every published
/// t-value algorithm relies on this quantity being nondecreasing in `k` for
/// a genuine digital net (a failing composition at `k` can only gain more
/// linearly dependent rows at `k+1`, never fewer).
fn max_full_rank_k(mats: &[GenMatrix], d: usize, m: usize, width: usize, max_sub_proj: Option<usize>) -> usize {
    let mut k_max = 0;
    for k in 0..=width.min(m * d) {
        if !all_compositions_full_rank_gauss(mats, k, d, m, width) {
            break;
        }
        k_max = k;
        if let Some(bound) = max_sub_proj {
            // `t = width - k_max`; once we have matched the known lower
            // bound from a sub-projection's t-value, no further search can
            // improve on it.
            if width - k_max <= bound {
                break;
            }
        }
    }
    k_max
}

/// Progressive-Gauss t-value of the projection spanned by `mats`:
/// `m - k_max` where `k_max` is the largest row-count for which
/// every composition's stacked sub-matrix is full rank over the full `m`
/// columns. `max_sub_proj` is an optional lower bound already known from a
/// sub-projection, letting the scan stop as soon as it is met.
pub fn gauss(mats: &[GenMatrix], m: usize, max_sub_proj: Option<usize>) -> usize {
    let d = mats.len();
    let k_max = max_full_rank_k(mats, d, m, m, max_sub_proj);
    let t = m - k_max;
    debug!(t, d, m, "gauss t-value");
    t
}

/// Per-level Gauss t-values: the `l`-th entry is the t-value of the
/// projection restricted to its first `l` columns, `l = 1..=m`, tracking
/// the rank of every column-prefix simultaneously.
pub fn gauss_per_level(mats: &[GenMatrix], m: usize) -> Vec<usize> {
    (1..=m).map(|l| l - max_full_rank_k(mats, mats.len(), m, l, None)).collect()
}

/// Whether a composition's `k` rows are linearly independent over `width`
/// columns, tested by XOR-ing every non-empty subset (in Gray-code order,
/// `O(2^k)` steps) and checking none vanishes — the Schmid reference method,
/// deliberately avoiding `ProgressiveRowReducer` so it can cross-check the
/// Gauss method's use of it.
fn composition_is_full_rank_schmid(rows: &[Vec<bool>], width: usize) -> bool {
    let k = rows.len();
    if k == 0 {
        return true;
    }
    let mut running = vec![false; width];
    for flip in GraySubsetFlips::new(k as u32) {
        for c in 0..width {
            running[c] ^= rows[flip][c];
        }
        if running.iter().all(|&b| !b) {
            return false;
        }
    }
    true
}

fn max_full_rank_k_schmid(mats: &[GenMatrix], d: usize, m: usize, width: usize) -> usize {
    let mut k_max = 0;
    for k in 0..=width.min(m * d) {
        let ok = compositions_for(k, d, m)
            .iter()
            .all(|comp| composition_is_full_rank_schmid(&composition_rows(mats, comp, width), width));
        if !ok {
            break;
        }
        k_max = k;
    }
    k_max
}

/// Schmid-method t-value: `O(2^k)` per composition, no dynamic linear
/// algebra, used to cross-check [`gauss`].
pub fn schmid(mats: &[GenMatrix], m: usize) -> usize {
    let k_max = max_full_rank_k_schmid(mats, mats.len(), m, m);
    m - k_max
}

/// `PirsicSchmid`: refines [`schmid`] so a single Gray-code pass per
/// composition yields every level's t-value at once, by tracking the
/// length of the running XOR's leading zero run. A subset whose running
/// XOR is zero in its first `prefix` columns witnesses rank deficiency for
/// every level `l <= prefix`.
pub fn pirsic_schmid_per_level(mats: &[GenMatrix], m: usize) -> Vec<usize> {
    let d = mats.len();
    let mut k_max_per_level = vec![0usize; m + 1];
    let mut locked = vec![false; m + 1];

    for k in 0..=m.min(m * d) {
        if (1..=m).all(|l| locked[l]) {
            break;
        }
        let mut fails_at_level = vec![false; m + 1];
        if k > 0 {
            for comp in compositions_for(k, d, m) {
                let rows = composition_rows(mats, &comp, m);
                let mut running = vec![false; m];
                for flip in GraySubsetFlips::new(k as u32) {
                    for c in 0..m {
                        running[c] ^= rows[flip][c];
                    }
                    let prefix = running.iter().take_while(|&&b| !b).count();
                    for l in 1..=prefix.min(m) {
                        fails_at_level[l] = true;
                    }
                }
            }
        }
        for l in 1..=m {
            if locked[l] {
                continue;
            }
            if fails_at_level[l] {
                locked[l] = true;
            } else {
                k_max_per_level[l] = k;
            }
        }
    }
    (1..=m).map(|l| l - k_max_per_level[l]).collect()
}
