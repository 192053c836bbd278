//! Gray-code enumeration helpers used by `lnb-tvalue`'s Gauss and Schmid
//! t-value methods.

/// The binary reflected Gray code of `i`.
#[inline]
pub const fn gray_code(i: u64) -> u64 {
    i ^ (i >> 1)
}

/// Enumerates the `2^n - 1` non-empty subsets of `{0, .., n-1}` in Gray-code
/// order, yielding at each step the single index whose membership flipped
/// relative to the previous subset (the first item flips index `0` into the
/// subset `{0}`). This lets a caller maintain a running XOR/sum over the
/// subset with O(1) work per step instead of recomputing it from scratch.
pub struct GraySubsetFlips {
    i: u64,
    last: u64,
    limit: u64,
}

impl GraySubsetFlips {
    pub fn new(n: u32) -> Self {
        assert!(n <= 63, "subset enumeration of {n} bits would overflow u64");
        Self {
            i: 0,
            last: 0,
            limit: 1u64 << n,
        }
    }
}

impl Iterator for GraySubsetFlips {
    /// The bit index that flipped membership.
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.i += 1;
        if self.i >= self.limit {
            return None;
        }
        let g = gray_code(self.i);
        let flipped = g ^ self.last;
        self.last = g;
        Some(flipped.trailing_zeros() as usize)
    }
}

/// Enumerates every composition `(k_1, .., k_d)` of `k` with `0 <= k_i <=
/// max_part`, as a flat recursive generator. Used by the Gauss and Schmid
/// t-value methods to pick, for each dimension, how many of its top rows
/// contribute to a candidate `k`-row sub-matrix.
///
/// This is a plain recursive enumeration rather than a true "revolving door"
/// Gray code over compositions (which would guarantee consecutive
/// compositions differ by moving a single unit from one part to another);
/// `lnb-tvalue` rebuilds its row reducer from scratch for each composition
/// rather than patching it incrementally, so the traversal order does not
/// need that stronger guarantee.
pub fn compositions(k: usize, d: usize, max_part: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut current = vec![0usize; d];
    compositions_rec(k, d, max_part, 0, &mut current, &mut out);
    out
}

fn compositions_rec(
    remaining: usize,
    d: usize,
    max_part: usize,
    pos: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if pos == d {
        if remaining == 0 {
            out.push(current.clone());
        }
        return;
    }
    let slots_left = d - pos - 1;
    let lo = remaining.saturating_sub(slots_left * max_part);
    let hi = remaining.min(max_part);
    for part in lo..=hi {
        current[pos] = part;
        compositions_rec(remaining - part, d, max_part, pos + 1, current, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn flips_cover_every_nonempty_subset_exactly_once() {
        let n = 6;
        let mut seen: HashSet<u64> = HashSet::new();
        let mut cur = 0u64;
        seen.insert(cur);
        for flip in GraySubsetFlips::new(n) {
            cur ^= 1 << flip;
            assert!(seen.insert(cur), "subset {cur:#b} repeated");
        }
        // 2^n - 1 non-empty subsets plus the empty starting point.
        assert_eq!(seen.len() as u64, 1 << n);
    }

    #[test]
    fn compositions_sum_to_k() {
        let comps = compositions(5, 3, 4);
        assert!(comps.iter().all(|c| c.iter().sum::<usize>() == 5));
        assert!(comps.iter().all(|c| c.iter().all(|&p| p <= 4)));
        // No duplicates.
        let set: HashSet<Vec<usize>> = comps.iter().cloned().collect();
        assert_eq!(set.len(), comps.len());
    }

    #[test]
    fn compositions_count_matches_stars_and_bars_when_unbounded() {
        // C(k + d - 1, d - 1) when max_part >= k.
        let (k, d) = (4, 3);
        let comps = compositions(k, d, k);
        let expected = {
            let n = k + d - 1;
            let r = d - 1;
            (1..=r).fold(1usize, |acc, i| acc * (n - r + i) / i)
        };
        assert_eq!(comps.len(), expected);
    }
}
