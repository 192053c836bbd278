use lnb_util::{reverse_bits, Gf2Poly, MeritValue};

/// Whether `Storage` folds `omega(x) = omega(1-x)` pairs into a single slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Symmetric,
}

/// Whether `Storage` is laid out for a single point set or for a nested
/// family of `b^l`-point embedded sub-sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Embedding {
    Unilevel,
    Multilevel { base: u64, max_level: u32 },
}

/// The size parameter as `Storage`/`Kernel` need to see it: either an
/// ordinary modulus or a GF(2) polynomial modulus. `lnb-lattice`'s
/// `SizeParam` (which additionally carries the embedding flag at the CLI
/// surface) converts into this when it builds a `Storage`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeKind {
    Integer(u64),
    Polynomial(Gf2Poly),
}

impl SizeKind {
    pub fn n(&self) -> u64 {
        match self {
            SizeKind::Integer(n) => *n,
            SizeKind::Polynomial(m) => m.ring_size(),
        }
    }

    /// `(gen * i) mod n` for an ordinary lattice, or the GF(2) product
    /// `gen * i mod m` read back as an integer for a polynomial lattice.
    pub fn multiply_mod(&self, gen: u64, i: u64) -> u64 {
        match self {
            SizeKind::Integer(n) => ((gen as u128 * i as u128) % *n as u128) as u64,
            SizeKind::Polynomial(m) => Gf2Poly::from_int(gen).mul_mod(Gf2Poly::from_int(i), *m).0,
        }
    }

    /// The canonical real-valued point corresponding to raw index `i`: `i/n`
    /// for an ordinary lattice, or the bit-reversed (radical-inverse) value
    /// of `i`'s `deg(m)`-bit representation for a polynomial lattice, which
    /// is how polynomial-lattice point sets are conventionally mapped into
    /// `[0,1)`.
    pub fn canonical_point(&self, i: u64) -> f64 {
        match self {
            SizeKind::Integer(n) => i as f64 / *n as f64,
            SizeKind::Polynomial(m) => {
                let bits = m.degree().expect("polynomial size modulus must be nonzero") ;
                reverse_bits(i, bits) as f64 / (1u64 << bits) as f64
            }
        }
    }
}

/// Holds the vector of kernel values `omega(i/n)`, indexed by a
/// compile-time-in-spirit (here: field) choice of `Compression` and
/// `Embedding`. `Storage` itself never calls into a `Kernel`; callers fill it
/// via `Kernel::values_vector(storage.canonical_points())`.
#[derive(Clone, Debug)]
pub struct Storage {
    size: SizeKind,
    compression: Compression,
    embedding: Embedding,
}

impl Storage {
    pub fn new(size: SizeKind, compression: Compression, embedding: Embedding) -> Self {
        if let Embedding::Multilevel { base, max_level } = embedding {
            let n = size.n();
            assert_eq!(n, base.pow(max_level), "multilevel storage requires n = base^max_level");
        }
        Storage { size, compression, embedding }
    }

    pub fn size_kind(&self) -> SizeKind {
        self.size
    }

    pub fn n(&self) -> u64 {
        self.size.n()
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn embedding(&self) -> Embedding {
        self.embedding
    }

    /// Number of distinct slots the backing array needs: `n` uncompressed,
    /// or `n/2 + 1` when symmetric compression folds `i` and `n-i` together.
    pub fn len(&self) -> usize {
        match self.compression {
            Compression::None => self.n() as usize,
            Compression::Symmetric => (self.n() / 2 + 1) as usize,
        }
    }

    /// Maps a raw index `0..n` to its backing-array slot.
    #[inline]
    pub fn compress_index(&self, i: u64) -> usize {
        match self.compression {
            Compression::None => i as usize,
            Compression::Symmetric => {
                let n = self.n();
                i.min(n - i) as usize
            }
        }
    }

    /// The canonical points a `Kernel` should be evaluated at to fill this
    /// storage's backing array, one per slot (the slot's raw-index
    /// representative is itself, since `compress_index` is idempotent on
    /// `0..=n/2`).
    pub fn canonical_points(&self) -> Vec<f64> {
        (0..self.len() as u64).map(|i| self.size.canonical_point(i)).collect()
    }

    /// Strided view of `values` (a vector filled by `Kernel::values_vector`
    /// over `canonical_points()`) under generator `gen`: raw index `i` maps
    /// to `values[compress_index((gen*i) mod n)]`.
    pub fn strided<'a>(&'a self, values: &'a [f64], gen: u64) -> StridedView<'a> {
        assert_eq!(values.len(), self.len(), "kernel values vector does not match this storage's slot count");
        StridedView { storage: self, values, gen }
    }

    /// Which embedding level raw index `i` first appears at (0 for `i = 0`,
    /// otherwise the number of trailing base-digit zeros removed), used to
    /// build the per-level sub-ranges `compressed_sum` aggregates over.
    fn level_of(&self, i: u64, base: u64, max_level: u32) -> u32 {
        if i == 0 {
            return 0;
        }
        let mut level = max_level;
        let mut power = base.pow(max_level);
        while power > 1 && i % (power / base) == 0 {
            power /= base;
            level -= 1;
        }
        level
    }

    /// Aggregates `q[i] * strided(kernel_values, gen)[i]` over all raw
    /// indices into a `MeritValue`: a single `1/n`-scaled sum for unilevel
    /// storage, or one `1/b^l`-scaled partial sum per level for multilevel
    /// storage.
    pub fn compressed_sum(&self, q: &[f64], kernel_values: &[f64], gen: u64) -> MeritValue {
        let view = self.strided(kernel_values, gen);
        match self.embedding {
            Embedding::Unilevel => {
                let n = self.n() as f64;
                let sum: f64 = (0..self.n()).map(|i| q[i as usize] * view.get(i)).sum();
                MeritValue::Scalar(sum / n)
            }
            Embedding::Multilevel { base, max_level } => {
                let mut levels = vec![0.0f64; max_level as usize + 1];
                for i in 0..self.n() {
                    let lvl = self.level_of(i, base, max_level);
                    levels[lvl as usize] += q[i as usize] * view.get(i);
                }
                // Each level's running sum accumulates the points introduced
                // strictly at that level; a usable per-level merit needs the
                // points of every coarser level folded in too, then scaled.
                let mut running = 0.0f64;
                for (l, slot) in levels.iter_mut().enumerate() {
                    running += *slot;
                    *slot = running / base.pow(l as u32) as f64;
                }
                MeritValue::Levels(levels)
            }
        }
    }
}

/// A lazy strided view over a kernel-values array: `view.get(i) = values[compress_index((gen*i) mod n)]`.
pub struct StridedView<'a> {
    storage: &'a Storage,
    values: &'a [f64],
    gen: u64,
}

impl<'a> StridedView<'a> {
    #[inline]
    pub fn get(&self, i: u64) -> f64 {
        let idx = self.storage.size.multiply_mod(self.gen, i);
        self.values[self.storage.compress_index(idx)]
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.storage.n()).map(move |i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_halves_under_symmetric_compression() {
        let s = Storage::new(SizeKind::Integer(16), Compression::Symmetric, Embedding::Unilevel);
        assert_eq!(s.len(), 9);
        let s = Storage::new(SizeKind::Integer(16), Compression::None, Embedding::Unilevel);
        assert_eq!(s.len(), 16);
    }

    #[test]
    fn compress_index_folds_symmetric_pairs() {
        let s = Storage::new(SizeKind::Integer(16), Compression::Symmetric, Embedding::Unilevel);
        assert_eq!(s.compress_index(3), s.compress_index(13));
        assert_eq!(s.compress_index(0), 0);
        assert_eq!(s.compress_index(8), 8);
    }

    #[test]
    fn strided_view_matches_direct_index() {
        let s = Storage::new(SizeKind::Integer(8), Compression::None, Embedding::Unilevel);
        let values: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let view = s.strided(&values, 3);
        for i in 0..8u64 {
            assert_eq!(view.get(i), ((3 * i) % 8) as f64);
        }
    }

    #[test]
    fn compressed_sum_unilevel_divides_by_n() {
        let s = Storage::new(SizeKind::Integer(4), Compression::None, Embedding::Unilevel);
        let values = vec![1.0, 1.0, 1.0, 1.0];
        let q = vec![1.0, 1.0, 1.0, 1.0];
        let merit = s.compressed_sum(&q, &values, 1);
        assert_eq!(merit, MeritValue::Scalar(1.0));
    }

    #[test]
    fn multilevel_requires_n_equal_base_pow_levels() {
        let ok = Storage::new(
            SizeKind::Integer(8),
            Compression::None,
            Embedding::Multilevel { base: 2, max_level: 3 },
        );
        assert_eq!(ok.n(), 8);
    }

    #[test]
    #[should_panic]
    fn multilevel_rejects_mismatched_n() {
        Storage::new(SizeKind::Integer(7), Compression::None, Embedding::Multilevel { base: 2, max_level: 3 });
    }

    #[test]
    fn multilevel_sum_is_monotone_in_level_count() {
        let s = Storage::new(SizeKind::Integer(8), Compression::None, Embedding::Multilevel { base: 2, max_level: 3 });
        let values = vec![1.0; 8];
        let q = vec![1.0; 8];
        let merit = s.compressed_sum(&q, &values, 1);
        if let MeritValue::Levels(v) = merit {
            assert_eq!(v.len(), 4);
            // every level should see its prefix's average, which is exactly 1.0 here.
            for x in v {
                assert!((x - 1.0).abs() < 1e-12);
            }
        } else {
            panic!("expected multilevel merit");
        }
    }
}
