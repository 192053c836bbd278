use lnb_storage::{Embedding, SizeKind};
use lnb_util::{ceil_log2, Gf2Poly, LnbError, LnbResult};

/// The size parameter of a lattice or digital net: either an
/// ordinary modulus `n >= 2`, or a GF(2) polynomial modulus, each optionally
/// *embedded* in a nested family of `b^l`-point sub-lattices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeParam {
    Ordinary { n: u64, embedded: Option<EmbeddingSpec> },
    Polynomial { modulus: Gf2Poly, embedded: Option<EmbeddingSpec> },
}

/// `n = base^max_level`; level `l` has `base^l` points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmbeddingSpec {
    pub base: u64,
    pub max_level: u32,
}

impl SizeParam {
    /// Builds an ordinary (non-embedded) lattice size.
    pub fn ordinary(n: u64) -> LnbResult<Self> {
        if n < 2 {
            return Err(LnbError::BadSize(format!("n = {n} must be >= 2")));
        }
        Ok(SizeParam::Ordinary { n, embedded: None })
    }

    /// Builds an embedded ordinary size `n = base^max_level`.
    /// `--size 2^20`-style CLI input resolves to this with
    /// `base = 2`.
    pub fn ordinary_embedded(base: u64, max_level: u32) -> LnbResult<Self> {
        let n = base
            .checked_pow(max_level)
            .ok_or_else(|| LnbError::BadSize(format!("{base}^{max_level} overflows u64")))?;
        Ok(SizeParam::Ordinary { n, embedded: Some(EmbeddingSpec { base, max_level }) })
    }

    /// Builds a polynomial-lattice size from its modulus; `embedded` mirrors
    /// the ordinary case with `base = 2` implied by GF(2) arithmetic.
    pub fn polynomial(modulus: Gf2Poly, embedded_max_level: Option<u32>) -> LnbResult<Self> {
        if modulus.degree().is_none() {
            return Err(LnbError::BadSize("polynomial modulus must be nonzero".into()));
        }
        let embedded = embedded_max_level.map(|max_level| EmbeddingSpec { base: 2, max_level });
        if let Some(spec) = embedded {
            let expect_degree = spec.max_level;
            if modulus.degree() != Some(expect_degree) {
                return Err(LnbError::BadSize(format!(
                    "embedded polynomial lattice needs deg(modulus) = max_level = {expect_degree}"
                )));
            }
        }
        Ok(SizeParam::Polynomial { modulus, embedded })
    }

    pub fn n(&self) -> u64 {
        match self {
            SizeParam::Ordinary { n, .. } => *n,
            SizeParam::Polynomial { modulus, .. } => modulus.ring_size(),
        }
    }

    pub fn is_embedded(&self) -> bool {
        self.embedding_spec().is_some()
    }

    pub fn embedding_spec(&self) -> Option<EmbeddingSpec> {
        match self {
            SizeParam::Ordinary { embedded, .. } => *embedded,
            SizeParam::Polynomial { embedded, .. } => *embedded,
        }
    }

    pub fn to_size_kind(self) -> SizeKind {
        match self {
            SizeParam::Ordinary { n, .. } => SizeKind::Integer(n),
            SizeParam::Polynomial { modulus, .. } => SizeKind::Polynomial(modulus),
        }
    }

    pub fn to_storage_embedding(self) -> Embedding {
        match self.embedding_spec() {
            None => Embedding::Unilevel,
            Some(EmbeddingSpec { base, max_level }) => Embedding::Multilevel { base, max_level },
        }
    }

    /// Whether `gen` is an admissible generator value at this size: for an
    /// ordinary lattice, `1 <= gen < n` and `gcd(gen, n) = 1`; for a
    /// polynomial lattice, `gen` coprime with the modulus and of degree less
    /// than the modulus.
    pub fn is_admissible_generator(&self, gen: u64) -> bool {
        match self {
            SizeParam::Ordinary { n, .. } => gen >= 1 && gen < *n && gcd(gen, *n) == 1,
            SizeParam::Polynomial { modulus, .. } => {
                let g = Gf2Poly::from_int(gen);
                !g.is_zero() && g.degree().unwrap() < modulus.degree().unwrap() && g.is_coprime_with(*modulus)
            }
        }
    }

    /// All admissible generator values, in ascending order, for the
    /// `FullCBCExplorer`.
    pub fn admissible_generators(&self) -> Vec<u64> {
        (1..self.n()).filter(|&g| self.is_admissible_generator(g)).collect()
    }

    pub fn max_level(&self) -> u32 {
        match self.embedding_spec() {
            Some(spec) => spec.max_level,
            None => ceil_log2(self.n().max(1)),
        }
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Constructs the polynomial modulus the CLI's `poly:<int>` syntax names,
/// validating irreducibility the way the real tool would reject
/// a bad user-supplied modulus at parse time.
pub fn polynomial_size_from_int(n: u64) -> LnbResult<Gf2Poly> {
    let p = Gf2Poly::from_int(n);
    if p.degree().is_none() {
        return Err(LnbError::BadSize("poly:0 has no degree".into()));
    }
    Ok(p)
}
