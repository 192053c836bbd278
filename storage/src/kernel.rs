use crate::Compression;

/// Bernoulli numbers `B_0 .. B_10`, used by the even-degree Bernoulli
/// polynomials behind the `P_alpha` family of kernels. A compile-time table:
/// extending a figure beyond `alpha = 10` means extending this table, not
/// deriving it at runtime.
const BERNOULLI_NUMBERS: [f64; 11] = [
    1.0,
    -0.5,
    1.0 / 6.0,
    0.0,
    -1.0 / 30.0,
    0.0,
    1.0 / 42.0,
    0.0,
    -1.0 / 30.0,
    0.0,
    5.0 / 66.0,
];

fn binomial(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let mut acc = 1.0f64;
    for i in 0..k {
        acc *= (n - i) as f64 / (i + 1) as f64;
    }
    acc
}

/// `B_n(x) = sum_{k=0}^n C(n,k) B_k x^{n-k}`.
fn bernoulli_polynomial(n: u32, x: f64) -> f64 {
    assert!((n as usize) < BERNOULLI_NUMBERS.len(), "alpha {n} exceeds the embedded Bernoulli-number table");
    (0..=n).map(|k| binomial(n, k) * BERNOULLI_NUMBERS[k as usize] * x.powi((n - k) as i32)).sum()
}

fn factorial(n: u32) -> f64 {
    (1..=n as u64).product::<u64>() as f64
}

/// A single-coordinate function defining a coordinate-uniform figure of
/// merit. `values_vector` fills a `Storage`'s
/// backing array by evaluating `omega` at every canonical point the storage
/// knows about (one evaluation per compressed slot, not per raw index).
pub trait Kernel {
    fn omega(&self, x: f64) -> f64;

    /// Whether `omega(x) == omega(1 - x)` for all `x`, letting `Storage`
    /// fold symmetric pairs into one slot.
    fn is_symmetric(&self) -> bool;

    fn suggested_compression(&self) -> Compression {
        if self.is_symmetric() {
            Compression::Symmetric
        } else {
            Compression::None
        }
    }

    /// The exponent used by the outer coordinate-uniform norm (`CUPower`) —
    /// most kernels raise their contribution to this power before the
    /// `p`-sum/max accumulation in the weighted evaluator.
    fn cu_power(&self) -> f64;

    fn values_vector(&self, canonical_points: &[f64]) -> Vec<f64> {
        canonical_points.iter().map(|&x| self.omega(x)).collect()
    }
}

/// `P_alpha`: the Bernoulli-polynomial kernel for ordinary integration
/// lattices, `alpha` even.
///
/// `omega_alpha(x) = -(-1)^(alpha/2) (2*pi)^alpha / alpha! * B_alpha({x})`,
/// the classical Sloan-Joe normalisation. Conventions differ across the
/// literature; this sign convention makes `omega_2(0) > 0`, matching the
/// worst-case-at-the-origin intuition such figures are meant to capture.
#[derive(Clone, Copy, Debug)]
pub struct PAlpha {
    pub alpha: u32,
}

impl PAlpha {
    pub fn new(alpha: u32) -> Self {
        assert!(alpha >= 2 && alpha % 2 == 0, "P_alpha requires an even alpha >= 2");
        PAlpha { alpha }
    }
}

impl Kernel for PAlpha {
    fn omega(&self, x: f64) -> f64 {
        let frac = x - x.floor();
        let sign = if (self.alpha / 2) % 2 == 0 { 1.0 } else { -1.0 };
        sign * (2.0 * std::f64::consts::PI).powi(self.alpha as i32) / factorial(self.alpha)
            * bernoulli_polynomial(self.alpha, frac)
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn cu_power(&self) -> f64 {
        2.0
    }
}

/// `R`: the simpler triangular kernel behind the classical Zaremba-style `R`
/// figure: `omega_R(x) = x(1-x)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RKernel;

impl Kernel for RKernel {
    fn omega(&self, x: f64) -> f64 {
        let frac = x - x.floor();
        frac * (1.0 - frac)
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn cu_power(&self) -> f64 {
        1.0
    }
}

/// `P_alpha-PLR`: the same Bernoulli kernel as `P_alpha`, evaluated at the
/// radical-inverse points a polynomial lattice's `Storage` produces. The
/// distinction from `PAlpha` is entirely in which points `Storage` feeds it —
/// a kernel's domain is always `[0,1)` regardless of whether the size
/// parameter is an integer or a GF(2) polynomial.
#[derive(Clone, Copy, Debug)]
pub struct PAlphaPlr(pub PAlpha);

impl Kernel for PAlphaPlr {
    fn omega(&self, x: f64) -> f64 {
        self.0.omega(x)
    }
    fn is_symmetric(&self) -> bool {
        self.0.is_symmetric()
    }
    fn cu_power(&self) -> f64 {
        self.0.cu_power()
    }
}

/// `R-PLR`: `RKernel` over polynomial-lattice radical-inverse points.
#[derive(Clone, Copy, Debug, Default)]
pub struct RPlr(pub RKernel);

impl Kernel for RPlr {
    fn omega(&self, x: f64) -> f64 {
        self.0.omega(x)
    }
    fn is_symmetric(&self) -> bool {
        self.0.is_symmetric()
    }
    fn cu_power(&self) -> f64 {
        self.0.cu_power()
    }
}

/// `IB`: the order-1 ("bit") kernel behind the interlaced digital-net
/// figures, a sawtooth with no symmetry. Interlaced-POD consumes its values
/// per interlaced component.
#[derive(Clone, Copy, Debug, Default)]
pub struct IbKernel;

impl Kernel for IbKernel {
    fn omega(&self, x: f64) -> f64 {
        let frac = x - x.floor();
        1.0 - 2.0 * frac
    }

    fn is_symmetric(&self) -> bool {
        false
    }

    fn cu_power(&self) -> f64 {
        1.0
    }
}

/// `IA_alpha` / `IC_alpha`: the dyadic analogue of `P_alpha` used by the
/// interlaced digital-net figures, substituting base `2` for `2*pi` in the
/// Bernoulli-polynomial prefactor. The literature's digital-net kernels are
/// Walsh-series constructions that this approximates rather than reproduces
/// exactly.
#[derive(Clone, Copy, Debug)]
pub struct IAlpha {
    pub alpha: u32,
}

impl IAlpha {
    pub fn new(alpha: u32) -> Self {
        assert!(alpha >= 2 && alpha % 2 == 0, "IA_alpha requires an even alpha >= 2");
        IAlpha { alpha }
    }
}

impl Kernel for IAlpha {
    fn omega(&self, x: f64) -> f64 {
        let frac = x - x.floor();
        let sign = if (self.alpha / 2) % 2 == 0 { 1.0 } else { -1.0 };
        sign * 2f64.powi(self.alpha as i32) / factorial(self.alpha) * bernoulli_polynomial(self.alpha, frac)
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn cu_power(&self) -> f64 {
        2.0
    }
}

/// `IC_alpha` shares `IA_alpha`'s kernel; the two figures differ in how
/// `lnb-coord-uniform` folds the interlaced block (elementary symmetric sum
/// vs. a single combined component), not in the per-component kernel.
pub type ICAlpha = IAlpha;
