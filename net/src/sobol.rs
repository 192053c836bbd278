//! Sobol direction numbers and the generating-matrix recurrence.
//!
//! `JOE_KUO_INIT_M` embeds the initial direction-number seeds `m_1..m_e` for
//! dimensions `2..=JOE_KUO_MAX_DIMENSION`, taken from the standard Joe & Kuo
//! (2008) table — a small prefix of the full ~21 200-dimension table.
//! Dimensions beyond the embedded prefix fall back to the
//! smallest-odd-seed rule, which still satisfies the `m_i` odd, `m_i <
//! 2^i` invariant but is not the published Joe-Kuo net.

use lnb_matrix::GenMatrix;

use crate::primitive_poly::{primitive_polynomial, PrimitivePoly};

const JOE_KUO_MAX_DIMENSION: usize = 15;

/// `JOE_KUO_INIT_M[j - 2]` holds the seeds `m_1 .. m_e` for Sobol dimension
/// `j` (1-based, `e` = degree of `j`'s primitive polynomial).
const JOE_KUO_INIT_M: &[&[u64]] = &[
    &[1],             // j=2,  e=1
    &[1, 3],          // j=3,  e=2
    &[1, 3, 1],       // j=4,  e=3
    &[1, 1, 1],       // j=5,  e=3
    &[1, 1, 3, 3],    // j=6,  e=4
    &[1, 3, 5, 13],   // j=7,  e=4
    &[1, 1, 5, 5, 17],   // j=8,  e=5
    &[1, 1, 5, 5, 5],    // j=9,  e=5
    &[1, 1, 7, 11, 19],  // j=10, e=5
    &[1, 1, 5, 1, 1],    // j=11, e=5
    &[1, 1, 1, 3, 11],   // j=12, e=5
    &[1, 3, 5, 5, 31],   // j=13, e=5
    &[1, 3, 3, 9, 7, 49],    // j=14, e=6
    &[1, 1, 5, 11, 19, 45],  // j=15, e=6
];

/// Direction-number seeds for Sobol dimension `j` (1-based), one entry per
/// bit of the primitive polynomial's degree. `j = 1` returns `&[]`: the
/// first Sobol dimension uses the trivial van der Corput recurrence with no
/// polynomial at all.
pub fn joe_kuo_direction_numbers(j: usize) -> &'static [u64] {
    if j < 2 || j - 2 >= JOE_KUO_INIT_M.len() {
        &[]
    } else {
        JOE_KUO_INIT_M[j - 2]
    }
}

/// Everything needed to extend a Sobol dimension's direction numbers: the
/// primitive polynomial (`None` for `j = 1`) and the initial seeds.
#[derive(Clone, Debug)]
pub struct SobolParams {
    pub dimension: usize,
    pub poly: Option<PrimitivePoly>,
    pub seeds: Vec<u64>,
}

impl SobolParams {
    /// Builds the parameters for Sobol dimension `j` (1-based), preferring
    /// the embedded Joe-Kuo seeds and falling back to the smallest-odd-seed
    /// rule beyond the tabulated prefix or beyond the primitive-polynomial
    /// table entirely.
    pub fn for_dimension(j: usize) -> Self {
        if j <= 1 {
            return SobolParams { dimension: j, poly: None, seeds: Vec::new() };
        }
        let poly = primitive_polynomial(j);
        let seeds = match poly {
            Some(p) if !joe_kuo_direction_numbers(j).is_empty() => joe_kuo_direction_numbers(j).to_vec(),
            Some(p) => (1..=p.degree as u64).map(smallest_odd_seed).collect(),
            None => Vec::new(),
        };
        SobolParams { dimension: j, poly, seeds }
    }

    /// Extends the direction-number sequence to `w` entries via the Sobol
    /// recurrence: `m_i = 2 m_{i-1} xor 4 m_{i-2} xor .. xor 2^e m_{i-e} xor
    /// m_{i-e}`, with the middle terms gated by the coefficients of the
    /// primitive polynomial.
    pub fn direction_numbers(&self, w: usize) -> Vec<u64> {
        let Some(poly) = self.poly else {
            // Dimension 1: every direction number is 1 (van der Corput).
            return vec![1; w];
        };
        let e = poly.degree as usize;
        let mut m: Vec<u64> = self.seeds.clone();
        m.truncate(e);
        while m.len() < w {
            let i = m.len() + 1;
            let mut next = 0u64;
            for k in 1..e {
                let coeff = (poly.poly.0 >> (e - k)) & 1;
                if coeff != 0 {
                    next ^= (1u64 << k) * m[i - k - 1];
                }
            }
            let tail = m[i - e - 1];
            next ^= (1u64 << e) * tail;
            next ^= tail;
            m.push(next);
        }
        m.truncate(w);
        m
    }
}

fn smallest_odd_seed(i: u64) -> u64 {
    // Smallest odd value < 2^i, i.e. 1, matching the invariant for every i >= 1.
    let _ = i;
    1
}

/// Builds an `m_rows x w` generating matrix whose `c`-th column (`c =
/// 0..w`) is the binary expansion of direction number `m[c]`: the top `c+1`
/// bits hold `m[c]`'s digits MSB-first, the remaining rows (if `m_rows >
/// c+1`) are zero.
pub fn direction_numbers_to_matrix(m: &[u64], m_rows: usize) -> GenMatrix {
    let mut mat = GenMatrix::zeros(m_rows, m.len());
    for (c, &value) in m.iter().enumerate() {
        let width = c + 1;
        for row in 0..width.min(m_rows) {
            let bit = (value >> (width - 1 - row)) & 1;
            mat.set(row, c, bit != 0);
        }
    }
    mat
}
