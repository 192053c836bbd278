use std::cmp::Ordering;
use std::fmt;

/// A figure-of-merit value: a plain scalar for a unilevel construction, or
/// one value per embedding level for a multilevel (embedded) one. Kept as
/// one type threaded through
/// `lnb-storage`, `lnb-coord-uniform`, `lnb-projtree`, `lnb-filters` and
/// `lnb-search` rather than duplicated per crate, the way a single
/// opening-value type is threaded from one pipeline stage to the next
/// instead of being redefined per phase.
#[derive(Clone, Debug, PartialEq)]
pub enum MeritValue {
    Scalar(f64),
    Levels(Vec<f64>),
}

impl MeritValue {
    pub const INFINITY: MeritValue = MeritValue::Scalar(f64::INFINITY);

    pub fn is_scalar(&self) -> bool {
        matches!(self, MeritValue::Scalar(_))
    }

    /// The combiner-free scalar form: the value itself if already scalar, or
    /// the max over levels (the cheapest, always-defined collapse — callers
    /// needing a different collapse go through `lnb-filters`' level
    /// combiner instead).
    pub fn as_scalar_or_max(&self) -> f64 {
        match self {
            MeritValue::Scalar(v) => *v,
            MeritValue::Levels(v) => v.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> MeritValue {
        match self {
            MeritValue::Scalar(v) => MeritValue::Scalar(f(*v)),
            MeritValue::Levels(v) => MeritValue::Levels(v.iter().map(|x| f(*x)).collect()),
        }
    }

    /// Elementwise combination of two merits of the same shape (scalar with
    /// scalar, or same-length level vectors), used by the `p`-norm
    /// accumulation in the weighted figure evaluator.
    pub fn zip_with(&self, other: &MeritValue, f: impl Fn(f64, f64) -> f64) -> MeritValue {
        match (self, other) {
            (MeritValue::Scalar(a), MeritValue::Scalar(b)) => MeritValue::Scalar(f(*a, *b)),
            (MeritValue::Levels(a), MeritValue::Levels(b)) => {
                assert_eq!(a.len(), b.len(), "level-count mismatch combining merits");
                MeritValue::Levels(a.iter().zip(b).map(|(x, y)| f(*x, *y)).collect())
            }
            _ => panic!("cannot combine a scalar merit with a multilevel one"),
        }
    }

    /// Comparison used by `MinObserver`: scalar merits compare directly;
    /// multilevel merits compare by their `as_scalar_or_max` collapse, since
    /// the running minimum is always a single ordering key (the level
    /// combiner in `lnb-filters` is what produces that scalar in practice).
    pub fn compare_key(&self) -> f64 {
        self.as_scalar_or_max()
    }
}

impl PartialOrd for MeritValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare_key().partial_cmp(&other.compare_key())
    }
}

impl fmt::Display for MeritValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeritValue::Scalar(v) => write!(f, "{v:.8e}"),
            MeritValue::Levels(v) => {
                write!(f, "[")?;
                for (i, x) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{x:.8e}")?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_ordering() {
        let a = MeritValue::Scalar(0.1);
        let b = MeritValue::Scalar(0.2);
        assert!(a < b);
    }

    #[test]
    fn levels_compare_by_max() {
        let a = MeritValue::Levels(vec![0.1, 0.9]);
        let b = MeritValue::Scalar(0.5);
        assert!(b < a);
    }

    #[test]
    fn zip_with_adds_scalars() {
        let a = MeritValue::Scalar(1.0);
        let b = MeritValue::Scalar(2.0);
        assert_eq!(a.zip_with(&b, |x, y| x + y), MeritValue::Scalar(3.0));
    }
}
