use std::collections::{BTreeMap, HashMap};

use crate::Projection;

/// The weight family. `get_weight(&Projection) -> f64` is the only
/// operation every variant must support; the specialised state creators in
/// `lnb-coord-uniform` additionally use the variant-specific accessors below
/// (`gammas`, `capital_gammas`, `by_max_index`, …) to build their incremental
/// recurrences without going through the generic, map-based path.
#[derive(Clone, Debug)]
pub enum Weights {
    /// `γ_u = ∏_{j ∈ u} γ_j`.
    Product { default: f64, gamma: Vec<f64> },
    /// `γ_u = Γ_{|u|}`.
    OrderDependent { default: f64, capital_gamma: Vec<f64> },
    /// `γ_u = Γ_{|u|} ∏_{j ∈ u} γ_j`.
    Pod {
        od_default: f64,
        capital_gamma: Vec<f64>,
        prod_default: f64,
        gamma: Vec<f64>,
    },
    /// Explicit `projection -> weight` map, default for anything unlisted.
    /// Entries are additionally grouped by their maximum coordinate so a CBC
    /// driver can, on reaching dimension `d`, cheaply enumerate only the
    /// explicit weights that become relevant at that step.
    ProjectionDependent {
        default: f64,
        by_projection: HashMap<Projection, f64>,
        by_max_index: BTreeMap<usize, Vec<(Projection, f64)>>,
    },
    /// Sum of sub-weights.
    Combined(Vec<Weights>),
    /// POD weight multiplied by a kernel-specific per-component correction,
    /// used by the interlaced kernels (IA_α, IB, IC_α). `interlacing_factor`
    /// is the block size `d`; a projection over *interlaced* components is
    /// mapped back to the underlying POD projection over original
    /// coordinates, and multiplied by `∏ (1/2)^{position}` over the positions
    /// (1-based, within their block) of the interlaced components it covers.
    InterlacedPod {
        pod: Box<Weights>,
        interlacing_factor: usize,
    },
}

impl Weights {
    pub fn product(default: f64, gamma: Vec<f64>) -> Self {
        Weights::Product { default, gamma }
    }

    pub fn order_dependent(default: f64, capital_gamma: Vec<f64>) -> Self {
        Weights::OrderDependent { default, capital_gamma }
    }

    pub fn pod(od_default: f64, capital_gamma: Vec<f64>, prod_default: f64, gamma: Vec<f64>) -> Self {
        Weights::Pod { od_default, capital_gamma, prod_default, gamma }
    }

    pub fn projection_dependent(default: f64, entries: Vec<(Projection, f64)>) -> Self {
        let mut by_projection = HashMap::new();
        let mut by_max_index: BTreeMap<usize, Vec<(Projection, f64)>> = BTreeMap::new();
        for (proj, w) in entries {
            by_max_index.entry(proj.max()).or_default().push((proj.clone(), w));
            by_projection.insert(proj, w);
        }
        Weights::ProjectionDependent { default, by_projection, by_max_index }
    }

    pub fn combined(parts: Vec<Weights>) -> Self {
        Weights::Combined(parts)
    }

    pub fn interlaced_pod(pod: Weights, interlacing_factor: usize) -> Self {
        assert!(interlacing_factor >= 1);
        Weights::InterlacedPod {
            pod: Box::new(pod),
            interlacing_factor,
        }
    }

    /// Coordinate weight for the `Product` component of a (possibly
    /// `Combined`) weight; `1.0` if this variant has none, which makes it
    /// safe for `ConcreteCoordUniformState-P` to call unconditionally when
    /// dispatched against a non-product weight by mistake (it simply
    /// contributes no scaling).
    pub fn gamma_j(&self, j: usize) -> f64 {
        match self {
            Weights::Product { default, gamma } => gamma.get(j).copied().unwrap_or(*default),
            Weights::Pod { prod_default, gamma, .. } => gamma.get(j).copied().unwrap_or(*prod_default),
            _ => 1.0,
        }
    }

    pub fn capital_gamma_card(&self, card: usize) -> f64 {
        match self {
            Weights::OrderDependent { default, capital_gamma } => {
                capital_gamma.get(card.saturating_sub(1)).copied().unwrap_or(*default)
            }
            Weights::Pod { od_default, capital_gamma, .. } => {
                capital_gamma.get(card.saturating_sub(1)).copied().unwrap_or(*od_default)
            }
            _ => 1.0,
        }
    }

    /// `get_weight(∅) = 0` always; every other projection dispatches to its
    /// variant-specific formula, falling back to the declared default.
    pub fn get_weight(&self, u: &Projection) -> f64 {
        match self {
            Weights::Product { default, gamma } => {
                u.iter().map(|j| gamma.get(j).copied().unwrap_or(*default)).product()
            }
            Weights::OrderDependent { default, capital_gamma } => {
                capital_gamma.get(u.len() - 1).copied().unwrap_or(*default)
            }
            Weights::Pod { od_default, capital_gamma, prod_default, gamma } => {
                let cap = capital_gamma.get(u.len() - 1).copied().unwrap_or(*od_default);
                let prod: f64 = u.iter().map(|j| gamma.get(j).copied().unwrap_or(*prod_default)).product();
                cap * prod
            }
            Weights::ProjectionDependent { default, by_projection, .. } => {
                by_projection.get(u).copied().unwrap_or(*default)
            }
            Weights::Combined(parts) => parts.iter().map(|w| w.get_weight(u)).sum(),
            Weights::InterlacedPod { pod, interlacing_factor } => {
                let f = *interlacing_factor;
                let mut original: std::collections::BTreeSet<usize> = std::collections::BTreeSet::new();
                let mut correction = 1.0f64;
                for comp in u.iter() {
                    original.insert(comp / f);
                    let position = comp % f + 1; // 1-based position within the block
                    correction *= 0.5f64.powi(position as i32);
                }
                let original_proj = Projection::new(original);
                pod.get_weight(&original_proj) * correction
            }
        }
    }

    /// Explicit weights whose maximum coordinate is exactly `max_index`,
    /// for `ProjectionDependent` weights only (empty otherwise). Consumed by
    /// `ConcreteCoordUniformState-PD`'s lazy-creation-on-first-use rule.
    pub fn projection_dependent_at(&self, max_index: usize) -> &[(Projection, f64)] {
        match self {
            Weights::ProjectionDependent { by_max_index, .. } => {
                by_max_index.get(&max_index).map(Vec::as_slice).unwrap_or(&[])
            }
            _ => &[],
        }
    }
}
