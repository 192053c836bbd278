use tracing::debug;

use lnb_util::MeritValue;

/// A single pipeline stage: a named, possibly-rejecting transform from one
/// `MeritValue` to another. Returning `None` rejects the generator outright
/// (the `LowPass` filter's low-pass cut) — small single-method traits
/// composed by reference rather than one monolithic enum.
pub trait Filter {
    fn name(&self) -> &'static str;
    fn apply(&self, merit: MeritValue) -> Option<MeritValue>;
}

/// An ordered list of [`Filter`]s applied in sequence; the first rejection
/// short-circuits the chain.
#[derive(Default)]
pub struct FilterPipeline {
    stages: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        FilterPipeline { stages: Vec::new() }
    }

    pub fn push(mut self, filter: impl Filter + 'static) -> Self {
        self.stages.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs `merit` through every stage in order, stopping (and returning
    /// `None`) at the first rejection.
    pub fn apply(&self, mut merit: MeritValue) -> Option<MeritValue> {
        for stage in &self.stages {
            match stage.apply(merit) {
                Some(next) => merit = next,
                None => {
                    debug!(filter = stage.name(), "filter pipeline rejected generator");
                    return None;
                }
            }
        }
        Some(merit)
    }
}
