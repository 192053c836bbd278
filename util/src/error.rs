use thiserror::Error;

/// Workspace-wide error type. Setup- and reporting-time only: the
/// evaluator's inner loop never raises one of these, it only ever produces a
/// `MeritValue` (possibly `+inf` on an observer-driven abort).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LnbError {
    /// A weight clause did not match the grammar.
    #[error("bad weights specification: {0}")]
    BadWeights(String),
    /// A figure-of-merit name is unknown, or incompatible with the kernel's
    /// declared embedding (e.g. a multilevel figure over a unilevel net).
    #[error("bad figure of merit: {0}")]
    BadFigure(String),
    /// A filter name is unknown, or incompatible with the figure it is
    /// chained after (e.g. a level combiner applied to a unilevel merit).
    #[error("bad filter: {0}")]
    BadFilter(String),
    /// A size parameter is not `b^k` for an embedded construction, or not a
    /// valid primitive/irreducible polynomial for a polynomial construction.
    #[error("bad size parameter: {0}")]
    BadSize(String),
    /// An explorer yielded a generator value that is not admissible for the
    /// current size parameter. This always indicates a bug in the explorer,
    /// never user input, and is never recovered from.
    #[error("inadmissible generator value: {0}")]
    BadGenValue(String),
    /// A requested combination is syntactically valid but not implemented
    /// (e.g. a multilevel figure requested over a construction with no
    /// embedding, or a weight family the CLI parses but the evaluator side
    /// has no recurrence for yet).
    #[error("unsupported: {0}")]
    Unsupported(String),
}

pub type LnbResult<T> = Result<T, LnbError>;
