use clap::{Parser, ValueEnum};

/// `latnetbuilder`'s command-line grammar: selects a construction family, a
/// size, a dimension, a figure of merit, a weight specification, and an
/// exploration strategy, then runs a CBC search and prints the result. One
/// flat struct, `#[arg(long, ...)]` per option, `ValueEnum` for closed
/// choices.
#[derive(Parser, Debug)]
#[command(name = "latnetbuilder", about = "Construct low-discrepancy lattice rules and digital nets by CBC search")]
pub struct Cli {
    /// `lattice` (rank-1 ordinary/embedded lattice rule) or `net` (Sobol' or
    /// polynomial-lattice digital net).
    #[arg(long, value_enum)]
    pub construction: Construction,

    /// `<n>` for an ordinary size, `<base>^<max_level>` for an embedded one,
    /// or `poly:<int>` for a GF(2) polynomial modulus.
    #[arg(long)]
    pub size: String,

    /// Number of coordinates to search (`s` in the usual lattice-rule notation).
    #[arg(long)]
    pub dimension: usize,

    /// `P<alpha>`, `R`, `I<alpha>`, `Ib`, or a `-plr` suffixed variant for a
    /// polynomial-lattice kernel.
    #[arg(long, default_value = "P2")]
    pub figure: String,

    /// The weight-specification grammar string; see `lnb_cli::weights_grammar`.
    #[arg(long, default_value = "product:0.0:1.0")]
    pub weights: String,

    /// How candidate generators are explored at each coordinate.
    #[arg(long, value_enum, default_value_t = ExplorerKind::Full)]
    pub explorer: ExplorerKind,

    /// Sample size per coordinate for `random`/`mixed` explorers.
    #[arg(long, default_value_t = 30)]
    pub explorer_samples: usize,

    /// Coordinate count the `mixed` explorer searches exhaustively before
    /// switching to random sampling.
    #[arg(long, default_value_t = 4)]
    pub explorer_full_until: usize,

    /// Seed for the random/mixed explorers' LFSR, so a search is
    /// reproducible under a fixed seed.
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Path to a direction-number file overriding the embedded Joe-Kuo
    /// table for a Sobol construction.
    #[arg(long)]
    pub direction_numbers: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Construction {
    Lattice,
    Net,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExplorerKind {
    Full,
    Random,
    Mixed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
