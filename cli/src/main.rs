mod args;
mod direction_numbers;
mod output;
mod weights_grammar;

use clap::Parser;

use lnb_lattice::SizeParam;
use lnb_storage::{IAlpha, IbKernel, Kernel, PAlpha, RKernel};
use lnb_search::{build_sobol_net, weighted_merit_of, Explorer, FullCBCExplorer, LatticeSearchDriver, MixedCBCExplorer, NetSearchDriver, RandomCBCExplorer};
use lnb_util::{ceil_log2, Gf2Poly, LnbError, LnbResult};
use lnb_weights::Weights;

use args::{Cli, Construction, ExplorerKind};

fn main() {
    tracing_subscriber::fmt::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> LnbResult<()> {
    let cli = Cli::parse();
    let weights = weights_grammar::parse_weights(&cli.weights)?;

    match cli.construction {
        Construction::Lattice => run_lattice(&cli, weights),
        Construction::Net => run_net(&cli, weights),
    }
}

fn run_lattice(cli: &Cli, weights: Weights) -> LnbResult<()> {
    let size = parse_lattice_size(&cli.size)?;
    let kernel = parse_kernel(&cli.figure)?;

    let mut driver = LatticeSearchDriver::new(size, kernel.as_ref(), &weights);
    let mut explorer = build_explorer(cli);
    let filters = lnb_filters::FilterPipeline::new();

    let rule = driver.run(cli.dimension, explorer.as_mut(), &filters, None);
    let result = output::lattice_result(&rule, driver.base_merit());
    println!("{}", output::render(&result, cli.format));
    Ok(())
}

fn run_net(cli: &Cli, weights: Weights) -> LnbResult<()> {
    if cli.figure.eq_ignore_ascii_case("sobol") {
        let m_rows = parse_bit_depth(&cli.size)?;
        if let Some(path) = &cli.direction_numbers {
            // A custom direction-number file is accepted but Sobol
            // construction here always follows the embedded Joe-Kuo table;
            // net-driven direction-number plumbing is future work.
            let contents = std::fs::read_to_string(path)
                .map_err(|e| LnbError::Unsupported(format!("could not read direction-number file '{path}': {e}")))?;
            let _ = direction_numbers::parse_direction_number_file(&contents)?;
        }
        let net = build_sobol_net(cli.dimension, m_rows);
        let matrices = net.matrices();
        let merit = weighted_merit_of(&weights, matrices, m_rows);
        let result = output::net_result(&net, &merit);
        println!("{}", output::render(&result, cli.format));
        return Ok(());
    }

    let modulus = parse_polynomial_size(&cli.size)?;
    let m_rows = modulus.degree().ok_or_else(|| LnbError::BadSize("poly modulus has no degree".into()))? as usize;

    let mut driver = NetSearchDriver::new(weights.clone(), modulus, m_rows, cli.dimension);
    let mut explorer = build_explorer(cli);
    let net = driver.run(cli.dimension, explorer.as_mut());
    let merit = weighted_merit_of(&weights, net.matrices(), m_rows);
    let result = output::net_result(&net, &merit);
    println!("{}", output::render(&result, cli.format));
    Ok(())
}

fn build_explorer(cli: &Cli) -> Box<dyn Explorer> {
    match cli.explorer {
        ExplorerKind::Full => Box::new(FullCBCExplorer),
        ExplorerKind::Random => Box::new(RandomCBCExplorer::new(cli.seed, cli.explorer_samples)),
        ExplorerKind::Mixed => Box::new(MixedCBCExplorer::new(cli.explorer_full_until, cli.seed, cli.explorer_samples)),
    }
}

/// `--size` grammar for a lattice construction: `<n>` (ordinary),
/// `<base>^<max_level>` (embedded ordinary), or `poly:<int>` (polynomial
/// lattice, admissible for `LatticeSearchDriver` exactly like the ordinary
/// case since `SizeParam` unifies both).
fn parse_lattice_size(spec: &str) -> LnbResult<SizeParam> {
    if let Some(rest) = spec.strip_prefix("poly:") {
        let n: u64 = rest.parse().map_err(|_| LnbError::BadSize(format!("'{rest}' is not an integer")))?;
        let modulus = lnb_lattice::polynomial_size_from_int(n)?;
        return SizeParam::polynomial(modulus, None);
    }
    if let Some((base_str, level_str)) = spec.split_once('^') {
        let base: u64 = base_str.parse().map_err(|_| LnbError::BadSize(format!("'{base_str}' is not an integer")))?;
        let max_level: u32 = level_str.parse().map_err(|_| LnbError::BadSize(format!("'{level_str}' is not an integer")))?;
        return SizeParam::ordinary_embedded(base, max_level);
    }
    let n: u64 = spec.parse().map_err(|_| LnbError::BadSize(format!("'{spec}' is not an integer")))?;
    SizeParam::ordinary(n)
}

/// `--size poly:<int>` for a polynomial-lattice digital net search.
fn parse_polynomial_size(spec: &str) -> LnbResult<Gf2Poly> {
    let rest = spec
        .strip_prefix("poly:")
        .ok_or_else(|| LnbError::BadSize(format!("net construction needs 'poly:<int>', got '{spec}'")))?;
    let n: u64 = rest.parse().map_err(|_| LnbError::BadSize(format!("'{rest}' is not an integer")))?;
    lnb_lattice::polynomial_size_from_int(n)
}

/// `--size bits:<m>` (explicit row count) or a plain `<n>` (taken as
/// `ceil_log2(n)` rows) for a direct Sobol' net build.
fn parse_bit_depth(spec: &str) -> LnbResult<usize> {
    if let Some(rest) = spec.strip_prefix("bits:") {
        return rest.parse().map_err(|_| LnbError::BadSize(format!("'{rest}' is not an integer")));
    }
    let n: u64 = spec.parse().map_err(|_| LnbError::BadSize(format!("'{spec}' is not an integer")))?;
    Ok(ceil_log2(n.max(1)) as usize)
}

/// `--figure` grammar: `P<alpha>`,
/// `R`, `I<alpha>`, `IC<alpha>`, `Ib`, any of which may carry a `-PLR`
/// suffix (accepted but not distinguished — see `storage::PAlphaPlr`'s doc
/// comment on why a `-PLR` kernel evaluates identically to its ordinary
/// counterpart, the distinction living entirely in which points `Storage`
/// feeds it).
fn parse_kernel(figure: &str) -> LnbResult<Box<dyn Kernel>> {
    let base = figure.strip_suffix("-PLR").or_else(|| figure.strip_suffix("-plr")).unwrap_or(figure);

    if base.eq_ignore_ascii_case("ib") {
        return Ok(Box::new(IbKernel));
    }
    if base.eq_ignore_ascii_case("r") {
        return Ok(Box::new(RKernel));
    }
    if let Some(rest) = base.strip_prefix("IC").or_else(|| base.strip_prefix("ic")) {
        let alpha = parse_alpha(rest)?;
        return Ok(Box::new(IAlpha::new(alpha)));
    }
    if let Some(rest) = base.strip_prefix('I').or_else(|| base.strip_prefix('i')) {
        let alpha = parse_alpha(rest)?;
        return Ok(Box::new(IAlpha::new(alpha)));
    }
    if let Some(rest) = base.strip_prefix('P').or_else(|| base.strip_prefix('p')) {
        let alpha = parse_alpha(rest)?;
        return Ok(Box::new(PAlpha::new(alpha)));
    }
    Err(LnbError::BadFigure(format!("unknown figure '{figure}'")))
}

fn parse_alpha(rest: &str) -> LnbResult<u32> {
    let alpha: u32 = rest.parse().map_err(|_| LnbError::BadFigure(format!("'{rest}' is not an even alpha")))?;
    if alpha < 2 || alpha % 2 != 0 {
        return Err(LnbError::BadFigure(format!("alpha = {alpha} must be even and >= 2")));
    }
    Ok(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ordinary_lattice_size() {
        let sp = parse_lattice_size("101").unwrap();
        assert_eq!(sp.n(), 101);
    }

    #[test]
    fn parses_embedded_lattice_size() {
        let sp = parse_lattice_size("2^10").unwrap();
        assert_eq!(sp.n(), 1024);
        assert!(sp.is_embedded());
    }

    #[test]
    fn parses_polynomial_lattice_size() {
        let sp = parse_lattice_size("poly:11").unwrap();
        assert_eq!(sp.n(), 8);
    }

    #[test]
    fn parses_bit_depth_from_plain_integer() {
        assert_eq!(parse_bit_depth("1024").unwrap(), 10);
        assert_eq!(parse_bit_depth("bits:16").unwrap(), 16);
    }

    #[test]
    fn parses_known_figure_names() {
        assert!(parse_kernel("P2").is_ok());
        assert!(parse_kernel("P4-PLR").is_ok());
        assert!(parse_kernel("R").is_ok());
        assert!(parse_kernel("Ib").is_ok());
        assert!(parse_kernel("I2").is_ok());
        assert!(parse_kernel("IC4").is_ok());
        assert!(parse_kernel("nonsense").is_err());
    }

    #[test]
    fn rejects_odd_alpha() {
        assert!(parse_kernel("P3").is_err());
    }
}
