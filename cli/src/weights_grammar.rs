use lnb_util::{LnbError, LnbResult};
use lnb_weights::{Projection, Weights};

/// Parses the `--weights` grammar: one or more `;`-separated
/// clauses, each `family:param:param:...`, summed into a single
/// [`Weights::Combined`] when more than one clause is given (a bare single
/// clause is returned unwrapped, not boxed in a one-element `Combined`).
///
/// ```text
/// product:<default>:<gamma_1>,<gamma_2>,...
/// order-dependent:<default>:<capgamma_1>,<capgamma_2>,...
/// pod:<od_default>:<capgamma_csv>:<prod_default>:<gamma_csv>
/// projection-dependent:<default>:{1,2}=0.5,{3}=0.2
/// interlaced-pod:<factor>:<inner-clause>
/// ```
pub fn parse_weights(spec: &str) -> LnbResult<Weights> {
    let clauses: Vec<&str> = spec.split(';').map(str::trim).filter(|s| !s.is_empty()).collect();
    if clauses.is_empty() {
        return Err(LnbError::BadWeights("empty weight specification".into()));
    }
    let mut parsed: Vec<Weights> = clauses.iter().map(|c| parse_clause(c)).collect::<LnbResult<_>>()?;
    if parsed.len() == 1 {
        Ok(parsed.pop().unwrap())
    } else {
        Ok(Weights::combined(parsed))
    }
}

fn parse_clause(clause: &str) -> LnbResult<Weights> {
    let mut parts = clause.splitn(2, ':');
    let family = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("");

    match family {
        "product" => {
            let (default, gamma) = split_default_and_csv(rest)?;
            Ok(Weights::product(default, gamma))
        }
        "order-dependent" => {
            let (default, capital_gamma) = split_default_and_csv(rest)?;
            Ok(Weights::order_dependent(default, capital_gamma))
        }
        "pod" => {
            let fields: Vec<&str> = rest.split(':').collect();
            if fields.len() != 4 {
                return Err(LnbError::BadWeights(format!("pod needs 4 ':'-separated fields, got {}", fields.len())));
            }
            let od_default = parse_f64(fields[0])?;
            let capital_gamma = parse_csv(fields[1])?;
            let prod_default = parse_f64(fields[2])?;
            let gamma = parse_csv(fields[3])?;
            Ok(Weights::pod(od_default, capital_gamma, prod_default, gamma))
        }
        "projection-dependent" => {
            let mut fields = rest.splitn(2, ':');
            let default = parse_f64(fields.next().unwrap_or(""))?;
            let entries_str = fields.next().unwrap_or("");
            let entries = parse_projection_entries(entries_str)?;
            Ok(Weights::projection_dependent(default, entries))
        }
        "interlaced-pod" => {
            let mut fields = rest.splitn(2, ':');
            let factor: usize = fields
                .next()
                .ok_or_else(|| LnbError::BadWeights("interlaced-pod needs a factor".into()))?
                .parse()
                .map_err(|_| LnbError::BadWeights("interlaced-pod factor must be an integer".into()))?;
            let inner_clause = fields.next().ok_or_else(|| LnbError::BadWeights("interlaced-pod needs an inner clause".into()))?;
            let pod = parse_clause(inner_clause)?;
            Ok(Weights::interlaced_pod(pod, factor))
        }
        other => Err(LnbError::BadWeights(format!("unknown weight family '{other}'"))),
    }
}

fn split_default_and_csv(rest: &str) -> LnbResult<(f64, Vec<f64>)> {
    let mut fields = rest.splitn(2, ':');
    let default = parse_f64(fields.next().unwrap_or(""))?;
    let csv = fields.next().unwrap_or("");
    Ok((default, parse_csv(csv)?))
}

fn parse_csv(csv: &str) -> LnbResult<Vec<f64>> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_f64)
        .collect()
}

fn parse_f64(s: &str) -> LnbResult<f64> {
    s.trim().parse().map_err(|_| LnbError::BadWeights(format!("'{s}' is not a number")))
}

/// Parses `{1,2}=0.5,{3}=0.2` into `[(Projection({1,2}), 0.5), (Projection({3}), 0.2)]`.
fn parse_projection_entries(s: &str) -> LnbResult<Vec<(Projection, f64)>> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (proj_str, weight_str) =
                entry.split_once('=').ok_or_else(|| LnbError::BadWeights(format!("'{entry}' is missing '='")))?;
            let proj_str = proj_str.trim().trim_start_matches('{').trim_end_matches('}');
            let coords: Vec<usize> = proj_str
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|c| c.parse().map_err(|_| LnbError::BadWeights(format!("'{c}' is not a coordinate index"))))
                .collect::<LnbResult<_>>()?;
            if coords.is_empty() {
                return Err(LnbError::BadWeights(format!("'{entry}' names an empty projection")));
            }
            let weight = parse_f64(weight_str)?;
            Ok((Projection::new(coords), weight))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_product_clause() {
        let w = parse_weights("product:0.1:0.5,0.7").unwrap();
        let u = Projection::new([0, 1]);
        assert!((w.get_weight(&u) - 0.5 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn parses_an_order_dependent_clause() {
        let w = parse_weights("order-dependent:0.0:1.0,0.3").unwrap();
        assert!((w.get_weight(&Projection::singleton(0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn parses_a_pod_clause() {
        let w = parse_weights("pod:0.0:1.0,0.3:0.0:0.5,0.7").unwrap();
        let u = Projection::new([0, 1]);
        assert!((w.get_weight(&u) - 0.3 * 0.5 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn parses_a_projection_dependent_clause() {
        let w = parse_weights("projection-dependent:0.0:{0,1}=0.9,{2}=0.2").unwrap();
        assert!((w.get_weight(&Projection::new([0, 1])) - 0.9).abs() < 1e-12);
        assert!((w.get_weight(&Projection::new([2])) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn parses_combined_clauses() {
        let w = parse_weights("product:0.0:0.5; order-dependent:0.0:0.25").unwrap();
        let u = Projection::singleton(0);
        assert!((w.get_weight(&u) - (0.5 + 0.25)).abs() < 1e-12);
    }

    #[test]
    fn parses_an_interlaced_pod_clause() {
        let w = parse_weights("interlaced-pod:3:pod:0.0:1.0:0.0:0.8").unwrap();
        let u = Projection::new([0, 1, 2]);
        let expected = 0.8 * 0.5f64.powi(1) * 0.5f64.powi(2) * 0.5f64.powi(3);
        assert!((w.get_weight(&u) - expected).abs() < 1e-12);
    }

    #[test]
    fn rejects_unknown_family() {
        assert!(parse_weights("mystery:1.0").is_err());
    }

    #[test]
    fn rejects_empty_spec() {
        assert!(parse_weights("").is_err());
    }
}
