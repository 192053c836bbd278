use lnb_net::{PrimitivePoly, SobolParams};
use lnb_util::{Gf2Poly, LnbError, LnbResult};

/// Parses a direction-number file in the classic Joe & Kuo layout: one
/// header line, then one line per dimension `j >= 2`:
///
/// ```text
/// d       s       a       m_i
/// 2       1       0       1
/// 3       2       1       1 3
/// ```
///
/// `d` is the dimension, `s` the primitive polynomial's degree, `a` its
/// middle coefficients packed as an integer (bit `k` is the coefficient of
/// `z^{s-k}` for `k` in `1..s`), and the trailing `m_i` are the seeds. A
/// custom file overrides the embedded Joe-Kuo table one dimension at a
/// time; dimensions it does not mention keep using the embedded table.
pub fn parse_direction_number_file(contents: &str) -> LnbResult<Vec<SobolParams>> {
    let mut out = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('d') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(LnbError::BadSize(format!("direction-number file line {}: expected at least 3 fields", line_no + 1)));
        }
        let dimension: usize = fields[0].parse().map_err(|_| bad_line(line_no))?;
        let degree: u32 = fields[1].parse().map_err(|_| bad_line(line_no))?;
        let a: u64 = fields[2].parse().map_err(|_| bad_line(line_no))?;
        let seeds: Vec<u64> = fields[3..].iter().map(|f| f.parse().map_err(|_| bad_line(line_no))).collect::<LnbResult<_>>()?;

        if degree == 0 {
            out.push(SobolParams { dimension, poly: None, seeds: Vec::new() });
            continue;
        }
        // Reconstruct the full primitive polynomial bit pattern: leading
        // and trailing 1 bits are implicit in the Joe-Kuo `a` encoding.
        let poly_bits = (1u64 << degree) | (a << 1) | 1;
        let poly = PrimitivePoly { degree, poly: Gf2Poly::from_int(poly_bits) };
        out.push(SobolParams { dimension, poly: Some(poly), seeds });
    }
    Ok(out)
}

fn bad_line(line_no: usize) -> LnbError {
    LnbError::BadSize(format!("direction-number file line {}: malformed field", line_no + 1))
}
