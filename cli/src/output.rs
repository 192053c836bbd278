use serde::Serialize;

use lnb_lattice::LatticeRule;
use lnb_net::DigitalNet;
use lnb_util::MeritValue;

use crate::args::OutputFormat;

/// The final reported result of a search: either a lattice rule's
/// generating vector or a digital net's generating matrices, plus the
/// merit value the search converged on.
#[derive(Serialize)]
#[serde(tag = "construction", rename_all = "snake_case")]
pub enum SearchResult {
    Lattice { size: u64, generating_vector: Vec<u64>, merit: MeritScalarOrLevels },
    Net { m_rows: usize, dimension: usize, matrices: Vec<Vec<Vec<bool>>>, merit: MeritScalarOrLevels },
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum MeritScalarOrLevels {
    Scalar(f64),
    Levels(Vec<f64>),
}

impl From<&MeritValue> for MeritScalarOrLevels {
    fn from(value: &MeritValue) -> Self {
        match value {
            MeritValue::Scalar(v) => MeritScalarOrLevels::Scalar(*v),
            MeritValue::Levels(v) => MeritScalarOrLevels::Levels(v.clone()),
        }
    }
}

pub fn lattice_result(rule: &LatticeRule, merit: &MeritValue) -> SearchResult {
    SearchResult::Lattice { size: rule.size().n(), generating_vector: rule.generating_vector().to_vec(), merit: merit.into() }
}

pub fn net_result(net: &DigitalNet, merit: &MeritValue) -> SearchResult {
    let matrices = net
        .matrices()
        .iter()
        .map(|m| (0..m.n_rows()).map(|r| (0..m.n_cols()).map(|c| m.get(r, c)).collect()).collect())
        .collect();
    SearchResult::Net { m_rows: net.m_rows(), dimension: net.dimension(), matrices, merit: merit.into() }
}

/// Renders `result` per `format`: `Text` prints the generating
/// vector or matrices one line at a time followed by the merit in
/// `MeritValue`'s 8-significant-digit scientific notation; `Json` is a
/// direct `serde_json`-free-but-spiritually-equivalent `serde::Serialize`
/// of [`SearchResult`] — we print it with `serde_json` syntax manually
/// rather than pull in the crate, since formatting is the only use.
pub fn render(result: &SearchResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(result),
        OutputFormat::Json => serde_json_lite::to_string(result),
    }
}

fn render_text(result: &SearchResult) -> String {
    match result {
        SearchResult::Lattice { size, generating_vector, merit } => {
            let gens: Vec<String> = generating_vector.iter().map(u64::to_string).collect();
            format!("lattice  n={size}\ngenerating vector: {}\nmerit: {}", gens.join(" "), render_merit(merit))
        }
        SearchResult::Net { m_rows, dimension, matrices, merit } => {
            let mut out = format!("net  m={m_rows}  dimension={dimension}\n");
            for (j, mat) in matrices.iter().enumerate() {
                out.push_str(&format!("matrix {}:\n", j + 1));
                for row in mat {
                    let bits: String = row.iter().map(|&b| if b { '1' } else { '0' }).collect();
                    out.push_str(&bits);
                    out.push('\n');
                }
            }
            out.push_str(&format!("merit: {}", render_merit(merit)));
            out
        }
    }
}

fn render_merit(merit: &MeritScalarOrLevels) -> String {
    match merit {
        MeritScalarOrLevels::Scalar(v) => format!("{v:.8e}"),
        MeritScalarOrLevels::Levels(v) => {
            let parts: Vec<String> = v.iter().map(|x| format!("{x:.8e}")).collect();
            format!("[{}]", parts.join(", "))
        }
    }
}

/// A tiny hand-rolled JSON renderer covering exactly the shapes
/// [`SearchResult`] produces, so `--format json` needs no extra dependency
/// beyond `serde` itself (already carried for the workspace's config/output
/// types). Not a general-purpose serializer.
mod serde_json_lite {
    use serde::ser::{SerializeSeq, SerializeStruct, Serializer};
    use serde::Serialize;

    pub fn to_string<T: Serialize>(value: &T) -> String {
        let mut out = String::new();
        value.serialize(JsonSerializer { out: &mut out }).expect("in-memory JSON serialization cannot fail");
        out
    }

    struct JsonSerializer<'a> {
        out: &'a mut String,
    }

    struct Error;
    impl std::fmt::Display for Error {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "json-lite error")
        }
    }
    impl std::fmt::Debug for Error {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "json-lite error")
        }
    }
    impl std::error::Error for Error {}
    impl serde::ser::Error for Error {
        fn custom<T: std::fmt::Display>(_msg: T) -> Self {
            Error
        }
    }

    macro_rules! forward_display {
        ($method:ident, $ty:ty) => {
            fn $method(self, v: $ty) -> Result<Self::Ok, Self::Error> {
                self.out.push_str(&v.to_string());
                Ok(())
            }
        };
    }

    impl<'a> Serializer for JsonSerializer<'a> {
        type Ok = ();
        type Error = Error;
        type SerializeSeq = JsonSeq<'a>;
        type SerializeTuple = serde::ser::Impossible<(), Error>;
        type SerializeTupleStruct = serde::ser::Impossible<(), Error>;
        type SerializeTupleVariant = serde::ser::Impossible<(), Error>;
        type SerializeMap = serde::ser::Impossible<(), Error>;
        type SerializeStruct = JsonStruct<'a>;
        type SerializeStructVariant = JsonStruct<'a>;

        forward_display!(serialize_i8, i8);
        forward_display!(serialize_i16, i16);
        forward_display!(serialize_i32, i32);
        forward_display!(serialize_i64, i64);
        forward_display!(serialize_u8, u8);
        forward_display!(serialize_u16, u16);
        forward_display!(serialize_u32, u32);
        forward_display!(serialize_u64, u64);
        forward_display!(serialize_f32, f32);
        forward_display!(serialize_f64, f64);

        fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
            self.out.push_str(if v { "true" } else { "false" });
            Ok(())
        }
        fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
            self.out.push('"');
            self.out.push_str(v);
            self.out.push('"');
            Ok(())
        }
        fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
            self.serialize_str(&v.to_string())
        }
        fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Self::Error> {
            Err(Error)
        }
        fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
            self.out.push_str("null");
            Ok(())
        }
        fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
            value.serialize(self)
        }
        fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
            self.out.push_str("null");
            Ok(())
        }
        fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
            self.serialize_unit()
        }
        fn serialize_unit_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            variant: &'static str,
        ) -> Result<Self::Ok, Self::Error> {
            self.serialize_str(variant)
        }
        fn serialize_newtype_struct<T: ?Sized + Serialize>(
            self,
            _name: &'static str,
            value: &T,
        ) -> Result<Self::Ok, Self::Error> {
            value.serialize(self)
        }
        fn serialize_newtype_variant<T: ?Sized + Serialize>(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
            value: &T,
        ) -> Result<Self::Ok, Self::Error> {
            value.serialize(self)
        }
        fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
            self.out.push('[');
            Ok(JsonSeq { out: self.out, first: true })
        }
        fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
            Err(Error)
        }
        fn serialize_tuple_struct(
            self,
            _name: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleStruct, Self::Error> {
            Err(Error)
        }
        fn serialize_tuple_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleVariant, Self::Error> {
            Err(Error)
        }
        fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
            Err(Error)
        }
        fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct, Self::Error> {
            self.out.push('{');
            Ok(JsonStruct { out: self.out, first: true })
        }
        fn serialize_struct_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeStructVariant, Self::Error> {
            self.out.push('{');
            self.out.push_str(&format!("\"construction\":\"{variant}\","));
            Ok(JsonStruct { out: self.out, first: true })
        }
    }

    struct JsonSeq<'a> {
        out: &'a mut String,
        first: bool,
    }
    impl<'a> SerializeSeq for JsonSeq<'a> {
        type Ok = ();
        type Error = Error;
        fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
            if !self.first {
                self.out.push(',');
            }
            self.first = false;
            value.serialize(JsonSerializer { out: self.out })
        }
        fn end(self) -> Result<(), Error> {
            self.out.push(']');
            Ok(())
        }
    }

    struct JsonStruct<'a> {
        out: &'a mut String,
        first: bool,
    }
    impl<'a> SerializeStruct for JsonStruct<'a> {
        type Ok = ();
        type Error = Error;
        fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<(), Error> {
            if !self.first {
                self.out.push(',');
            }
            self.first = false;
            self.out.push_str(&format!("\"{key}\":"));
            value.serialize(JsonSerializer { out: self.out })
        }
        fn end(self) -> Result<(), Error> {
            self.out.push('}');
            Ok(())
        }
    }
    impl<'a> serde::ser::SerializeStructVariant for JsonStruct<'a> {
        type Ok = ();
        type Error = Error;
        fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<(), Error> {
            SerializeStruct::serialize_field(self, key, value)
        }
        fn end(self) -> Result<(), Error> {
            SerializeStruct::end(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lnb_lattice::SizeParam;

    #[test]
    fn text_render_includes_the_generating_vector() {
        let rule = LatticeRule::new(SizeParam::ordinary(7).unwrap(), vec![1, 3]);
        let merit = MeritValue::Scalar(0.125);
        let result = lattice_result(&rule, &merit);
        let text = render(&result, OutputFormat::Text);
        assert!(text.contains("1 3"));
        assert!(text.contains("1.25000000e-1"));
    }

    #[test]
    fn json_render_is_well_formed_braces() {
        let rule = LatticeRule::new(SizeParam::ordinary(7).unwrap(), vec![1, 3]);
        let merit = MeritValue::Scalar(0.125);
        let result = lattice_result(&rule, &merit);
        let json = render(&result, OutputFormat::Json);
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(json.contains("\"generating_vector\":[1,3]"));
    }
}
