use crate::core::tokens::Token;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Path must not be empty or whitespace-only")]
pub struct InvalidPath;

/// A validated reference to a file used by the engine (`"guess.gbw"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathRef(PathBuf);

impl PathRef {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, InvalidPath> {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            return Err(InvalidPath);
        }
        Ok(Self(PathBuf::from(raw.trim())))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InvalidPath> {
        Self::new(path.as_ref().to_string_lossy())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for PathRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.display())
    }
}

/// An ordered list of numbers, rendered as space-joined elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumList<T>(Vec<T>);

impl<T> NumList<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NumList<i64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(i64::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}

impl fmt::Display for NumList<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| format_float(*v)).collect();
        f.write_str(&parts.join(" "))
    }
}

/// Formats a float so that it always reads back as a float (`150.0`, `1e-8`).
pub(crate) fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// A value as supplied by the caller, before it has been checked against a field.
///
/// `RawValue` deserializes from any self-describing format (TOML tables, JSON
/// objects), so section contents can come from configuration files as well as
/// from code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "PlainValue")]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    IntList(Vec<i64>),
    FloatList(Vec<f64>),
    Record(BTreeMap<String, RawValue>),
    Path(PathRef),
    Token(Token),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlainValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    IntList(Vec<i64>),
    FloatList(Vec<f64>),
    Record(BTreeMap<String, RawValue>),
}

impl From<PlainValue> for RawValue {
    fn from(value: PlainValue) -> Self {
        match value {
            PlainValue::Bool(v) => RawValue::Bool(v),
            PlainValue::Int(v) => RawValue::Int(v),
            PlainValue::Float(v) => RawValue::Float(v),
            PlainValue::Str(v) => RawValue::Str(v),
            PlainValue::IntList(v) => RawValue::IntList(v),
            PlainValue::FloatList(v) => RawValue::FloatList(v),
            PlainValue::Record(v) => RawValue::Record(v),
        }
    }
}

impl RawValue {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "a boolean",
            RawValue::Int(_) => "an integer",
            RawValue::Float(_) => "a float",
            RawValue::Str(_) => "a string",
            RawValue::IntList(_) => "an integer list",
            RawValue::FloatList(_) => "a float list",
            RawValue::Record(_) => "a record",
            RawValue::Path(_) => "a path",
            RawValue::Token(_) => "a token",
        }
    }
}

macro_rules! raw_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for RawValue {
                fn from(value: $ty) -> Self {
                    RawValue::$variant(value.into())
                }
            }
        )+
    };
}

raw_from! {
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    f32 => Float,
    String => Str,
    &str => Str,
    Vec<i64> => IntList,
    Vec<f64> => FloatList,
    PathRef => Path,
    Token => Token,
}

impl From<&[i64]> for RawValue {
    fn from(value: &[i64]) -> Self {
        RawValue::IntList(value.to_vec())
    }
}

impl From<&[f64]> for RawValue {
    fn from(value: &[f64]) -> Self {
        RawValue::FloatList(value.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for RawValue {
    fn from(value: [i64; N]) -> Self {
        RawValue::IntList(value.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for RawValue {
    fn from(value: [f64; N]) -> Self {
        RawValue::FloatList(value.to_vec())
    }
}

/// A validated field value, stored according to the field's declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Word(Token),
    IntList(NumList<i64>),
    FloatList(NumList<f64>),
    Path(PathRef),
    Record(super::section::FieldSet),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathRef> {
        match self {
            FieldValue::Path(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            FieldValue::IntList(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            FieldValue::FloatList(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Canonical single-line text of a scalar or list value. Records have no
    /// inline form and are rendered by their owning section.
    pub fn render_inline(&self) -> Option<String> {
        match self {
            FieldValue::Int(v) => Some(v.to_string()),
            FieldValue::Float(v) => Some(format_float(*v)),
            FieldValue::Bool(v) => Some(v.to_string()),
            FieldValue::Str(v) => Some(format!("\"{}\"", v)),
            FieldValue::Word(v) => Some(v.render()),
            FieldValue::IntList(v) => Some(v.to_string()),
            FieldValue::FloatList(v) => Some(v.to_string()),
            FieldValue::Path(v) => Some(v.to_string()),
            FieldValue::Record(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ref_rejects_blank_strings() {
        assert_eq!(PathRef::new(""), Err(InvalidPath));
        assert_eq!(PathRef::new("   \t"), Err(InvalidPath));
        assert_eq!(
            PathRef::new(" guess.gbw ").unwrap().as_path(),
            Path::new("guess.gbw")
        );
    }

    #[test]
    fn path_ref_renders_quoted() {
        assert_eq!(PathRef::new("run/guess.gbw").unwrap().to_string(), "\"run/guess.gbw\"");
    }

    #[test]
    fn num_lists_render_space_joined_in_order() {
        assert_eq!(NumList::new(vec![19_i64, 20, 3]).to_string(), "19 20 3");
        assert_eq!(NumList::new(vec![298.15, 310.0]).to_string(), "298.15 310.0");
        assert_eq!(NumList::<i64>::default().to_string(), "");
    }

    #[test]
    fn floats_always_keep_a_decimal_marker() {
        assert_eq!(format_float(150.0), "150.0");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(1e-8), "1e-8");
    }

    #[test]
    fn raw_value_deserializes_from_json_shapes() {
        let value: RawValue = serde_json::from_str("[19, 20]").unwrap();
        assert_eq!(value, RawValue::IntList(vec![19, 20]));

        let value: RawValue = serde_json::from_str("[1.5, 2]").unwrap();
        assert_eq!(value, RawValue::FloatList(vec![1.5, 2.0]));

        let value: RawValue = serde_json::from_str(r#"{"start": 0.1}"#).unwrap();
        let mut expected = BTreeMap::new();
        expected.insert("start".to_string(), RawValue::Float(0.1));
        assert_eq!(value, RawValue::Record(expected));

        let value: RawValue = serde_json::from_str("true").unwrap();
        assert_eq!(value, RawValue::Bool(true));
        let value: RawValue = serde_json::from_str("7").unwrap();
        assert_eq!(value, RawValue::Int(7));
        let value: RawValue = serde_json::from_str(r#""kdiis""#).unwrap();
        assert_eq!(value, RawValue::Str("kdiis".into()));
    }

    #[test]
    fn field_value_renders_inline_forms() {
        assert_eq!(FieldValue::Bool(true).render_inline().unwrap(), "true");
        assert_eq!(FieldValue::Str("water".into()).render_inline().unwrap(), "\"water\"");
        assert_eq!(
            FieldValue::Word(Token::new("kdiis")).render_inline().unwrap(),
            "kdiis"
        );
        assert_eq!(FieldValue::Int(-3).render_inline().unwrap(), "-3");
    }
}
