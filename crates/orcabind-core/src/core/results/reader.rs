use super::discriminated::{DiscriminatedList, TaggedVariant, decode_list_at};
use super::error::DecodeError;
use crate::core::constraints::Constraint;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use tracing::trace;

/// Path label of the document root in error messages.
pub(crate) const ROOT: &str = "$";

/// What to do with a list element whose discriminator names no known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownVariantPolicy {
    /// Abort decoding with [`DecodeError::UnknownVariant`].
    #[default]
    FailFast,
    /// Drop the element and log a warning.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub unknown_variants: UnknownVariantPolicy,
}

impl DecodeOptions {
    pub fn skipping_unknown_variants() -> Self {
        Self {
            unknown_variants: UnknownVariantPolicy::Skip,
        }
    }
}

/// A record type decoded from one JSON object of an engine result document.
///
/// Implementors only describe their fields through [`NodeReader`]; absent or
/// `null` fields come back as `None` and keys nobody asks for are ignored.
pub trait ResultNode: Sized {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError>;

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        Self::decode_with(value, &DecodeOptions::default())
    }

    /// # Errors
    ///
    /// Fails if `value` is not an object, if a declared field has the wrong
    /// JSON type or violates its constraint, or if a discriminated list holds
    /// an element that cannot be resolved under `options`.
    fn decode_with(value: &Value, options: &DecodeOptions) -> Result<Self, DecodeError> {
        read_node(value, ROOT.to_string(), options)
    }
}

pub(crate) fn read_node<T: ResultNode>(
    value: &Value,
    path: String,
    options: &DecodeOptions,
) -> Result<T, DecodeError> {
    NodeReader::new(value, path, options)?.finish(T::read)
}

/// Typed, constraint-checked access to the fields of one JSON object.
pub struct NodeReader<'a> {
    object: &'a Map<String, Value>,
    path: String,
    options: &'a DecodeOptions,
    visited: RefCell<HashSet<&'static str>>,
}

impl<'a> NodeReader<'a> {
    pub fn new(value: &'a Value, path: String, options: &'a DecodeOptions) -> Result<Self, DecodeError> {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::NotAnObject { path: path.clone() })?;
        Ok(Self {
            object,
            path,
            options,
            visited: RefCell::default(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn options(&self) -> &DecodeOptions {
        self.options
    }

    pub fn field_path(&self, key: &str) -> String {
        format!("{}.{}", self.path, key)
    }

    pub(crate) fn finish<T>(
        self,
        read: impl FnOnce(&Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        let node = read(&self)?;
        let visited = self.visited.borrow();
        for key in self.object.keys().filter(|key| !visited.contains(key.as_str())) {
            trace!(path = %self.path, key = %key, "Ignoring unrecognised result field");
        }
        Ok(node)
    }

    /// The raw value of `key`; `null` counts as absent.
    pub fn value(&self, key: &'static str) -> Option<&'a Value> {
        self.visited.borrow_mut().insert(key);
        self.object.get(key).filter(|value| !value.is_null())
    }

    /// Reads a discriminator without marking it as consumed.
    pub(crate) fn tag(&self, tag_field: &str) -> Result<Option<String>, DecodeError> {
        match self.object.get(tag_field).filter(|value| !value.is_null()) {
            None => Ok(None),
            Some(value) => to_string(value, &self.field_path(tag_field)).map(Some),
        }
    }

    pub fn f64(&self, key: &'static str, constraint: Constraint) -> Result<Option<f64>, DecodeError> {
        self.value(key)
            .map(|value| to_f64(value, &self.field_path(key), constraint))
            .transpose()
    }

    pub fn i64(&self, key: &'static str, constraint: Constraint) -> Result<Option<i64>, DecodeError> {
        self.value(key)
            .map(|value| to_i64(value, &self.field_path(key), constraint))
            .transpose()
    }

    pub fn bool(&self, key: &'static str) -> Result<Option<bool>, DecodeError> {
        self.value(key)
            .map(|value| {
                value.as_bool().ok_or_else(|| DecodeError::TypeMismatch {
                    field: self.field_path(key),
                    expected: "a boolean",
                })
            })
            .transpose()
    }

    pub fn string(&self, key: &'static str) -> Result<Option<String>, DecodeError> {
        self.value(key)
            .map(|value| to_string(value, &self.field_path(key)))
            .transpose()
    }

    pub fn f64_list(
        &self,
        key: &'static str,
        constraint: Constraint,
    ) -> Result<Option<Vec<f64>>, DecodeError> {
        self.list(key, |value, field| to_f64(value, field, constraint))
    }

    pub fn i64_list(
        &self,
        key: &'static str,
        constraint: Constraint,
    ) -> Result<Option<Vec<i64>>, DecodeError> {
        self.list(key, |value, field| to_i64(value, field, constraint))
    }

    pub fn string_list(&self, key: &'static str) -> Result<Option<Vec<String>>, DecodeError> {
        self.list(key, to_string)
    }

    /// A list of rows of numbers, every entry checked against `constraint`.
    pub fn matrix(
        &self,
        key: &'static str,
        constraint: Constraint,
    ) -> Result<Option<Vec<Vec<f64>>>, DecodeError> {
        self.list(key, |row, field| {
            to_array(row, field)?
                .iter()
                .enumerate()
                .map(|(index, value)| to_f64(value, &format!("{field}[{index}]"), constraint))
                .collect()
        })
    }

    pub fn node<T: ResultNode>(&self, key: &'static str) -> Result<Option<T>, DecodeError> {
        self.value(key)
            .map(|value| read_node(value, self.field_path(key), self.options))
            .transpose()
    }

    /// A list of nested records. A lone object is accepted as a list of one.
    pub fn nodes<T: ResultNode>(&self, key: &'static str) -> Result<Option<Vec<T>>, DecodeError> {
        let Some(value) = self.value(key) else {
            return Ok(None);
        };
        let field = self.field_path(key);
        if value.is_object() {
            return read_node(value, field, self.options).map(|node| Some(vec![node]));
        }
        to_array(value, &field)?
            .iter()
            .enumerate()
            .map(|(index, item)| read_node(item, format!("{field}[{index}]"), self.options))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// A polymorphic list resolved through `V`'s discriminator table.
    pub fn tagged<V: TaggedVariant>(
        &self,
        key: &'static str,
    ) -> Result<Option<DiscriminatedList<V>>, DecodeError> {
        self.value(key)
            .map(|value| decode_list_at(value, V::TAG_FIELD, self.field_path(key), self.options))
            .transpose()
    }

    fn list<T>(
        &self,
        key: &'static str,
        item: impl Fn(&Value, &str) -> Result<T, DecodeError>,
    ) -> Result<Option<Vec<T>>, DecodeError> {
        let Some(value) = self.value(key) else {
            return Ok(None);
        };
        let field = self.field_path(key);
        to_array(value, &field)?
            .iter()
            .enumerate()
            .map(|(index, value)| item(value, &format!("{field}[{index}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

pub(crate) fn to_array<'v>(value: &'v Value, field: &str) -> Result<&'v Vec<Value>, DecodeError> {
    value.as_array().ok_or_else(|| DecodeError::TypeMismatch {
        field: field.to_string(),
        expected: "an array",
    })
}

pub(crate) fn to_f64(value: &Value, field: &str, constraint: Constraint) -> Result<f64, DecodeError> {
    let number = value.as_f64().ok_or_else(|| DecodeError::TypeMismatch {
        field: field.to_string(),
        expected: "a number",
    })?;
    constraint
        .check(number)
        .map_err(|reason| DecodeError::ConstraintViolation {
            field: field.to_string(),
            reason,
        })?;
    Ok(number)
}

pub(crate) fn to_i64(value: &Value, field: &str, constraint: Constraint) -> Result<i64, DecodeError> {
    let number = value.as_i64().ok_or_else(|| DecodeError::TypeMismatch {
        field: field.to_string(),
        expected: "an integer",
    })?;
    constraint
        .check_int(number)
        .map_err(|reason| DecodeError::ConstraintViolation {
            field: field.to_string(),
            reason,
        })?;
    Ok(number)
}

pub(crate) fn to_string(value: &Value, field: &str) -> Result<String, DecodeError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DecodeError::TypeMismatch {
            field: field.to_string(),
            expected: "a string",
        })
}
