//! Typed `%name ... end` input blocks.
//!
//! Each [`SectionKind`] carries a static field schema. A [`ConfigSection`]
//! validates and coerces values against that schema on assignment and renders
//! present fields in declaration order.

mod schema;
mod section;
mod value;

pub use schema::{FieldKind, FieldSpec, SectionKind, UnknownSection};
pub use section::{ConfigSection, FieldSet, SectionError};
pub use value::{FieldValue, InvalidPath, NumList, PathRef, RawValue};

pub(crate) use value::format_float;
