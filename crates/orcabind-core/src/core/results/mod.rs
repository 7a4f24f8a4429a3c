//! Strict decoding of the engine's JSON result documents.
//!
//! Result documents are parsed into a generic JSON tree, their keys are
//! lowercased, and the tree is then walked by [`ResultNode`] implementations
//! that check every scalar against its declared [`Constraint`]. Polymorphic
//! lists are resolved through [`DiscriminatedList`].
//!
//! [`Constraint`]: crate::core::constraints::Constraint

mod discriminated;
mod energy;
mod error;
mod gbw;
mod property;
mod reader;

pub use discriminated::{DiscriminatedList, TaggedVariant, VariantDecoder, decode_list};
pub use energy::{CasscfEnergy, EnergyRecord, Matrix, MdciEnergy, Mp2Energy, ScfEnergy};
pub use error::DecodeError;
pub use gbw::{
    BasisSetNames, BasisShell, GbwAtom, GbwMolecule, GbwResults, MolecularOrbital,
    MolecularOrbitals,
};
pub use property::{
    CalculationInfo, CalculationStatus, CartesianEntry, CoordinateSet, DipoleMoment,
    GeometryNode, GeometryResults, MayerPopulationAnalysis, NuclearGradient, PopulationAnalysis,
    PropertyResults, SinglePointData, SolvationDetails, Thermochemistry,
};
pub use reader::{DecodeOptions, NodeReader, ResultNode, UnknownVariantPolicy};

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Recursively lowercases every object key. When two keys collide after
/// folding, the one appearing later wins.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), normalize_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Parses and decodes a result document from text.
///
/// # Errors
///
/// Returns [`DecodeError::Json`] for malformed JSON and any decoding error
/// raised by `T`.
pub fn parse_document<T: ResultNode>(text: &str, options: &DecodeOptions) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    T::decode_with(&normalize_keys(value), options)
}

pub fn load_document<T: ResultNode>(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<T, DecodeError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let node = parse_document(&text, options)?;
    debug!(path = %path.display(), bytes = text.len(), "Decoded result document");
    Ok(node)
}
