//! Polymorphic result lists whose elements select their record type through a
//! string discriminator field.

use super::error::DecodeError;
use super::reader::{DecodeOptions, NodeReader, ROOT, UnknownVariantPolicy, to_array};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Decodes one list element once its variant is known.
pub type VariantDecoder<V> = fn(&NodeReader<'_>) -> Result<V, DecodeError>;

/// A closed family of record types sharing one discriminator field.
pub trait TaggedVariant: Sized {
    /// Name of the discriminator field, after key normalization.
    const TAG_FIELD: &'static str;

    /// Resolves a discriminator value to its decoder, `None` if unrecognised.
    fn decoder(tag: &str) -> Option<VariantDecoder<Self>>;

    /// The discriminator value the element was decoded from.
    fn tag(&self) -> &str;
}

/// An ordered list of variant records; source order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DiscriminatedList<V> {
    items: Vec<V>,
}

impl<V> DiscriminatedList<V> {
    pub fn new(items: Vec<V>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[V] {
        &self.items
    }

    pub fn into_items(self) -> Vec<V> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.items.iter()
    }

    pub fn first(&self) -> Option<&V> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&V> {
        self.items.last()
    }
}

impl<V: TaggedVariant> DiscriminatedList<V> {
    /// All elements whose discriminator equals `tag`.
    pub fn with_tag<'s>(&'s self, tag: &'s str) -> impl Iterator<Item = &'s V> + 's {
        self.items.iter().filter(move |item| item.tag() == tag)
    }
}

impl<'s, V> IntoIterator for &'s DiscriminatedList<V> {
    type Item = &'s V;
    type IntoIter = std::slice::Iter<'s, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Decodes a JSON array of objects, resolving each through `tag_field`.
///
/// # Errors
///
/// Returns [`DecodeError::MissingDiscriminator`] for an element without the
/// tag, and [`DecodeError::UnknownVariant`] for an unrecognised tag unless
/// `options` asks for such elements to be skipped.
pub fn decode_list<V: TaggedVariant>(
    value: &Value,
    tag_field: &str,
    options: &DecodeOptions,
) -> Result<DiscriminatedList<V>, DecodeError> {
    decode_list_at(value, tag_field, ROOT.to_string(), options)
}

pub(crate) fn decode_list_at<V: TaggedVariant>(
    value: &Value,
    tag_field: &str,
    path: String,
    options: &DecodeOptions,
) -> Result<DiscriminatedList<V>, DecodeError> {
    let elements = to_array(value, &path)?;
    let mut items = Vec::with_capacity(elements.len());

    for (index, element) in elements.iter().enumerate() {
        let element_path = format!("{path}[{index}]");
        let reader = NodeReader::new(element, element_path.clone(), options)?;
        let Some(tag) = reader.tag(tag_field)? else {
            return Err(DecodeError::MissingDiscriminator {
                element: element_path,
                tag_field: tag_field.to_string(),
            });
        };

        match V::decoder(&tag) {
            Some(decode) => items.push(reader.finish(decode)?),
            None => match options.unknown_variants {
                UnknownVariantPolicy::FailFast => {
                    return Err(DecodeError::UnknownVariant {
                        element: element_path,
                        tag,
                    });
                }
                UnknownVariantPolicy::Skip => {
                    warn!(element = %element_path, tag = %tag, "Skipping result record of unknown variant");
                }
            },
        }
    }

    Ok(DiscriminatedList { items })
}
