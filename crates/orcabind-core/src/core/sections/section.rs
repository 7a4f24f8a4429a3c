use super::schema::{FieldKind, FieldSpec, SectionKind, find_field};
use super::value::{FieldValue, InvalidPath, NumList, PathRef, RawValue};
use crate::core::tokens::resolve_token;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SectionError {
    #[error("Section '{section}' has no field '{field}'")]
    UnknownField { section: &'static str, field: String },
    #[error("Invalid value for '{section}.{field}': {reason}")]
    Validation {
        section: &'static str,
        field: String,
        reason: String,
    },
    #[error("Invalid path for '{section}.{field}': {source}")]
    InvalidPath {
        section: &'static str,
        field: String,
        #[source]
        source: InvalidPath,
    },
}

const INDENT: &str = "  ";

/// The values of one field schema: a section body or a nested sub-block.
///
/// Slots follow the schema's declaration order, which is also the render order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    schema: &'static [FieldSpec],
    values: Vec<Option<FieldValue>>,
}

impl FieldSet {
    pub(crate) fn new(schema: &'static [FieldSpec]) -> Self {
        Self {
            schema,
            values: vec![None; schema.len()],
        }
    }

    pub fn schema(&self) -> &'static [FieldSpec] {
        self.schema
    }

    /// Looks up a present field; nested fields are addressed as `diis.start`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        let name = name.trim().to_ascii_lowercase();
        let (head, rest) = split_path(&name);
        let value = self.values[find_field(self.schema, head)?].as_ref()?;
        match (rest, value) {
            (None, value) => Some(value),
            (Some(rest), FieldValue::Record(nested)) => nested.get(rest),
            (Some(_), _) => None,
        }
    }

    /// Present fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        self.schema
            .iter()
            .zip(&self.values)
            .filter_map(|(spec, value)| value.as_ref().map(|v| (spec.name, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    fn assign(
        &mut self,
        section: &'static str,
        prefix: &str,
        name: &str,
        raw: RawValue,
    ) -> Result<(), SectionError> {
        let name = name.trim().to_ascii_lowercase();
        let (head, rest) = split_path(&name);
        let path = join_path(prefix, head);

        let unknown = || SectionError::UnknownField {
            section,
            field: join_path(prefix, &name),
        };
        let index = find_field(self.schema, head).ok_or_else(unknown)?;
        let spec = self.schema[index];

        match (rest, spec.kind) {
            (Some(rest), FieldKind::Record(nested)) => {
                let mut set = match &self.values[index] {
                    Some(FieldValue::Record(existing)) => existing.clone(),
                    _ => FieldSet::new(nested),
                };
                set.assign(section, &path, rest, raw)?;
                self.values[index] = Some(FieldValue::Record(set));
            }
            (Some(_), _) => return Err(unknown()),
            (None, _) => {
                self.values[index] = Some(coerce(section, &path, &spec, raw)?);
            }
        }
        Ok(())
    }

    fn remove(&mut self, section: &'static str, name: &str) -> Result<Option<FieldValue>, SectionError> {
        let name = name.trim().to_ascii_lowercase();
        let (head, rest) = split_path(&name);
        let index = find_field(self.schema, head).ok_or_else(|| SectionError::UnknownField {
            section,
            field: name.clone(),
        })?;
        match rest {
            None => Ok(self.values[index].take()),
            Some(rest) => match &mut self.values[index] {
                Some(FieldValue::Record(nested)) => nested.remove(section, rest),
                _ if matches!(self.schema[index].kind, FieldKind::Record(_)) => Ok(None),
                _ => Err(SectionError::UnknownField {
                    section,
                    field: name.clone(),
                }),
            },
        }
    }

    /// Copies every field present in `other`; nested records merge recursively.
    fn merge_from(&mut self, other: &FieldSet) {
        for (slot, incoming) in self.values.iter_mut().zip(&other.values) {
            let Some(incoming) = incoming else {
                continue;
            };
            if let (Some(FieldValue::Record(mine)), FieldValue::Record(theirs)) =
                (slot.as_mut(), incoming)
            {
                mine.merge_from(theirs);
                continue;
            }
            *slot = Some(incoming.clone());
        }
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = INDENT.repeat(depth);
        for (name, value) in self.iter() {
            match (value.render_inline(), value) {
                (Some(text), _) => out.push_str(&format!("{}{} {}\n", indent, name, text)),
                (None, FieldValue::Record(nested)) => {
                    out.push_str(&format!("{}{}\n", indent, name));
                    nested.render_into(out, depth + 1);
                    out.push_str(&format!("{}end\n", indent));
                }
                (None, _) => {}
            }
        }
    }
}

fn split_path(name: &str) -> (&str, Option<&str>) {
    match name.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (name, None),
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn coerce(
    section: &'static str,
    field: &str,
    spec: &FieldSpec,
    raw: RawValue,
) -> Result<FieldValue, SectionError> {
    let invalid = |reason: String| SectionError::Validation {
        section,
        field: field.to_string(),
        reason,
    };
    let check = |value: f64| spec.constraint.check(value).map_err(invalid);

    match (spec.kind, raw) {
        (FieldKind::Int, RawValue::Int(v)) => {
            check(v as f64)?;
            Ok(FieldValue::Int(v))
        }
        (FieldKind::Float, RawValue::Float(v)) => {
            check(v)?;
            Ok(FieldValue::Float(v))
        }
        (FieldKind::Float, RawValue::Int(v)) => {
            check(v as f64)?;
            Ok(FieldValue::Float(v as f64))
        }
        (FieldKind::Bool, RawValue::Bool(v)) => Ok(FieldValue::Bool(v)),
        (FieldKind::Str, RawValue::Str(v)) => Ok(FieldValue::Str(v)),
        (FieldKind::Word, RawValue::Token(token)) => Ok(FieldValue::Word(token)),
        (FieldKind::Word, RawValue::Str(text)) => resolve_token(&text)
            .map(FieldValue::Word)
            .map_err(|e| invalid(e.to_string())),
        (FieldKind::IntList, RawValue::IntList(values)) => {
            for v in &values {
                check(*v as f64)?;
            }
            Ok(FieldValue::IntList(NumList::new(values)))
        }
        (FieldKind::FloatList, RawValue::FloatList(values)) => {
            for v in &values {
                check(*v)?;
            }
            Ok(FieldValue::FloatList(NumList::new(values)))
        }
        (FieldKind::FloatList, RawValue::IntList(values)) => {
            let values: Vec<f64> = values.into_iter().map(|v| v as f64).collect();
            for v in &values {
                check(*v)?;
            }
            Ok(FieldValue::FloatList(NumList::new(values)))
        }
        (FieldKind::Path, RawValue::Path(path)) => Ok(FieldValue::Path(path)),
        (FieldKind::Path, RawValue::Str(text)) => PathRef::new(&text)
            .map(FieldValue::Path)
            .map_err(|source| SectionError::InvalidPath {
                section,
                field: field.to_string(),
                source,
            }),
        (FieldKind::Record(nested), RawValue::Record(entries)) => {
            let mut set = FieldSet::new(nested);
            for (name, value) in entries {
                set.assign(section, field, &name, value)?;
            }
            Ok(FieldValue::Record(set))
        }
        (kind, raw) => Err(invalid(format!(
            "expected {}, got {}",
            kind.describe(),
            raw.describe()
        ))),
    }
}

/// A named, typed input block such as `%scf ... end`.
///
/// Every assignment is checked against the field's declared kind and domain
/// before it is stored, so a section never holds an invalid value. Absent
/// fields are simply not rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSection {
    kind: SectionKind,
    fields: FieldSet,
}

impl ConfigSection {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            fields: FieldSet::new(kind.fields()),
        }
    }

    /// Builds a section from `(field, value)` pairs, validating each in order.
    pub fn from_fields<I, K, V>(kind: SectionKind, fields: I) -> Result<Self, SectionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawValue>,
    {
        let mut section = Self::new(kind);
        for (name, value) in fields {
            section.set(name.as_ref(), value)?;
        }
        Ok(section)
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Assigns a field; dotted names (`diis.start`) address nested records.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError::UnknownField`] for names outside the schema,
    /// [`SectionError::InvalidPath`] for blank path values and
    /// [`SectionError::Validation`] for type or domain mismatches. On error the
    /// section is left unchanged.
    pub fn set(&mut self, name: &str, value: impl Into<RawValue>) -> Result<&mut Self, SectionError> {
        self.fields.assign(self.kind.name(), "", name, value.into())?;
        Ok(self)
    }

    pub fn with(mut self, name: &str, value: impl Into<RawValue>) -> Result<Self, SectionError> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Clears a field, returning its previous value.
    pub fn unset(&mut self, name: &str) -> Result<Option<FieldValue>, SectionError> {
        self.fields.remove(self.kind.name(), name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overlays the fields explicitly set on `other`; untouched fields keep their values.
    ///
    /// Sections of a different kind are ignored.
    pub fn merge(&mut self, other: &ConfigSection) {
        if self.kind == other.kind {
            self.fields.merge_from(&other.fields);
        }
    }

    /// The section name followed by one `key value` line per present field.
    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.name());
        self.fields.render_into(&mut out, 1);
        out
    }

    /// The full `%name ... end` block.
    pub fn render_block(&self) -> String {
        format!("%{}end\n", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokens::Token;
    use crate::core::tokens::catalog::BasisSet;
    use std::collections::BTreeMap;

    #[test]
    fn new_section_is_empty_and_renders_an_empty_block() {
        let section = ConfigSection::new(SectionKind::Scf);
        assert!(section.is_empty());
        assert_eq!(section.render(), "scf\n");
        assert_eq!(section.render_block(), "%scf\nend\n");
    }

    #[test]
    fn fields_render_in_declaration_order() {
        let section = ConfigSection::new(SectionKind::Scf)
            .with("rotate", vec![19_i64, 20])
            .unwrap()
            .with("maxiter", 150)
            .unwrap()
            .with("stabperform", true)
            .unwrap();
        assert_eq!(
            section.render(),
            "scf\n  maxiter 150\n  stabperform true\n  rotate 19 20\n"
        );
    }

    #[test]
    fn field_names_are_case_insensitive() {
        let section = ConfigSection::new(SectionKind::Scf).with("MaxIter", 50).unwrap();
        assert_eq!(section.get("maxiter"), Some(&FieldValue::Int(50)));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = ConfigSection::new(SectionKind::Scf)
            .with("nonsense", 1)
            .unwrap_err();
        assert_eq!(
            err,
            SectionError::UnknownField {
                section: "scf",
                field: "nonsense".into()
            }
        );
    }

    #[test]
    fn integers_coerce_into_float_fields_but_not_the_reverse() {
        let section = ConfigSection::new(SectionKind::Freq)
            .with("pressure", 1)
            .unwrap();
        assert_eq!(section.get("pressure"), Some(&FieldValue::Float(1.0)));

        let err = ConfigSection::new(SectionKind::Scf)
            .with("maxiter", 1.5)
            .unwrap_err();
        assert!(matches!(err, SectionError::Validation { ref field, .. } if field == "maxiter"));
    }

    #[test]
    fn domain_constraints_are_enforced_on_assignment() {
        let mut section = ConfigSection::new(SectionKind::Scf);
        assert!(matches!(
            section.set("maxiter", 0),
            Err(SectionError::Validation { .. })
        ));
        assert!(matches!(
            section.set("levelshift", -0.1),
            Err(SectionError::Validation { .. })
        ));
        assert!(section.set("levelshift", 0.0).is_ok());
        assert!(matches!(
            section.set("rotate", vec![1_i64, -2]),
            Err(SectionError::Validation { .. })
        ));
        assert!(section.get("rotate").is_none());
    }

    #[test]
    fn numeric_lists_preserve_element_order() {
        let section = ConfigSection::new(SectionKind::Freq)
            .with("temp", vec![310.0, 298.15, 200.0])
            .unwrap();
        assert_eq!(
            section.get("temp").and_then(FieldValue::as_float_list),
            Some(&[310.0, 298.15, 200.0][..])
        );
        assert!(section.render().contains("  temp 310.0 298.15 200.0\n"));
    }

    #[test]
    fn path_fields_coerce_strings_and_pass_validated_references_through() {
        let mut section = ConfigSection::new(SectionKind::Geom);
        section.set("inhessname", "start.hess").unwrap();
        assert_eq!(
            section.get("inhessname").and_then(FieldValue::as_path),
            Some(&PathRef::new("start.hess").unwrap())
        );

        let reference = PathRef::new("other.hess").unwrap();
        section.set("inhessname", reference.clone()).unwrap();
        assert_eq!(
            section.get("inhessname").and_then(FieldValue::as_path),
            Some(&reference)
        );
        assert!(section.render().contains("  inhessname \"other.hess\"\n"));
    }

    #[test]
    fn blank_path_strings_fail_with_invalid_path() {
        let err = ConfigSection::new(SectionKind::Basis)
            .with("gtoname", "   ")
            .unwrap_err();
        assert_eq!(
            err,
            SectionError::InvalidPath {
                section: "basis",
                field: "gtoname".into(),
                source: InvalidPath
            }
        );
    }

    #[test]
    fn word_fields_accept_tokens_and_resolve_strings() {
        let section = ConfigSection::new(SectionKind::Basis)
            .with("basis", Token::from(BasisSet::Def2Tzvp))
            .unwrap()
            .with("auxj", "DEF2_J")
            .unwrap();
        assert_eq!(
            section.render(),
            "basis\n  basis def2-tzvp\n  auxj def2/j\n"
        );
    }

    #[test]
    fn dotted_names_address_nested_records() {
        let mut section = ConfigSection::new(SectionKind::Scf);
        section.set("diis.start", 0.1).unwrap();
        section.set("diis.maxeq", 7).unwrap();
        assert_eq!(section.get("diis.start"), Some(&FieldValue::Float(0.1)));
        assert_eq!(
            section.render(),
            "scf\n  diis\n    start 0.1\n    maxeq 7\n  end\n"
        );
        assert!(matches!(
            section.set("diis.unknown", 1),
            Err(SectionError::UnknownField { ref field, .. }) if field == "diis.unknown"
        ));
        assert!(matches!(
            section.set("maxiter.start", 1),
            Err(SectionError::UnknownField { .. })
        ));
    }

    #[test]
    fn failed_nested_assignment_leaves_section_unchanged() {
        let mut section = ConfigSection::new(SectionKind::Scf);
        assert!(section.set("diis.start", -1.0).is_err());
        assert!(section.is_empty());
    }

    #[test]
    fn record_values_from_maps_are_validated() {
        let mut entries = BTreeMap::new();
        entries.insert("start".to_string(), RawValue::Float(0.2));
        entries.insert("maxiter".to_string(), RawValue::Int(12));
        let section = ConfigSection::new(SectionKind::Scf)
            .with("soscf", RawValue::Record(entries))
            .unwrap();
        assert_eq!(section.get("soscf.maxiter"), Some(&FieldValue::Int(12)));

        let mut bad = BTreeMap::new();
        bad.insert("maxiter".to_string(), RawValue::Str("lots".into()));
        assert!(matches!(
            ConfigSection::new(SectionKind::Scf).with("soscf", RawValue::Record(bad)),
            Err(SectionError::Validation { ref field, .. }) if field == "soscf.maxiter"
        ));
    }

    #[test]
    fn from_fields_validates_every_entry() {
        let section = ConfigSection::from_fields(
            SectionKind::Tddft,
            [("nroots", RawValue::Int(10)), ("tda", RawValue::Bool(false))],
        )
        .unwrap();
        assert_eq!(section.fields().len(), 2);

        let err = ConfigSection::from_fields(SectionKind::Tddft, [("nroots", -1)]).unwrap_err();
        assert!(matches!(err, SectionError::Validation { .. }));
    }

    #[test]
    fn shared_field_sets_render_under_their_own_names() {
        let tddft = ConfigSection::from_fields(SectionKind::Tddft, [("nroots", 5)]).unwrap();
        let cis = ConfigSection::from_fields(SectionKind::Cis, [("nroots", 5)]).unwrap();
        assert_eq!(tddft.render_block(), "%tddft\n  nroots 5\nend\n");
        assert_eq!(cis.render_block(), "%cis\n  nroots 5\nend\n");
    }

    #[test]
    fn unset_clears_fields() {
        let mut section = ConfigSection::from_fields(SectionKind::Scf, [("maxiter", 10)]).unwrap();
        assert_eq!(section.unset("maxiter").unwrap(), Some(FieldValue::Int(10)));
        assert!(section.is_empty());
        assert_eq!(section.unset("diis.start").unwrap(), None);
        assert!(section.unset("bogus").is_err());
    }

    #[test]
    fn merge_overwrites_only_incoming_fields() {
        let mut first = ConfigSection::new(SectionKind::Scf)
            .with("maxiter", 100)
            .unwrap()
            .with("diis.start", 0.1)
            .unwrap();
        let second = ConfigSection::new(SectionKind::Scf)
            .with("maxiter", 300)
            .unwrap()
            .with("diis.maxeq", 5)
            .unwrap();
        first.merge(&second);

        assert_eq!(first.get("maxiter"), Some(&FieldValue::Int(300)));
        assert_eq!(first.get("diis.start"), Some(&FieldValue::Float(0.1)));
        assert_eq!(first.get("diis.maxeq"), Some(&FieldValue::Int(5)));
    }

    #[test]
    fn merge_ignores_sections_of_another_kind() {
        let mut scf = ConfigSection::from_fields(SectionKind::Scf, [("maxiter", 10)]).unwrap();
        let geom = ConfigSection::from_fields(SectionKind::Geom, [("maxiter", 99)]).unwrap();
        scf.merge(&geom);
        assert_eq!(scf.get("maxiter"), Some(&FieldValue::Int(10)));
    }
}
