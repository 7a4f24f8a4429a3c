use crate::core::constraints::Constraint;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The declared type of a section field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Int,
    Float,
    Bool,
    /// Rendered quoted.
    Str,
    /// A bare keyword, accepted as a [`Token`](crate::core::tokens::Token) or a string.
    Word,
    IntList,
    FloatList,
    Path,
    /// A nested sub-block with its own field set.
    Record(&'static [FieldSpec]),
}

impl FieldKind {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            FieldKind::Int => "an integer",
            FieldKind::Float => "a float",
            FieldKind::Bool => "a boolean",
            FieldKind::Str => "a string",
            FieldKind::Word => "a keyword",
            FieldKind::IntList => "an integer list",
            FieldKind::FloatList => "a float list",
            FieldKind::Path => "a path",
            FieldKind::Record(_) => "a record",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Applied to numeric scalars and to every element of numeric lists.
    pub constraint: Constraint,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        constraint: Constraint::Any,
    }
}

const fn checked(name: &'static str, kind: FieldKind, constraint: Constraint) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        constraint,
    }
}

pub(crate) fn find_field(schema: &'static [FieldSpec], name: &str) -> Option<usize> {
    schema.iter().position(|spec| spec.name == name)
}

use Constraint::{Finite, NonNegative, Positive};
use FieldKind::*;

const METHOD_FIELDS: &[FieldSpec] = &[
    field("method", Word),
    field("functional", Word),
    field("runtyp", Word),
    checked("exchfrac", Float, Finite),
    checked("scalmp2c", Float, Finite),
    checked("d3s6", Float, Finite),
    checked("d3a1", Float, Finite),
    checked("d3s8", Float, Finite),
    checked("d3a2", Float, Finite),
    field("frozencore", Word),
];

const BASIS_FIELDS: &[FieldSpec] = &[
    field("basis", Word),
    field("auxj", Word),
    field("auxjk", Word),
    field("auxc", Word),
    field("ecp", Word),
    field("gtoname", Path),
    field("decontract", Bool),
];

const SCF_DIIS_FIELDS: &[FieldSpec] = &[
    checked("start", Float, NonNegative),
    checked("maxeq", Int, Positive),
    checked("bfac", Float, Positive),
    checked("maxc", Float, Positive),
];

const SCF_SOSCF_FIELDS: &[FieldSpec] = &[
    checked("start", Float, NonNegative),
    checked("maxiter", Int, Positive),
];

const SCF_FIELDS: &[FieldSpec] = &[
    field("hftyp", Word),
    checked("maxiter", Int, Positive),
    field("convergence", Word),
    checked("tole", Float, Positive),
    checked("tolp", Float, Positive),
    checked("thresh", Float, Positive),
    field("guess", Word),
    checked("levelshift", Float, NonNegative),
    checked("directresetfreq", Int, NonNegative),
    field("stabperform", Bool),
    checked("rotate", IntList, NonNegative),
    checked("brokensym", IntList, Positive),
    field("diis", Record(SCF_DIIS_FIELDS)),
    field("soscf", Record(SCF_SOSCF_FIELDS)),
];

const FREQ_FIELDS: &[FieldSpec] = &[
    field("anfreq", Bool),
    field("numfreq", Bool),
    field("centraldiff", Bool),
    checked("increment", Float, Positive),
    checked("scalfreq", Float, Positive),
    checked("temp", FloatList, Positive),
    checked("pressure", Float, Positive),
    field("quasirrho", Bool),
    checked("cutofffreq", Float, Positive),
];

const EXCITED_STATE_FIELDS: &[FieldSpec] = &[
    checked("nroots", Int, Positive),
    checked("iroot", Int, Positive),
    checked("maxdim", Int, Positive),
    checked("maxiter", Int, Positive),
    field("tda", Bool),
    field("triplets", Bool),
    checked("etol", Float, Positive),
    checked("rtol", Float, Positive),
    field("donto", Bool),
];

const CPCM_FIELDS: &[FieldSpec] = &[
    field("smd", Bool),
    field("smdsolvent", Str),
    checked("epsilon", Float, Positive),
    checked("refrac", Float, Positive),
    checked("rsolv", Float, Positive),
    field("surfacetype", Word),
    checked("ndiv", Int, Positive),
    field("fepstype", Word),
];

const GEOM_FIELDS: &[FieldSpec] = &[
    checked("maxiter", Int, Positive),
    field("calc_hess", Bool),
    checked("recalc_hess", Int, Positive),
    field("inhess", Word),
    field("inhessname", Path),
    checked("trust", Float, Finite),
    field("convergence", Word),
    field("optimizehydrogens", Bool),
];

const MP2_FIELDS: &[FieldSpec] = &[
    field("ri", Bool),
    field("density", Word),
    field("natorbs", Bool),
    field("doscs", Bool),
    checked("ps", Float, Finite),
    checked("pt", Float, Finite),
];

const MDCI_FIELDS: &[FieldSpec] = &[
    field("citype", Word),
    checked("maxiter", Int, Positive),
    checked("triples", Int, NonNegative),
    checked("tcutpno", Float, Positive),
    checked("tcutpairs", Float, Positive),
    checked("stol", Float, Positive),
    field("localize", Word),
];

const CASSCF_FIELDS: &[FieldSpec] = &[
    checked("nel", Int, NonNegative),
    checked("norb", Int, Positive),
    checked("mult", IntList, Positive),
    checked("nroots", IntList, Positive),
    checked("maxiter", Int, Positive),
    field("ptmethod", Word),
    field("trafostep", Word),
    field("actorbs", Word),
];

const FRAG_FIELDS: &[FieldSpec] = &[
    field("storefrags", Bool),
    checked("printlevel", Int, NonNegative),
    field("fragproc", Word),
];

const OUTPUT_FIELDS: &[FieldSpec] = &[
    field("printlevel", Word),
    field("jsonpropfile", Bool),
    field("jsongbwfile", Bool),
    field("xyzfile", Bool),
    field("pdbfile", Bool),
];

const ELPROP_FIELDS: &[FieldSpec] = &[
    field("dipole", Bool),
    field("quadrupole", Bool),
    checked("polar", Int, NonNegative),
    field("origin", Word),
];

/// The closed catalogue of input blocks.
///
/// Some kinds share one field set and differ only in the block name they render
/// under (`tddft` and `cis`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Method,
    Basis,
    Scf,
    Freq,
    Tddft,
    Cis,
    Cpcm,
    Geom,
    Mp2,
    Mdci,
    Casscf,
    Frag,
    Output,
    Elprop,
}

impl SectionKind {
    pub const ALL: &'static [SectionKind] = &[
        SectionKind::Method,
        SectionKind::Basis,
        SectionKind::Scf,
        SectionKind::Freq,
        SectionKind::Tddft,
        SectionKind::Cis,
        SectionKind::Cpcm,
        SectionKind::Geom,
        SectionKind::Mp2,
        SectionKind::Mdci,
        SectionKind::Casscf,
        SectionKind::Frag,
        SectionKind::Output,
        SectionKind::Elprop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Method => "method",
            SectionKind::Basis => "basis",
            SectionKind::Scf => "scf",
            SectionKind::Freq => "freq",
            SectionKind::Tddft => "tddft",
            SectionKind::Cis => "cis",
            SectionKind::Cpcm => "cpcm",
            SectionKind::Geom => "geom",
            SectionKind::Mp2 => "mp2",
            SectionKind::Mdci => "mdci",
            SectionKind::Casscf => "casscf",
            SectionKind::Frag => "frag",
            SectionKind::Output => "output",
            SectionKind::Elprop => "elprop",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            SectionKind::Method => METHOD_FIELDS,
            SectionKind::Basis => BASIS_FIELDS,
            SectionKind::Scf => SCF_FIELDS,
            SectionKind::Freq => FREQ_FIELDS,
            SectionKind::Tddft | SectionKind::Cis => EXCITED_STATE_FIELDS,
            SectionKind::Cpcm => CPCM_FIELDS,
            SectionKind::Geom => GEOM_FIELDS,
            SectionKind::Mp2 => MP2_FIELDS,
            SectionKind::Mdci => MDCI_FIELDS,
            SectionKind::Casscf => CASSCF_FIELDS,
            SectionKind::Frag => FRAG_FIELDS,
            SectionKind::Output => OUTPUT_FIELDS,
            SectionKind::Elprop => ELPROP_FIELDS,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for SectionKind {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().trim_start_matches('%').to_ascii_lowercase();
        SectionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == key)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_unique(schema: &'static [FieldSpec]) {
        let mut seen = HashSet::new();
        for spec in schema {
            assert_eq!(spec.name, spec.name.to_ascii_lowercase());
            assert!(seen.insert(spec.name), "duplicate field {}", spec.name);
            if let FieldKind::Record(nested) = spec.kind {
                assert_unique(nested);
            }
        }
    }

    #[test]
    fn every_schema_has_unique_lower_case_field_names() {
        for kind in SectionKind::ALL {
            assert_unique(kind.fields());
        }
    }

    #[test]
    fn tddft_and_cis_share_fields_but_not_names() {
        assert_eq!(SectionKind::Tddft.fields(), SectionKind::Cis.fields());
        assert_ne!(SectionKind::Tddft.name(), SectionKind::Cis.name());
    }

    #[test]
    fn section_kind_parses_case_insensitively_with_optional_marker() {
        assert_eq!("SCF".parse::<SectionKind>(), Ok(SectionKind::Scf));
        assert_eq!("%tddft".parse::<SectionKind>(), Ok(SectionKind::Tddft));
        assert_eq!(
            "pal".parse::<SectionKind>(),
            Err(UnknownSection("pal".into()))
        );
    }

    #[test]
    fn find_field_locates_declared_names() {
        assert_eq!(find_field(SCF_FIELDS, "maxiter"), Some(1));
        assert_eq!(find_field(SCF_FIELDS, "nope"), None);
    }
}
