//! Energy records of a geometry, discriminated by their `method` field.

use super::discriminated::{TaggedVariant, VariantDecoder};
use super::error::DecodeError;
use super::reader::{NodeReader, ResultNode};
use crate::core::constraints::Constraint;
use phf::phf_map;
use serde::Serialize;

/// Per-root energies, one row per root.
pub type Matrix = Vec<Vec<f64>>;

const METHOD: &str = "method";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScfEnergy {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totalenergy: Option<Matrix>,
}

/// Second-order perturbation energies (canonical or RI).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mp2Energy {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refenergy: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correnergy: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totalenergy: Option<Matrix>,
}

/// Coupled-cluster family energies from the MDCI module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MdciEnergy {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refenergy: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correnergy: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triplescorrection: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totalenergy: Option<Matrix>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CasscfEnergy {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nroots: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totalenergy: Option<Matrix>,
}

impl ResultNode for ScfEnergy {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            method: reader.string(METHOD)?.unwrap_or_default(),
            totalenergy: reader.matrix("totalenergy", Constraint::Finite)?,
        })
    }
}

impl ResultNode for Mp2Energy {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            method: reader.string(METHOD)?.unwrap_or_default(),
            refenergy: reader.matrix("refenergy", Constraint::Finite)?,
            correnergy: reader.matrix("correnergy", Constraint::Finite)?,
            totalenergy: reader.matrix("totalenergy", Constraint::Finite)?,
        })
    }
}

impl ResultNode for MdciEnergy {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            method: reader.string(METHOD)?.unwrap_or_default(),
            refenergy: reader.matrix("refenergy", Constraint::Finite)?,
            correnergy: reader.matrix("correnergy", Constraint::Finite)?,
            triplescorrection: reader.matrix("triplescorrection", Constraint::Finite)?,
            totalenergy: reader.matrix("totalenergy", Constraint::Finite)?,
        })
    }
}

impl ResultNode for CasscfEnergy {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            method: reader.string(METHOD)?.unwrap_or_default(),
            nroots: reader.i64("nroots", Constraint::Positive)?,
            totalenergy: reader.matrix("totalenergy", Constraint::Finite)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnergyRecord {
    Scf(ScfEnergy),
    Mp2(Mp2Energy),
    Mdci(MdciEnergy),
    Casscf(CasscfEnergy),
}

fn read_scf(reader: &NodeReader<'_>) -> Result<EnergyRecord, DecodeError> {
    ScfEnergy::read(reader).map(EnergyRecord::Scf)
}

fn read_mp2(reader: &NodeReader<'_>) -> Result<EnergyRecord, DecodeError> {
    Mp2Energy::read(reader).map(EnergyRecord::Mp2)
}

fn read_mdci(reader: &NodeReader<'_>) -> Result<EnergyRecord, DecodeError> {
    MdciEnergy::read(reader).map(EnergyRecord::Mdci)
}

fn read_casscf(reader: &NodeReader<'_>) -> Result<EnergyRecord, DecodeError> {
    CasscfEnergy::read(reader).map(EnergyRecord::Casscf)
}

/// Discriminator values to their record decoders. Lookup is exact.
static ENERGY_VARIANTS: phf::Map<&'static str, VariantDecoder<EnergyRecord>> = phf_map! {
    "SCF" => read_scf as VariantDecoder<EnergyRecord>,
    "MP2" => read_mp2 as VariantDecoder<EnergyRecord>,
    "RI-MP2" => read_mp2 as VariantDecoder<EnergyRecord>,
    "MDCI" => read_mdci as VariantDecoder<EnergyRecord>,
    "CASSCF" => read_casscf as VariantDecoder<EnergyRecord>,
};

impl TaggedVariant for EnergyRecord {
    const TAG_FIELD: &'static str = METHOD;

    fn decoder(tag: &str) -> Option<VariantDecoder<Self>> {
        ENERGY_VARIANTS.get(tag).copied()
    }

    fn tag(&self) -> &str {
        match self {
            EnergyRecord::Scf(e) => &e.method,
            EnergyRecord::Mp2(e) => &e.method,
            EnergyRecord::Mdci(e) => &e.method,
            EnergyRecord::Casscf(e) => &e.method,
        }
    }
}

impl EnergyRecord {
    /// Ground-root total energy in Hartree. Correlated records without an
    /// explicit total fall back to reference plus correlation energy.
    pub fn total_energy(&self) -> Option<f64> {
        match self {
            EnergyRecord::Scf(e) => leading(&e.totalenergy),
            EnergyRecord::Casscf(e) => leading(&e.totalenergy),
            EnergyRecord::Mp2(e) => leading(&e.totalenergy)
                .or_else(|| Some(leading(&e.refenergy)? + leading(&e.correnergy)?)),
            EnergyRecord::Mdci(e) => leading(&e.totalenergy).or_else(|| {
                let triples = leading(&e.triplescorrection).unwrap_or(0.0);
                Some(leading(&e.refenergy)? + leading(&e.correnergy)? + triples)
            }),
        }
    }
}

fn leading(matrix: &Option<Matrix>) -> Option<f64> {
    matrix.as_ref()?.first()?.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::results::discriminated::{DiscriminatedList, decode_list};
    use crate::core::results::reader::DecodeOptions;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> Result<DiscriminatedList<EnergyRecord>, DecodeError> {
        decode_list(&value, EnergyRecord::TAG_FIELD, &DecodeOptions::default())
    }

    #[test]
    fn each_method_selects_its_record_type() {
        let list = decode(json!([
            {"method": "SCF", "totalenergy": [[-76.02]]},
            {"method": "RI-MP2", "refenergy": [[-76.02]], "correnergy": [[-0.21]]},
            {"method": "MDCI", "totalenergy": [[-76.25]]},
            {"method": "CASSCF", "nroots": 2, "totalenergy": [[-75.9], [-75.6]]},
        ]))
        .unwrap();

        assert!(matches!(list.items()[0], EnergyRecord::Scf(_)));
        assert!(matches!(list.items()[1], EnergyRecord::Mp2(_)));
        assert!(matches!(list.items()[2], EnergyRecord::Mdci(_)));
        assert!(matches!(list.items()[3], EnergyRecord::Casscf(_)));
        assert_eq!(list.items()[2].tag(), "MDCI");
    }

    #[test]
    fn unrecognised_method_is_reported() {
        let err = decode(json!([{"method": "NOT_A_METHOD"}])).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownVariant { ref tag, .. } if tag == "NOT_A_METHOD"));
    }

    #[test]
    fn method_tags_match_exactly() {
        for tag in ["scf", "Mdci", "ri-mp2", " MDCI ", "SCF\n"] {
            let err = decode(json!([{"method": tag, "totalenergy": [[-1.0]]}])).unwrap_err();
            assert!(
                matches!(err, DecodeError::UnknownVariant { tag: ref found, .. } if found == tag),
                "tag {tag:?} should not resolve, got {err:?}"
            );
        }
    }

    #[test]
    fn total_energy_prefers_explicit_totals() {
        let list = decode(json!([
            {"method": "SCF", "totalenergy": [[-1.5]]},
            {"method": "MP2", "refenergy": [[-1.5]], "correnergy": [[-0.25]]},
            {"method": "MP2", "refenergy": [[-1.5]], "correnergy": [[-0.25]], "totalenergy": [[-2.0]]},
            {"method": "MDCI", "refenergy": [[-1.0]], "correnergy": [[-0.5]], "triplescorrection": [[-0.25]]},
            {"method": "CASSCF"},
        ]))
        .unwrap();
        let totals: Vec<Option<f64>> = list.iter().map(EnergyRecord::total_energy).collect();
        assert_eq!(totals, vec![Some(-1.5), Some(-1.75), Some(-2.0), Some(-1.75), None]);
    }

    #[test]
    fn non_finite_energies_are_rejected() {
        let err = decode(json!([{"method": "SCF", "totalenergy": [["x"]]}])).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { .. }));

        let err = decode(json!([{"method": "CASSCF", "nroots": 0}])).unwrap_err();
        assert!(matches!(err, DecodeError::ConstraintViolation { .. }));
    }

    #[test]
    fn records_serialize_back_to_their_source_shape() {
        let source = json!([
            {"method": "SCF", "totalenergy": [[-76.0266327341]]},
            {"method": "RI-MP2", "refenergy": [[-76.0266327341]], "correnergy": [[-0.2018]]},
        ]);
        let list = decode(source.clone()).unwrap();
        assert_eq!(serde_json::to_value(&list).unwrap(), source);
    }
}
