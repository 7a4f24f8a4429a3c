//! The wavefunction document exported from a `.gbw` file: atoms with their
//! basis shells and the molecular orbitals.

use super::error::DecodeError;
use super::reader::{NodeReader, ResultNode};
use crate::core::constraints::Constraint;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GbwResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub molecule: Option<GbwMolecule>,
}

impl ResultNode for GbwResults {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            molecule: reader.node("molecule")?,
        })
    }
}

impl GbwResults {
    pub fn orbitals(&self) -> Option<&MolecularOrbitals> {
        self.molecule.as_ref()?.molecularorbitals.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GbwMolecule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atoms: Option<Vec<GbwAtom>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basisset: Option<BasisSetNames>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinateunits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hftyp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub molecularorbitals: Option<MolecularOrbitals>,
}

impl ResultNode for GbwMolecule {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            atoms: reader.nodes("atoms")?,
            basisset: reader.node("basisset")?,
            charge: reader.i64("charge", Constraint::Any)?,
            multiplicity: reader.i64("multiplicity", Constraint::Positive)?,
            coordinateunits: reader.string("coordinateunits")?,
            hftyp: reader.string("hftyp")?,
            molecularorbitals: reader.node("molecularorbitals")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasisSetNames {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxj: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxjk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxc: Option<String>,
}

impl ResultNode for BasisSetNames {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            principal: reader.string("principal")?,
            auxj: reader.string("auxj")?,
            auxjk: reader.string("auxjk")?,
            auxc: reader.string("auxc")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GbwAtom {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elementlabel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elementsymbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nuccharge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basis: Option<Vec<BasisShell>>,
}

impl ResultNode for GbwAtom {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            index: reader.i64("index", Constraint::NonNegative)?,
            elementlabel: reader.string("elementlabel")?,
            elementsymbol: reader.string("elementsymbol")?,
            nuccharge: reader.f64("nuccharge", Constraint::NonNegative)?,
            coords: reader.f64_list("coords", Constraint::Finite)?,
            basis: reader.nodes("basis")?,
        })
    }
}

/// One contracted shell: primitive exponents with their contraction coefficients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasisShell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exponents: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coefficients: Option<Vec<f64>>,
}

impl ResultNode for BasisShell {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            shell: reader.string("shell")?,
            exponents: reader.f64_list("exponents", Constraint::Positive)?,
            coefficients: reader.f64_list("coefficients", Constraint::Finite)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MolecularOrbitals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energyunit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orbitallabels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mos: Option<Vec<MolecularOrbital>>,
}

impl ResultNode for MolecularOrbitals {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            energyunit: reader.string("energyunit")?,
            orbitallabels: reader.string_list("orbitallabels")?,
            mos: reader.nodes("mos")?,
        })
    }
}

impl MolecularOrbitals {
    pub fn mos(&self) -> &[MolecularOrbital] {
        self.mos.as_deref().unwrap_or_default()
    }

    /// Highest orbital with a non-zero occupation.
    pub fn homo(&self) -> Option<&MolecularOrbital> {
        self.mos().iter().rev().find(|mo| mo.is_occupied())
    }

    /// The orbital following the HOMO, or the first one when nothing is occupied.
    pub fn lumo(&self) -> Option<&MolecularOrbital> {
        let next = self
            .mos()
            .iter()
            .rposition(MolecularOrbital::is_occupied)
            .map_or(0, |homo| homo + 1);
        self.mos().get(next)
    }

    pub fn gap(&self) -> Option<f64> {
        Some(self.lumo()?.orbitalenergy? - self.homo()?.orbitalenergy?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MolecularOrbital {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orbitalenergy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orbitalsymlabel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mocoefficients: Option<Vec<f64>>,
}

impl ResultNode for MolecularOrbital {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            occupancy: reader.f64("occupancy", Constraint::NonNegative)?,
            orbitalenergy: reader.f64("orbitalenergy", Constraint::Finite)?,
            orbitalsymlabel: reader.string("orbitalsymlabel")?,
            mocoefficients: reader.f64_list("mocoefficients", Constraint::Finite)?,
        })
    }
}

impl MolecularOrbital {
    pub fn is_occupied(&self) -> bool {
        self.occupancy.is_some_and(|occ| occ > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hydrogen_molecule() -> serde_json::Value {
        json!({"molecule": {
            "charge": 0,
            "multiplicity": 1,
            "basisset": {"principal": "STO-3G"},
            "atoms": [
                {"index": 0, "elementsymbol": "H", "nuccharge": 1.0, "coords": [0.0, 0.0, 0.0],
                 "basis": [{"shell": "s", "exponents": [3.42525091, 0.62391373, 0.1688554],
                            "coefficients": [0.15432897, 0.53532814, 0.44463454]}]},
                {"index": 1, "elementsymbol": "H", "nuccharge": 1.0, "coords": [0.0, 0.0, 1.4]}
            ],
            "molecularorbitals": {
                "energyunit": "Eh",
                "orbitallabels": ["0H   1s", "1H   1s"],
                "mos": [
                    {"occupancy": 2.0, "orbitalenergy": -0.578, "orbitalsymlabel": "1-A", "mocoefficients": [0.55, 0.55]},
                    {"occupancy": 0.0, "orbitalenergy": 0.670, "orbitalsymlabel": "1-A", "mocoefficients": [1.21, -1.21]}
                ]
            }
        }})
    }

    #[test]
    fn decodes_atoms_shells_and_orbitals() {
        let gbw = GbwResults::decode(&hydrogen_molecule()).unwrap();
        let molecule = gbw.molecule.as_ref().unwrap();
        let atoms = molecule.atoms.as_ref().unwrap();
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].basis.as_ref().map(Vec::len), Some(1));
        assert_eq!(atoms[1].basis, None);

        let orbitals = gbw.orbitals().unwrap();
        assert_eq!(orbitals.mos().len(), 2);
        assert_eq!(orbitals.homo().and_then(|mo| mo.orbitalenergy), Some(-0.578));
        assert_eq!(orbitals.lumo().and_then(|mo| mo.orbitalenergy), Some(0.670));
        assert!((orbitals.gap().unwrap() - 1.248).abs() < 1e-12);
    }

    #[test]
    fn lumo_without_occupied_orbitals_is_the_first() {
        let orbitals = MolecularOrbitals::decode(&json!({"mos": [
            {"occupancy": 0.0, "orbitalenergy": 0.1},
            {"occupancy": 0.0, "orbitalenergy": 0.2}
        ]}))
        .unwrap();
        assert_eq!(orbitals.homo(), None);
        assert_eq!(orbitals.lumo().and_then(|mo| mo.orbitalenergy), Some(0.1));
    }

    #[test]
    fn negative_occupancy_and_exponents_are_rejected() {
        let err = MolecularOrbital::decode(&json!({"occupancy": -1.0})).unwrap_err();
        assert!(matches!(err, DecodeError::ConstraintViolation { .. }));

        let err = BasisShell::decode(&json!({"exponents": [1.0, 0.0]})).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ConstraintViolation { ref field, .. } if field == "$.exponents[1]"
        ));
    }

    #[test]
    fn reserialization_decodes_to_an_equal_tree() {
        let gbw = GbwResults::decode(&hydrogen_molecule()).unwrap();
        let reserialized = serde_json::to_value(&gbw).unwrap();
        assert_eq!(GbwResults::decode(&reserialized).unwrap(), gbw);
    }
}
