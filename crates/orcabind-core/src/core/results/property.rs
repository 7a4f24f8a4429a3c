//! The `<basename>.property.json` document: run status, run metadata and
//! per-geometry properties.

use super::discriminated::DiscriminatedList;
use super::energy::{EnergyRecord, Matrix};
use super::error::DecodeError;
use super::reader::{NodeReader, ResultNode, to_array, to_f64, to_string};
use crate::core::constraints::Constraint;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_status: Option<CalculationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_info: Option<CalculationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometries: Option<Vec<GeometryResults>>,
}

impl ResultNode for PropertyResults {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            calculation_status: reader.node("calculation_status")?,
            calculation_info: reader.node("calculation_info")?,
            geometries: reader.nodes("geometries")?,
        })
    }
}

impl PropertyResults {
    pub fn geometries(&self) -> &[GeometryResults] {
        self.geometries.as_deref().unwrap_or_default()
    }

    /// Total energy of the last geometry that reports one.
    pub fn final_energy(&self) -> Option<f64> {
        self.geometries()
            .iter()
            .rev()
            .find_map(GeometryResults::total_energy)
    }

    /// Whether the engine reported normal termination.
    pub fn terminated_normally(&self) -> bool {
        self.calculation_status
            .as_ref()
            .and_then(|status| status.status.as_deref())
            .is_some_and(|status| status.eq_ignore_ascii_case("NORMAL TERMINATION"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ResultNode for CalculationStatus {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            version: reader.string("version")?,
            progname: reader.string("progname")?,
            status: reader.string("status")?,
            date: reader.string("date")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mult: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numofatoms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numofelectrons: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numoffcelectrons: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numofcorrelectrons: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numofbasisfuncts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numofauxcbasisfuncts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numofauxjbasisfuncts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hftyp: Option<String>,
}

impl ResultNode for CalculationInfo {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            title: reader.string("title")?,
            mult: reader.i64("mult", Constraint::Positive)?,
            charge: reader.i64("charge", Constraint::Any)?,
            numofatoms: reader.i64("numofatoms", Constraint::NonNegative)?,
            numofelectrons: reader.i64("numofelectrons", Constraint::NonNegative)?,
            numoffcelectrons: reader.i64("numoffcelectrons", Constraint::NonNegative)?,
            numofcorrelectrons: reader.i64("numofcorrelectrons", Constraint::NonNegative)?,
            numofbasisfuncts: reader.i64("numofbasisfuncts", Constraint::NonNegative)?,
            numofauxcbasisfuncts: reader.i64("numofauxcbasisfuncts", Constraint::NonNegative)?,
            numofauxjbasisfuncts: reader.i64("numofauxjbasisfuncts", Constraint::NonNegative)?,
            hftyp: reader.string("hftyp")?,
        })
    }
}

/// Everything the engine reports for one geometry of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_point_data: Option<SinglePointData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<DiscriminatedList<EnergyRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dipole_moment: Option<Vec<DipoleMoment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mulliken_population_analysis: Option<Vec<PopulationAnalysis>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loewdin_population_analysis: Option<Vec<PopulationAnalysis>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mayer_population_analysis: Option<Vec<MayerPopulationAnalysis>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solvation_details: Option<SolvationDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thermochemistry_energies: Option<Vec<Thermochemistry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nuclear_gradient: Option<NuclearGradient>,
}

impl ResultNode for GeometryResults {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            geometry: reader.node("geometry")?,
            single_point_data: reader.node("single_point_data")?,
            energy: reader.tagged("energy")?,
            dipole_moment: reader.nodes("dipole_moment")?,
            mulliken_population_analysis: reader.nodes("mulliken_population_analysis")?,
            loewdin_population_analysis: reader.nodes("loewdin_population_analysis")?,
            mayer_population_analysis: reader.nodes("mayer_population_analysis")?,
            solvation_details: reader.node("solvation_details")?,
            thermochemistry_energies: reader.nodes("thermochemistry_energies")?,
            nuclear_gradient: reader.node("nuclear_gradient")?,
        })
    }
}

impl GeometryResults {
    /// The single-point final energy if present, otherwise the total of the
    /// last energy record.
    pub fn total_energy(&self) -> Option<f64> {
        self.single_point_data
            .as_ref()
            .and_then(|data| data.finalenergy)
            .or_else(|| {
                self.energy
                    .as_ref()?
                    .iter()
                    .rev()
                    .find_map(EnergyRecord::total_energy)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natoms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numofghostatoms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<CoordinateSet>,
}

impl ResultNode for GeometryNode {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            natoms: reader.i64("natoms", Constraint::NonNegative)?,
            numofghostatoms: reader.i64("numofghostatoms", Constraint::NonNegative)?,
            coordinates: reader.node("coordinates")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateSet {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cartesians: Option<Vec<CartesianEntry>>,
}

impl ResultNode for CoordinateSet {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        let cartesians = match reader.value("cartesians") {
            None => None,
            Some(value) => {
                let field = reader.field_path("cartesians");
                Some(
                    to_array(value, &field)?
                        .iter()
                        .enumerate()
                        .map(|(index, row)| CartesianEntry::from_row(row, &format!("{field}[{index}]")))
                        .collect::<Result<Vec<_>, _>>()?,
                )
            }
        };
        Ok(Self {
            kind: reader.string("type")?,
            units: reader.string("units")?,
            cartesians,
        })
    }
}

/// One `[symbol, x, y, z]` row of a coordinate block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartesianEntry(pub String, pub f64, pub f64, pub f64);

impl CartesianEntry {
    fn from_row(row: &serde_json::Value, field: &str) -> Result<Self, DecodeError> {
        let cells = to_array(row, field)?;
        let [symbol, x, y, z] = cells.as_slice() else {
            return Err(DecodeError::TypeMismatch {
                field: field.to_string(),
                expected: "a [symbol, x, y, z] row",
            });
        };
        Ok(Self(
            to_string(symbol, &format!("{field}[0]"))?,
            to_f64(x, &format!("{field}[1]"), Constraint::Finite)?,
            to_f64(y, &format!("{field}[2]"), Constraint::Finite)?,
            to_f64(z, &format!("{field}[3]"), Constraint::Finite)?,
        ))
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }

    pub fn position(&self) -> [f64; 3] {
        [self.1, self.2, self.3]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinglePointData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalenergy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mult: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numofelectrons: Option<i64>,
}

impl ResultNode for SinglePointData {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            finalenergy: reader.f64("finalenergy", Constraint::Finite)?,
            converged: reader.bool("converged")?,
            charge: reader.i64("charge", Constraint::Any)?,
            mult: reader.i64("mult", Constraint::Positive)?,
            numofelectrons: reader.i64("numofelectrons", Constraint::NonNegative)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DipoleMoment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dipoleelecontrib: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dipolenuccontrib: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dipoletotal: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dipolemagnitude: Option<f64>,
}

impl ResultNode for DipoleMoment {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            method: reader.string("method")?,
            level: reader.string("level")?,
            dipoleelecontrib: reader.f64_list("dipoleelecontrib", Constraint::Finite)?,
            dipolenuccontrib: reader.f64_list("dipolenuccontrib", Constraint::Finite)?,
            dipoletotal: reader.f64_list("dipoletotal", Constraint::Finite)?,
            dipolemagnitude: reader.f64("dipolemagnitude", Constraint::NonNegative)?,
        })
    }
}

/// Mulliken or Löwdin atomic charges (and spin densities for open shells).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natoms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atno: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atomiccharges: Option<Matrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spindensities: Option<Matrix>,
}

impl ResultNode for PopulationAnalysis {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            method: reader.string("method")?,
            natoms: reader.i64("natoms", Constraint::NonNegative)?,
            atno: reader.i64_list("atno", Constraint::NonNegative)?,
            atomiccharges: reader.matrix("atomiccharges", Constraint::Finite)?,
            spindensities: reader.matrix("spindensities", Constraint::Finite)?,
        })
    }
}

impl PopulationAnalysis {
    /// Charges as a flat per-atom list.
    pub fn charges(&self) -> Vec<f64> {
        self.atomiccharges
            .iter()
            .flatten()
            .filter_map(|row| row.first().copied())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MayerPopulationAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natoms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atno: Option<Vec<i64>>,
    /// Mulliken gross atomic population.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub na: Option<Vec<f64>>,
    /// Nuclear charge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub za: Option<Vec<f64>>,
    /// Mulliken gross atomic charge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qa: Option<Vec<f64>>,
    /// Total valence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub va: Option<Vec<f64>>,
    /// Bonded valence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bva: Option<Vec<f64>>,
    /// Free valence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fa: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bondthresh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bondorders: Option<Vec<f64>>,
}

impl ResultNode for MayerPopulationAnalysis {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            method: reader.string("method")?,
            natoms: reader.i64("natoms", Constraint::NonNegative)?,
            atno: reader.i64_list("atno", Constraint::NonNegative)?,
            na: reader.f64_list("na", Constraint::NonNegative)?,
            za: reader.f64_list("za", Constraint::NonNegative)?,
            qa: reader.f64_list("qa", Constraint::Finite)?,
            va: reader.f64_list("va", Constraint::Finite)?,
            bva: reader.f64_list("bva", Constraint::Finite)?,
            fa: reader.f64_list("fa", Constraint::Finite)?,
            bondthresh: reader.f64("bondthresh", Constraint::NonNegative)?,
            bondorders: reader.f64_list("bondorders", Constraint::Finite)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolvationDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solvent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refrac: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsolv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surfacetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpcmdielenergy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npoints: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surfacearea: Option<f64>,
}

impl ResultNode for SolvationDetails {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            solvent: reader.string("solvent")?,
            epsilon: reader.f64("epsilon", Constraint::PositiveOrSentinel)?,
            refrac: reader.f64("refrac", Constraint::PositiveOrSentinel)?,
            rsolv: reader.f64("rsolv", Constraint::PositiveOrSentinel)?,
            surfacetype: reader.string("surfacetype")?,
            cpcmdielenergy: reader.f64("cpcmdielenergy", Constraint::Finite)?,
            npoints: reader.i64("npoints", Constraint::NonNegative)?,
            surfacearea: reader.f64("surfacearea", Constraint::NonNegative)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thermochemistry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totalmass: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spindegeneracy: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symmetrynumber: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub islinear: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numoffreqs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freqs: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zpe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub innerenergyu: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enthalpyh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropys: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeenergyg: Option<f64>,
}

impl ResultNode for Thermochemistry {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            temperature: reader.f64("temperature", Constraint::Positive)?,
            pressure: reader.f64("pressure", Constraint::Positive)?,
            totalmass: reader.f64("totalmass", Constraint::Positive)?,
            spindegeneracy: reader.i64("spindegeneracy", Constraint::Positive)?,
            symmetrynumber: reader.i64("symmetrynumber", Constraint::PositiveOrSentinel)?,
            islinear: reader.bool("islinear")?,
            numoffreqs: reader.i64("numoffreqs", Constraint::NonNegative)?,
            freqs: reader.f64_list("freqs", Constraint::Finite)?,
            zpe: reader.f64("zpe", Constraint::NonNegative)?,
            innerenergyu: reader.f64("innerenergyu", Constraint::Finite)?,
            enthalpyh: reader.f64("enthalpyh", Constraint::Finite)?,
            entropys: reader.f64("entropys", Constraint::Finite)?,
            freeenergyg: reader.f64("freeenergyg", Constraint::Finite)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NuclearGradient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grad: Option<Vec<f64>>,
}

impl ResultNode for NuclearGradient {
    fn read(reader: &NodeReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            grad: reader.f64_list("grad", Constraint::Finite)?,
        })
    }
}

impl NuclearGradient {
    /// Root-mean-square of the gradient components.
    pub fn rms(&self) -> Option<f64> {
        let grad = self.grad.as_deref().filter(|grad| !grad.is_empty())?;
        Some((grad.iter().map(|g| g * g).sum::<f64>() / grad.len() as f64).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::results::DecodeOptions;
    use serde_json::json;

    fn water_document() -> serde_json::Value {
        json!({
            "calculation_status": {"version": "6.0.1", "status": "NORMAL TERMINATION"},
            "calculation_info": {"title": "water", "mult": 1, "charge": 0, "numofatoms": 3},
            "geometries": [{
                "geometry": {
                    "natoms": 3,
                    "coordinates": {
                        "type": "Cartesians",
                        "units": "Angst",
                        "cartesians": [["O", 0.0, 0.0, 0.1173], ["H", 0.0, 0.7572, -0.4692]]
                    }
                },
                "energy": [
                    {"method": "SCF", "totalenergy": [[-76.0266327341]]},
                    {"method": "MP2", "refenergy": [[-76.0266327341]], "correnergy": [[-0.2018]]}
                ],
                "dipole_moment": {"method": "SCF", "dipoletotal": [0.0, 0.0, 0.78], "dipolemagnitude": 0.78},
                "solvation_details": {"solvent": "WATER", "epsilon": 80.4, "refrac": -1.0},
                "future_block": {"anything": true}
            }]
        })
    }

    #[test]
    fn decodes_a_complete_document() {
        let results = PropertyResults::decode(&water_document()).unwrap();
        assert!(results.terminated_normally());
        assert_eq!(results.calculation_info.as_ref().and_then(|info| info.mult), Some(1));

        let geometry = &results.geometries()[0];
        let coordinates = geometry
            .geometry
            .as_ref()
            .and_then(|g| g.coordinates.as_ref())
            .and_then(|c| c.cartesians.as_ref())
            .unwrap();
        assert_eq!(coordinates[1].symbol(), "H");
        assert_eq!(coordinates[1].position(), [0.0, 0.7572, -0.4692]);

        assert_eq!(geometry.energy.as_ref().map(|e| e.len()), Some(2));
        assert_eq!(geometry.dipole_moment.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            geometry.solvation_details.as_ref().and_then(|s| s.refrac),
            Some(-1.0)
        );
    }

    #[test]
    fn final_energy_comes_from_the_last_energy_record() {
        let results = PropertyResults::decode(&water_document()).unwrap();
        let energy = results.final_energy().unwrap();
        assert!((energy - (-76.0266327341 - 0.2018)).abs() < 1e-12);
    }

    #[test]
    fn single_point_final_energy_takes_precedence() {
        let results = PropertyResults::decode(&json!({
            "geometries": [{
                "single_point_data": {"finalenergy": -1.25, "converged": true},
                "energy": [{"method": "SCF", "totalenergy": [[-1.0]]}]
            }]
        }))
        .unwrap();
        assert_eq!(results.final_energy(), Some(-1.25));
    }

    #[test]
    fn a_document_without_results_decodes_to_absent_fields() {
        let results = PropertyResults::decode(&json!({})).unwrap();
        assert_eq!(results.calculation_status, None);
        assert!(results.geometries().is_empty());
        assert_eq!(results.final_energy(), None);
        assert!(!results.terminated_normally());
    }

    #[test]
    fn non_negative_fields_reject_the_sentinel_but_accept_zero() {
        let bad = json!({"geometries": [{"dipole_moment": [{"dipolemagnitude": -1.0}]}]});
        let err = PropertyResults::decode(&bad).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ConstraintViolation { ref field, .. }
                if field == "$.geometries[0].dipole_moment[0].dipolemagnitude"
        ));

        let ok = json!({"geometries": [{"dipole_moment": [{"dipolemagnitude": 0.0}]}]});
        assert!(PropertyResults::decode(&ok).is_ok());
    }

    #[test]
    fn unknown_energy_methods_fail_unless_skipped() {
        let document = json!({"geometries": [{"energy": [
            {"method": "NOT_A_METHOD"},
            {"method": "SCF", "totalenergy": [[-2.0]]}
        ]}]});

        let err = PropertyResults::decode(&document).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownVariant { ref tag, .. } if tag == "NOT_A_METHOD"));

        let results =
            PropertyResults::decode_with(&document, &DecodeOptions::skipping_unknown_variants())
                .unwrap();
        assert_eq!(results.final_energy(), Some(-2.0));
    }

    #[test]
    fn malformed_coordinate_rows_are_rejected() {
        let document = json!({"geometries": [{"geometry": {"coordinates": {
            "cartesians": [["O", 0.0, 0.0]]
        }}}]});
        let err = PropertyResults::decode(&document).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { .. }));
    }

    #[test]
    fn reserialization_decodes_to_an_equal_tree() {
        let results = PropertyResults::decode(&water_document()).unwrap();
        let reserialized = serde_json::to_value(&results).unwrap();
        assert_eq!(PropertyResults::decode(&reserialized).unwrap(), results);
        assert!(reserialized["geometries"][0].get("future_block").is_none());
    }

    #[test]
    fn gradient_rms() {
        let gradient = NuclearGradient {
            grad: Some(vec![3.0, 4.0, 0.0, 0.0]),
        };
        assert_eq!(gradient.rms(), Some(2.5));
        assert_eq!(NuclearGradient { grad: None }.rms(), None);
    }
}
