//! Molecular geometry handed to the engine: atoms, charge and spin multiplicity.

pub mod elements;
pub mod units;

use crate::core::sections::PathRef;
use elements::{Element, UnknownElement, element_by_symbol_or_number};
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StructureError {
    #[error(transparent)]
    UnknownElement(#[from] UnknownElement),
    #[error("Spin multiplicity must be at least 1, got {0}")]
    InvalidMultiplicity(u32),
    #[error("Atom {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    /// Cartesian position in Ångström.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(element: Element, position: Point3<f64>) -> Self {
        Self { element, position }
    }

    pub fn from_symbol(symbol: &str, xyz: [f64; 3]) -> Result<Self, StructureError> {
        Ok(Self::new(
            element_by_symbol_or_number(symbol)?,
            Point3::new(xyz[0], xyz[1], xyz[2]),
        ))
    }
}

/// Where the engine reads coordinates from.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    /// Atoms written directly into the input.
    Inline(Vec<Atom>),
    /// An XYZ file the engine reads itself.
    External(PathRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    coordinates: Coordinates,
    charge: i32,
    multiplicity: u32,
}

impl Structure {
    pub fn new(atoms: Vec<Atom>, charge: i32, multiplicity: u32) -> Result<Self, StructureError> {
        if let Some(index) = atoms.iter().position(|atom| {
            !(atom.position.x.is_finite() && atom.position.y.is_finite() && atom.position.z.is_finite())
        }) {
            return Err(StructureError::NonFiniteCoordinate { index });
        }
        Self::with_coordinates(Coordinates::Inline(atoms), charge, multiplicity)
    }

    pub fn from_xyz_file(path: PathRef, charge: i32, multiplicity: u32) -> Result<Self, StructureError> {
        Self::with_coordinates(Coordinates::External(path), charge, multiplicity)
    }

    fn with_coordinates(
        coordinates: Coordinates,
        charge: i32,
        multiplicity: u32,
    ) -> Result<Self, StructureError> {
        if multiplicity == 0 {
            return Err(StructureError::InvalidMultiplicity(multiplicity));
        }
        Ok(Self {
            coordinates,
            charge,
            multiplicity,
        })
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn atoms(&self) -> &[Atom] {
        match &self.coordinates {
            Coordinates::Inline(atoms) => atoms,
            Coordinates::External(_) => &[],
        }
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn multiplicity(&self) -> u32 {
        self.multiplicity
    }

    /// Number of electrons for inline structures (`None` for external files).
    pub fn electron_count(&self) -> Option<i64> {
        match &self.coordinates {
            Coordinates::Inline(atoms) => Some(
                atoms
                    .iter()
                    .map(|atom| i64::from(atom.element.atomic_number()))
                    .sum::<i64>()
                    - i64::from(self.charge),
            ),
            Coordinates::External(_) => None,
        }
    }

    /// Whether charge and multiplicity admit a valid electron configuration.
    pub fn is_spin_consistent(&self) -> Option<bool> {
        let electrons = self.electron_count()?;
        let unpaired = i64::from(self.multiplicity) - 1;
        Some(electrons >= unpaired && (electrons - unpaired) % 2 == 0)
    }

    /// The `* xyz charge mult ... *` block (or the one-line `* xyzfile` form).
    pub fn render(&self) -> String {
        match &self.coordinates {
            Coordinates::Inline(atoms) => {
                let mut out = format!("* xyz {} {}\n", self.charge, self.multiplicity);
                for atom in atoms {
                    out.push_str(&format!(
                        "  {:<2} {:>16.10} {:>16.10} {:>16.10}\n",
                        atom.element.symbol(),
                        atom.position.x,
                        atom.position.y,
                        atom.position.z
                    ));
                }
                out.push_str("*\n");
                out
            }
            Coordinates::External(path) => format!(
                "* xyzfile {} {} {}\n",
                self.charge,
                self.multiplicity,
                path.as_path().display()
            ),
        }
    }
}
