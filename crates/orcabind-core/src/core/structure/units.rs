//! Conversion factors between atomic units and common laboratory units.
//!
//! Values follow CODATA 2018.

pub const BOHR_TO_ANGSTROM: f64 = 0.529_177_210_903;
pub const ANGSTROM_TO_BOHR: f64 = 1.0 / BOHR_TO_ANGSTROM;

pub const HARTREE_TO_EV: f64 = 27.211_386_245_988;
pub const HARTREE_TO_KCAL_MOL: f64 = 627.509_474_277_194;
pub const HARTREE_TO_KJ_MOL: f64 = 2_625.499_639_479_4;

pub fn bohr_to_angstrom(value: f64) -> f64 {
    value * BOHR_TO_ANGSTROM
}

pub fn angstrom_to_bohr(value: f64) -> f64 {
    value * ANGSTROM_TO_BOHR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_conversions_are_inverse() {
        let value = 1.234;
        assert!((bohr_to_angstrom(angstrom_to_bohr(value)) - value).abs() < 1e-12);
    }

    #[test]
    fn energy_factors_are_consistent() {
        let kj_per_kcal = HARTREE_TO_KJ_MOL / HARTREE_TO_KCAL_MOL;
        assert!((kj_per_kcal - 4.184).abs() < 1e-6);
    }
}
