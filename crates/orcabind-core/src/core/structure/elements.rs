use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca",
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr",
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th",
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

static ATOMIC_NUMBERS: Map<&'static str, u8> = phf_map! {
    "h" => 1,
    "he" => 2,
    "li" => 3,
    "be" => 4,
    "b" => 5,
    "c" => 6,
    "n" => 7,
    "o" => 8,
    "f" => 9,
    "ne" => 10,
    "na" => 11,
    "mg" => 12,
    "al" => 13,
    "si" => 14,
    "p" => 15,
    "s" => 16,
    "cl" => 17,
    "ar" => 18,
    "k" => 19,
    "ca" => 20,
    "sc" => 21,
    "ti" => 22,
    "v" => 23,
    "cr" => 24,
    "mn" => 25,
    "fe" => 26,
    "co" => 27,
    "ni" => 28,
    "cu" => 29,
    "zn" => 30,
    "ga" => 31,
    "ge" => 32,
    "as" => 33,
    "se" => 34,
    "br" => 35,
    "kr" => 36,
    "rb" => 37,
    "sr" => 38,
    "y" => 39,
    "zr" => 40,
    "nb" => 41,
    "mo" => 42,
    "tc" => 43,
    "ru" => 44,
    "rh" => 45,
    "pd" => 46,
    "ag" => 47,
    "cd" => 48,
    "in" => 49,
    "sn" => 50,
    "sb" => 51,
    "te" => 52,
    "i" => 53,
    "xe" => 54,
    "cs" => 55,
    "ba" => 56,
    "la" => 57,
    "ce" => 58,
    "pr" => 59,
    "nd" => 60,
    "pm" => 61,
    "sm" => 62,
    "eu" => 63,
    "gd" => 64,
    "tb" => 65,
    "dy" => 66,
    "ho" => 67,
    "er" => 68,
    "tm" => 69,
    "yb" => 70,
    "lu" => 71,
    "hf" => 72,
    "ta" => 73,
    "w" => 74,
    "re" => 75,
    "os" => 76,
    "ir" => 77,
    "pt" => 78,
    "au" => 79,
    "hg" => 80,
    "tl" => 81,
    "pb" => 82,
    "bi" => 83,
    "po" => 84,
    "at" => 85,
    "rn" => 86,
    "fr" => 87,
    "ra" => 88,
    "ac" => 89,
    "th" => 90,
    "pa" => 91,
    "u" => 92,
    "np" => 93,
    "pu" => 94,
    "am" => 95,
    "cm" => 96,
    "bk" => 97,
    "cf" => 98,
    "es" => 99,
    "fm" => 100,
    "md" => 101,
    "no" => 102,
    "lr" => 103,
    "rf" => 104,
    "db" => 105,
    "sg" => 106,
    "bh" => 107,
    "hs" => 108,
    "mt" => 109,
    "ds" => 110,
    "rg" => 111,
    "cn" => 112,
    "nh" => 113,
    "fl" => 114,
    "mc" => 115,
    "lv" => 116,
    "ts" => 117,
    "og" => 118,
};
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown element '{0}'")]
pub struct UnknownElement(pub String);

/// A chemical element identified by its atomic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    pub const MAX_ATOMIC_NUMBER: u8 = 118;

    pub fn from_atomic_number(number: u8) -> Option<Self> {
        (1..=Self::MAX_ATOMIC_NUMBER)
            .contains(&number)
            .then_some(Self(number))
    }

    pub fn atomic_number(self) -> u8 {
        self.0
    }

    pub fn symbol(self) -> &'static str {
        SYMBOLS[usize::from(self.0) - 1]
    }
}

/// Resolves an element from a symbol (any case) or an atomic number given as text.
pub fn element_by_symbol_or_number(raw: &str) -> Result<Element, UnknownElement> {
    let key = raw.trim();
    let unknown = || UnknownElement(raw.to_string());
    if let Ok(number) = key.parse::<u8>() {
        return Element::from_atomic_number(number).ok_or_else(unknown);
    }
    ATOMIC_NUMBERS
        .get(key.to_ascii_lowercase().as_str())
        .copied()
        .map(Element)
        .ok_or_else(unknown)
}

impl FromStr for Element {
    type Err = UnknownElement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        element_by_symbol_or_number(s)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_resolve_case_insensitively() {
        assert_eq!(element_by_symbol_or_number("C").unwrap().atomic_number(), 6);
        assert_eq!(element_by_symbol_or_number("cl").unwrap().atomic_number(), 17);
        assert_eq!(element_by_symbol_or_number(" FE ").unwrap().symbol(), "Fe");
    }

    #[test]
    fn atomic_numbers_resolve_within_the_table() {
        assert_eq!(element_by_symbol_or_number("1").unwrap().symbol(), "H");
        assert_eq!(element_by_symbol_or_number("118").unwrap().symbol(), "Og");
        assert!(element_by_symbol_or_number("0").is_err());
        assert!(element_by_symbol_or_number("119").is_err());
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        assert_eq!(
            element_by_symbol_or_number("Xx"),
            Err(UnknownElement("Xx".into()))
        );
        assert!("".parse::<Element>().is_err());
    }

    #[test]
    fn table_and_symbols_agree() {
        for number in 1..=Element::MAX_ATOMIC_NUMBER {
            let element = Element::from_atomic_number(number).unwrap();
            assert_eq!(element_by_symbol_or_number(element.symbol()), Ok(element));
        }
    }
}
