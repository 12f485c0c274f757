use phf::{Map, phf_map};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Atomic number and standard atomic weight (g/mol) keyed by element symbol.
///
/// Elements without a stable isotope carry the mass number of their longest-lived isotope.
static PERIODIC_TABLE: Map<&'static str, (u8, f64)> = phf_map! {
    "H" => (1, 1.008), "He" => (2, 4.002602),
    "Li" => (3, 6.94), "Be" => (4, 9.0121831), "B" => (5, 10.81), "C" => (6, 12.011),
    "N" => (7, 14.007), "O" => (8, 15.999), "F" => (9, 18.998403163), "Ne" => (10, 20.1797),
    "Na" => (11, 22.98976928), "Mg" => (12, 24.305), "Al" => (13, 26.9815385), "Si" => (14, 28.085),
    "P" => (15, 30.973761998), "S" => (16, 32.06), "Cl" => (17, 35.45), "Ar" => (18, 39.948),
    "K" => (19, 39.0983), "Ca" => (20, 40.078), "Sc" => (21, 44.955908), "Ti" => (22, 47.867),
    "V" => (23, 50.9415), "Cr" => (24, 51.9961), "Mn" => (25, 54.938044), "Fe" => (26, 55.845),
    "Co" => (27, 58.933194), "Ni" => (28, 58.6934), "Cu" => (29, 63.546), "Zn" => (30, 65.38),
    "Ga" => (31, 69.723), "Ge" => (32, 72.630), "As" => (33, 74.921595), "Se" => (34, 78.971),
    "Br" => (35, 79.904), "Kr" => (36, 83.798),
    "Rb" => (37, 85.4678), "Sr" => (38, 87.62), "Y" => (39, 88.90584), "Zr" => (40, 91.224),
    "Nb" => (41, 92.90637), "Mo" => (42, 95.95), "Tc" => (43, 98.0), "Ru" => (44, 101.07),
    "Rh" => (45, 102.90550), "Pd" => (46, 106.42), "Ag" => (47, 107.8682), "Cd" => (48, 112.414),
    "In" => (49, 114.818), "Sn" => (50, 118.710), "Sb" => (51, 121.760), "Te" => (52, 127.60),
    "I" => (53, 126.90447), "Xe" => (54, 131.293),
    "Cs" => (55, 132.90545196), "Ba" => (56, 137.327), "La" => (57, 138.90547), "Ce" => (58, 140.116),
    "Pr" => (59, 140.90766), "Nd" => (60, 144.242), "Pm" => (61, 145.0), "Sm" => (62, 150.36),
    "Eu" => (63, 151.964), "Gd" => (64, 157.25), "Tb" => (65, 158.92535), "Dy" => (66, 162.500),
    "Ho" => (67, 164.93033), "Er" => (68, 167.259), "Tm" => (69, 168.93422), "Yb" => (70, 173.045),
    "Lu" => (71, 174.9668), "Hf" => (72, 178.49), "Ta" => (73, 180.94788), "W" => (74, 183.84),
    "Re" => (75, 186.207), "Os" => (76, 190.23), "Ir" => (77, 192.217), "Pt" => (78, 195.084),
    "Au" => (79, 196.966569), "Hg" => (80, 200.592), "Tl" => (81, 204.38), "Pb" => (82, 207.2),
    "Bi" => (83, 208.98040), "Po" => (84, 209.0), "At" => (85, 210.0), "Rn" => (86, 222.0),
    "Fr" => (87, 223.0), "Ra" => (88, 226.0), "Ac" => (89, 227.0), "Th" => (90, 232.0377),
    "Pa" => (91, 231.03588), "U" => (92, 238.02891), "Np" => (93, 237.0), "Pu" => (94, 244.0),
    "Am" => (95, 243.0), "Cm" => (96, 247.0), "Bk" => (97, 247.0), "Cf" => (98, 251.0),
    "Es" => (99, 252.0), "Fm" => (100, 257.0), "Md" => (101, 258.0), "No" => (102, 259.0),
    "Lr" => (103, 266.0),
    "D" => (1, 2.014101778),
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid element symbol '{0}'")]
pub struct ParseElementError(pub String);

/// A chemical element symbol as it appears in an ion composition.
///
/// Any symbol of the shape `[A-Z][a-z]{0,2}` is accepted so that range files with
/// placeholder labels still load; [`Element::is_known`] tells whether the symbol is
/// in the periodic table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(String);

impl Element {
    pub fn new(symbol: &str) -> Result<Self, ParseElementError> {
        if is_valid_symbol(symbol) {
            Ok(Self(symbol.to_string()))
        } else {
            Err(ParseElementError(symbol.to_string()))
        }
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        PERIODIC_TABLE.contains_key(self.0.as_str())
    }

    pub fn atomic_number(&self) -> Option<u8> {
        PERIODIC_TABLE.get(self.0.as_str()).map(|&(z, _)| z)
    }

    pub fn standard_atomic_weight(&self) -> Option<f64> {
        PERIODIC_TABLE.get(self.0.as_str()).map(|&(_, w)| w)
    }
}

fn is_valid_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    let rest: Vec<char> = chars.collect();
    rest.len() <= 2 && rest.iter().all(char::is_ascii_lowercase)
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Element {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets composition maps be queried by plain symbol text.
impl Borrow<str> for Element {
    fn borrow(&self) -> &str {
        &self.0
    }
}
