//! Converting between particle counts, moles and grams of a substance

use serde::Serialize;

/// entities per mole
pub const AVOGADRO: f64 = 6.02214e23;

/// One amount of a substance expressed three ways. `entities` counts
/// formula units (molecules, or atoms for a bare element).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Quantity {
    pub entities: f64,
    pub moles: f64,
    pub grams: f64,
}

impl Quantity {
    /// `molar_mass` is in g/mol, numerically the precise weight in u
    pub fn from_entities(entities: f64, molar_mass: f64) -> Self {
        Self {
            entities,
            moles: entities / AVOGADRO,
            grams: entities * molar_mass / AVOGADRO,
        }
    }

    pub fn from_moles(moles: f64, molar_mass: f64) -> Self {
        Self {
            entities: moles * AVOGADRO,
            moles,
            grams: moles * molar_mass,
        }
    }

    pub fn from_grams(grams: f64, molar_mass: f64) -> Self {
        Self {
            entities: grams * AVOGADRO / molar_mass,
            moles: grams / molar_mass,
            grams,
        }
    }
}
