//! Read-only catalog of elements, keyed by atomic number, symbol and name

use std::{collections::HashMap, fs, path::Path};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

static STANDARD: Lazy<std::result::Result<PeriodicTable, String>> = Lazy::new(|| {
    PeriodicTable::from_json(include_str!("../data/elements.json")).map_err(|e| e.to_string())
});

/// Common oxidation state(s) of an element, most prevalent first
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Charge {
    Single(i32),
    Multiple(Vec<i32>),
}

impl Charge {
    pub fn primary(&self) -> i32 {
        match self {
            Charge::Single(c) => *c,
            Charge::Multiple(cs) => cs.first().copied().unwrap_or(0),
        }
    }

    pub fn all(&self) -> Vec<i32> {
        match self {
            Charge::Single(c) => vec![*c],
            Charge::Multiple(cs) => cs.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Element {
    pub number: u32,
    pub symbol: String,
    pub name: String,
    /// standard atomic weight, or the mass of the most stable isotope when
    /// `unstable` is set
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub charge: Option<Charge>,
    /// no stable isotope exists
    #[serde(default)]
    pub unstable: bool,
}

impl Element {
    /// the first listed characteristic charge, or 0 if the element has none
    pub fn primary_charge(&self) -> i32 {
        self.charge.as_ref().map_or(0, Charge::primary)
    }
}

/// Rest masses of the nucleons and the electron, in u
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParticleMasses {
    pub proton: f64,
    pub neutron: f64,
    pub electron: f64,
}

impl Default for ParticleMasses {
    fn default() -> Self {
        Self {
            proton: 1.007276466812,
            neutron: 1.00866491600,
            electron: 0.00054857991,
        }
    }
}

#[derive(Deserialize)]
struct TableDocument {
    #[serde(default)]
    particles: ParticleMasses,
    elements: Vec<Element>,
}

/// A key for [PeriodicTable::lookup]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
    Number(u32),
    Text(&'a str),
}

impl<'a> Lookup<'a> {
    /// treat `s` as an atomic number if it is all digits, otherwise as a name
    /// or symbol
    pub fn parse(s: &'a str) -> Self {
        let s = s.trim();
        match s.parse() {
            Ok(n) => Lookup::Number(n),
            Err(_) => Lookup::Text(s),
        }
    }
}

#[derive(Debug)]
pub struct PeriodicTable {
    elements: Vec<Element>,
    particles: ParticleMasses,
    by_number: HashMap<u32, usize>,
    by_symbol: HashMap<String, usize>,
    /// keyed by lowercased name
    by_name: HashMap<String, usize>,
}

impl PeriodicTable {
    pub fn new(elements: Vec<Element>, particles: ParticleMasses) -> Result<Self> {
        let mut by_number = HashMap::new();
        let mut by_symbol = HashMap::new();
        let mut by_name = HashMap::new();
        for (i, e) in elements.iter().enumerate() {
            if by_number.insert(e.number, i).is_some() {
                return Err(Error::DuplicateElement(e.number.to_string()));
            }
            if by_symbol.insert(e.symbol.clone(), i).is_some() {
                return Err(Error::DuplicateElement(e.symbol.clone()));
            }
            if by_name.insert(e.name.to_lowercase(), i).is_some() {
                return Err(Error::DuplicateElement(e.name.clone()));
            }
        }
        debug!(elements = elements.len(), "built periodic table");
        Ok(Self {
            elements,
            particles,
            by_number,
            by_symbol,
            by_name,
        })
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let doc: TableDocument = serde_json::from_str(s)?;
        Self::new(doc.elements, doc.particles)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: TableDocument =
            serde_json::from_str(&source).map_err(|source| Error::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), elements = doc.elements.len(), "loaded periodic table");
        Self::new(doc.elements, doc.particles)
    }

    /// The built-in table of 118 elements. Built on first use and shared for
    /// the rest of the process.
    pub fn try_standard() -> Result<&'static PeriodicTable> {
        STANDARD
            .as_ref()
            .map_err(|e| Error::Builtin(e.clone()))
    }

    /// [PeriodicTable::try_standard] for callers that treat the built-in data
    /// as part of the program.
    ///
    /// # Panics
    ///
    /// if the embedded `data/elements.json` does not load, which the tests
    /// of this crate rule out
    pub fn standard() -> &'static PeriodicTable {
        match Self::try_standard() {
            Ok(table) => table,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn particles(&self) -> ParticleMasses {
        self.particles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn by_number(&self, n: u32) -> Result<&Element> {
        self.by_number
            .get(&n)
            .map(|&i| &self.elements[i])
            .ok_or_else(|| Error::NotFound(n.to_string()))
    }

    /// exact, case-sensitive symbol match
    pub fn by_symbol(&self, symbol: &str) -> Result<&Element> {
        self.by_symbol
            .get(symbol)
            .map(|&i| &self.elements[i])
            .ok_or_else(|| Error::NotFound(symbol.to_owned()))
    }

    pub fn by_name(&self, name: &str) -> Result<&Element> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.elements[i])
            .ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    /// Text is tried as a case-insensitive name first, then as an exact
    /// symbol.
    pub fn lookup(&self, key: Lookup<'_>) -> Result<&Element> {
        match key {
            Lookup::Number(n) => self.by_number(n),
            Lookup::Text(s) => self.by_name(s).or_else(|_| self.by_symbol(s)),
        }
    }

    pub fn standard_weight(&self, symbol: &str) -> Result<f64> {
        self.by_symbol(symbol)?
            .weight
            .ok_or_else(|| Error::MissingWeight(symbol.to_owned()))
    }

    /// Mass of a single isotope summed from its particles. With no `charge`
    /// the element's primary characteristic charge decides the electron
    /// count.
    pub fn isotope_weight(
        &self,
        symbol: &str,
        mass_number: u32,
        charge: Option<i32>,
    ) -> Result<f64> {
        let element = self.by_symbol(symbol)?;
        let protons = element.number;
        if mass_number < protons {
            return Err(Error::InvalidIsotope {
                symbol: symbol.to_owned(),
                mass_number,
                protons,
            });
        }
        let neutrons = mass_number - protons;
        let charge = charge.unwrap_or_else(|| element.primary_charge());
        let electrons = i64::from(protons) - i64::from(charge);
        let ParticleMasses {
            proton,
            neutron,
            electron,
        } = self.particles;
        Ok(f64::from(protons) * proton
            + f64::from(neutrons) * neutron
            + electrons as f64 * electron)
    }
}
