//! Person names and street addresses drawn from the shared tables.

use super::tables::{self, WeightedTable};
use rand::Rng;
use synth_core::{NameType, Value};

/// Names in one of several layouts.
#[derive(Debug, Clone)]
pub struct NameSampler {
    name_type: NameType,
    first: &'static WeightedTable,
    last: &'static WeightedTable,
}

impl NameSampler {
    pub fn new(name_type: NameType) -> Result<Self, String> {
        Ok(Self {
            name_type,
            first: tables::first_names()?,
            last: tables::last_names()?,
        })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Value {
        let name = match self.name_type {
            NameType::First => self.first.sample(rng).to_string(),
            NameType::Last => self.last.sample(rng).to_string(),
            NameType::FirstLast => {
                format!("{} {}", self.first.sample(rng), self.last.sample(rng))
            }
            NameType::LastFirst => {
                format!("{}, {}", self.last.sample(rng), self.first.sample(rng))
            }
        };
        Value::String(name)
    }
}

const STREET_SUFFIXES: &[&str] = &["St", "Ave", "Rd", "Blvd", "Ln", "Dr", "Way", "Ct"];

/// `<number> <street> <suffix>` addresses.
#[derive(Debug, Clone)]
pub struct AddressSampler {
    streets: &'static WeightedTable,
}

impl AddressSampler {
    pub fn new() -> Result<Self, String> {
        Ok(Self {
            streets: tables::street_names()?,
        })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Value {
        let number: u32 = rng.gen_range(1..10_000);
        let street = self.streets.sample(rng);
        let suffix = STREET_SUFFIXES[rng.gen_range(0..STREET_SUFFIXES.len())];
        Value::String(format!("{number} {street} {suffix}"))
    }
}
