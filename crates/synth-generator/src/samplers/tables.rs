//! Process-wide read-only frequency tables.
//!
//! Each table is parsed from an embedded resource the first time any
//! sampler asks for it. Concurrent first accesses race on the `LazyLock`;
//! exactly one of them parses and every caller sees the same table.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::sync::LazyLock;
use tracing::debug;

static FIRST_NAMES: LazyLock<Result<WeightedTable, String>> =
    LazyLock::new(|| load("first-names", include_str!("../../resources/first-names.txt")));

static LAST_NAMES: LazyLock<Result<WeightedTable, String>> =
    LazyLock::new(|| load("last-names", include_str!("../../resources/last-names.txt")));

static STREET_NAMES: LazyLock<Result<WeightedTable, String>> =
    LazyLock::new(|| load("street-names", include_str!("../../resources/street-names.txt")));

fn load(table: &str, source: &str) -> Result<WeightedTable, String> {
    let parsed = WeightedTable::parse(source).map_err(|e| format!("{table}: {e}"));
    if let Ok(t) = &parsed {
        debug!(table, entries = t.len(), "Loaded frequency table");
    }
    parsed
}

pub fn first_names() -> Result<&'static WeightedTable, String> {
    FIRST_NAMES.as_ref().map_err(Clone::clone)
}

pub fn last_names() -> Result<&'static WeightedTable, String> {
    LAST_NAMES.as_ref().map_err(Clone::clone)
}

pub fn street_names() -> Result<&'static WeightedTable, String> {
    STREET_NAMES.as_ref().map_err(Clone::clone)
}

/// Entries with relative weights.
#[derive(Debug)]
pub struct WeightedTable {
    entries: Vec<String>,
    index: WeightedIndex<f64>,
}

impl WeightedTable {
    /// Parse `name weight` lines. Blank lines and `#` comments are skipped;
    /// a name listed twice has its weights summed.
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut entries: Vec<String> = Vec::new();
        let mut weights: Vec<f64> = Vec::new();

        for (line_no, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (Some(name), Some(weight)) = (parts.next(), parts.next()) else {
                return Err(format!("line {}: expected 'name weight'", line_no + 1));
            };
            let weight: f64 = weight
                .parse()
                .map_err(|e| format!("line {}: {e}", line_no + 1))?;

            match entries.iter().position(|e| e == name) {
                Some(i) => weights[i] += weight,
                None => {
                    entries.push(name.to_string());
                    weights.push(weight);
                }
            }
        }

        let index = WeightedIndex::new(&weights).map_err(|e| e.to_string())?;
        Ok(Self { entries, index })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> &str {
        &self.entries[self.index.sample(rng)]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
