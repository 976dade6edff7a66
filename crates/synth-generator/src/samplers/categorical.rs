//! Samplers that pick from declared values.

use crate::bounds::{Bounds, Unsatisfiable};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use synth_core::{OneOfValues, Value};

/// Weighted selection from a fixed list of values.
///
/// A dependency constraint replaces the candidate list for one sample;
/// candidates the sampler already knows keep their declared weight, others
/// get weight 1.
#[derive(Debug, Clone)]
pub struct OneOfSampler {
    values: Vec<Value>,
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl OneOfSampler {
    pub fn new(values: &OneOfValues) -> Result<Self, String> {
        let (values, weights): (Vec<Value>, Vec<f64>) = match values {
            OneOfValues::List(list) => list.iter().map(|v| (v.clone(), 1.0)).unzip(),
            OneOfValues::Weighted(map) => map
                .iter()
                .map(|(k, w)| {
                    w.as_f64()
                        .map(|w| (Value::String(k.clone()), w))
                        .ok_or_else(|| format!("weight of '{k}' is not a number: {w}"))
                })
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .unzip(),
        };
        if values.is_empty() {
            return Err("values must not be empty".to_string());
        }
        let index = WeightedIndex::new(&weights).map_err(|e| e.to_string())?;
        Ok(Self {
            values,
            weights,
            index,
        })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R, bounds: &Bounds) -> Result<Value, Unsatisfiable> {
        if let Some(target) = bounds.equals() {
            let allowed = match bounds.choices() {
                Some(choices) => choices.contains(target),
                None => self.values.contains(target),
            };
            if !allowed {
                return Err(Unsatisfiable(format!("{target} is not a candidate value")));
            }
            return Ok(target.clone());
        }

        match bounds.choices() {
            None => Ok(self.values[self.index.sample(rng)].clone()),
            Some(choices) => {
                let candidates: Vec<(&Value, f64)> = choices
                    .iter()
                    .map(|c| (c, self.weight_of(c).unwrap_or(1.0)))
                    .collect();
                candidates
                    .choose_weighted(rng, |(_, w)| *w)
                    .map(|(v, _)| (*v).clone())
                    .map_err(|e| Unsatisfiable(e.to_string()))
            }
        }
    }

    fn weight_of(&self, value: &Value) -> Option<f64> {
        self.values
            .iter()
            .position(|v| v == value)
            .map(|i| self.weights[i])
    }
}

/// The same value every time.
#[derive(Debug, Clone)]
pub struct ConstantSampler {
    value: Value,
}

impl ConstantSampler {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn sample(&self, bounds: &Bounds) -> Result<Value, Unsatisfiable> {
        match bounds.equals() {
            Some(target) if *target != self.value => Err(Unsatisfiable(format!(
                "constant {} cannot equal {target}",
                self.value
            ))),
            _ => Ok(self.value.clone()),
        }
    }
}
