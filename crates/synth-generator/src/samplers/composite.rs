//! Samplers built from nested field specs.

use crate::bounds::Bounds;
use crate::error::SamplerError;
use crate::field::{derive_seed, FieldSampler};
use rand::Rng;
use synth_core::{FieldSpec, Record, SchemaError, Value};

/// Arrays of values produced by a nested element sampler.
#[derive(Debug)]
pub struct SequenceSampler {
    element: Box<FieldSampler>,
    min_length: usize,
    max_length: usize,
}

impl SequenceSampler {
    pub fn new(
        element: &FieldSpec,
        length: Option<usize>,
        min_length: usize,
        max_length: usize,
        seed: u64,
    ) -> Result<Self, SchemaError> {
        let (min_length, max_length) = match length {
            Some(n) => (n, n),
            None => (min_length, max_length),
        };
        if min_length > max_length {
            return Err(SchemaError::InvalidSampler {
                field: element.label(),
                reason: format!("min_length ({min_length}) exceeds max_length ({max_length})"),
            });
        }
        Ok(Self {
            element: Box::new(FieldSampler::from_spec(element, derive_seed(seed, 0))?),
            min_length,
            max_length,
        })
    }

    pub fn sample<R: Rng>(&mut self, rng: &mut R) -> Result<Value, SamplerError> {
        let length = rng.gen_range(self.min_length..=self.max_length);
        let items = (0..length)
            .map(|_| self.element.sample(&Bounds::default()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(items))
    }

    pub fn restart(&mut self) {
        self.element.restart();
    }

    pub fn element(&self) -> &FieldSampler {
        &self.element
    }

    /// Longest array this sampler can produce.
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

/// Objects whose fields come from a nested list of samplers.
///
/// Children run in declared order and are placed the way top-level fields
/// are, except that arrays are stored as values rather than fanned out.
#[derive(Debug)]
pub struct MapSampler {
    fields: Vec<FieldSampler>,
}

impl MapSampler {
    pub fn new(specs: &[FieldSpec], seed: u64) -> Result<Self, SchemaError> {
        let fields = specs
            .iter()
            .enumerate()
            .map(|(position, spec)| {
                if spec.is_constraint() {
                    return Err(SchemaError::InvalidSampler {
                        field: spec.label(),
                        reason: "constraints are only allowed at the top level".to_string(),
                    });
                }
                FieldSampler::require_name(spec, position)?;
                FieldSampler::from_spec(spec, derive_seed(seed, position))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fields })
    }

    pub fn sample(&mut self) -> Result<Value, SamplerError> {
        let mut object = Record::new();
        for field in &mut self.fields {
            let value = field.sample(&Bounds::default())?;
            field.place(&mut object, value)?;
        }
        Ok(Value::Object(object))
    }

    pub fn restart(&mut self) {
        for field in &mut self.fields {
            field.restart();
        }
    }

    pub fn collect_names(&self, names: &mut Vec<String>) {
        for field in &self.fields {
            field.collect_names(names);
        }
    }
}
