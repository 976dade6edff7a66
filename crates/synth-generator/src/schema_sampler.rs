//! The record generation engine.

use crate::bounds::Bounds;
use crate::constraint::Constraint;
use crate::error::SamplerError;
use crate::expand::{cross_product, FieldKey};
use crate::field::{derive_seed, FieldSampler};
use crate::graph::DependencyGraph;
use crate::samplers::SamplerKind;
use std::collections::{HashMap, VecDeque};
use synth_core::{Record, SchemaDefinition, SchemaError, Value};
use tracing::{debug, trace, warn};

/// Turns a schema into an infinite, constraint-respecting stream of records.
///
/// Construction partitions the schema into ordinary samplers and
/// constraints, resolves the dependency graph and fixes the evaluation
/// order. Each generation pass then samples every field exactly once in
/// that order and fans array-producing flat fields out into one record per
/// combination. Records wait in a FIFO buffer until [`SchemaSampler::sample`]
/// hands them out.
///
/// A `SchemaSampler` is single-writer. Run one instance per worker to
/// generate in parallel.
#[derive(Debug)]
pub struct SchemaSampler {
    /// Ordinary samplers, in schema order
    samplers: Vec<FieldSampler>,
    constraints: Vec<Constraint>,
    /// Sampler indices in evaluation order
    order: Vec<usize>,
    /// Samplers whose value some constraint reads
    prerequisites: Vec<bool>,
    field_names: Vec<String>,
    buffer: VecDeque<Record>,
    passes: u64,
}

impl SchemaSampler {
    pub fn new(definition: &SchemaDefinition, seed: u64) -> Result<Self, SchemaError> {
        let mut samplers = Vec::new();
        let mut constraints = Vec::new();
        let mut name_map: HashMap<String, usize> = HashMap::new();

        for (position, spec) in definition.fields.iter().enumerate() {
            if let Some(constraint) = Constraint::from_spec(spec) {
                constraints.push(constraint);
                continue;
            }
            FieldSampler::require_name(spec, position)?;
            if let Some(name) = &spec.name {
                if name_map.contains_key(name) {
                    warn!(
                        "Field '{name}' at position {position} duplicates an earlier field; \
                         the first definition is used and this one is ignored"
                    );
                    continue;
                }
                name_map.insert(name.clone(), samplers.len());
            }
            let sampler = FieldSampler::from_spec(spec, derive_seed(seed, position))?;
            if let (true, SamplerKind::Sequence(seq)) = (sampler.is_flat(), sampler.kind()) {
                if seq.max_length() == 0 {
                    return Err(SchemaError::InvalidSampler {
                        field: sampler.label(),
                        reason: "flat sequence is always empty, so no record would ever be produced"
                            .to_string(),
                    });
                }
            }
            samplers.push(sampler);
        }

        debug!(
            "Schema has {} samplers and {} constraints",
            samplers.len(),
            constraints.len()
        );

        let graph = DependencyGraph::build(&mut samplers, &mut constraints, &name_map)?;
        let order = graph.topological_order(&samplers)?;

        let mut prerequisites = vec![false; samplers.len()];
        for participants in constraints.iter().filter_map(Constraint::participants) {
            prerequisites[participants.prerequisite] = true;
        }

        let mut field_names = Vec::new();
        for sampler in &samplers {
            sampler.collect_names(&mut field_names);
        }

        let sampler = Self {
            samplers,
            constraints,
            order,
            prerequisites,
            field_names,
            buffer: VecDeque::new(),
            passes: 0,
        };
        debug!("Evaluation order: {:?}", sampler.evaluation_order());
        Ok(sampler)
    }

    /// Load a schema file and build a sampler for it.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P, seed: u64) -> Result<Self, SchemaError> {
        Self::new(&SchemaDefinition::from_file(path)?, seed)
    }

    /// Next record of the stream.
    ///
    /// Passes that produce no record (an empty array generator) are simply
    /// followed by another pass, so every successful call returns a record.
    pub fn sample(&mut self) -> Result<Record, SamplerError> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Ok(record);
            }
            let pushed = self.generate_pass()?;
            if pushed == 0 {
                trace!("Pass {} produced no records", self.passes);
            }
        }
    }

    /// Reset every sampler, in schema order, to its initial state.
    ///
    /// Records already buffered are kept and delivered first.
    pub fn restart(&mut self) {
        for sampler in &mut self.samplers {
            sampler.restart();
        }
        debug!(
            "Restarted {} samplers ({} records still buffered)",
            self.samplers.len(),
            self.buffer.len()
        );
    }

    /// Names of the top-level fields records carry, in schema order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Records generated but not yet handed out.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Sampler labels in the order a pass visits them.
    pub fn evaluation_order(&self) -> Vec<String> {
        self.order.iter().map(|&i| self.samplers[i].label()).collect()
    }

    /// Number of generation passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Run one pass and push its records onto the buffer.
    fn generate_pass(&mut self) -> Result<usize, SamplerError> {
        self.passes += 1;

        let mut record = Record::new();
        let mut generators: Vec<(FieldKey, Vec<Value>)> = Vec::new();
        let mut produced: Vec<Option<Value>> = vec![None; self.samplers.len()];

        for position in 0..self.order.len() {
            let index = self.order[position];
            let bounds = self.bounds_for(index, &produced)?;
            let sampler = &mut self.samplers[index];
            let value = sampler.sample(&bounds)?;

            if self.prerequisites[index] {
                produced[index] = Some(value.clone());
            }

            match value {
                Value::Array(items) if sampler.is_flat() => {
                    let key = match sampler.name() {
                        Some(name) => FieldKey::Named(name.to_string()),
                        None => FieldKey::FlattenMarker,
                    };
                    generators.push((key, items));
                }
                value => sampler.place(&mut record, value)?,
            }
        }

        if generators.is_empty() {
            self.buffer.push_back(record);
            return Ok(1);
        }

        // Stage the pass so a failed expansion leaves nothing behind
        let mut staged = VecDeque::new();
        let pushed = cross_product(&mut staged, &record, &generators)?;
        self.buffer.append(&mut staged);
        trace!(
            "Pass {} fanned {} generators out into {pushed} records",
            self.passes,
            generators.len()
        );
        Ok(pushed)
    }

    /// Fold every constraint attached to `index` into fresh bounds.
    fn bounds_for(&self, index: usize, produced: &[Option<Value>]) -> Result<Bounds, SamplerError> {
        let mut bounds = Bounds::default();
        for &c in self.samplers[index].constraints() {
            let constraint = &self.constraints[c];
            let Some(participants) = constraint.participants() else {
                continue;
            };
            let value = produced[participants.prerequisite].as_ref().ok_or_else(|| {
                SamplerError::violation(
                    constraint.att1(),
                    format!("{} has not been sampled yet", constraint.att2()),
                )
            })?;
            constraint
                .narrow(value, &mut bounds)
                .map_err(|e| SamplerError::violation(constraint.att1(), e.0))?;
        }
        Ok(bounds)
    }
}

impl Iterator for SchemaSampler {
    type Item = Result<Record, SamplerError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sampler(yaml: &str, seed: u64) -> SchemaSampler {
        let definition = SchemaDefinition::from_yaml(yaml).unwrap();
        SchemaSampler::new(&definition, seed).unwrap()
    }

    #[test]
    fn test_simple_record() {
        let mut s = sampler(
            r#"
- {name: id, class: id}
- {name: n, class: int, min: 5, max: 6}
- {name: tag, class: constant, value: x}
"#,
            42,
        );

        let record = s.sample().unwrap();
        assert_eq!(Value::Object(record), json!({"id": 0, "n": 5, "tag": "x"}));
        assert_eq!(s.field_names(), &["id", "n", "tag"]);
        assert_eq!(s.passes(), 1);
    }

    #[test]
    fn test_constraint_reorders_evaluation() {
        let s = sampler(
            r#"
- {name: a, class: int}
- {name: b, class: int}
- {class: greater-than-constraint, att1: a, att2: b}
"#,
            1,
        );
        assert_eq!(s.evaluation_order(), vec!["b", "a"]);
        // Output keeps schema order regardless of evaluation order
        assert_eq!(s.field_names(), &["a", "b"]);
    }

    #[test]
    fn test_duplicate_name_first_wins() {
        let mut s = sampler(
            r#"
- {name: a, class: constant, value: first}
- {name: a, class: constant, value: second}
"#,
            1,
        );
        assert_eq!(s.field_names(), &["a"]);
        assert_eq!(s.sample().unwrap()["a"], json!("first"));
    }

    #[test]
    fn test_fan_out_is_buffered() {
        let mut s = sampler(
            r#"
- {name: id, class: id}
- name: tag
  flat: true
  class: sequence
  length: 4
  array: {class: one-of, values: [a, b]}
"#,
            3,
        );

        let first = s.sample().unwrap();
        assert_eq!(s.buffered(), 3);
        for _ in 0..3 {
            assert_eq!(s.sample().unwrap()["id"], first["id"]);
        }
        assert_eq!(s.passes(), 1);
        assert_eq!(s.sample().unwrap()["id"], json!(1));
    }

    #[test]
    fn test_empty_generator_reruns_pass() {
        let mut s = sampler(
            r#"
- {name: id, class: id}
- name: tag
  flat: true
  class: sequence
  min_length: 0
  max_length: 1
  array: {class: constant, value: t}
"#,
            11,
        );

        for _ in 0..20 {
            let record = s.sample().unwrap();
            assert_eq!(record["tag"], json!("t"));
        }
        assert!(s.passes() >= 20);
    }

    #[test]
    fn test_flat_unnamed_scalar_is_shape_error() {
        let mut s = sampler("- {flat: true, class: constant, value: 3}", 0);
        assert!(matches!(s.sample(), Err(SamplerError::Shape { .. })));
    }

    #[test]
    fn test_unsatisfiable_constraint_fails_pass() {
        let mut s = sampler(
            r#"
- {name: a, class: int, min: 0, max: 10}
- {name: b, class: int, min: 50, max: 60}
- {class: greater-than-constraint, att1: a, att2: b}
"#,
            5,
        );
        assert!(matches!(
            s.sample(),
            Err(SamplerError::ConstraintViolation { field, .. }) if field == "a"
        ));
    }

    #[test]
    fn test_configuration_errors() {
        let undefined = SchemaDefinition::from_yaml(
            "- {name: a, class: int}\n- {class: equals-to-constraint, att1: a, att2: zz}",
        )
        .unwrap();
        assert!(matches!(
            SchemaSampler::new(&undefined, 0),
            Err(SchemaError::UndefinedField { .. })
        ));

        let cycle = SchemaDefinition::from_yaml(
            r#"
- {name: a, class: int}
- {name: b, class: int}
- {class: greater-than-constraint, att1: a, att2: b}
- {class: lower-than-constraint, att1: b, att2: a}
"#,
        )
        .unwrap();
        assert!(matches!(
            SchemaSampler::new(&cycle, 0),
            Err(SchemaError::DependencyCycle { .. })
        ));

        let unnamed = SchemaDefinition::from_yaml("- {class: int}").unwrap();
        assert!(matches!(
            SchemaSampler::new(&unnamed, 0),
            Err(SchemaError::MissingName { position: 0, .. })
        ));
    }

    #[test]
    fn test_always_empty_flat_sequence_is_rejected() {
        let definition = SchemaDefinition::from_yaml(
            "- {name: id, class: id}\n- {name: tag, flat: true, class: sequence, length: 0, array: {class: uuid}}",
        )
        .unwrap();
        assert!(matches!(
            SchemaSampler::new(&definition, 0),
            Err(SchemaError::InvalidSampler { field, .. }) if field == "tag"
        ));

        // Not flat, so the empty array is just a value
        let mut s = sampler("- {name: tag, class: sequence, length: 0, array: {class: uuid}}", 0);
        assert_eq!(s.sample().unwrap()["tag"], json!([]));
    }

    #[test]
    fn test_shape_error_discards_partial_pass() {
        let mut s = sampler(
            "[{name: id, class: id}, {flat: true, class: sequence, length: 2, array: {class: one-of, values: [{x: 1}, 5]}}]",
            1,
        );

        let mut failures = 0;
        for _ in 0..200 {
            match s.sample() {
                Ok(record) => assert_eq!(record["x"], json!(1)),
                Err(SamplerError::Shape { .. }) => {
                    assert_eq!(s.buffered(), 0);
                    failures += 1;
                }
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert!(failures > 0);
    }

    #[test]
    fn test_iterator_is_infinite_stream() {
        let s = sampler("- {name: id, class: id, start: 10}", 0);
        let ids: Vec<Value> = s.take(3).map(|r| r.unwrap()["id"].clone()).collect();
        assert_eq!(ids, vec![json!(10), json!(11), json!(12)]);
    }
}
