//! Field samplers: one named (or anonymous) unit of a schema.

use crate::bounds::Bounds;
use crate::constraint::Narrowing;
use crate::error::SamplerError;
use crate::samplers::SamplerKind;
use rand::rngs::StdRng;
use rand::SeedableRng;
use synth_core::{FieldSpec, Record, SchemaError, Value};

/// Derive the RNG seed of the sampler at `position` from a parent seed.
///
/// Golden-ratio increment followed by the splitmix64 finalizer, so nearby
/// positions (and nested positions) get unrelated streams.
pub fn derive_seed(base: u64, position: usize) -> u64 {
    let mut z = base.wrapping_add((position as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A sampler together with its placement rules and attached constraints.
///
/// Each field sampler owns its RNG, seeded from the schema seed and its
/// position, so restarting it replays exactly the same values.
#[derive(Debug)]
pub struct FieldSampler {
    name: Option<String>,
    flat: bool,
    kind: SamplerKind,
    seed: u64,
    rng: StdRng,
    /// Indices of the constraints narrowing this sampler
    constraints: Vec<usize>,
}

impl FieldSampler {
    pub fn from_spec(spec: &FieldSpec, seed: u64) -> Result<Self, SchemaError> {
        Ok(Self {
            name: spec.name.clone(),
            flat: spec.flat,
            kind: SamplerKind::from_spec(spec, seed)?,
            seed,
            rng: StdRng::seed_from_u64(seed),
            constraints: Vec::new(),
        })
    }

    /// Non-flat fields are stored under their name, so they must have one.
    pub fn require_name(spec: &FieldSpec, position: usize) -> Result<(), SchemaError> {
        if spec.flat || spec.name.is_some() {
            return Ok(());
        }
        Err(SchemaError::MissingName {
            position,
            class: spec.class.class_name().to_string(),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_flat(&self) -> bool {
        self.flat
    }

    pub fn kind(&self) -> &SamplerKind {
        &self.kind
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// Name, or the class in angle brackets for anonymous fields.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("<{}>", self.kind.class_name()),
        }
    }

    /// Produce one value honouring `bounds`.
    pub fn sample(&mut self, bounds: &Bounds) -> Result<Value, SamplerError> {
        let field = self.name.as_deref().unwrap_or("<unnamed>");
        self.kind.sample(&mut self.rng, bounds, field)
    }

    /// Return to the initial state: RNG reseeded, counters reset.
    pub fn restart(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.kind.restart();
    }

    pub fn supports(&self, narrowing: Narrowing) -> bool {
        self.kind.supports(narrowing)
    }

    pub fn add_constraint(&mut self, constraint: usize) {
        self.constraints.push(constraint);
    }

    pub fn constraints(&self) -> &[usize] {
        &self.constraints
    }

    /// Write a sampled value into an object.
    ///
    /// Flat objects are spliced key by key; everything else is stored under
    /// the field's name.
    pub fn place(&self, object: &mut Record, value: Value) -> Result<(), SamplerError> {
        match (self.flat, value) {
            (true, Value::Object(fields)) => {
                object.extend(fields);
                Ok(())
            }
            (_, value) => match &self.name {
                Some(name) => {
                    object.insert(name.clone(), value);
                    Ok(())
                }
                None => Err(SamplerError::shape(
                    &self.label(),
                    format!("unnamed flat field produced {value}, which is not an object"),
                )),
            },
        }
    }

    /// Append the output field names this sampler contributes.
    pub fn collect_names(&self, names: &mut Vec<String>) {
        if self.flat {
            if self.kind.collect_object_names(names) {
                return;
            }
            // An unnamed flat sequence of objects splices its elements' keys
            if let (None, SamplerKind::Sequence(seq)) = (&self.name, &self.kind) {
                seq.element().kind().collect_object_names(names);
                return;
            }
        }
        if let Some(name) = &self.name {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use synth_core::FieldClass;

    fn int_spec(name: &str) -> FieldSpec {
        FieldSpec::named(name, FieldClass::Int { min: 0, max: 1000 })
    }

    #[test]
    fn test_derive_seed_spreads_positions() {
        let a = derive_seed(42, 0);
        let b = derive_seed(42, 1);
        let nested = derive_seed(a, 0);
        assert_ne!(a, b);
        assert_ne!(nested, b);
        assert_eq!(a, derive_seed(42, 0));
    }

    #[test]
    fn test_restart_replays_values() {
        let mut sampler = FieldSampler::from_spec(&int_spec("n"), 7).unwrap();
        let first: Vec<Value> = (0..5)
            .map(|_| sampler.sample(&Bounds::default()).unwrap())
            .collect();

        sampler.restart();
        let second: Vec<Value> = (0..5)
            .map(|_| sampler.sample(&Bounds::default()).unwrap())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_require_name() {
        let unnamed = FieldSpec {
            name: None,
            flat: false,
            class: FieldClass::Uuid,
        };
        assert!(FieldSampler::require_name(&unnamed, 3).is_err());
        assert!(FieldSampler::require_name(&FieldSpec::flat(FieldClass::Uuid), 3).is_ok());
    }

    #[test]
    fn test_constraint_spec_is_not_a_sampler() {
        let spec = FieldSpec::flat(FieldClass::LowerThanConstraint {
            att1: "a".to_string(),
            att2: "b".to_string(),
        });
        assert!(matches!(
            FieldSampler::from_spec(&spec, 0),
            Err(SchemaError::InvalidSampler { .. })
        ));
    }

    #[test]
    fn test_place_flat_object_splices() {
        let spec = FieldSpec::flat(FieldClass::Constant {
            value: json!({"a": 1, "b": 2}),
        });
        let sampler = FieldSampler::from_spec(&spec, 0).unwrap();
        let mut record = Record::new();
        record.insert("a".to_string(), json!(0));

        sampler.place(&mut record, json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(Value::Object(record), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_place_unnamed_scalar_is_shape_error() {
        let spec = FieldSpec::flat(FieldClass::Constant { value: json!(5) });
        let sampler = FieldSampler::from_spec(&spec, 0).unwrap();
        let mut record = Record::new();

        assert!(matches!(
            sampler.place(&mut record, json!(5)),
            Err(SamplerError::Shape { .. })
        ));
    }

    #[test]
    fn test_collect_names() {
        let mut names = Vec::new();
        FieldSampler::from_spec(&int_spec("a"), 0)
            .unwrap()
            .collect_names(&mut names);

        let flat_seq = FieldSpec::flat(FieldClass::Sequence {
            array: Box::new(FieldSpec::flat(FieldClass::Map {
                value: vec![int_spec("x"), int_spec("y")],
            })),
            length: Some(2),
            min_length: 0,
            max_length: 0,
        });
        FieldSampler::from_spec(&flat_seq, 0)
            .unwrap()
            .collect_names(&mut names);

        // Duplicates are only listed once
        FieldSampler::from_spec(&int_spec("a"), 0)
            .unwrap()
            .collect_names(&mut names);

        assert_eq!(names, vec!["a", "x", "y"]);
    }
}
