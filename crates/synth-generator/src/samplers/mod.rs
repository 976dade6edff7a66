//! Sampler implementations.
//!
//! The set of sampler kinds is closed: [`SamplerKind`] is resolved from a
//! field spec's `class` when the schema is loaded, and every kind is driven
//! through the same sample / restart / narrowing interface.

pub mod categorical;
pub mod composite;
pub mod date;
pub mod numeric;
pub mod sequential;
pub mod tables;
pub mod text;

use crate::bounds::{Bounds, Unsatisfiable};
use crate::constraint::Narrowing;
use crate::error::SamplerError;
use rand::rngs::StdRng;
use synth_core::{FieldClass, FieldSpec, SchemaError, Value};

use categorical::{ConstantSampler, OneOfSampler};
use composite::{MapSampler, SequenceSampler};
use date::DateSampler;
use numeric::{BoolSampler, DoubleSampler, IntSampler};
use sequential::{random_uuid, IdSampler, PatternSampler};
use text::{AddressSampler, NameSampler};

/// A concrete sampler and its internal state.
#[derive(Debug)]
pub enum SamplerKind {
    Id(IdSampler),
    Int(IntSampler),
    Double(DoubleSampler),
    Bool(BoolSampler),
    OneOf(OneOfSampler),
    Constant(ConstantSampler),
    Uuid,
    Pattern(PatternSampler),
    Name(NameSampler),
    Address(AddressSampler),
    Date(DateSampler),
    Sequence(SequenceSampler),
    Map(MapSampler),
}

impl SamplerKind {
    /// Build the sampler selected by a spec's class.
    ///
    /// Constraint classes are rejected; they never become samplers.
    pub fn from_spec(spec: &FieldSpec, seed: u64) -> Result<Self, SchemaError> {
        let invalid = |reason: String| SchemaError::InvalidSampler {
            field: spec.label(),
            reason,
        };

        let kind = match &spec.class {
            FieldClass::Id { start, step } => Self::Id(IdSampler::new(*start, *step)),
            FieldClass::Int { min, max } => Self::Int(IntSampler::new(*min, *max).map_err(invalid)?),
            FieldClass::Double { min, max } => {
                Self::Double(DoubleSampler::new(*min, *max).map_err(invalid)?)
            }
            FieldClass::Bool { true_weight } => {
                Self::Bool(BoolSampler::new(*true_weight).map_err(invalid)?)
            }
            FieldClass::OneOf { values } => {
                Self::OneOf(OneOfSampler::new(values).map_err(invalid)?)
            }
            FieldClass::Constant { value } => Self::Constant(ConstantSampler::new(value.clone())),
            FieldClass::Uuid => Self::Uuid,
            FieldClass::Pattern { pattern } => Self::Pattern(PatternSampler::new(pattern.clone())),
            FieldClass::Name { name_type } => {
                Self::Name(NameSampler::new(*name_type).map_err(invalid)?)
            }
            FieldClass::Address => Self::Address(AddressSampler::new().map_err(invalid)?),
            FieldClass::Date { start, end, format } => {
                Self::Date(DateSampler::new(start, end, format).map_err(invalid)?)
            }
            FieldClass::Sequence {
                array,
                length,
                min_length,
                max_length,
            } => Self::Sequence(SequenceSampler::new(
                array,
                *length,
                *min_length,
                *max_length,
                seed,
            )?),
            FieldClass::Map { value } => Self::Map(MapSampler::new(value, seed)?),
            FieldClass::GreaterThanConstraint { .. }
            | FieldClass::LowerThanConstraint { .. }
            | FieldClass::EqualsToConstraint { .. }
            | FieldClass::DependencyConstraint { .. } => {
                return Err(invalid(format!(
                    "{} is a constraint, not a sampler",
                    spec.class.class_name()
                )))
            }
        };
        Ok(kind)
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Bool(_) => "bool",
            Self::OneOf(_) => "one-of",
            Self::Constant(_) => "constant",
            Self::Uuid => "uuid",
            Self::Pattern(_) => "pattern",
            Self::Name(_) => "name",
            Self::Address(_) => "address",
            Self::Date(_) => "date",
            Self::Sequence(_) => "sequence",
            Self::Map(_) => "map",
        }
    }

    /// Whether this kind can honour the given narrowing.
    pub fn supports(&self, narrowing: Narrowing) -> bool {
        match narrowing {
            Narrowing::Ordering => matches!(self, Self::Int(_) | Self::Double(_) | Self::Date(_)),
            Narrowing::Equality => matches!(
                self,
                Self::Int(_) | Self::Double(_) | Self::Date(_) | Self::OneOf(_) | Self::Constant(_)
            ),
            Narrowing::Choices => matches!(self, Self::OneOf(_)),
        }
    }

    /// Produce one value. `field` labels errors.
    pub fn sample(
        &mut self,
        rng: &mut StdRng,
        bounds: &Bounds,
        field: &str,
    ) -> Result<Value, SamplerError> {
        let unsatisfied = |e: Unsatisfiable| SamplerError::violation(field, e.0);

        match self {
            Self::Id(s) => Ok(s.sample()),
            Self::Int(s) => s.sample(rng, bounds).map_err(unsatisfied),
            Self::Double(s) => s.sample(rng, bounds).map_err(unsatisfied),
            Self::Bool(s) => Ok(s.sample(rng)),
            Self::OneOf(s) => s.sample(rng, bounds).map_err(unsatisfied),
            Self::Constant(s) => s.sample(bounds).map_err(unsatisfied),
            Self::Uuid => Ok(Value::String(random_uuid(rng).to_string())),
            Self::Pattern(s) => Ok(s.sample(rng)),
            Self::Name(s) => Ok(s.sample(rng)),
            Self::Address(s) => Ok(s.sample(rng)),
            Self::Date(s) => s.sample(rng, bounds).map_err(unsatisfied),
            Self::Sequence(s) => s.sample(rng),
            Self::Map(s) => s.sample(),
        }
    }

    /// Reset sequence state; nested samplers included.
    pub fn restart(&mut self) {
        match self {
            Self::Id(s) => s.restart(),
            Self::Pattern(s) => s.restart(),
            Self::Sequence(s) => s.restart(),
            Self::Map(s) => s.restart(),
            _ => {}
        }
    }

    /// Append the names of the fields an object produced by this kind has.
    ///
    /// Returns `false` when this kind does not produce objects.
    pub fn collect_object_names(&self, names: &mut Vec<String>) -> bool {
        match self {
            Self::Map(s) => {
                s.collect_names(names);
                true
            }
            Self::Constant(s) => match s.value() {
                Value::Object(object) => {
                    for key in object.keys() {
                        if !names.contains(key) {
                            names.push(key.clone());
                        }
                    }
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}
