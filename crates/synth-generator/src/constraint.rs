//! Cross-field constraints.
//!
//! A constraint ties a dependent field (`att1`) to a prerequisite field
//! (`att2`). The prerequisite is always sampled first in a pass; its value
//! is then folded into the dependent sampler's [`Bounds`] right before the
//! dependent samples.
//!
//! Constraints refer to their participants by sampler index, resolved once
//! when the dependency graph is built. They hold no references to the
//! samplers themselves.

use crate::bounds::{Bounds, Unsatisfiable};
use std::collections::HashMap;
use synth_core::{value_key, FieldClass, FieldSpec, Value};

/// The kind of narrowing a constraint asks of its dependent sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Narrowing {
    /// Lower / upper limits
    Ordering,
    /// An exact value
    Equality,
    /// A restricted set of candidate values
    Choices,
}

/// Relationship between `att1` and the value of `att2`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    GreaterThan,
    LowerThan,
    EqualsTo,
    /// `att1` is drawn from the branch selected by `att2`'s value
    Dependency {
        branches: HashMap<String, Vec<Value>>,
    },
}

impl ConstraintKind {
    /// What the dependent sampler must support.
    pub fn narrowing(&self) -> Narrowing {
        match self {
            Self::GreaterThan | Self::LowerThan => Narrowing::Ordering,
            Self::EqualsTo => Narrowing::Equality,
            Self::Dependency { .. } => Narrowing::Choices,
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Self::GreaterThan => "greater-than-constraint",
            Self::LowerThan => "lower-than-constraint",
            Self::EqualsTo => "equals-to-constraint",
            Self::Dependency { .. } => "dependency-constraint",
        }
    }
}

/// Sampler indices of a constraint's two fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participants {
    /// Index of the `att1` sampler
    pub dependent: usize,
    /// Index of the `att2` sampler
    pub prerequisite: usize,
}

/// A directed constraint between two named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    kind: ConstraintKind,
    att1: String,
    att2: String,
    participants: Option<Participants>,
}

impl Constraint {
    pub fn new(kind: ConstraintKind, att1: impl Into<String>, att2: impl Into<String>) -> Self {
        Self {
            kind,
            att1: att1.into(),
            att2: att2.into(),
            participants: None,
        }
    }

    /// Build a constraint from a schema entry, or `None` for ordinary samplers.
    pub fn from_spec(spec: &FieldSpec) -> Option<Self> {
        let kind = match &spec.class {
            FieldClass::GreaterThanConstraint { .. } => ConstraintKind::GreaterThan,
            FieldClass::LowerThanConstraint { .. } => ConstraintKind::LowerThan,
            FieldClass::EqualsToConstraint { .. } => ConstraintKind::EqualsTo,
            FieldClass::DependencyConstraint { values, .. } => ConstraintKind::Dependency {
                branches: values.clone(),
            },
            _ => return None,
        };
        let (att1, att2) = spec.class.constraint_fields()?;
        Some(Self::new(kind, att1, att2))
    }

    /// Name of the dependent field.
    pub fn att1(&self) -> &str {
        &self.att1
    }

    /// Name of the prerequisite field.
    pub fn att2(&self) -> &str {
        &self.att2
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    /// Identity used in logs: `att1 <kind> att2`.
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.att1, self.kind.class_name(), self.att2)
    }

    /// Participants, once the dependency graph has resolved them.
    pub fn participants(&self) -> Option<Participants> {
        self.participants
    }

    pub fn set_participants(&mut self, dependent: usize, prerequisite: usize) {
        self.participants = Some(Participants {
            dependent,
            prerequisite,
        });
    }

    /// Fold the prerequisite's value for this pass into the dependent's bounds.
    pub fn narrow(&self, prerequisite: &Value, bounds: &mut Bounds) -> Result<(), Unsatisfiable> {
        match &self.kind {
            ConstraintKind::GreaterThan => bounds.raise_lower(prerequisite.clone(), false),
            ConstraintKind::LowerThan => bounds.reduce_upper(prerequisite.clone(), false),
            ConstraintKind::EqualsTo => bounds.require_equal(prerequisite.clone()),
            ConstraintKind::Dependency { branches } => {
                let key = value_key(prerequisite);
                let values = branches.get(&key).ok_or_else(|| {
                    Unsatisfiable(format!("no branch declared for {} = {key}", self.att2))
                })?;
                bounds.restrict_choices(values.clone())
            }
        }
    }
}
