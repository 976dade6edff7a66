//! Per-pass narrowing of a sampler's value range.
//!
//! Constraints never touch a sampler's configuration. Before a constrained
//! sampler runs, every attached constraint folds the prerequisite's value
//! into a fresh [`Bounds`]; the sampler honours those bounds for that one
//! sample and the bounds are then dropped.

use std::cmp::Ordering;
use synth_core::{compare_values, Value};

/// No value can satisfy the current bounds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct Unsatisfiable(pub String);

/// One end of a range.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub value: Value,
    pub inclusive: bool,
}

/// Transient restrictions applied to a single sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bounds {
    lower: Option<Limit>,
    upper: Option<Limit>,
    equals: Option<Value>,
    choices: Option<Vec<Value>>,
}

impl Bounds {
    /// Whether no constraint has narrowed anything.
    pub fn is_unconstrained(&self) -> bool {
        self.lower.is_none()
            && self.upper.is_none()
            && self.equals.is_none()
            && self.choices.is_none()
    }

    pub fn lower(&self) -> Option<&Limit> {
        self.lower.as_ref()
    }

    pub fn upper(&self) -> Option<&Limit> {
        self.upper.as_ref()
    }

    pub fn equals(&self) -> Option<&Value> {
        self.equals.as_ref()
    }

    pub fn choices(&self) -> Option<&[Value]> {
        self.choices.as_deref()
    }

    /// Require values above `value`, keeping whichever lower limit is tighter.
    pub fn raise_lower(&mut self, value: Value, inclusive: bool) -> Result<(), Unsatisfiable> {
        let tighter = match &self.lower {
            None => true,
            Some(current) => match compare_limit(&value, &current.value)? {
                Ordering::Greater => true,
                Ordering::Equal => current.inclusive && !inclusive,
                Ordering::Less => false,
            },
        };
        if tighter {
            self.lower = Some(Limit { value, inclusive });
        }
        Ok(())
    }

    /// Require values below `value`, keeping whichever upper limit is tighter.
    pub fn reduce_upper(&mut self, value: Value, inclusive: bool) -> Result<(), Unsatisfiable> {
        let tighter = match &self.upper {
            None => true,
            Some(current) => match compare_limit(&value, &current.value)? {
                Ordering::Less => true,
                Ordering::Equal => current.inclusive && !inclusive,
                Ordering::Greater => false,
            },
        };
        if tighter {
            self.upper = Some(Limit { value, inclusive });
        }
        Ok(())
    }

    /// Require exactly `value`.
    pub fn require_equal(&mut self, value: Value) -> Result<(), Unsatisfiable> {
        match &self.equals {
            Some(current) if *current != value => Err(Unsatisfiable(format!(
                "must equal both {current} and {value}"
            ))),
            _ => {
                self.equals = Some(value);
                Ok(())
            }
        }
    }

    /// Restrict the value to one of `values`.
    ///
    /// Repeated restrictions intersect, keeping the order of the first one.
    pub fn restrict_choices(&mut self, values: Vec<Value>) -> Result<(), Unsatisfiable> {
        let narrowed = match self.choices.take() {
            None => values,
            Some(current) => current.into_iter().filter(|v| values.contains(v)).collect(),
        };
        if narrowed.is_empty() {
            return Err(Unsatisfiable("no candidate value remains".to_string()));
        }
        self.choices = Some(narrowed);
        Ok(())
    }

    /// Lower limit as a number.
    pub fn numeric_lower(&self) -> Result<Option<(f64, bool)>, Unsatisfiable> {
        self.lower
            .as_ref()
            .map(|l| Ok((as_number(&l.value)?, l.inclusive)))
            .transpose()
    }

    /// Upper limit as a number.
    pub fn numeric_upper(&self) -> Result<Option<(f64, bool)>, Unsatisfiable> {
        self.upper
            .as_ref()
            .map(|l| Ok((as_number(&l.value)?, l.inclusive)))
            .transpose()
    }
}

fn compare_limit(a: &Value, b: &Value) -> Result<Ordering, Unsatisfiable> {
    compare_values(a, b).ok_or_else(|| Unsatisfiable(format!("cannot compare {a} with {b}")))
}

/// Interpret a value as a number.
pub fn as_number(value: &Value) -> Result<f64, Unsatisfiable> {
    value
        .as_f64()
        .ok_or_else(|| Unsatisfiable(format!("{value} is not a number")))
}
