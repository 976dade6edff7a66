//! Fan-out of array-generating fields into one record per combination.

use crate::error::SamplerError;
use std::collections::VecDeque;
use synth_core::{Record, Value};

/// Where a generator's elements go in each output record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    /// Each element is stored under this name
    Named(String),
    /// Each element is an object spliced into the record
    FlattenMarker,
}

impl FieldKey {
    fn label(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::FlattenMarker => "<flat>",
        }
    }
}

/// Push one record per element of the cartesian product of `generators`
/// onto `buffer`, each built on a copy of `base`.
///
/// Returns the number of records pushed; this is the product of the
/// generator lengths, so any empty generator yields nothing. With no
/// generators at all, a single copy of `base` is pushed. On error `buffer`
/// may already hold part of the product.
pub fn cross_product(
    buffer: &mut VecDeque<Record>,
    base: &Record,
    generators: &[(FieldKey, Vec<Value>)],
) -> Result<usize, SamplerError> {
    let Some(((key, elements), rest)) = generators.split_first() else {
        buffer.push_back(base.clone());
        return Ok(1);
    };

    let mut pushed = 0;
    for element in elements {
        let mut record = base.clone();
        match key {
            FieldKey::Named(name) => {
                record.insert(name.clone(), element.clone());
            }
            FieldKey::FlattenMarker => match element {
                Value::Object(fields) => {
                    for (k, v) in fields {
                        record.insert(k.clone(), v.clone());
                    }
                }
                other => {
                    return Err(SamplerError::shape(
                        key.label(),
                        format!("flattened array element {other} is not an object"),
                    ))
                }
            },
        }
        pushed += cross_product(buffer, &record, rest)?;
    }
    Ok(pushed)
}
