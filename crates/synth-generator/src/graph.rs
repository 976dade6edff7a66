//! Dependency graph between samplers and the evaluation order it implies.

use crate::constraint::Constraint;
use crate::field::FieldSampler;
use std::collections::{HashMap, VecDeque};
use synth_core::SchemaError;
use tracing::debug;

/// Edges point from a prerequisite sampler to the samplers constrained by it.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependents: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl DependencyGraph {
    /// Resolve every constraint against the named samplers and record edges.
    ///
    /// Each constraint gets its participant indices and is attached to its
    /// dependent sampler.
    pub fn build(
        samplers: &mut [FieldSampler],
        constraints: &mut [Constraint],
        name_map: &HashMap<String, usize>,
    ) -> Result<Self, SchemaError> {
        let mut graph = Self {
            dependents: vec![Vec::new(); samplers.len()],
            in_degree: vec![0; samplers.len()],
        };

        for (index, constraint) in constraints.iter_mut().enumerate() {
            let resolve = |field: &str| {
                name_map
                    .get(field)
                    .copied()
                    .ok_or_else(|| SchemaError::UndefinedField {
                        constraint: constraint.kind().class_name().to_string(),
                        field: field.to_string(),
                    })
            };
            let dependent = resolve(constraint.att1())?;
            let prerequisite = resolve(constraint.att2())?;

            let narrowing = constraint.kind().narrowing();
            if !samplers[dependent].supports(narrowing) {
                return Err(SchemaError::UnsupportedConstraint {
                    field: constraint.att1().to_string(),
                    class: samplers[dependent].class_name().to_string(),
                    constraint: constraint.kind().class_name().to_string(),
                });
            }

            graph.add_edge(prerequisite, dependent);
            constraint.set_participants(dependent, prerequisite);
            samplers[dependent].add_constraint(index);
            debug!("Attached constraint {}", constraint.describe());
        }

        Ok(graph)
    }

    fn add_edge(&mut self, from: usize, to: usize) {
        self.dependents[from].push(to);
        self.in_degree[to] += 1;
    }

    #[cfg(test)]
    fn dependents(&self, node: usize) -> &[usize] {
        &self.dependents[node]
    }

    /// Kahn's algorithm; ready samplers leave the queue in schema order.
    ///
    /// Any sampler left unresolved sits on a cycle (or downstream of one),
    /// which is reported with the names involved.
    pub fn topological_order(&self, samplers: &[FieldSampler]) -> Result<Vec<usize>, SchemaError> {
        let mut in_degree = self.in_degree.clone();
        let mut queue: VecDeque<usize> = (0..in_degree.len())
            .filter(|&node| in_degree[node] == 0)
            .collect();
        let mut order = Vec::with_capacity(in_degree.len());

        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &next in &self.dependents[node] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() < in_degree.len() {
            let fields = (0..in_degree.len())
                .filter(|&node| in_degree[node] > 0)
                .map(|node| samplers[node].label())
                .collect();
            return Err(SchemaError::DependencyCycle { fields });
        }

        Ok(order)
    }
}
