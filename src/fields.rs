//! Nodal solution storage, the read-only field input to the assembly engine.
//!
//! [`SolutionFields`] stores the current values of every named unknown field referenced
//! by the active physics model, interleaved per node. The per-node layout is the
//! concatenation of the declared fields in order, e.g. `p[scalar], u[vector]` gives
//! three dofs per node ordered `p, u_x, u_y`.

use nalgebra::{DMatrix, Scalar, Vector2};

use crate::Real;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    name: String,
    components: usize,
    offset: usize,
}

/// Per-node storage of the named unknown fields of a simulation.
#[derive(Debug, Clone)]
pub struct SolutionFields<T>
where
    T: Scalar,
{
    fields: Vec<Field>,
    solution_dim: usize,
    num_nodes: usize,
    values: Vec<T>,
}

impl<T> SolutionFields<T>
where
    T: Real,
{
    /// Creates zero-initialized storage for the given named fields, each with the given
    /// number of components.
    pub fn new(num_nodes: usize, fields: &[(&str, usize)]) -> Self {
        let mut offset = 0;
        let fields = fields
            .iter()
            .map(|&(name, components)| {
                assert!(components > 0, "field must have at least one component");
                let field = Field {
                    name: name.to_string(),
                    components,
                    offset,
                };
                offset += components;
                field
            })
            .collect();
        Self {
            fields,
            solution_dim: offset,
            num_nodes,
            values: vec![T::zero(); offset * num_nodes],
        }
    }

    /// The total number of dofs per node.
    pub fn solution_dim(&self) -> usize {
        self.solution_dim
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// The number of global dofs, i.e. the dimension of the square global system the
    /// local matrices scatter into.
    pub fn num_dofs(&self) -> usize {
        self.solution_dim * self.num_nodes
    }

    fn field_offset(&self, name: &str) -> usize {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .unwrap_or_else(|| panic!("no field named `{name}`"))
            .offset
    }

    /// Sets a scalar field value at the given node.
    pub fn set_scalar(&mut self, name: &str, node: usize, value: T) {
        let offset = self.field_offset(name);
        self.values[node * self.solution_dim + offset] = value;
    }

    /// Sets a two-component vector field value at the given node.
    pub fn set_vector(&mut self, name: &str, node: usize, value: Vector2<T>) {
        let offset = self.field_offset(name);
        let base = node * self.solution_dim + offset;
        self.values[base] = value.x;
        self.values[base + 1] = value.y;
    }

    /// Sets a scalar field to a uniform value at every node.
    pub fn fill_scalar(&mut self, name: &str, value: T) {
        for node in 0..self.num_nodes {
            self.set_scalar(name, node, value);
        }
    }

    /// Sets a vector field to a uniform value at every node.
    pub fn fill_vector(&mut self, name: &str, value: Vector2<T>) {
        for node in 0..self.num_nodes {
            self.set_vector(name, node, value);
        }
    }

    /// Gathers the nodal values for one element into a `solution_dim x num_nodes`
    /// matrix, one column per element node.
    pub fn gather_element(&self, nodes: &[usize], output: &mut DMatrix<T>) {
        let s = self.solution_dim;
        output.resize_mut(s, nodes.len(), T::zero());
        for (local, &node) in nodes.iter().enumerate() {
            for comp in 0..s {
                output[(comp, local)] = self.values[node * s + comp];
            }
        }
    }
}
