use std::marker::PhantomData;
use std::ops::Range;

use itertools::izip;
use nalgebra::allocator::Allocator;
use nalgebra::{DMatrixSlice, DMatrixSliceMut, DefaultAllocator, DimName, Dynamic, MatrixSlice, U1, U2};

use crate::assembly::GlobalAssembler;
use crate::backend::{ExecutionBackend, LocalEvaluation};
use crate::element::{ElementType, FiniteElement2d};
use crate::fields::SolutionFields;
use crate::mesh::{ElementBlock, Region};
use crate::physics::{PhysicsKind, QuadraturePointData, WeakForm};
use crate::quadrature::QuadraturePair2d;
use crate::scheme::Scheme;
use crate::{Real, WeftError};

/// The local assembly kernel for one (element type, physics model) pair.
///
/// A kernel is fully specialized at compile time: the element type fixes the shape
/// functions, the quadrature point count and all matrix dimensions, and the physics
/// model fixes the weak-form terms. The dispatcher instantiates one kernel per pair
/// present in a region and rebinds it with [`Scheme::set_elements`] before every
/// execution.
///
/// Per element, [`Scheme::execute`] zero-initializes the local `(A, T)` pair, gathers
/// nodal coordinates and solution values, accumulates every weak-form term over the
/// quadrature rule weighted by `w * det J`, and emits the result to the global-assembly
/// collaborator keyed by the element's global dofs. A non-positive Jacobian determinant
/// aborts the loop with [`WeftError::DegenerateElement`].
#[derive(Debug, Clone)]
pub struct ElementKernel<T, E, W>
where
    T: Real,
{
    physics: W,
    quadrature: QuadraturePair2d<T>,
    bound: Range<usize>,
    marker: PhantomData<fn() -> E>,
}

impl<T, E, W> ElementKernel<T, E, W>
where
    T: Real,
    E: FiniteElement2d<T>,
    W: WeakForm<T>,
    DefaultAllocator: Allocator<T, U1, E::NodalDim> + Allocator<T, U2, E::NodalDim>,
{
    pub fn new(physics: W, quadrature: QuadraturePair2d<T>) -> Self {
        Self {
            physics,
            quadrature,
            bound: 0..0,
            marker: PhantomData,
        }
    }

    pub fn physics(&self) -> &W {
        &self.physics
    }

    fn evaluate_element(
        &self,
        index: usize,
        block: &ElementBlock,
        region: &Region<T>,
        fields: &SolutionFields<T>,
        out: &mut LocalEvaluation<T>,
    ) -> Result<(), WeftError> {
        let n = E::NodalDim::dim();
        let s = self.physics.solution_dim();
        let nodes = block.element_nodes(index);

        out.vertices.clear();
        out.vertices
            .extend(nodes.iter().map(|&node| region.vertices()[node]));
        let element = E::from_vertex_slice(&out.vertices);

        fields.gather_element(nodes, &mut out.u_local);

        let size = s * n;
        out.a.resize_mut(size, size, T::zero());
        out.t.resize_mut(size, size, T::zero());
        out.a.fill(T::zero());
        out.t.fill(T::zero());

        let (weights, points) = &self.quadrature;
        for (w, xi) in izip!(weights, points) {
            let jacobian = element.reference_jacobian(xi);
            let det = jacobian.determinant();
            // Inverted and collapsed elements are fatal, not skipped
            if det <= T::zero() {
                return Err(WeftError::DegenerateElement {
                    element_type: E::ELEMENT_TYPE,
                    index,
                });
            }
            let jacobian_inv_t = jacobian
                .try_inverse()
                .ok_or(WeftError::DegenerateElement {
                    element_type: E::ELEMENT_TYPE,
                    index,
                })?
                .transpose();

            let phi = element.evaluate_basis(xi);
            // Transform reference gradients to gradients with respect to physical coords
            let grad_phys = jacobian_inv_t * element.gradients(xi);

            let data = QuadraturePointData {
                phi: phi.as_slice(),
                grad_phi: MatrixSlice::from_slice_generic(grad_phys.as_slice(), U2::name(), Dynamic::new(n)),
                x: element.map_reference_coords(xi),
                u_local: DMatrixSlice::from(&out.u_local),
                scale: *w * det,
            };
            self.physics.accumulate(
                &data,
                DMatrixSliceMut::from(&mut out.a),
                DMatrixSliceMut::from(&mut out.t),
            );
        }

        out.dofs.clear();
        for &node in nodes {
            for comp in 0..s {
                out.dofs.push(node * s + comp);
            }
        }
        Ok(())
    }
}

impl<T, E, W, B> Scheme<T, B> for ElementKernel<T, E, W>
where
    T: Real + Send + Sync,
    E: FiniteElement2d<T> + Send + Sync + 'static,
    W: WeakForm<T> + Send + Sync + 'static,
    B: ExecutionBackend,
    DefaultAllocator: Allocator<T, U1, E::NodalDim> + Allocator<T, U2, E::NodalDim>,
{
    fn element_type(&self) -> ElementType {
        E::ELEMENT_TYPE
    }

    fn physics_kind(&self) -> PhysicsKind {
        self.physics.physics_kind()
    }

    fn set_elements(&mut self, elements: Range<usize>) {
        self.bound = elements;
    }

    fn execute(
        &mut self,
        region: &Region<T>,
        fields: &SolutionFields<T>,
        backend: &B,
        assembler: &mut dyn GlobalAssembler<T>,
    ) -> Result<(), WeftError> {
        let expected = self.physics.solution_dim();
        if fields.solution_dim() != expected {
            return Err(WeftError::SolutionLayoutMismatch {
                expected,
                actual: fields.solution_dim(),
            });
        }

        let Some(block) = region.block(E::ELEMENT_TYPE) else {
            return Ok(());
        };
        assert!(
            self.bound.end <= block.len(),
            "bound element range exceeds region block"
        );

        backend.assemble_elements(
            self.bound.clone(),
            |index, local| self.evaluate_element(index, block, region, fields, local),
            &mut |local: &LocalEvaluation<T>| {
                assembler.add_element_matrices(
                    &local.dofs,
                    DMatrixSlice::from(&local.a),
                    DMatrixSlice::from(&local.t),
                );
            },
        )
    }
}
