use nalgebra::{DMatrixSliceMut, Vector2};

use crate::physics::{PhysicsKind, QuadraturePointData, WeakForm};
use crate::Real;

/// Galerkin weak form of scalar advection: `A(i, j) = phi_i (a . grad phi_j)` and the
/// consistent mass `T(i, j) = phi_i phi_j`, both integrated over the element.
fn accumulate_scalar_advection<T: Real>(
    velocity: &Vector2<T>,
    data: &QuadraturePointData<T>,
    mut a: DMatrixSliceMut<T>,
    mut t: DMatrixSliceMut<T>,
) {
    let n = data.phi.len();
    for i in 0..n {
        for j in 0..n {
            let advect = velocity.dot(&data.grad_phi.column(j));
            a[(i, j)] += data.scale * data.phi[i] * advect;
            t[(i, j)] += data.scale * data.phi[i] * data.phi[j];
        }
    }
}

/// Scalar advection with a constant advecting velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearAdvection<T> {
    velocity: Vector2<T>,
}

impl<T: Real> LinearAdvection<T> {
    pub fn new(velocity: Vector2<T>) -> Self {
        Self { velocity }
    }
}

impl<T: Real> WeakForm<T> for LinearAdvection<T> {
    fn physics_kind(&self) -> PhysicsKind {
        PhysicsKind::LinearAdvection
    }

    fn solution_dim(&self) -> usize {
        1
    }

    fn accumulate(&self, data: &QuadraturePointData<T>, a: DMatrixSliceMut<T>, t: DMatrixSliceMut<T>) {
        accumulate_scalar_advection(&self.velocity, data, a, t);
    }
}

/// Scalar advection with the solid-body rotation field `a(x, y) = (y, -x)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationalAdvection;

impl<T: Real> WeakForm<T> for RotationalAdvection {
    fn physics_kind(&self) -> PhysicsKind {
        PhysicsKind::RotationalAdvection
    }

    fn solution_dim(&self) -> usize {
        1
    }

    fn accumulate(&self, data: &QuadraturePointData<T>, a: DMatrixSliceMut<T>, t: DMatrixSliceMut<T>) {
        let velocity = Vector2::new(data.x.y, -data.x.x);
        accumulate_scalar_advection(&velocity, data, a, t);
    }
}

/// The 2D Burgers equation with flux `(u^2 / 2, u)`, linearized about the current
/// solution: the quasi-linear advection speed is `a(u) = (u, 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Burgers;

impl<T: Real> WeakForm<T> for Burgers {
    fn physics_kind(&self) -> PhysicsKind {
        PhysicsKind::Burgers
    }

    fn solution_dim(&self) -> usize {
        1
    }

    fn accumulate(&self, data: &QuadraturePointData<T>, a: DMatrixSliceMut<T>, t: DMatrixSliceMut<T>) {
        // Interpolate the scalar unknown at the quadrature point
        let mut u_h = T::zero();
        for (k, &phi_k) in data.phi.iter().enumerate() {
            u_h += phi_k * data.u_local[(0, k)];
        }
        let velocity = Vector2::new(u_h, T::one());
        accumulate_scalar_advection(&velocity, data, a, t);
    }
}
