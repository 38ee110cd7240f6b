use nalgebra::{DMatrixSliceMut, Vector2};
use numeric_literals::replace_float_literals;

use crate::physics::{PhysicsKind, QuadraturePointData, StabilizationCoefficients, WeakForm};
use crate::Real;

/// Incompressible Navier-Stokes with SUPG/PSPG and bulk-viscosity stabilization.
///
/// The unknowns are `p[scalar], u[vector]`, three dofs per node ordered `p, u_x, u_y`.
/// The weak form is linearized about the current velocity field: the advecting velocity
/// at a quadrature point is the interpolated nodal velocity.
///
/// The assembled blocks are, per quadrature point with scale `w`:
///
/// - continuity + PSPG-weighted advection: `A(p, u_d)`
/// - PSPG pressure Laplacian: `A(p, p)`
/// - momentum diffusion + advection with SUPG test weighting: `A(u_d, u_d)`
/// - pressure gradient, standard and SUPG: `A(u_d, p)`
/// - bulk viscosity / second viscosity and the skew-symmetric part of advection,
///   coupling all velocity component pairs: `A(u_d, u_e)`
/// - PSPG and SUPG weighted time terms: `T(p, u_d)` and `T(u_d, u_d)`
#[derive(Debug, Clone, PartialEq)]
pub struct NavierStokes<T> {
    coefficients: StabilizationCoefficients<T>,
}

impl<T: Real> NavierStokes<T> {
    pub fn new(coefficients: StabilizationCoefficients<T>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &StabilizationCoefficients<T> {
        &self.coefficients
    }
}

impl<T: Real> WeakForm<T> for NavierStokes<T> {
    fn physics_kind(&self) -> PhysicsKind {
        PhysicsKind::NavierStokes
    }

    fn solution_dim(&self) -> usize {
        3
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn accumulate(&self, data: &QuadraturePointData<T>, mut a: DMatrixSliceMut<T>, mut t: DMatrixSliceMut<T>) {
        let n = data.phi.len();
        let c = &self.coefficients;
        let w = data.scale;

        // Advecting velocity, interpolated from the nodal values (rows 1..=2 of the
        // local solution)
        let mut u_adv = Vector2::zeros();
        for (k, &phi_k) in data.phi.iter().enumerate() {
            u_adv += Vector2::new(data.u_local[(1, k)], data.u_local[(2, k)]) * phi_k;
        }

        // ua[k] = u . grad phi_k, the advection operator applied to shape function k
        let ua: Vec<T> = (0..n)
            .map(|k| u_adv.dot(&data.grad_phi.column(k)))
            .collect();

        let visc = c.mu * c.one_over_rho;
        let bulk = c.tau_bulk + visc / 3.0;

        // Node-major dof layout: p at 3k, u_x at 3k + 1, u_y at 3k + 2
        let p = |k: usize| 3 * k;
        let u = |k: usize, d: usize| 3 * k + 1 + d;

        for i in 0..n {
            // SUPG- and PSPG-weighted test functions
            let supg_i = data.phi[i] + c.tau_su * ua[i];
            let pspg_i = data.phi[i] + 0.5 * c.tau_ps * ua[i];
            for j in 0..n {
                let grad_ij = data.grad_phi.column(i).dot(&data.grad_phi.column(j));

                // Continuity: PSPG pressure Laplacian
                a[(p(i), p(j))] += w * c.tau_ps * c.one_over_rho * grad_ij;

                for d in 0..2 {
                    let g_di = data.grad_phi[(d, i)];
                    let g_dj = data.grad_phi[(d, j)];

                    // Continuity: standard velocity divergence plus the PSPG-weighted
                    // advection term
                    a[(p(i), u(j, d))] += w * (pspg_i * g_dj + c.tau_ps * g_di * ua[j]);

                    // Momentum: diffusion plus advection with SUPG test weighting
                    a[(u(i, d), u(j, d))] += w * (visc * grad_ij + supg_i * ua[j]);

                    // Momentum: pressure gradient, standard and SUPG
                    a[(u(i, d), p(j))] += w * c.one_over_rho * supg_i * g_dj;

                    // Momentum: bulk/second viscosity and the skew-symmetric part of
                    // advection, coupling every velocity component pair
                    for e in 0..2 {
                        a[(u(i, d), u(j, e))] +=
                            w * (bulk * g_di + 0.5 * u_adv[d] * supg_i) * data.grad_phi[(e, j)];
                    }

                    // Time: PSPG-weighted continuity and SUPG-weighted momentum
                    t[(p(i), u(j, d))] += w * c.tau_ps * g_di * data.phi[j];
                    t[(u(i, d), u(j, d))] += w * supg_i * data.phi[j];
                }
            }
        }
    }
}
