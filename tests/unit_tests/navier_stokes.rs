use matrixcompare::assert_matrix_eq;
use nalgebra::{DMatrix, Matrix2x3, Matrix3, Vector2};
use weft::assembly::DenseGlobalAssembler;
use weft::fields::SolutionFields;
use weft::physics::{PhysicsModel, StabilizationCoefficients};
use weft::scheme::DomainTerm;

use crate::reference_tri_region;

/// Specialized closed-form assembly of the stabilized weak form on the reference
/// triangle with a constant advecting velocity.
///
/// On an affine P1 element the shape gradients and the advection operator are constant,
/// so every term reduces to the exact integrals `int phi_i = s / 3` and
/// `int phi_i phi_j = s (1 + delta_ij) / 12`. This mirrors the generic quadrature path
/// term by term and serves as its oracle.
fn specialized_reference_assembly(
    c: &StabilizationCoefficients<f64>,
    u_adv: Vector2<f64>,
) -> (DMatrix<f64>, DMatrix<f64>) {
    let s = 0.5;
    let g = Matrix2x3::new(-1.0, 1.0, 0.0, -1.0, 0.0, 1.0);
    let b = s / 3.0;
    let mass = |i: usize, j: usize| if i == j { s / 6.0 } else { s / 12.0 };

    let ua: Vec<f64> = (0..3).map(|k| u_adv.dot(&g.column(k))).collect();
    let visc = c.mu * c.one_over_rho;
    let bulk = c.tau_bulk + visc / 3.0;

    let p = |k: usize| 3 * k;
    let u = |k: usize, d: usize| 3 * k + 1 + d;

    let mut a = DMatrix::zeros(9, 9);
    let mut t = DMatrix::zeros(9, 9);
    for i in 0..3 {
        // Integrals of the SUPG- and PSPG-weighted test functions
        let supg_i = b + c.tau_su * ua[i] * s;
        let pspg_i = b + 0.5 * c.tau_ps * ua[i] * s;
        for j in 0..3 {
            let grad_ij = g.column(i).dot(&g.column(j));
            a[(p(i), p(j))] += c.tau_ps * c.one_over_rho * s * grad_ij;
            for d in 0..2 {
                a[(p(i), u(j, d))] += pspg_i * g[(d, j)] + c.tau_ps * g[(d, i)] * ua[j] * s;
                a[(u(i, d), u(j, d))] += visc * s * grad_ij + ua[j] * supg_i;
                a[(u(i, d), p(j))] += c.one_over_rho * supg_i * g[(d, j)];
                for e in 0..2 {
                    a[(u(i, d), u(j, e))] +=
                        (bulk * g[(d, i)] * s + 0.5 * u_adv[d] * supg_i) * g[(e, j)];
                }
                t[(p(i), u(j, d))] += c.tau_ps * g[(d, i)] * b;
                t[(u(i, d), u(j, d))] += mass(i, j) + c.tau_su * ua[i] * b;
            }
        }
    }
    (a, t)
}

fn assemble_reference_triangle(
    c: StabilizationCoefficients<f64>,
    u_adv: Vector2<f64>,
) -> (DMatrix<f64>, DMatrix<f64>) {
    let region = reference_tri_region();
    let mut fields = SolutionFields::new(region.num_vertices(), &[("p", 1), ("u", 2)]);
    fields.fill_scalar("p", 1.0);
    fields.fill_vector("u", u_adv);

    let term = DomainTerm::new("ns");
    let mut assembler = DenseGlobalAssembler::new(fields.num_dofs());
    term.execute(
        &region,
        &fields,
        &PhysicsModel::NavierStokes(c),
        &mut assembler,
    )
    .unwrap();
    assembler.into_matrices()
}

#[test]
fn generic_assembly_matches_specialized_closed_form() {
    let c = StabilizationCoefficients {
        rho: 1.2,
        mu: 0.3,
        one_over_rho: 1.0 / 1.2,
        u_ref: 1.0,
        tau_bulk: 0.1,
        tau_ps: 0.07,
        tau_su: 0.04,
    };
    let u_adv = Vector2::new(0.8, -0.3);

    let (a, t) = assemble_reference_triangle(c, u_adv);
    let (expected_a, expected_t) = specialized_reference_assembly(&c, u_adv);

    assert_matrix_eq!(a, expected_a, comp = abs, tol = 1e-12);
    assert_matrix_eq!(t, expected_t, comp = abs, tol = 1e-12);
}

#[test]
fn unit_coefficients_match_specialized_closed_form() {
    let c = StabilizationCoefficients::unit();
    let u_adv = Vector2::new(1.0, 1.0);

    let (a, t) = assemble_reference_triangle(c, u_adv);
    let (expected_a, expected_t) = specialized_reference_assembly(&c, u_adv);

    assert_matrix_eq!(a, expected_a, comp = abs, tol = 1e-12);
    assert_matrix_eq!(t, expected_t, comp = abs, tol = 1e-12);
}

#[test]
fn unstabilized_momentum_block_reduces_to_viscous_diffusion() {
    let rho = 2.0;
    let mu = 0.6;
    let c = StabilizationCoefficients::unstabilized(rho, mu);
    let (a, t) = assemble_reference_triangle(c, Vector2::zeros());

    let visc = mu / rho;
    let bulk = visc / 3.0;
    let s = 0.5;
    let g = Matrix2x3::new(-1.0, 1.0, 0.0, -1.0, 0.0, 1.0);

    // P1 stiffness matrix of the Laplacian on the reference triangle
    #[rustfmt::skip]
    let stiffness = 0.5 * Matrix3::new(
         2.0, -1.0, -1.0,
        -1.0,  1.0,  0.0,
        -1.0,  0.0,  1.0,
    );

    for d in 0..2 {
        // A(u_d, u_d) = visc * K + bulk * s * (row d of G)^T (row d of G)
        let block = DMatrix::from_fn(3, 3, |i, j| a[(3 * i + 1 + d, 3 * j + 1 + d)]);
        let expected = visc * stiffness + bulk * s * g.row(d).transpose() * g.row(d);
        assert_matrix_eq!(block, expected, comp = abs, tol = 1e-14);
    }

    // With every stabilization parameter at zero the pressure-pressure block and the
    // pressure rows of the time matrix vanish, and the momentum time blocks are the
    // consistent mass matrix.
    let mass = |i: usize, j: usize| if i == j { s / 6.0 } else { s / 12.0 };
    for i in 0..3 {
        for j in 0..3 {
            assert_eq!(a[(3 * i, 3 * j)], 0.0);
            for d in 0..2 {
                assert_eq!(t[(3 * i, 3 * j + 1 + d)], 0.0);
                let t_uu = t[(3 * i + 1 + d, 3 * j + 1 + d)];
                assert!((t_uu - mass(i, j)).abs() <= 1e-14);
            }
        }
    }

    // Continuity reduces to the plain divergence operator: A(p_i, u_j,d) = (s/3) g_dj
    for i in 0..3 {
        for j in 0..3 {
            for d in 0..2 {
                let divergence = a[(3 * i, 3 * j + 1 + d)];
                assert!((divergence - s / 3.0 * g[(d, j)]).abs() <= 1e-14);
            }
        }
    }
}
