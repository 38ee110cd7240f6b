use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{DMatrix, Matrix2x3, Vector2};
use weft::assembly::DenseGlobalAssembler;
use weft::fields::SolutionFields;
use weft::physics::PhysicsModel;
use weft::scheme::DomainTerm;

use crate::{reference_tri_region, unit_square_quad_region, unit_square_tri_region};

/// Constant physical gradients of the P1 basis on the reference triangle.
fn p1_gradients() -> Matrix2x3<f64> {
    Matrix2x3::new(-1.0, 1.0, 0.0, -1.0, 0.0, 1.0)
}

/// `int phi_i phi_j` over the reference triangle, area `s`.
fn mass_entry(s: f64, i: usize, j: usize) -> f64 {
    if i == j {
        s / 6.0
    } else {
        s / 12.0
    }
}

#[test]
fn linear_advection_matches_closed_form_on_reference_triangle() {
    let region = reference_tri_region();
    let fields = SolutionFields::new(region.num_vertices(), &[("u", 1)]);
    let velocity = Vector2::new(2.0, -1.0);
    let physics = PhysicsModel::LinearAdvection { velocity };

    let term = DomainTerm::new("advection");
    let mut assembler = DenseGlobalAssembler::new(fields.num_dofs());
    term.execute(&region, &fields, &physics, &mut assembler)
        .unwrap();

    // A(i, j) = (a . grad phi_j) int phi_i = (a . grad phi_j) * s / 3
    let s = 0.5;
    let g = p1_gradients();
    let expected_a = DMatrix::from_fn(3, 3, |_, j| velocity.dot(&g.column(j)) * s / 3.0);
    let expected_t = DMatrix::from_fn(3, 3, |i, j| mass_entry(s, i, j));

    assert_matrix_eq!(assembler.a(), &expected_a, comp = abs, tol = 1e-14);
    assert_matrix_eq!(assembler.t(), &expected_t, comp = abs, tol = 1e-14);
}

#[test]
fn linear_advection_rows_sum_to_zero_on_unit_square() {
    let region = unit_square_tri_region();
    let fields = SolutionFields::new(region.num_vertices(), &[("u", 1)]);
    let physics = PhysicsModel::LinearAdvection {
        velocity: Vector2::new(1.0, 3.0),
    };

    let term = DomainTerm::new("advection");
    let mut assembler = DenseGlobalAssembler::new(fields.num_dofs());
    term.execute(&region, &fields, &physics, &mut assembler)
        .unwrap();

    // sum_j A(i, j) = int phi_i (a . grad 1) = 0, and the mass entries sum to the area
    for i in 0..fields.num_dofs() {
        assert_scalar_eq!(assembler.a().row(i).sum(), 0.0, comp = abs, tol = 1e-14);
    }
    assert_scalar_eq!(assembler.t().sum(), 1.0, comp = abs, tol = 1e-14);
}

#[test]
fn quad4_advection_reproduces_the_scalar_conservation_identities() {
    let region = unit_square_quad_region();
    let fields = SolutionFields::new(region.num_vertices(), &[("u", 1)]);
    let physics = PhysicsModel::LinearAdvection {
        velocity: Vector2::new(-2.0, 0.5),
    };

    let term = DomainTerm::new("advection");
    let mut assembler = DenseGlobalAssembler::new(fields.num_dofs());
    term.execute(&region, &fields, &physics, &mut assembler)
        .unwrap();

    // Same identities as on the triangle mesh: zero row sums of A, total mass = area
    for i in 0..fields.num_dofs() {
        assert_scalar_eq!(assembler.a().row(i).sum(), 0.0, comp = abs, tol = 1e-14);
    }
    assert_scalar_eq!(assembler.t().sum(), 1.0, comp = abs, tol = 1e-14);
}

#[test]
fn rotational_advection_matches_closed_form_on_reference_triangle() {
    let region = reference_tri_region();
    let fields = SolutionFields::new(region.num_vertices(), &[("u", 1)]);

    let term = DomainTerm::new("advection");
    let mut assembler = DenseGlobalAssembler::new(fields.num_dofs());
    term.execute(
        &region,
        &fields,
        &PhysicsModel::RotationalAdvection,
        &mut assembler,
    )
    .unwrap();

    // On the reference triangle x = phi_1 and y = phi_2, so with a = (y, -x):
    // A(i, j) = g_xj int phi_i phi_2 - g_yj int phi_i phi_1
    let s = 0.5;
    let g = p1_gradients();
    let expected_a = DMatrix::from_fn(3, 3, |i, j| {
        g[(0, j)] * mass_entry(s, i, 2) - g[(1, j)] * mass_entry(s, i, 1)
    });
    assert_matrix_eq!(assembler.a(), &expected_a, comp = abs, tol = 1e-14);
}

#[test]
fn burgers_linearizes_to_constant_advection_on_a_constant_state() {
    let region = unit_square_tri_region();
    let u0 = 3.0;
    let mut burgers_fields = SolutionFields::new(region.num_vertices(), &[("u", 1)]);
    burgers_fields.fill_scalar("u", u0);

    let burgers_term = DomainTerm::new("burgers");
    let mut burgers_assembler = DenseGlobalAssembler::new(burgers_fields.num_dofs());
    burgers_term
        .execute(
            &region,
            &burgers_fields,
            &PhysicsModel::Burgers,
            &mut burgers_assembler,
        )
        .unwrap();

    // The Burgers flux (u^2/2, u) linearizes to the advection speed (u, 1)
    let linear_fields = SolutionFields::new(region.num_vertices(), &[("u", 1)]);
    let linear_term = DomainTerm::new("advection");
    let mut linear_assembler = DenseGlobalAssembler::new(linear_fields.num_dofs());
    linear_term
        .execute(
            &region,
            &linear_fields,
            &PhysicsModel::LinearAdvection {
                velocity: Vector2::new(u0, 1.0),
            },
            &mut linear_assembler,
        )
        .unwrap();

    assert_matrix_eq!(
        burgers_assembler.a(),
        linear_assembler.a(),
        comp = abs,
        tol = 1e-13
    );
    assert_matrix_eq!(
        burgers_assembler.t(),
        linear_assembler.t(),
        comp = abs,
        tol = 1e-15
    );
}
