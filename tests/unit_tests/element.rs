use itertools::izip;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{Matrix2, Point2};
use weft::element::{
    ElementType, FiniteElement2d, FixedNodesReferenceElement, Quad4Element, Tri3Element,
};
use weft::quadrature::{self, Quadrature};

#[test]
fn tri3_basis_is_nodal_at_the_reference_vertices() {
    let element = Tri3Element::<f64>::reference();
    for (node, vertex) in element.vertices().iter().enumerate() {
        let phi = element.evaluate_basis(vertex);
        for j in 0..3 {
            let expected = if j == node { 1.0 } else { 0.0 };
            assert_scalar_eq!(phi[j], expected, comp = abs, tol = 1e-15);
        }
    }
}

#[test]
fn tri3_basis_partition_of_unity() {
    let element = Tri3Element::<f64>::reference();
    for xi in [
        Point2::new(0.25, 0.25),
        Point2::new(0.1, 0.7),
        Point2::new(1.0 / 3.0, 1.0 / 3.0),
    ] {
        assert_scalar_eq!(element.evaluate_basis(&xi).sum(), 1.0, comp = abs, tol = 1e-15);
        // Gradients of a partition of unity sum to zero
        let gradient_sum = element.gradients(&xi).column_sum();
        assert_scalar_eq!(gradient_sum.norm(), 0.0, comp = abs, tol = 1e-15);
    }
}

#[test]
fn quad4_basis_is_nodal_at_the_reference_vertices() {
    let element = Quad4Element::<f64>::reference();
    for (node, vertex) in element.vertices().iter().enumerate() {
        let phi = element.evaluate_basis(vertex);
        for j in 0..4 {
            let expected = if j == node { 1.0 } else { 0.0 };
            assert_scalar_eq!(phi[j], expected, comp = abs, tol = 1e-15);
        }
    }
}

#[test]
fn quad4_basis_partition_of_unity() {
    let element = Quad4Element::<f64>::reference();
    for xi in [
        Point2::new(0.0, 0.0),
        Point2::new(-0.3, 0.8),
        Point2::new(0.5, -0.5),
    ] {
        assert_scalar_eq!(element.evaluate_basis(&xi).sum(), 1.0, comp = abs, tol = 1e-15);
        let gradient_sum = element.gradients(&xi).column_sum();
        assert_scalar_eq!(gradient_sum.norm(), 0.0, comp = abs, tol = 1e-15);
    }
}

#[test]
fn reference_elements_have_identity_jacobian() {
    let tri = Tri3Element::<f64>::reference();
    let quad = Quad4Element::<f64>::reference();
    let identity = Matrix2::identity();
    assert_matrix_eq!(
        tri.reference_jacobian(&Point2::new(0.25, 0.25)),
        identity,
        comp = abs,
        tol = 1e-15
    );
    assert_matrix_eq!(
        quad.reference_jacobian(&Point2::new(-0.4, 0.6)),
        identity,
        comp = abs,
        tol = 1e-15
    );
}

#[test]
fn tri3_jacobian_determinant_is_twice_the_area() {
    let element = Tri3Element::from_vertex_slice(&[
        Point2::new(1.0, 1.0),
        Point2::new(4.0, 1.0),
        Point2::new(1.0, 3.0),
    ]);
    // Area 3, affine map so the determinant is constant
    let det = element
        .reference_jacobian(&Point2::new(0.2, 0.3))
        .determinant();
    assert_scalar_eq!(det, 6.0, comp = abs, tol = 1e-14);
}

#[test]
fn quad4_measure_through_quadrature() {
    let element = Quad4Element::from_vertex_slice(&[
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 1.0),
        Point2::new(0.0, 1.0),
    ]);
    let rule = quadrature::quadrilateral_gauss2::<f64>();
    let mut measure = 0.0;
    for (w, xi) in izip!(rule.weights(), rule.points()) {
        measure += w * element.reference_jacobian(xi).determinant();
    }
    assert_scalar_eq!(measure, 2.0, comp = abs, tol = 1e-14);
}

#[test]
fn quad4_maps_the_reference_center_to_the_centroid() {
    let element = Quad4Element::from_vertex_slice(&[
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 1.0),
        Point2::new(0.0, 1.0),
    ]);
    let x = element.map_reference_coords(&Point2::new(0.0, 0.0));
    assert_scalar_eq!(x.x, 1.0, comp = abs, tol = 1e-15);
    assert_scalar_eq!(x.y, 0.5, comp = abs, tol = 1e-15);
}

#[test]
fn element_type_node_counts() {
    assert_eq!(ElementType::Tri3.num_nodes(), 3);
    assert_eq!(ElementType::Quad4.num_nodes(), 4);
    assert_eq!(ElementType::Tet4.num_nodes(), 4);
}
