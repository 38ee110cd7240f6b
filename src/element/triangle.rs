use nalgebra::{Matrix1x3, Matrix2, Matrix2x3, OPoint, Point2, Scalar, U3, Vector2};
use numeric_literals::replace_float_literals;

use crate::element::{ElementType, FiniteElement2d, FixedNodesReferenceElement};
use crate::Real;

/// A finite element representing linear shape functions on a triangle, in two dimensions.
///
/// The reference element is the unit triangle with corners (0, 0), (1, 0), (0, 1).
/// Positively (counter-clockwise) oriented physical triangles have a positive Jacobian
/// determinant equal to twice their area.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tri3Element<T>
where
    T: Scalar,
{
    vertices: [Point2<T>; 3],
}

impl<T> Tri3Element<T>
where
    T: Scalar,
{
    pub fn from_vertices(vertices: [Point2<T>; 3]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2<T>; 3] {
        &self.vertices
    }
}

impl<T> Tri3Element<T>
where
    T: Real,
{
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn reference() -> Self {
        Self::from_vertices([Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)])
    }
}

impl<T> FixedNodesReferenceElement<T> for Tri3Element<T>
where
    T: Real,
{
    type NodalDim = U3;

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis(&self, xi: &Point2<T>) -> Matrix1x3<T> {
        Matrix1x3::from_row_slice(&[
            1.0 - xi.x - xi.y,
            xi.x,
            xi.y
        ])
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn gradients(&self, _: &Point2<T>) -> Matrix2x3<T> {
        Matrix2x3::from_columns(&[
            Vector2::new(-1.0, -1.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0)
        ])
    }
}

impl<T> FiniteElement2d<T> for Tri3Element<T>
where
    T: Real,
{
    const ELEMENT_TYPE: ElementType = ElementType::Tri3;

    fn from_vertex_slice(vertices: &[Point2<T>]) -> Self {
        assert_eq!(vertices.len(), 3, "Tri3 element requires exactly 3 vertices");
        Self::from_vertices([vertices[0], vertices[1], vertices[2]])
    }

    #[allow(non_snake_case)]
    fn reference_jacobian(&self, xi: &Point2<T>) -> Matrix2<T> {
        let X: Matrix2x3<T> = Matrix2x3::from_fn(|i, j| self.vertices[j][i]);
        let G = self.gradients(xi);
        X * G.transpose()
    }

    #[allow(non_snake_case)]
    fn map_reference_coords(&self, xi: &Point2<T>) -> Point2<T> {
        let X: Matrix2x3<T> = Matrix2x3::from_fn(|i, j| self.vertices[j][i]);
        let N = self.evaluate_basis(xi);
        OPoint::from(&X * &N.transpose())
    }
}
