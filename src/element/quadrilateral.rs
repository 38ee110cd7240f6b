use nalgebra::{Matrix1x4, Matrix2, Matrix2x4, OPoint, Point2, Scalar, U4, Vector2};
use numeric_literals::replace_float_literals;

use crate::element::{ElementType, FiniteElement2d, FixedNodesReferenceElement};
use crate::Real;

/// A finite element representing bilinear shape functions on a quadrilateral, in two
/// dimensions.
///
/// The reference element is the square [-1, 1]^2, with nodes ordered counter-clockwise
/// starting from (-1, -1).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quad4Element<T>
where
    T: Scalar,
{
    vertices: [Point2<T>; 4],
}

impl<T> Quad4Element<T>
where
    T: Scalar,
{
    pub fn from_vertices(vertices: [Point2<T>; 4]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2<T>; 4] {
        &self.vertices
    }
}

impl<T> Quad4Element<T>
where
    T: Real,
{
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn reference() -> Self {
        Self::from_vertices([
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ])
    }
}

impl<T> FixedNodesReferenceElement<T> for Quad4Element<T>
where
    T: Real,
{
    type NodalDim = U4;

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis(&self, xi: &Point2<T>) -> Matrix1x4<T> {
        Matrix1x4::from_row_slice(&[
            0.25 * (1.0 - xi.x) * (1.0 - xi.y),
            0.25 * (1.0 + xi.x) * (1.0 - xi.y),
            0.25 * (1.0 + xi.x) * (1.0 + xi.y),
            0.25 * (1.0 - xi.x) * (1.0 + xi.y),
        ])
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn gradients(&self, xi: &Point2<T>) -> Matrix2x4<T> {
        Matrix2x4::from_columns(&[
            Vector2::new(-0.25 * (1.0 - xi.y), -0.25 * (1.0 - xi.x)),
            Vector2::new( 0.25 * (1.0 - xi.y), -0.25 * (1.0 + xi.x)),
            Vector2::new( 0.25 * (1.0 + xi.y),  0.25 * (1.0 + xi.x)),
            Vector2::new(-0.25 * (1.0 + xi.y),  0.25 * (1.0 - xi.x)),
        ])
    }
}

impl<T> FiniteElement2d<T> for Quad4Element<T>
where
    T: Real,
{
    const ELEMENT_TYPE: ElementType = ElementType::Quad4;

    fn from_vertex_slice(vertices: &[Point2<T>]) -> Self {
        assert_eq!(vertices.len(), 4, "Quad4 element requires exactly 4 vertices");
        Self::from_vertices([vertices[0], vertices[1], vertices[2], vertices[3]])
    }

    #[allow(non_snake_case)]
    fn reference_jacobian(&self, xi: &Point2<T>) -> Matrix2<T> {
        let X: Matrix2x4<T> = Matrix2x4::from_fn(|i, j| self.vertices[j][i]);
        let G = self.gradients(xi);
        X * G.transpose()
    }

    #[allow(non_snake_case)]
    fn map_reference_coords(&self, xi: &Point2<T>) -> Point2<T> {
        let X: Matrix2x4<T> = Matrix2x4::from_fn(|i, j| self.vertices[j][i]);
        let N = self.evaluate_basis(xi);
        OPoint::from(&X * &N.transpose())
    }
}
