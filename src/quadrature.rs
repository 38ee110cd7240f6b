//! Quadrature rules for the reference domains of the supported element types.
//!
//! Conventions for the reference domains follow [`crate::element`]: the unit triangle
//! (0, 0), (1, 0), (0, 1) with measure 1/2, and the bi-unit square [-1, 1]^2 with
//! measure 4.

use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OPoint, Point2, Scalar, U2};
use num::Zero;
use numeric_literals::replace_float_literals;
use std::ops::{AddAssign, Mul};

use crate::element::ElementType;
use crate::{Real, WeftError};

/// A quadrature rule as a pair of weights and points.
pub type QuadraturePair<T, D> = (Vec<T>, Vec<OPoint<T, D>>);
pub type QuadraturePair2d<T> = QuadraturePair<T, U2>;

/// A quadrature rule consisting of weights and points over a `D`-dimensional
/// reference domain.
pub trait Quadrature<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T];
    fn points(&self) -> &[OPoint<T, D>];

    /// Approximates the integral of the given function over the reference domain using
    /// this quadrature rule.
    fn integrate<U, Function>(&self, f: Function) -> U
    where
        Function: Fn(&OPoint<T, D>) -> U,
        U: Zero + Mul<T, Output = U> + AddAssign<U>,
    {
        let mut integral = U::zero();
        for (w, p) in self.weights().iter().zip(self.points()) {
            integral += f(p) * w.clone();
        }
        integral
    }
}

impl<T, D> Quadrature<T, D> for QuadraturePair<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T] {
        &self.0
    }

    fn points(&self) -> &[OPoint<T, D>] {
        &self.1
    }
}

/// The one-point centroid rule on the unit triangle, exact for polynomials of total
/// degree 1.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn triangle_centroid<T: Real>() -> QuadraturePair2d<T> {
    (vec![0.5], vec![Point2::new(1.0 / 3.0, 1.0 / 3.0)])
}

/// The symmetric three-point rule on the unit triangle, exact for polynomials of total
/// degree 2.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn triangle_degree2<T: Real>() -> QuadraturePair2d<T> {
    let w = 1.0 / 6.0;
    let a = 1.0 / 6.0;
    let b = 2.0 / 3.0;
    (
        vec![w, w, w],
        vec![Point2::new(a, a), Point2::new(b, a), Point2::new(a, b)],
    )
}

/// The tensor-product 2x2 Gauss rule on [-1, 1]^2, exact for polynomials of degree 3 in
/// each variable.
pub fn quadrilateral_gauss2<T: Real>() -> QuadraturePair2d<T> {
    let p = T::from_f64(1.0 / f64::sqrt(3.0)).expect("Literal must fit in T");
    let one = T::one();
    (
        vec![one, one, one, one],
        vec![
            Point2::new(-p, -p),
            Point2::new(p, -p),
            Point2::new(p, p),
            Point2::new(-p, p),
        ],
    )
}

/// The default rule for an element type, sufficient to integrate the weak-form terms of
/// the supported physics models on affine elements.
///
/// Requesting a rule for an element type without a compiled 2D kernel is a configuration
/// error, never a silent fallback.
pub fn default_rule<T: Real>(element_type: ElementType) -> Result<QuadraturePair2d<T>, WeftError> {
    match element_type {
        ElementType::Tri3 => Ok(triangle_degree2()),
        ElementType::Quad4 => Ok(quadrilateral_gauss2()),
        ElementType::Tet4 => Err(WeftError::UnsupportedElementType(element_type)),
    }
}
