//! The shape-function catalog: element types, reference elements and geometry mappings.

use std::fmt;
use std::fmt::Display;

use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, Matrix2, OMatrix, Point2, U1, U2};

use crate::Real;

mod quadrilateral;
mod triangle;

pub use quadrilateral::Quad4Element;
pub use triangle::Tri3Element;

/// Identifier for the geometric shape and interpolation order of a mesh element.
///
/// This is a closed enumeration known at build time. [`ElementType::ALL`] is the set the
/// dispatcher walks when it enumerates the kernels applicable to a region; element types
/// without a compiled 2D kernel (currently [`ElementType::Tet4`]) are rejected with
/// [`WeftError::UnsupportedElementType`](crate::WeftError::UnsupportedElementType) when
/// dispatched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementType {
    /// Linear (3-node) triangle.
    Tri3,
    /// Bilinear (4-node) quadrilateral.
    Quad4,
    /// Linear (4-node) tetrahedron.
    Tet4,
}

impl ElementType {
    /// Every element type known to the build, in dispatch order.
    pub const ALL: [ElementType; 3] = [ElementType::Tri3, ElementType::Quad4, ElementType::Tet4];

    /// The number of nodes in an element of this type.
    pub fn num_nodes(&self) -> usize {
        match self {
            ElementType::Tri3 => 3,
            ElementType::Quad4 => 4,
            ElementType::Tet4 => 4,
        }
    }

    /// The dimension of the reference domain of this element type.
    pub fn reference_dim(&self) -> usize {
        match self {
            ElementType::Tri3 | ElementType::Quad4 => 2,
            ElementType::Tet4 => 3,
        }
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Tri3 => "Tri3",
            ElementType::Quad4 => "Quad4",
            ElementType::Tet4 => "Tet4",
        };
        write!(f, "{name}")
    }
}

/// A reference element with a number of nodes fixed at compile time.
///
/// Provides the shape functions and their gradients with respect to reference coordinates.
/// The fixed nodal dimension lets the per-element quadrature loop work entirely with
/// statically sized matrices.
pub trait FixedNodesReferenceElement<T>
where
    T: Real,
    DefaultAllocator: Allocator<T, U1, Self::NodalDim> + Allocator<T, U2, Self::NodalDim>,
{
    type NodalDim: DimName;

    /// Evaluates each shape function at the given reference coordinates. The result is a
    /// row vector where each entry is the value of the corresponding shape function.
    fn evaluate_basis(&self, xi: &Point2<T>) -> OMatrix<T, U1, Self::NodalDim>;

    /// Computes the matrix whose columns are the reference-space gradients of each shape
    /// function at the given reference coordinates.
    fn gradients(&self, xi: &Point2<T>) -> OMatrix<T, U2, Self::NodalDim>;
}

/// A volumetric two-dimensional finite element, i.e. an element whose geometry dimension
/// coincides with its reference dimension.
pub trait FiniteElement2d<T>: FixedNodesReferenceElement<T>
where
    T: Real,
    DefaultAllocator: Allocator<T, U1, Self::NodalDim> + Allocator<T, U2, Self::NodalDim>,
{
    /// The [`ElementType`] tag this element implements.
    const ELEMENT_TYPE: ElementType;

    /// Constructs the element from vertices gathered off a region.
    ///
    /// # Panics
    ///
    /// Panics if the slice does not hold exactly `NodalDim` vertices.
    fn from_vertex_slice(vertices: &[Point2<T>]) -> Self;

    /// Computes the Jacobian of the map from the reference element to this element at the
    /// given reference coordinates.
    fn reference_jacobian(&self, xi: &Point2<T>) -> Matrix2<T>;

    /// Maps reference coordinates to physical coordinates in the element.
    fn map_reference_coords(&self, xi: &Point2<T>) -> Point2<T>;
}
