use crate::element::ElementType;
use crate::physics::PhysicsKind;
use thiserror::Error;

/// The errors surfaced by dispatch and local assembly.
///
/// All of these are fatal to the `execute` call that produced them: no partial local
/// matrices are emitted past the failure point, and nothing is retried. Local assembly is
/// deterministic and pure, so a retry would reproduce the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum WeftError {
    /// The physics model identifier is not in the closed set of known models.
    #[error("unknown physics model `{0}`")]
    UnknownPhysicsModel(String),

    /// The element type has no compiled kernel for the dispatching solver term.
    #[error("element type {0} is not supported by the compiled scheme set")]
    UnsupportedElementType(ElementType),

    /// An element with non-positive Jacobian determinant was encountered during
    /// quadrature evaluation.
    #[error("degenerate {element_type} element at index {index} (non-positive Jacobian determinant)")]
    DegenerateElement {
        element_type: ElementType,
        /// Index of the offending element within its region block.
        index: usize,
    },

    /// The per-node layout of the solution fields does not match what the physics
    /// model requires.
    #[error("solution storage provides {actual} dofs per node, but the physics model requires {expected}")]
    SolutionLayoutMismatch { expected: usize, actual: usize },

    /// A cached scheme was found under a key it does not match. Unreachable by
    /// construction; reported instead of silently re-dispatching.
    #[error("cached scheme registered for {expected:?} reports incompatible binding {actual:?}")]
    SchemeMismatch {
        expected: (ElementType, PhysicsKind),
        actual: (ElementType, PhysicsKind),
    },
}
