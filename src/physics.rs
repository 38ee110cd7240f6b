//! The physics residual definitions: the closed set of PDE models and their weak-form
//! term evaluators.
//!
//! Every model exposes its weak form through [`WeakForm`]: a pure evaluator that, at one
//! quadrature point, adds each term's contribution to the local spatial (`A`) and
//! time (`T`) matrices. The evaluators are plain algebra over the shape values, the
//! physical gradients, the interpolated fields and externally supplied coefficients;
//! they have no side effects and no internal state.

use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

use nalgebra::{DMatrixSlice, DMatrixSliceMut, Dynamic, MatrixSlice, Point2, Scalar, U2, Vector2};
use serde::{Deserialize, Serialize};

use crate::{Real, WeftError};

mod advection;
mod navier_stokes;

pub use advection::{Burgers, LinearAdvection, RotationalAdvection};
pub use navier_stokes::NavierStokes;

/// The scalar coefficients of the stabilized Navier-Stokes weak form.
///
/// These are supplied by the external solver configuration and are constant for the
/// duration of one assembly call. `one_over_rho` is stored separately rather than
/// derived so a configuration can choose its own rounding of the reciprocal.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilizationCoefficients<T> {
    /// Density.
    pub rho: T,
    /// Dynamic viscosity.
    pub mu: T,
    /// Reciprocal density.
    pub one_over_rho: T,
    /// Reference velocity magnitude.
    pub u_ref: T,
    /// Bulk-viscosity stabilization parameter.
    pub tau_bulk: T,
    /// PSPG stabilization parameter.
    pub tau_ps: T,
    /// SUPG stabilization parameter.
    pub tau_su: T,
}

impl<T: Real> StabilizationCoefficients<T> {
    /// All coefficients set to one. Primarily useful for cross-checking assemblies.
    pub fn unit() -> Self {
        Self {
            rho: T::one(),
            mu: T::one(),
            one_over_rho: T::one(),
            u_ref: T::one(),
            tau_bulk: T::one(),
            tau_ps: T::one(),
            tau_su: T::one(),
        }
    }

    /// Plain Galerkin coefficients: the given density and viscosity with every
    /// stabilization parameter set to zero.
    pub fn unstabilized(rho: T, mu: T) -> Self {
        Self {
            rho,
            mu,
            one_over_rho: T::one() / rho,
            u_ref: T::zero(),
            tau_bulk: T::zero(),
            tau_ps: T::zero(),
            tau_su: T::zero(),
        }
    }
}

/// Identifier for a physics model, without its coefficients.
///
/// This is the runtime-branch half of the dispatch: the set is closed, and parsing any
/// identifier outside it fails with
/// [`WeftError::UnknownPhysicsModel`](crate::WeftError::UnknownPhysicsModel).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhysicsKind {
    LinearAdvection,
    RotationalAdvection,
    Burgers,
    NavierStokes,
}

impl PhysicsKind {
    pub fn name(&self) -> &'static str {
        match self {
            PhysicsKind::LinearAdvection => "linear-advection",
            PhysicsKind::RotationalAdvection => "rotational-advection",
            PhysicsKind::Burgers => "burgers",
            PhysicsKind::NavierStokes => "navier-stokes",
        }
    }
}

impl Display for PhysicsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PhysicsKind {
    type Err = WeftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear-advection" => Ok(PhysicsKind::LinearAdvection),
            "rotational-advection" => Ok(PhysicsKind::RotationalAdvection),
            "burgers" => Ok(PhysicsKind::Burgers),
            "navier-stokes" => Ok(PhysicsKind::NavierStokes),
            _ => Err(WeftError::UnknownPhysicsModel(s.to_string())),
        }
    }
}

/// A physics model selection together with its coefficients.
///
/// Resolved once per `execute` call from the external simulation configuration and
/// immutable for the call's duration.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsModel<T> {
    /// Scalar advection with a constant advecting velocity.
    LinearAdvection { velocity: Vector2<T> },
    /// Scalar advection with the rotational velocity field `a(x, y) = (y, -x)`.
    RotationalAdvection,
    /// The 2D Burgers equation with flux `(u^2 / 2, u)`.
    Burgers,
    /// Incompressible Navier-Stokes with SUPG/PSPG/bulk-viscosity stabilization.
    NavierStokes(StabilizationCoefficients<T>),
}

/// The coefficient record an external simulation configuration supplies alongside a
/// physics identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct PhysicsConfig<T: Scalar> {
    /// The constant advecting velocity used by the linear advection model.
    pub advection_velocity: Vector2<T>,
    /// The Navier-Stokes coefficients.
    pub stabilization: StabilizationCoefficients<T>,
}

impl<T: Real> PhysicsModel<T> {
    /// Resolves a physics identifier string against a configuration record.
    ///
    /// Identifiers outside the closed model set fail with
    /// [`WeftError::UnknownPhysicsModel`](crate::WeftError::UnknownPhysicsModel).
    pub fn resolve(name: &str, config: &PhysicsConfig<T>) -> Result<Self, WeftError> {
        Ok(match name.parse::<PhysicsKind>()? {
            PhysicsKind::LinearAdvection => PhysicsModel::LinearAdvection {
                velocity: config.advection_velocity,
            },
            PhysicsKind::RotationalAdvection => PhysicsModel::RotationalAdvection,
            PhysicsKind::Burgers => PhysicsModel::Burgers,
            PhysicsKind::NavierStokes => PhysicsModel::NavierStokes(config.stabilization),
        })
    }

    pub fn kind(&self) -> PhysicsKind {
        match self {
            PhysicsModel::LinearAdvection { .. } => PhysicsKind::LinearAdvection,
            PhysicsModel::RotationalAdvection => PhysicsKind::RotationalAdvection,
            PhysicsModel::Burgers => PhysicsKind::Burgers,
            PhysicsModel::NavierStokes(_) => PhysicsKind::NavierStokes,
        }
    }

    /// The number of unknowns per node the model requires.
    pub fn solution_dim(&self) -> usize {
        match self {
            PhysicsModel::LinearAdvection { .. }
            | PhysicsModel::RotationalAdvection
            | PhysicsModel::Burgers => 1,
            PhysicsModel::NavierStokes(_) => 3,
        }
    }
}

/// Everything a weak-form evaluator may consume at one quadrature point.
#[derive(Debug)]
pub struct QuadraturePointData<'a, T>
where
    T: Real,
{
    /// Shape function values, one per element node.
    pub phi: &'a [T],
    /// Physical-space shape function gradients, one column per element node.
    pub grad_phi: MatrixSlice<'a, T, U2, Dynamic>,
    /// The physical coordinates of the quadrature point.
    pub x: Point2<T>,
    /// Nodal solution values for the element, `solution_dim` rows by `num_nodes`
    /// columns.
    pub u_local: DMatrixSlice<'a, T>,
    /// The integration scale factor: quadrature weight times Jacobian determinant.
    pub scale: T,
}

/// The weak-form term evaluators of one physics model.
///
/// Implementations accumulate into block-indexed local matrices whose dof ordering is
/// node-major: dof `(node, component) = node * solution_dim + component`.
pub trait WeakForm<T>
where
    T: Real,
{
    /// The [`PhysicsKind`] this weak form implements.
    fn physics_kind(&self) -> PhysicsKind;

    /// The number of unknowns per node this weak form couples.
    fn solution_dim(&self) -> usize;

    /// Adds this model's weak-form contributions at one quadrature point to the local
    /// spatial matrix `a` and time matrix `t`.
    fn accumulate(&self, data: &QuadraturePointData<T>, a: DMatrixSliceMut<T>, t: DMatrixSliceMut<T>);
}
