//! A weak-form element dispatch and local assembly engine.
//!
//! `weft` discretizes PDE weak forms over unstructured 2D meshes: for every mesh region it
//! pairs the runtime-selected physics model with the compile-time-specialized numerical
//! kernel of each element geometry present in the region, caches one kernel per pairing and
//! drives a quadrature-based accumulation of per-element stiffness/convection (`A`) and
//! mass/time (`T`) matrices. The local matrices are scattered into an external global system
//! through the [`GlobalAssembler`](crate::assembly::GlobalAssembler) boundary; sparse
//! assembly and linear solvers are outside the scope of this crate.
//!
//! The supported physics models form a closed set (linear and rotational advection, Burgers
//! and SUPG/PSPG-stabilized incompressible Navier-Stokes), as do the element geometries.
//! Dispatch over element types is a static enumeration; physics selection is a runtime
//! branch that rejects anything outside the closed set.

use nalgebra::RealField;

pub mod assembly;
pub mod backend;
pub mod element;
pub mod error;
pub mod fields;
pub mod mesh;
pub mod physics;
pub mod quadrature;
pub mod scheme;

pub use error::WeftError;

pub extern crate nalgebra;

/// A real scalar suitable for element computations.
///
/// Used as a trait alias to avoid repeating the `RealField + Copy` bound throughout
/// the crate.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}
