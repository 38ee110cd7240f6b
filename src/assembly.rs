//! Local element assembly: the quadrature-driven kernels and the scatter boundary.

mod global;
mod local;

pub use global::{DenseGlobalAssembler, GlobalAssembler};
pub use local::ElementKernel;
