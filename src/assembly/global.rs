use nalgebra::{DMatrix, DMatrixSlice, Scalar};

use crate::Real;

/// The scatter boundary towards the external global-assembly collaborator.
///
/// For every processed element the engine hands over the local `(A, T)` pair together
/// with the element's global dof indices. The contract is additive: entry `(i, j)` of
/// each local matrix is added to global entry `(dofs[i], dofs[j])`. Synchronizing
/// concurrent additive writes is the collaborator's responsibility; the engine only
/// guarantees that it calls this method in element index order per scheme.
pub trait GlobalAssembler<T>
where
    T: Scalar,
{
    fn add_element_matrices(&mut self, dofs: &[usize], a: DMatrixSlice<T>, t: DMatrixSlice<T>);
}

/// A dense reference implementation of the scatter contract.
///
/// Real simulations scatter into a sparse system owned by the linear-algebra backend;
/// this implementation exists as the in-crate collaborator for tests and small
/// verification problems.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseGlobalAssembler<T>
where
    T: Scalar,
{
    a: DMatrix<T>,
    t: DMatrix<T>,
}

impl<T: Real> DenseGlobalAssembler<T> {
    /// Creates zero global matrices with the given number of dofs.
    pub fn new(num_dofs: usize) -> Self {
        Self {
            a: DMatrix::zeros(num_dofs, num_dofs),
            t: DMatrix::zeros(num_dofs, num_dofs),
        }
    }

    /// The assembled global spatial-operator matrix.
    pub fn a(&self) -> &DMatrix<T> {
        &self.a
    }

    /// The assembled global time/mass matrix.
    pub fn t(&self) -> &DMatrix<T> {
        &self.t
    }

    pub fn into_matrices(self) -> (DMatrix<T>, DMatrix<T>) {
        (self.a, self.t)
    }
}

impl<T: Real> GlobalAssembler<T> for DenseGlobalAssembler<T> {
    fn add_element_matrices(&mut self, dofs: &[usize], a: DMatrixSlice<T>, t: DMatrixSlice<T>) {
        assert_eq!(a.nrows(), dofs.len(), "local matrix dimension mismatch");
        assert_eq!(a.shape(), t.shape(), "local matrix shape mismatch");
        for (local_i, &global_i) in dofs.iter().enumerate() {
            for (local_j, &global_j) in dofs.iter().enumerate() {
                self.a[(global_i, global_j)] += a[(local_i, local_j)];
                self.t[(global_i, global_j)] += t[(local_i, local_j)];
            }
        }
    }
}
