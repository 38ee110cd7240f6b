//! Execution backends for the per-element assembly loop.
//!
//! Elements within one scheme's element set have no data dependency on each other, so
//! the per-element evaluation is embarrassingly parallel. A backend decides how the
//! evaluations are executed; the scatter into the global system always happens in
//! element index order through the `emit` callback, so swapping backends does not change
//! the scatter contract or, for these two backends, the numerical result at all.

use std::fmt::Debug;
use std::ops::Range;

use nalgebra::{DMatrix, Point2, Scalar};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{Real, WeftError};

/// The per-element evaluation output and scratch buffers.
///
/// One instance is reused across elements by the sequential backend; the contents are
/// only valid until the next element is evaluated, so `emit` consumers must copy out
/// whatever they keep.
#[derive(Debug, Clone)]
pub struct LocalEvaluation<T>
where
    T: Scalar,
{
    /// Global dof indices for the element, node-major.
    pub dofs: Vec<usize>,
    /// The local spatial-operator matrix.
    pub a: DMatrix<T>,
    /// The local time/mass matrix.
    pub t: DMatrix<T>,
    /// Gathered element vertices.
    pub vertices: Vec<Point2<T>>,
    /// Gathered nodal solution values, `solution_dim x num_nodes`.
    pub u_local: DMatrix<T>,
}

impl<T: Real> Default for LocalEvaluation<T> {
    fn default() -> Self {
        Self {
            dofs: Vec::new(),
            a: DMatrix::zeros(0, 0),
            t: DMatrix::zeros(0, 0),
            vertices: Vec::new(),
            u_local: DMatrix::zeros(0, 0),
        }
    }
}

/// A strategy for executing the per-element assembly loop of one scheme.
pub trait ExecutionBackend: Debug + Default + Copy + Send + Sync + 'static {
    /// Evaluates every element in `elements` with `eval` and hands the results to
    /// `emit` in element index order. Stops at the first evaluation error; no further
    /// results are emitted past a failure.
    fn assemble_elements<T, Eval>(
        &self,
        elements: Range<usize>,
        eval: Eval,
        emit: &mut dyn FnMut(&LocalEvaluation<T>),
    ) -> Result<(), WeftError>
    where
        T: Real + Send + Sync,
        Eval: Fn(usize, &mut LocalEvaluation<T>) -> Result<(), WeftError> + Sync;
}

/// The baseline backend: one thread, one reused scratch buffer, scatter interleaved
/// with evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequentialBackend;

impl ExecutionBackend for SequentialBackend {
    fn assemble_elements<T, Eval>(
        &self,
        elements: Range<usize>,
        eval: Eval,
        emit: &mut dyn FnMut(&LocalEvaluation<T>),
    ) -> Result<(), WeftError>
    where
        T: Real + Send + Sync,
        Eval: Fn(usize, &mut LocalEvaluation<T>) -> Result<(), WeftError> + Sync,
    {
        let mut local = LocalEvaluation::default();
        for index in elements {
            eval(index, &mut local)?;
            emit(&local);
        }
        Ok(())
    }
}

/// A data-parallel backend built on `rayon`.
///
/// Elements are evaluated in parallel into per-element buffers and emitted in element
/// index order once the whole set has been evaluated, so results are identical to the
/// sequential backend. A failed evaluation fails the whole set before anything is
/// emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RayonBackend;

impl ExecutionBackend for RayonBackend {
    fn assemble_elements<T, Eval>(
        &self,
        elements: Range<usize>,
        eval: Eval,
        emit: &mut dyn FnMut(&LocalEvaluation<T>),
    ) -> Result<(), WeftError>
    where
        T: Real + Send + Sync,
        Eval: Fn(usize, &mut LocalEvaluation<T>) -> Result<(), WeftError> + Sync,
    {
        let evaluations = elements
            .into_par_iter()
            .map(|index| {
                let mut local = LocalEvaluation::default();
                eval(index, &mut local)?;
                Ok(local)
            })
            .collect::<Result<Vec<_>, WeftError>>()?;

        for local in &evaluations {
            emit(local);
        }
        Ok(())
    }
}
