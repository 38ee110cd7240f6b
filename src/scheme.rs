//! The scheme registry and the domain-term dispatcher.
//!
//! A *scheme* is one fully specialized local assembly kernel for a single
//! (element type, physics model) pair. Schemes are expensive to instantiate (they
//! monomorphize the whole quadrature loop), so a [`DomainTerm`] memoizes them in a
//! [`SchemeRegistry`] keyed by the pair and rebinds the cached instance to the current
//! element range on every execution. Creation happens at most once per key for the
//! lifetime of the term, regardless of how many regions or time steps reuse it.

use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, trace};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::assembly::{ElementKernel, GlobalAssembler};
use crate::backend::{ExecutionBackend, SequentialBackend};
use crate::element::{ElementType, Quad4Element, Tri3Element};
use crate::fields::SolutionFields;
use crate::mesh::Region;
use crate::physics::{
    Burgers, LinearAdvection, NavierStokes, PhysicsConfig, PhysicsKind, PhysicsModel,
    RotationalAdvection,
};
use crate::quadrature;
use crate::{Real, WeftError};

/// The cache key of a specialized scheme.
pub type SchemeKey = (ElementType, PhysicsKind);

/// A cached scheme instance, shared between the registry and its callers.
pub type SharedScheme<T, B> = Arc<Mutex<Box<dyn Scheme<T, B>>>>;

/// A type-erased local assembly scheme for one (element type, physics model) pair.
///
/// `set_elements` rebinds the scheme to a contiguous index range inside the region's
/// block of its element type; `execute` then runs local assembly over that range and
/// scatters every local `(A, T)` pair into the global assembler. The two-step protocol
/// lets a cached scheme be reused across regions without holding any region reference
/// between executions.
pub trait Scheme<T, B>: Send
where
    T: Real,
    B: ExecutionBackend,
{
    /// The element type this scheme is specialized for.
    fn element_type(&self) -> ElementType;

    /// The physics model this scheme is specialized for.
    fn physics_kind(&self) -> PhysicsKind;

    /// Rebinds the scheme to a range of element indices within its block.
    fn set_elements(&mut self, elements: Range<usize>);

    /// Assembles the bound elements of `region` into `assembler`.
    fn execute(
        &mut self,
        region: &Region<T>,
        fields: &SolutionFields<T>,
        backend: &B,
        assembler: &mut dyn GlobalAssembler<T>,
    ) -> Result<(), WeftError>;
}

/// A lazy, memoizing cache of specialized schemes.
///
/// `get_or_create` is the only way in: the first request for a key instantiates the
/// scheme through the supplied constructor, every later request returns the cached
/// instance. The registry never evicts.
pub struct SchemeRegistry<T, B>
where
    T: Real,
    B: ExecutionBackend,
{
    schemes: Mutex<FxHashMap<SchemeKey, SharedScheme<T, B>>>,
    created: AtomicUsize,
}

impl<T, B> fmt::Debug for SchemeRegistry<T, B>
where
    T: Real,
    B: ExecutionBackend,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.schemes.lock().keys().copied().collect();
        keys.sort();
        f.debug_struct("SchemeRegistry")
            .field("schemes", &keys)
            .field("created", &self.created)
            .finish()
    }
}

impl<T, B> Default for SchemeRegistry<T, B>
where
    T: Real,
    B: ExecutionBackend,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, B> SchemeRegistry<T, B>
where
    T: Real,
    B: ExecutionBackend,
{
    pub fn new() -> Self {
        Self {
            schemes: Mutex::new(FxHashMap::default()),
            created: AtomicUsize::new(0),
        }
    }

    /// Returns the scheme cached under `key`, constructing it first if absent.
    ///
    /// The registry lock is held across construction, so concurrent callers racing on
    /// the same key observe exactly one construction. A cached scheme whose own
    /// identity disagrees with its key fails with [`WeftError::SchemeMismatch`].
    pub fn get_or_create<F>(&self, key: SchemeKey, create: F) -> Result<SharedScheme<T, B>, WeftError>
    where
        F: FnOnce() -> Result<Box<dyn Scheme<T, B>>, WeftError>,
    {
        let mut schemes = self.schemes.lock();
        if let Some(existing) = schemes.get(&key) {
            let actual = {
                let scheme = existing.lock();
                (scheme.element_type(), scheme.physics_kind())
            };
            if actual != key {
                return Err(WeftError::SchemeMismatch {
                    expected: key,
                    actual,
                });
            }
            return Ok(Arc::clone(existing));
        }

        debug!("instantiating scheme for ({}, {})", key.0, key.1);
        let scheme = create()?;
        self.created.fetch_add(1, Ordering::Relaxed);
        let shared = Arc::new(Mutex::new(scheme));
        schemes.insert(key, Arc::clone(&shared));
        Ok(shared)
    }

    /// The number of cached schemes.
    pub fn len(&self) -> usize {
        self.schemes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: SchemeKey) -> bool {
        self.schemes.lock().contains_key(&key)
    }

    /// The total number of scheme constructions performed so far.
    pub fn schemes_created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}

/// A volume term of the discretized equations, dispatched over a region's element blocks.
///
/// Executing a term walks the closed element-type set, skips types absent from the
/// region, and for each populated block fetches (or lazily builds) the scheme
/// specialized for that block's element type and the requested physics model. Every
/// scheme runs on the term's execution backend and scatters into the caller's global
/// assembler.
pub struct DomainTerm<T, B = SequentialBackend>
where
    T: Real,
    B: ExecutionBackend,
{
    name: String,
    backend: B,
    registry: SchemeRegistry<T, B>,
}

impl<T, B> fmt::Debug for DomainTerm<T, B>
where
    T: Real,
    B: ExecutionBackend,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainTerm")
            .field("name", &self.name)
            .field("backend", &self.backend)
            .field("registry", &self.registry)
            .finish()
    }
}

impl<T> DomainTerm<T, SequentialBackend>
where
    T: Real + Send + Sync,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_backend(name, SequentialBackend)
    }
}

impl<T, B> DomainTerm<T, B>
where
    T: Real + Send + Sync,
    B: ExecutionBackend,
{
    pub fn with_backend(name: impl Into<String>, backend: B) -> Self {
        Self {
            name: name.into(),
            backend,
            registry: SchemeRegistry::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &SchemeRegistry<T, B> {
        &self.registry
    }

    /// Assembles this term over every populated element block of `region`.
    ///
    /// The solution layout is validated up front, before any scheme is fetched or
    /// built, so a mismatched field layout leaves the registry untouched.
    pub fn execute(
        &self,
        region: &Region<T>,
        fields: &SolutionFields<T>,
        physics: &PhysicsModel<T>,
        assembler: &mut dyn GlobalAssembler<T>,
    ) -> Result<(), WeftError> {
        let expected = physics.solution_dim();
        if fields.solution_dim() != expected {
            return Err(WeftError::SolutionLayoutMismatch {
                expected,
                actual: fields.solution_dim(),
            });
        }

        debug!(
            "domain term `{}`: assembling region `{}` with physics {}",
            self.name,
            region.name(),
            physics.kind()
        );

        for element_type in ElementType::ALL {
            let count = region.element_count(element_type);
            if count == 0 {
                continue;
            }
            let scheme = self
                .registry
                .get_or_create((element_type, physics.kind()), || {
                    build_scheme::<T, B>(element_type, physics)
                })?;
            let mut scheme = scheme.lock();
            trace!(
                "domain term `{}`: {} {} elements",
                self.name,
                count,
                element_type
            );
            scheme.set_elements(0..count);
            scheme.execute(region, fields, &self.backend, assembler)?;
        }
        Ok(())
    }

    /// Like [`execute`](Self::execute), with the physics model resolved from an
    /// identifier string and a configuration record.
    ///
    /// Resolution happens before anything else, so an unknown identifier fails with
    /// [`WeftError::UnknownPhysicsModel`] without touching the registry.
    pub fn execute_named(
        &self,
        region: &Region<T>,
        fields: &SolutionFields<T>,
        physics_name: &str,
        config: &PhysicsConfig<T>,
        assembler: &mut dyn GlobalAssembler<T>,
    ) -> Result<(), WeftError> {
        let physics = PhysicsModel::resolve(physics_name, config)?;
        self.execute(region, fields, &physics, assembler)
    }
}

/// Instantiates the kernel specialized for one (element type, physics model) pair.
fn build_scheme<T, B>(
    element_type: ElementType,
    physics: &PhysicsModel<T>,
) -> Result<Box<dyn Scheme<T, B>>, WeftError>
where
    T: Real + Send + Sync,
    B: ExecutionBackend,
{
    let quadrature = quadrature::default_rule::<T>(element_type)?;
    let scheme: Box<dyn Scheme<T, B>> = match (element_type, physics) {
        (ElementType::Tri3, PhysicsModel::LinearAdvection { velocity }) => Box::new(
            ElementKernel::<T, Tri3Element<T>, _>::new(LinearAdvection::new(*velocity), quadrature),
        ),
        (ElementType::Tri3, PhysicsModel::RotationalAdvection) => Box::new(
            ElementKernel::<T, Tri3Element<T>, _>::new(RotationalAdvection, quadrature),
        ),
        (ElementType::Tri3, PhysicsModel::Burgers) => Box::new(
            ElementKernel::<T, Tri3Element<T>, _>::new(Burgers, quadrature),
        ),
        (ElementType::Tri3, PhysicsModel::NavierStokes(coefficients)) => Box::new(
            ElementKernel::<T, Tri3Element<T>, _>::new(NavierStokes::new(*coefficients), quadrature),
        ),
        (ElementType::Quad4, PhysicsModel::LinearAdvection { velocity }) => Box::new(
            ElementKernel::<T, Quad4Element<T>, _>::new(LinearAdvection::new(*velocity), quadrature),
        ),
        (ElementType::Quad4, PhysicsModel::RotationalAdvection) => Box::new(
            ElementKernel::<T, Quad4Element<T>, _>::new(RotationalAdvection, quadrature),
        ),
        (ElementType::Quad4, PhysicsModel::Burgers) => Box::new(
            ElementKernel::<T, Quad4Element<T>, _>::new(Burgers, quadrature),
        ),
        (ElementType::Quad4, PhysicsModel::NavierStokes(coefficients)) => Box::new(
            ElementKernel::<T, Quad4Element<T>, _>::new(NavierStokes::new(*coefficients), quadrature),
        ),
        (ElementType::Tet4, _) => {
            return Err(WeftError::UnsupportedElementType(element_type));
        }
    };
    Ok(scheme)
}
