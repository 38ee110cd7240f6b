//! Mesh regions, the read-only element input to the assembly engine.
//!
//! A [`Region`] is a named subset of mesh elements, stored as one connectivity block per
//! element type. The engine only reads vertex coordinates and connectivity from it;
//! mesh construction, I/O and partitioning belong to external collaborators.

use nalgebra::{Point2, Scalar};
use rustc_hash::FxHashMap;

use crate::element::ElementType;
use crate::Real;

/// The elements of one element type within a region, stored as flat connectivity with a
/// fixed arity per element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementBlock {
    element_type: ElementType,
    connectivity: Vec<usize>,
}

impl ElementBlock {
    fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            connectivity: Vec::new(),
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// The number of elements in the block.
    pub fn len(&self) -> usize {
        self.connectivity.len() / self.element_type.num_nodes()
    }

    pub fn is_empty(&self) -> bool {
        self.connectivity.is_empty()
    }

    /// The global node indices of the element at the given index within the block.
    pub fn element_nodes(&self, index: usize) -> &[usize] {
        let arity = self.element_type.num_nodes();
        &self.connectivity[arity * index..arity * (index + 1)]
    }
}

/// A named, mixed-element-type subset of a mesh.
#[derive(Debug, Clone)]
pub struct Region<T>
where
    T: Scalar,
{
    name: String,
    vertices: Vec<Point2<T>>,
    blocks: FxHashMap<ElementType, ElementBlock>,
}

impl<T> Region<T>
where
    T: Real,
{
    pub fn new(name: impl Into<String>, vertices: Vec<Point2<T>>) -> Self {
        Self {
            name: name.into(),
            vertices,
            blocks: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Point2<T>] {
        &self.vertices
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Appends an element of the given type to the region.
    ///
    /// # Panics
    ///
    /// Panics if the node count does not match the element type's arity, or if a node
    /// index is out of bounds for the region's vertices.
    pub fn add_element(&mut self, element_type: ElementType, nodes: &[usize]) {
        assert_eq!(
            nodes.len(),
            element_type.num_nodes(),
            "node count does not match {element_type} arity"
        );
        assert!(
            nodes.iter().all(|&node| node < self.vertices.len()),
            "element node index out of bounds"
        );
        self.blocks
            .entry(element_type)
            .or_insert_with(|| ElementBlock::new(element_type))
            .connectivity
            .extend_from_slice(nodes);
    }

    /// The connectivity block for the given element type, if the region contains any
    /// elements of that type.
    pub fn block(&self, element_type: ElementType) -> Option<&ElementBlock> {
        self.blocks.get(&element_type).filter(|block| !block.is_empty())
    }

    /// The number of elements of the given type in the region.
    pub fn element_count(&self, element_type: ElementType) -> usize {
        self.block(element_type).map_or(0, ElementBlock::len)
    }

    /// The total number of elements in the region across all types.
    pub fn num_elements(&self) -> usize {
        ElementType::ALL
            .iter()
            .map(|&ty| self.element_count(ty))
            .sum()
    }
}
