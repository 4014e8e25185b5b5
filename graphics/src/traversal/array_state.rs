//! Resolution of vertex positions from pipeline and binding events.
//!
//! [`ArrayState`] follows a traversal and keeps track of which buffer feeds
//! the vertex attribute at one configured location (the position attribute by
//! default). Pipeline binds tell it where that attribute lives, binding
//! events tell it which buffers are bound. Whenever both are known it exposes
//! the attribute as a `Vec3` sequence:
//!
//! - a bound [`Vec3Array`] is used as-is,
//! - any other buffer is viewed through a [`ProxyVec3Array`] when the
//!   attribute is three 32-bit floats with a non-zero stride,
//! - otherwise no vertices are available.
//!
//! Missing or unsupported data is never an error. Traversals pass through
//! incomplete states before every binding has arrived, so an unresolved
//! state only means there is nothing to read yet.

use std::sync::Arc;

use glam::Vec3;
use strata_core::data::{Data, DataVisitor, Format, ProxyVec3Array, Vec3Array, same_data};

use super::Visitor;
use crate::commands::BindVertexBuffers;
use crate::nodes::{Geometry, VertexIndexDraw};
use crate::state::{BindGraphicsPipeline, PrimitiveTopology, VertexInputState};

/// Where the tracked attribute lives inside its bound buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeBinding {
    /// Slot of the buffer.
    pub binding: u32,
    /// Byte offset of the attribute inside one element.
    pub offset: u32,
    /// Bytes between consecutive elements.
    pub stride: u32,
    /// Encoding of the attribute.
    pub format: Format,
}

impl AttributeBinding {
    /// Look up the attribute at `location` in `state`.
    ///
    /// The first attribute at the location is used, together with the first
    /// binding declaring its slot. Returns `None` if either is missing.
    pub fn from_vertex_input(state: &VertexInputState, location: u32) -> Option<Self> {
        let attribute = state.attribute_at_location(location)?;
        let binding = state.binding(attribute.binding)?;
        Some(Self {
            binding: attribute.binding,
            offset: attribute.offset,
            stride: binding.stride,
            format: attribute.format,
        })
    }
}

/// Progress of an [`ArrayState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverState {
    /// No pipeline has declared the tracked attribute yet.
    Unbound,
    /// The attribute is known but no usable buffer is bound for it.
    AttributeKnown,
    /// Vertices are available.
    Resolved,
}

/// Resolved vertex positions.
#[derive(Debug, Clone, Copy)]
pub enum Vertices<'a> {
    /// The bound buffer already holds `Vec3` values.
    Native(&'a Arc<Vec3Array>),
    /// The bound buffer is read through a strided view.
    Proxy(&'a ProxyVec3Array),
}

impl<'a> Vertices<'a> {
    /// Number of vertices.
    pub fn len(&self) -> usize {
        match self {
            Self::Native(array) => array.value_count().unwrap_or(0),
            Self::Proxy(proxy) => proxy.len(),
        }
    }

    /// Returns true if there are no vertices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read vertex `index`.
    pub fn get(&self, index: usize) -> Option<Vec3> {
        match self {
            Self::Native(array) if index < self.len() => array.get(index),
            Self::Native(_) => None,
            Self::Proxy(proxy) => proxy.get(index),
        }
    }

    /// Iterate over all vertices.
    pub fn iter(self) -> impl Iterator<Item = Vec3> + 'a {
        (0..self.len()).filter_map(move |index| self.get(index))
    }
}

#[derive(Debug, Clone, Default)]
enum Resolved {
    #[default]
    None,
    Native(Arc<Vec3Array>),
    Proxy,
}

impl PartialEq for Resolved {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) | (Self::Proxy, Self::Proxy) => true,
            (Self::Native(a), Self::Native(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Tracks bound vertex arrays and resolves the positions of the attribute at
/// one location.
///
/// Feed it traversal events through [`Visitor`] (or call [`apply_arrays`]
/// directly for custom binding sources), then read [`vertices`].
///
/// Bound buffers are shared, not copied. The caller must not mutate a buffer
/// from another thread while a traversal that binds it is running.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use glam::Vec3;
/// use strata_core::data::{Data, Vec3Array};
/// use strata_graphics::{ArrayState, ResolverState};
///
/// let mut state = ArrayState::new();
/// assert_eq!(state.state(), ResolverState::Unbound);
///
/// let positions: Arc<dyn Data> = Arc::new(Vec3Array::from_vec(vec![Vec3::X, Vec3::Y]));
/// state.apply_arrays(0, &[positions]);
/// assert!(state.vertices().is_none());
/// ```
///
/// [`apply_arrays`]: ArrayState::apply_arrays
/// [`vertices`]: ArrayState::vertices
#[derive(Debug, Clone)]
pub struct ArrayState {
    vertex_attribute_location: u32,
    topology: PrimitiveTopology,
    vertex_attribute: Option<AttributeBinding>,
    arrays: Vec<Option<Arc<dyn Data>>>,
    proxy_vertices: Option<ProxyVec3Array>,
    resolved: Resolved,
}

impl Default for ArrayState {
    fn default() -> Self {
        Self {
            vertex_attribute_location: 0,
            topology: PrimitiveTopology::default(),
            vertex_attribute: None,
            arrays: Vec::new(),
            proxy_vertices: None,
            resolved: Resolved::None,
        }
    }
}

impl ArrayState {
    /// Create a resolver tracking location 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the attribute at `location` instead.
    pub fn with_vertex_attribute_location(mut self, location: u32) -> Self {
        self.vertex_attribute_location = location;
        self
    }

    /// Location of the tracked attribute.
    pub fn vertex_attribute_location(&self) -> u32 {
        self.vertex_attribute_location
    }

    /// Topology of the last bound input assembly state.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Where the tracked attribute lives, once a pipeline declared it.
    pub fn vertex_attribute(&self) -> Option<&AttributeBinding> {
        self.vertex_attribute.as_ref()
    }

    /// The binding table, indexed by slot.
    pub fn arrays(&self) -> &[Option<Arc<dyn Data>>] {
        &self.arrays
    }

    /// The strided view, once one was needed.
    ///
    /// The view is kept across re-resolution and reassigned in place, so it
    /// may be present even when [`vertices`](Self::vertices) is `None`.
    pub fn proxy_vertices(&self) -> Option<&ProxyVec3Array> {
        self.proxy_vertices.as_ref()
    }

    /// Resolved vertex positions, if any.
    pub fn vertices(&self) -> Option<Vertices<'_>> {
        match &self.resolved {
            Resolved::None => None,
            Resolved::Native(array) => Some(Vertices::Native(array)),
            Resolved::Proxy => self.proxy_vertices.as_ref().map(Vertices::Proxy),
        }
    }

    /// Current progress.
    pub fn state(&self) -> ResolverState {
        match (&self.vertex_attribute, self.vertices()) {
            (None, _) => ResolverState::Unbound,
            (Some(_), None) => ResolverState::AttributeKnown,
            (Some(_), Some(_)) => ResolverState::Resolved,
        }
    }

    /// Bind `arrays` to slots `first_binding..first_binding + arrays.len()`.
    ///
    /// The table grows as needed; slots below `first_binding` that were never
    /// bound stay empty. Resolution runs again if the tracked attribute's
    /// slot is among the slots written.
    pub fn apply_arrays(&mut self, first_binding: u32, arrays: &[Arc<dyn Data>]) {
        let first = first_binding as usize;
        let end = first + arrays.len();
        if self.arrays.len() < end {
            self.arrays.resize(end, None);
        }
        for (slot, array) in self.arrays[first..end].iter_mut().zip(arrays) {
            *slot = Some(array.clone());
        }

        log::trace!(
            "Bound {} arrays at slots {}..{}",
            arrays.len(),
            first_binding,
            end
        );

        if let Some(attribute) = self.vertex_attribute {
            let binding = attribute.binding as usize;
            if binding >= first && binding < end {
                self.resolve();
            }
        }
    }

    fn resolve(&mut self) {
        let Some(attribute) = self.vertex_attribute else {
            self.resolved = Resolved::None;
            return;
        };
        match self.arrays.get(attribute.binding as usize).cloned().flatten() {
            Some(array) => array.accept(self),
            None => {
                log::trace!("No array bound at slot {}", attribute.binding);
                self.resolved = Resolved::None;
            }
        }
    }
}

impl DataVisitor for ArrayState {
    fn apply_data(&mut self, data: Arc<dyn Data>) {
        let Some(attribute) = self.vertex_attribute else {
            self.resolved = Resolved::None;
            return;
        };
        if attribute.stride == 0 || !attribute.format.is_vec3_f32() {
            log::trace!(
                "Cannot adapt {:?} with stride {} as vertex positions",
                attribute.format,
                attribute.stride
            );
            self.resolved = Resolved::None;
            return;
        }

        let data_size = match data.data_size() {
            Ok(size) => size,
            Err(err) => {
                log::warn!("Bound vertex array is unusable: {}", err);
                self.resolved = Resolved::None;
                return;
            }
        };
        let stride = attribute.stride as usize;
        let count = data_size / stride;
        let layout = data.layout();

        let proxy = self.proxy_vertices.get_or_insert_with(|| {
            log::debug!("Creating proxy vertex array");
            ProxyVec3Array::new()
        });
        match proxy.assign(data, attribute.offset as usize, stride, count, layout) {
            Ok(()) => self.resolved = Resolved::Proxy,
            Err(err) => {
                log::warn!(
                    "Rejected proxy vertex array (offset {}, stride {}, count {}): {}",
                    attribute.offset,
                    stride,
                    count,
                    err
                );
                self.resolved = Resolved::None;
            }
        }
    }

    fn apply_vec3_array(&mut self, array: Arc<Vec3Array>) {
        log::trace!("Using bound Vec3Array directly");
        self.resolved = Resolved::Native(array);
    }
}

impl Visitor for ArrayState {
    fn apply_bind_graphics_pipeline(&mut self, bind: &BindGraphicsPipeline) {
        for state in bind.pipeline().states() {
            if let Some(input_assembly) = state.as_input_assembly() {
                self.topology = input_assembly.topology;
            }
            if let Some(vertex_input) = state.as_vertex_input() {
                if let Some(attribute) =
                    AttributeBinding::from_vertex_input(vertex_input, self.vertex_attribute_location)
                {
                    self.vertex_attribute = Some(attribute);
                }
            }
        }
        log::trace!(
            "Pipeline bound: topology {:?}, attribute {:?}",
            self.topology,
            self.vertex_attribute
        );
        self.resolve();
    }

    fn apply_geometry(&mut self, geometry: &Geometry) {
        self.apply_arrays(geometry.first_binding, &geometry.arrays);
    }

    fn apply_vertex_index_draw(&mut self, draw: &VertexIndexDraw) {
        self.apply_arrays(draw.first_binding, &draw.arrays);
    }

    fn apply_bind_vertex_buffers(&mut self, bind: &BindVertexBuffers) {
        self.apply_arrays(bind.first_binding(), bind.arrays());
    }
}

impl PartialEq for ArrayState {
    fn eq(&self, other: &Self) -> bool {
        let same_arrays = self.arrays.len() == other.arrays.len()
            && self
                .arrays
                .iter()
                .zip(&other.arrays)
                .all(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) => same_data(a, b),
                    (None, None) => true,
                    _ => false,
                });
        same_arrays
            && self.vertex_attribute_location == other.vertex_attribute_location
            && self.topology == other.topology
            && self.vertex_attribute == other.vertex_attribute
            && self.proxy_vertices == other.proxy_vertices
            && self.resolved == other.resolved
    }
}

static_assertions::assert_impl_all!(ArrayState: Send, Sync);
