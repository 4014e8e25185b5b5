//! Drawable scene nodes.
//!
//! - [`Geometry`] - Vertex arrays with optional indices
//! - [`VertexIndexDraw`] - Vertex arrays, an index buffer and draw counts

use std::sync::Arc;

use strata_core::data::{Data, DataList};

use crate::error::{GraphicsError, GraphicsResult};
use crate::traversal::{Node, Visitor};

/// A set of vertex arrays bound from `first_binding`, optionally indexed.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    /// First slot the arrays are bound to.
    pub first_binding: u32,
    /// Vertex arrays in slot order.
    pub arrays: DataList,
    /// Optional index buffer.
    pub indices: Option<Arc<dyn Data>>,
}

impl Geometry {
    /// Create an empty geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first binding slot.
    pub fn with_first_binding(mut self, first_binding: u32) -> Self {
        self.first_binding = first_binding;
        self
    }

    /// Append a vertex array.
    pub fn with_array(mut self, array: Arc<dyn Data>) -> Self {
        self.arrays.push(array);
        self
    }

    /// Set the index buffer.
    pub fn with_indices(mut self, indices: Arc<dyn Data>) -> Self {
        self.indices = Some(indices);
        self
    }
}

impl Node for Geometry {
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.apply_geometry(self);
    }
}

/// Indexed draw of vertex arrays bound from `first_binding`.
#[derive(Debug, Clone)]
pub struct VertexIndexDraw {
    /// First slot the arrays are bound to.
    pub first_binding: u32,
    /// Vertex arrays in slot order.
    pub arrays: DataList,
    /// Index buffer.
    pub indices: Option<Arc<dyn Data>>,
    /// Number of indices drawn.
    pub index_count: u32,
    /// Number of instances drawn.
    pub instance_count: u32,
    /// First index read.
    pub first_index: u32,
    /// Value added to each index.
    pub vertex_offset: i32,
    /// First instance drawn.
    pub first_instance: u32,
}

impl Default for VertexIndexDraw {
    fn default() -> Self {
        Self {
            first_binding: 0,
            arrays: DataList::new(),
            indices: None,
            index_count: 0,
            instance_count: 1,
            first_index: 0,
            vertex_offset: 0,
            first_instance: 0,
        }
    }
}

impl VertexIndexDraw {
    /// Create an empty draw of one instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first binding slot.
    pub fn with_first_binding(mut self, first_binding: u32) -> Self {
        self.first_binding = first_binding;
        self
    }

    /// Append a vertex array.
    pub fn with_array(mut self, array: Arc<dyn Data>) -> Self {
        self.arrays.push(array);
        self
    }

    /// Set the number of instances.
    pub fn with_instance_count(mut self, instance_count: u32) -> Self {
        self.instance_count = instance_count;
        self
    }

    /// Set the index buffer and draw every index in it.
    ///
    /// Index buffers must hold 8, 16 or 32-bit values.
    pub fn with_indices(mut self, indices: Arc<dyn Data>) -> GraphicsResult<Self> {
        let value_size = indices.value_size();
        if !matches!(value_size, 1 | 2 | 4) {
            return Err(GraphicsError::InvalidIndexBuffer(format!(
                "index values must be 1, 2 or 4 bytes, got {value_size}"
            )));
        }
        let count = indices.value_count()?;
        self.index_count = u32::try_from(count).map_err(|_| {
            GraphicsError::InvalidIndexBuffer(format!("{count} indices exceed the u32 range"))
        })?;
        self.indices = Some(indices);
        Ok(self)
    }
}

impl Node for VertexIndexDraw {
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.apply_vertex_index_draw(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::data::{UintArray, UshortArray, Vec3Array};

    #[test]
    fn test_geometry_builder() {
        let geometry = Geometry::new()
            .with_first_binding(1)
            .with_array(Arc::new(Vec3Array::new_1d(4)))
            .with_indices(Arc::new(UshortArray::from_vec(vec![0, 1, 2])));
        assert_eq!(geometry.first_binding, 1);
        assert_eq!(geometry.arrays.len(), 1);
        assert!(geometry.indices.is_some());
    }

    #[test]
    fn test_vertex_index_draw_counts_indices() {
        let draw = VertexIndexDraw::new()
            .with_array(Arc::new(Vec3Array::new_1d(4)))
            .with_indices(Arc::new(UintArray::from_vec(vec![0, 1, 2, 2, 3, 0])))
            .unwrap();
        assert_eq!(draw.index_count, 6);
        assert_eq!(draw.instance_count, 1);
    }

    #[test]
    fn test_vertex_index_draw_rejects_vec3_indices() {
        let result = VertexIndexDraw::new().with_indices(Arc::new(Vec3Array::new_1d(3)));
        assert!(matches!(result, Err(GraphicsError::InvalidIndexBuffer(_))));
    }
}
