//! Recorded commands that bind vertex data.

use std::sync::Arc;

use strata_core::data::{Data, DataList};

use crate::traversal::{Node, Visitor};

/// Binds `arrays` to consecutive slots starting at `first_binding`.
#[derive(Debug, Clone, Default)]
pub struct BindVertexBuffers {
    first_binding: u32,
    arrays: DataList,
}

impl BindVertexBuffers {
    /// Create a bind command.
    pub fn new(first_binding: u32, arrays: DataList) -> Self {
        Self {
            first_binding,
            arrays,
        }
    }

    /// Append a buffer to bind after the existing ones.
    pub fn with_array(mut self, array: Arc<dyn Data>) -> Self {
        self.arrays.push(array);
        self
    }

    /// First slot written.
    pub fn first_binding(&self) -> u32 {
        self.first_binding
    }

    /// Buffers in slot order.
    pub fn arrays(&self) -> &[Arc<dyn Data>] {
        &self.arrays
    }
}

impl Node for BindVertexBuffers {
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.apply_bind_vertex_buffers(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::data::{FloatArray, Vec3Array};

    #[test]
    fn test_bind_vertex_buffers() {
        let positions: Arc<dyn Data> = Arc::new(Vec3Array::new_1d(3));
        let bind =
            BindVertexBuffers::new(2, vec![positions]).with_array(Arc::new(FloatArray::new_1d(3)));
        assert_eq!(bind.first_binding(), 2);
        assert_eq!(bind.arrays().len(), 2);
        assert_eq!(bind.arrays()[1].value_size(), 4);
    }
}
