//! Scene traversal.
//!
//! A traversal walks recorded nodes in order and hands each one to a
//! [`Visitor`]. Nodes dispatch to the visitor method for their own type
//! through [`Node::accept`]; visitors only override the node types they
//! care about.

mod array_state;

pub use array_state::{ArrayState, AttributeBinding, ResolverState, Vertices};

use crate::commands::BindVertexBuffers;
use crate::nodes::{Geometry, VertexIndexDraw};
use crate::state::BindGraphicsPipeline;

/// Receives traversal events. Every method defaults to doing nothing.
pub trait Visitor {
    /// Called when a pipeline is bound.
    fn apply_bind_graphics_pipeline(&mut self, _bind: &BindGraphicsPipeline) {}

    /// Called for each geometry node.
    fn apply_geometry(&mut self, _geometry: &Geometry) {}

    /// Called for each indexed draw.
    fn apply_vertex_index_draw(&mut self, _draw: &VertexIndexDraw) {}

    /// Called when vertex buffers are bound to slots.
    fn apply_bind_vertex_buffers(&mut self, _bind: &BindVertexBuffers) {}
}

/// Something a [`Visitor`] can visit.
pub trait Node {
    /// Call the visitor method for this node's type.
    fn accept(&self, visitor: &mut dyn Visitor);
}

/// Visit `nodes` in order.
pub fn traverse<'a>(nodes: impl IntoIterator<Item = &'a dyn Node>, visitor: &mut dyn Visitor) {
    for node in nodes {
        node.accept(visitor);
    }
}
