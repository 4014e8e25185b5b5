//! # Strata Graphics
//!
//! Pipeline state, vertex binding commands and the traversal that resolves
//! vertex positions from them.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`state`] - Pipeline states ([`InputAssemblyState`], [`VertexInputState`], ...)
//! - [`Geometry`], [`VertexIndexDraw`], [`BindVertexBuffers`] - Sources of vertex bindings
//! - [`Visitor`] / [`Node`] - Traversal over recorded nodes
//! - [`ArrayState`] - Resolves the position attribute to a `Vec3` sequence
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use strata_core::data::{Data, Format, Vec3Array};
//! use strata_graphics::{
//!     ArrayState, BindGraphicsPipeline, Geometry, GraphicsPipeline, Node, VertexInputAttribute,
//!     VertexInputBinding, VertexInputState, traverse,
//! };
//!
//! let pipeline = GraphicsPipeline::new().with_state(
//!     VertexInputState::new()
//!         .with_binding(VertexInputBinding::new(0, 12))
//!         .with_attribute(VertexInputAttribute::new(0, 0, Format::R32G32B32Sfloat, 0)),
//! );
//! let bind = BindGraphicsPipeline::new(Arc::new(pipeline));
//! let positions: Arc<dyn Data> = Arc::new(Vec3Array::new_1d(3));
//! let geometry = Geometry::new().with_array(positions);
//!
//! let mut state = ArrayState::new();
//! traverse([&bind as &dyn Node, &geometry], &mut state);
//! assert_eq!(state.vertices().map(|v| v.len()), Some(3));
//! ```

pub mod commands;
pub mod error;
pub mod nodes;
pub mod state;
pub mod traversal;

// Re-export main types for convenience
pub use commands::BindVertexBuffers;
pub use error::{GraphicsError, GraphicsResult};
pub use nodes::{Geometry, VertexIndexDraw};
pub use state::{
    BindGraphicsPipeline, GraphicsPipeline, InputAssemblyState, PipelineState,
    PrimitiveTopology, RasterizationState, VertexInputAttribute, VertexInputBinding,
    VertexInputRate, VertexInputState,
};
pub use traversal::{ArrayState, AttributeBinding, Node, ResolverState, Vertices, Visitor, traverse};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version. Call once at startup.
pub fn init() {
    log::info!("Strata Graphics v{} initialized", VERSION);
}
