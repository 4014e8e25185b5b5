//! Pipeline state.
//!
//! - [`PipelineState`] - Open capability trait implemented by every state kind
//! - [`InputAssemblyState`] - Primitive topology
//! - [`VertexInputState`] - Vertex buffer bindings and attributes
//! - [`RasterizationState`] - Rasterizer configuration
//! - [`GraphicsPipeline`] / [`BindGraphicsPipeline`] - Ordered states and their bind command

mod input_assembly;
mod pipeline;
mod rasterization;
mod vertex_input;

pub use input_assembly::{InputAssemblyState, PrimitiveTopology};
pub use pipeline::{BindGraphicsPipeline, GraphicsPipeline, PipelineState, PipelineStates};
pub use rasterization::RasterizationState;
pub use vertex_input::{
    VertexInputAttribute, VertexInputBinding, VertexInputRate, VertexInputState,
};
