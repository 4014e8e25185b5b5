//! Rasterization state.

use super::pipeline::PipelineState;

/// Rasterizer configuration. Carries no vertex information, so vertex
/// consumers skip it when scanning a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RasterizationState {}

impl RasterizationState {
    /// Create the default rasterization state.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PipelineState for RasterizationState {}
