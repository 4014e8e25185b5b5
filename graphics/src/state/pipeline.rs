//! Graphics pipelines and the command that binds them.

use std::fmt;
use std::sync::Arc;

use super::input_assembly::InputAssemblyState;
use super::vertex_input::VertexInputState;
use crate::traversal::{Node, Visitor};

/// One piece of fixed-function pipeline configuration.
///
/// The set of state kinds is open. Consumers that only understand some kinds
/// ask for them through the capability accessors, which return `None` unless
/// the state provides that capability.
pub trait PipelineState: fmt::Debug + Send + Sync {
    /// The state as input assembly, if it is one.
    fn as_input_assembly(&self) -> Option<&InputAssemblyState> {
        None
    }

    /// The state as vertex input, if it is one.
    fn as_vertex_input(&self) -> Option<&VertexInputState> {
        None
    }
}

/// Ordered list of shared pipeline states.
pub type PipelineStates = Vec<Arc<dyn PipelineState>>;

/// A graphics pipeline, described by its ordered states.
#[derive(Debug, Clone, Default)]
pub struct GraphicsPipeline {
    states: PipelineStates,
}

impl GraphicsPipeline {
    /// Create a pipeline with no states.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline from existing states.
    pub fn from_states(states: PipelineStates) -> Self {
        Self { states }
    }

    /// Append a state.
    pub fn with_state(mut self, state: impl PipelineState + 'static) -> Self {
        self.states.push(Arc::new(state));
        self
    }

    /// Append an already shared state.
    pub fn with_shared_state(mut self, state: Arc<dyn PipelineState>) -> Self {
        self.states.push(state);
        self
    }

    /// The states in declaration order.
    pub fn states(&self) -> &[Arc<dyn PipelineState>] {
        &self.states
    }
}

/// Binds a graphics pipeline for subsequent draws.
#[derive(Debug, Clone)]
pub struct BindGraphicsPipeline {
    pipeline: Arc<GraphicsPipeline>,
}

impl BindGraphicsPipeline {
    /// Create a bind command for `pipeline`.
    pub fn new(pipeline: Arc<GraphicsPipeline>) -> Self {
        Self { pipeline }
    }

    /// The bound pipeline.
    pub fn pipeline(&self) -> &Arc<GraphicsPipeline> {
        &self.pipeline
    }
}

impl Node for BindGraphicsPipeline {
    fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.apply_bind_graphics_pipeline(self);
    }
}

static_assertions::assert_impl_all!(GraphicsPipeline: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PrimitiveTopology, RasterizationState};

    #[test]
    fn test_capability_accessors() {
        let pipeline = GraphicsPipeline::new()
            .with_state(RasterizationState::new())
            .with_state(InputAssemblyState::new(PrimitiveTopology::LineStrip))
            .with_state(VertexInputState::new());

        let states = pipeline.states();
        assert_eq!(states.len(), 3);
        assert!(states[0].as_input_assembly().is_none());
        assert!(states[0].as_vertex_input().is_none());
        assert_eq!(
            states[1].as_input_assembly().map(|s| s.topology),
            Some(PrimitiveTopology::LineStrip)
        );
        assert!(states[2].as_vertex_input().is_some());
    }

    #[test]
    fn test_shared_states() {
        let shared: Arc<dyn PipelineState> = Arc::new(InputAssemblyState::default());
        let a = GraphicsPipeline::new().with_shared_state(shared.clone());
        let b = GraphicsPipeline::from_states(vec![shared.clone()]);
        assert!(Arc::ptr_eq(&a.states()[0], &b.states()[0]));
    }
}
