//! Primitive assembly state.

use super::pipeline::PipelineState;

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Vertices form a connected strip of lines.
    LineStrip,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
    /// Every vertex after the first two forms a triangle with the first vertex.
    TriangleFan,
    /// Vertices are grouped into tessellation patches.
    PatchList,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive (for list topologies).
    pub fn vertices_per_primitive(&self) -> Option<u32> {
        match self {
            Self::PointList => Some(1),
            Self::LineList => Some(2),
            Self::TriangleList => Some(3),
            // Strips and fans share vertices, patch size comes from tessellation state
            Self::LineStrip | Self::TriangleStrip | Self::TriangleFan | Self::PatchList => None,
        }
    }
}

/// Selects the primitive topology of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InputAssemblyState {
    /// How vertices form primitives.
    pub topology: PrimitiveTopology,
    /// Whether a special index value restarts strips and fans.
    pub primitive_restart_enable: bool,
}

impl InputAssemblyState {
    /// Create an input assembly state for `topology`.
    pub fn new(topology: PrimitiveTopology) -> Self {
        Self {
            topology,
            primitive_restart_enable: false,
        }
    }

    /// Enable primitive restart.
    pub fn with_primitive_restart(mut self) -> Self {
        self.primitive_restart_enable = true;
        self
    }
}

impl PipelineState for InputAssemblyState {
    fn as_input_assembly(&self) -> Option<&InputAssemblyState> {
        Some(self)
    }
}
