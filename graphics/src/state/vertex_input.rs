//! Vertex input state.
//!
//! A [`VertexInputState`] lists the vertex buffer bindings of a pipeline and
//! the attributes read from them. Bindings are addressed by their `binding`
//! index (the slot a buffer is bound to), attributes by their shader
//! `location`.
//!
//! # Example
//!
//! ```
//! use strata_core::data::Format;
//! use strata_graphics::{VertexInputAttribute, VertexInputBinding, VertexInputState};
//!
//! // Interleaved position + normal in slot 0
//! let state = VertexInputState::new()
//!     .with_binding(VertexInputBinding::new(0, 24))
//!     .with_attribute(VertexInputAttribute::new(0, 0, Format::R32G32B32Sfloat, 0))
//!     .with_attribute(VertexInputAttribute::new(1, 0, Format::R32G32B32Sfloat, 12));
//! assert!(state.validate().is_ok());
//! assert_eq!(state.attribute_at_location(1).unwrap().offset, 12);
//! ```

use strata_core::data::Format;

use super::pipeline::PipelineState;
use crate::error::{GraphicsError, GraphicsResult};

/// How a vertex buffer advances: per-vertex or per-instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexInputRate {
    /// Buffer advances once per vertex (default).
    #[default]
    Vertex,
    /// Buffer advances once per instance.
    Instance,
}

/// Describes a single vertex buffer binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexInputBinding {
    /// Slot the buffer is bound to.
    pub binding: u32,
    /// Stride in bytes between consecutive elements.
    pub stride: u32,
    /// How the buffer advances.
    pub input_rate: VertexInputRate,
}

impl VertexInputBinding {
    /// Create a per-vertex binding.
    pub fn new(binding: u32, stride: u32) -> Self {
        Self {
            binding,
            stride,
            input_rate: VertexInputRate::Vertex,
        }
    }

    /// Create a per-instance binding.
    pub fn per_instance(binding: u32, stride: u32) -> Self {
        Self {
            binding,
            stride,
            input_rate: VertexInputRate::Instance,
        }
    }
}

/// A single vertex attribute description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexInputAttribute {
    /// Shader input location.
    pub location: u32,
    /// Binding this attribute reads from.
    pub binding: u32,
    /// Encoding of the attribute.
    pub format: Format,
    /// Byte offset within one element of the binding.
    pub offset: u32,
}

impl VertexInputAttribute {
    /// Create a new vertex attribute.
    pub fn new(location: u32, binding: u32, format: Format, offset: u32) -> Self {
        Self {
            location,
            binding,
            format,
            offset,
        }
    }
}

/// The vertex buffer bindings and attributes of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VertexInputState {
    /// Buffer bindings, each with its own slot.
    pub bindings: Vec<VertexInputBinding>,
    /// Attributes, each referencing a binding by slot.
    pub attributes: Vec<VertexInputAttribute>,
}

impl VertexInputState {
    /// Create an empty vertex input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding.
    pub fn with_binding(mut self, binding: VertexInputBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, attribute: VertexInputAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// First attribute at `location`.
    pub fn attribute_at_location(&self, location: u32) -> Option<&VertexInputAttribute> {
        self.attributes.iter().find(|attr| attr.location == location)
    }

    /// First binding with slot `binding`.
    pub fn binding(&self, binding: u32) -> Option<&VertexInputBinding> {
        self.bindings.iter().find(|b| b.binding == binding)
    }

    /// Check that every attribute references a declared binding and that no
    /// location or binding slot is declared twice.
    pub fn validate(&self) -> GraphicsResult<()> {
        for (i, binding) in self.bindings.iter().enumerate() {
            if self.bindings[..i].iter().any(|b| b.binding == binding.binding) {
                return Err(GraphicsError::InvalidVertexInput(format!(
                    "binding {} declared more than once",
                    binding.binding
                )));
            }
        }
        for (i, attr) in self.attributes.iter().enumerate() {
            if self.attributes[..i].iter().any(|a| a.location == attr.location) {
                return Err(GraphicsError::InvalidVertexInput(format!(
                    "location {} declared more than once",
                    attr.location
                )));
            }
            if self.binding(attr.binding).is_none() {
                return Err(GraphicsError::InvalidVertexInput(format!(
                    "attribute at location {} references binding {} but it is not declared",
                    attr.location, attr.binding
                )));
            }
        }
        Ok(())
    }
}

impl PipelineState for VertexInputState {
    fn as_vertex_input(&self) -> Option<&VertexInputState> {
        Some(self)
    }
}
