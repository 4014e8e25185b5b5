//! # Strata Core
//!
//! Typed, format-aware data buffers.
//!
//! The [`data`] module holds everything needed to describe and access raw
//! element data independently of any GPU API:
//!
//! - [`Format`] / [`Layout`] - how the bytes of a buffer are encoded
//! - [`Data`] - the shared buffer capability (sizes, extents, mip levels)
//! - [`Array`] - owned, strongly typed buffers (`Vec3Array`, `FloatArray`, ...)
//! - [`ProxyVec3Array`] - zero-copy strided view of another buffer as `Vec3`s
//! - [`DataVisitor`] - double dispatch over the concrete element type
//!
//! [`Format`]: data::Format
//! [`Layout`]: data::Layout
//! [`Data`]: data::Data
//! [`Array`]: data::Array
//! [`ProxyVec3Array`]: data::ProxyVec3Array
//! [`DataVisitor`]: data::DataVisitor

pub mod data;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version. Call once at startup.
pub fn init() {
    log::info!("Strata Core v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
