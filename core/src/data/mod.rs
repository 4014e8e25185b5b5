//! Typed, format-polymorphic data buffers.
//!
//! This module provides GPU-agnostic buffer types:
//!
//! - [`Format`] / [`Layout`] - Encoding, mipmapping, block size and origin
//! - [`Data`] - Shared buffer capability implemented by every element type
//! - [`Array`] - Owned typed storage (`FloatArray`, `Vec3Array`, ...)
//! - [`ProxyVec3Array`] - Strided `Vec3` view over another buffer
//! - [`DataVisitor`] - Double dispatch on the concrete element type
//! - [`io`] - Binary stream encoding

mod array;
mod buffer;
mod error;
mod format;
pub mod io;
mod layout;
mod proxy;
mod visitor;

pub use array::{
    Array, ArrayElement, Block64, Block64Array, Block128, Block128Array, FloatArray, UbyteArray,
    UintArray, UshortArray, Vec2Array, Vec3Array, Vec4Array,
};
pub use buffer::{Data, DataList, same_data};
pub use error::{DataError, DataResult};
pub use format::Format;
pub use io::write_data;
pub use layout::{
    Layout, MipmapOffsets, Origin, compute_mipmap_offsets, max_mipmap_levels,
    try_value_count_including_mipmaps, value_count_including_mipmaps,
};
pub use proxy::ProxyVec3Array;
pub use visitor::DataVisitor;
