//! Double dispatch over concrete buffer element types.
//!
//! A visitor hands itself to [`Data::accept`](super::Data::accept); the
//! buffer then calls the overload for its own element type. Overloads a
//! visitor does not care about fall back to [`DataVisitor::apply_data`], so a
//! visitor only overrides the element types it handles specially.

use std::sync::Arc;

use super::array::{
    Block64Array, Block128Array, FloatArray, UbyteArray, UintArray, UshortArray, Vec2Array,
    Vec3Array, Vec4Array,
};
use super::buffer::Data;

/// Receives a buffer with its concrete element type recovered.
pub trait DataVisitor {
    /// Generic byte-level handler, used for every element type without an override.
    fn apply_data(&mut self, data: Arc<dyn Data>);

    /// Called for arrays of `u8` values.
    fn apply_ubyte_array(&mut self, array: Arc<UbyteArray>) {
        self.apply_data(array);
    }

    /// Called for arrays of `u16` values.
    fn apply_ushort_array(&mut self, array: Arc<UshortArray>) {
        self.apply_data(array);
    }

    /// Called for arrays of `u32` values.
    fn apply_uint_array(&mut self, array: Arc<UintArray>) {
        self.apply_data(array);
    }

    /// Called for arrays of `f32` values.
    fn apply_float_array(&mut self, array: Arc<FloatArray>) {
        self.apply_data(array);
    }

    /// Called for arrays of [`Vec2`](glam::Vec2) values.
    fn apply_vec2_array(&mut self, array: Arc<Vec2Array>) {
        self.apply_data(array);
    }

    /// Called for arrays of [`Vec3`](glam::Vec3) values.
    fn apply_vec3_array(&mut self, array: Arc<Vec3Array>) {
        self.apply_data(array);
    }

    /// Called for arrays of [`Vec4`](glam::Vec4) values.
    fn apply_vec4_array(&mut self, array: Arc<Vec4Array>) {
        self.apply_data(array);
    }

    /// Called for arrays of 64-bit compressed blocks.
    fn apply_block64_array(&mut self, array: Arc<Block64Array>) {
        self.apply_data(array);
    }

    /// Called for arrays of 128-bit compressed blocks.
    fn apply_block128_array(&mut self, array: Arc<Block128Array>) {
        self.apply_data(array);
    }
}
