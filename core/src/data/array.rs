//! Owned, strongly typed buffers.
//!
//! [`Array<T>`] stores values of one element type in a single `Vec<T>`: the
//! base level followed by the rest of the mip chain. One generic type covers
//! 1D, 2D and 3D data; [`Data::dimensions`] reports which one was built.
//!
//! # Example
//!
//! ```
//! use strata_core::data::{Data, Vec3Array};
//! use glam::Vec3;
//!
//! let positions = Vec3Array::from_vec(vec![Vec3::X, Vec3::Y, Vec3::Z]);
//! assert_eq!(positions.value_size(), 12);
//! assert_eq!(positions.data_size().unwrap(), 36);
//! ```

use std::fmt;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

use super::buffer::Data;
use super::error::{DataError, DataResult};
use super::format::Format;
use super::layout::{Layout, try_value_count_including_mipmaps};
use super::visitor::DataVisitor;

/// A value type that can be stored in an [`Array`].
pub trait ArrayElement: Pod + fmt::Debug + Send + Sync + 'static {
    /// Format used when the caller's layout leaves the format undefined.
    const DEFAULT_FORMAT: Format;

    /// Call the [`DataVisitor`] overload for this element type.
    fn dispatch(array: Arc<Array<Self>>, visitor: &mut dyn DataVisitor);
}

/// One 64-bit block of compressed texel data.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Block64(pub [u8; 8]);

/// One 128-bit block of compressed texel data.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Block128(pub [u8; 16]);

macro_rules! array_element {
    ($ty:ty, $format:expr, $apply:ident) => {
        impl ArrayElement for $ty {
            const DEFAULT_FORMAT: Format = $format;

            fn dispatch(array: Arc<Array<Self>>, visitor: &mut dyn DataVisitor) {
                visitor.$apply(array);
            }
        }
    };
}

array_element!(u8, Format::R8Unorm, apply_ubyte_array);
array_element!(u16, Format::R16Uint, apply_ushort_array);
array_element!(u32, Format::R32Uint, apply_uint_array);
array_element!(f32, Format::R32Sfloat, apply_float_array);
array_element!(Vec2, Format::R32G32Sfloat, apply_vec2_array);
array_element!(Vec3, Format::R32G32B32Sfloat, apply_vec3_array);
array_element!(Vec4, Format::R32G32B32A32Sfloat, apply_vec4_array);
array_element!(Block64, Format::Bc1RgbUnormBlock, apply_block64_array);
array_element!(Block128, Format::Bc3UnormBlock, apply_block128_array);

pub type UbyteArray = Array<u8>;
pub type UshortArray = Array<u16>;
pub type UintArray = Array<u32>;
pub type FloatArray = Array<f32>;
pub type Vec2Array = Array<Vec2>;
pub type Vec3Array = Array<Vec3>;
pub type Vec4Array = Array<Vec4>;
pub type Block64Array = Array<Block64>;
pub type Block128Array = Array<Block128>;

/// A buffer owning values of type `T`.
pub struct Array<T: ArrayElement> {
    storage: Option<Vec<T>>,
    width: u32,
    height: u32,
    depth: u32,
    dimensions: u32,
    layout: Layout,
}

impl<T: ArrayElement> Array<T> {
    fn zero_filled(dimensions: u32, width: u32, height: u32, depth: u32) -> Self {
        let count = width as usize * height as usize * depth as usize;
        Self {
            storage: Some(vec![T::zeroed(); count]),
            width,
            height,
            depth,
            dimensions,
            layout: Layout::for_format(T::DEFAULT_FORMAT),
        }
    }

    /// Create a zero-filled 1D array.
    pub fn new_1d(width: u32) -> Self {
        Self::zero_filled(1, width, 1, 1)
    }

    /// Create a zero-filled 2D array.
    pub fn new_2d(width: u32, height: u32) -> Self {
        Self::zero_filled(2, width, height, 1)
    }

    /// Create a zero-filled 3D array.
    pub fn new_3d(width: u32, height: u32, depth: u32) -> Self {
        Self::zero_filled(3, width, height, depth)
    }

    /// Create a 1D array from existing values.
    ///
    /// # Panics
    ///
    /// Panics if `values` holds more than `u32::MAX` elements. Use
    /// [`Array::try_from_vec`] for input of unknown length.
    pub fn from_vec(values: Vec<T>) -> Self {
        match Self::try_from_vec(values) {
            Ok(array) => array,
            Err(err) => panic!("{err}"),
        }
    }

    /// Create a 1D array from existing values, failing if the length does not
    /// fit in a `u32` extent.
    pub fn try_from_vec(values: Vec<T>) -> DataResult<Self> {
        let width = extent_for_len(values.len())?;
        Ok(Self {
            storage: Some(values),
            width,
            height: 1,
            depth: 1,
            dimensions: 1,
            layout: Layout::for_format(T::DEFAULT_FORMAT),
        })
    }

    /// Create a 2D array from existing values in row-major order.
    pub fn from_vec_2d(width: u32, height: u32, values: Vec<T>) -> DataResult<Self> {
        let layout = Layout::for_format(T::DEFAULT_FORMAT);
        Self::from_parts(2, [width, height, 1], layout, values)
    }

    /// Create a 3D array from existing values, slice by slice in row-major order.
    pub fn from_vec_3d(width: u32, height: u32, depth: u32, values: Vec<T>) -> DataResult<Self> {
        let layout = Layout::for_format(T::DEFAULT_FORMAT);
        Self::from_parts(3, [width, height, depth], layout, values)
    }

    /// Create an array whose `values` already hold the full mip chain of `layout`.
    pub fn from_parts(
        dimensions: u32,
        extent: [u32; 3],
        layout: Layout,
        values: Vec<T>,
    ) -> DataResult<Self> {
        let [width, height, depth] = extent;
        if !(1..=3).contains(&dimensions) {
            return Err(DataError::InvalidLayout(format!(
                "dimensions must be 1, 2 or 3, got {dimensions}"
            )));
        }
        let layout = layout.merged_over(&Layout::for_format(T::DEFAULT_FORMAT));
        layout.validate_for_extent(width, height, depth)?;
        let expected = try_value_count_including_mipmaps(width, height, depth, &layout)?;
        if values.len() != expected {
            return Err(DataError::StorageMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            storage: Some(values),
            width,
            height,
            depth,
            dimensions,
            layout,
        })
    }

    /// Apply a layout, consuming and returning the array.
    pub fn with_layout(mut self, layout: Layout) -> DataResult<Self> {
        self.set_layout(layout)?;
        Ok(self)
    }

    /// All values, mip levels included.
    pub fn as_slice(&self) -> DataResult<&[T]> {
        self.storage.as_deref().ok_or(DataError::Released)
    }

    /// All values, mip levels included.
    pub fn as_mut_slice(&mut self) -> DataResult<&mut [T]> {
        self.storage.as_deref_mut().ok_or(DataError::Released)
    }

    /// Read the value at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.storage.as_ref()?.get(index).copied()
    }

    /// Write the value at `index`.
    pub fn set(&mut self, index: usize, value: T) -> DataResult<()> {
        let storage = self.storage.as_mut().ok_or(DataError::Released)?;
        let size = storage.len() * std::mem::size_of::<T>();
        let slot = storage.get_mut(index).ok_or(DataError::OutOfBounds {
            end: (index + 1) * std::mem::size_of::<T>(),
            size,
        })?;
        *slot = value;
        Ok(())
    }

    /// Take the typed storage, leaving the array empty.
    pub fn release(&mut self) -> DataResult<Vec<T>> {
        self.storage.take().ok_or(DataError::Released)
    }

    /// Returns true once the storage has been released.
    pub fn is_released(&self) -> bool {
        self.storage.is_none()
    }
}

impl<T: ArrayElement> Data for Array<T> {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn set_layout(&mut self, layout: Layout) -> DataResult<()> {
        let layout = layout.merged_over(&self.layout);
        layout.validate_for_extent(self.width, self.height, self.depth)?;
        let storage = self.storage.as_mut().ok_or(DataError::Released)?;
        let required =
            try_value_count_including_mipmaps(self.width, self.height, self.depth, &layout)?;
        if storage.len() != required {
            log::trace!(
                "Resizing array storage from {} to {} values for {} mip levels",
                storage.len(),
                required,
                layout.mip_level_count()
            );
            storage.resize(required, T::zeroed());
        }
        self.layout = layout;
        Ok(())
    }

    fn set_format(&mut self, format: Format) {
        self.layout.format = format;
    }

    fn value_size(&self) -> usize {
        std::mem::size_of::<T>()
    }

    fn value_count(&self) -> DataResult<usize> {
        if self.storage.is_none() {
            return Err(DataError::Released);
        }
        Ok(self.width as usize * self.height as usize * self.depth as usize)
    }

    fn data_size(&self) -> DataResult<usize> {
        Ok(self.as_slice()?.len() * std::mem::size_of::<T>())
    }

    fn data_bytes(&self) -> DataResult<&[u8]> {
        Ok(bytemuck::cast_slice(self.as_slice()?))
    }

    fn data_bytes_mut(&mut self) -> DataResult<&mut [u8]> {
        Ok(bytemuck::cast_slice_mut(self.as_mut_slice()?))
    }

    /// Byte elements hand over their allocation unchanged. Wider element types
    /// are aligned more strictly than `u8`, so their values are copied into a
    /// fresh byte vector; [`Array::release`] returns them without a copy.
    fn data_release(&mut self) -> DataResult<Vec<u8>> {
        let values = self.release()?;
        Ok(match bytemuck::allocation::try_cast_vec::<T, u8>(values) {
            Ok(bytes) => bytes,
            Err((_, values)) => bytemuck::cast_slice(&values).to_vec(),
        })
    }

    fn dimensions(&self) -> u32 {
        self.dimensions
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn depth(&self) -> u32 {
        self.depth
    }

    fn accept(self: Arc<Self>, visitor: &mut dyn DataVisitor) {
        T::dispatch(self, visitor);
    }
}

fn extent_for_len(len: usize) -> DataResult<u32> {
    u32::try_from(len).map_err(|_| {
        DataError::InvalidLayout(format!("{len} values exceed the largest 1D extent"))
    })
}

impl<T: ArrayElement> Default for Array<T> {
    fn default() -> Self {
        Self::from_vec(Vec::new())
    }
}

impl<T: ArrayElement> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("element", &std::any::type_name::<T>())
            .field("dimensions", &self.dimensions)
            .field("extent", &[self.width, self.height, self.depth])
            .field("layout", &self.layout)
            .field("stored_values", &self.storage.as_ref().map(Vec::len))
            .finish()
    }
}

static_assertions::assert_impl_all!(Vec3Array: Send, Sync);
static_assertions::assert_impl_all!(Block64Array: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_arrays() {
        let array = FloatArray::new_2d(4, 3);
        assert_eq!(array.dimensions(), 2);
        assert_eq!((array.width(), array.height(), array.depth()), (4, 3, 1));
        assert_eq!(array.value_size(), 4);
        assert_eq!(array.value_count().unwrap(), 12);
        assert_eq!(array.data_size().unwrap(), 48);
        assert_eq!(array.format(), Format::R32Sfloat);

        let volume = UbyteArray::new_3d(2, 2, 2);
        assert_eq!(volume.dimensions(), 3);
        assert_eq!(volume.data_size().unwrap(), 8);
    }

    #[test]
    fn test_default_formats() {
        assert_eq!(Vec3Array::new_1d(1).format(), Format::R32G32B32Sfloat);
        let blocks = Block64Array::new_2d(2, 2);
        assert_eq!(blocks.format(), Format::Bc1RgbUnormBlock);
        assert_eq!(blocks.layout().block_width, 4);
        assert_eq!(blocks.value_size(), 8);
    }

    #[test]
    fn test_from_vec_2d_mismatch() {
        let result = FloatArray::from_vec_2d(2, 2, vec![0.0; 3]);
        assert!(matches!(
            result,
            Err(DataError::StorageMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_from_vec_2d_takes_block_extent_from_format() {
        let built = Block64Array::from_vec_2d(2, 2, vec![Block64::default(); 4]).unwrap();
        let zeroed = Block64Array::new_2d(2, 2);
        assert_eq!(built.layout(), zeroed.layout());

        // 2x2 blocks of 4x4 texels allow 8, 4, 2, 1
        let mipmapped = Layout::for_format(Format::Bc1RgbUnormBlock).with_mipmaps(4);
        let built = built.with_layout(mipmapped).unwrap();
        let zeroed = zeroed.with_layout(mipmapped).unwrap();
        assert_eq!(built.data_size().unwrap(), zeroed.data_size().unwrap());
        assert_eq!(built.compute_mipmap_offsets(), zeroed.compute_mipmap_offsets());

        let volume = Block128Array::from_vec_3d(1, 1, 2, vec![Block128::default(); 2]).unwrap();
        assert_eq!(volume.layout(), Block128Array::new_3d(1, 1, 2).layout());
    }

    #[test]
    fn test_extent_for_len_limit() {
        assert_eq!(extent_for_len(u32::MAX as usize).unwrap(), u32::MAX);
        assert!(matches!(
            extent_for_len(u32::MAX as usize + 1),
            Err(DataError::InvalidLayout(_))
        ));
        let array = UbyteArray::try_from_vec(vec![1, 2, 3]).unwrap();
        assert_eq!(array.width(), 3);
    }

    #[test]
    fn test_set_layout_grows_mip_chain() {
        let array = FloatArray::new_2d(8, 8)
            .with_layout(Layout::new().with_mipmaps(4))
            .unwrap();
        assert_eq!(array.value_count().unwrap(), 64);
        assert_eq!(array.data_size().unwrap(), (64 + 16 + 4 + 1) * 4);
        // Undefined format in the new layout keeps the element default
        assert_eq!(array.format(), Format::R32Sfloat);
    }

    #[test]
    fn test_set_layout_rejects_too_many_mipmaps() {
        let mut array = FloatArray::new_2d(4, 4);
        let err = array.set_layout(Layout::new().with_mipmaps(4)).unwrap_err();
        assert!(matches!(err, DataError::InvalidLayout(_)));
        assert_eq!(array.layout().max_num_mipmaps, 0);
    }

    #[test]
    #[allow(deprecated)]
    fn test_legacy_format_survives_set_layout() {
        let mut array = UbyteArray::new_1d(16);
        array.set_format(Format::R8G8B8A8Srgb);
        array
            .set_layout(Layout::new().with_origin(crate::data::Origin::BOTTOM_LEFT))
            .unwrap();
        assert_eq!(array.format(), Format::R8G8B8A8Srgb);
        assert_eq!(array.layout().origin, crate::data::Origin::BOTTOM_LEFT);
    }

    #[test]
    fn test_mipmap_offsets_sum_to_data_size() {
        let array = UintArray::new_2d(16, 8)
            .with_layout(Layout::new().with_mipmaps(5))
            .unwrap();
        let offsets = array.compute_mipmap_offsets();
        assert_eq!(offsets.len(), 5);
        assert_eq!(offsets[0], 0);
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));

        let level_sizes: usize = (0..offsets.len())
            .map(|level| array.mipmap_bytes(level).unwrap().len())
            .sum();
        assert_eq!(level_sizes, array.data_size().unwrap());
    }

    #[test]
    fn test_mipmap_bytes_out_of_range() {
        let array = FloatArray::new_2d(4, 4)
            .with_layout(Layout::new().with_mipmaps(3))
            .unwrap();
        assert_eq!(array.mipmap_bytes(2).unwrap().len(), 4);
        assert!(matches!(
            array.mipmap_bytes(3),
            Err(DataError::MipLevelOutOfRange {
                level: 3,
                level_count: 3
            })
        ));
    }

    #[test]
    fn test_mipmap_bytes_mut_writes_level() {
        let mut array = UbyteArray::new_2d(4, 4)
            .with_layout(Layout::new().with_mipmaps(2))
            .unwrap();
        array.mipmap_bytes_mut(1).unwrap().fill(7);
        let values = array.as_slice().unwrap();
        assert!(values[..16].iter().all(|v| *v == 0));
        assert!(values[16..].iter().all(|v| *v == 7));
    }

    #[test]
    fn test_data_release() {
        let mut array = FloatArray::from_vec(vec![1.0, 2.0]);
        let bytes = array.data_release().unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytemuck::pod_read_unaligned::<f32>(&bytes[4..8]), 2.0);

        assert!(array.is_released());
        assert!(matches!(array.data_size(), Err(DataError::Released)));
        assert!(matches!(array.value_count(), Err(DataError::Released)));
        assert!(matches!(array.data_bytes(), Err(DataError::Released)));
        assert!(matches!(array.data_release(), Err(DataError::Released)));
        assert!(matches!(
            array.set_layout(Layout::new()),
            Err(DataError::Released)
        ));
    }

    #[test]
    fn test_data_release_bytes() {
        let mut bytes = UbyteArray::from_vec(vec![1, 2, 3, 4]);
        let address = bytes.as_slice().unwrap().as_ptr();
        let released = bytes.data_release().unwrap();
        assert_eq!(released.as_ptr(), address);
        assert_eq!(released, vec![1, 2, 3, 4]);

        let mut floats = Vec3Array::from_vec(vec![Vec3::new(1.0, 2.0, 3.0), Vec3::ONE]);
        let expected = floats.data_bytes().unwrap().to_vec();
        assert_eq!(floats.data_release().unwrap(), expected);
    }

    #[test]
    fn test_typed_access() {
        let mut array = Vec3Array::new_1d(2);
        array.set(1, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(array.get(1), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(array.get(2), None);
        assert!(matches!(
            array.set(2, Vec3::ZERO),
            Err(DataError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_debug_does_not_dump_values() {
        let array = FloatArray::new_1d(1024);
        let debug = format!("{:?}", array);
        assert!(debug.contains("Array"));
        assert!(debug.contains("1024"));
    }
}
