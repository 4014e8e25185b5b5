//! Zero-copy strided view of a buffer as `Vec3` values.
//!
//! [`ProxyVec3Array`] borrows nothing: it keeps a shared handle to its source
//! and four numbers. Element `i` is read on demand from bytes
//! `[offset + i * stride, offset + i * stride + 12)` of the source, so an
//! interleaved vertex buffer of any element type can be walked as positions.
//!
//! The proxy caches nothing derived from the source. When the owner changes
//! the source's layout or memory it must `assign` the proxy again (or drop
//! it); the shared handle keeps the source alive in the meantime.

use std::sync::Arc;

use glam::Vec3;

use super::buffer::{Data, same_data};
use super::error::{DataError, DataResult};
use super::layout::Layout;

const VEC3_SIZE: usize = std::mem::size_of::<Vec3>();

/// Reinterprets a strided region of another buffer as a `Vec3` sequence.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use strata_core::data::{Data, FloatArray, ProxyVec3Array};
///
/// // Interleaved position (3 floats) + uv (2 floats) for two vertices.
/// let interleaved: Arc<dyn Data> = Arc::new(FloatArray::from_vec(vec![
///     0.0, 1.0, 2.0, 0.5, 0.5, //
///     3.0, 4.0, 5.0, 1.0, 1.0,
/// ]));
/// let layout = interleaved.layout();
/// let positions = ProxyVec3Array::from_source(interleaved, 0, 20, 2, layout).unwrap();
/// assert_eq!(positions.get(1).unwrap().to_array(), [3.0, 4.0, 5.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProxyVec3Array {
    source: Option<Arc<dyn Data>>,
    offset: usize,
    stride: usize,
    count: usize,
    layout: Layout,
}

impl ProxyVec3Array {
    /// Create an empty proxy with no source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a proxy over `source`.
    pub fn from_source(
        source: Arc<dyn Data>,
        offset: usize,
        stride: usize,
        count: usize,
        layout: Layout,
    ) -> DataResult<Self> {
        let mut proxy = Self::new();
        proxy.assign(source, offset, stride, count, layout)?;
        Ok(proxy)
    }

    /// Point the proxy at `count` elements of `source`, `stride` bytes apart,
    /// starting `offset` bytes in.
    ///
    /// Fails with [`DataError::ZeroStride`] when more than one element would
    /// share the same bytes, and with [`DataError::OutOfBounds`] when the last
    /// element would end past the source. The proxy is left empty on failure.
    pub fn assign(
        &mut self,
        source: Arc<dyn Data>,
        offset: usize,
        stride: usize,
        count: usize,
        layout: Layout,
    ) -> DataResult<()> {
        self.clear();

        if stride == 0 && count > 1 {
            return Err(DataError::ZeroStride { count });
        }
        if count > 0 {
            let size = source.data_size()?;
            let end = (count - 1)
                .checked_mul(stride)
                .and_then(|span| span.checked_add(offset))
                .and_then(|start| start.checked_add(VEC3_SIZE))
                .unwrap_or(usize::MAX);
            if end > size {
                return Err(DataError::OutOfBounds { end, size });
            }
        }

        self.source = Some(source);
        self.offset = offset;
        self.stride = stride;
        self.count = count;
        self.layout = layout;
        Ok(())
    }

    /// Drop the source and reset every parameter.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the proxy has no elements.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Byte offset of the first element.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes between consecutive elements.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Layout adopted from the source.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// The buffer being viewed.
    pub fn source(&self) -> Option<&Arc<dyn Data>> {
        self.source.as_ref()
    }

    /// Read element `index`.
    pub fn get(&self, index: usize) -> Option<Vec3> {
        if index >= self.count {
            return None;
        }
        let bytes = self.source.as_ref()?.data_bytes().ok()?;
        let start = self.offset + index * self.stride;
        let raw = bytes.get(start..start + VEC3_SIZE)?;
        Some(Vec3::from_array(bytemuck::pod_read_unaligned::<[f32; 3]>(raw)))
    }

    /// Iterate over all elements.
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.count).filter_map(move |index| self.get(index))
    }

    /// Copy all elements out.
    pub fn to_vec(&self) -> Vec<Vec3> {
        self.iter().collect()
    }
}

impl PartialEq for ProxyVec3Array {
    fn eq(&self, other: &Self) -> bool {
        let same_source = match (&self.source, &other.source) {
            (Some(a), Some(b)) => same_data(a, b),
            (None, None) => true,
            _ => false,
        };
        same_source
            && self.offset == other.offset
            && self.stride == other.stride
            && self.count == other.count
            && self.layout == other.layout
    }
}

static_assertions::assert_impl_all!(ProxyVec3Array: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Block64Array, UbyteArray};

    /// Ten 32-byte records where record `i` holds floats `i*8 .. i*8+8`.
    fn records() -> Arc<dyn Data> {
        let floats: Vec<f32> = (0..80).map(|v| v as f32).collect();
        let bytes: Vec<u8> = bytemuck::cast_slice(&floats).to_vec();
        Arc::new(UbyteArray::from_vec(bytes))
    }

    #[test]
    fn test_readback_matches_source_bytes() {
        let source = records();
        let proxy = ProxyVec3Array::from_source(source.clone(), 4, 32, 9, source.layout()).unwrap();
        assert_eq!(proxy.len(), 9);

        let bytes = source.data_bytes().unwrap();
        for i in 0..9 {
            let start = 4 + 32 * i;
            let expected: [f32; 3] = bytemuck::pod_read_unaligned(&bytes[start..start + 12]);
            assert_eq!(proxy.get(i).unwrap().to_array(), expected);
        }
        assert_eq!(proxy.get(1).unwrap().to_array(), [9.0, 10.0, 11.0]);
        assert_eq!(proxy.get(9), None);
    }

    #[test]
    fn test_unaligned_offset() {
        let source = records();
        let proxy = ProxyVec3Array::from_source(source.clone(), 1, 32, 2, source.layout()).unwrap();
        let bytes = source.data_bytes().unwrap();
        let expected: [f32; 3] = bytemuck::pod_read_unaligned(&bytes[33..45]);
        assert_eq!(proxy.get(1).unwrap().to_array(), expected);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let source = records();
        // 11 elements would end at 4 + 10 * 32 + 12 = 336
        let err = ProxyVec3Array::from_source(source.clone(), 4, 32, 11, source.layout()).unwrap_err();
        assert!(matches!(err, DataError::OutOfBounds { end: 336, size: 320 }));

        let err = ProxyVec3Array::from_source(source.clone(), 310, 32, 1, source.layout()).unwrap_err();
        assert!(matches!(err, DataError::OutOfBounds { .. }));
    }

    #[test]
    fn test_zero_stride_rejected() {
        let source = records();
        let err = ProxyVec3Array::from_source(source.clone(), 0, 0, 2, source.layout()).unwrap_err();
        assert!(matches!(err, DataError::ZeroStride { count: 2 }));

        // A single element does not alias anything
        let single = ProxyVec3Array::from_source(source.clone(), 0, 0, 1, source.layout()).unwrap();
        assert_eq!(single.to_vec(), vec![Vec3::new(0.0, 1.0, 2.0)]);
    }

    #[test]
    fn test_failed_assign_clears() {
        let source = records();
        let mut proxy = ProxyVec3Array::from_source(source.clone(), 0, 32, 2, source.layout()).unwrap();
        assert!(proxy.assign(source.clone(), 0, 32, 100, source.layout()).is_err());
        assert!(proxy.is_empty());
        assert!(proxy.source().is_none());
        assert_eq!(proxy, ProxyVec3Array::new());
    }

    #[test]
    fn test_adopts_source_layout() {
        let source: Arc<dyn Data> = Arc::new(Block64Array::new_2d(4, 4));
        let proxy = ProxyVec3Array::from_source(source.clone(), 0, 8, 15, source.layout()).unwrap();
        assert_eq!(proxy.layout(), source.layout());
        assert_eq!(proxy.iter().count(), 15);
    }

    #[test]
    fn test_keeps_source_alive() {
        let source = records();
        let proxy = ProxyVec3Array::from_source(source.clone(), 0, 32, 10, source.layout()).unwrap();
        drop(source);
        assert_eq!(proxy.get(9).unwrap().to_array(), [72.0, 73.0, 74.0]);
    }
}
