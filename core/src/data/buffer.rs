//! The [`Data`] buffer capability.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use super::error::{DataError, DataResult};
use super::format::Format;
use super::layout::{Layout, MipmapOffsets, compute_mipmap_offsets};
use super::visitor::DataVisitor;

/// A contiguous block of element data plus the [`Layout`] describing it.
///
/// `Data` is implemented by every concrete element-type buffer. Buffers are
/// shared with `Arc<dyn Data>`; only the owner mutates them, everyone else
/// observes. Extents describe the base level only, while [`data_size`]
/// covers the whole mip chain.
///
/// Size and memory queries fail with [`DataError::Released`] once the memory
/// has been handed out by [`data_release`].
///
/// [`data_size`]: Data::data_size
/// [`data_release`]: Data::data_release
pub trait Data: fmt::Debug + Send + Sync {
    /// Get the layout.
    fn layout(&self) -> Layout;

    /// Replace the layout.
    ///
    /// An undefined format in `layout` keeps the current format (see
    /// [`Layout::merged_over`]).
    fn set_layout(&mut self, layout: Layout) -> DataResult<()>;

    /// Set only the format.
    #[deprecated(note = "set the format through `set_layout` instead")]
    fn set_format(&mut self, format: Format);

    /// Get the format.
    fn format(&self) -> Format {
        self.layout().format
    }

    /// Size in bytes of one value (one block for compressed data).
    fn value_size(&self) -> usize;

    /// Number of values in the base level.
    fn value_count(&self) -> DataResult<usize>;

    /// Total size in bytes across all mip levels.
    fn data_size(&self) -> DataResult<usize>;

    /// The whole buffer as bytes.
    fn data_bytes(&self) -> DataResult<&[u8]>;

    /// The whole buffer as mutable bytes.
    fn data_bytes_mut(&mut self) -> DataResult<&mut [u8]>;

    /// Hand the raw memory to the caller, leaving the buffer empty.
    fn data_release(&mut self) -> DataResult<Vec<u8>>;

    /// Number of dimensions (1 to 3).
    fn dimensions(&self) -> u32;

    /// Base level width in values.
    fn width(&self) -> u32;

    /// Base level height in values.
    fn height(&self) -> u32;

    /// Base level depth in values.
    fn depth(&self) -> u32;

    /// Dispatch to the visitor overload matching the concrete element type.
    fn accept(self: Arc<Self>, visitor: &mut dyn DataVisitor);

    /// Byte offset of each mip level.
    fn compute_mipmap_offsets(&self) -> MipmapOffsets {
        compute_mipmap_offsets(
            self.width(),
            self.height(),
            self.depth(),
            &self.layout(),
            self.value_size(),
        )
    }

    /// Bytes of a single mip level.
    fn mipmap_bytes(&self, level: usize) -> DataResult<&[u8]> {
        let total = self.data_size()?;
        let range = mip_level_range(&self.compute_mipmap_offsets(), level, total)?;
        Ok(&self.data_bytes()?[range])
    }

    /// Mutable bytes of a single mip level.
    fn mipmap_bytes_mut(&mut self, level: usize) -> DataResult<&mut [u8]> {
        let total = self.data_size()?;
        let range = mip_level_range(&self.compute_mipmap_offsets(), level, total)?;
        Ok(&mut self.data_bytes_mut()?[range])
    }
}

/// A list of shared buffers, as supplied by binding commands.
pub type DataList = Vec<Arc<dyn Data>>;

/// Returns true if both handles refer to the same buffer.
pub fn same_data(a: &Arc<dyn Data>, b: &Arc<dyn Data>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

fn mip_level_range(offsets: &MipmapOffsets, level: usize, total: usize) -> DataResult<Range<usize>> {
    let start = *offsets.get(level).ok_or(DataError::MipLevelOutOfRange {
        level,
        level_count: offsets.len(),
    })?;
    let end = offsets.get(level + 1).copied().unwrap_or(total);
    if end > total {
        return Err(DataError::OutOfBounds { end, size: total });
    }
    Ok(start..end)
}
