//! Buffer layout: format, mipmapping, block compression and origin.
//!
//! A [`Layout`] is embedded by value in every [`Data`](super::Data) buffer.
//! Extents of a buffer are always counted in *values*; for block-compressed
//! formats one value is a whole block, so the texel extent of an axis is
//! `value extent * block dim`.
//!
//! The mipmap helpers in this module are pure functions of the extents and
//! the layout, so they are shared by the buffers themselves and by stream
//! readers that need to size storage before a buffer exists.

use bitflags::bitflags;

use super::error::{DataError, DataResult};
use super::format::Format;

bitflags! {
    /// Axes flipped relative to the top-left image origin.
    ///
    /// Only a hint for setting up texture coordinates; storage is unaffected.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Origin: u8 {
        /// X/width axis runs right to left.
        const FLIP_X = 1 << 0;
        /// Y/height axis runs bottom to top.
        const FLIP_Y = 1 << 1;
        /// Z/depth axis is reversed.
        const FLIP_Z = 1 << 2;
    }
}

impl Origin {
    /// Top-left origin (the Vulkan image convention).
    pub const TOP_LEFT: Self = Self::empty();
    /// Bottom-left origin (the OpenGL image convention).
    pub const BOTTOM_LEFT: Self = Self::FLIP_Y;
}

impl Default for Origin {
    fn default() -> Self {
        Self::TOP_LEFT
    }
}

/// Describes how the bytes of a buffer are encoded.
///
/// The default is uncompressed data without mipmaps: blocks of 1x1x1, a
/// top-left origin and an undefined format.
///
/// # Example
///
/// ```
/// use strata_core::data::{Format, Layout};
///
/// let layout = Layout::for_format(Format::Bc1RgbUnormBlock).with_mipmaps(4);
/// assert_eq!(layout.block_width, 4);
/// assert_eq!(layout.mip_level_count(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    /// Encoding of each value.
    pub format: Format,
    /// Number of mip levels; 0 and 1 both mean no mipmapping.
    pub max_num_mipmaps: u8,
    /// Texels per value along x.
    pub block_width: u8,
    /// Texels per value along y.
    pub block_height: u8,
    /// Texels per value along z.
    pub block_depth: u8,
    /// Texel origin hint.
    pub origin: Origin,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            format: Format::Undefined,
            max_num_mipmaps: 0,
            block_width: 1,
            block_height: 1,
            block_depth: 1,
            origin: Origin::TOP_LEFT,
        }
    }
}

impl Layout {
    /// Create the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layout for `format`, taking block dims from the format.
    pub fn for_format(format: Format) -> Self {
        let (block_width, block_height, block_depth) = format.block_extent();
        Self {
            format,
            block_width,
            block_height,
            block_depth,
            ..Self::default()
        }
    }

    /// Set the format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the number of mip levels.
    pub fn with_mipmaps(mut self, max_num_mipmaps: u8) -> Self {
        self.max_num_mipmaps = max_num_mipmaps;
        self
    }

    /// Set the block dimensions.
    pub fn with_block(mut self, width: u8, height: u8, depth: u8) -> Self {
        self.block_width = width;
        self.block_height = height;
        self.block_depth = depth;
        self
    }

    /// Set the origin hint.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Number of levels stored, including the base level.
    pub fn mip_level_count(&self) -> usize {
        usize::from(self.max_num_mipmaps.max(1))
    }

    /// Returns true if one value covers more than one texel.
    pub fn is_block_compressed(&self) -> bool {
        self.block_width > 1 || self.block_height > 1 || self.block_depth > 1
    }

    /// Check the layout on its own.
    pub fn validate(&self) -> DataResult<()> {
        if self.block_width == 0 || self.block_height == 0 || self.block_depth == 0 {
            return Err(DataError::InvalidLayout(format!(
                "block dimensions must be at least 1, got {}x{}x{}",
                self.block_width, self.block_height, self.block_depth
            )));
        }
        Ok(())
    }

    /// Check the layout against the value extents of a buffer.
    ///
    /// Empty buffers (any extent of 0) only get the block check.
    pub fn validate_for_extent(&self, width: u32, height: u32, depth: u32) -> DataResult<()> {
        self.validate()?;
        if width == 0 || height == 0 || depth == 0 {
            return Ok(());
        }
        let max_levels = max_mipmap_levels(width, height, depth, self);
        if self.mip_level_count() > max_levels {
            return Err(DataError::InvalidLayout(format!(
                "{} mip levels requested but a {}x{}x{} buffer supports at most {}",
                self.max_num_mipmaps, width, height, depth, max_levels
            )));
        }
        Ok(())
    }

    /// Apply this layout on top of `previous`.
    ///
    /// Callers that set the format through the legacy single-field setter and
    /// then assign a layout with an undefined format keep their format.
    pub fn merged_over(self, previous: &Layout) -> Layout {
        let mut layout = self;
        if layout.format == Format::Undefined && previous.format != Format::Undefined {
            layout.format = previous.format;
        }
        layout
    }
}

/// Byte offsets of each mip level, level 0 first.
pub type MipmapOffsets = Vec<usize>;

/// Largest mip level count a buffer of these value extents can hold.
///
/// This is `floor(log2(max texel extent)) + 1`.
pub fn max_mipmap_levels(width: u32, height: u32, depth: u32, layout: &Layout) -> usize {
    let texels = [
        u64::from(width) * u64::from(layout.block_width),
        u64::from(height) * u64::from(layout.block_height),
        u64::from(depth) * u64::from(layout.block_depth),
    ];
    let largest = texels.into_iter().max().unwrap_or(0).max(1);
    (u64::BITS - largest.leading_zeros()) as usize
}

/// Value extents of every level of the mip chain.
///
/// Each level halves the texel extent (floor, minimum one texel) and rounds up
/// to whole blocks. Extents are kept in `u64` so `u32` extents times `u8`
/// blocks never overflow.
fn level_extents(width: u32, height: u32, depth: u32, layout: &Layout) -> Vec<[u64; 3]> {
    let blocks = [
        u64::from(layout.block_width.max(1)),
        u64::from(layout.block_height.max(1)),
        u64::from(layout.block_depth.max(1)),
    ];
    let mut texels = [
        u64::from(width) * blocks[0],
        u64::from(height) * blocks[1],
        u64::from(depth) * blocks[2],
    ];

    let mut levels = Vec::with_capacity(layout.mip_level_count());
    for _ in 0..layout.mip_level_count() {
        levels.push([
            texels[0].div_ceil(blocks[0]),
            texels[1].div_ceil(blocks[1]),
            texels[2].div_ceil(blocks[2]),
        ]);
        for axis in &mut texels {
            if *axis > 1 {
                *axis /= 2;
            }
        }
    }
    levels
}

/// Total number of values across the whole mip chain.
///
/// Fails with [`DataError::InvalidLayout`] when the count does not fit in a
/// `usize`. Use this for extents that come from untrusted input.
pub fn try_value_count_including_mipmaps(
    width: u32,
    height: u32,
    depth: u32,
    layout: &Layout,
) -> DataResult<usize> {
    let overflow = || {
        DataError::InvalidLayout(format!(
            "value count of a {width}x{height}x{depth} buffer with {} mip levels overflows",
            layout.mip_level_count()
        ))
    };
    let mut total: u64 = 0;
    for [w, h, d] in level_extents(width, height, depth, layout) {
        let level = w
            .checked_mul(h)
            .and_then(|wh| wh.checked_mul(d))
            .ok_or_else(overflow)?;
        total = total.checked_add(level).ok_or_else(overflow)?;
    }
    usize::try_from(total).map_err(|_| overflow())
}

/// Total number of values across the whole mip chain.
///
/// Saturates at `usize::MAX`; see [`try_value_count_including_mipmaps`].
pub fn value_count_including_mipmaps(width: u32, height: u32, depth: u32, layout: &Layout) -> usize {
    try_value_count_including_mipmaps(width, height, depth, layout).unwrap_or(usize::MAX)
}

/// Byte offset of each mip level inside a buffer.
///
/// Returns one entry per level; the first is always 0.
pub fn compute_mipmap_offsets(
    width: u32,
    height: u32,
    depth: u32,
    layout: &Layout,
    value_size: usize,
) -> MipmapOffsets {
    let mut offsets = Vec::with_capacity(layout.mip_level_count());
    let mut position: usize = 0;
    for [w, h, d] in level_extents(width, height, depth, layout) {
        offsets.push(position);
        let values = usize::try_from(w.saturating_mul(h).saturating_mul(d)).unwrap_or(usize::MAX);
        position = position.saturating_add(values.saturating_mul(value_size));
    }
    offsets
}
