//! Element and texel format codes.

/// Encoding of a single value stored in a [`Data`](super::Data) buffer.
///
/// Discriminants match the Vulkan `VkFormat` codes so a format can be written
/// to and read back from a stream as a plain `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
#[non_exhaustive]
pub enum Format {
    /// No format set.
    #[default]
    Undefined = 0,

    // 8-bit formats
    /// 8-bit red channel, unsigned normalized.
    R8Unorm = 9,
    /// 8-bit red channel, unsigned integer.
    R8Uint = 13,
    /// 8-bit RGBA channels, unsigned normalized.
    R8G8B8A8Unorm = 37,
    /// 8-bit RGBA channels, sRGB.
    R8G8B8A8Srgb = 43,

    // 16-bit formats
    /// 16-bit red channel, unsigned integer.
    R16Uint = 74,
    /// 16-bit red channel, float.
    R16Sfloat = 76,
    /// 16-bit RGBA channels, float.
    R16G16B16A16Sfloat = 97,

    // 32-bit formats
    /// 32-bit red channel, unsigned integer.
    R32Uint = 98,
    /// 32-bit red channel, signed integer.
    R32Sint = 99,
    /// 32-bit red channel, float.
    R32Sfloat = 100,
    /// 32-bit RG channels, float.
    R32G32Sfloat = 103,
    /// 32-bit RGB channels, unsigned integer.
    R32G32B32Uint = 104,
    /// 32-bit RGB channels, signed integer.
    R32G32B32Sint = 105,
    /// 32-bit RGB channels, float.
    R32G32B32Sfloat = 106,
    /// 32-bit RGBA channels, float.
    R32G32B32A32Sfloat = 109,

    // Block-compressed formats
    /// BC1 RGB, 8 bytes per 4x4 block.
    Bc1RgbUnormBlock = 131,
    /// BC1 RGBA, 8 bytes per 4x4 block.
    Bc1RgbaUnormBlock = 133,
    /// BC3 RGBA, 16 bytes per 4x4 block.
    Bc3UnormBlock = 137,
    /// BC5 RG, 16 bytes per 4x4 block.
    Bc5UnormBlock = 141,
    /// BC7 RGBA, 16 bytes per 4x4 block.
    Bc7UnormBlock = 145,
}

impl Format {
    const ALL: [Format; 21] = [
        Self::Undefined,
        Self::R8Unorm,
        Self::R8Uint,
        Self::R8G8B8A8Unorm,
        Self::R8G8B8A8Srgb,
        Self::R16Uint,
        Self::R16Sfloat,
        Self::R16G16B16A16Sfloat,
        Self::R32Uint,
        Self::R32Sint,
        Self::R32Sfloat,
        Self::R32G32Sfloat,
        Self::R32G32B32Uint,
        Self::R32G32B32Sint,
        Self::R32G32B32Sfloat,
        Self::R32G32B32A32Sfloat,
        Self::Bc1RgbUnormBlock,
        Self::Bc1RgbaUnormBlock,
        Self::Bc3UnormBlock,
        Self::Bc5UnormBlock,
        Self::Bc7UnormBlock,
    ];

    /// The numeric format code.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Look up a format by its numeric code.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.code() == code)
    }

    /// Returns true if one value of this format covers a multi-texel block.
    pub fn is_compressed(self) -> bool {
        matches!(
            self,
            Self::Bc1RgbUnormBlock
                | Self::Bc1RgbaUnormBlock
                | Self::Bc3UnormBlock
                | Self::Bc5UnormBlock
                | Self::Bc7UnormBlock
        )
    }

    /// Returns true for the three-component 32-bit float encoding.
    pub fn is_vec3_f32(self) -> bool {
        self == Self::R32G32B32Sfloat
    }

    /// Texel dimensions of one block (width, height, depth).
    pub fn block_extent(self) -> (u8, u8, u8) {
        if self.is_compressed() {
            (4, 4, 1)
        } else {
            (1, 1, 1)
        }
    }

    /// Size in bytes of one value (one block for compressed formats).
    ///
    /// Returns `None` for [`Format::Undefined`].
    pub fn block_size(self) -> Option<usize> {
        let size = match self {
            Self::Undefined => return None,
            Self::R8Unorm | Self::R8Uint => 1,
            Self::R16Uint | Self::R16Sfloat => 2,
            Self::R8G8B8A8Unorm
            | Self::R8G8B8A8Srgb
            | Self::R32Uint
            | Self::R32Sint
            | Self::R32Sfloat => 4,
            Self::R16G16B16A16Sfloat | Self::R32G32Sfloat => 8,
            Self::R32G32B32Uint | Self::R32G32B32Sint | Self::R32G32B32Sfloat => 12,
            Self::R32G32B32A32Sfloat => 16,
            Self::Bc1RgbUnormBlock | Self::Bc1RgbaUnormBlock => 8,
            Self::Bc3UnormBlock | Self::Bc5UnormBlock | Self::Bc7UnormBlock => 16,
        };
        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lookup() {
        for format in Format::ALL {
            assert_eq!(Format::from_code(format.code()), Some(format));
        }
        assert_eq!(Format::from_code(106), Some(Format::R32G32B32Sfloat));
        assert_eq!(Format::from_code(1_000_000), None);
    }

    #[test]
    fn test_block_size() {
        assert_eq!(Format::Undefined.block_size(), None);
        assert_eq!(Format::R32G32B32Sfloat.block_size(), Some(12));
        assert_eq!(Format::Bc1RgbUnormBlock.block_size(), Some(8));
        assert_eq!(Format::Bc7UnormBlock.block_size(), Some(16));
    }

    #[test]
    fn test_block_extent() {
        assert_eq!(Format::R8Unorm.block_extent(), (1, 1, 1));
        assert_eq!(Format::Bc3UnormBlock.block_extent(), (4, 4, 1));
        assert!(Format::Bc5UnormBlock.is_compressed());
        assert!(!Format::R32G32B32Sfloat.is_compressed());
        assert!(Format::R32G32B32Sfloat.is_vec3_f32());
        assert!(!Format::R32G32B32Uint.is_vec3_f32());
    }
}
