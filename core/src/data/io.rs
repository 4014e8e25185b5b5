//! Binary stream encoding of buffers.
//!
//! A buffer is written as a fixed header followed by its raw bytes:
//!
//! | field                                   | encoding        |
//! |-----------------------------------------|-----------------|
//! | format code                             | `u32` LE        |
//! | mip count, block w/h/d, origin bits     | 5 x `u8`        |
//! | dimensions                              | `u8`            |
//! | width, height, depth                    | 3 x `u32` LE    |
//! | payload length in bytes                 | `u64` LE        |
//! | payload (every mip level)               | raw values      |
//!
//! The payload is copied as-is, so values keep the byte order of the host
//! that wrote them.
//!
//! Readers size nothing from the header alone: the payload is pulled through
//! a reader capped at the declared length, so a stream that claims more bytes
//! than it carries fails with an I/O error once the data runs out.

use std::io::{self, Read, Write};

use super::array::{Array, ArrayElement};
use super::buffer::Data;
use super::error::{DataError, DataResult};
use super::format::Format;
use super::layout::{Layout, Origin, try_value_count_including_mipmaps};

/// Write `data` with its layout and extents to `writer`.
pub fn write_data<W: Write>(data: &dyn Data, writer: &mut W) -> DataResult<()> {
    let layout = data.layout();
    let bytes = data.data_bytes()?;

    writer.write_all(&layout.format.code().to_le_bytes())?;
    writer.write_all(&[
        layout.max_num_mipmaps,
        layout.block_width,
        layout.block_height,
        layout.block_depth,
        layout.origin.bits(),
        data.dimensions() as u8,
    ])?;
    for extent in [data.width(), data.height(), data.depth()] {
        writer.write_all(&extent.to_le_bytes())?;
    }
    writer.write_all(&(bytes.len() as u64).to_le_bytes())?;
    writer.write_all(bytes)?;

    log::trace!(
        "Wrote {:?} buffer {}x{}x{} ({} bytes)",
        layout.format,
        data.width(),
        data.height(),
        data.depth(),
        bytes.len()
    );
    Ok(())
}

fn read_u32<R: Read>(reader: &mut R) -> DataResult<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(reader: &mut R) -> DataResult<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

impl<T: ArrayElement> Array<T> {
    /// Read an array written by [`write_data`].
    ///
    /// The declared payload length must match the extents and layout in the
    /// header. Extents whose size overflows fail with
    /// [`DataError::InvalidLayout`].
    pub fn read_from<R: Read>(reader: &mut R) -> DataResult<Self> {
        let code = read_u32(reader)?;
        let format = Format::from_code(code).ok_or(DataError::UnknownFormat(code))?;

        let mut fields = [0u8; 6];
        reader.read_exact(&mut fields)?;
        let [max_num_mipmaps, block_width, block_height, block_depth, origin_bits, dimensions] =
            fields;
        let origin = Origin::from_bits(origin_bits).ok_or_else(|| {
            DataError::InvalidLayout(format!("unknown origin bits {origin_bits:#04x}"))
        })?;
        let layout = Layout {
            format,
            max_num_mipmaps,
            block_width,
            block_height,
            block_depth,
            origin,
        };

        let width = read_u32(reader)?;
        let height = read_u32(reader)?;
        let depth = read_u32(reader)?;
        layout.validate_for_extent(width, height, depth)?;

        let declared = read_u64(reader)?;
        let value_size = std::mem::size_of::<T>();
        let expected = try_value_count_including_mipmaps(width, height, depth, &layout)?;
        let expected_bytes = expected.checked_mul(value_size).ok_or_else(|| {
            DataError::InvalidLayout(format!(
                "{expected} values of {value_size} bytes overflow the address space"
            ))
        })?;
        if declared != expected_bytes as u64 {
            return Err(DataError::StorageMismatch {
                expected,
                actual: usize::try_from(declared / value_size as u64).unwrap_or(usize::MAX),
            });
        }

        let mut bytes = Vec::new();
        reader.by_ref().take(declared).read_to_end(&mut bytes)?;
        if bytes.len() != expected_bytes {
            return Err(DataError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("payload ended after {} of {expected_bytes} bytes", bytes.len()),
            )));
        }
        let values: Vec<T> = bytemuck::pod_collect_to_vec(&bytes);

        Self::from_parts(u32::from(dimensions), [width, height, depth], layout, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Block64, Block64Array, FloatArray, UbyteArray, Vec3Array};
    use glam::Vec3;
    use std::io::Cursor;

    #[test]
    fn test_round_trip_preserves_layout_and_values() {
        let mut array = FloatArray::new_2d(4, 4)
            .with_layout(
                Layout::new()
                    .with_mipmaps(3)
                    .with_origin(Origin::BOTTOM_LEFT),
            )
            .unwrap();
        for (i, value) in array.as_mut_slice().unwrap().iter_mut().enumerate() {
            *value = i as f32 * 0.5;
        }

        let mut stream = Vec::new();
        write_data(&array, &mut stream).unwrap();
        let read = FloatArray::read_from(&mut Cursor::new(stream)).unwrap();

        assert_eq!(read.layout(), array.layout());
        assert_eq!(read.dimensions(), 2);
        assert_eq!((read.width(), read.height(), read.depth()), (4, 4, 1));
        assert_eq!(read.as_slice().unwrap(), array.as_slice().unwrap());
    }

    #[test]
    fn test_round_trip_compressed_blocks() {
        let mut array = Block64Array::new_2d(2, 2);
        array.set(3, Block64([1, 2, 3, 4, 5, 6, 7, 8])).unwrap();

        let mut stream = Vec::new();
        write_data(&array, &mut stream).unwrap();
        let read = Block64Array::read_from(&mut Cursor::new(stream)).unwrap();

        assert_eq!(read.layout().block_width, 4);
        assert_eq!(read.get(3), Some(Block64([1, 2, 3, 4, 5, 6, 7, 8])));
    }

    #[test]
    fn test_unknown_format_code() {
        let mut stream = Vec::new();
        write_data(&UbyteArray::new_1d(4), &mut stream).unwrap();
        stream[..4].copy_from_slice(&7777u32.to_le_bytes());
        let err = UbyteArray::read_from(&mut Cursor::new(stream)).unwrap_err();
        assert!(matches!(err, DataError::UnknownFormat(7777)));
    }

    #[test]
    fn test_element_size_mismatch() {
        let mut stream = Vec::new();
        write_data(&UbyteArray::new_1d(6), &mut stream).unwrap();
        // 6 bytes cannot be 6 Vec3 values
        let err = Vec3Array::read_from(&mut Cursor::new(stream)).unwrap_err();
        assert!(matches!(err, DataError::StorageMismatch { expected: 6, .. }));
    }

    #[test]
    fn test_truncated_stream() {
        let mut stream = Vec::new();
        write_data(&Vec3Array::from_vec(vec![Vec3::ONE; 4]), &mut stream).unwrap();
        stream.truncate(stream.len() - 1);
        let err = Vec3Array::read_from(&mut Cursor::new(stream)).unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }

    fn header(format: Format, extent: [u32; 3], declared: u64) -> Vec<u8> {
        let mut stream = format.code().to_le_bytes().to_vec();
        stream.extend_from_slice(&[0, 1, 1, 1, 0, 2]);
        for value in extent {
            stream.extend_from_slice(&value.to_le_bytes());
        }
        stream.extend_from_slice(&declared.to_le_bytes());
        stream
    }

    #[test]
    fn test_overflowing_extent_rejected() {
        let mut stream = header(Format::R32Sfloat, [u32::MAX, u32::MAX, 1], 16);
        stream.extend_from_slice(&[0u8; 16]);
        let err = FloatArray::read_from(&mut Cursor::new(stream)).unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidLayout(_) | DataError::StorageMismatch { .. }
        ));

        let stream = header(Format::R32Sfloat, [u32::MAX, u32::MAX, u32::MAX], 16);
        let err = FloatArray::read_from(&mut Cursor::new(stream)).unwrap_err();
        assert!(matches!(err, DataError::InvalidLayout(_)));
    }

    #[test]
    fn test_oversized_declared_length_without_payload() {
        // Header is self-consistent but the payload is missing
        let declared = u64::from(u32::MAX) * 2;
        let stream = header(Format::R8Unorm, [u32::MAX, 2, 1], declared);
        let err = UbyteArray::read_from(&mut Cursor::new(stream)).unwrap_err();
        match err {
            DataError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_released_buffer_not_written() {
        let mut array = FloatArray::new_1d(2);
        array.release().unwrap();
        let mut stream = Vec::new();
        assert!(matches!(
            write_data(&array, &mut stream),
            Err(DataError::Released)
        ));
        assert!(stream.is_empty());
    }
}
