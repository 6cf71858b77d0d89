use crate::{Error, Reader, Result};

/// Size of the fixed chunk header written by this crate.
pub const CHUNK_HEADER_SIZE: usize = 0x20;
/// Chunks written with [`sector_padding`] end on multiples of this.
pub const SECTOR_SIZE: u64 = 0x800;

const HEADER_BLOCK: usize = 0x80;

// Seek info table reserved after the video stream header:
// chunk header, @UTF table header, then the column descriptors of
// ofs_byte (u64), ofs_frmid (u32) and the constant num_skip / resv columns.
const SEEK_TABLE_FIXED: usize = CHUNK_HEADER_SIZE + 0x20 + 5 + 5 + 7 + 6;
const SEEK_TABLE_STRINGS: &[u8] =
    b"<NULL>\0VIDEO_SEEKINFO\0ofs_byte\0ofs_frmid\0num_skip\0resv\0";
const SEEK_ENTRY_SIZE: usize = 8 + 4;

/// Computes the payload and padding sizes of a chunk from its header.
///
/// Reads the big-endian chunk size at 0x04, the payload offset at 0x09 and the
/// big-endian padding size at 0x0A. The payload size is
/// `chunk size - payload offset - padding size`.
///
/// # Errors
///
/// [`Error::Framing`] if the header is shorter than 12 bytes or the payload size
/// would be negative.
pub fn size_and_padding(header: &[u8]) -> Result<(usize, usize)> {
    if header.len() < 12 {
        return Err(Error::Framing(format!(
            "chunk header needs at least 12 bytes, got {}",
            header.len()
        )));
    }

    let mut reader = Reader::new(header);
    reader.skip(4)?;
    let size = reader.read_u32()? as i64;
    reader.skip(1)?;
    let offset = reader.read_u8()? as i64;
    let padding = reader.read_u16()? as i64;

    let payload = size - offset - padding;

    if payload < 0 {
        return Err(Error::Framing(format!(
            "negative payload size {} (chunk size {}, offset {}, padding {})",
            payload, size, offset, padding
        )));
    }

    Ok((payload as usize, padding as usize))
}

/// Number of bytes needed after a chunk written at `position` so that it ends
/// on a [`SECTOR_SIZE`] boundary.
pub fn sector_padding(position: u64, chunk_size: u64) -> u64 {
    let remainder = (position + chunk_size) % SECTOR_SIZE;

    if remainder == 0 {
        0
    } else {
        SECTOR_SIZE - remainder
    }
}

/// Bytes reserved for the seek info table of a video stream with
/// `num_keyframes` keyframes.
pub fn video_header_budget(num_keyframes: usize) -> usize {
    pad_header_block(
        SEEK_TABLE_FIXED + SEEK_TABLE_STRINGS.len() + num_keyframes * SEEK_ENTRY_SIZE,
    )
}

// Always adds between 1 and 0x80 bytes, so an aligned size grows by a full block.
fn pad_header_block(size: usize) -> usize {
    size + (HEADER_BLOCK - size % HEADER_BLOCK)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(size: u32, offset: u8, padding: u16) -> [u8; 12] {
        let mut data = [0u8; 12];
        data[..4].copy_from_slice(b"@SFV");
        data[4..8].copy_from_slice(&size.to_be_bytes());
        data[9] = offset;
        data[10..12].copy_from_slice(&padding.to_be_bytes());
        data
    }

    #[test]
    fn test_size_and_padding() {
        assert_eq!(size_and_padding(&header(0x118, 0x18, 0x10)).unwrap(), (0xF0, 0x10));
        assert_eq!(size_and_padding(&header(0x18, 0x18, 0)).unwrap(), (0, 0));
    }

    #[test]
    fn test_negative_size() {
        assert!(matches!(
            size_and_padding(&header(10, 5, 10)),
            Err(Error::Framing(_))
        ));
    }

    #[test]
    fn test_short_header() {
        assert!(matches!(
            size_and_padding(&header(0x118, 0x18, 0)[..11]),
            Err(Error::Framing(_))
        ));
    }

    #[test]
    fn test_sector_padding() {
        assert_eq!(sector_padding(0x7FE, 2), 0);
        assert_eq!(sector_padding(0x7FF, 2), 0x7FF);
        assert_eq!(sector_padding(0, 0), 0);
        assert_eq!(sector_padding(0x800, 0x20), 0x7E0);
    }

    #[test]
    fn test_header_block_never_zero() {
        assert_eq!(pad_header_block(0x100), 0x180);
        assert_eq!(pad_header_block(0x101), 0x180);
        assert_eq!(pad_header_block(0x17F), 0x180);
        assert_eq!(pad_header_block(0), 0x80);
    }

    #[test]
    fn test_video_header_budget() {
        assert_eq!(video_header_budget(0), 0x100);
        assert_eq!(video_header_budget(10), 0x180);

        for keyframes in 0..64 {
            let budget = video_header_budget(keyframes);
            assert_eq!(budget % 0x80, 0);
            assert!(budget > SEEK_TABLE_FIXED + SEEK_TABLE_STRINGS.len() + keyframes * 12);
        }
    }
}
