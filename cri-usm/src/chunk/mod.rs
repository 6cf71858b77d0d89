//! Chunk level framing of USM containers.
//!
//! Every chunk starts with a 0x20 byte header:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00 | 4 | signature (`CRID`, `@SFV`, `@SFA`, `@ALP`) |
//! | 0x04 | 4 | chunk size, counted from offset 0x08 (big-endian) |
//! | 0x09 | 1 | payload offset, counted from offset 0x08 |
//! | 0x0A | 2 | padding size after the payload (big-endian) |
//! | 0x0C | 1 | channel number |
//! | 0x0F | 1 | payload type |
//! | 0x10 | 4 | frame time (big-endian) |
//! | 0x14 | 4 | frame rate (big-endian) |

mod geometry;
mod header;
mod signature;

pub use geometry::{
    CHUNK_HEADER_SIZE, SECTOR_SIZE, sector_padding, size_and_padding, video_header_budget,
};
pub use header::{ChunkHeader, PayloadType};
pub use signature::{ChunkSignature, classify, is_metadata_page, is_usm};
