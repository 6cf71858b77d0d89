//! This crate reads, decrypts, encrypts and re-muxes the chunks of CRI Middleware
//! `USM` (Sofdec2) containers.
//!
//! - [`chunk`] - chunk header parsing, size and padding arithmetic and signatures.
//! - [`crypt`] - key derivation and the video and audio packet ciphers.
//! - [`frames`] - lazy per-frame reads from a source shared between streams.
//! - [`ChunkWalker`] / [`ChunkWriter`] - sequential chunk I/O.
//! - [`crypt_container`] - decrypt or encrypt a whole container.
//! - [`scan_streams`] / [`demux_stream`] - split a container into its elementary streams.
//!
//! Decoding the audio and video samples themselves and parsing `@UTF` metadata
//! tables are out of scope.
//!
//! ```
//! use cri_usm::{ChunkHeader, ChunkSignature, ChunkWriter, PayloadType, crypt::{CipherKeys, OpMode}};
//! use std::io::Cursor;
//!
//! let mut writer = ChunkWriter::new(Vec::<u8>::new());
//! let header = ChunkHeader::new(ChunkSignature::Video, 0, PayloadType::Stream, 0x400);
//! writer.write_aligned(header, &[0; 0x400])?;
//! let usm = writer.into_inner();
//!
//! let keys = CipherKeys::derive(0x0011223344556677);
//! let mut encrypted: Vec<u8> = vec![];
//! let summary = cri_usm::crypt_container(Cursor::new(&usm), &mut encrypted, OpMode::Encrypt, &keys)?;
//!
//! assert_eq!(summary.video_packets, 1);
//! assert_eq!(encrypted.len(), usm.len());
//! # Ok::<(), cri_usm::Error>(())
//! ```

pub mod chunk;
pub mod crypt;
pub mod frames;

mod container;
mod demux;
mod error;
mod reader;
mod utils;
mod walker;
mod writer;

pub use chunk::{ChunkHeader, ChunkSignature, PayloadType};
pub use container::{CryptSummary, crypt_container};
pub use demux::{
    DemuxSummary, StreamInfo, demux_stream, read_pages, scan_streams, stream_extension,
};
pub use error::{Error, Result};
pub use reader::Reader;
pub use utils::parse_key;
pub use walker::{Chunk, ChunkWalker};
pub use writer::ChunkWriter;
