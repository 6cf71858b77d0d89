use crate::{
    Result,
    chunk::{ChunkSignature, PayloadType},
    crypt::{CipherKeys, OpMode, VideoCipher},
    walker::ChunkWalker,
    writer::ChunkWriter,
};
use log::debug;
use std::io::{Read, Seek, Write};

/// Counts of what [`crypt_container`] went through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CryptSummary {
    pub chunks: usize,
    pub video_packets: usize,
    pub audio_packets: usize,
    /// Chunks carrying `@UTF` metadata tables.
    pub pages: usize,
    /// Video packets too short to carry an encrypted region.
    pub short_video_packets: usize,
}

/// Copy a container from `reader` to `writer`, transforming its stream packets.
///
/// `@SFV` stream payloads go through [`VideoCipher`] and `@SFA` stream payloads
/// through [`AudioCipher`](crate::crypt::AudioCipher). Every other chunk,
/// `@ALP` included, is copied byte for byte, so the output has the same length
/// and layout as the input.
pub fn crypt_container<R, W>(
    reader: R,
    writer: W,
    mode: OpMode,
    keys: &CipherKeys,
) -> Result<CryptSummary>
where
    R: Read + Seek,
    W: Write,
{
    let video = keys.video_cipher();
    let audio = keys.audio_cipher();
    let mut writer = ChunkWriter::new(writer);
    let mut summary = CryptSummary::default();

    for chunk in ChunkWalker::new(reader)? {
        let mut chunk = chunk?;
        summary.chunks += 1;

        if chunk.is_metadata_page() {
            summary.pages += 1;
        }

        if chunk.header.payload_type == PayloadType::Stream {
            match chunk.header.signature {
                ChunkSignature::Video => {
                    summary.video_packets += 1;

                    if !VideoCipher::is_encrypted_len(chunk.payload.len()) {
                        summary.short_video_packets += 1;
                        debug!(
                            "video packet at {:#x} has no encrypted region ({} bytes)",
                            chunk.offset,
                            chunk.payload.len()
                        );
                    }

                    match mode {
                        OpMode::Encrypt => video.encrypt_in_place(&mut chunk.payload),
                        OpMode::Decrypt => video.decrypt_in_place(&mut chunk.payload),
                        OpMode::None => (),
                    }
                }
                ChunkSignature::Audio => {
                    summary.audio_packets += 1;

                    if mode != OpMode::None {
                        audio.transform_in_place(&mut chunk.payload);
                    }
                }
                _ => (),
            }
        }

        writer.write_chunk(&chunk)?;
    }

    writer.flush()?;
    debug!("{:?}", summary);
    Ok(summary)
}
