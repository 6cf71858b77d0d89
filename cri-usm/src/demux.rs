use crate::{
    Result,
    chunk::ChunkSignature,
    crypt::CipherKeys,
    frames::{FrameIndex, FrameSequencer},
    walker::ChunkWalker,
};
use log::debug;
use std::{
    collections::BTreeMap,
    io::{Read, Seek, Write},
    sync::{Arc, Mutex},
};

/// Packets and metadata pages of one stream of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub signature: ChunkSignature,
    pub channel: u8,
    pub packets: FrameIndex,
    /// `@UTF` tables found in the non-stream chunks of this stream.
    pub pages: FrameIndex,
}

/// Counts of what [`demux_stream`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemuxSummary {
    pub frames: usize,
    pub bytes: u64,
    /// File extension guessed from the first packet, see [`stream_extension`].
    pub extension: &'static str,
}

/// Index every stream of a container in a single walk.
///
/// Streams are ordered by signature, then channel. Chunks that carry neither a
/// packet nor a metadata page, such as section end markers, are not indexed.
pub fn scan_streams<R: Read + Seek>(reader: R) -> Result<Vec<StreamInfo>> {
    let mut streams: BTreeMap<(ChunkSignature, u8), StreamInfo> = BTreeMap::new();

    for chunk in ChunkWalker::new(reader)? {
        let chunk = chunk?;
        let (signature, channel) = (chunk.header.signature, chunk.header.channel);
        let entry = (chunk.payload_offset(), chunk.payload.len());

        let is_packet = chunk.is_stream();

        if !is_packet && !chunk.is_metadata_page() {
            continue;
        }

        let stream = streams
            .entry((signature, channel))
            .or_insert_with(|| StreamInfo {
                signature,
                channel,
                packets: FrameIndex::default(),
                pages: FrameIndex::default(),
            });

        if is_packet {
            stream.packets.entries.push(entry);
        } else {
            stream.pages.entries.push(entry);
        }
    }

    Ok(streams.into_values().collect())
}

/// Write the packets of `stream` back to back.
///
/// With `keys`, video packets are decrypted and audio packets unmasked on the
/// way. `@ALP` packets are always written as stored.
pub fn demux_stream<R, W>(
    source: Arc<Mutex<R>>,
    stream: &StreamInfo,
    keys: Option<&CipherKeys>,
    mut writer: W,
) -> Result<DemuxSummary>
where
    R: Read + Seek,
    W: Write,
{
    let video = keys.map(CipherKeys::video_cipher);
    let audio = keys.map(CipherKeys::audio_cipher);
    let mut summary = DemuxSummary {
        frames: 0,
        bytes: 0,
        extension: stream_extension(stream.signature, &[]),
    };

    for frame in FrameSequencer::new(source, &stream.packets) {
        let (position, mut data) = frame?;

        match (stream.signature, &video, &audio) {
            (ChunkSignature::Video, Some(video), _) => video.decrypt_in_place(&mut data),
            (ChunkSignature::Audio, _, Some(audio)) => audio.transform_in_place(&mut data),
            _ => (),
        }

        if position == 0 {
            summary.extension = stream_extension(stream.signature, &data);
        }

        writer.write_all(&data)?;
        summary.frames += 1;
        summary.bytes += data.len() as u64;
    }

    writer.flush()?;
    debug!("{} #{}: {:?}", stream.signature, stream.channel, summary);
    Ok(summary)
}

/// Read the `@UTF` metadata pages of `stream`, one at a time.
pub fn read_pages<R: Read + Seek>(
    source: Arc<Mutex<R>>,
    stream: &StreamInfo,
) -> impl Iterator<Item = Result<Vec<u8>>> {
    FrameSequencer::new(source, &stream.pages).map(|x| x.map(|(_, data)| data))
}

/// File extension for an elementary stream starting with `first`.
///
/// Unrecognized data, and streams with no packets, get `bin`.
pub fn stream_extension(signature: ChunkSignature, first: &[u8]) -> &'static str {
    match signature {
        ChunkSignature::Video | ChunkSignature::Alpha => {
            if first.starts_with(b"DKIF") {
                "ivf"
            } else if first.starts_with(&[0, 0, 1, 0xB3]) || first.starts_with(&[0, 0, 1, 0xBA]) {
                "m2v"
            } else if first.starts_with(&[0, 0, 0, 1]) || first.starts_with(&[0, 0, 1]) {
                "h264"
            } else {
                "bin"
            }
        }
        ChunkSignature::Audio => {
            // HCA tags may be stored with the high bit of every byte set.
            if first.len() >= 4 && first[..4].iter().map(|x| x & 0x7F).eq(*b"HCA\0") {
                "hca"
            } else if first.starts_with(&[0x80, 0x00]) {
                "adx"
            } else {
                "bin"
            }
        }
        ChunkSignature::Crid => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_extension() {
        assert_eq!(stream_extension(ChunkSignature::Video, b"DKIF\x00\x00\x20\x00VP90"), "ivf");
        assert_eq!(stream_extension(ChunkSignature::Video, &[0, 0, 1, 0xB3, 0x14]), "m2v");
        assert_eq!(stream_extension(ChunkSignature::Video, &[0, 0, 0, 1, 0x67]), "h264");
        assert_eq!(stream_extension(ChunkSignature::Alpha, b"DKIF"), "ivf");
        assert_eq!(stream_extension(ChunkSignature::Audio, b"HCA\x00\x02\x00"), "hca");
        assert_eq!(stream_extension(ChunkSignature::Audio, &[0xC8, 0xC3, 0xC1, 0x00]), "hca");
        assert_eq!(stream_extension(ChunkSignature::Audio, &[0x80, 0x00, 0x00, 0x24]), "adx");
        assert_eq!(stream_extension(ChunkSignature::Audio, b"HC"), "bin");
        assert_eq!(stream_extension(ChunkSignature::Video, &[]), "bin");
    }
}
