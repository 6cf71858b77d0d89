use crate::{
    Error, Result,
    chunk::{CHUNK_HEADER_SIZE, ChunkHeader, PayloadType, is_metadata_page},
};
use log::trace;
use std::io::{ErrorKind, Read, Seek};

/// One chunk read from a container.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Absolute offset of the chunk in its source.
    pub offset: u64,
    pub header: ChunkHeader,
    /// Header bytes exactly as read, up to the start of the payload.
    pub raw_header: Vec<u8>,
    pub payload: Vec<u8>,
    pub padding: Vec<u8>,
}

impl Chunk {
    /// Absolute offset of the payload in its source.
    pub fn payload_offset(&self) -> u64 {
        self.offset + self.raw_header.len() as u64
    }

    pub fn is_stream(&self) -> bool {
        self.header.payload_type == PayloadType::Stream
    }

    pub fn is_metadata_page(&self) -> bool {
        is_metadata_page(&self.payload)
    }
}

/// Forward iterator over the chunks of a USM container.
///
/// The walk starts at the current position of the reader and ends at a clean
/// end of file. Unrecognized signatures and chunks cut short by the end of the
/// source are framing errors, after which the iterator is exhausted.
pub struct ChunkWalker<R> {
    reader: R,
    position: u64,
    done: bool,
}

impl<R: Read + Seek> ChunkWalker<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let position = reader.stream_position()?;

        Ok(Self {
            reader,
            position,
            done: false,
        })
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_chunk(&mut self) -> Result<Option<Chunk>> {
        let offset = self.position;
        let mut fixed = [0u8; CHUNK_HEADER_SIZE];
        let read = read_up_to(&mut self.reader, &mut fixed)?;

        if read == 0 {
            return Ok(None);
        }

        if read < CHUNK_HEADER_SIZE {
            return Err(Error::Framing(format!(
                "truncated chunk header at {:#x} ({} of {} bytes)",
                offset, read, CHUNK_HEADER_SIZE
            )));
        }

        let header = ChunkHeader::parse(&fixed).map_err(|e| match e {
            Error::Framing(reason) => Error::Framing(format!("chunk at {:#x}: {}", offset, reason)),
            e => e,
        })?;

        let mut raw_header = fixed.to_vec();
        raw_header.extend(self.read_part(offset, header.payload_start() - CHUNK_HEADER_SIZE)?);
        let payload = self.read_part(offset, header.payload_size)?;
        let padding = self.read_part(offset, header.padding_size as usize)?;

        trace!(
            "{} chunk at {:#x}: channel {}, {} payload, {} bytes",
            header.signature, offset, header.channel, header.payload_type, header.payload_size
        );

        self.position += header.total_size() as u64;

        Ok(Some(Chunk {
            offset,
            header,
            raw_header,
            payload,
            padding,
        }))
    }

    // Grows only with bytes the source actually has.
    fn read_part(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![];
        let read = (&mut self.reader).take(len as u64).read_to_end(&mut buf)?;

        if read < len {
            return Err(Error::Framing(format!(
                "chunk at {:#x} runs past the end of the source ({} of {} bytes)",
                offset, read, len
            )));
        }

        Ok(buf)
    }
}

impl<R: Read + Seek> Iterator for ChunkWalker<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut read = 0;

    while read < buf.len() {
        match reader.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(read)
}
