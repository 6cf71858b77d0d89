use crate::{
    Result,
    chunk::{CHUNK_HEADER_SIZE, ChunkHeader, sector_padding},
    walker::Chunk,
};
use std::io::Write;

/// Writes chunks while tracking the output position.
pub struct ChunkWriter<W> {
    inner: W,
    position: u64,
}

impl<W: Write> ChunkWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_position(inner, 0)
    }

    /// Writer whose first chunk lands at `position` of the final output.
    pub fn with_position(inner: W, position: u64) -> Self {
        Self { inner, position }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Write a chunk exactly as it was read, with its original padding.
    pub fn write_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        self.write(&chunk.raw_header)?;
        self.write(&chunk.payload)?;
        self.write(&chunk.padding)
    }

    /// Write a new chunk padded with zeros so that it ends on a sector boundary.
    ///
    /// The payload offset, payload size and padding size of `header` are
    /// overwritten. Returns the header that was written.
    pub fn write_aligned(&mut self, mut header: ChunkHeader, payload: &[u8]) -> Result<ChunkHeader> {
        let size = (CHUNK_HEADER_SIZE + payload.len()) as u64;
        let padding = sector_padding(self.position, size);

        header.header_offset = (CHUNK_HEADER_SIZE - 8) as u8;
        header.payload_size = payload.len();
        // Always below SECTOR_SIZE.
        header.padding_size = padding as u16;

        self.write(&header.encode()?)?;
        self.write(payload)?;
        self.write(&vec![0; padding as usize])?;
        Ok(header)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }
}
