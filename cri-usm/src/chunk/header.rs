use super::{CHUNK_HEADER_SIZE, ChunkSignature, size_and_padding};
use crate::{Error, Reader, Result};
use std::fmt;

const MIN_HEADER_OFFSET: u8 = (CHUNK_HEADER_SIZE - 8) as u8;

/// Kind of data carried by a chunk payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PayloadType {
    /// Video or audio packet.
    Stream,
    /// Stream header, usually a `@UTF` table.
    Header,
    /// `#HEADER END` / `#CONTENTS END` marker.
    SectionEnd,
    /// Seek information table.
    Seek,
    Unknown(u8),
}

impl From<u8> for PayloadType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Stream,
            1 => Self::Header,
            2 => Self::SectionEnd,
            3 => Self::Seek,
            x => Self::Unknown(x),
        }
    }
}

impl From<PayloadType> for u8 {
    fn from(value: PayloadType) -> Self {
        match value {
            PayloadType::Stream => 0,
            PayloadType::Header => 1,
            PayloadType::SectionEnd => 2,
            PayloadType::Seek => 3,
            PayloadType::Unknown(x) => x,
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream => write!(f, "stream"),
            Self::Header => write!(f, "header"),
            Self::SectionEnd => write!(f, "section-end"),
            Self::Seek => write!(f, "seek"),
            Self::Unknown(x) => write!(f, "unknown({})", x),
        }
    }
}

/// Parsed chunk header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkHeader {
    pub signature: ChunkSignature,
    /// Payload offset, counted from byte 0x08 of the chunk.
    pub header_offset: u8,
    pub payload_size: usize,
    pub padding_size: u16,
    pub channel: u8,
    pub payload_type: PayloadType,
    pub frame_time: u32,
    pub frame_rate: u32,
}

impl ChunkHeader {
    /// Header for a new chunk whose payload directly follows the 0x20 byte header.
    pub fn new(
        signature: ChunkSignature,
        channel: u8,
        payload_type: PayloadType,
        payload_size: usize,
    ) -> Self {
        Self {
            signature,
            header_offset: MIN_HEADER_OFFSET,
            payload_size,
            padding_size: 0,
            channel,
            payload_type,
            frame_time: 0,
            frame_rate: 0,
        }
    }

    /// Parse the first [`CHUNK_HEADER_SIZE`] bytes of a chunk.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < CHUNK_HEADER_SIZE {
            return Err(Error::Framing(format!(
                "chunk header needs {} bytes, got {}",
                CHUNK_HEADER_SIZE,
                data.len()
            )));
        }

        let signature = ChunkSignature::try_from(&data[..4])?;
        let (payload_size, padding_size) = size_and_padding(data)?;

        let mut reader = Reader::new(data);
        reader.skip(9)?;
        let header_offset = reader.read_u8()?;

        if header_offset < MIN_HEADER_OFFSET {
            return Err(Error::Framing(format!(
                "{} chunk payload offset {:#x} overlaps its header",
                signature, header_offset
            )));
        }

        reader.skip(2)?;
        let channel = reader.read_u8()?;
        reader.skip(2)?;
        let payload_type = PayloadType::from(reader.read_u8()?);
        let frame_time = reader.read_u32()?;
        let frame_rate = reader.read_u32()?;

        Ok(Self {
            signature,
            header_offset,
            payload_size,
            padding_size: padding_size as u16,
            channel,
            payload_type,
            frame_time,
            frame_rate,
        })
    }

    /// Encode into a fixed size header. Bytes past the known fields are zero.
    pub fn encode(&self) -> Result<[u8; CHUNK_HEADER_SIZE]> {
        let chunk_size = u32::try_from(
            self.header_offset as usize + self.payload_size + self.padding_size as usize,
        )
        .map_err(|_| {
            Error::Framing(format!(
                "{} chunk with {} payload bytes does not fit in a chunk size field",
                self.signature, self.payload_size
            ))
        })?;

        let mut data = [0u8; CHUNK_HEADER_SIZE];
        data[0x00..0x04].copy_from_slice(self.signature.as_bytes());
        data[0x04..0x08].copy_from_slice(&chunk_size.to_be_bytes());
        data[0x09] = self.header_offset;
        data[0x0A..0x0C].copy_from_slice(&self.padding_size.to_be_bytes());
        data[0x0C] = self.channel;
        data[0x0F] = self.payload_type.into();
        data[0x10..0x14].copy_from_slice(&self.frame_time.to_be_bytes());
        data[0x14..0x18].copy_from_slice(&self.frame_rate.to_be_bytes());
        Ok(data)
    }

    /// Bytes between the start of the chunk and its payload.
    pub fn payload_start(&self) -> usize {
        8 + self.header_offset as usize
    }

    /// Bytes occupied by the whole chunk, padding included.
    pub fn total_size(&self) -> usize {
        self.payload_start() + self.payload_size + self.padding_size as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_parse() {
        let mut header = ChunkHeader::new(ChunkSignature::Audio, 1, PayloadType::Stream, 0x400);
        header.padding_size = 0x20;
        header.frame_time = 1001;
        header.frame_rate = 2997;

        let data = header.encode().unwrap();
        assert_eq!(&data[..4], b"@SFA");
        assert_eq!(&data[4..8], &(0x18u32 + 0x400 + 0x20).to_be_bytes());
        assert_eq!(data[9], 0x18);
        assert_eq!(data[0x0C], 1);
        assert_eq!(ChunkHeader::parse(&data).unwrap(), header);
        assert_eq!(header.total_size(), 0x20 + 0x400 + 0x20);
    }

    #[test]
    fn test_payload_types() {
        for value in 0..=255u8 {
            assert_eq!(u8::from(PayloadType::from(value)), value);
        }

        assert_eq!(PayloadType::from(2), PayloadType::SectionEnd);
        assert_eq!(PayloadType::from(9), PayloadType::Unknown(9));
    }

    #[test]
    fn test_parse_rejects_bad_headers() {
        let mut data = ChunkHeader::new(ChunkSignature::Video, 0, PayloadType::Stream, 0x10)
            .encode()
            .unwrap();

        assert!(matches!(ChunkHeader::parse(&data[..0x1F]), Err(Error::Framing(_))));

        data[9] = 0x10;
        assert!(matches!(ChunkHeader::parse(&data), Err(Error::Framing(_))));

        data[..4].copy_from_slice(b"JUNK");
        assert!(matches!(ChunkHeader::parse(&data), Err(Error::Framing(_))));
    }
}
