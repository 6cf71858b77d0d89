use crate::{Error, Result};
use std::fmt;

/// Recognized chunk signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChunkSignature {
    /// `CRID` container information chunk.
    Crid,
    /// `@SFV` video stream chunk.
    Video,
    /// `@SFA` audio stream chunk.
    Audio,
    /// `@ALP` alpha channel stream chunk.
    Alpha,
}

impl ChunkSignature {
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        match data.get(..4)? {
            b"CRID" => Some(Self::Crid),
            b"@SFV" => Some(Self::Video),
            b"@SFA" => Some(Self::Audio),
            b"@ALP" => Some(Self::Alpha),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &'static [u8; 4] {
        match self {
            Self::Crid => b"CRID",
            Self::Video => b"@SFV",
            Self::Audio => b"@SFA",
            Self::Alpha => b"@ALP",
        }
    }
}

impl TryFrom<&[u8]> for ChunkSignature {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        if value.len() != 4 {
            return Err(Error::TypeMismatch(format!(
                "chunk signature must be a 4 byte tag, got {} bytes",
                value.len()
            )));
        }

        Self::from_bytes(value).ok_or_else(|| {
            Error::Framing(format!(
                "unrecognized chunk signature {}",
                String::from_utf8_lossy(value).escape_debug()
            ))
        })
    }
}

impl fmt::Display for ChunkSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Signatures are plain ASCII.
        f.write_str(std::str::from_utf8(self.as_bytes()).unwrap_or("????"))
    }
}

/// Returns true if the first 4 bytes are one of the recognized chunk signatures.
pub fn classify(data: &[u8]) -> bool {
    ChunkSignature::from_bytes(data).is_some()
}

/// Returns true if the payload holds a `@UTF` metadata table.
pub fn is_metadata_page(payload: &[u8]) -> bool {
    payload.starts_with(b"@UTF")
}

/// Returns true if the data starts with the `CRID` container magic.
pub fn is_usm(magic: &[u8]) -> bool {
    magic.starts_with(b"CRID")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert!(classify(b"CRID\x00\x00\x01\x00"));
        assert!(classify(b"@SFV"));
        assert!(classify(b"@SFA"));
        assert!(classify(b"@ALP"));
        assert!(!classify(b"JUNK"));
        assert!(!classify(b"CR"));
        assert!(!classify(b""));
        assert!(!classify(b"@sfv"));
    }

    #[test]
    fn test_metadata_page() {
        assert!(is_metadata_page(b"@UTF\x00\x00\x00\x20"));
        assert!(!is_metadata_page(b"@UT"));
        assert!(!is_metadata_page(b"#CONTENTS END   ==============="));
    }

    #[test]
    fn test_is_usm() {
        assert!(is_usm(b"CRID"));
        assert!(!is_usm(b"@SFV"));
        assert!(!is_usm(b"CRI"));
    }

    #[test]
    fn test_try_from_bytes() {
        assert_eq!(
            ChunkSignature::try_from(&b"@SFA"[..]).unwrap(),
            ChunkSignature::Audio
        );
        assert!(matches!(
            ChunkSignature::try_from(&b"@SFAX"[..]),
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(
            ChunkSignature::try_from(&b"JUNK"[..]),
            Err(Error::Framing(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(ChunkSignature::Video.to_string(), "@SFV");
        assert_eq!(ChunkSignature::Crid.to_string(), "CRID");
    }
}
