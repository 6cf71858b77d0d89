use super::AUDIO_KEY_SIZE;
use crate::{Error, Result};

/// Clear bytes at the start of every audio packet.
pub const AUDIO_HEADER_SIZE: usize = 0x140;

/// Repeating XOR cipher of `@SFA` stream packets.
///
/// The same transform encrypts and decrypts.
#[derive(Clone)]
pub struct AudioCipher {
    key: [u8; AUDIO_KEY_SIZE],
}

impl AudioCipher {
    /// # Errors
    ///
    /// [`Error::KeyLength`] unless the key is exactly 0x20 bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        let key = key.try_into().map_err(|_| Error::KeyLength {
            expected: AUDIO_KEY_SIZE,
            actual: key.len(),
        })?;

        Ok(Self::from_key(key))
    }

    pub fn from_key(key: [u8; AUDIO_KEY_SIZE]) -> Self {
        Self { key }
    }

    pub fn transform(&self, packet: &[u8]) -> Vec<u8> {
        let mut data = packet.to_vec();
        self.transform_in_place(&mut data);
        data
    }

    pub fn transform_in_place(&self, packet: &mut [u8]) {
        if packet.len() <= AUDIO_HEADER_SIZE {
            return;
        }

        for (i, x) in packet.iter_mut().enumerate().skip(AUDIO_HEADER_SIZE) {
            *x ^= self.key[i % AUDIO_KEY_SIZE];
        }
    }
}
