use super::VIDEO_KEY_SIZE;
use crate::{Error, Result};

/// Clear bytes at the start of every video packet.
pub const VIDEO_HEADER_SIZE: usize = 0x40;

const HEAD_SIZE: usize = 0x100;
const MIN_ENCRYPTED_SIZE: usize = 0x200;
const HALF: usize = VIDEO_KEY_SIZE / 2;

/// Rolling XOR cipher of `@SFV` stream packets.
///
/// The region after the 0x40 byte packet header is split in two. Its first
/// 0x100 bytes (head) are masked with the low half of a 0x40 byte rolling state,
/// which is mixed with the plaintext of the following 0x100 bytes. The rest
/// (tail) is masked with the high half, which is fed back from each plaintext
/// byte. The rolling state is seeded from the video key for every packet.
///
/// Decryption restores the tail before the head, encryption masks the head
/// before the tail, so both see the same plaintext when mixing the head state.
#[derive(Clone)]
pub struct VideoCipher {
    key: [u8; VIDEO_KEY_SIZE],
}

impl VideoCipher {
    /// # Errors
    ///
    /// [`Error::KeyLength`] unless the key is exactly 0x40 bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        let key = key.try_into().map_err(|_| Error::KeyLength {
            expected: VIDEO_KEY_SIZE,
            actual: key.len(),
        })?;

        Ok(Self::from_key(key))
    }

    pub fn from_key(key: [u8; VIDEO_KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Returns true if the packet is long enough to carry an encrypted region.
    pub fn is_encrypted_len(len: usize) -> bool {
        len >= VIDEO_HEADER_SIZE + MIN_ENCRYPTED_SIZE
    }

    pub fn decrypt(&self, packet: &[u8]) -> Vec<u8> {
        let mut data = packet.to_vec();
        self.decrypt_in_place(&mut data);
        data
    }

    pub fn encrypt(&self, packet: &[u8]) -> Vec<u8> {
        let mut data = packet.to_vec();
        self.encrypt_in_place(&mut data);
        data
    }

    /// Packets shorter than 0x240 bytes are left untouched.
    pub fn decrypt_in_place(&self, packet: &mut [u8]) {
        if !Self::is_encrypted_len(packet.len()) {
            return;
        }

        let data = &mut packet[VIDEO_HEADER_SIZE..];
        let mut rolling = self.key;

        for i in HEAD_SIZE..data.len() {
            let r = HALF + i % HALF;
            data[i] ^= rolling[r];
            rolling[r] = data[i] ^ self.key[r];
        }

        for i in 0..HEAD_SIZE {
            let r = i % HALF;
            rolling[r] ^= data[HEAD_SIZE + i];
            data[i] ^= rolling[r];
        }
    }

    /// Packets shorter than 0x240 bytes are left untouched.
    pub fn encrypt_in_place(&self, packet: &mut [u8]) {
        if !Self::is_encrypted_len(packet.len()) {
            return;
        }

        let data = &mut packet[VIDEO_HEADER_SIZE..];
        let mut rolling = self.key;

        for i in 0..HEAD_SIZE {
            let r = i % HALF;
            rolling[r] ^= data[HEAD_SIZE + i];
            data[i] ^= rolling[r];
        }

        for i in HEAD_SIZE..data.len() {
            let r = HALF + i % HALF;
            let plain = data[i];
            data[i] ^= rolling[r];
            rolling[r] = plain ^ self.key[r];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> [u8; VIDEO_KEY_SIZE] {
        let mut key = [0u8; VIDEO_KEY_SIZE];
        key.iter_mut()
            .enumerate()
            .for_each(|(i, x)| *x = (i as u8).wrapping_mul(37) ^ 0x5A);
        key
    }

    #[test]
    fn test_key_length() {
        assert!(VideoCipher::new(&key()).is_ok());
        assert!(matches!(
            VideoCipher::new(&key()[..0x3F]),
            Err(Error::KeyLength {
                expected: 0x40,
                actual: 0x3F
            })
        ));
        assert!(VideoCipher::new(&[0u8; 0x41]).is_err());
    }

    #[test]
    fn test_threshold() {
        let cipher = VideoCipher::from_key(key());

        let short = vec![0xAB; 0x23F];
        assert_eq!(cipher.decrypt(&short), short);
        assert_eq!(cipher.encrypt(&short), short);

        let long = vec![0xAB; 0x240];
        assert_ne!(cipher.encrypt(&long), long);
    }

    #[test]
    fn test_header_untouched() {
        let cipher = VideoCipher::from_key(key());
        let packet: Vec<u8> = (0..0x400).map(|i| (i * 7) as u8).collect();
        let encrypted = cipher.encrypt(&packet);

        assert_eq!(encrypted.len(), packet.len());
        assert_eq!(&encrypted[..VIDEO_HEADER_SIZE], &packet[..VIDEO_HEADER_SIZE]);
    }

    #[test]
    fn test_zero_tail_masked_by_key() {
        // Zero plaintext feeds the key straight back into the rolling state.
        let cipher = VideoCipher::from_key(key());
        let encrypted = cipher.encrypt(&[0u8; 0x300]);
        let tail = &encrypted[VIDEO_HEADER_SIZE + HEAD_SIZE..];

        for block in tail.chunks(HALF) {
            assert_eq!(block, &key()[HALF..HALF + block.len()]);
        }
    }

    #[test]
    fn test_known_ciphertext() {
        let cipher = crate::crypt::CipherKeys::derive(0x0011223344556677).video_cipher();
        let packet: Vec<u8> = (0..0x260).map(|i| (i * 13 + 7) as u8).collect();
        let encrypted = cipher.encrypt(&packet);

        assert_eq!(
            &encrypted[0x40..0x50],
            &[
                0x77, 0x66, 0x55, 0x10, 0x2C, 0x31, 0x72, 0x88, 0xBB, 0xDE, 0xAA, 0x99, 0x77, 0xAB,
                0x54, 0x11
            ]
        );
        // Last head bytes, then the start of the tail.
        assert_eq!(
            &encrypted[0x138..0x148],
            &[
                0x79, 0xCD, 0xEC, 0x04, 0x20, 0x1C, 0x9D, 0x06, 0xCF, 0xCD, 0xCB, 0x81, 0xA8, 0x46,
                0x18, 0xD5
            ]
        );
        assert_eq!(
            &encrypted[0x250..0x260],
            &[
                0x35, 0x7D, 0xB1, 0x5F, 0xE5, 0x01, 0xDE, 0xB0, 0xF9, 0xBE, 0x8A, 0x5D, 0x6C, 0x23,
                0xAF, 0x23
            ]
        );
        assert_eq!(cipher.decrypt(&encrypted), packet);
    }

    #[test]
    fn test_tail_feedback() {
        let cipher = VideoCipher::from_key(key());
        let mut packet = [0u8; 0x300];
        packet[VIDEO_HEADER_SIZE + HEAD_SIZE] = 1;

        let encrypted = cipher.encrypt(&packet);
        let tail = &encrypted[VIDEO_HEADER_SIZE + HEAD_SIZE..];

        assert_eq!(tail[0], 1 ^ key()[HALF]);
        assert_eq!(tail[HALF], 1 ^ key()[HALF]);
        assert_eq!(tail[2 * HALF], key()[HALF]);
    }
}
