use super::{AudioCipher, VideoCipher};

pub const VIDEO_KEY_SIZE: usize = 0x40;
pub const AUDIO_KEY_SIZE: usize = 0x20;

const AUDIO_TAG: &[u8; 4] = b"URUC";

/// Video and audio keys of one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherKeys {
    pub video: [u8; VIDEO_KEY_SIZE],
    pub audio: [u8; AUDIO_KEY_SIZE],
}

impl CipherKeys {
    /// Expand a numeric key into the video and audio keys.
    ///
    /// The key is read as 8 little-endian bytes. Each byte of the intermediate
    /// table depends only on bytes before it, so the assignments below must keep
    /// their order.
    pub fn derive(key_num: u64) -> Self {
        let c = key_num.to_le_bytes();
        let mut t = [0u8; 0x20];

        t[0x00] = c[0];
        t[0x01] = c[1];
        t[0x02] = c[2];
        t[0x03] = c[3].wrapping_sub(0x34);
        t[0x04] = c[4].wrapping_add(0xF9);
        t[0x05] = c[5] ^ 0x13;
        t[0x06] = c[6].wrapping_add(0x61);
        t[0x07] = t[0x00] ^ 0xFF;
        t[0x08] = t[0x01].wrapping_add(t[0x02]);
        t[0x09] = t[0x01].wrapping_sub(t[0x07]);
        t[0x0A] = t[0x02] ^ 0xFF;
        t[0x0B] = t[0x01] ^ 0xFF;
        t[0x0C] = t[0x0B].wrapping_add(t[0x09]);
        t[0x0D] = t[0x08].wrapping_sub(t[0x03]);
        t[0x0E] = t[0x0D] ^ 0xFF;
        t[0x0F] = t[0x0A].wrapping_sub(t[0x0B]);
        t[0x10] = t[0x08].wrapping_sub(t[0x0F]);
        t[0x11] = t[0x10] ^ t[0x07];
        t[0x12] = t[0x0F] ^ 0xFF;
        t[0x13] = t[0x03] ^ 0x10;
        t[0x14] = t[0x04].wrapping_sub(0x32);
        t[0x15] = t[0x05].wrapping_add(0xED);
        t[0x16] = t[0x06] ^ 0xF3;
        t[0x17] = t[0x13].wrapping_sub(t[0x0F]);
        t[0x18] = t[0x15].wrapping_add(t[0x07]);
        t[0x19] = 0x21u8.wrapping_sub(t[0x13]);
        t[0x1A] = t[0x14] ^ t[0x17];
        t[0x1B] = t[0x16].wrapping_add(t[0x16]);
        t[0x1C] = t[0x17].wrapping_add(0x44);
        t[0x1D] = t[0x03].wrapping_add(t[0x04]);
        t[0x1E] = t[0x05].wrapping_sub(t[0x16]);
        t[0x1F] = t[0x1D] ^ t[0x13];

        let mut video = [0u8; VIDEO_KEY_SIZE];
        let mut audio = [0u8; AUDIO_KEY_SIZE];

        for i in 0..0x20 {
            video[i] = t[i];
            video[0x20 + i] = t[i] ^ 0xFF;
            audio[i] = if i % 2 != 0 {
                AUDIO_TAG[(i >> 1) % 4]
            } else {
                t[i] ^ 0xFF
            };
        }

        Self { video, audio }
    }

    pub fn video_cipher(&self) -> VideoCipher {
        VideoCipher::from_key(self.video)
    }

    pub fn audio_cipher(&self) -> AudioCipher {
        AudioCipher::from_key(self.audio)
    }

    /// Video key as lowercase hex.
    pub fn video_hex(&self) -> String {
        hex::encode(self.video)
    }

    /// Audio key as lowercase hex.
    pub fn audio_hex(&self) -> String {
        hex::encode(self.audio)
    }
}
