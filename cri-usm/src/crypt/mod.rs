//! USM packet obfuscation.
//!
//! A single 64-bit key is expanded by [`CipherKeys::derive`] into a 0x40 byte
//! video key and a 0x20 byte audio key.
//!
//! | Stream | Clear header | Encrypted region | Cipher |
//! |--------|--------------|------------------|--------|
//! | `@SFV` | 0x40 bytes | rest of the packet, only when it is at least 0x200 bytes | rolling XOR with feedback |
//! | `@SFA` | 0x140 bytes | rest of the packet | repeating XOR, self-inverse |
//!
//! Ciphers never change the length of a packet.
//!
//! ```
//! use cri_usm::crypt::CipherKeys;
//!
//! let keys = CipherKeys::derive(0x0011223344556677);
//! let video = keys.video_cipher();
//!
//! let packet = vec![0u8; 0x300];
//! let encrypted = video.encrypt(&packet);
//! assert_ne!(encrypted, packet);
//! assert_eq!(video.decrypt(&encrypted), packet);
//! ```

mod audio;
mod keys;
mod video;

pub use audio::{AUDIO_HEADER_SIZE, AudioCipher};
pub use keys::{AUDIO_KEY_SIZE, CipherKeys, VIDEO_KEY_SIZE};
pub use video::{VIDEO_HEADER_SIZE, VideoCipher};

/// Transform applied to stream packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpMode {
    /// Copy packets unchanged.
    #[default]
    None,
    Encrypt,
    Decrypt,
}
