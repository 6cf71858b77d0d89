use cri_usm::{
    Error,
    crypt::{AudioCipher, CipherKeys, VideoCipher},
};
use std::error::Error as StdError;

fn packet(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(seed | 1).wrapping_add(seed) ^ (i >> 8) as u8)
        .collect()
}

macro_rules! video_round_trip {
    ($test_name: ident, $key: literal, $len: literal) => {
        #[test]
        fn $test_name() -> Result<(), Box<dyn StdError>> {
            let keys = CipherKeys::derive($key);
            let cipher = VideoCipher::new(&keys.video)?;
            let plain = packet($len, 0x3D);

            let encrypted = cipher.encrypt(&plain);
            assert_eq!(encrypted.len(), plain.len());
            assert_eq!(&encrypted[..0x40], &plain[..0x40]);
            assert_ne!(encrypted, plain);
            assert_eq!(cipher.decrypt(&encrypted), plain);

            Ok(())
        }
    };
}

macro_rules! video_pass_through {
    ($test_name: ident, $len: literal) => {
        #[test]
        fn $test_name() -> Result<(), Box<dyn StdError>> {
            let cipher = CipherKeys::derive(0x0011223344556677).video_cipher();
            let plain = packet($len, 0x77);

            assert_eq!(cipher.decrypt(&plain), plain);
            assert_eq!(cipher.encrypt(&plain), plain);

            Ok(())
        }
    };
}

macro_rules! audio_self_inverse {
    ($test_name: ident, $key: literal, $len: literal) => {
        #[test]
        fn $test_name() -> Result<(), Box<dyn StdError>> {
            let keys = CipherKeys::derive($key);
            let cipher = AudioCipher::new(&keys.audio)?;
            let plain = packet($len, 0x11);

            let encrypted = cipher.transform(&plain);
            assert_eq!(encrypted.len(), plain.len());
            assert_eq!(cipher.transform(&encrypted), plain);

            if $len > 0x140 {
                assert_ne!(encrypted, plain);
                assert_eq!(&encrypted[..0x140], &plain[..0x140]);
            } else {
                assert_eq!(encrypted, plain);
            }

            Ok(())
        }
    };
}

// ==========================================
// Video
// ==========================================

video_round_trip!(test_video_round_trip_threshold, 0x0011223344556677, 0x240);
video_round_trip!(test_video_round_trip_partial_block, 0x0011223344556677, 0x25F);
video_round_trip!(test_video_round_trip_small, 0x0011223344556677, 0x300);
video_round_trip!(test_video_round_trip_large, 0xCF222F1FE0748978, 0x4000);
video_round_trip!(test_video_round_trip_odd, 0xFFFFFFFFFFFFFFFF, 0x1235);
video_round_trip!(test_video_round_trip_zero_key, 0, 0x800);

video_pass_through!(test_video_pass_through_empty, 0);
video_pass_through!(test_video_pass_through_header_only, 0x40);
video_pass_through!(test_video_pass_through_head_only, 0x140);
video_pass_through!(test_video_pass_through_below_threshold, 0x23F);

// ==========================================
// Audio
// ==========================================

audio_self_inverse!(test_audio_header_only, 0x0011223344556677, 0x140);
audio_self_inverse!(test_audio_one_byte, 0x0011223344556677, 0x141);
audio_self_inverse!(test_audio_packet, 0xCF222F1FE0748978, 0x800);
audio_self_inverse!(test_audio_odd_packet, 0, 0x9A7);

#[test]
fn test_end_to_end_zero_packet() -> Result<(), Box<dyn StdError>> {
    let keys = CipherKeys::derive(0x0011223344556677);
    let cipher = VideoCipher::new(&keys.video)?;
    let plain = vec![0u8; 0x300];

    let encrypted = cipher.encrypt(&plain);
    assert!(encrypted[0x40..].iter().any(|x| *x != 0));
    assert_eq!(cipher.decrypt(&encrypted), plain);

    Ok(())
}

#[test]
fn test_wrong_key_does_not_decrypt() {
    let plain = packet(0x600, 0x21);
    let encrypted = CipherKeys::derive(1).video_cipher().encrypt(&plain);

    assert_ne!(CipherKeys::derive(2).video_cipher().decrypt(&encrypted), plain);
}

#[test]
fn test_key_lengths() {
    let keys = CipherKeys::derive(0x0011223344556677);

    assert!(matches!(
        VideoCipher::new(&keys.audio),
        Err(Error::KeyLength {
            expected: 0x40,
            actual: 0x20
        })
    ));
    assert!(matches!(
        AudioCipher::new(&keys.video),
        Err(Error::KeyLength {
            expected: 0x20,
            actual: 0x40
        })
    ));
}

#[test]
fn test_derived_key_shapes() {
    let keys = CipherKeys::derive(0x0011223344556677);

    assert_eq!(keys, CipherKeys::derive(0x0011223344556677));
    assert_eq!(keys.video_hex().len(), 0x80);
    assert_eq!(keys.audio_hex().len(), 0x40);

    for i in 0..0x20 {
        assert_eq!(keys.video[0x20 + i], keys.video[i] ^ 0xFF);
    }
}
