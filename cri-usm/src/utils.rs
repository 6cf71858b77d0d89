use crate::{Error, Result};

/// Parse a numeric key given on a command line or in a config.
///
/// `0x`, `0o` and `0b` prefixed values use their radix and other values are
/// read as decimal. Values that are not valid decimal, including decimal
/// looking values with a leading zero, are read again as bare hexadecimal.
pub fn parse_key(input: &str) -> Result<u64> {
    let value = input.trim().replace('_', "");
    let lower = value.to_ascii_lowercase();

    let parsed = if let Some(digits) = lower.strip_prefix("0x") {
        u64::from_str_radix(digits, 16).ok()
    } else if let Some(digits) = lower.strip_prefix("0o") {
        u64::from_str_radix(digits, 8).ok()
    } else if let Some(digits) = lower.strip_prefix("0b") {
        u64::from_str_radix(digits, 2).ok()
    } else if lower == "0" || !lower.starts_with('0') {
        lower.parse::<u64>().ok()
    } else {
        None
    };

    parsed
        .or_else(|| u64::from_str_radix(&lower, 16).ok())
        .ok_or_else(|| {
            Error::TypeMismatch(format!(
                "'{}' is not a 64-bit decimal or hexadecimal key",
                input
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("1234").unwrap(), 1234);
        assert_eq!(parse_key("0x1234").unwrap(), 0x1234);
        assert_eq!(parse_key("0X00112233").unwrap(), 0x112233);
        assert_eq!(parse_key("CF222F1FE0748978").unwrap(), 0xCF222F1FE0748978);
        assert_eq!(parse_key("0123").unwrap(), 0x123);
        assert_eq!(parse_key("0").unwrap(), 0);
        assert_eq!(parse_key("0o17").unwrap(), 0o17);
        assert_eq!(parse_key(" 1_000 ").unwrap(), 1000);
    }

    #[test]
    fn test_parse_key_rejects() {
        assert!(matches!(parse_key("key"), Err(Error::TypeMismatch(_))));
        assert!(matches!(parse_key(""), Err(Error::TypeMismatch(_))));
        assert!(matches!(
            parse_key("0x1_0000_0000_0000_0000"),
            Err(Error::TypeMismatch(_))
        ));
    }
}
