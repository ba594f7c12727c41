//! Small color helpers shared across the crate.

use crate::error::SceneError;

/// Parses a 6-digit hex color (with or without a leading `#`) into a
/// normalized RGB triple.
pub fn hex2rgb(hex: &str) -> Result<[f32; 3], SceneError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SceneError::InvalidColor(hex.to_string()));
    }

    let mut rgb = [0.0f32; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|_| SceneError::InvalidColor(hex.to_string()))?;
        *channel = byte as f32 / 255.0;
    }
    Ok(rgb)
}

/// Formats a normalized RGB triple as an uppercase `#RRGGBB` string.
///
/// Channels are rounded to the nearest byte so `hex2rgb` -> `rgb2hex`
/// reproduces the original literal exactly.
pub fn rgb2hex(rgb: [f32; 3]) -> String {
    let to_byte = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    format!(
        "#{:02X}{:02X}{:02X}",
        to_byte(rgb[0]),
        to_byte(rgb[1]),
        to_byte(rgb[2])
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(hex2rgb("#FFFFFF").unwrap(), [1.0, 1.0, 1.0]);
        assert_eq!(hex2rgb("000000").unwrap(), [0.0, 0.0, 0.0]);
        assert_eq!(hex2rgb("#FF0000").unwrap(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(hex2rgb("#FFF").is_err());
        assert!(hex2rgb("not a color").is_err());
        assert!(hex2rgb("#GGGGGG").is_err());
        assert!(hex2rgb("").is_err());
    }

    #[test]
    fn test_hex_round_trip() {
        // Every byte value must survive normalize -> format on each channel.
        for byte in 0..=255u32 {
            let hex = format!(
                "#{:02X}{:02X}{:02X}",
                byte,
                (byte + 85) % 256,
                (byte + 170) % 256
            );
            let rgb = hex2rgb(&hex).unwrap();
            assert_eq!(rgb2hex(rgb), hex);
        }
    }
}
