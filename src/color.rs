use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hex colours
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` (or `rrggbb`, or the 3-digit short form).
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let rgb = Srgb::<u8>::from_str(hex.trim()).ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// [`parse_hex`] for the built-in colour constants, grey if malformed.
pub fn hex_or_gray(hex: &str) -> Color32 {
    parse_hex(hex).unwrap_or_else(|| {
        log::warn!("Invalid colour '{hex}', using grey");
        Color32::GRAY
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chart_colours() {
        assert_eq!(parse_hex("#eb5146"), Some(Color32::from_rgb(0xeb, 0x51, 0x46)));
        assert_eq!(parse_hex("63d0ff"), Some(Color32::from_rgb(0x63, 0xd0, 0xff)));
        assert_eq!(parse_hex("#zzzzzz"), None);
        assert_eq!(hex_or_gray("nope"), Color32::GRAY);
    }

    #[test]
    fn palette_has_distinct_colours() {
        let p = generate_palette(3);
        assert_eq!(p.len(), 3);
        assert_ne!(p[0], p[1]);
        assert_ne!(p[1], p[2]);
        assert!(generate_palette(0).is_empty());
    }
}
