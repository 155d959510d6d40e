//! Color conversions shared by both extractors.

use palette::Srgb;
use std::str::FromStr;

/// A parsed CSS color with its alpha channel kept separately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssColor {
    pub rgb: Srgb<u8>,
    pub alpha: f32,
}

impl CssColor {
    pub fn hex(&self) -> String {
        srgb_to_hex(self.rgb)
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }
}

fn srgb_to_hex(rgb: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

/// Convert a 0.0-1.0 RGB triple (Figma's color space) to `#rrggbb`.
pub fn unit_rgb_to_hex(r: f32, g: f32, b: f32) -> String {
    let unit = Srgb::new(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0));
    srgb_to_hex(unit.into_format::<u8>())
}

/// Parse `rgb()`, `rgba()`, hex, and `transparent` color strings.
pub fn parse_css_color(value: &str) -> Option<CssColor> {
    let value = value.trim().to_ascii_lowercase();

    if value == "transparent" {
        return Some(CssColor {
            rgb: Srgb::new(0, 0, 0),
            alpha: 0.0,
        });
    }

    if value.starts_with('#') {
        return Srgb::<u8>::from_str(&value)
            .ok()
            .map(|rgb| CssColor { rgb, alpha: 1.0 });
    }

    let inner = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let parts: Vec<&str> = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() < 3 {
        return None;
    }

    let channel = |part: &str| -> Option<u8> {
        let v = match part.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? * 2.55,
            None => part.parse::<f32>().ok()?,
        };
        Some(v.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = match parts.get(3) {
        Some(part) => match part.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? / 100.0,
            None => part.parse::<f32>().ok()?,
        },
        None => 1.0,
    };

    Some(CssColor {
        rgb: Srgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?),
        alpha,
    })
}

/// Browser color string as `#rrggbb`; unparseable input passes through lowercased.
pub fn css_color_to_hex(value: &str) -> String {
    match parse_css_color(value) {
        Some(color) => color.hex(),
        None => value.trim().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_rgb_converts_to_padded_hex() {
        assert_eq!(unit_rgb_to_hex(1.0, 0.0, 0.0), "#ff0000");
        assert_eq!(unit_rgb_to_hex(0.0, 0.0, 0.0), "#000000");
        assert_eq!(unit_rgb_to_hex(0.2, 0.4, 0.6), "#336699");
    }

    #[test]
    fn unit_rgb_clamps_out_of_range_channels() {
        assert_eq!(unit_rgb_to_hex(1.4, -0.2, 1.0), "#ff00ff");
    }

    #[test]
    fn rgb_and_rgba_strings_parse() {
        assert_eq!(css_color_to_hex("rgb(17, 34, 51)"), "#112233");
        assert_eq!(css_color_to_hex("rgba(255, 0, 0, 0.5)"), "#ff0000");
        assert_eq!(css_color_to_hex("rgb(17 34 51 / 50%)"), "#112233");
    }

    #[test]
    fn hex_strings_are_lowercased() {
        assert_eq!(css_color_to_hex("#AABBCC"), "#aabbcc");
    }

    #[test]
    fn unknown_colors_pass_through() {
        assert_eq!(css_color_to_hex("CurrentColor"), "currentcolor");
        assert!(parse_css_color("rgb(1, 2)").is_none());
    }

    #[test]
    fn transparency_is_detected() {
        assert!(parse_css_color("rgba(0, 0, 0, 0)")
            .map(|c| c.is_transparent())
            .unwrap_or(false));
        assert!(parse_css_color("transparent")
            .map(|c| c.is_transparent())
            .unwrap_or(false));
        assert!(!parse_css_color("rgb(0, 0, 0)")
            .map(|c| c.is_transparent())
            .unwrap_or(true));
    }
}
