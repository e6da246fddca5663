//! CSS color resolution for the raster backend.
//!
//! Colors arrive as opaque CSS strings. The vector path copies them verbatim,
//! while the raster path needs concrete RGBA samples. [`resolve_css_color`]
//! covers the notations a color input or swatch picker produces: hex codes,
//! named colors, `transparent`, and the `rgb()`/`hsl()` functional forms.

use image::Rgba;
use palette::{Hsl, IntoColor, Srgb};

/// Color used when a CSS color cannot be resolved.
///
/// Matches the initial fill style of a 2D canvas context.
pub const FALLBACK_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Resolves a CSS color string into an RGBA sample.
///
/// Returns `None` for anything that is not a recognized color.
///
/// # Example
///
/// ```
/// use favicon_renderer::resolve_css_color;
///
/// assert_eq!(resolve_css_color("#4F46E5").unwrap().0, [0x4f, 0x46, 0xe5, 255]);
/// assert_eq!(resolve_css_color("white").unwrap().0, [255, 255, 255, 255]);
/// assert!(resolve_css_color("not-a-color").is_none());
/// ```
pub fn resolve_css_color(value: &str) -> Option<Rgba<u8>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = value.to_ascii_lowercase();
    if lower == "transparent" {
        return Some(Rgba([0, 0, 0, 0]));
    }

    if let Some(args) = functional_args(&lower, &["rgba", "rgb"]) {
        return parse_rgb_args(args);
    }
    if let Some(args) = functional_args(&lower, &["hsla", "hsl"]) {
        return parse_hsl_args(args);
    }

    let named: Srgb<u8> = palette::named::from_str(&lower)?;
    Some(Rgba([named.red, named.green, named.blue, 255]))
}

/// Resolves a CSS color, falling back to [`FALLBACK_COLOR`].
pub fn resolve_or_fallback(value: &str) -> Rgba<u8> {
    resolve_css_color(value).unwrap_or_else(|| {
        log::warn!("unrecognized color {value:?}, using fallback");
        FALLBACK_COLOR
    })
}

/// Formats an RGBA sample as `#rrggbb`, ignoring alpha.
pub fn to_hex(color: Rgba<u8>) -> String {
    let [r, g, b, _] = color.0;
    format!("#{r:02x}{g:02x}{b:02x}")
}

// ============================================================================
// Parsers
// ============================================================================

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    // palette parses the RGB part; an alpha digit group is split off first.
    let (rgb, alpha) = match hex.len() {
        3 | 6 => (hex, None),
        4 => (&hex[..3], Some(hex[3..].repeat(2))),
        8 => (&hex[..6], Some(hex[6..].to_string())),
        _ => return None,
    };

    let color: Srgb<u8> = rgb.parse().ok()?;
    let alpha = match alpha {
        Some(digits) => u8::from_str_radix(&digits, 16).ok()?,
        None => 255,
    };

    Some(Rgba([color.red, color.green, color.blue, alpha]))
}

/// Returns the argument list of `name(...)` for the first matching name.
fn functional_args<'a>(value: &'a str, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        value
            .strip_prefix(name)?
            .trim_start()
            .strip_prefix('(')?
            .strip_suffix(')')
    })
}

/// Splits functional arguments on commas, whitespace and the `/` alpha
/// separator.
fn split_args(args: &str) -> Vec<&str> {
    args.split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_rgb_args(args: &str) -> Option<Rgba<u8>> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        let value = match s.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? * 255.0 / 100.0,
            None => s.parse::<f32>().ok()?,
        };
        Some(value.clamp(0.0, 255.0).round() as u8)
    };

    let alpha = match parts.get(3) {
        Some(a) => parse_alpha(a)?,
        None => 255,
    };

    Some(Rgba([
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ]))
}

fn parse_hsl_args(args: &str) -> Option<Rgba<u8>> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let hue: f32 = parts[0].trim_end_matches("deg").parse().ok()?;
    let percent = |s: &str| -> Option<f32> {
        let value: f32 = s.strip_suffix('%')?.parse().ok()?;
        Some((value / 100.0).clamp(0.0, 1.0))
    };
    let saturation = percent(parts[1])?;
    let lightness = percent(parts[2])?;
    let alpha = match parts.get(3) {
        Some(a) => parse_alpha(a)?,
        None => 255,
    };

    let hsl: Hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    let rgb: Srgb<u8> = rgb.into_format();

    Some(Rgba([rgb.red, rgb.green, rgb.blue, alpha]))
}

fn parse_alpha(s: &str) -> Option<u8> {
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().ok()? / 100.0,
        None => s.parse::<f32>().ok()?,
    };
    Some((value.clamp(0.0, 1.0) * 255.0).round() as u8)
}
