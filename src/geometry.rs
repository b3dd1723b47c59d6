//! Shared geometry, number formatting and colour helpers.

use palette::{Hsl, IntoColor, Srgb};

/// An 8-bit sRGB colour as used throughout the drawings.
pub type Color = Srgb<u8>;

// ============================================================================
// Ratio Distribution
// ============================================================================

/// Splits `total` millimetres across `ratios` without rounding drift.
///
/// Every segment but the last is `floor(total * r / sum)`; the last segment
/// takes the remainder, so the result always sums to exactly `total`.
/// Ratios that are zero, negative or not finite count as `1`.
///
/// ```
/// use infissi_renderer::distribute;
///
/// assert_eq!(distribute(1200, &[1.0, 1.0, 1.0]), vec![400, 400, 400]);
/// assert_eq!(distribute(1000, &[1.0, 2.0]), vec![333, 667]);
/// ```
pub fn distribute(total: u32, ratios: &[f32]) -> Vec<u32> {
    let Some((_, head)) = ratios.split_last() else {
        return Vec::new();
    };

    let weight = |r: f32| if r.is_finite() && r > 0.0 { f64::from(r) } else { 1.0 };
    let sum: f64 = ratios.iter().map(|&r| weight(r)).sum();

    let mut segments = Vec::with_capacity(ratios.len());
    let mut assigned = 0u32;
    for &ratio in head {
        let share = (f64::from(total) * weight(ratio) / sum).floor() as u32;
        let share = share.min(total - assigned);
        assigned += share;
        segments.push(share);
    }
    segments.push(total - assigned);
    segments
}

/// Running start offsets for `segments` laid out from `origin` with `gap`
/// between consecutive segments.
pub fn offsets(origin: f32, segments: &[u32], gap: f32) -> Vec<f32> {
    segments
        .iter()
        .scan(origin, |cursor, &len| {
            let start = *cursor;
            *cursor += len as f32 + gap;
            Some(start)
        })
        .collect()
}

// ============================================================================
// Number Formatting
// ============================================================================

/// Formats a length as whole millimetres (`1199.6` → `"1200"`).
pub fn format_mm(value: f32) -> String {
    if value.is_finite() {
        format!("{}", value.round() as i64)
    } else {
        "0".to_string()
    }
}

/// Formats an overall size caption such as `"1200 × 1500 mm"`.
pub fn format_size(width: f32, height: f32) -> String {
    format!("{} × {} mm", format_mm(width), format_mm(height))
}

// ============================================================================
// Colour Utilities
// ============================================================================

/// Parses a `#rrggbb` / `#rgb` colour, falling back to `fallback` (which
/// must itself be valid hex) when the input is missing or malformed.
pub fn parse_color(value: Option<&str>, fallback: &str) -> Color {
    value
        .and_then(|v| v.trim().parse::<Color>().ok())
        .or_else(|| fallback.parse::<Color>().ok())
        .unwrap_or(Color::new(128, 128, 128))
}

/// Formats a colour as `#rrggbb` for SVG attributes.
pub fn to_hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Shifts the lightness of a colour in HSL space.
///
/// Positive `amount` lightens, negative darkens; the result is clamped to
/// the valid range so very light or dark inputs saturate instead of wrapping.
pub fn shade(color: Color, amount: f32) -> Color {
    let rgb: Srgb<f32> = color.into_format();
    let mut hsl: Hsl = rgb.into_color();
    hsl.lightness = (hsl.lightness + amount).clamp(0.0, 1.0);
    let shaded: Srgb<f32> = hsl.into_color();
    shaded.into_format()
}

/// Relative luminance in `0.0..=1.0`, used to pick readable outline colours.
pub fn luminance(color: Color) -> f32 {
    let rgb: Srgb<f32> = color.into_format();
    0.2126 * rgb.red + 0.7152 * rgb.green + 0.0722 * rgb.blue
}

/// Outline colour that contrasts with a fill.
pub fn outline_for(fill: Color) -> Color {
    if luminance(fill) > 0.5 {
        shade(fill, -0.45)
    } else {
        shade(fill, -0.2)
    }
}

/// Three tones synthesised from one colour to fake 3D slat shading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlatPalette {
    pub highlight: Color,
    pub base: Color,
    pub shadow: Color,
}

impl SlatPalette {
    /// Lightness offset between the base tone and the highlight/shadow tones.
    pub const STEP: f32 = 0.18;

    pub fn from_base(base: Color) -> Self {
        Self {
            highlight: shade(base, Self::STEP),
            base,
            shadow: shade(base, -Self::STEP),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribute_even_split() {
        let parts = distribute(1200, &[1.0, 1.0, 1.0]);
        assert_eq!(parts, vec![400, 400, 400]);
        assert_eq!(parts.iter().sum::<u32>(), 1200);
    }

    #[test]
    fn distribute_remainder_goes_last() {
        assert_eq!(distribute(1000, &[1.0, 1.0, 1.0]), vec![333, 333, 334]);
        assert_eq!(distribute(7, &[1.0, 1.0, 1.0, 1.0]), vec![1, 1, 1, 4]);
    }

    #[test]
    fn distribute_invalid_ratios_count_as_one() {
        assert_eq!(distribute(900, &[0.0, -3.0, f32::NAN]), vec![300, 300, 300]);
    }

    #[test]
    fn distribute_empty() {
        assert!(distribute(1000, &[]).is_empty());
        assert_eq!(distribute(0, &[1.0, 2.0]), vec![0, 0]);
    }

    #[test]
    fn offsets_include_gaps() {
        assert_eq!(offsets(60.0, &[400, 400], 40.0), vec![60.0, 500.0]);
    }

    #[test]
    fn format_helpers() {
        assert_eq!(format_mm(1199.6), "1200");
        assert_eq!(format_mm(f32::NAN), "0");
        assert_eq!(format_size(1200.0, 1500.0), "1200 × 1500 mm");
    }

    #[test]
    fn parse_color_fallback() {
        assert_eq!(parse_color(Some("#ff0000"), "#000000"), Color::new(255, 0, 0));
        assert_eq!(parse_color(Some("not a colour"), "#00ff00"), Color::new(0, 255, 0));
        assert_eq!(parse_color(None, "#0000ff"), Color::new(0, 0, 255));
        assert_eq!(to_hex(Color::new(1, 2, 255)), "#0102ff");
    }

    #[test]
    fn shade_lightens_and_darkens() {
        let base = Color::new(100, 120, 140);
        let lighter = shade(base, 0.2);
        let darker = shade(base, -0.2);
        assert!(luminance(lighter) > luminance(base));
        assert!(luminance(darker) < luminance(base));
        assert_eq!(shade(Color::new(255, 255, 255), 0.5), Color::new(255, 255, 255));
    }

    #[test]
    fn slat_palette_is_ordered() {
        let palette = SlatPalette::from_base(Color::new(200, 200, 200));
        assert!(luminance(palette.highlight) > luminance(palette.base));
        assert!(luminance(palette.shadow) < luminance(palette.base));
        assert_eq!(palette, SlatPalette::from_base(Color::new(200, 200, 200)));
    }
}
