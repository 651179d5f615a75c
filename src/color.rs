use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Bar colour gradient
// ---------------------------------------------------------------------------

/// Hue and saturation shared by every bar; only lightness varies.
const BAR_HUE: f32 = 212.0;
const BAR_SATURATION: f32 = 0.70;
const LIGHTEST: f32 = 0.78;
const DARKEST: f32 = 0.32;

/// Colour for a bar of length `count` on an axis ending at `axis_max`.
///
/// Longer bars are darker. The scale is the fixed axis bound, so a city keeps
/// its colour for a given count whatever else is selected.
pub fn bar_color(count: usize, axis_max: usize) -> String {
    let t = if axis_max == 0 {
        0.0
    } else {
        (count as f32 / axis_max as f32).clamp(0.0, 1.0)
    };
    let lightness = LIGHTEST + (DARKEST - LIGHTEST) * t;
    let hsl = Hsl::new(BAR_HUE, BAR_SATURATION, lightness);
    let rgb: Srgb = hsl.into_color();
    to_hex(rgb)
}

/// Colours for a whole series of counts.
pub fn bar_colors(counts: &[usize], axis_max: usize) -> Vec<String> {
    counts.iter().map(|&c| bar_color(c, axis_max)).collect()
}

fn to_hex(rgb: Srgb) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lightness_of(hex: &str) -> u32 {
        let channel = |i: usize| u32::from_str_radix(&hex[i..i + 2], 16).unwrap();
        channel(1) + channel(3) + channel(5)
    }

    #[test]
    fn colors_are_hex_strings() {
        let c = bar_color(3, 10);
        assert_eq!(c.len(), 7);
        assert!(c.starts_with('#'));
        assert!(c[1..].chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn longer_bars_are_darker() {
        assert!(lightness_of(&bar_color(10, 10)) < lightness_of(&bar_color(1, 10)));
    }

    #[test]
    fn zero_axis_does_not_divide_by_zero() {
        assert_eq!(bar_color(0, 0), bar_color(0, 5));
    }

    #[test]
    fn series_keeps_length() {
        assert_eq!(bar_colors(&[1, 2, 3], 3).len(), 3);
        assert!(bar_colors(&[], 3).is_empty());
    }
}
