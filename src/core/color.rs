//! Popularity → marker color mapping
//!
//! Popular products are drawn red, unpopular ones yellow-green. The hue sweeps
//! from 0.2 (score 0) down to 0.0 (score 1) at fixed saturation and lightness.

/// Hue at popularity 0; popularity 1 maps to hue 0
const HUE_SWEEP: f64 = 0.2;
const SATURATION: f64 = 0.8;
const LIGHTNESS: f64 = 0.5;

/// Hue in `[0, 1)` for a popularity score
///
/// Scores outside `[0, 1]` are clamped, NaN is treated as 0.
#[inline]
pub fn hue_for(popularity_score: f64) -> f64 {
    let score = if popularity_score.is_nan() {
        0.0
    } else {
        popularity_score.clamp(0.0, 1.0)
    };
    HUE_SWEEP * (1.0 - score)
}

/// Marker color for a popularity score as `#rrggbb`
pub fn color_for(popularity_score: f64) -> String {
    hsl_to_hex(hue_for(popularity_score), SATURATION, LIGHTNESS)
}

/// Format an HSL color as a lowercase `#rrggbb` string
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let [r, g, b] = hsl_to_rgb(h, s, l);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Convert HSL (all components in `[0, 1]`) to 8-bit RGB channels
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
    if s == 0.0 {
        let v = to_channel(l);
        return [v, v, v];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_rgb(p, q, h)),
        to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    ]
}

#[inline]
fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Scale a `[0, 1]` channel to `[0, 255]`, truncating
#[inline]
fn to_channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}
