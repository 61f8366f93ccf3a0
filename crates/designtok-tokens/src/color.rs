//! sRGB parsing and CIE76 color distance.

/// Color with 0-255 channels and 0-1 alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Parse `rgba(r, g, b, a)` or `rgb(r, g, b)`.
pub fn parse_rgba(text: &str) -> Option<Rgba> {
    let text = text.trim();
    let inner = text
        .strip_prefix("rgba(")
        .or_else(|| text.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<f64> = inner
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [r, g, b] => Some(Rgba {
            r: *r,
            g: *g,
            b: *b,
            a: 1.0,
        }),
        [r, g, b, a] => Some(Rgba {
            r: *r,
            g: *g,
            b: *b,
            a: *a,
        }),
        _ => None,
    }
}

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex(text: &str) -> Option<Rgba> {
    let hex = text.trim().strip_prefix('#').unwrap_or(text.trim());
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok().map(f64::from);
    match hex.len() {
        3 => {
            let mut channels = hex.chars().map(|c| {
                let pair = format!("{c}{c}");
                byte(&pair)
            });
            Some(Rgba {
                r: channels.next()??,
                g: channels.next()??,
                b: channels.next()??,
                a: 1.0,
            })
        }
        6 | 8 => Some(Rgba {
            r: byte(&hex[0..2])?,
            g: byte(&hex[2..4])?,
            b: byte(&hex[4..6])?,
            a: if hex.len() == 8 {
                byte(&hex[6..8])? / 255.0
            } else {
                1.0
            },
        }),
        _ => None,
    }
}

/// Parse either color notation.
pub fn parse_color(text: &str) -> Option<Rgba> {
    if text.trim_start().starts_with('#') {
        parse_hex(text)
    } else {
        parse_rgba(text)
    }
}

fn srgb_to_linear(channel: f64) -> f64 {
    let s = channel / 255.0;
    if s <= 0.04045 {
        s / 12.92
    } else {
        ((s + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB to CIELAB via XYZ under the D65 white point.
#[must_use]
pub fn rgb_to_lab(rgb: Rgba) -> Lab {
    const EPSILON: f64 = 0.008856;
    const KAPPA: f64 = 903.3;

    let rl = srgb_to_linear(rgb.r);
    let gl = srgb_to_linear(rgb.g);
    let bl = srgb_to_linear(rgb.b);

    let x = (0.4124564 * rl + 0.3575761 * gl + 0.1804375 * bl) / 0.95047;
    let y = 0.2126729 * rl + 0.7151522 * gl + 0.0721750 * bl;
    let z = (0.0193339 * rl + 0.1191920 * gl + 0.9503041 * bl) / 1.08883;

    let f = |t: f64| {
        if t > EPSILON {
            t.cbrt()
        } else {
            (KAPPA * t + 16.0) / 116.0
        }
    };
    let (fx, fy, fz) = (f(x), f(y), f(z));

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// CIE76 ΔE. Values below roughly 2.3 are hard to tell apart.
#[must_use]
pub fn delta_e(a: Lab, b: Lab) -> f64 {
    ((a.l - b.l).powi(2) + (a.a - b.a).powi(2) + (a.b - b.b).powi(2)).sqrt()
}
