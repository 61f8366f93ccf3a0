//! Deterministic numeric helpers shared by the matcher and the emitters.

#![forbid(unsafe_code)]

/// Round a floating point value to `decimals` decimal places.
#[must_use]
pub fn round_f64(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Percentage of `denom` rounded to one decimal; zero when `denom` is zero.
#[must_use]
pub fn percentage(numer: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        round_f64(numer as f64 * 100.0 / denom as f64, 1)
    }
}

/// Format a number with at most `decimals` places and no trailing zeros.
#[must_use]
pub fn fmt_trimmed(value: f64, decimals: u32) -> String {
    let rounded = round_f64(value, decimals);
    // -0.0 prints as "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

/// `25%`, `33.3%`, `0%`.
#[must_use]
pub fn fmt_pct(numer: usize, denom: usize) -> String {
    format!("{}%", fmt_trimmed(percentage(numer, denom), 1))
}

/// Signed dimension delta such as `+1px` or `-2.5px`.
#[must_use]
pub fn fmt_signed_delta(delta: f64, unit: &str) -> String {
    let body = fmt_trimmed(delta.abs(), 2);
    if delta < 0.0 && body != "0" {
        format!("-{body}{unit}")
    } else {
        format!("+{body}{unit}")
    }
}
