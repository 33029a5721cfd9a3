use serde::Serialize;

/// Significant digits kept before the half-up step, so `75.555` rounds as written
/// instead of as its binary approximation `75.55499999…`.
const SIGNIFICANT_DIGITS: i32 = 15;

/// Rounds half away from zero at `places` decimals.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }

    let factor = 10f64.powi(places as i32);
    let scaled = value * factor;

    let magnitude = scaled.abs().log10().floor() as i32;
    let pre_places = SIGNIFICANT_DIGITS - 1 - magnitude;
    // 10^pre_places overflows for values below roughly 1e-296.
    let scaled = if pre_places > 0 && pre_places <= f64::MAX_10_EXP {
        let pre_factor = 10f64.powi(pre_places);
        let snapped = (scaled * pre_factor).round() / pre_factor;
        if snapped.is_finite() {
            snapped
        } else {
            scaled
        }
    } else {
        scaled
    };

    let rounded = scaled.round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Numeric contribution of a progress value: unset (or unusable) progress counts as zero.
pub fn progress_value(progress: Option<f64>) -> f64 {
    match progress {
        Some(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Renders a progress value as a two-decimal percentage, e.g. `85.50%`.
pub fn format_progress(progress: Option<f64>) -> String {
    format!("{}%", format_decimal(progress_value(progress)))
}

/// Two decimals, half-up, integer part grouped by thousands (`1,234.50`).
pub fn format_decimal(value: f64) -> String {
    let rounded = round_half_up(value, 2);
    let plain = format!("{:.2}", rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(plain.len() + integer.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push('.');
    grouped.push_str(fraction);
    grouped
}

pub fn full_name(firstname: &str, lastname: &str) -> String {
    format!("{firstname} {lastname}").trim().to_string()
}

/// Colour coding used by the dashboard for progress values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    High,
    Medium,
    Low,
    Minimal,
}

impl ProgressBand {
    pub fn for_value(value: f64) -> Self {
        if value >= 75.0 {
            Self::High
        } else if value >= 50.0 {
            Self::Medium
        } else if value >= 25.0 {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Minimal => "Minimal",
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            Self::High => "band-high",
            Self::Medium => "band-medium",
            Self::Low => "band-low",
            Self::Minimal => "band-minimal",
        }
    }
}
