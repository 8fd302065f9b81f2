use serde::Serialize;

pub const NOT_AVAILABLE: &str = "N/A";

/// Abbreviates a magnitude with a T/B/M/K suffix, always two decimals.
///
/// ```
/// use kpi_engine::format_number;
/// assert_eq!(format_number(1_500_000.0), "1.50M");
/// assert_eq!(format_number(999.0), "999.00");
/// assert_eq!(format_number(-2_300_000_000.0), "-2.30B");
/// ```
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };
    format!("{}{}", fixed2(scaled), suffix)
}

/// `format_number` with a leading currency sign, keeping the minus in front: `-$1.20K`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let formatted = format_number(value);
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${formatted}"),
    }
}

pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{}%", format_number(value))
}

/// Two decimals, exact halves rounded away from zero (`1.125` -> `1.13`).
fn fixed2(v: f64) -> String {
    let s = match half_cent_tie(v.abs()) {
        Some(cents) => {
            let sign = if v < 0.0 { "-" } else { "" };
            format!("{sign}{}.{:02}", cents / 100, cents % 100)
        }
        None => format!("{v:.2}"),
    };
    // "-0.00" reads as a sign error on a card
    if s == "-0.00" {
        "0.00".to_string()
    } else {
        s
    }
}

/// Rounded-up cents when `abs` lies exactly halfway between two cents.
///
/// `format!` breaks such ties to even. A value is a tie iff `abs * 200` is an
/// odd integer with no rounding error in the product.
fn half_cent_tie(abs: f64) -> Option<u64> {
    let doubled = abs * 200.0;
    if doubled >= 2f64.powi(53)
        || doubled.fract() != 0.0
        || abs.mul_add(200.0, -doubled) != 0.0
    {
        return None;
    }
    let doubled = doubled as u64;
    (doubled % 2 == 1).then(|| doubled / 2 + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Trend::Up
        } else if value < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Flat => "",
        }
    }
}

/// Trend arrow for a signed value.
pub fn trend(value: f64) -> &'static str {
    Trend::of(value).glyph()
}

/// Display colour of a value on cards and in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
    Purple,
    Indigo,
    Teal,
    Amber,
}

impl Tone {
    /// Green above zero, red below, gray at zero or NaN.
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Tone::Positive
        } else if value < 0.0 {
            Tone::Negative
        } else {
            Tone::Neutral
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Tone::Positive => "text-green-600",
            Tone::Negative => "text-red-600",
            Tone::Neutral => "text-gray-600",
            Tone::Purple => "text-purple-600",
            Tone::Indigo => "text-indigo-600",
            Tone::Teal => "text-teal-600",
            Tone::Amber => "text-amber-600",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Tone::Positive => (22, 163, 74),
            Tone::Negative => (220, 38, 38),
            Tone::Neutral => (75, 85, 99),
            Tone::Purple => (147, 51, 234),
            Tone::Indigo => (79, 70, 229),
            Tone::Teal => (13, 148, 136),
            Tone::Amber => (217, 119, 6),
        }
    }
}

/// CSS colour class for a signed value.
pub fn value_color(value: f64) -> &'static str {
    Tone::of(value).css_class()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_by_magnitude() {
        assert_eq!(format_number(1_500_000.0), "1.50M");
        assert_eq!(format_number(999.0), "999.00");
        assert_eq!(format_number(-2_300_000_000.0), "-2.30B");
        assert_eq!(format_number(1e12), "1.00T");
        assert_eq!(format_number(-2_841_960_946_116.74), "-2.84T");
        assert_eq!(format_number(1_000.0), "1.00K");
        assert_eq!(format_number(0.0), "0.00");
        assert_eq!(format_number(-0.001), "0.00");
    }

    #[test]
    fn exact_halves_round_away_from_zero() {
        assert_eq!(format_number(1_125.0), "1.13K");
        assert_eq!(format_number(0.125), "0.13");
        assert_eq!(format_number(2_625_000.0), "2.63M");
        assert_eq!(format_number(-1_125.0), "-1.13K");
        assert_eq!(format_number(0.005), "0.01");
        assert_eq!(format_currency(-0.375), "-$0.38");
        // 1.005 is stored just below the half, so it stays down
        assert_eq!(format_number(1.005), "1.00");
    }

    #[test]
    fn non_finite_is_not_available() {
        assert_eq!(format_number(f64::NAN), "N/A");
        assert_eq!(format_number(f64::NEG_INFINITY), "N/A");
        assert_eq!(format_percent(f64::NAN), "N/A");
    }

    #[test]
    fn currency_keeps_sign_in_front() {
        assert_eq!(format_currency(1_200.0), "$1.20K");
        assert_eq!(format_currency(-1_200.0), "-$1.20K");
        assert_eq!(format_percent(12.5), "12.50%");
    }

    #[test]
    fn trend_glyphs() {
        assert_eq!(trend(5.0), "↑");
        assert_eq!(trend(-5.0), "↓");
        assert_eq!(trend(0.0), "");
        assert_eq!(trend(f64::NAN), "");
    }

    #[test]
    fn value_colors() {
        assert_eq!(value_color(3.0), "text-green-600");
        assert_eq!(value_color(-3.0), "text-red-600");
        assert_eq!(value_color(0.0), "text-gray-600");
        assert_eq!(Tone::of(-1.0).rgb(), (220, 38, 38));
    }
}
