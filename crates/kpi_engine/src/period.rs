use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const MONTHS_ES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto", "Septiembre",
    "Octubre", "Noviembre", "Diciembre",
];

/// Language used for month names and report labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    fn months(self) -> &'static [&'static str; 12] {
        match self {
            Locale::En => &MONTHS_EN,
            Locale::Es => &MONTHS_ES,
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "es" | "spanish" => Ok(Locale::Es),
            other => Err(format!("unsupported locale '{other}' (use en or es)")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::Es => f.write_str("es"),
        }
    }
}

fn period_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{2})$").ok())
        .as_ref()
}

/// Splits a `"YYYY-MM"` key into year and month (1..=12).
pub fn parse_period(period: &str) -> Option<(i32, u32)> {
    let caps = period_regex()?.captures(period)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    if (1..=12).contains(&month) {
        Some((year, month))
    } else {
        None
    }
}

/// `"2024-02"` → `"February 2024"`; unrecognised keys are returned as-is.
pub fn format_period(period: &str, locale: Locale) -> String {
    match parse_period(period) {
        Some((year, month)) => format!("{} {}", locale.months()[(month - 1) as usize], year),
        None => period.to_string(),
    }
}

pub fn format_periods(periods: &[String], locale: Locale) -> Vec<String> {
    periods.iter().map(|p| format_period(p, locale)).collect()
}
