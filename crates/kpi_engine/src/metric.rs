use serde::{Serialize, Serializer};
use std::fmt;

/// A derived KPI value.
///
/// Degenerate inputs (zero denominators, empty series, non-finite results)
/// produce `Unavailable` instead of a NaN or infinite float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    Unavailable,
}

impl Metric {
    /// Wraps `v`, mapping NaN and infinities to `Unavailable`.
    pub fn from_f64(v: f64) -> Self {
        if v.is_finite() {
            Metric::Value(v)
        } else {
            Metric::Unavailable
        }
    }

    /// `numerator / denominator`, unavailable when the denominator is zero.
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return Metric::Unavailable;
        }
        Metric::from_f64(numerator / denominator)
    }

    /// `numerator / denominator * 100`.
    pub fn percent(numerator: f64, denominator: f64) -> Self {
        Metric::ratio(numerator, denominator).map(|v| v * 100.0)
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Metric::Value(_))
    }

    /// Applies `f` to an available value; the result is re-checked for finiteness.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Metric::Value(v) => Metric::from_f64(f(v)),
            Metric::Unavailable => Metric::Unavailable,
        }
    }

    pub fn unwrap_or(self, default: f64) -> f64 {
        self.value().unwrap_or(default)
    }
}

impl From<Option<f64>> for Metric {
    fn from(v: Option<f64>) -> Self {
        v.map(Metric::from_f64).unwrap_or(Metric::Unavailable)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{}", crate::format::format_number(*v)),
            Metric::Unavailable => f.write_str(crate::format::NOT_AVAILABLE),
        }
    }
}

// Serialized as a plain number, or null when unavailable.
impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => serializer.serialize_f64(*v),
            Metric::Unavailable => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_is_unavailable() {
        assert_eq!(Metric::ratio(10.0, 0.0), Metric::Unavailable);
        assert_eq!(Metric::ratio(0.0, 0.0), Metric::Unavailable);
        assert_eq!(Metric::percent(1.0, -0.0), Metric::Unavailable);
    }

    #[test]
    fn non_finite_values_are_unavailable() {
        assert_eq!(Metric::from_f64(f64::NAN), Metric::Unavailable);
        assert_eq!(Metric::from_f64(f64::INFINITY), Metric::Unavailable);
        assert_eq!(Metric::ratio(f64::MAX, 1e-300), Metric::Unavailable);
        assert_eq!(Metric::from(None), Metric::Unavailable);
    }

    #[test]
    fn percent_scales_by_hundred() {
        assert_eq!(Metric::percent(1.0, 4.0), Metric::Value(25.0));
        assert_eq!(Metric::Value(2.0).map(|v| v * 3.0).value(), Some(6.0));
    }

    #[test]
    fn serializes_unavailable_as_null() {
        let json = serde_json::to_string(&vec![Metric::Value(1.5), Metric::Unavailable]).unwrap();
        assert_eq!(json, "[1.5,null]");
    }

    #[test]
    fn displays_formatted() {
        assert_eq!(Metric::Value(1_500_000.0).to_string(), "1.50M");
        assert_eq!(Metric::Unavailable.to_string(), "N/A");
    }
}
