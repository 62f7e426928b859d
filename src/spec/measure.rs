//! Unit-aware parsing of option values such as "2 mm", `1"` or "0.14-2.00 mm".

use lazy_static::lazy_static;
use regex::Regex;

/// Two measurements closer than this (in millimeters) are the same value.
pub const MEASUREMENT_EPSILON_MM: f64 = 0.01;

const UNIT_PATTERN: &str = r#"(mm|cm|m|inches|inch|in|ft|"|')"#;

lazy_static! {
    static ref MEASUREMENT_RE: Regex = Regex::new(&format!(
        r"(?i)^\s*(\d+(?:\.\d+)?|\.\d+)\s*{UNIT_PATTERN}?\s*$"
    ))
    .expect("valid measurement regex");
    static ref RANGE_RE: Regex = Regex::new(&format!(
        r"(?i)^\s*(\d+(?:\.\d+)?)\s*{UNIT_PATTERN}?\s*(?:-|–|to)\s*(\d+(?:\.\d+)?)\s*{UNIT_PATTERN}?\s*$"
    ))
    .expect("valid range regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Millimeter,
    Centimeter,
    Meter,
    Inch,
    Foot,
}

impl Unit {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "mm" => Some(Unit::Millimeter),
            "cm" => Some(Unit::Centimeter),
            "m" => Some(Unit::Meter),
            "inch" | "inches" | "in" | "\"" => Some(Unit::Inch),
            "ft" | "'" => Some(Unit::Foot),
            _ => None,
        }
    }

    fn to_mm_factor(self) -> f64 {
        match self {
            Unit::Millimeter => 1.0,
            Unit::Centimeter => 10.0,
            Unit::Meter => 1000.0,
            Unit::Inch => 25.4,
            Unit::Foot => 304.8,
        }
    }
}

/// A single numeric magnitude with an optional unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub value: f64,
    pub unit: Option<Unit>,
}

impl Measurement {
    /// Parse a value that is exactly a number with an optional unit. Anything
    /// with trailing text ("304L", "2 mm thick") is rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = MEASUREMENT_RE.captures(text)?;
        let value = caps.get(1)?.as_str().parse::<f64>().ok()?;
        let unit = caps.get(2).and_then(|m| Unit::parse(m.as_str()));
        Some(Measurement { value, unit })
    }

    /// Value in millimeters; a missing unit is read as millimeters.
    pub fn to_mm(&self) -> f64 {
        self.value * self.unit.map_or(1.0, Unit::to_mm_factor)
    }

    pub fn approx_eq(&self, other: &Measurement) -> bool {
        (self.to_mm() - other.to_mm()).abs() < MEASUREMENT_EPSILON_MM
    }
}

/// A closed numeric range such as "0.14-2.00 mm"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub unit: Option<Unit>,
}

impl NumericRange {
    pub fn parse(text: &str) -> Option<Self> {
        let caps = RANGE_RE.captures(text)?;
        let a = caps.get(1)?.as_str().parse::<f64>().ok()?;
        let b = caps.get(3)?.as_str().parse::<f64>().ok()?;
        // "10mm-2m" style ranges are rare; the closing unit wins when present
        let unit = caps
            .get(4)
            .or_else(|| caps.get(2))
            .and_then(|m| Unit::parse(m.as_str()));

        Some(NumericRange {
            min: a.min(b),
            max: a.max(b),
            unit,
        })
    }

    /// Inclusive containment. When both sides carry a unit the comparison is
    /// made in millimeters; otherwise raw magnitudes are compared.
    pub fn contains(&self, m: &Measurement) -> bool {
        match (self.unit, m.unit) {
            (Some(range_unit), Some(_)) => {
                let factor = range_unit.to_mm_factor();
                let v = m.to_mm();
                v >= self.min * factor - MEASUREMENT_EPSILON_MM
                    && v <= self.max * factor + MEASUREMENT_EPSILON_MM
            }
            _ => m.value >= self.min && m.value <= self.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_parse() {
        let m = Measurement::parse("2.0 mm").unwrap();
        assert_eq!(m.value, 2.0);
        assert_eq!(m.unit, Some(Unit::Millimeter));

        assert_eq!(Measurement::parse("1 inch").unwrap().unit, Some(Unit::Inch));
        assert_eq!(Measurement::parse("3'").unwrap().unit, Some(Unit::Foot));
        assert_eq!(Measurement::parse("12\"").unwrap().unit, Some(Unit::Inch));
        assert_eq!(Measurement::parse("2 M").unwrap().unit, Some(Unit::Meter));
        assert_eq!(Measurement::parse("304").unwrap().unit, None);

        assert!(Measurement::parse("304L").is_none());
        assert!(Measurement::parse("2 mm thick").is_none());
        assert!(Measurement::parse("0.14-2.00 mm").is_none());
        assert!(Measurement::parse("").is_none());
    }

    #[test]
    fn test_conversion_to_mm() {
        assert_eq!(Measurement::parse("2 cm").unwrap().to_mm(), 20.0);
        assert_eq!(Measurement::parse("1.5m").unwrap().to_mm(), 1500.0);
        assert_eq!(Measurement::parse("1 ft").unwrap().to_mm(), 304.8);
        assert!(Measurement::parse("1 inch")
            .unwrap()
            .approx_eq(&Measurement::parse("25.4mm").unwrap()));
        assert!(!Measurement::parse("1 inch")
            .unwrap()
            .approx_eq(&Measurement::parse("25.5mm").unwrap()));
    }

    #[test]
    fn test_range_parse() {
        let r = NumericRange::parse("0.14-2.00 mm").unwrap();
        assert_eq!(r.min, 0.14);
        assert_eq!(r.max, 2.0);
        assert_eq!(r.unit, Some(Unit::Millimeter));

        let r = NumericRange::parse("10 to 50").unwrap();
        assert_eq!((r.min, r.max, r.unit), (10.0, 50.0, None));

        assert!(NumericRange::parse("2 mm").is_none());
        assert!(NumericRange::parse("IS 2062").is_none());
    }

    #[test]
    fn test_range_contains() {
        let r = NumericRange::parse("0.14-2.00 mm").unwrap();
        assert!(r.contains(&Measurement::parse("0.5 mm").unwrap()));
        assert!(r.contains(&Measurement::parse("2.00 mm").unwrap()));
        assert!(r.contains(&Measurement::parse("1.5").unwrap()));
        assert!(r.contains(&Measurement::parse("0.1 cm").unwrap()));
        assert!(!r.contains(&Measurement::parse("2.5 mm").unwrap()));

        let unitless = NumericRange::parse("1-3").unwrap();
        assert!(unitless.contains(&Measurement::parse("2 inch").unwrap()));
    }
}
