//! Typed decoder parameters with SI-suffixed text conversion

use std::fmt;

/// Kind of a decoder parameter, fixed when the parameter is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Bool,
    Int,
    Float,
    Filename,
}

/// A decoder parameter value.
///
/// The variant is the authoritative representation. The other accessors
/// derive from it, so `as_int` and `as_float` are always valid for every
/// kind. Setters never change the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Filename(String),
}

impl ParameterValue {
    /// Zero value of the given kind
    pub fn new(kind: ParameterKind) -> Self {
        match kind {
            ParameterKind::Bool => ParameterValue::Bool(false),
            ParameterKind::Int => ParameterValue::Int(0),
            ParameterKind::Float => ParameterValue::Float(0.0),
            ParameterKind::Filename => ParameterValue::Filename(String::new()),
        }
    }

    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Bool(_) => ParameterKind::Bool,
            ParameterValue::Int(_) => ParameterKind::Int,
            ParameterValue::Float(_) => ParameterKind::Float,
            ParameterValue::Filename(_) => ParameterKind::Filename,
        }
    }

    pub fn as_bool(&self) -> bool {
        self.as_int() != 0
    }

    pub fn as_int(&self) -> i64 {
        match self {
            ParameterValue::Bool(b) => i64::from(*b),
            ParameterValue::Int(i) => *i,
            ParameterValue::Float(f) => *f as i64,
            ParameterValue::Filename(_) => 0,
        }
    }

    pub fn as_float(&self) -> f64 {
        match self {
            ParameterValue::Bool(b) => f64::from(u8::from(*b)),
            ParameterValue::Int(i) => *i as f64,
            ParameterValue::Float(f) => *f,
            ParameterValue::Filename(_) => 0.0,
        }
    }

    /// Path value, empty for numeric kinds
    pub fn filename(&self) -> &str {
        match self {
            ParameterValue::Filename(path) => path,
            _ => "",
        }
    }

    pub fn set_bool(&mut self, value: bool) {
        self.set_int(i64::from(value));
    }

    pub fn set_int(&mut self, value: i64) {
        *self = match self.kind() {
            ParameterKind::Bool => ParameterValue::Bool(value != 0),
            ParameterKind::Int => ParameterValue::Int(value),
            ParameterKind::Float => ParameterValue::Float(value as f64),
            ParameterKind::Filename => ParameterValue::Filename(String::new()),
        };
    }

    pub fn set_float(&mut self, value: f64) {
        *self = match self.kind() {
            ParameterKind::Bool => ParameterValue::Bool(value as i64 != 0),
            ParameterKind::Int => ParameterValue::Int(value as i64),
            ParameterKind::Float => ParameterValue::Float(value),
            ParameterKind::Filename => ParameterValue::Filename(String::new()),
        };
    }

    pub fn set_filename(&mut self, path: impl Into<String>) {
        *self = match self.kind() {
            ParameterKind::Filename => ParameterValue::Filename(path.into()),
            kind => ParameterValue::new(kind),
        };
    }

    /// Parse user or configuration text into this parameter.
    ///
    /// A trailing `G`, `M`, `K` (or `k`), `m` or `u` scales numeric values.
    /// Malformed numbers parse as zero. Booleans accept exactly `1` or `true`.
    pub fn parse_text(&mut self, text: &str) {
        match self.kind() {
            ParameterKind::Bool => {
                *self = ParameterValue::Bool(text == "1" || text == "true");
            }
            // Ints go through floating point so "1.5M" works
            ParameterKind::Int | ParameterKind::Float => {
                let value = leading_float(text) * si_scale(text);
                self.set_float(value);
            }
            ParameterKind::Filename => {
                *self = ParameterValue::Filename(text.to_string());
            }
        }
    }

    /// Text form for display and configuration, auto-scaled above 1000
    pub fn format_text(&self) -> String {
        match self {
            ParameterValue::Float(f) => {
                format_scaled(*f).unwrap_or_else(|| format!("{:.6}", f))
            }
            ParameterValue::Bool(_) | ParameterValue::Int(_) => {
                let i = self.as_int();
                format_scaled(i as f64).unwrap_or_else(|| i.to_string())
            }
            ParameterValue::Filename(path) => path.clone(),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.format_text())
    }
}

fn si_scale(text: &str) -> f64 {
    match text.chars().last() {
        Some('G') => 1e9,
        Some('M') => 1e6,
        Some('K') | Some('k') => 1e3,
        Some('m') => 1e-3,
        Some('u') => 1e-6,
        _ => 1.0,
    }
}

fn format_scaled(value: f64) -> Option<String> {
    let magnitude = value.abs();
    if magnitude > 1e9 {
        Some(format!("{:.6} G", value / 1e9))
    } else if magnitude > 1e6 {
        Some(format!("{:.6} M", value / 1e6))
    } else if magnitude > 1e3 {
        Some(format!("{:.6} k", value / 1e3))
    } else {
        None
    }
}

/// Longest prefix of `text` that reads as a decimal float, or 0.0
fn leading_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let mantissa_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    let mantissa = &s[mantissa_start..end];
    if mantissa.is_empty() || mantissa == "." {
        return 0.0;
    }

    // Exponent only counts if it has digits
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}
