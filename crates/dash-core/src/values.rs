//! Helpers for reading loosely typed JSON cell values

use serde_json::Value;

/// Null-like value patterns used when excluding empty categories
#[derive(Debug, Clone)]
pub struct NullPatterns {
    /// Patterns to treat as null
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullPatterns {
    fn default() -> Self {
        Self {
            patterns: vec![
                String::new(),
                "null".to_string(),
                "none".to_string(),
                "undefined".to_string(),
                "unknown".to_string(),
                "n/a".to_string(),
            ],
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullPatterns {
    /// Check if a string should be treated as null
    pub fn is_null_str(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace { value.trim() } else { value };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Check if a JSON value (missing, null, or a null-like string) is null
    pub fn is_null(&self, value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => self.is_null_str(s),
            Some(_) => false,
        }
    }
}

/// Numeric view of a value; numeric strings count, everything else does not
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
    .filter(|n| n.is_finite())
}

/// Numeric view with missing/non-numeric values contributing 0
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    value.and_then(as_number).unwrap_or(0.0)
}

/// Plain display text for a cell value
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Format a number with thousands separators and at most `decimals` decimals
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (rounded.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && (int_part.chars().any(|c| c != '0') || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_patterns() {
        let nulls = NullPatterns::default();
        assert!(nulls.is_null(None));
        assert!(nulls.is_null(Some(&json!(null))));
        assert!(nulls.is_null(Some(&json!("  NULL "))));
        assert!(nulls.is_null(Some(&json!(""))));
        assert!(!nulls.is_null(Some(&json!("python"))));
        assert!(!nulls.is_null(Some(&json!(0))));
    }

    #[test]
    fn test_as_number() {
        assert_eq!(as_number(&json!(3)), Some(3.0));
        assert_eq!(as_number(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(as_number(&json!("abc")), None);
        assert_eq!(as_number(&json!(true)), None);
        assert_eq!(number_or_zero(None), 0.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.0, 0), "1,234,567");
        assert_eq!(format_number(1234.5, 2), "1,234.5");
        assert_eq!(format_number(-987.654, 2), "-987.65");
        assert_eq!(format_number(12.0, 2), "12");
        assert_eq!(format_number(-0.001, 2), "0");
        assert_eq!(format_number(999.0, 0), "999");
    }
}
