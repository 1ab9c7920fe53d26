use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

/// A `homeLocationId` value of any JSON type, usable as a map key.
///
/// Keys are compared by their compact JSON text, with integral floats
/// written as integers. Numeric keys order
/// numerically and come before every other kind of key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocationKey {
    text: String,
}

impl LocationKey {
    pub fn new(value: &Value) -> Self {
        // 1.0 and 1 are the same location
        let text = match value.as_f64() {
            Some(n) if value.is_f64() && n.fract() == 0.0 && n.abs() < 1e15 => {
                (n as i64).to_string()
            }
            _ => value.to_string(),
        };
        Self { text }
    }

    fn number(&self) -> Option<f64> {
        match self.text.chars().next() {
            Some(c) if c == '-' || c.is_ascii_digit() => self.text.parse().ok(),
            _ => None,
        }
    }
}

impl Ord for LocationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.number(), other.number()) {
            (Some(a), Some(b)) => a.total_cmp(&b).then_with(|| self.text.cmp(&other.text)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.text.cmp(&other.text),
        }
    }
}

impl PartialOrd for LocationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::from_str::<String>(&self.text) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "{}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numbers_sort_numerically_first() {
        let mut keys = vec![
            LocationKey::new(&json!("b")),
            LocationKey::new(&json!(10)),
            LocationKey::new(&json!(null)),
            LocationKey::new(&json!(9)),
            LocationKey::new(&json!(-1.5)),
            LocationKey::new(&json!("a")),
        ];
        keys.sort();
        let shown = keys.iter().map(|k| k.to_string()).collect::<Vec<_>>();
        assert_eq!(shown, vec!["-1.5", "9", "10", "a", "b", "null"]);
    }

    #[test]
    fn equal_values_make_equal_keys() {
        assert_eq!(LocationKey::new(&json!(3)), LocationKey::new(&json!(3)));
        assert_ne!(LocationKey::new(&json!(3)), LocationKey::new(&json!("3")));
        assert_eq!(LocationKey::new(&json!(3.0)), LocationKey::new(&json!(3)));
        assert_eq!(LocationKey::new(&json!(-2.0)).to_string(), "-2");
        assert_ne!(LocationKey::new(&json!(3.5)), LocationKey::new(&json!(3)));
    }
}
