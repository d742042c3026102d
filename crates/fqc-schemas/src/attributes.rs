use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One feature attribute value as read from the source layer.
///
/// Source schemas are definite-valued or null: a blank field arrives as an
/// explicit `Null`, never as an empty string. An attribute that is missing
/// from the record's map entirely is *not* representable here; that is
/// schema drift and is surfaced as a rule fault by the evaluator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    /// Blank per the source schema (explicit null).
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Equality against an enumerated numeric code.
    pub fn eq_code(&self, code: i64) -> bool {
        match self {
            AttrValue::Int(i) => *i == code,
            AttrValue::Float(f) => *f == code as f64,
            _ => false,
        }
    }

    /// Equality against an enumerated text value. Null never matches.
    pub fn eq_text(&self, s: &str) -> bool {
        matches!(self, AttrValue::Text(t) if t == s)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            AttrValue::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Convert a raw wire value (portal JSON) into an attribute value.
    pub fn from_json(v: &Value) -> AttrValue {
        match v {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Int(i64::from(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    AttrValue::Int(i)
                } else {
                    AttrValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => AttrValue::Text(s.clone()),
            // Arrays/objects do not occur in attribute maps; keep the value
            // visible rather than silently nulling it.
            other => AttrValue::Text(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_blank_and_matches_nothing() {
        assert!(AttrValue::Null.is_null());
        assert!(!AttrValue::Null.eq_code(0));
        assert!(!AttrValue::Null.eq_text(""));
    }

    #[test]
    fn code_equality_covers_int_and_float_wire_forms() {
        assert!(AttrValue::Int(2).eq_code(2));
        assert!(AttrValue::Float(2.0).eq_code(2));
        assert!(!AttrValue::Int(2).eq_code(0));
        assert!(!AttrValue::Text("2".into()).eq_code(2));
    }

    #[test]
    fn from_json_maps_wire_shapes() {
        assert_eq!(AttrValue::from_json(&serde_json::json!(null)), AttrValue::Null);
        assert_eq!(AttrValue::from_json(&serde_json::json!(7)), AttrValue::Int(7));
        assert_eq!(
            AttrValue::from_json(&serde_json::json!("Footway")),
            AttrValue::Text("Footway".into())
        );
    }
}
