//! Best-effort reads over loosely-schematized JSON documents.
//!
//! Source documents vary between versions: optional wrapper keys, alternate
//! names for the same field, a bare object where a list is expected, numbers
//! serialized as strings. Every such read in the extractors goes through the
//! helpers below.
//!
//! A value is *present* when it is neither `null`, `false`, nor an empty
//! string. Absent values make a lookup fall through to the next candidate.

use serde_json::Value;

/// Key used by XML-derived documents for a node's text content.
const TEXT_NODE: &str = "#text";

/// Returns `true` unless the value is `null`, `false` or `""`.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Follows `path` from `value`, returning the target only if it is present.
pub fn at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    is_present(current).then_some(current)
}

/// Tries each candidate path in order and returns the first present value.
pub fn first<'a>(value: &'a Value, candidates: &[&[&str]]) -> Option<&'a Value> {
    candidates.iter().find_map(|path| at(value, path))
}

/// Scalar rendering of a node: strings as-is, numbers and `true` in their
/// JSON spelling, text nodes (`{"#text": ...}`) unwrapped.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Object(map) => map.get(TEXT_NODE).and_then(scalar_text),
        _ => None,
    }
}

/// First candidate that resolves to a scalar text value.
pub fn text(value: &Value, candidates: &[&[&str]]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|path| at(value, path))
        .find_map(scalar_text)
}

/// Like [`text`], defaulting to an empty string.
pub fn text_or_empty(value: &Value, candidates: &[&[&str]]) -> String {
    text(value, candidates).unwrap_or_default()
}

/// Treats "one object or an array of objects" uniformly as a sequence.
/// Missing and `null` yield an empty sequence.
pub fn as_sequence(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Integer count parsed leniently: numbers are truncated, strings contribute
/// their leading integer (`" 12 voix"` is 12), anything else is 0.
pub fn lenient_count(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => leading_integer(s),
        Some(Value::Object(map)) => lenient_count(map.get(TEXT_NODE)),
        _ => 0,
    }
}

/// [`lenient_count`] of the value at `path`.
pub fn count(value: &Value, path: &[&str]) -> i64 {
    lenient_count(at(value, path))
}

fn leading_integer(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Delegation flag policy: literal `"true"` or boolean `true` mean `Some(true)`.
/// Everything else, `"false"` included, means unspecified.
pub fn delegation_flag(value: Option<&Value>) -> Option<bool> {
    match value {
        Some(Value::Bool(true)) => Some(true),
        Some(Value::String(s)) if s == "true" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_falls_through_absent_candidates() {
        let doc = json!({"titre": "", "objet": {"libelle": "Motion"}});
        let found = first(&doc, &[&["titre"], &["objet", "libelle"]]);
        assert_eq!(found, Some(&json!("Motion")));

        assert!(first(&doc, &[&["missing"], &["objet", "missing"]]).is_none());
    }

    #[test]
    fn test_wrapper_then_root_resolution() {
        let wrapped = json!({"scrutin": {"uid": "V1"}});
        let bare = json!({"uid": "V2"});

        let root = at(&wrapped, &["scrutin"]).unwrap_or(&wrapped);
        assert_eq!(text(root, &[&["uid"]]).as_deref(), Some("V1"));

        let root = at(&bare, &["scrutin"]).unwrap_or(&bare);
        assert_eq!(text(root, &[&["uid"]]).as_deref(), Some("V2"));
    }

    #[test]
    fn test_text_unwraps_text_nodes_and_numbers() {
        let doc = json!({"uid": {"#text": "PA1"}, "numero": 42, "nested": {"a": 1}});
        assert_eq!(text(&doc, &[&["uid"]]).as_deref(), Some("PA1"));
        assert_eq!(text(&doc, &[&["numero"]]).as_deref(), Some("42"));
        assert_eq!(text(&doc, &[&["nested"]]), None);
        assert_eq!(text_or_empty(&doc, &[&["missing"]]), "");
    }

    #[test]
    fn test_as_sequence_shapes() {
        let single = json!({"organeRef": "G1"});
        let many = json!([{"organeRef": "G1"}, {"organeRef": "G2"}]);

        assert_eq!(as_sequence(Some(&single)), vec![&single]);
        assert_eq!(as_sequence(Some(&many)).len(), 2);
        assert!(as_sequence(None).is_empty());
        assert!(as_sequence(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn test_lenient_count() {
        assert_eq!(lenient_count(Some(&json!("10"))), 10);
        assert_eq!(lenient_count(Some(&json!(" 12 voix"))), 12);
        assert_eq!(lenient_count(Some(&json!("-3"))), -3);
        assert_eq!(lenient_count(Some(&json!(7.9))), 7);
        assert_eq!(lenient_count(Some(&json!("abc"))), 0);
        assert_eq!(lenient_count(Some(&json!(""))), 0);
        assert_eq!(lenient_count(Some(&json!(null))), 0);
        assert_eq!(lenient_count(Some(&json!({"x": 1}))), 0);
        assert_eq!(lenient_count(None), 0);
    }

    #[test]
    fn test_delegation_flag_policy() {
        assert_eq!(delegation_flag(Some(&json!("true"))), Some(true));
        assert_eq!(delegation_flag(Some(&json!(true))), Some(true));
        assert_eq!(delegation_flag(Some(&json!("false"))), None);
        assert_eq!(delegation_flag(Some(&json!(false))), None);
        assert_eq!(delegation_flag(Some(&json!("TRUE"))), None);
        assert_eq!(delegation_flag(None), None);
    }
}
