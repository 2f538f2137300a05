//! Serde helpers shared by the proxy record types.
//!
//! Used with `skip_serializing_if` / `deserialize_with` so records emit only
//! the fields a decoder actually set, and accept the loosely typed values
//! found in hand-written records (ports as strings, single strings where a
//! list is expected).

use serde::{Deserialize, Deserializer};

/// Returns `true` if the boolean value is `false`.
///
/// Used with `#[serde(skip_serializing_if = "is_false")]` to omit false values.
#[inline]
pub fn is_false(b: &bool) -> bool {
    !*b
}

/// Deserializes a port given either as a number or as a numeric string.
pub fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        String(String),
    }

    match PortValue::deserialize(deserializer)? {
        PortValue::Number(n) => Ok(n),
        PortValue::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Deserializes an optional u32 given as a number, a numeric string, an empty
/// string or null.
pub fn deserialize_option_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum U32Value {
        Number(u32),
        String(String),
    }

    match Option::<U32Value>::deserialize(deserializer)? {
        Some(U32Value::Number(n)) => Ok(Some(n)),
        Some(U32Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(U32Value::String(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrVec {
    Single(String),
    Multiple(Vec<String>),
}

/// Deserializes a field that can be either a single string or an array of strings.
///
/// Use with `#[serde(default, deserialize_with = "string_or_vec")]`
pub fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrVec::deserialize(deserializer)? {
        StringOrVec::Single(s) => Ok(vec![s]),
        StringOrVec::Multiple(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "deserialize_port")]
        port: u16,
        #[serde(default, deserialize_with = "deserialize_option_u32")]
        timeout: Option<u32>,
        #[serde(default, deserialize_with = "string_or_vec")]
        alpn: Vec<String>,
    }

    #[test]
    fn test_is_false() {
        assert!(is_false(&false));
        assert!(!is_false(&true));
    }

    #[test]
    fn test_port_from_number_and_string() {
        let a: Probe = serde_json::from_str(r#"{"port": 443}"#).unwrap();
        let b: Probe = serde_json::from_str(r#"{"port": "8443"}"#).unwrap();
        assert_eq!(a.port, 443);
        assert_eq!(b.port, 8443);
    }

    #[test]
    fn test_port_rejects_garbage() {
        assert!(serde_json::from_str::<Probe>(r#"{"port": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Probe>(r#"{"port": 70000}"#).is_err());
    }

    #[test]
    fn test_option_u32_variants() {
        let p: Probe = serde_json::from_str(r#"{"port": 1, "timeout": "5"}"#).unwrap();
        assert_eq!(p.timeout, Some(5));
        let p: Probe = serde_json::from_str(r#"{"port": 1, "timeout": ""}"#).unwrap();
        assert_eq!(p.timeout, None);
        let p: Probe = serde_json::from_str(r#"{"port": 1, "timeout": null}"#).unwrap();
        assert_eq!(p.timeout, None);
    }

    #[test]
    fn test_string_or_vec() {
        let p: Probe = serde_json::from_str(r#"{"port": 1, "alpn": "h3"}"#).unwrap();
        assert_eq!(p.alpn, vec!["h3"]);
        let p: Probe = serde_json::from_str(r#"{"port": 1, "alpn": ["h2", "http/1.1"]}"#).unwrap();
        assert_eq!(p.alpn, vec!["h2", "http/1.1"]);
    }
}
