//! Lenient string fields
//!
//! Request documents are hand-written YAML, where `num-cpus: 1` or
//! `version: 2.9` arrive as numbers. Fields that are strings on the wire to
//! the Ray operator accept any scalar and keep its textual form.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::String(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::UInt(u) => u.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Deserialize a string, accepting numbers and booleans
pub(crate) fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(String::from)
}

/// Deserialize a string map, accepting numbers and booleans as values
pub(crate) fn string_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let raw = BTreeMap::<String, Scalar>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.into())).collect())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Params {
        #[serde(deserialize_with = "super::string")]
        version: String,
        #[serde(deserialize_with = "super::string_map")]
        params: std::collections::BTreeMap<String, String>,
    }

    #[test]
    fn scalars_keep_their_text() {
        let p: Params = serde_json::from_value(json!({
            "version": 2.5,
            "params": {"num-cpus": 1, "block": true, "port": "6379", "ratio": 0.5}
        }))
        .unwrap();
        assert_eq!(p.version, "2.5");
        assert_eq!(p.params["num-cpus"], "1");
        assert_eq!(p.params["block"], "true");
        assert_eq!(p.params["port"], "6379");
        assert_eq!(p.params["ratio"], "0.5");
    }

    #[test]
    fn nested_values_are_rejected() {
        let result = serde_json::from_value::<Params>(json!({
            "version": "2.9.0",
            "params": {"nested": {"a": 1}}
        }));
        assert!(result.is_err());
    }
}
