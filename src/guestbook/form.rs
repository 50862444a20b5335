//! Form body decoding.
//!
//! Bodies are decoded with a table of literal escape sequences before they
//! are split into `key=value` pairs. An escaped `&` or `=` therefore splits
//! the body like a literal one would.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

const DEFAULT_KEYS: &[(&str, &str)] = &[
    ("+", " "),
    ("%0D%0A", "\n"),
    ("%21", "!"),
    ("%22", "\""),
    ("%23", "#"),
    ("%24", "$"),
    ("%26", "&"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
    ("%2B", "+"),
    ("%2C", ","),
    ("%2F", "/"),
    ("%3A", ":"),
    ("%3B", ";"),
    ("%3C", "<"),
    ("%3D", "="),
    ("%3E", ">"),
    ("%3F", "?"),
    ("%40", "@"),
    ("%5B", "["),
    ("%5D", "]"),
    ("%7E", "~"),
    // Last, so a decoded '%' is never read as the start of another key.
    ("%25", "%"),
];

/// Ordered escape sequence → replacement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodingKeys {
    keys: Vec<(String, String)>,
}

impl Default for DecodingKeys {
    fn default() -> Self {
        Self::new(
            DEFAULT_KEYS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        )
    }
}

impl DecodingKeys {
    pub fn new(keys: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            keys: keys.into_iter().filter(|(k, _)| !k.is_empty()).collect(),
        }
    }

    /// Parses a JSON object of string values, keeping the file's key order.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(raw).context("decoding keys must be a JSON object")?;

        let keys = map
            .into_iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => Ok((k, s)),
                other => Err(anyhow::anyhow!("decoding key {k:?} maps to non-string {other}")),
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self::new(keys))
    }

    pub async fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Replaces every occurrence of every key, in table order.
    pub fn decode(&self, content: &str) -> String {
        self.keys
            .iter()
            .fold(content.to_string(), |acc, (key, value)| acc.replace(key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Splits `a=1&b=2` into pairs. A pair without `=` gets an empty value and
/// anything after a second `=` is dropped.
pub fn read_args(text: &str) -> HashMap<String, String> {
    text.split('&')
        .map(|pair| {
            let mut parts = pair.split('=');
            let key = parts.next().unwrap_or_default();
            let value = parts.next().unwrap_or_default();
            (key.to_string(), value.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_decodes_common_escapes() {
        let keys = DecodingKeys::default();
        assert_eq!(keys.decode("hello+world%21"), "hello world!");
        assert_eq!(keys.decode("100%25+sure"), "100% sure");
        assert_eq!(keys.decode("a%2Bb"), "a+b");
    }

    #[test]
    fn percent_literal_is_not_decoded_twice() {
        let keys = DecodingKeys::default();
        assert_eq!(keys.decode("%2521"), "%21");
    }

    #[test]
    fn read_args_handles_missing_values() {
        let args = read_args("comment=Hi&flag");
        assert_eq!(args["comment"], "Hi");
        assert_eq!(args["flag"], "");
    }

    #[test]
    fn read_args_keeps_last_repeated_key() {
        let args = read_args("comment=first&comment=second");
        assert_eq!(args.len(), 1);
        assert_eq!(args["comment"], "second");
    }

    #[test]
    fn json_table_applies_keys_in_file_order() {
        let keys = DecodingKeys::from_json(r#"{"%25":"%","+":" ","%21":"!"}"#).unwrap();

        assert_eq!(keys.len(), 3);
        // "%25" runs first, so the '%' it produces is decoded again by "%21".
        assert_eq!(keys.decode("%2521+x"), "! x");
    }

    #[test]
    fn json_table_rejects_non_string_values() {
        let err = DecodingKeys::from_json(r#"{"+":" ","%21":33}"#).unwrap_err();
        assert!(err.to_string().contains("%21"));
    }

    #[test]
    fn json_table_must_be_an_object() {
        assert!(DecodingKeys::from_json(r#"[["+", " "]]"#).is_err());
    }

    #[test]
    fn empty_keys_are_dropped() {
        let keys = DecodingKeys::from_json(r#"{"":"x","+":" "}"#).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys.decode("a+b"), "a b");
    }

    #[tokio::test]
    async fn from_file_reads_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decodingKeys.json");
        std::fs::write(&path, r#"{"%2C":","}"#).unwrap();

        let keys = DecodingKeys::from_file(&path).await.unwrap();
        assert_eq!(keys.decode("a%2Cb+c"), "a,b+c");

        assert!(DecodingKeys::from_file(&dir.path().join("missing.json")).await.is_err());
    }
}
