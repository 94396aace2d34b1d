//! Safe-CURIE handling.
//!
//! A safe CURIE is written `[prefix:local]` and expands to the prefix IRI
//! followed by `local`. Only JTM 1.1 documents may contain them; under 1.0
//! every identifier is taken verbatim.

use crate::error::{JtmError, Result};
use crate::version::Version;
use jtm_store::psi::XSD_NAMESPACE;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Prefix name reserved for the XML Schema namespace.
pub const XSD_PREFIX: &str = "xsd";

fn prefix_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("invalid regex"))
}

/// Checks that `name` can be used as a CURIE prefix.
///
/// Names start with a letter or underscore and continue with letters, digits,
/// `_`, `.` or `-`. In particular they never contain `:`.
pub fn is_valid_prefix_name(name: &str) -> bool {
    prefix_name_pattern().is_match(name)
}

/// Mapping from prefix names to namespace IRIs.
///
/// Iteration order is the prefix-name order, which keeps compaction and
/// serialization deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixTable(BTreeMap<String, String>);

impl PrefixTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding only the `xsd` prefix.
    pub fn with_xsd() -> Self {
        let mut table = Self::new();
        table
            .0
            .insert(XSD_PREFIX.to_string(), XSD_NAMESPACE.to_string());
        table
    }

    /// Registers a prefix, returning the IRI it previously mapped to.
    ///
    /// The name must satisfy [`is_valid_prefix_name`] and `xsd` may only be
    /// bound to the XML Schema namespace.
    pub fn insert(&mut self, prefix: &str, iri: &str) -> Result<Option<String>> {
        if !is_valid_prefix_name(prefix) {
            return Err(JtmError::invalid(format!("invalid prefix name: {}", prefix)));
        }
        if prefix == XSD_PREFIX && iri != XSD_NAMESPACE {
            return Err(JtmError::invalid(format!(
                "prefix xsd must map to {}, not {}",
                XSD_NAMESPACE, iri
            )));
        }
        Ok(self.0.insert(prefix.to_string(), iri.to_string()))
    }

    /// Copies every entry of `other` into this table.
    pub fn extend(&mut self, other: &PrefixTable) {
        for (prefix, iri) in other.iter() {
            self.0.insert(prefix.to_string(), iri.to_string());
        }
    }

    /// Looks up the IRI of a prefix.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(String::as_str)
    }

    /// Number of registered prefixes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no prefix is registered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(prefix, iri)` pairs in prefix order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Builds a table from the `prefixes` member of a JTM document.
    pub fn from_json(value: &Value) -> Result<Self> {
        let entries = value
            .as_object()
            .ok_or_else(|| JtmError::invalid("prefixes must be a JSON object"))?;
        let mut table = Self::new();
        for (prefix, iri) in entries {
            let iri = iri.as_str().ok_or_else(|| {
                JtmError::invalid(format!("prefix {} must map to a string", prefix))
            })?;
            table.insert(prefix, iri)?;
        }
        Ok(table)
    }

    /// Renders the table as the `prefixes` member of a JTM document.
    pub fn to_json(&self) -> Value {
        let entries: Map<String, Value> = self
            .0
            .iter()
            .map(|(prefix, iri)| (prefix.clone(), Value::String(iri.clone())))
            .collect();
        Value::Object(entries)
    }

    /// Expands a safe CURIE into an absolute IRI.
    ///
    /// Under 1.0, and for any text not starting with `[`, `reference` is
    /// returned unchanged. Under 1.1 an opening bracket must be matched by a
    /// trailing one.
    pub fn expand(&self, reference: &str, version: Version) -> Result<String> {
        if !version.is_compact() {
            return Ok(reference.to_string());
        }
        let Some(rest) = reference.strip_prefix('[') else {
            return Ok(reference.to_string());
        };
        let curie = rest
            .strip_suffix(']')
            .ok_or_else(|| JtmError::invalid(format!("CURIE without trailing bracket: {}", reference)))?;
        let (prefix, local) = curie
            .split_once(':')
            .ok_or_else(|| JtmError::invalid(format!("CURIE without prefix separator: {}", reference)))?;
        let iri = self
            .get(prefix)
            .filter(|iri| !iri.is_empty())
            .ok_or_else(|| JtmError::invalid(format!("missing prefix declaration: {}", prefix)))?;
        Ok(format!("{}{}", iri, local))
    }

    /// Rewrites `iri` as a safe CURIE using the longest matching prefix IRI.
    ///
    /// Ties between prefixes of equal IRI length go to the smallest prefix
    /// name. Under 1.0, or when no prefix matches, `iri` is returned unchanged.
    pub fn compact(&self, iri: &str, version: Version) -> String {
        if !version.is_compact() {
            return iri.to_string();
        }
        let mut best: Option<(&str, &str)> = None;
        for (prefix, namespace) in self.iter() {
            if namespace.is_empty() || !iri.starts_with(namespace) {
                continue;
            }
            if best.map_or(true, |(_, current)| namespace.len() > current.len()) {
                best = Some((prefix, namespace));
            }
        }
        match best {
            Some((prefix, namespace)) => format!("[{}:{}]", prefix, &iri[namespace.len()..]),
            None => iri.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> PrefixTable {
        let mut table = PrefixTable::new();
        for (prefix, iri) in entries {
            table.insert(prefix, iri).unwrap();
        }
        table
    }

    #[test]
    fn expands_known_prefix() {
        let prefixes = table(&[("ex", "http://example.org/")]);
        assert_eq!(
            prefixes.expand("[ex:alice]", Version::V1_1).unwrap(),
            "http://example.org/alice"
        );
    }

    #[test]
    fn local_part_may_contain_colons() {
        let prefixes = table(&[("urn", "urn:")]);
        assert_eq!(
            prefixes.expand("[urn:isbn:123]", Version::V1_1).unwrap(),
            "urn:isbn:123"
        );
    }

    #[test]
    fn unbracketed_text_is_verbatim() {
        let prefixes = table(&[("ex", "http://example.org/")]);
        assert_eq!(prefixes.expand("ex:alice", Version::V1_1).unwrap(), "ex:alice");
        assert_eq!(prefixes.expand("ex:alice]", Version::V1_1).unwrap(), "ex:alice]");
    }

    #[test]
    fn unterminated_curie_is_an_error() {
        let prefixes = table(&[("ex", "http://example.org/")]);
        let err = prefixes.expand("[ex:alice", Version::V1_1).unwrap_err();
        assert!(err.message().contains("trailing bracket"));
        assert!(prefixes.expand("[", Version::V1_1).is_err());
        // 1.0 has no CURIEs, so brackets are plain characters there
        assert_eq!(prefixes.expand("[ex:alice", Version::V1_0).unwrap(), "[ex:alice");
    }

    #[test]
    fn empty_namespace_counts_as_undeclared() {
        let prefixes = table(&[("e", "")]);
        let err = prefixes.expand("[e:http://x/a]", Version::V1_1).unwrap_err();
        assert_eq!(err.message(), "missing prefix declaration: e");
    }

    #[test]
    fn version_1_0_never_expands() {
        let prefixes = table(&[("ex", "http://example.org/")]);
        assert_eq!(prefixes.expand("[ex:alice]", Version::V1_0).unwrap(), "[ex:alice]");
        assert_eq!(
            prefixes.compact("http://example.org/alice", Version::V1_0),
            "http://example.org/alice"
        );
    }

    #[test]
    fn undefined_prefix_is_an_error() {
        let err = PrefixTable::new().expand("[ex:alice]", Version::V1_1).unwrap_err();
        assert!(err.message().contains("ex"));
    }

    #[test]
    fn missing_separator_is_an_error() {
        assert!(PrefixTable::with_xsd().expand("[xsd]", Version::V1_1).is_err());
    }

    #[test]
    fn compact_prefers_longest_namespace() {
        let prefixes = table(&[("ex", "http://example.org/"), ("people", "http://example.org/people/")]);
        assert_eq!(
            prefixes.compact("http://example.org/people/bob", Version::V1_1),
            "[people:bob]"
        );
        assert_eq!(prefixes.compact("http://example.org/bob", Version::V1_1), "[ex:bob]");
        assert_eq!(prefixes.compact("urn:other", Version::V1_1), "urn:other");
    }

    #[test]
    fn compact_breaks_ties_by_prefix_name() {
        let prefixes = table(&[("b", "http://example.org/"), ("a", "http://example.org/")]);
        assert_eq!(prefixes.compact("http://example.org/x", Version::V1_1), "[a:x]");
    }

    #[test]
    fn compact_then_expand_is_identity() {
        let prefixes = table(&[
            ("ex", "http://example.org/"),
            ("people", "http://example.org/people/"),
            ("urn", "urn:"),
        ]);
        for iri in [
            "http://example.org/people/bob",
            "http://example.org/",
            "http://example.org/a]b",
            "urn:isbn:0-123",
            "http://unrelated.net/x",
        ] {
            let compacted = prefixes.compact(iri, Version::V1_1);
            assert_eq!(prefixes.expand(&compacted, Version::V1_1).unwrap(), iri);
        }
    }

    #[test]
    fn insert_validates_prefix_names() {
        let mut prefixes = PrefixTable::new();
        assert!(prefixes.insert("ex:1", "http://example.org/").is_err());
        assert!(prefixes.insert("1ex", "http://example.org/").is_err());
        assert!(prefixes.insert("_ex.v-2", "http://example.org/").is_ok());
    }

    #[test]
    fn xsd_prefix_is_fixed() {
        let mut prefixes = PrefixTable::new();
        assert!(prefixes.insert("xsd", "http://example.org/xsd#").is_err());
        assert!(prefixes.insert("xsd", XSD_NAMESPACE).is_ok());
    }

    #[test]
    fn from_json_rejects_non_string_iris() {
        assert!(PrefixTable::from_json(&serde_json::json!({ "ex": 1 })).is_err());
        assert!(PrefixTable::from_json(&serde_json::json!(["ex"])).is_err());
    }
}
