//! Provider metadata and the direct-connection flag it may carry.
//!
//! Metadata arrives as an opaque JSON document. Only one string field is read:
//! [`REJECT_DIRECT_CONNECTION_KEY`]. Anything that prevents reading it degrades
//! to [`DirectConnectionFlag::Unknown`], which the policy treats as "not strict".

use std::fmt;

use log::debug;
use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};

/// Metadata field that, when `"true"` or `"1"`, forbids direct connections.
pub const REJECT_DIRECT_CONNECTION_KEY: &str = "reject_direct_connection";

/// The flag field as found in a metadata object.
///
/// Keys are visited in document order and matched ASCII case-insensitively, so
/// when the key repeats (in any casing) the last occurrence wins. Any other
/// field is skipped without being materialized.
#[derive(Debug, Default)]
struct FlagField {
    value: Option<String>,
    mistyped: bool,
}

impl FlagField {
    fn flag(&self) -> DirectConnectionFlag {
        if self.mistyped {
            return DirectConnectionFlag::Unknown;
        }
        self.value
            .as_deref()
            .map_or(DirectConnectionFlag::Allow, DirectConnectionFlag::from_value)
    }
}

impl<'de> Deserialize<'de> for FlagField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(FlagFieldVisitor)
    }
}

struct FlagFieldVisitor;

impl<'de> Visitor<'de> for FlagFieldVisitor {
    type Value = FlagField;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a metadata object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut field = FlagField::default();
        while let Some(key) = map.next_key::<String>()? {
            if !key.eq_ignore_ascii_case(REJECT_DIRECT_CONNECTION_KEY) {
                map.next_value::<IgnoredAny>()?;
                continue;
            }
            match map.next_value::<serde_json::Value>()? {
                serde_json::Value::String(s) => field.value = Some(s),
                serde_json::Value::Null => {}
                // A mistyped occurrence spoils the whole document, even if a later one is valid.
                _ => field.mistyped = true,
            }
        }
        Ok(field)
    }
}

fn decode_flag_field(raw: &[u8]) -> serde_json::Result<FlagField> {
    match serde_json::from_slice(raw) {
        // Invalid UTF-8 inside strings is replaced rather than rejected.
        Err(e) if std::str::from_utf8(raw).is_err() => {
            serde_json::from_str(&String::from_utf8_lossy(raw)).map_err(|_| e)
        }
        result => result,
    }
}

/// Resolved state of the direct-connection flag.
///
/// Splits "explicitly allowed" from "could not tell" so callers can observe the
/// difference, while [`is_strict`](Self::is_strict) keeps both non-strict.
///
/// # Examples
///
/// ```
/// use proxyguard_common::{DirectConnectionFlag, ProviderMetadata};
///
/// let meta = ProviderMetadata::from(r#"{"reject_direct_connection":"1"}"#);
/// assert_eq!(meta.direct_connection_flag(), DirectConnectionFlag::Reject);
///
/// let meta = ProviderMetadata::from("not json");
/// assert_eq!(meta.direct_connection_flag(), DirectConnectionFlag::Unknown);
/// assert!(!meta.direct_connection_flag().is_strict());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DirectConnectionFlag {
    /// The document sets the flag to `"true"` or `"1"`.
    Reject,
    /// The document was readable and the flag is missing or any other string.
    Allow,
    /// The document is empty or could not be decoded.
    Unknown,
}

impl DirectConnectionFlag {
    /// Interprets a raw flag value. Matching is exact and case-sensitive.
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        match value {
            "true" | "1" => Self::Reject,
            _ => Self::Allow,
        }
    }

    /// Returns `true` only when direct connections are explicitly rejected.
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Reject)
    }
}

impl fmt::Display for DirectConnectionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Allow => write!(f, "allow"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Opaque metadata document describing a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderMetadata {
    raw: Vec<u8>,
}

impl ProviderMetadata {
    /// Wraps raw document bytes. No parsing happens here.
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self { raw: raw.into() }
    }

    /// An empty document, equivalent to absent metadata.
    #[must_use]
    pub const fn empty() -> Self {
        Self { raw: Vec::new() }
    }

    /// Raw document bytes as supplied.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Returns `true` if the document has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Decodes the direct-connection flag.
    ///
    /// Never fails: empty input, malformed JSON, a non-object document or a
    /// non-string flag value all resolve to [`DirectConnectionFlag::Unknown`].
    ///
    /// The key matches ASCII case-insensitively and, when it repeats, its last
    /// occurrence in the document wins.
    #[must_use]
    pub fn direct_connection_flag(&self) -> DirectConnectionFlag {
        if self.raw.is_empty() {
            return DirectConnectionFlag::Unknown;
        }

        match decode_flag_field(&self.raw) {
            Ok(field) => field.flag(),
            Err(e) => {
                debug!("Ignoring unreadable provider metadata: {e}");
                DirectConnectionFlag::Unknown
            }
        }
    }
}

impl From<&str> for ProviderMetadata {
    fn from(raw: &str) -> Self {
        Self::new(raw.as_bytes())
    }
}

impl From<String> for ProviderMetadata {
    fn from(raw: String) -> Self {
        Self::new(raw.into_bytes())
    }
}

impl From<&[u8]> for ProviderMetadata {
    fn from(raw: &[u8]) -> Self {
        Self::new(raw)
    }
}

impl From<Vec<u8>> for ProviderMetadata {
    fn from(raw: Vec<u8>) -> Self {
        Self::new(raw)
    }
}

impl From<&serde_json::Value> for ProviderMetadata {
    fn from(value: &serde_json::Value) -> Self {
        Self::new(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag_for(raw: &str) -> DirectConnectionFlag {
        ProviderMetadata::from(raw).direct_connection_flag()
    }

    #[test]
    fn test_true_and_one_are_strict() {
        assert_eq!(
            flag_for(r#"{"reject_direct_connection":"true"}"#),
            DirectConnectionFlag::Reject
        );
        assert_eq!(
            flag_for(r#"{"reject_direct_connection":"1"}"#),
            DirectConnectionFlag::Reject
        );
    }

    #[test]
    fn test_other_strings_allow() {
        for value in ["True", "TRUE", "yes", "", "0", "false", " true"] {
            let raw = serde_json::json!({ "reject_direct_connection": value });
            let flag = ProviderMetadata::from(&raw).direct_connection_flag();
            assert_eq!(flag, DirectConnectionFlag::Allow, "value {value:?}");
            assert!(!flag.is_strict());
        }
    }

    #[test]
    fn test_missing_field_allows() {
        assert_eq!(flag_for("{}"), DirectConnectionFlag::Allow);
        assert_eq!(
            flag_for(r#"{"other":"true","nested":{"reject_direct_connection":"true"}}"#),
            DirectConnectionFlag::Allow
        );
    }

    #[test]
    fn test_unreadable_documents_are_unknown() {
        assert_eq!(
            ProviderMetadata::empty().direct_connection_flag(),
            DirectConnectionFlag::Unknown
        );
        for raw in [
            "not valid structured data",
            "[1,2,3]",
            "\"true\"",
            "{\"reject_direct_connection\":",
            r#"{"reject_direct_connection":true}"#,
            r#"{"reject_direct_connection":1}"#,
        ] {
            assert_eq!(flag_for(raw), DirectConnectionFlag::Unknown, "input {raw:?}");
        }
    }

    #[test]
    fn test_null_flag_allows() {
        assert_eq!(
            flag_for(r#"{"reject_direct_connection":null}"#),
            DirectConnectionFlag::Allow
        );
    }

    #[test]
    fn test_repeated_key_takes_last_value() {
        assert_eq!(
            flag_for(r#"{"reject_direct_connection":"false","reject_direct_connection":"true"}"#),
            DirectConnectionFlag::Reject
        );
        assert_eq!(
            flag_for(r#"{"reject_direct_connection":"true","reject_direct_connection":"no"}"#),
            DirectConnectionFlag::Allow
        );
    }

    #[test]
    fn test_key_matches_case_insensitively() {
        assert_eq!(
            flag_for(r#"{"REJECT_DIRECT_CONNECTION":"1"}"#),
            DirectConnectionFlag::Reject
        );
        assert_eq!(
            flag_for(r#"{"Reject_Direct_Connection":"true"}"#),
            DirectConnectionFlag::Reject
        );
        assert_eq!(
            flag_for(r#"{"reject_direct_connection ":"true","rejectdirectconnection":"1"}"#),
            DirectConnectionFlag::Allow
        );
    }

    #[test]
    fn test_last_occurrence_wins_across_casings() {
        assert_eq!(
            flag_for(r#"{"reject_direct_connection":"false","REJECT_DIRECT_CONNECTION":"1"}"#),
            DirectConnectionFlag::Reject
        );
        assert_eq!(
            flag_for(r#"{"REJECT_DIRECT_CONNECTION":"1","reject_direct_connection":"false"}"#),
            DirectConnectionFlag::Allow
        );
    }

    #[test]
    fn test_null_occurrence_keeps_earlier_value() {
        assert_eq!(
            flag_for(r#"{"reject_direct_connection":"true","reject_direct_connection":null}"#),
            DirectConnectionFlag::Reject
        );
    }

    #[test]
    fn test_any_mistyped_occurrence_is_unknown() {
        assert_eq!(
            flag_for(r#"{"reject_direct_connection":1,"reject_direct_connection":"true"}"#),
            DirectConnectionFlag::Unknown
        );
        assert_eq!(
            flag_for(r#"{"Reject_Direct_Connection":["true"]}"#),
            DirectConnectionFlag::Unknown
        );
    }

    #[test]
    fn test_invalid_utf8_elsewhere_keeps_flag() {
        let mut raw = br#"{"note":""#.to_vec();
        raw.push(0xff);
        raw.extend_from_slice(br#"","reject_direct_connection":"true"}"#);
        let meta = ProviderMetadata::new(raw);
        assert_eq!(meta.direct_connection_flag(), DirectConnectionFlag::Reject);
    }

    #[test]
    fn test_invalid_utf8_is_unknown() {
        let meta = ProviderMetadata::new(vec![0xff, 0xfe, b'{']);
        assert_eq!(meta.direct_connection_flag(), DirectConnectionFlag::Unknown);
    }
}

#[cfg(test)]
mod fuzz_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fuzz_arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
            let meta = ProviderMetadata::new(data);
            // Strictness requires a decoded document.
            if meta.direct_connection_flag().is_strict() {
                let text = String::from_utf8_lossy(meta.as_bytes());
                prop_assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
            }
        }

        #[test]
        fn fuzz_only_exact_values_are_strict(value in ".*") {
            let raw = serde_json::json!({ "reject_direct_connection": value.clone() });
            let strict = ProviderMetadata::from(&raw).direct_connection_flag().is_strict();
            prop_assert_eq!(strict, value == "true" || value == "1");
        }
    }
}
