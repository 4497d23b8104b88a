#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Extracted record types shared across the kvsheet toolchain.
//!
//! A [`Record`] is one `(key, value, context)` triple inferred by the
//! language model. Records are only ever created by parsing model output and
//! are never mutated afterwards; later stages only keep or drop them.

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Key used for records that carry unclassified or unparseable text.
pub const RAW_TEXT_KEY: &str = "raw_text";

/// One extracted `(key, value, context)` triple.
///
/// Every field is optional: the model's output is not schema-validated, so
/// entries missing a field pass through with that field absent. Non-string
/// JSON values are kept as their JSON text (`30` becomes `"30"`), and
/// `null` is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Free-text label inferred by the model (e.g. `"Date of Birth"`).
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Verbatim value as it appears in the source text.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// The verbatim sentence or paragraph the pair was drawn from.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Record {
    /// Creates a record with all three fields present.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
            context: Some(context.into()),
        }
    }

    /// Creates the synthetic record used when a model reply cannot be
    /// parsed: the raw reply is carried verbatim as both value and context.
    #[must_use]
    pub fn raw_text(raw: &str) -> Self {
        Self::new(RAW_TEXT_KEY, raw, raw)
    }

    /// Returns the context, treating an absent context as the empty string.
    #[must_use]
    pub fn context_or_empty(&self) -> &str {
        self.context.as_deref().unwrap_or("")
    }
}

/// What to do with a model reply that contains no parseable JSON array.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UnparseablePolicy {
    /// Emit one [`Record::raw_text`] record wrapping the whole reply.
    #[default]
    FallbackRecord,
    /// Emit nothing for that chunk.
    Skip,
}

impl UnparseablePolicy {
    /// All policies, in display order.
    pub const ALL: &[Self] = &[Self::FallbackRecord, Self::Skip];

    /// Human-readable label for interactive prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FallbackRecord => "Keep the raw reply as a single raw_text row",
            Self::Skip => "Drop the reply",
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_complete_record() {
        let record: Record =
            serde_json::from_str(r#"{"key":"Name","value":"Alice","context":"Name: Alice"}"#)
                .unwrap();
        assert_eq!(record, Record::new("Name", "Alice", "Name: Alice"));
    }

    #[test]
    fn missing_fields_stay_absent() {
        let record: Record = serde_json::from_str(r#"{"key":"Name"}"#).unwrap();
        assert_eq!(record.key.as_deref(), Some("Name"));
        assert!(record.value.is_none());
        assert!(record.context.is_none());
        assert_eq!(record.context_or_empty(), "");
    }

    #[test]
    fn non_string_values_become_json_text() {
        let record: Record =
            serde_json::from_str(r#"{"key":"Age","value":30,"context":null,"extra":true}"#)
                .unwrap();
        assert_eq!(record.value.as_deref(), Some("30"));
        assert!(record.context.is_none());
    }

    #[test]
    fn raw_text_record_wraps_reply() {
        let record = Record::raw_text("no json here");
        assert_eq!(record.key.as_deref(), Some(RAW_TEXT_KEY));
        assert_eq!(record.value.as_deref(), Some("no json here"));
        assert_eq!(record.context.as_deref(), Some("no json here"));
    }

    #[test]
    fn policy_parses_from_snake_case() {
        assert_eq!(
            "fallback_record".parse::<UnparseablePolicy>().unwrap(),
            UnparseablePolicy::FallbackRecord
        );
        assert_eq!("skip".parse::<UnparseablePolicy>().unwrap(), UnparseablePolicy::Skip);
        assert_eq!(UnparseablePolicy::Skip.to_string(), "skip");
        assert!("sometimes".parse::<UnparseablePolicy>().is_err());
    }
}
