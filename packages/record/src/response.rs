//! Lenient extraction of a JSON record array from a model reply.
//!
//! Models routinely wrap their JSON in prose or Markdown fences, so the
//! reply is narrowed to the span between the first `[` and the last `]`
//! before parsing. No schema validation is done on a successfully parsed
//! array.

use kvsheet_record_models::{Record, UnparseablePolicy};

use crate::ResponseParseError;

/// Records produced from one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecords {
    /// Records to append to the run's accumulator.
    pub records: Vec<Record>,
    /// Whether the reply failed to parse and was routed through the
    /// [`UnparseablePolicy`].
    pub unparseable: bool,
}

/// Parses the JSON array embedded in `raw`.
///
/// Array elements that are not JSON objects are skipped with a warning.
///
/// # Errors
///
/// * [`ResponseParseError::NoArray`] if `raw` has no `[` or no `]`, or the
///   last `]` comes before the first `[`
/// * [`ResponseParseError::InvalidJson`] if the bracketed span is not a
///   valid JSON array
pub fn parse_response(raw: &str) -> Result<Vec<Record>, ResponseParseError> {
    let (Some(start), Some(end)) = (raw.find('['), raw.rfind(']')) else {
        return Err(ResponseParseError::NoArray);
    };
    if end < start {
        return Err(ResponseParseError::NoArray);
    }

    let items: Vec<serde_json::Value> = serde_json::from_str(&raw[start..=end])?;

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_object() {
            log::warn!("Skipping non-object entry in model reply: {item}");
            continue;
        }
        records.push(serde_json::from_value(item)?);
    }

    Ok(records)
}

/// Parses `raw` and applies `policy` when it cannot be parsed.
#[must_use]
pub fn records_from_response(raw: &str, policy: UnparseablePolicy) -> ResponseRecords {
    match parse_response(raw) {
        Ok(records) => ResponseRecords {
            records,
            unparseable: false,
        },
        Err(e) => {
            log::warn!("Unparseable model reply ({e}), applying {policy} policy");
            let records = match policy {
                UnparseablePolicy::FallbackRecord => vec![Record::raw_text(raw)],
                UnparseablePolicy::Skip => Vec::new(),
            };
            ResponseRecords {
                records,
                unparseable: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_array_surrounded_by_noise() {
        let raw = r#"noise [ {"key":"a","value":"b","context":"c"} ] trailing"#;
        let records = parse_response(raw).unwrap();
        assert_eq!(records, vec![Record::new("a", "b", "c")]);
    }

    #[test]
    fn extracts_array_from_markdown_fence() {
        let raw = "```json\n[{\"key\":\"Name\",\"value\":\"Alice\",\"context\":\"Name: Alice\"},\n {\"key\":\"Age\",\"value\":\"30\",\"context\":\"Age: 30\"}]\n```";
        let records = parse_response(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].key.as_deref(), Some("Age"));
    }

    #[test]
    fn missing_brackets_is_no_array() {
        assert!(matches!(
            parse_response("I could not find anything."),
            Err(ResponseParseError::NoArray)
        ));
        assert!(matches!(
            parse_response("only an opening [ here"),
            Err(ResponseParseError::NoArray)
        ));
    }

    #[test]
    fn reversed_brackets_is_no_array() {
        assert!(matches!(
            parse_response("] before ["),
            Err(ResponseParseError::NoArray)
        ));
    }

    #[test]
    fn malformed_json_is_invalid() {
        assert!(matches!(
            parse_response(r#"[{"key": "a", "value": }]"#),
            Err(ResponseParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn entries_missing_fields_pass_through() {
        let records = parse_response(r#"[{"key":"a"}, {"context":"c"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].value.is_none());
        assert!(records[1].key.is_none());
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let records = parse_response(r#"["stray", {"key":"a","value":"b","context":"c"}, 4]"#)
            .unwrap();
        assert_eq!(records, vec![Record::new("a", "b", "c")]);
    }

    #[test]
    fn fallback_policy_wraps_unparseable_reply() {
        let raw = "Sorry, no structured data.";
        let result = records_from_response(raw, UnparseablePolicy::FallbackRecord);
        assert!(result.unparseable);
        assert_eq!(result.records, vec![Record::raw_text(raw)]);
    }

    #[test]
    fn skip_policy_drops_unparseable_reply() {
        let result = records_from_response("[not json]", UnparseablePolicy::Skip);
        assert!(result.unparseable);
        assert!(result.records.is_empty());
    }

    #[test]
    fn parseable_reply_ignores_policy() {
        let raw = r#"[{"key":"a","value":"b","context":"c"}]"#;
        for &policy in UnparseablePolicy::ALL {
            let result = records_from_response(raw, policy);
            assert!(!result.unparseable);
            assert_eq!(result.records, vec![Record::new("a", "b", "c")]);
        }
    }

    #[test]
    fn empty_array_is_not_unparseable() {
        let result = records_from_response("[]", UnparseablePolicy::FallbackRecord);
        assert!(!result.unparseable);
        assert!(result.records.is_empty());
    }
}
