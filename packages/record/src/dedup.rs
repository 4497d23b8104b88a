//! Two-stage record deduplication.
//!
//! Overlapping chunks and chatty models produce repeated rows. Stage one
//! drops exact `(key, value, context)` repeats; stage two keeps only the
//! first record for each context string, so two different pairs drawn from
//! the same sentence collapse to the first one seen. Both stages preserve
//! first-seen order.

use std::collections::HashSet;

use kvsheet_record_models::Record;

/// Keeps the first occurrence of each `(key, value, context)` triple.
///
/// An absent field and an empty string are distinct.
#[must_use]
pub fn dedup_exact(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert((r.key.clone(), r.value.clone(), r.context.clone())))
        .collect()
}

/// Keeps the first record for each distinct context.
///
/// A record without a context is treated as having the empty context.
#[must_use]
pub fn collapse_contexts(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.context_or_empty().to_owned()))
        .collect()
}

/// Result of [`deduplicate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduplicated {
    /// Records left after both passes, in first-seen order.
    pub records: Vec<Record>,
    /// Number of records left after the exact-triple pass.
    pub after_exact: usize,
}

/// Runs [`dedup_exact`] followed by [`collapse_contexts`].
#[must_use]
pub fn deduplicate(records: Vec<Record>) -> Deduplicated {
    let before = records.len();
    let exact = dedup_exact(records);
    let after_exact = exact.len();
    let records = collapse_contexts(exact);

    log::debug!(
        "Deduplicated {before} records: {after_exact} after exact-triple pass, {} after context pass",
        records.len()
    );

    Deduplicated {
        records,
        after_exact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("Name", "Alice", "Name: Alice"),
            Record::new("Age", "30", "Age: 30"),
            Record::new("Name", "Alice", "Name: Alice"),
            Record::new("First name", "Alice", "Name: Alice"),
            Record::new("City", "Paris", "Lives in Paris"),
            Record::new("Age", "30", "Age: 30"),
        ]
    }

    #[test]
    fn exact_pass_drops_repeated_triples_in_order() {
        let out = dedup_exact(sample());
        assert_eq!(
            out,
            vec![
                Record::new("Name", "Alice", "Name: Alice"),
                Record::new("Age", "30", "Age: 30"),
                Record::new("First name", "Alice", "Name: Alice"),
                Record::new("City", "Paris", "Lives in Paris"),
            ]
        );
    }

    #[test]
    fn context_pass_keeps_first_record_per_context() {
        let out = collapse_contexts(dedup_exact(sample()));
        assert_eq!(
            out,
            vec![
                Record::new("Name", "Alice", "Name: Alice"),
                Record::new("Age", "30", "Age: 30"),
                Record::new("City", "Paris", "Lives in Paris"),
            ]
        );
    }

    #[test]
    fn absent_and_empty_fields_differ_for_exact_pass() {
        let with_empty = Record {
            key: Some("k".to_owned()),
            value: Some(String::new()),
            context: Some("c".to_owned()),
        };
        let with_absent = Record {
            value: None,
            ..with_empty.clone()
        };
        let out = dedup_exact(vec![with_empty, with_absent]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn absent_context_collapses_with_empty_context() {
        let absent = Record {
            key: Some("a".to_owned()),
            value: Some("1".to_owned()),
            context: None,
        };
        let empty = Record::new("b", "2", "");
        let out = collapse_contexts(vec![absent.clone(), empty]);
        assert_eq!(out, vec![absent]);
    }

    #[test]
    fn output_has_no_duplicate_triples_or_contexts() {
        let out = deduplicate(sample()).records;
        let triples: HashSet<_> = out
            .iter()
            .map(|r| (r.key.clone(), r.value.clone(), r.context.clone()))
            .collect();
        let contexts: HashSet<_> = out.iter().map(Record::context_or_empty).collect();
        assert_eq!(triples.len(), out.len());
        assert_eq!(contexts.len(), out.len());
    }

    #[test]
    fn deduplicate_is_idempotent() {
        let once = deduplicate(sample()).records;
        let twice = deduplicate(once.clone());
        assert_eq!(twice.records, once);
        assert_eq!(twice.after_exact, once.len());
    }

    #[test]
    fn empty_input_stays_empty() {
        let out = deduplicate(Vec::new());
        assert!(out.records.is_empty());
        assert_eq!(out.after_exact, 0);
    }

    #[test]
    fn reports_count_after_exact_pass() {
        let out = deduplicate(sample());
        assert_eq!(out.after_exact, 4);
        assert_eq!(out.records.len(), 3);
    }
}
