//! Second-stage decoding and ranking of terminal result payloads.
//!
//! The status endpoint returns the result as serialized JSON inside a JSON
//! string; this module performs the second decode and the deterministic
//! ranking transform.

use peek::RawBidRecord;
use peek_core::{BidEntry, RankedResultSet};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("corrupt result payload: {0}")]
    CorruptResult(#[from] serde_json::Error),
}

/// Rank assigned to records whose committed amount does not parse as a
/// finite decimal: below every well-formed bid, never dropped.
const UNPARSEABLE_AMOUNT: f64 = f64::NEG_INFINITY;

/// Decode a raw terminal payload and rank its records by committed amount,
/// highest first. Ties keep the server-provided order; the output always has
/// exactly as many entries as the payload has records.
pub fn normalize(raw: &str) -> Result<RankedResultSet, NormalizeError> {
    let records: Vec<RawBidRecord> = serde_json::from_str(raw)?;
    Ok(rank(records))
}

/// The ranking transform on already-decoded records.
pub fn rank(records: Vec<RawBidRecord>) -> RankedResultSet {
    let mut entries: Vec<BidEntry> = records
        .into_iter()
        .map(|record| {
            let amount = parse_amount(&record.amount);
            BidEntry::new(record.name, record.student_id, amount)
        })
        .collect();

    // sort_by is stable, so equal amounts retain input order.
    entries.sort_by(|a, b| b.committed_amount.total_cmp(&a.committed_amount));

    RankedResultSet::new(entries)
}

fn parse_amount(s: &str) -> f64 {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            warn!(amount = %s, "unparseable bid amount, ranking last");
            UNPARSEABLE_AMOUNT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, id: &str, amount: &str) -> RawBidRecord {
        RawBidRecord {
            name: name.to_string(),
            student_id: id.to_string(),
            amount: amount.to_string(),
        }
    }

    #[test]
    fn test_ranks_descending() {
        let raw = r#"[
            {"姓名":"A","学号":"1","投入选课币":"100"},
            {"姓名":"B","学号":"2","投入选课币":"250"}
        ]"#;

        let ranked = normalize(raw).unwrap();

        let entries = ranked.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].participant_name, "B");
        assert_eq!(entries[0].committed_amount, 250.0);
        assert_eq!(entries[1].participant_name, "A");
        assert_eq!(entries[1].committed_amount, 100.0);
    }

    #[test]
    fn test_adjacent_pairs_are_ordered() {
        let ranked = rank(vec![
            record("A", "1", "3.5"),
            record("B", "2", "120"),
            record("C", "3", "0.5"),
            record("D", "4", "99.9"),
        ]);

        let entries = ranked.entries();
        for pair in entries.windows(2) {
            assert!(pair[0].committed_amount >= pair[1].committed_amount);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(vec![
            record("first", "1", "50"),
            record("second", "2", "50"),
            record("third", "3", "50"),
        ]);

        let names: Vec<&str> = ranked
            .entries()
            .iter()
            .map(|e| e.participant_name.as_str())
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_cardinality_preserved() {
        for n in 0..6 {
            let records: Vec<RawBidRecord> = (0..n)
                .map(|i| record(&format!("p{i}"), &i.to_string(), &format!("{}", i * 10)))
                .collect();

            assert_eq!(rank(records).len(), n);
        }
    }

    #[test]
    fn test_malformed_amount_ranks_last() {
        let ranked = rank(vec![
            record("bad", "1", "not-a-number"),
            record("low", "2", "0"),
            record("high", "3", "10"),
        ]);

        let entries = ranked.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].participant_name, "high");
        assert_eq!(entries[1].participant_name, "low");
        assert_eq!(entries[2].participant_name, "bad");
        assert_eq!(entries[2].committed_amount, f64::NEG_INFINITY);
    }

    #[test]
    fn test_nan_amount_ranks_last() {
        // "NaN" parses as f64 but is not finite; it must not float to the top.
        let ranked = rank(vec![record("nan", "1", "NaN"), record("ok", "2", "1")]);

        assert_eq!(ranked.entries()[0].participant_name, "ok");
        assert_eq!(ranked.entries()[1].participant_name, "nan");
    }

    #[test]
    fn test_deterministic() {
        let raw = r#"[
            {"姓名":"A","学号":"1","投入选课币":"7"},
            {"姓名":"B","学号":"2","投入选课币":"7"},
            {"姓名":"C","学号":"3","投入选课币":"bad"}
        ]"#;

        let first = normalize(raw).unwrap();
        let second = normalize(raw).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_payload() {
        let ranked = normalize("[]").unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_corrupt_payload() {
        let err = normalize("the dog ate my results").unwrap_err();
        assert!(matches!(err, NormalizeError::CorruptResult(_)));
    }

    #[test]
    fn test_english_alias_records() {
        let raw = r#"[{"name":"A","id":"1","amount":"12.5"}]"#;

        let ranked = normalize(raw).unwrap();

        assert_eq!(ranked.entries()[0].committed_amount, 12.5);
    }
}
