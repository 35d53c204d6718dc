use indexmap::IndexMap;

use crate::types::logical_operation::LogicalOperation;
use crate::types::text_entry::{HistogramRow, TextEntry};

/// Occurrence counts and shares over a user's whole history.
///
/// Rows come out in first-seen order. An empty history yields no rows.
pub fn user_histogram(user_id: &str, history: &[TextEntry]) -> Vec<HistogramRow> {
    let mut counts: IndexMap<&LogicalOperation, usize> = IndexMap::new();
    for entry in history {
        for op in entry.operations() {
            *counts.entry(op).or_insert(0) += 1;
        }
    }

    let total: usize = counts.values().sum();
    counts
        .into_iter()
        .enumerate()
        .map(|(first_seen, (op, cnt))| HistogramRow {
            logical_operation: op.clone(),
            cnt,
            percentage: cnt as f64 / total as f64,
            user_id: user_id.to_string(),
            first_seen,
        })
        .collect()
}

/// Orders rows by `(user_id, logical_operation)`.
pub fn sort_population(rows: &mut [HistogramRow]) {
    rows.sort_by(|a, b| {
        a.user_id
            .cmp(&b.user_id)
            .then_with(|| a.logical_operation.cmp(&b.logical_operation))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::locations::layout_occurrences;

    fn entry(ops: &[&[&str]]) -> TextEntry {
        let drawn: Vec<_> = ops.iter().map(|s| LogicalOperation::from(*s)).collect();
        let layout = layout_occurrences(&drawn);
        TextEntry {
            user_id: "u".to_string(),
            session_id: "s".to_string(),
            size: layout.text.len(),
            text: layout.text,
            occurrences: layout.occurrences,
            symbols: layout.symbols,
        }
    }

    #[test]
    fn counts_across_all_texts() {
        let history = vec![entry(&[&["a"], &["b", "c"], &["a"]]), entry(&[&["b", "c"], &["a"]])];
        let rows = user_histogram("u1", &history);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].logical_operation, LogicalOperation::new(["a"]));
        assert_eq!(rows[0].cnt, 3);
        assert_eq!(rows[0].first_seen, 0);
        assert_eq!(rows[1].cnt, 2);
        assert!((rows[0].percentage - 0.6).abs() < 1e-12);
        assert!(rows.iter().all(|r| r.user_id == "u1"));
    }

    #[test]
    fn empty_history_is_empty() {
        assert!(user_histogram("u1", &[]).is_empty());
        assert!(user_histogram("u1", &[entry(&[])]).is_empty());
    }

    #[test]
    fn population_sort_groups_users() {
        let mut rows = user_histogram("u2", &[entry(&[&["b"], &["a"]])]);
        rows.extend(user_histogram("u1", &[entry(&[&["z"], &["c"]])]));
        sort_population(&mut rows);

        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.user_id.as_str(), r.logical_operation.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("u1", "(c)".to_string()),
                ("u1", "(z)".to_string()),
                ("u2", "(a)".to_string()),
                ("u2", "(b)".to_string()),
            ]
        );
    }
}
