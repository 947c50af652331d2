//! Identity and merge rules shared by every collection.

use std::collections::HashSet;

/// Anything stored in a collection keyed by a stable string id.
pub trait Record: Clone {
    fn id(&self) -> &str;
}

/// Outcome of merging a batch into an existing collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub skipped: usize,
}

/// Append `incoming` records whose id is not already in `existing`.
///
/// Existing entries are never overwritten (first write wins). Duplicate ids
/// inside `incoming` collapse to their first occurrence.
pub fn merge_first_write_wins<T: Record>(existing: &mut Vec<T>, incoming: Vec<T>) -> MergeSummary {
    let mut seen: HashSet<String> = existing.iter().map(|r| r.id().to_string()).collect();
    let mut summary = MergeSummary::default();

    for record in incoming {
        if seen.insert(record.id().to_string()) {
            existing.push(record);
            summary.added += 1;
        } else {
            summary.skipped += 1;
        }
    }

    summary
}

/// The visible view of a collection.
///
/// With `use_defaults`, imported records come first, followed by defaults whose
/// id is not shadowed by an imported record. Without it, only imported records.
pub fn with_defaults<T: Record>(imported: &[T], defaults: &[T], use_defaults: bool) -> Vec<T> {
    if !use_defaults {
        return imported.to_vec();
    }

    let imported_ids: HashSet<&str> = imported.iter().map(|r| r.id()).collect();
    imported
        .iter()
        .chain(defaults.iter().filter(|d| !imported_ids.contains(d.id())))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: &'static str,
        value: &'static str,
    }

    impl Record for Item {
        fn id(&self) -> &str {
            self.id
        }
    }

    fn item(id: &'static str, value: &'static str) -> Item {
        Item { id, value }
    }

    #[test]
    fn test_merge_keeps_existing_and_appends_new() {
        let mut existing = vec![item("a", "original")];
        let summary = merge_first_write_wins(
            &mut existing,
            vec![item("a", "reimported"), item("b", "new"), item("c", "newer")],
        );

        assert_eq!(summary, MergeSummary { added: 2, skipped: 1 });
        assert_eq!(
            existing,
            vec![item("a", "original"), item("b", "new"), item("c", "newer")]
        );
    }

    #[test]
    fn test_merge_collapses_duplicates_within_batch() {
        let mut existing = Vec::new();
        let summary = merge_first_write_wins(&mut existing, vec![item("a", "1"), item("a", "2")]);

        assert_eq!(summary.added, 1);
        assert_eq!(existing, vec![item("a", "1")]);
    }

    #[test]
    fn test_with_defaults_prefers_imported_on_collision() {
        let imported = vec![item("shared", "imported")];
        let defaults = vec![item("shared", "default"), item("extra", "default")];

        let view = with_defaults(&imported, &defaults, true);
        assert_eq!(view, vec![item("shared", "imported"), item("extra", "default")]);
    }

    #[test]
    fn test_with_defaults_disabled_shows_only_imported() {
        let imported = vec![item("a", "imported")];
        let defaults = vec![item("b", "default")];

        assert_eq!(with_defaults(&imported, &defaults, false), imported);
    }
}
