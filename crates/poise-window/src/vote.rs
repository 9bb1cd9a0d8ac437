//! Majority vote over categorical labels

/// Running-candidate majority vote
///
/// Scans left to right and replaces the candidate only when the current
/// item occurs strictly more often in the whole sequence. The winner is
/// the most frequent item, ties going to whichever appears first.
/// Returns `None` for an empty sequence.
pub fn majority<T: PartialEq + Clone>(items: &[T]) -> Option<T> {
    let count = |item: &T| items.iter().filter(|other| *other == item).count();

    let (first, rest) = items.split_first()?;
    let mut candidate = first;
    let mut candidate_count = count(first);

    for item in rest {
        if item == candidate {
            continue;
        }
        let item_count = count(item);
        if item_count > candidate_count {
            candidate = item;
            candidate_count = item_count;
        }
    }

    Some(candidate.clone())
}
