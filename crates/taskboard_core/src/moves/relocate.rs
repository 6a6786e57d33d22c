/// Moves the element at `from` so it ends up at index `to` of the
/// resulting sequence.
///
/// The element is removed first and reinserted at `to` in the
/// post-removal sequence; `to` past the end is clamped to the last slot.
/// Returns `false` (leaving `items` untouched) when `from` is out of range.
pub fn relocate<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }
    let moved = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, moved);
    true
}

#[cfg(test)]
mod tests {
    use super::relocate;

    #[test]
    fn moved_element_lands_on_destination_index() {
        let original = vec!['a', 'b', 'c', 'd', 'e'];
        for from in 0..original.len() {
            for to in 0..original.len() {
                let mut items = original.clone();
                assert!(relocate(&mut items, from, to));
                assert_eq!(items[to], original[from], "from={from} to={to}");

                let mut sorted = items.clone();
                sorted.sort_unstable();
                assert_eq!(sorted, original);
            }
        }
    }

    #[test]
    fn forward_and_backward_moves() {
        let mut items = vec![1, 2, 3, 4];
        relocate(&mut items, 0, 2);
        assert_eq!(items, vec![2, 3, 1, 4]);

        relocate(&mut items, 3, 0);
        assert_eq!(items, vec![4, 2, 3, 1]);
    }

    #[test]
    fn out_of_range_source_is_rejected_and_destination_clamped() {
        let mut items = vec![1, 2, 3];
        assert!(!relocate(&mut items, 3, 0));
        assert_eq!(items, vec![1, 2, 3]);

        assert!(relocate(&mut items, 0, 10));
        assert_eq!(items, vec![2, 3, 1]);
    }
}
