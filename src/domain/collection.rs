//! Pure ordered-collection edits shared by every tree level.
//!
//! Each function leaves its input untouched and returns the rebuilt
//! collection. Out-of-range indices yield an unchanged copy.

/// Direction of a move: `Up` swaps with `index - 1`, `Down` with `index + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Index of the neighbour in `direction`, if it exists.
pub fn neighbor(index: usize, len: usize, direction: Direction) -> Option<usize> {
    if index >= len {
        return None;
    }
    match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => Some(index + 1).filter(|&n| n < len),
    }
}

pub fn appended<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = items.to_vec();
    next.push(item);
    next
}

pub fn removed<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

/// Swap `index` with its neighbour; boundary moves are no-ops.
pub fn moved<T: Clone>(items: &[T], index: usize, direction: Direction) -> Vec<T> {
    let mut next = items.to_vec();
    if let Some(other) = neighbor(index, items.len(), direction) {
        next.swap(index, other);
    }
    next
}

pub fn replaced<T: Clone>(items: &[T], index: usize, item: T) -> Vec<T> {
    let mut next = items.to_vec();
    if let Some(slot) = next.get_mut(index) {
        *slot = item;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn abc() -> Vec<&'static str> {
        vec!["A", "B", "C"]
    }

    #[rstest]
    #[case(0, Direction::Down, vec!["B", "A", "C"])]
    #[case(1, Direction::Down, vec!["A", "C", "B"])]
    #[case(1, Direction::Up, vec!["B", "A", "C"])]
    #[case(2, Direction::Up, vec!["A", "C", "B"])]
    #[case(0, Direction::Up, vec!["A", "B", "C"])]
    #[case(2, Direction::Down, vec!["A", "B", "C"])]
    #[case(7, Direction::Up, vec!["A", "B", "C"])]
    fn given_three_items_when_moving_then_swaps_with_neighbor_only(
        #[case] index: usize,
        #[case] direction: Direction,
        #[case] expected: Vec<&'static str>,
    ) {
        assert_eq!(moved(&abc(), index, direction), expected);
    }

    #[test]
    fn given_index_when_removing_then_later_items_shift_up() {
        assert_eq!(removed(&abc(), 1), vec!["A", "C"]);
    }

    #[test]
    fn given_out_of_range_index_when_removing_or_replacing_then_unchanged() {
        assert_eq!(removed(&abc(), 3), abc());
        assert_eq!(replaced(&abc(), 3, "Z"), abc());
    }

    #[test]
    fn given_items_when_appending_then_new_item_is_last_and_input_untouched() {
        let items = abc();
        let next = appended(&items, "D");
        assert_eq!(next, vec!["A", "B", "C", "D"]);
        assert_eq!(items.len(), 3);
    }
}
