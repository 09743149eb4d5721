//! Dense ordering for sibling collections.
//!
//! Every item in a sibling collection carries an `order` rank. Between
//! operations the ranks are exactly `0..n`, no gaps and no duplicates.
//! The functions here keep that true across insert, remove and move; they
//! look an item up before touching anything, so a failed call leaves the
//! collection unchanged.

use crate::error::OrderError;

/// An entity ranked within its sibling collection.
pub trait OrderedItem {
    fn id(&self) -> &str;
    fn order(&self) -> usize;
    fn set_order(&mut self, order: usize);
}

/// Result of [`move_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moved {
    pub from: usize,
    pub to: usize,
}

fn position_of<T: OrderedItem>(items: &[T], id: &str) -> Result<usize, OrderError> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| OrderError::ItemNotFound { id: id.to_string() })
}

/// Insert `item` at rank `position`, or append when `None`.
///
/// Ranks at or after the position shift up by one. Positions past the
/// end are clamped. An item whose id is already present replaces the old
/// one and takes the requested rank. Returns the rank assigned.
pub fn insert<T: OrderedItem>(items: &mut Vec<T>, mut item: T, position: Option<usize>) -> usize {
    if let Ok(idx) = position_of(items, item.id()) {
        let old = items.remove(idx);
        shift_down_after(items, old.order());
    }
    let position = position.unwrap_or(items.len()).min(items.len());
    for other in items.iter_mut() {
        if other.order() >= position {
            other.set_order(other.order() + 1);
        }
    }
    item.set_order(position);
    items.push(item);
    position
}

/// Remove the item with `id`, closing the gap it leaves.
pub fn remove<T: OrderedItem>(items: &mut Vec<T>, id: &str) -> Result<T, OrderError> {
    let idx = position_of(items, id)?;
    let removed = items.remove(idx);
    shift_down_after(items, removed.order());
    Ok(removed)
}

/// Move the item with `id` to rank `new_order` (clamped to the last rank).
pub fn move_to<T: OrderedItem>(
    items: &mut [T],
    id: &str,
    new_order: usize,
) -> Result<Moved, OrderError> {
    let idx = position_of(items, id)?;
    let from = items[idx].order();
    let to = new_order.min(items.len().saturating_sub(1));
    if from == to {
        return Ok(Moved { from, to });
    }
    for (i, other) in items.iter_mut().enumerate() {
        if i == idx {
            other.set_order(to);
            continue;
        }
        let order = other.order();
        if from < to && order > from && order <= to {
            other.set_order(order - 1);
        } else if from > to && order >= to && order < from {
            other.set_order(order + 1);
        }
    }
    Ok(Moved { from, to })
}

/// True when the ranks are exactly `0..items.len()`.
pub fn is_dense<T: OrderedItem>(items: &[T]) -> bool {
    let mut seen = vec![false; items.len()];
    for item in items {
        match seen.get_mut(item.order()) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

/// Renumber ranks to `0..n`, keeping the current relative order. Ties keep
/// their position in the vector. Returns whether anything changed.
pub fn normalize<T: OrderedItem>(items: &mut [T]) -> bool {
    if is_dense(items) {
        return false;
    }
    let mut idx: Vec<usize> = (0..items.len()).collect();
    idx.sort_by_key(|&i| (items[i].order(), i));
    for (rank, i) in idx.into_iter().enumerate() {
        items[i].set_order(rank);
    }
    true
}

/// Items sorted by rank.
pub fn sorted<T: OrderedItem>(items: &[T]) -> Vec<&T> {
    let mut out: Vec<&T> = items.iter().collect();
    out.sort_by_key(|item| item.order());
    out
}

fn shift_down_after<T: OrderedItem>(items: &mut [T], removed: usize) {
    for other in items.iter_mut() {
        if other.order() > removed {
            other.set_order(other.order() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        order: usize,
    }

    impl OrderedItem for Item {
        fn id(&self) -> &str {
            &self.id
        }
        fn order(&self) -> usize {
            self.order
        }
        fn set_order(&mut self, order: usize) {
            self.order = order;
        }
    }

    fn item(id: &str, order: usize) -> Item {
        Item {
            id: id.into(),
            order,
        }
    }

    fn abc() -> Vec<Item> {
        vec![item("A", 0), item("B", 1), item("C", 2)]
    }

    fn order_of(items: &[Item], id: &str) -> usize {
        items.iter().find(|i| i.id == id).map(|i| i.order).unwrap()
    }

    fn ids_by_rank(items: &[Item]) -> Vec<String> {
        sorted(items).into_iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn move_forward() {
        let mut items = abc();
        let moved = move_to(&mut items, "A", 2).unwrap();
        assert_eq!(moved, Moved { from: 0, to: 2 });
        assert_eq!(order_of(&items, "B"), 0);
        assert_eq!(order_of(&items, "C"), 1);
        assert_eq!(order_of(&items, "A"), 2);
    }

    #[test]
    fn move_backward() {
        let mut items = abc();
        move_to(&mut items, "C", 0).unwrap();
        assert_eq!(ids_by_rank(&items), ["C", "A", "B"]);
    }

    #[test]
    fn move_past_end_is_clamped() {
        let mut items = abc();
        let moved = move_to(&mut items, "A", 99).unwrap();
        assert_eq!(moved.to, 2);
        assert!(is_dense(&items));
    }

    #[test]
    fn move_same_position_is_noop() {
        let mut items = abc();
        move_to(&mut items, "B", 1).unwrap();
        assert_eq!(items, abc());
    }

    #[test]
    fn insert_in_middle() {
        let mut items = abc();
        let at = insert(&mut items, item("D", 0), Some(1));
        assert_eq!(at, 1);
        assert_eq!(ids_by_rank(&items), ["A", "D", "B", "C"]);
        assert_eq!(order_of(&items, "C"), 3);
    }

    #[test]
    fn insert_into_empty_gets_zero() {
        let mut items = Vec::new();
        assert_eq!(insert(&mut items, item("A", 7), None), 0);
        assert_eq!(items[0].order, 0);
    }

    #[test]
    fn insert_existing_id_replaces_and_moves() {
        let mut items = abc();
        insert(&mut items, item("A", 0), Some(2));
        assert_eq!(items.len(), 3);
        assert_eq!(ids_by_rank(&items), ["B", "C", "A"]);
    }

    #[test]
    fn remove_closes_gap() {
        let mut items = abc();
        let removed = remove(&mut items, "B").unwrap();
        assert_eq!(removed.id, "B");
        assert_eq!(ids_by_rank(&items), ["A", "C"]);
        assert!(is_dense(&items));
    }

    #[test]
    fn unknown_id_leaves_collection_untouched() {
        let mut items = abc();
        assert_eq!(
            remove(&mut items, "Z"),
            Err(OrderError::ItemNotFound { id: "Z".into() })
        );
        assert!(move_to(&mut items, "Z", 0).is_err());
        assert_eq!(items, abc());
    }

    #[test]
    fn normalize_repairs_gaps_and_duplicates() {
        let mut items = vec![item("A", 4), item("B", 4), item("C", 1)];
        assert!(!is_dense(&items));
        assert!(normalize(&mut items));
        assert_eq!(ids_by_rank(&items), ["C", "A", "B"]);
        assert!(!normalize(&mut items));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(usize),
        Remove(usize),
        Move(usize, usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..12).prop_map(Op::Insert),
            (0usize..12).prop_map(Op::Remove),
            (0usize..12, 0usize..12).prop_map(|(a, b)| Op::Move(a, b)),
        ]
    }

    proptest! {
        #[test]
        fn any_sequence_keeps_ranks_dense(ops in proptest::collection::vec(op(), 0..60)) {
            let mut items: Vec<Item> = Vec::new();
            let mut next_id = 0;
            for op in ops {
                match op {
                    Op::Insert(p) => {
                        insert(&mut items, item(&format!("i{next_id}"), 0), Some(p));
                        next_id += 1;
                    }
                    Op::Remove(i) => {
                        if !items.is_empty() {
                            let id = items[i % items.len()].id.clone();
                            remove(&mut items, &id).unwrap();
                        }
                    }
                    Op::Move(i, to) => {
                        if !items.is_empty() {
                            let id = items[i % items.len()].id.clone();
                            move_to(&mut items, &id, to).unwrap();
                        }
                    }
                }
                prop_assert!(is_dense(&items));
            }
        }

        #[test]
        fn move_then_move_back_restores(n in 1usize..10, a in 0usize..10, b in 0usize..10) {
            let mut items: Vec<Item> = (0..n).map(|i| item(&format!("i{i}"), i)).collect();
            let original = items.clone();
            let (a, b) = (a % n, b % n);
            let id = items.iter().find(|i| i.order == a).unwrap().id.clone();
            move_to(&mut items, &id, b).unwrap();
            move_to(&mut items, &id, a).unwrap();
            prop_assert_eq!(items, original);
        }
    }
}
