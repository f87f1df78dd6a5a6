use super::node::TrieNode;
use crate::apriori::Item;

/// Dense triangular counter table for the size-2 candidates.
///
/// Row `i` holds the pairs `(i, j)` for `j > i`, stored flat: the cell of
/// `(i, j)` sits at `row_offset(i) + (j - i - 1)`.
#[derive(Debug, Clone)]
pub struct PairTable {
    num_items: usize,
    cells: Vec<usize>,
}

impl PairTable {
    pub fn new(num_items: usize) -> Self {
        let num_cells = num_items * num_items.saturating_sub(1) / 2;
        Self {
            num_items,
            cells: vec![0; num_cells],
        }
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    fn row_offset(&self, i: Item) -> usize {
        i * self.num_items - i * (i + 1) / 2
    }

    fn index(&self, i: Item, j: Item) -> usize {
        debug_assert!(i < j && j < self.num_items);
        self.row_offset(i) + (j - i - 1)
    }

    pub fn count(&self, i: Item, j: Item) -> usize {
        self.cells[self.index(i, j)]
    }

    /// Adds `weight` to every pair of the sorted, duplicate-free basket.
    pub fn add_basket(&mut self, basket: &[Item], weight: usize) {
        if basket.len() < 2 {
            return;
        }
        for (pos, &first) in basket.iter().enumerate() {
            let row = self.row_offset(first);
            for &second in &basket[pos + 1..] {
                self.cells[row + (second - first - 1)] += weight;
            }
        }
    }

    /// Turns the frequent pairs into trie edges under the level-1 nodes and
    /// consumes the table.
    pub fn replay_into(self, root: &mut TrieNode, min_occurrence: f64) {
        for (first, edge) in root.children.iter_mut().enumerate() {
            debug_assert_eq!(edge.label, first);
            let row = self.row_offset(first);
            for second in first + 1..self.num_items {
                let counter = self.cells[row + (second - first - 1)];
                if counter as f64 >= min_occurrence {
                    edge.subtrie.add_empty_state(second, counter);
                }
            }
            edge.subtrie.maxpath = usize::from(!edge.subtrie.children.is_empty());
            edge.subtrie.children.shrink_to_fit();
        }
        root.refresh_maxpath();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_table_layout() {
        let mut table = PairTable::new(4);
        table.add_basket(&[0, 1, 3], 1);
        table.add_basket(&[1, 2, 3], 2);
        table.add_basket(&[2], 7);

        assert_eq!(table.count(0, 1), 1);
        assert_eq!(table.count(0, 3), 1);
        assert_eq!(table.count(1, 3), 3);
        assert_eq!(table.count(2, 3), 2);
        assert_eq!(table.count(0, 2), 0);
        assert_eq!(table.cells.len(), 6);
        assert_eq!(table.num_items(), 4);
    }

    #[test]
    fn test_replay_keeps_frequent_pairs() {
        let mut root = TrieNode::new(3);
        for item in 0..3 {
            root.add_empty_state(item, 3);
        }
        let mut table = PairTable::new(3);
        table.add_basket(&[0, 1, 2], 1);
        table.add_basket(&[0, 1], 1);
        table.add_basket(&[1, 2], 1);

        table.replay_into(&mut root, 2.0);

        assert_eq!(root.is_included(&[0, 1]).map(TrieNode::counter), Some(2));
        assert_eq!(root.is_included(&[1, 2]).map(TrieNode::counter), Some(2));
        assert!(root.is_included(&[0, 2]).is_none());
        assert_eq!(root.maxpath(), 2);
    }

    #[test]
    fn test_single_item_table_is_empty() {
        let mut root = TrieNode::new(1);
        root.add_empty_state(0, 1);
        let table = PairTable::new(1);
        table.replay_into(&mut root, 1.0);
        assert_eq!(root.maxpath(), 1);
    }
}
