use super::Item;

/// Flat storage of equally sized itemsets and their supports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemsetStorage {
    pub items: Vec<Item>,
    pub offsets: Vec<(usize, usize)>,
    pub supports: Vec<usize>,
}

/// All frequent itemsets of one size.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentLevel {
    pub storage: ItemsetStorage,
    pub itemset_size: usize,
}

impl ItemsetStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `items` sorted and deduplicated.
    pub fn add_itemset_with_support(&mut self, mut items: Vec<Item>, support: usize) -> usize {
        items.sort_unstable();
        items.dedup();
        let start = self.items.len();
        self.items.extend_from_slice(&items);
        self.offsets.push((start, items.len()));
        self.supports.push(support);
        self.offsets.len() - 1
    }

    pub fn get_itemset(&self, idx: usize) -> &[Item] {
        let (start, len) = self.offsets[idx];
        &self.items[start..start + len]
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl FrequentLevel {
    pub fn new(itemset_size: usize) -> Self {
        Self {
            storage: ItemsetStorage::new(),
            itemset_size,
        }
    }

    pub fn add_itemset_with_support(&mut self, items: Vec<Item>, support: usize) -> usize {
        debug_assert_eq!(items.len(), self.itemset_size);
        self.storage.add_itemset_with_support(items, support)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn get_itemset(&self, idx: usize) -> &[Item] {
        self.storage.get_itemset(idx)
    }

    pub fn support(&self, idx: usize) -> usize {
        self.storage.supports[idx]
    }

    pub fn iter_itemsets(&self) -> impl Iterator<Item = &[Item]> {
        (0..self.storage.len()).map(move |idx| self.get_itemset(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[Item], usize)> {
        (0..self.storage.len()).map(move |idx| (self.get_itemset(idx), self.support(idx)))
    }

    /// Support of `itemset` if this level holds it.
    pub fn find(&self, itemset: &[Item]) -> Option<usize> {
        self.iter()
            .find(|&(stored, _)| stored == itemset)
            .map(|(_, support)| support)
    }

    /// Reorders the itemsets lexicographically.
    pub fn sort(&mut self) {
        let mut entries: Vec<(Vec<Item>, usize)> = self
            .iter()
            .map(|(itemset, support)| (itemset.to_vec(), support))
            .collect();
        entries.sort_unstable();
        let mut storage = ItemsetStorage::new();
        for (itemset, support) in entries {
            storage.add_itemset_with_support(itemset, support);
        }
        self.storage = storage;
    }
}
