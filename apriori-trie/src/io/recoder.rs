use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::source::TransactionSource;
use crate::apriori::Item;
use crate::error::Result;

/// Dense codes for the frequent items.
///
/// The least frequent surviving item gets code 0; equal supports are
/// ordered by raw item id. Raw ids may be sparse, so only the code side is
/// dense.
#[derive(Debug, Clone, Default)]
pub struct ItemRecoder {
    new_code: BTreeMap<Item, Item>,
    new_code_inverse: Vec<Item>,
}

/// Result of the single-item frequency scan.
#[derive(Debug, Clone)]
pub struct FrequencyScan {
    /// Number of non-empty baskets.
    pub transaction_count: usize,
    /// `supports[code]` is the support of the item with that code.
    pub supports: Vec<usize>,
    pub recoder: ItemRecoder,
}

impl ItemRecoder {
    /// Counts every raw item over the whole source and keeps those whose
    /// support exceeds `min_supp * (transaction_count - 0.5)`.
    ///
    /// Empty baskets are not counted as transactions. The source is left
    /// exhausted; callers rewind before the next pass.
    pub fn scan<S>(source: &mut S, min_supp: f64) -> Result<FrequencyScan>
    where
        S: TransactionSource + ?Sized,
    {
        let mut transaction_count = 0usize;
        let mut item_counts: BTreeMap<Item, usize> = BTreeMap::new();
        let mut basket = Vec::new();

        while source.read_basket(&mut basket)? {
            if basket.is_empty() {
                continue;
            }
            transaction_count += 1;
            for &item in &basket {
                *item_counts.entry(item).or_insert(0) += 1;
            }
        }

        let min_occurrence = min_supp * (transaction_count as f64 - 0.5);
        let by_support: BTreeSet<(usize, Item)> = item_counts
            .iter()
            .filter(|&(_, &count)| count as f64 > min_occurrence)
            .map(|(&item, &count)| (count, item))
            .collect();

        let mut recoder = ItemRecoder {
            new_code: BTreeMap::new(),
            new_code_inverse: Vec::with_capacity(by_support.len()),
        };
        let mut supports = Vec::with_capacity(by_support.len());
        for (code, (count, item)) in by_support.into_iter().enumerate() {
            recoder.new_code.insert(item, code);
            recoder.new_code_inverse.push(item);
            supports.push(count);
        }

        debug!(
            transaction_count,
            distinct_items = item_counts.len(),
            frequent_items = supports.len(),
            "frequency scan finished"
        );

        Ok(FrequencyScan {
            transaction_count,
            supports,
            recoder,
        })
    }

    pub fn recode(&self, raw_item: Item) -> Option<Item> {
        self.new_code.get(&raw_item).copied()
    }

    pub fn decode(&self, code: Item) -> Item {
        self.new_code_inverse[code]
    }

    pub fn decode_itemset(&self, itemset: &[Item]) -> Vec<Item> {
        let mut decoded: Vec<Item> = itemset.iter().map(|&code| self.decode(code)).collect();
        decoded.sort_unstable();
        decoded
    }

    /// Keeps the frequent items of `raw_basket`, recoded and sorted.
    pub fn recode_basket(&self, raw_basket: &[Item], recoded: &mut Vec<Item>) {
        recoded.clear();
        recoded.extend(raw_basket.iter().filter_map(|&item| self.recode(item)));
        recoded.sort_unstable();
    }

    pub fn num_frequent_items(&self) -> usize {
        self.new_code_inverse.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::InMemorySource;

    #[test]
    fn test_scan_orders_codes_by_support() {
        let mut source = InMemorySource::new(vec![
            vec![5, 9],
            vec![5, 9, 2],
            vec![5, 7],
            vec![],
            vec![5, 2, 7],
        ]);

        let scan = ItemRecoder::scan(&mut source, 0.5).unwrap();

        assert_eq!(scan.transaction_count, 4);
        // 2, 7 and 9 all occur twice, 5 occurs four times
        assert_eq!(scan.supports, vec![2, 2, 2, 4]);
        assert_eq!(scan.recoder.decode(0), 2);
        assert_eq!(scan.recoder.decode(3), 5);
        assert_eq!(scan.recoder.recode(9), Some(2));
        assert_eq!(scan.recoder.recode(100), None);
    }

    #[test]
    fn test_recode_basket_drops_infrequent_items() {
        let mut source = InMemorySource::new(vec![vec![1, 2], vec![1, 2], vec![1, 3]]);
        let scan = ItemRecoder::scan(&mut source, 0.6).unwrap();

        let mut recoded = Vec::new();
        scan.recoder.recode_basket(&[1, 2, 3], &mut recoded);
        assert_eq!(recoded, vec![0, 1]);
        assert_eq!(scan.recoder.decode_itemset(&recoded), vec![1, 2]);
    }

    #[test]
    fn test_sparse_raw_ids() {
        let far = u32::MAX as usize + 7;
        let mut source = InMemorySource::new(vec![
            vec![1, far, usize::MAX],
            vec![far, usize::MAX],
            vec![1, usize::MAX],
        ]);
        let scan = ItemRecoder::scan(&mut source, 0.5).unwrap();

        assert_eq!(scan.recoder.num_frequent_items(), 3);
        assert_eq!(scan.supports, vec![2, 2, 3]);
        assert_eq!(scan.recoder.recode(far), Some(1));
        assert_eq!(scan.recoder.recode(usize::MAX), Some(2));
        assert_eq!(scan.recoder.recode(far + 1), None);
        assert_eq!(scan.recoder.decode_itemset(&[2, 0]), vec![1, usize::MAX]);
    }
}
