use std::collections::BTreeMap;

use apriori_trie::io::{InMemorySource, ItemRecoder, LevelCollector};
use apriori_trie::{mine, AprioriTrie, Item, MiningParams};
use proptest::prelude::*;

const NUM_ITEMS: usize = 7;

fn baskets_strategy() -> impl Strategy<Value = Vec<Vec<Item>>> {
    prop::collection::vec(
        prop::collection::btree_set(0..NUM_ITEMS, 0..=NUM_ITEMS)
            .prop_map(|basket| basket.into_iter().collect::<Vec<_>>()),
        1..14,
    )
}

fn min_support_strategy() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![0.1, 0.2, 0.25, 0.3, 0.4, 0.5, 0.75, 1.0])
}

fn contains(basket: &[Item], itemset: &[Item]) -> bool {
    itemset.iter().all(|item| basket.binary_search(item).is_ok())
}

fn support(baskets: &[Vec<Item>], itemset: &[Item]) -> usize {
    baskets
        .iter()
        .filter(|basket| contains(basket, itemset))
        .count()
}

/// Every frequent itemset by exhaustive enumeration.
fn brute_force(baskets: &[Vec<Item>], min_supp: f64) -> BTreeMap<Vec<Item>, usize> {
    let transactions = baskets.iter().filter(|basket| !basket.is_empty()).count();
    let item_floor = min_supp * (transactions as f64 - 0.5);
    let itemset_floor = min_supp * transactions as f64;

    let mut frequent = BTreeMap::new();
    for mask in 1u32..(1 << NUM_ITEMS) {
        let itemset: Vec<Item> = (0..NUM_ITEMS).filter(|&item| mask & (1 << item) != 0).collect();
        let count = support(baskets, &itemset);
        let keep = if itemset.len() == 1 {
            count as f64 > item_floor
        } else {
            count as f64 >= itemset_floor
        };
        if keep && count > 0 {
            frequent.insert(itemset, count);
        }
    }
    frequent
}

fn reported(collector: &LevelCollector) -> BTreeMap<Vec<Item>, usize> {
    collector
        .levels
        .iter()
        .flat_map(|level| level.iter())
        .map(|(itemset, support)| (itemset.to_vec(), support))
        .collect()
}

fn run(baskets: &[Vec<Item>], params: MiningParams) -> LevelCollector {
    mine(&mut InMemorySource::new(baskets.to_vec()), params).unwrap()
}

proptest! {
    #[test]
    fn prop_matches_brute_force(baskets in baskets_strategy(), min_supp in min_support_strategy()) {
        let collector = run(&baskets, MiningParams::new(min_supp));
        prop_assert_eq!(reported(&collector), brute_force(&baskets, min_supp));
    }

    #[test]
    fn prop_downward_closed(baskets in baskets_strategy(), min_supp in min_support_strategy()) {
        let found = reported(&run(&baskets, MiningParams::new(min_supp)));
        for (itemset, &count) in &found {
            if itemset.len() < 2 {
                continue;
            }
            for skip in 0..itemset.len() {
                let mut subset = itemset.clone();
                subset.remove(skip);
                let subset_count = found.get(&subset).copied();
                prop_assert!(subset_count.is_some(), "{:?} lacks subset {:?}", itemset, subset);
                prop_assert!(subset_count.unwrap_or(0) >= count);
            }
        }
    }

    #[test]
    fn prop_lower_support_finds_more(baskets in baskets_strategy(), min_supp in min_support_strategy()) {
        let strict = reported(&run(&baskets, MiningParams::new(min_supp)));
        let loose = reported(&run(&baskets, MiningParams::new(min_supp / 2.0)));
        for (itemset, count) in &strict {
            prop_assert_eq!(loose.get(itemset), Some(count));
        }
    }

    #[test]
    fn prop_cache_does_not_change_output(
        baskets in baskets_strategy(),
        min_supp in min_support_strategy(),
        min_conf in prop::sample::select(vec![0.3, 0.5, 0.9]),
    ) {
        let params = MiningParams::new(min_supp).with_min_confidence(min_conf);
        let cached = run(&baskets, params.clone());
        let streamed = run(&baskets, params.with_store_input(false));
        prop_assert_eq!(&cached.levels, &streamed.levels);
        prop_assert_eq!(&cached.rules, &streamed.rules);
    }

    #[test]
    fn prop_rules_are_consistent(baskets in baskets_strategy(), min_supp in min_support_strategy()) {
        let collector = run(&baskets, MiningParams::new(min_supp).with_min_confidence(0.4));
        for rule in &collector.rules {
            let mut union = rule.condition.clone();
            union.extend_from_slice(&rule.consequence);
            union.sort_unstable();
            let condition_support = support(&baskets, &rule.condition);

            prop_assert_eq!(rule.support, support(&baskets, &union));
            prop_assert!(rule.support > 1);
            prop_assert!(rule.support as f64 > 0.4 * condition_support as f64);
            prop_assert!((rule.confidence - rule.support as f64 / condition_support as f64).abs() < 1e-12);
            prop_assert!(rule.divergence.is_finite());
        }
    }

    /// Drives the trie level by level and checks every candidate before it
    /// is counted.
    #[test]
    fn prop_candidates_have_frequent_subsets(baskets in baskets_strategy(), min_supp in min_support_strategy()) {
        let mut source = InMemorySource::new(baskets.clone());
        let scan = ItemRecoder::scan(&mut source, min_supp).unwrap();
        let recoded: Vec<Vec<Item>> = baskets
            .iter()
            .map(|basket| {
                let mut codes = Vec::new();
                scan.recoder.recode_basket(basket, &mut codes);
                codes
            })
            .collect();
        let min_occurrence = min_supp * scan.transaction_count as f64;

        let mut trie = AprioriTrie::new(scan.transaction_count);
        trie.insert_frequent_items(&scan.supports);
        trie.candidate_generation(1);
        let mut candidate_size = 2;
        let mut longest_path = 1;

        while longest_path < trie.longest_path() {
            if candidate_size > 2 {
                for (candidate, counter) in trie.itemsets_of_size(candidate_size) {
                    prop_assert_eq!(counter, 0);
                    for skip in 0..candidate.len() {
                        let mut subset = candidate.clone();
                        subset.remove(skip);
                        prop_assert!(trie.is_included(&subset).is_some());
                    }
                }
            }

            for basket in &recoded {
                trie.find_candidate(basket, candidate_size, 1);
            }
            trie.delete_infrequent(min_occurrence, candidate_size);
            for (itemset, counter) in trie.itemsets_of_size(candidate_size) {
                prop_assert_eq!(counter, support(&recoded, &itemset));
                prop_assert!(counter as f64 >= min_occurrence);
            }

            longest_path = trie.longest_path();
            candidate_size += 1;
            trie.candidate_generation(candidate_size - 1);
        }
    }
}
