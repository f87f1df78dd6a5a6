use std::collections::BTreeMap;

use tracing::debug;

use super::trie::AprioriTrie;
use super::Item;
use crate::error::Result;
use crate::io::{ItemRecoder, TransactionSource};

/// Runs the support-counting passes over a transaction source.
///
/// With `store_input` the first pass folds every recoded basket of two or
/// more items into a multiset, and every pass after that scans the multiset
/// with its occurrence counts as weights instead of the source.
#[derive(Debug, Clone)]
pub struct SupportCounter {
    store_input: bool,
    reduced_baskets: BTreeMap<Vec<Item>, usize>,
    cache_filled: bool,
}

impl SupportCounter {
    pub fn new(store_input: bool) -> Self {
        Self {
            store_input,
            reduced_baskets: BTreeMap::new(),
            cache_filled: false,
        }
    }

    pub fn store_input(&self) -> bool {
        self.store_input
    }

    /// Number of distinct reduced baskets held in memory.
    pub fn cached_baskets(&self) -> usize {
        self.reduced_baskets.len()
    }

    /// Counts the candidates of `candidate_size` in every basket.
    pub fn count<S>(
        &mut self,
        trie: &mut AprioriTrie,
        source: &mut S,
        recoder: &ItemRecoder,
        candidate_size: usize,
    ) -> Result<()>
    where
        S: TransactionSource + ?Sized,
    {
        let mut raw = Vec::new();
        let mut recoded = Vec::new();

        if !self.store_input {
            while source.read_basket(&mut raw)? {
                recoder.recode_basket(&raw, &mut recoded);
                trie.find_candidate(&recoded, candidate_size, 1);
            }
            return Ok(());
        }

        if !self.cache_filled {
            while source.read_basket(&mut raw)? {
                recoder.recode_basket(&raw, &mut recoded);
                if recoded.len() > 1 {
                    *self.reduced_baskets.entry(recoded.clone()).or_insert(0) += 1;
                }
            }
            self.cache_filled = true;
            debug!(
                distinct_baskets = self.reduced_baskets.len(),
                "reduced baskets cached"
            );
        }

        for (basket, &weight) in &self.reduced_baskets {
            trie.find_candidate(basket, candidate_size, weight);
        }
        Ok(())
    }
}
