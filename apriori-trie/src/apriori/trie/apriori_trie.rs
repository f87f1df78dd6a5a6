use std::convert::Infallible;

use super::node::TrieNode;
use super::pairs::PairTable;
use crate::apriori::Item;

/// New candidate leaves planned under the node at `path`.
#[derive(Debug)]
struct Extension {
    path: Vec<Item>,
    labels: Vec<Item>,
}

/// Trie of frequent itemsets and pending candidates.
///
/// Extends the plain [`TrieNode`] with Apriori candidate generation. The
/// size-2 candidates live in a dense [`PairTable`] until they are pruned;
/// every other level is stored as trie edges.
#[derive(Debug, Clone)]
pub struct AprioriTrie {
    root: TrieNode,
    pair_counts: Option<PairTable>,
}

impl AprioriTrie {
    /// `transaction_count` is the support of the empty itemset.
    pub fn new(transaction_count: usize) -> Self {
        Self {
            root: TrieNode::new(transaction_count),
            pair_counts: None,
        }
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    pub fn transaction_count(&self) -> usize {
        self.root.counter
    }

    /// Inserts the frequent items; `supports[code]` is the support of `code`.
    pub fn insert_frequent_items(&mut self, supports: &[usize]) {
        for (code, &support) in supports.iter().enumerate() {
            self.root.add_empty_state(code, support);
        }
        if !self.root.children.is_empty() {
            self.root.maxpath = 1;
        }
    }

    pub fn longest_path(&self) -> usize {
        self.root.maxpath
    }

    pub fn is_included(&self, itemset: &[Item]) -> Option<&TrieNode> {
        self.root.is_included(itemset)
    }

    pub fn support(&self, itemset: &[Item]) -> Option<usize> {
        self.is_included(itemset).map(TrieNode::counter)
    }

    /// Generates the candidates of size `frequent_size + 1`.
    ///
    /// The subset checks read the trie while the new leaves are added, so
    /// the extensions are planned first and grafted afterwards. Checks only
    /// look at itemsets of `frequent_size` items, which grafting never
    /// touches.
    pub fn candidate_generation(&mut self, frequent_size: usize) {
        if frequent_size == 1 {
            self.candidate_generation_two();
        } else if frequent_size > 1 && self.root.maxpath == frequent_size {
            let mut maybe_candidate = Vec::with_capacity(frequent_size + 1);
            let mut extensions = Vec::new();
            self.candidate_generation_assist(
                &self.root,
                frequent_size - 1,
                &mut maybe_candidate,
                &mut extensions,
            );
            for extension in extensions {
                self.root.graft(&extension.path, &extension.labels);
            }
        }
    }

    fn candidate_generation_two(&mut self) {
        if self.root.children.is_empty() {
            return;
        }
        self.pair_counts = Some(PairTable::new(self.root.children.len()));
        self.root.maxpath = 2;
    }

    /// Descends `distance` levels to the generator nodes and joins sibling
    /// leaves there into candidates.
    fn candidate_generation_assist(
        &self,
        node: &TrieNode,
        distance: usize,
        maybe_candidate: &mut Vec<Item>,
        extensions: &mut Vec<Extension>,
    ) {
        if distance > 0 {
            for edge in &node.children {
                if edge.subtrie.maxpath < distance {
                    continue;
                }
                maybe_candidate.push(edge.label);
                self.candidate_generation_assist(
                    &edge.subtrie,
                    distance - 1,
                    maybe_candidate,
                    extensions,
                );
                maybe_candidate.pop();
            }
            return;
        }

        for (first_idx, edge) in node.children.iter().enumerate() {
            maybe_candidate.push(edge.label);
            let mut labels = Vec::new();
            for second in &node.children[first_idx + 1..] {
                maybe_candidate.push(second.label);
                if self.is_all_subset_frequent(maybe_candidate) {
                    labels.push(second.label);
                }
                maybe_candidate.pop();
            }
            if !labels.is_empty() {
                extensions.push(Extension {
                    path: maybe_candidate.clone(),
                    labels,
                });
            }
            maybe_candidate.pop();
        }
    }

    /// Checks the (k-1)-subsets of a size-k candidate against the trie.
    ///
    /// The subsets that drop one of the two last items are the generators
    /// the candidate was joined from, so they are known to be present.
    pub fn is_all_subset_frequent(&self, maybe_candidate: &[Item]) -> bool {
        if maybe_candidate.len() < 3 {
            return true;
        }
        let mut subset = Vec::with_capacity(maybe_candidate.len() - 1);
        (0..maybe_candidate.len() - 2).rev().all(|skip| {
            subset.clear();
            subset.extend(
                maybe_candidate
                    .iter()
                    .enumerate()
                    .filter(|&(pos, _)| pos != skip)
                    .map(|(_, &item)| item),
            );
            self.root.is_included(&subset).is_some()
        })
    }

    /// Counts the candidates of `candidate_size` contained in `basket`.
    pub fn find_candidate(&mut self, basket: &[Item], candidate_size: usize, weight: usize) {
        if candidate_size == 2 {
            if let Some(table) = self.pair_counts.as_mut() {
                table.add_basket(basket, weight);
            }
        } else if candidate_size > 0 && basket.len() >= candidate_size {
            let end = basket.len() - candidate_size + 1;
            self.root
                .find_candidate(basket, 0, end, candidate_size, weight);
        }
    }

    /// Prunes the candidates of `candidate_size` below `min_occurrence`.
    pub fn delete_infrequent(&mut self, min_occurrence: f64, candidate_size: usize) {
        if candidate_size == 2 {
            if let Some(table) = self.pair_counts.take() {
                table.replay_into(&mut self.root, min_occurrence);
            }
        } else if candidate_size > 2 {
            self.root
                .delete_infrequent(min_occurrence, candidate_size - 1);
        }
    }

    pub fn has_pending_pairs(&self) -> bool {
        self.pair_counts.is_some()
    }

    /// Calls `visit` for every itemset of `size` in lexicographic code
    /// order, stopping at the first error.
    pub fn for_each_itemset<E, F>(&self, size: usize, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&[Item], usize) -> Result<(), E>,
    {
        let mut itemset = Vec::with_capacity(size);
        visit_level(&self.root, size, &mut itemset, &mut visit)
    }

    /// Collects every stored itemset of `size` with its support.
    pub fn itemsets_of_size(&self, size: usize) -> Vec<(Vec<Item>, usize)> {
        let mut found = Vec::new();
        let _ = self.for_each_itemset(size, |itemset, support| {
            found.push((itemset.to_vec(), support));
            Ok::<(), Infallible>(())
        });
        found
    }
}

fn visit_level<E, F>(
    node: &TrieNode,
    distance: usize,
    itemset: &mut Vec<Item>,
    visit: &mut F,
) -> Result<(), E>
where
    F: FnMut(&[Item], usize) -> Result<(), E>,
{
    if distance == 0 {
        return visit(itemset, node.counter);
    }
    for edge in &node.children {
        if edge.subtrie.maxpath + 1 >= distance {
            itemset.push(edge.label);
            visit_level(&edge.subtrie, distance - 1, itemset, visit)?;
            itemset.pop();
        }
    }
    Ok(())
}
