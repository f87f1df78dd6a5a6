use super::trie::{AprioriTrie, TrieNode};
use super::Item;

/// An association rule `condition ==> consequence`.
///
/// `support` is the support of the union of both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRule {
    pub condition: Vec<Item>,
    pub consequence: Vec<Item>,
    pub support: usize,
    pub confidence: f64,
    pub divergence: f64,
}

impl AssociationRule {
    /// Maps both sides through `decode`, keeping each side sorted.
    pub fn map_items<F>(&self, mut decode: F) -> Self
    where
        F: FnMut(Item) -> Item,
    {
        let mut condition: Vec<Item> = self.condition.iter().map(|&item| decode(item)).collect();
        let mut consequence: Vec<Item> =
            self.consequence.iter().map(|&item| decode(item)).collect();
        condition.sort_unstable();
        consequence.sort_unstable();
        Self {
            condition,
            consequence,
            ..self.clone()
        }
    }
}

/// Kullback-Leibler style score of how far `confidence` departs from the
/// consequence's marginal probability `p_b`, weighted by the condition's
/// probability `p_a`.
///
/// A consequence that occurs in no transaction or in all of them carries no
/// information, so degenerate marginals and non-finite results score 0.
pub fn divergence(confidence: f64, p_a: f64, p_b: f64) -> f64 {
    if p_b <= 0.0 || p_b >= 1.0 {
        return 0.0;
    }
    let hit = |conf: f64| conf * (conf / p_b).ln();
    let miss = |conf: f64| (1.0 - conf) * ((1.0 - conf) / (1.0 - p_b)).ln();

    let score = if confidence >= 1.0 {
        p_a * hit(confidence)
    } else if confidence <= 0.0 {
        miss(confidence)
    } else {
        p_a * (hit(confidence) + miss(confidence))
    };

    if score.is_finite() {
        score
    } else {
        0.0
    }
}

impl AprioriTrie {
    /// Enumerates the association rules of every stored itemset of size two
    /// or more.
    ///
    /// A rule is reported when `support(full) > min_conf * support(condition)`
    /// and the full itemset occurs more than once.
    pub fn association<E, F>(&self, min_conf: f64, mut emit: F) -> Result<(), E>
    where
        F: FnMut(AssociationRule) -> Result<(), E>,
    {
        let mut itemset = Vec::new();
        self.assoc_rule_assist(self.root(), min_conf, &mut itemset, &mut emit)
    }

    fn assoc_rule_assist<E, F>(
        &self,
        node: &TrieNode,
        min_conf: f64,
        itemset: &mut Vec<Item>,
        emit: &mut F,
    ) -> Result<(), E>
    where
        F: FnMut(AssociationRule) -> Result<(), E>,
    {
        if itemset.len() > 1 {
            let mut condition = Vec::with_capacity(itemset.len());
            let mut consequence = itemset.clone();
            self.assoc_rule_find(
                min_conf,
                &mut condition,
                &mut consequence,
                node.counter(),
                emit,
            )?;
        }
        for edge in node.children() {
            itemset.push(edge.label);
            self.assoc_rule_assist(&edge.subtrie, min_conf, itemset, emit)?;
            itemset.pop();
        }
        Ok(())
    }

    /// Moves consequence items larger than every condition item across one
    /// at a time, so each split of the itemset is reached exactly once.
    fn assoc_rule_find<E, F>(
        &self,
        min_conf: f64,
        condition: &mut Vec<Item>,
        consequence: &mut Vec<Item>,
        union_support: usize,
        emit: &mut F,
    ) -> Result<(), E>
    where
        F: FnMut(AssociationRule) -> Result<(), E>,
    {
        for idx in 0..consequence.len() {
            let item = consequence[idx];
            if condition.last().is_some_and(|&last| last > item) {
                continue;
            }

            consequence.remove(idx);
            condition.push(item);

            if let Some(rule) = self.evaluate_split(min_conf, condition, consequence, union_support) {
                emit(rule)?;
            }
            if consequence.len() > 1 {
                self.assoc_rule_find(min_conf, condition, consequence, union_support, emit)?;
            }

            condition.pop();
            consequence.insert(idx, item);
        }
        Ok(())
    }

    fn evaluate_split(
        &self,
        min_conf: f64,
        condition: &[Item],
        consequence: &[Item],
        union_support: usize,
    ) -> Option<AssociationRule> {
        let condition_support = self.support(condition)?;
        if union_support as f64 <= condition_support as f64 * min_conf || union_support <= 1 {
            return None;
        }
        let consequence_support = self.support(consequence)?;

        let total = self.transaction_count() as f64;
        let confidence = union_support as f64 / condition_support as f64;
        let p_a = condition_support as f64 / total;
        let p_b = consequence_support as f64 / total;

        Some(AssociationRule {
            condition: condition.to_vec(),
            consequence: consequence.to_vec(),
            support: union_support,
            confidence,
            divergence: divergence(confidence, p_a, p_b),
        })
    }
}
