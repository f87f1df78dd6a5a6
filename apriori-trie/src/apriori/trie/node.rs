use crate::apriori::Item;

/// Labeled edge to an exclusively owned subtrie.
#[derive(Debug, Clone)]
pub struct Edge {
    pub label: Item,
    pub subtrie: Box<TrieNode>,
}

/// A node of the itemset trie.
///
/// Every node stands for the itemset spelled by the edge labels on the path
/// from the root, and `counter` is that itemset's support. Edges are kept in
/// strictly ascending label order. `maxpath` caches the length of the longest
/// downward path, 0 for a leaf.
#[derive(Debug, Clone)]
pub struct TrieNode {
    pub(crate) counter: usize,
    pub(crate) children: Vec<Edge>,
    pub(crate) maxpath: usize,
}

impl TrieNode {
    pub fn new(counter: usize) -> Self {
        Self {
            counter,
            children: Vec::new(),
            maxpath: 0,
        }
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn maxpath(&self) -> usize {
        self.maxpath
    }

    pub fn children(&self) -> &[Edge] {
        &self.children
    }

    pub fn child(&self, label: Item) -> Option<&TrieNode> {
        self.children
            .binary_search_by_key(&label, |edge| edge.label)
            .ok()
            .map(|idx| self.children[idx].subtrie.as_ref())
    }

    /// Appends a child edge. Labels must arrive in strictly increasing order.
    pub fn add_empty_state(&mut self, label: Item, counter: usize) {
        debug_assert!(
            self.children.last().map_or(true, |edge| edge.label < label),
            "edge labels must be added in increasing order"
        );
        self.children.push(Edge {
            label,
            subtrie: Box::new(TrieNode::new(counter)),
        });
    }

    /// Walks `itemset` (sorted ascending) down from this node.
    pub fn is_included(&self, itemset: &[Item]) -> Option<&TrieNode> {
        let mut node = self;
        for &item in itemset {
            node = node.child(item)?;
        }
        Some(node)
    }

    /// Merge-walk of the edges against `basket[start..end]`.
    ///
    /// `distance` is the number of edges still to descend before reaching a
    /// counted candidate. A subtree is entered only when its `maxpath` says a
    /// candidate lies exactly `distance - 1` levels below it. Each level down
    /// may look one basket item further, hence `end + 1` on recursion.
    pub fn find_candidate(
        &mut self,
        basket: &[Item],
        start: usize,
        end: usize,
        distance: usize,
        increment: usize,
    ) {
        if distance == 0 {
            self.counter += increment;
            return;
        }

        let mut edge_idx = 0;
        let mut pos = start;
        while edge_idx < self.children.len() && pos < end {
            let edge = &mut self.children[edge_idx];
            let item = basket[pos];
            if edge.label < item {
                edge_idx += 1;
            } else if edge.label > item {
                pos += 1;
            } else {
                if edge.subtrie.maxpath + 1 == distance {
                    edge.subtrie
                        .find_candidate(basket, pos + 1, end + 1, distance - 1, increment);
                }
                edge_idx += 1;
                pos += 1;
            }
        }
    }

    /// Removes infrequent candidates `distance + 1` levels below this node.
    ///
    /// Above the candidate parents only children whose `maxpath` equals the
    /// remaining distance are visited, and `maxpath` is recomputed on the way
    /// back up.
    pub fn delete_infrequent(&mut self, min_occurrence: f64, distance: usize) {
        if distance > 0 {
            let mut longest = None;
            for edge in self.children.iter_mut() {
                if edge.subtrie.maxpath == distance {
                    edge.subtrie.delete_infrequent(min_occurrence, distance - 1);
                }
                longest = longest.max(Some(edge.subtrie.maxpath));
            }
            self.maxpath = longest.map_or(0, |path| path + 1);
        } else {
            self.children
                .retain(|edge| edge.subtrie.counter as f64 >= min_occurrence);
            if self.children.is_empty() {
                self.maxpath = 0;
            }
        }
    }

    pub(crate) fn child_mut(&mut self, label: Item) -> Option<&mut TrieNode> {
        let idx = self
            .children
            .binary_search_by_key(&label, |edge| edge.label)
            .ok()?;
        Some(self.children[idx].subtrie.as_mut())
    }

    /// Adds empty candidate leaves `labels` under the node at `path` and
    /// raises `maxpath` on every node along the way.
    pub(crate) fn graft(&mut self, path: &[Item], labels: &[Item]) {
        self.maxpath = self.maxpath.max(path.len() + 1);
        match path.split_first() {
            Some((&first, rest)) => {
                if let Some(child) = self.child_mut(first) {
                    child.graft(rest, labels);
                }
            }
            None => {
                for &label in labels {
                    self.add_empty_state(label, 0);
                }
                self.children.shrink_to_fit();
            }
        }
    }

    pub(crate) fn refresh_maxpath(&mut self) {
        self.maxpath = self
            .children
            .iter()
            .map(|edge| edge.subtrie.maxpath + 1)
            .max()
            .unwrap_or(0);
    }

    /// Number of nodes in the subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|edge| edge.subtrie.node_count())
            .sum::<usize>()
    }
}
