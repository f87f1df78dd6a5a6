pub mod mining;
pub mod rules;
pub mod storage;
pub mod support;
pub mod trie;


/// Item code. Raw ids and dense recoded ids share the type.
pub type Item = usize;

pub use mining::{apriori_algorithm, mine, Apriori, MiningParams, MiningPhase, MiningSummary};
pub use rules::{divergence, AssociationRule};
pub use storage::{FrequentLevel, ItemsetStorage};
pub use support::SupportCounter;
pub use trie::{AprioriTrie, PairTable, TrieNode};
