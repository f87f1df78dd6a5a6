pub mod apriori_trie;
pub mod node;
pub mod pairs;

pub use apriori_trie::AprioriTrie;
pub use node::{Edge, TrieNode};
pub use pairs::PairTable;
