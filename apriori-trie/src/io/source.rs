use ndarray::ArrayView2;

use crate::apriori::Item;
use crate::error::Result;

/// A finite, restartable sequence of baskets of raw item ids.
pub trait TransactionSource {
    /// Fills `basket` with the next basket, sorted and without duplicates.
    /// Returns `false` once the source is exhausted.
    fn read_basket(&mut self, basket: &mut Vec<Item>) -> Result<bool>;

    /// Restarts the sequence from its first basket.
    fn rewind(&mut self) -> Result<()>;
}

/// Baskets held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    baskets: Vec<Vec<Item>>,
    cursor: usize,
}

impl InMemorySource {
    pub fn new<I, B>(baskets: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: IntoIterator<Item = Item>,
    {
        let baskets = baskets
            .into_iter()
            .map(|basket| {
                let mut basket: Vec<Item> = basket.into_iter().collect();
                basket.sort_unstable();
                basket.dedup();
                basket
            })
            .collect();
        Self { baskets, cursor: 0 }
    }

    /// Reads a binary transaction matrix: row `i` is a basket holding every
    /// column `j` with a non-zero cell.
    pub fn from_matrix(transactions: ArrayView2<i32>) -> Self {
        let baskets = transactions
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &cell)| cell != 0)
                    .map(|(item, _)| item)
                    .collect::<Vec<Item>>()
            })
            .collect::<Vec<_>>();
        Self { baskets, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.baskets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baskets.is_empty()
    }

    pub fn baskets(&self) -> &[Vec<Item>] {
        &self.baskets
    }
}

impl TransactionSource for InMemorySource {
    fn read_basket(&mut self, basket: &mut Vec<Item>) -> Result<bool> {
        basket.clear();
        match self.baskets.get(self.cursor) {
            Some(next) => {
                basket.extend_from_slice(next);
                self.cursor += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn rewind(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_from_matrix_reads_rows() {
        let transactions =
            Array2::from_shape_vec((3, 3), vec![1, 1, 0, 0, 0, 0, 0, 2, 1]).unwrap();
        let mut source = InMemorySource::from_matrix(transactions.view());

        let mut basket = Vec::new();
        assert!(source.read_basket(&mut basket).unwrap());
        assert_eq!(basket, vec![0, 1]);
        assert!(source.read_basket(&mut basket).unwrap());
        assert!(basket.is_empty());
        assert!(source.read_basket(&mut basket).unwrap());
        assert_eq!(basket, vec![1, 2]);
        assert!(!source.read_basket(&mut basket).unwrap());

        source.rewind().unwrap();
        assert!(source.read_basket(&mut basket).unwrap());
        assert_eq!(basket, vec![0, 1]);
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let source = InMemorySource::new(vec![vec![3, 1, 3, 2]]);
        assert_eq!(source.baskets()[0], vec![1, 2, 3]);
    }
}
