//! Trie based APRIORI: level-wise frequent itemset and association rule
//! mining over a prefix-tree of candidates.

pub mod apriori;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;

pub use apriori::{
    apriori_algorithm, mine, Apriori, AprioriTrie, AssociationRule, FrequentLevel, Item,
    MiningParams, MiningPhase, MiningSummary,
};
pub use error::{AprioriError, Result};

#[cfg(feature = "python")]
mod python {
    use numpy::ndarray::Array2;
    use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::apriori::{apriori_algorithm, FrequentLevel};

    fn mine_levels(
        transactions: PyReadonlyArray2<'_, i32>,
        min_support: f64,
        max_size: Option<usize>,
    ) -> PyResult<Vec<FrequentLevel>> {
        apriori_algorithm(transactions.as_array(), min_support, max_size)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Frequent itemsets of a one-hot transaction matrix, one array per size.
    #[pyfunction]
    #[pyo3(signature = (transactions, min_support, max_size=None))]
    fn apriori<'py>(
        py: Python<'py>,
        transactions: PyReadonlyArray2<'py, i32>,
        min_support: f64,
        max_size: Option<usize>,
    ) -> PyResult<Vec<Bound<'py, PyArray2<usize>>>> {
        let frequent_levels = mine_levels(transactions, min_support, max_size)?;

        let mut result = Vec::new();
        for level in frequent_levels {
            if level.is_empty() {
                continue;
            }

            let itemset_size = level.itemset_size;
            let num_itemsets = level.len();
            let mut data = vec![0usize; num_itemsets * itemset_size];
            for (i, itemset) in level.iter_itemsets().enumerate() {
                data[i * itemset_size..(i + 1) * itemset_size].copy_from_slice(itemset);
            }

            let array = Array2::from_shape_vec((num_itemsets, itemset_size), data)
                .map_err(|_| PyValueError::new_err("Failed to create array"))?;
            result.push(array.into_pyarray(py));
        }
        Ok(result)
    }

    /// Supports matching the rows returned by `apriori`, one array per size.
    #[pyfunction]
    #[pyo3(signature = (transactions, min_support, max_size=None))]
    fn apriori_supports<'py>(
        py: Python<'py>,
        transactions: PyReadonlyArray2<'py, i32>,
        min_support: f64,
        max_size: Option<usize>,
    ) -> PyResult<Vec<Bound<'py, PyArray1<usize>>>> {
        let frequent_levels = mine_levels(transactions, min_support, max_size)?;
        Ok(frequent_levels
            .into_iter()
            .filter(|level| !level.is_empty())
            .map(|level| level.storage.supports.into_pyarray(py))
            .collect())
    }

    #[pymodule]
    fn apriori_trie(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(apriori, m)?)?;
        m.add_function(wrap_pyfunction!(apriori_supports, m)?)?;
        Ok(())
    }
}
