use ndarray::ArrayView2;
use tracing::{debug, info};

use super::storage::FrequentLevel;
use super::support::SupportCounter;
use super::trie::AprioriTrie;
use crate::error::{AprioriError, Result};
use crate::io::{InMemorySource, ItemRecoder, LevelCollector, MiningSink, TransactionSource};

/// Where a mining run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningPhase {
    ScanSingles,
    GeneratePairs,
    CountSupport,
    Prune,
    Generate,
    Emit,
    GenerateRules,
    Done,
}

/// Thresholds and switches of one mining run.
#[derive(Debug, Clone, PartialEq)]
pub struct MiningParams {
    /// Relative support threshold in (0, 1].
    pub min_support: f64,
    /// Confidence threshold in (0, 1]; no rules are mined when `None`.
    pub min_confidence: Option<f64>,
    /// Largest itemset size to mine; unbounded when `None`.
    pub size_threshold: Option<usize>,
    /// Keep the reduced baskets in memory after the first counting pass.
    pub store_input: bool,
}

impl MiningParams {
    pub fn new(min_support: f64) -> Self {
        Self {
            min_support,
            min_confidence: None,
            size_threshold: None,
            store_input: true,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }

    /// A threshold of 0 means unbounded.
    pub fn with_size_threshold(mut self, size_threshold: Option<usize>) -> Self {
        self.size_threshold = size_threshold.filter(|&size| size > 0);
        self
    }

    pub fn with_store_input(mut self, store_input: bool) -> Self {
        self.store_input = store_input;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_threshold("min_supp", self.min_support)?;
        if let Some(min_confidence) = self.min_confidence {
            check_threshold("min_conf", min_confidence)?;
        }
        Ok(())
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(AprioriError::InvalidThreshold { name, value })
    }
}

/// Counts reported by a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiningSummary {
    pub transaction_count: usize,
    pub frequent_items: usize,
    pub longest_itemset: usize,
    pub itemsets: usize,
    pub rules: usize,
    pub support_passes: usize,
}

/// Level-wise Apriori driver.
///
/// Scans the single items, then alternates counting, pruning and candidate
/// generation on one [`AprioriTrie`] until no longer itemset can appear,
/// and finally writes the itemsets (and rules) to a [`MiningSink`].
#[derive(Debug)]
pub struct Apriori {
    params: MiningParams,
    phase: MiningPhase,
    counter: SupportCounter,
    trie: Option<AprioriTrie>,
    recoder: Option<ItemRecoder>,
}

impl Apriori {
    pub fn new(params: MiningParams) -> Result<Self> {
        params.validate()?;
        let counter = SupportCounter::new(params.store_input);
        Ok(Self {
            params,
            phase: MiningPhase::ScanSingles,
            counter,
            trie: None,
            recoder: None,
        })
    }

    pub fn params(&self) -> &MiningParams {
        &self.params
    }

    pub fn phase(&self) -> MiningPhase {
        self.phase
    }

    /// The final trie, once the run is over.
    pub fn trie(&self) -> Option<&AprioriTrie> {
        self.trie.as_ref()
    }

    pub fn recoder(&self) -> Option<&ItemRecoder> {
        self.recoder.as_ref()
    }

    pub fn run<S, K>(&mut self, source: &mut S, sink: &mut K) -> Result<MiningSummary>
    where
        S: TransactionSource + ?Sized,
        K: MiningSink + ?Sized,
    {
        if self.phase != MiningPhase::ScanSingles {
            return Err(AprioriError::InvalidPhase {
                expected: MiningPhase::ScanSingles,
                found: self.phase,
            });
        }
        info!("Finding frequent itemsets...");

        info!("Determining the support of the items and deleting infrequent ones!");
        source.rewind()?;
        let scan = ItemRecoder::scan(source, self.params.min_support)?;
        let mut trie = AprioriTrie::new(scan.transaction_count);
        trie.insert_frequent_items(&scan.supports);
        let recoder = scan.recoder;

        let mut summary = MiningSummary {
            transaction_count: scan.transaction_count,
            frequent_items: scan.supports.len(),
            ..MiningSummary::default()
        };

        summary.support_passes = self.mine_levels(&mut trie, source, &recoder)?;
        summary.longest_itemset = trie.longest_path();

        self.phase = MiningPhase::Emit;
        summary.itemsets = emit_itemsets(&trie, &recoder, sink)?;

        if let Some(min_confidence) = self.params.min_confidence {
            self.phase = MiningPhase::GenerateRules;
            info!("Generating association rules...!");
            summary.rules = emit_rules(&trie, &recoder, min_confidence, sink)?;
        }
        sink.finish()?;

        self.phase = MiningPhase::Done;
        self.trie = Some(trie);
        self.recoder = Some(recoder);
        info!(
            itemsets = summary.itemsets,
            rules = summary.rules,
            "Mining is done!"
        );
        Ok(summary)
    }

    /// The scan, prune, generate loop. Returns the number of counting passes.
    fn mine_levels<S>(
        &mut self,
        trie: &mut AprioriTrie,
        source: &mut S,
        recoder: &ItemRecoder,
    ) -> Result<usize>
    where
        S: TransactionSource + ?Sized,
    {
        let min_occurrence = self.params.min_support * trie.transaction_count() as f64;
        let size_threshold = self.params.size_threshold;
        if size_threshold.is_some_and(|size| size < 2) {
            info!("Size threshold is reached!");
            return Ok(0);
        }

        let mut passes = 0;
        let mut longest_path = trie.longest_path();
        let mut candidate_size = 2;

        self.phase = MiningPhase::GeneratePairs;
        info!(candidate_size, "Generating itemset candidates!");
        trie.candidate_generation(1);

        while longest_path < trie.longest_path() {
            self.phase = MiningPhase::CountSupport;
            source.rewind()?;
            info!(candidate_size, "Determining the support of the itemset candidates!");
            self.counter.count(trie, source, recoder, candidate_size)?;
            passes += 1;

            self.phase = MiningPhase::Prune;
            info!("Deleting infrequent itemsets!");
            trie.delete_infrequent(min_occurrence, candidate_size);
            debug!(
                candidate_size,
                longest_path = trie.longest_path(),
                "pruned"
            );

            if size_threshold == Some(candidate_size) {
                info!("Size threshold is reached!");
                break;
            }

            longest_path = trie.longest_path();
            candidate_size += 1;
            self.phase = MiningPhase::Generate;
            info!(candidate_size, "Generating itemset candidates!");
            trie.candidate_generation(candidate_size - 1);
        }
        Ok(passes)
    }
}

fn emit_itemsets<K>(trie: &AprioriTrie, recoder: &ItemRecoder, sink: &mut K) -> Result<usize>
where
    K: MiningSink + ?Sized,
{
    let mut emitted = 0;
    for size in 1..=trie.longest_path() {
        trie.for_each_itemset(size, |itemset, support| {
            emitted += 1;
            sink.emit_itemset(&recoder.decode_itemset(itemset), support)
        })?;
    }
    Ok(emitted)
}

fn emit_rules<K>(
    trie: &AprioriTrie,
    recoder: &ItemRecoder,
    min_confidence: f64,
    sink: &mut K,
) -> Result<usize>
where
    K: MiningSink + ?Sized,
{
    let mut emitted = 0;
    trie.association(min_confidence, |rule| {
        emitted += 1;
        sink.emit_rule(&rule.map_items(|code| recoder.decode(code)))
    })?;
    Ok(emitted)
}

/// Mines `source` into memory.
pub fn mine<S>(source: &mut S, params: MiningParams) -> Result<LevelCollector>
where
    S: TransactionSource + ?Sized,
{
    let mut apriori = Apriori::new(params)?;
    let mut collector = LevelCollector::new();
    apriori.run(source, &mut collector)?;
    Ok(collector)
}

/// Frequent itemsets of a binary transaction matrix, one level per size.
pub fn apriori_algorithm(
    transactions: ArrayView2<i32>,
    min_support: f64,
    size_threshold: Option<usize>,
) -> Result<Vec<FrequentLevel>> {
    let mut source = InMemorySource::from_matrix(transactions);
    let params = MiningParams::new(min_support).with_size_threshold(size_threshold);
    Ok(mine(&mut source, params)?.into_levels())
}
