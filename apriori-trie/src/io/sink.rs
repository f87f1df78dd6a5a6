use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::apriori::{AssociationRule, FrequentLevel, Item};
use crate::error::Result;

/// Receives the mining output, already decoded to raw item ids.
pub trait MiningSink {
    fn emit_itemset(&mut self, itemset: &[Item], support: usize) -> Result<()>;

    fn emit_rule(&mut self, rule: &AssociationRule) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Layout of the outcome file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutcomeFormat {
    /// Itemsets as `1 5 8 (12)`, then rules as
    /// `1 5 ==> 8 (0.750000, 12, 0.031416)`: confidence, support, divergence.
    #[default]
    Levels,
    /// Rules only, one edge per line as `1 5 8 0.750000 0.031416`: the
    /// condition items, the consequence items, confidence and divergence.
    /// Itemsets are not written.
    Edges,
}

/// Writes the outcome file in an [`OutcomeFormat`].
#[derive(Debug)]
pub struct OutcomeWriter<W: Write> {
    writer: W,
    format: OutcomeFormat,
}

impl OutcomeWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            format: OutcomeFormat::default(),
        }
    }

    pub fn with_format(mut self, format: OutcomeFormat) -> Self {
        self.format = format;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_items(&mut self, items: &[Item]) -> Result<()> {
        for (pos, item) in items.iter().enumerate() {
            if pos > 0 {
                self.writer.write_all(b" ")?;
            }
            write!(self.writer, "{}", item)?;
        }
        Ok(())
    }
}

impl<W: Write> MiningSink for OutcomeWriter<W> {
    fn emit_itemset(&mut self, itemset: &[Item], support: usize) -> Result<()> {
        if self.format == OutcomeFormat::Edges {
            return Ok(());
        }
        self.write_items(itemset)?;
        writeln!(self.writer, " ({})", support)?;
        Ok(())
    }

    fn emit_rule(&mut self, rule: &AssociationRule) -> Result<()> {
        match self.format {
            OutcomeFormat::Levels => {
                self.write_items(&rule.condition)?;
                self.writer.write_all(b" ==> ")?;
                self.write_items(&rule.consequence)?;
                writeln!(
                    self.writer,
                    " ({:.6}, {}, {:.6})",
                    rule.confidence, rule.support, rule.divergence
                )?;
            }
            OutcomeFormat::Edges => {
                self.write_items(&rule.condition)?;
                self.writer.write_all(b" ")?;
                self.write_items(&rule.consequence)?;
                writeln!(self.writer, " {:.6} {:.6}", rule.confidence, rule.divergence)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps the output in memory, one [`FrequentLevel`] per itemset size.
#[derive(Debug, Clone, Default)]
pub struct LevelCollector {
    pub levels: Vec<FrequentLevel>,
    pub rules: Vec<AssociationRule>,
}

impl LevelCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Support of `itemset` (raw ids, any order) if it was reported.
    pub fn support_of(&self, itemset: &[Item]) -> Option<usize> {
        let mut sorted = itemset.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        self.levels
            .get(sorted.len().checked_sub(1)?)
            .and_then(|level| level.find(&sorted))
    }

    pub fn total_itemsets(&self) -> usize {
        self.levels.iter().map(FrequentLevel::len).sum()
    }

    pub fn into_levels(self) -> Vec<FrequentLevel> {
        self.levels
    }
}

impl MiningSink for LevelCollector {
    fn emit_itemset(&mut self, itemset: &[Item], support: usize) -> Result<()> {
        let size = itemset.len();
        while self.levels.len() < size {
            self.levels.push(FrequentLevel::new(self.levels.len() + 1));
        }
        if size > 0 {
            self.levels[size - 1].add_itemset_with_support(itemset.to_vec(), support);
        }
        Ok(())
    }

    fn emit_rule(&mut self, rule: &AssociationRule) -> Result<()> {
        self.rules.push(rule.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        for level in &mut self.levels {
            level.sort();
        }
        Ok(())
    }
}
