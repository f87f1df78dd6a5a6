use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use super::source::TransactionSource;
use crate::apriori::Item;
use crate::error::{AprioriError, Result};

/// Basket file reader: one basket per line, items are runs of ASCII digits
/// and every other byte separates them.
#[derive(Debug)]
pub struct BasketFile<R> {
    reader: R,
    line: Vec<u8>,
    line_number: usize,
}

impl BasketFile<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead + Seek> BasketFile<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            line_number: 0,
        }
    }
}

impl<R: BufRead + Seek> TransactionSource for BasketFile<R> {
    fn read_basket(&mut self, basket: &mut Vec<Item>) -> Result<bool> {
        self.line.clear();
        basket.clear();
        if self.reader.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        parse_basket_line(&self.line, basket)
            .ok_or(AprioriError::ItemOverflow {
                line: self.line_number,
            })?;
        Ok(true)
    }

    fn rewind(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_number = 0;
        Ok(())
    }
}

/// Parses the digit runs of `line` into a sorted, duplicate-free basket.
/// Returns `None` when an item overflows `usize`.
pub fn parse_basket_line(line: &[u8], basket: &mut Vec<Item>) -> Option<()> {
    basket.clear();
    let mut current: Option<Item> = None;
    for &byte in line {
        if byte.is_ascii_digit() {
            let digit = Item::from(byte - b'0');
            let value = current.unwrap_or(0);
            current = Some(value.checked_mul(10)?.checked_add(digit)?);
        } else if let Some(item) = current.take() {
            basket.push(item);
        }
    }
    if let Some(item) = current {
        basket.push(item);
    }
    basket.sort_unstable();
    basket.dedup();
    Some(())
}
