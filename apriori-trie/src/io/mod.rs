//! Transaction input, item recoding and result output.

pub mod basket_file;
pub mod recoder;
pub mod sink;
pub mod source;

pub use basket_file::{parse_basket_line, BasketFile};
pub use recoder::{FrequencyScan, ItemRecoder};
pub use sink::{LevelCollector, MiningSink, OutcomeFormat, OutcomeWriter};
pub use source::{InMemorySource, TransactionSource};
