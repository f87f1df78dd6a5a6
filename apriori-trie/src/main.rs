//! `apriori basketfile outcomefile min_supp [min_conf]`
//!
//! Trie based APRIORI: finds the frequent itemsets of a basket file and,
//! when a confidence threshold is given, the association rules between them.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info};

use apriori_trie::config::{MiningConfig, DEFAULT_CONFIG_FILE};
use apriori_trie::io::{BasketFile, OutcomeFormat, OutcomeWriter};
use apriori_trie::logging::{init_tracing, with_startup_logging};
use apriori_trie::{Apriori, AprioriError, MiningParams};

const FILE_FORMAT: &str = "\
File formats:

The basket file is a plain text file. Each row represents a basket. A basket
is a set of items separated by a nonnumeric character (for example white
space, comma, colon, etc.). An item is represented by its code which is an
integer number greater than or equal to 0.

For more options please check the configuration file: .apriori_config";

/// Trie based APRIORI algorithm
#[derive(Parser, Debug)]
#[command(name = "apriori", version)]
#[command(about = "Frequent itemset and association rule mining with a trie based APRIORI")]
#[command(after_help = FILE_FORMAT)]
struct Args {
    /// File that contains the baskets of item codes
    basketfile: PathBuf,

    /// File to write the outcome to
    outcomefile: PathBuf,

    /// Support threshold, in (0,1]
    min_supp: f64,

    /// Confidence threshold, in (0,1]; rules are only mined when given
    min_conf: Option<f64>,

    /// Configuration file with the quiet, store_input and size_threshold values
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Outcome layout; `edges` writes only `condition consequence conf J` rule lines
    #[arg(long, value_enum, default_value_t = OutcomeFormat::Levels)]
    format: OutcomeFormat,
}

fn usage_error(message: &str) -> ExitCode {
    use clap::CommandFactory;
    let mut command = Args::command();
    eprintln!("{}", command.render_usage());
    eprintln!("\n{}", FILE_FORMAT);
    eprintln!("\nError! {}", message);
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    let config = with_startup_logging(|| MiningConfig::load(&args.config));

    let mut params = MiningParams::new(args.min_supp)
        .with_size_threshold(config.size_threshold)
        .with_store_input(config.store_input);
    if let Some(min_conf) = args.min_conf {
        params = params.with_min_confidence(min_conf);
    }
    if let Err(e) = params.validate() {
        return usage_error(&e.to_string());
    }

    let mut basket_file = match BasketFile::open(&args.basketfile) {
        Ok(file) => file,
        Err(_) => return usage_error("The basket file can not be read!"),
    };

    init_tracing(config.quiet);
    info!("Trie based APRIORI algorithm, version {}", env!("CARGO_PKG_VERSION"));

    match run(&mut basket_file, &args, params) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(%e, "mining failed");
            ExitCode::FAILURE
        }
    }
}

fn run(
    basket_file: &mut BasketFile<std::io::BufReader<std::fs::File>>,
    args: &Args,
    params: MiningParams,
) -> Result<(), AprioriError> {
    let mut writer = OutcomeWriter::create(&args.outcomefile)?.with_format(args.format);
    let mut apriori = Apriori::new(params)?;
    let summary = apriori.run(basket_file, &mut writer)?;
    info!(
        transactions = summary.transaction_count,
        frequent_items = summary.frequent_items,
        longest_itemset = summary.longest_itemset,
        "outcome written to {}",
        args.outcomefile.display()
    );
    Ok(())
}
