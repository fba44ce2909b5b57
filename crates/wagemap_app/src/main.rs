mod logging;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use log::error;
use wagemap_engine::{
    harvest_country_links, write_csv, ConverterSiteFallback, CurrencyConverter,
    EmbeddedContinentDb, FetchSettings, Pipeline, PipelineEvent, ProgressSink,
    RateSnapshotProvider, ReqwestPageFetcher, BROWSE_INDEX_URL,
};

struct Options {
    output: PathBuf,
    cache: PathBuf,
    verbose: bool,
    log_file: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output: PathBuf::from("salary_data.csv"),
            cache: PathBuf::from("exchange_rate_data.json"),
            verbose: false,
            log_file: false,
        }
    }
}

const HELP: &str = "\
wagemap - scrape per-country salary statistics into a CSV dataset

Usage: wagemap [options]

Options:
  -o, --out <path>     Output CSV path (default: salary_data.csv)
      --cache <path>   Exchange-rate cache file (default: exchange_rate_data.json)
      --log-file       Also write logs to ./wagemap.log
  -v, --verbose        Debug-level logging
  -h, --help           Show this help
";

fn parse_args() -> Result<Options> {
    let mut options = Options::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--out" => {
                let value = args.next().context("missing value for --out")?;
                options.output = PathBuf::from(value);
            }
            "--cache" => {
                let value = args.next().context("missing value for --cache")?;
                options.cache = PathBuf::from(value);
            }
            "--log-file" => options.log_file = true,
            "-v" | "--verbose" => options.verbose = true,
            "-h" | "--help" => {
                eprint!("{HELP}");
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(options)
}

/// Prints one line per country, success or not, matching the run's index
/// over the total harvested count.
struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::CountryProcessed { index, total, .. } => {
                println!("Processed {index}/{total} countries.");
            }
            PipelineEvent::CountrySkipped {
                index,
                total,
                name,
                reason,
            } => {
                eprintln!("Skipping {name}: {reason}");
                println!("Processed {index}/{total} countries.");
            }
        }
    }
}

fn main() -> ExitCode {
    let options = match parse_args() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {err}");
            eprint!("{HELP}");
            return ExitCode::FAILURE;
        }
    };
    logging::initialize(options.verbose, options.log_file);

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("run failed: {err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(options: Options) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("tokio runtime")?;
    runtime.block_on(async {
        let fetcher = ReqwestPageFetcher::new(FetchSettings::default())
            .context("building http client")?;

        let rates = RateSnapshotProvider::new(&fetcher, options.cache.clone())
            .load_or_fetch()
            .await
            .context("exchange-rate snapshot unavailable")?;

        let links = match harvest_country_links(&fetcher, BROWSE_INDEX_URL).await {
            Ok(links) => links,
            Err(err) => {
                println!("No data to save.");
                return Err(err).context("failed to retrieve the country index");
            }
        };
        if links.is_empty() {
            println!("No data to save.");
            return Ok(());
        }

        let converter = CurrencyConverter::new(&rates, ConverterSiteFallback::new(&fetcher));
        let continents = EmbeddedContinentDb::new();
        let progress = ConsoleProgress;
        let pipeline = Pipeline::new(&fetcher, converter, &continents, &progress);

        let records = pipeline.run(&links).await;
        let summary = write_csv(&records, &options.output).context("writing output dataset")?;
        println!("Data has been saved to {}.", summary.output_path.display());
        Ok(())
    })
}
