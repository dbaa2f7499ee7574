use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledgersheet_cli::batch::{run_batch, BatchReport, Pipeline};
use ledgersheet_cli::config::{init_config, load_config, DEFAULT_CONFIG_FILE};
use ledgersheet_cli::logging::init_logging;
use ledgersheet_cli::pipelines::{parse_pdf, OutputFormat, TablePipeline, TransactionPipeline};
use ledgersheet_ingest::{LopdfText, PlumberTables};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "ledgersheet",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LEDGERSHEET_BUILD_SHA"), ")"),
    about = "Convert bank-statement PDFs into spreadsheets"
)]
struct Cli {
    /// Config file (default: ./ledgersheet.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse transaction rows out of statement text, one spreadsheet per PDF
    Transactions {
        /// PDF file or folder of PDFs (default from config: ./pdfs)
        input: Option<PathBuf>,

        /// Output folder (default from config: ./output)
        output: Option<PathBuf>,

        /// Output format (default from config: xlsx)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Export every table detected in the PDFs, one sheet per table
    Tables {
        /// PDF file or folder of PDFs
        input: PathBuf,

        /// Output folder
        output: PathBuf,
    },

    /// Print the transactions parsed from one PDF as JSON lines
    Preview {
        /// PDF file
        pdf: PathBuf,
    },

    /// Write a default config file (to --config, or ./ledgersheet.toml)
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::InitConfig = cli.command {
        let path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        return init_config(&path);
    }

    let cfg = load_config(cli.config.as_deref())?;
    init_logging(&cfg.log.level);

    match cli.command {
        Command::Transactions { input, output, format } => {
            let input = input.unwrap_or(cfg.transactions.input);
            let output = output.unwrap_or(cfg.transactions.output);
            let format = format.unwrap_or(cfg.transactions.format);
            let pipeline = TransactionPipeline::new(LopdfText, format, cfg.transactions.sheet_name);
            run_and_report(&pipeline, &input, &output);
        }

        Command::Tables { input, output } => {
            let pipeline = TablePipeline::new(PlumberTables::default(), cfg.tables.sheet_prefix);
            run_and_report(&pipeline, &input, &output);
        }

        Command::Preview { pdf } => {
            let records = parse_pdf(&LopdfText, &pdf).with_context(|| format!("parsing {}", pdf.display()))?;
            for r in &records {
                println!("{}", serde_json::to_string(r)?);
            }
            info!("{} transactions in {}", records.len(), pdf.display());
        }

        Command::InitConfig => {}
    }

    Ok(())
}

/// Per-file outcomes only reach the log; the process still exits cleanly.
fn run_and_report(pipeline: &dyn Pipeline, input: &Path, output: &Path) {
    let report = match run_batch(pipeline, input, output) {
        Ok(report) => report,
        Err(e) => {
            error!("{e:#}");
            BatchReport::default()
        }
    };

    info!(
        "batch completed: {} file(s), {} written, {} without content, {} failed",
        report.discovered, report.written, report.empty, report.failed
    );
}
