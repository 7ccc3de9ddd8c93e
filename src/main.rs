use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use vip_orders_etl::app::extract_use_case::{ExtractUseCase, ExtractionResult};
use vip_orders_etl::config::EtlConfig;
use vip_orders_etl::constants;
use vip_orders_etl::infra::{write_preview, CsvTableWriter};
use vip_orders_etl::logging;

#[derive(Parser)]
#[command(name = "vip_orders_etl")]
#[command(about = "Flatten nested customer orders into a VIP-tagged analytics table")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = constants::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Nested customer order records (JSON array)
    #[arg(long)]
    orders: Option<PathBuf>,
    /// VIP customer identifiers, one per line
    #[arg(long)]
    vip: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full extraction and write the cleaned table
    Run {
        #[command(flatten)]
        input: InputArgs,
        /// Output CSV path
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the run summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the extraction and print data-quality diagnostics only
    Diagnose {
        #[command(flatten)]
        input: InputArgs,
        /// Print the run summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the extraction and print the first rows of the table without writing it
    Preview {
        #[command(flatten)]
        input: InputArgs,
        /// Number of rows to show
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
}

fn print_summary(result: &ExtractionResult) {
    let summary = result.summary();
    println!("\n📊 Extraction results:");
    println!("   VIP identifiers: {}", summary.vip_ids_loaded);
    println!("   Customers: {}", summary.customers);
    println!("   Items seen: {}", summary.candidate_items);
    println!("   Dropped (missing product id): {}", summary.dropped_missing_product_id);
    println!("   Dropped (zero price with quantity): {}", summary.dropped_zero_price);
    println!("   Final rows: {}", summary.final_rows);
    for (kind, count) in &summary.quality_issues {
        println!("   Quality issue {}: {}", kind.tag(), count);
    }
    if let Some(output) = &summary.output {
        println!("   Output file: {}", output);
    }
}

fn print_preview(result: &ExtractionResult, rows: usize) -> anyhow::Result<()> {
    write_preview(std::io::stdout().lock(), &result.table.rows, rows)?;
    Ok(())
}

fn print_summary_json(result: &ExtractionResult) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&result.summary())?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = EtlConfig::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    let _guard = logging::init_logging(&config.logging);

    let outcome: anyhow::Result<()> = match cli.command {
        Commands::Run { input, output, json } => {
            let config = config.with_overrides(input.orders, input.vip, output);
            let use_case = ExtractUseCase::new(Box::new(CsvTableWriter::new(config.output.path.clone())));
            use_case.run(&config.input).map_err(Into::into).and_then(|result| {
                if json {
                    return print_summary_json(&result);
                }
                println!("\n🔎 Diagnostics:\n{}", result.table.diagnostics);
                print_summary(&result);
                println!("✅ Extraction and export complete");
                Ok(())
            })
        }
        Commands::Diagnose { input, json } => {
            let config = config.with_overrides(input.orders, input.vip, None);
            ExtractUseCase::without_output()
                .run(&config.input)
                .map_err(Into::into)
                .and_then(|result| {
                    if json {
                        return print_summary_json(&result);
                    }
                    if result.table.diagnostics.is_clean() {
                        println!("✅ No data-quality issues found");
                    } else {
                        println!("{}", result.table.diagnostics);
                    }
                    print_summary(&result);
                    Ok(())
                })
        }
        Commands::Preview { input, rows } => {
            let config = config.with_overrides(input.orders, input.vip, None);
            ExtractUseCase::without_output()
                .run(&config.input)
                .map_err(Into::into)
                .and_then(|result| print_preview(&result, rows))
        }
    };

    if let Err(e) = &outcome {
        error!("Extraction failed: {}", e);
        println!("❌ Extraction failed: {}", e);
    }
    outcome.context("extraction aborted")
}
