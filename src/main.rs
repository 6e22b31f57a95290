mod export;
mod model;
mod parser;
mod reader;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use parser::ParseOptions;

#[derive(Parser)]
#[command(name = "tarifa2json", about = "Tarifa spreadsheet to catalog-import JSON converter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a tarifa workbook into a JSON import file
    Convert {
        /// Input .xlsx/.xls file
        input: PathBuf,
        /// Output path (default: input with a .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
        /// Stop after the second distinct chapter header (smoke test on large files)
        #[arg(long)]
        first_family_only: bool,
    },
    /// Parse a workbook and show summary counts plus the first records
    Preview {
        /// Input .xlsx/.xls file
        input: PathBuf,
        /// Records to show per list
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            pretty,
            first_family_only,
        } => {
            let (rows, sheet) = reader::load_rows(&input)?;
            println!("Loaded {} rows from sheet '{}'", rows.len(), sheet);

            let pb = ProgressBar::new(rows.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40} {pos}/{len} rows")?
                    .progress_chars("=> "),
            );
            let opts = ParseOptions { first_family_only };
            let catalog = parser::parse_rows(&rows, &opts, |_, _| pb.inc(1))?;
            pb.finish_and_clear();

            let s = &catalog.summary;
            println!(
                "Parsed {} chapters, {} subchapters, {} articles, {} optionals, {} relations.",
                s.chapters,
                s.subchapters,
                s.items,
                s.optionals,
                catalog.relations.len()
            );

            let output = output.unwrap_or_else(|| input.with_extension("json"));
            let source_file = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            export::write_json(&catalog, &source_file, &output, pretty)?;
            println!("Saved {}", output.display());
            Ok(())
        }
        Commands::Preview { input, limit } => {
            let (rows, sheet) = reader::load_rows(&input)?;
            println!("Sheet '{}': {} rows", sheet, rows.len());

            let catalog = parser::parse_rows(&rows, &ParseOptions::default(), |_, _| {})?;
            let s = &catalog.summary;
            println!("Chapters:    {}", s.chapters);
            println!("Subchapters: {}", s.subchapters);
            println!("Articles:    {}", s.items);
            println!("Optionals:   {}", s.optionals);
            println!("Relations:   {}", catalog.relations.len());

            if !catalog.families.is_empty() {
                println!("\n--- Families ---");
                for f in catalog.families.iter().take(limit) {
                    println!(
                        "  [{}] {} {} (depth {})",
                        f.chapter_key, f.stable_code, f.title, f.depth
                    );
                }
            }
            if !catalog.items.is_empty() {
                println!("\n--- Articles ---");
                for item in catalog.items.iter().take(limit) {
                    println!(
                        "  [{}] {} - {} EUR",
                        item.external_ref, item.code_label, item.price
                    );
                }
            }
            if !catalog.optionals.is_empty() {
                println!("\n--- Optionals ---");
                for optional in catalog.optionals.iter().take(limit) {
                    let price = optional
                        .price
                        .map(|p| format!("{} EUR", p))
                        .unwrap_or_else(|| "-".into());
                    println!("  {} ({})", optional.title_es, price);
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}
