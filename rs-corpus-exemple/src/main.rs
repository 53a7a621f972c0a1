use std::fs::{self, File};
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::info;

use rs_corpus_core::io::{build_output_path, save_table, write_lines, write_view_csv};
use rs_corpus_core::{AnalysisConfig, Corpus, CorpusAnalyzer, Stemming};

/// Samples every `.txt` file of a folder, counts n-grams and prints the
/// n-grams frequent in all of them.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Folder holding the corpus sources (one text file per source)
    #[arg(default_value = "./data")]
    folder: String,

    /// Extension of the source files
    #[arg(long, default_value = "txt")]
    extension: String,

    /// JSON configuration file, overridden by the flags below
    #[arg(long)]
    config: Option<PathBuf>,

    /// Share of lines to sample from each source, in (0, 1]
    #[arg(long)]
    fraction: Option<f64>,

    /// Sampling seed
    #[arg(long)]
    seed: Option<u64>,

    /// N-gram orders to count (e.g. --orders 1,2,3)
    #[arg(long, value_delimiter = ',')]
    orders: Option<Vec<usize>>,

    /// Apply Porter-style stemming to tokens
    #[arg(long)]
    stem: bool,

    /// Keep n-grams seen more than this many times in every source
    #[arg(long)]
    threshold: Option<u64>,

    /// Count each source on worker threads
    #[arg(long)]
    parallel: bool,

    /// Number of rows to print per order
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Folder receiving sample files, table snapshots and CSV views
    #[arg(long)]
    output: Option<PathBuf>,
}

fn build_config(args: &Args) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(fraction) = args.fraction {
        config.set_fraction(fraction)?;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(orders) = &args.orders {
        config.set_ngram_orders(orders.iter().copied())?;
    }
    if args.stem {
        config.stemming = Stemming::Porter;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if args.parallel {
        config.parallel = true;
    }

    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = build_config(&args)?;
    info!("Configuration: {}", config.to_json()?);

    // Every source of the folder, with its line count
    let corpus = Corpus::open(&args.folder, &args.extension)?;
    let analyzer = CorpusAnalyzer::new(corpus, config)?;

    if let Some(output) = &args.output {
        fs::create_dir_all(output)?;
    }

    // Sample, clean and count; write each sample next to the other outputs if requested
    let analysis = analyzer.analyze_with(|name, lines| {
        if let Some(output) = &args.output {
            let path = output.join(format!("{}.sample.txt", name));
            write_lines(&path, lines)?;
            info!("Wrote {} sampled lines to {}", lines.len(), path.display());
        }
        Ok(())
    })?;

    println!("{:<24} {:>12} {:>10} {:>12}", "source", "lines", "sampled", "tokens");
    for summary in analysis.summaries() {
        println!(
            "{:<24} {:>12} {:>10} {:>12}",
            summary.name, summary.total_lines, summary.sampled_lines, summary.tokens
        );
    }

    let threshold = analysis.config().threshold;
    for &n in analysis.config().ngram_orders() {
        let view = analysis.aggregate(n, threshold)?;
        println!();
        println!("Top {}-grams seen more than {} times in every source ({} kept)", n, threshold, view.len());

        for (ngram, counts) in view.sorted_rows().into_iter().take(args.top) {
            let columns: Vec<String> = counts.iter().map(|(source, count)| format!("{}={}", source, count)).collect();
            println!("  {:<40} {}", ngram, columns.join(" "));
        }

        if let Some(output) = &args.output {
            let csv_path = output.join(format!("{}-grams.csv", n));
            write_view_csv(File::create(&csv_path)?, &view)?;

            if let Some(tables) = analysis.tables(n) {
                for (name, table) in tables {
                    let snapshot = build_output_path(format!("{}.txt", name), Some(output.as_path()), &format!("{}gram.bin", n))?;
                    save_table(&snapshot, table)?;
                }
            }
        }
    }

    Ok(())
}
