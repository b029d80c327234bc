//! docweave CLI - reading-order text from document-analysis results

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use docweave::services::{
    ChatCompletion, ContentEvaluator, ContentSafetyEvaluator, DocumentAnalyzer, JsonFileAnalyzer,
    Severity,
};
use docweave::{parse_file, parse_files, parse_with_stats, JsonFormat, ParseOptions, TableFormat};

#[derive(Parser)]
#[command(name = "docweave")]
#[command(version)]
#[command(about = "Linearize document-analysis results into reading-order text", long_about = None)]
struct Cli {
    /// Analysis result (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Table format: csv, json or grid
    #[arg(long, global = true, env = "DOCWEAVE_TABLE_FORMAT", default_value = "csv")]
    format: TableFormat,

    /// Log level: ERROR, WARNING, INFO or DEBUG
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "ERROR")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the linearized text
    Text {
        /// Analysis result (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the output units as a JSON array of strings
    Units {
        /// Analysis result (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show linearization statistics
    Info {
        /// Analysis result (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Linearize many analysis results, one .txt per input
    Batch {
        /// Analysis results (JSON)
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Process files one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Check a saved chat-completion response for filtered content
    Safety {
        /// Chat-completion response (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Lowest severity that fails the check
        #[arg(long, default_value = "high")]
        threshold: Severity,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logger(&cli.log_level);

    let format = cli.format;
    let result = match cli.command {
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref(), format),
        Some(Commands::Units {
            input,
            output,
            compact,
        }) => cmd_units(&input, output.as_deref(), format, compact),
        Some(Commands::Info { input }) => cmd_info(&input, format),
        Some(Commands::Batch {
            inputs,
            output,
            sequential,
        }) => cmd_batch(&inputs, &output, format, sequential),
        Some(Commands::Safety { input, threshold }) => cmd_safety(&input, threshold),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: print text if input is provided
            if let Some(input) = cli.input {
                cmd_text(&input, None, format)
            } else {
                println!("{}", "Usage: docweave <FILE>".yellow());
                println!("       docweave --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Map a level name to a filter; unknown names fall back to errors only.
fn level_filter(name: &str) -> LevelFilter {
    match name.trim().to_ascii_uppercase().as_str() {
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARNING" | "WARN" => LevelFilter::Warn,
        _ => LevelFilter::Error,
    }
}

fn init_logger(level: &str) {
    env_logger::Builder::new()
        .filter_level(level_filter(level))
        .format(|buf, record| {
            let level = match record.level() {
                log::Level::Warn => "WARNING",
                other => other.as_str(),
            };
            let line = format!(" docweave :: {:<8} :: {}", level, record.args());
            if record.level() == log::Level::Error {
                writeln!(buf, "{}", line.red())
            } else {
                writeln!(buf, "{}", line.blue())
            }
        })
        .init();
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    format: TableFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = parse_file(input, format)?.join("\n");
    write_or_print(output, &text)
}

fn cmd_units(
    input: &Path,
    output: Option<&Path>,
    format: TableFormat,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let units = parse_file(input, format)?;

    let json_format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = docweave::render::to_json(&units, json_format)?;

    write_or_print(output, &json)
}

fn cmd_info(input: &Path, format: TableFormat) -> Result<(), Box<dyn std::error::Error>> {
    let result = JsonFileAnalyzer::new().analyze_document(input)?;
    let linearization = parse_with_stats(&result, format)?;
    let stats = &linearization.stats;

    println!("{}", "Analysis Result".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref model_id) = result.model_id {
        println!("{}: {}", "Model".bold(), model_id);
    }
    if let Some(ref api_version) = result.api_version {
        println!("{}: {}", "API version".bold(), api_version);
    }
    println!("{}: {}", "Paragraphs".bold(), stats.paragraphs);
    println!("{}: {}", "Tables".bold(), stats.tables);

    println!();
    println!("{}", "Linearization".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Output units".bold(), linearization.units.len());
    println!("{}: {}", "Text paragraphs".bold(), stats.text_units);
    println!("{}: {}", "Tables emitted".bold(), stats.tables_emitted);
    println!("{}: {}", "Absorbed paragraphs".bold(), stats.absorbed);
    println!("{}: {}", "Skipped (role)".bold(), stats.skipped_role);
    println!("{}: {}", "Skipped (unlocated)".bold(), stats.skipped_unlocated);

    if stats.unreferenced_tables.is_empty() {
        println!("{}: 0", "Unreferenced tables".bold());
    } else {
        let ids: Vec<String> = stats
            .unreferenced_tables
            .iter()
            .map(ToString::to_string)
            .collect();
        println!(
            "{}: {} ({})",
            "Unreferenced tables".bold(),
            ids.len(),
            ids.join(", ").yellow()
        );
    }

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    format: TableFormat,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64 + 1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Linearizing...");
    let options = ParseOptions::new()
        .with_table_format(format)
        .with_parallel(!sequential);
    let results = parse_files(inputs, &options);
    pb.inc(1);

    let mut failures = 0;
    for (input, result) in inputs.iter().zip(results) {
        let name = input.file_stem().unwrap_or_default().to_string_lossy();
        pb.set_message(format!("Writing {}.txt", name));
        match result {
            Ok(units) => {
                fs::write(output_dir.join(format!("{}.txt", name)), units.join("\n"))?;
            }
            Err(e) => {
                failures += 1;
                pb.println(format!("{} {}: {}", "Failed".red(), input.display(), e));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} file(s) written to {}",
        "Done!".green().bold(),
        inputs.len() - failures,
        inputs.len(),
        output_dir.display()
    );

    if failures > 0 {
        return Err(format!("{} file(s) failed", failures).into());
    }
    Ok(())
}

fn cmd_safety(input: &Path, threshold: Severity) -> Result<(), Box<dyn std::error::Error>> {
    let json = fs::read_to_string(input)?;
    let completion: ChatCompletion = serde_json::from_str(&json)?;

    ContentSafetyEvaluator::new()
        .with_threshold(threshold)
        .content_safety_check(&completion)?;

    println!(
        "{} ({} choice(s), threshold {})",
        "Passed".green().bold(),
        completion.choices.len(),
        threshold
    );
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docweave".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Reading-order text from document-analysis results");
    println!();
    println!("License: MIT");
}
