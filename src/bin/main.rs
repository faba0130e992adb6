use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::style::Stylize;
use freq_core::persistence::{save_snapshot, save_table};
use freq_core::pipeline::count_files;
use freq_core::{Config, FrequencyTable, RegressionPolicy, SnapshotPipeline};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "charfreq", version, about = "Query and merge character frequency snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./charfreq.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep the earlier count when a later snapshot reports fewer occurrences
    #[arg(long, global = true)]
    keep_existing: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log only warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the count of one character
    Get {
        character: char,
        #[command(flatten)]
        input: SnapshotArgs,
    },
    /// Print the most frequent characters
    Rank {
        /// How many entries to print
        #[arg(short = 'n', long, default_value_t = 20)]
        top: usize,
        /// Print a JSON array instead of a table
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        input: SnapshotArgs,
    },
    /// Print the sum of all counts
    Total {
        #[command(flatten)]
        input: SnapshotArgs,
    },
    /// Merge snapshots (oldest first) and write the result
    Merge {
        #[command(flatten)]
        input: SnapshotArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Count the characters of text files into a new snapshot
    Count {
        /// Text files to count
        #[arg(required = true)]
        texts: Vec<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct SnapshotArgs {
    /// Snapshot files, oldest first (defaults to the configured list)
    snapshots: Vec<PathBuf>,
}

#[derive(Args)]
struct OutputArgs {
    /// Where to write the table
    #[arg(short, long)]
    output: PathBuf,
    /// Declaration name in the written snapshot
    #[arg(long)]
    name: Option<String>,
    /// Write the binary cache format instead of snapshot text
    #[arg(long)]
    binary: bool,
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn load_tables(input: &SnapshotArgs, config: &Config) -> Result<FrequencyTable> {
    let paths = if input.snapshots.is_empty() {
        config.snapshots.clone()
    } else {
        input.snapshots.clone()
    };
    if paths.is_empty() {
        bail!("no snapshot files given and none configured");
    }
    let output = SnapshotPipeline::new(config.on_regression)
        .snapshots(paths)
        .run()
        .context("loading snapshots")?;
    if !output.skipped.is_empty() {
        log::warn!(
            "{} regressed count(s) kept at their earlier value",
            output.skipped.len()
        );
    }
    Ok(output.table)
}

fn write_table(table: &FrequencyTable, output: &OutputArgs, config: &Config) -> Result<()> {
    let written = if output.binary {
        save_table(table, &output.output)
    } else {
        let name = output.name.as_deref().unwrap_or(&config.snapshot_name);
        save_snapshot(table, name, &output.output)
    };
    written.with_context(|| format!("writing {}", output.output.display()))
}

fn print_rank(table: &FrequencyTable, top: usize, json: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if json {
        let entries: Vec<_> = table.rank(top).collect();
        writeln!(stdout, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    let header = format!("{:>5}  {:<4}  {:>10}  {:>8}", "rank", "char", "count", "share");
    if stdout.is_terminal() {
        writeln!(stdout, "{}", header.bold())?;
    } else {
        writeln!(stdout, "{header}")?;
    }
    for (i, entry) in table.rank(top).enumerate() {
        let share = table.frequency(entry.character).unwrap_or(0.0) * 100.0;
        writeln!(
            stdout,
            "{:>5}  {:<4}  {:>10}  {:>7.3}%",
            i + 1,
            entry.character,
            entry.count,
            share
        )?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut config = Config::discover(cli.config.as_deref()).context("reading config")?;
    if cli.keep_existing {
        config.on_regression = RegressionPolicy::KeepExisting;
    }

    match &cli.command {
        Commands::Get { character, input } => {
            let table = load_tables(input, &config)?;
            match table.get(*character) {
                Some(count) => println!("{character}\t{count}"),
                None => println!("{character}\tnot found"),
            }
        }
        Commands::Rank { top, json, input } => {
            let table = load_tables(input, &config)?;
            print_rank(&table, *top, *json)?;
        }
        Commands::Total { input } => {
            let table = load_tables(input, &config)?;
            println!("{}", table.total_count());
        }
        Commands::Merge { input, output } => {
            let table = load_tables(input, &config)?;
            write_table(&table, output, &config)?;
        }
        Commands::Count { texts, output } => {
            let table = count_files(texts, &config.extra_skip).context("counting text")?;
            write_table(&table, output, &config)?;
        }
    }
    Ok(())
}
